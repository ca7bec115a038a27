use crate::render::{render_block, EMAIL_WIDTH, FONT_STACK};
use mailcraft_blocks::markup::escape_html;
use mailcraft_blocks::Block;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

/// Options for HTML compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Document `<title>`
    pub title: String,
    /// Hidden inbox preview text; empty for none
    pub preheader: String,
    /// Page background around the 600px container
    pub background_color: String,
    /// Container background
    pub content_background: String,
    pub footer: FooterOptions,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            title: "Email".to_string(),
            preheader: String::new(),
            background_color: "#f3f4f6".to_string(),
            content_background: "#ffffff".to_string(),
            footer: FooterOptions::default(),
        }
    }
}

/// Standard footer appended after the last block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterOptions {
    pub company_name: String,
    pub address: String,
    /// Resolved by the sender at delivery time
    pub unsubscribe_url: String,
    /// Resolved by the sender at delivery time
    pub preferences_url: String,
}

impl Default for FooterOptions {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            address: String::new(),
            unsubscribe_url: "{{unsubscribe_url}}".to_string(),
            preferences_url: "{{preferences_url}}".to_string(),
        }
    }
}

struct Context<'a> {
    options: &'a CompileOptions,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a CompileOptions) -> Self {
        Self {
            options,
            buffer: String::with_capacity(8 * 1024),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        self.add(text);
        self.add("\n");
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Compile with default options
pub fn compile(blocks: &[Block]) -> String {
    compile_to_html(blocks, &CompileOptions::default())
}

/// Compile an ordered block list to a complete email document
pub fn compile_to_html(blocks: &[Block], options: &CompileOptions) -> String {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line(
        "<html lang=\"en\" xmlns=\"http://www.w3.org/1999/xhtml\" \
         xmlns:v=\"urn:schemas-microsoft-com:vml\" xmlns:o=\"urn:schemas-microsoft-com:office:office\">",
    );

    compile_head(&mut ctx);
    compile_body(blocks, &mut ctx);

    ctx.add_line("</html>");

    let html = strip_merge_tag_wrappers(&ctx.get_output());
    debug!(blocks = blocks.len(), bytes = html.len(), "Compiled email HTML");
    html
}

fn compile_head(ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    ctx.add_line("<meta http-equiv=\"X-UA-Compatible\" content=\"IE=edge\">");
    ctx.add_line("<meta name=\"x-apple-disable-message-reformatting\">");
    let title = escape_html(&ctx.options.title);
    ctx.add_line(&format!("<title>{}</title>", title));

    ctx.add_line("<!--[if mso]>");
    ctx.add_line(
        "<noscript><xml><o:OfficeDocumentSettings><o:PixelsPerInch>96</o:PixelsPerInch>\
         </o:OfficeDocumentSettings></xml></noscript>",
    );
    ctx.add_line("<![endif]-->");

    ctx.add_line("<style>");
    ctx.add_line("body{margin:0;padding:0;width:100%!important;-webkit-text-size-adjust:100%;-ms-text-size-adjust:100%;}");
    ctx.add_line("table,td{border-collapse:collapse;mso-table-lspace:0pt;mso-table-rspace:0pt;}");
    ctx.add_line("img{border:0;height:auto;line-height:100%;outline:none;text-decoration:none;-ms-interpolation-mode:bicubic;}");
    ctx.add_line("p{margin:0 0 12px 0;}");
    ctx.add_line("a{color:inherit;}");
    ctx.add_line(
        "@media only screen and (max-width:620px){.email-container{width:100%!important;}\
         .column{max-width:100%!important;display:block!important;}}",
    );
    ctx.add_line("</style>");

    ctx.add_line("</head>");
}

fn compile_body(blocks: &[Block], ctx: &mut Context) {
    let background = escape_html(&ctx.options.background_color);
    let content_background = escape_html(&ctx.options.content_background);

    ctx.add_line(&format!(
        "<body style=\"margin:0;padding:0;background-color:{};\">",
        background
    ));

    if !ctx.options.preheader.is_empty() {
        let preheader = escape_html(&ctx.options.preheader);
        ctx.add_line(&format!(
            "<div style=\"display:none;font-size:1px;line-height:1px;max-height:0;max-width:0;\
             opacity:0;overflow:hidden;mso-hide:all;\">{}</div>",
            preheader
        ));
    }

    ctx.add_line(&format!(
        "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\" \
         style=\"background-color:{};\">",
        background
    ));
    ctx.add_line("<tr><td align=\"center\" style=\"padding:24px 0;\">");
    ctx.add_line(&format!(
        "<table role=\"presentation\" class=\"email-container\" width=\"{w}\" cellpadding=\"0\" \
         cellspacing=\"0\" border=\"0\" style=\"width:{w}px;max-width:{w}px;background-color:{bg};\">",
        w = EMAIL_WIDTH,
        bg = content_background
    ));

    for block in blocks {
        let row = render_block(block);
        if !row.is_empty() {
            ctx.add_line(&row);
        }
    }

    compile_footer(ctx);

    ctx.add_line("</table>");
    ctx.add_line("</td></tr>");
    ctx.add_line("</table>");
    ctx.add_line("</body>");
}

fn compile_footer(ctx: &mut Context) {
    let footer = &ctx.options.footer;
    let mut out = format!(
        "<tr><td style=\"padding:24px 20px;text-align:center;font-family:{};font-size:12px;\
         line-height:18px;color:#9ca3af;\">",
        FONT_STACK
    );

    if !footer.company_name.is_empty() {
        out.push_str(&format!(
            "<p style=\"margin:0 0 8px 0;\">{}</p>",
            escape_html(&footer.company_name)
        ));
    }
    if !footer.address.is_empty() {
        out.push_str(&format!(
            "<p style=\"margin:0 0 8px 0;\">{}</p>",
            escape_html(&footer.address)
        ));
    }

    out.push_str(&format!(
        "<p style=\"margin:0;\"><a href=\"{}\" style=\"color:#6b7280;text-decoration:underline;\">Unsubscribe</a>\
         &nbsp;&middot;&nbsp;<a href=\"{}\" style=\"color:#6b7280;text-decoration:underline;\">Update preferences</a></p>",
        escape_html(&footer.unsubscribe_url),
        escape_html(&footer.preferences_url)
    ));
    out.push_str("</td></tr>");

    ctx.add_line(&out);
}

fn merge_tag_wrapper() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<span\b[^>]*\bdata-merge-tag="[^"]*"[^>]*>([^<]*)</span>"#)
            .expect("merge tag pattern is valid")
    })
}

/// Replace editor merge-tag pills with their bare placeholder text so the
/// sender's mail-merge can find them
pub fn strip_merge_tag_wrappers(html: &str) -> String {
    merge_tag_wrapper().replace_all(html, "$1").into_owned()
}
