//! Per-type row templates. Each returns one `<tr>` fragment for the 600px
//! container table, or an empty string when the block renders nothing.

use mailcraft_blocks::markup::escape_html;
use mailcraft_blocks::{
    Alignment, Block, BlockProps, CtaProps, DividerProps, HeaderProps, ImageProps, ProductProps,
    RichTextProps, SpacerProps, TestimonialProps, TwoColumnProps,
};
use tracing::debug;

/// Outer container width
pub const EMAIL_WIDTH: u32 = 600;
/// Container width minus the 20px side gutters
pub const CONTENT_WIDTH: u32 = 560;

pub(crate) const FONT_STACK: &str = "Arial,Helvetica,sans-serif";

/// Fixed VML button geometry
const BUTTON_HEIGHT: u32 = 44;
const BUTTON_WIDTH: u32 = 220;

const PRODUCT_IMAGE_WIDTH: u32 = 200;

pub fn render_block(block: &Block) -> String {
    match &block.props {
        BlockProps::Header(props) => render_header(props),
        BlockProps::RichText(props) => render_rich_text(props),
        BlockProps::Image(props) => render_image(props),
        BlockProps::Cta(props) => render_cta(props),
        BlockProps::Product(props) => render_product(props),
        BlockProps::Testimonial(props) => render_testimonial(props),
        BlockProps::Divider(props) => render_divider(props),
        BlockProps::Spacer(props) => render_spacer(props),
        BlockProps::TwoColumn(props) => render_two_column(props),
        BlockProps::Unknown { type_name, .. } => {
            debug!(block_id = %block.id, block_type = %type_name, "Skipping block of unknown type");
            String::new()
        }
    }
}

fn render_header(props: &HeaderProps) -> String {
    let align = props.alignment.as_str();
    let brand = escape_html(&props.brand_name);
    let text_color = escape_html(&props.text_color);

    let mut out = format!(
        "<tr><td align=\"{align}\" style=\"padding:32px 20px 24px 20px;background-color:{bg};text-align:{align};\">",
        align = align,
        bg = escape_html(&props.background_color)
    );

    if !props.logo_url.is_empty() {
        out.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\" width=\"120\" style=\"display:inline-block;width:120px;max-width:120px;\
             height:auto;border:0;margin:0 0 12px 0;\"><br>",
            escape_html(&props.logo_url),
            brand
        ));
    }

    out.push_str(&format!(
        "<h1 style=\"margin:0;font-family:{};font-size:28px;line-height:36px;font-weight:700;color:{};\">{}</h1>",
        FONT_STACK, text_color, brand
    ));

    if !props.tagline.is_empty() {
        out.push_str(&format!(
            "<p style=\"margin:8px 0 0 0;font-family:{};font-size:14px;line-height:20px;color:{};\">{}</p>",
            FONT_STACK,
            text_color,
            escape_html(&props.tagline)
        ));
    }

    out.push_str("</td></tr>");
    out
}

/// 1.6x the font size; widened so stored sizes up to `u32::MAX` cannot overflow
pub(crate) fn line_height(font_size: u32) -> u64 {
    u64::from(font_size) * 8 / 5
}

fn render_rich_text(props: &RichTextProps) -> String {
    // Trusted editor output, inserted verbatim
    format!(
        "<tr><td style=\"padding:{pad}px 20px;font-family:{font};font-size:{size}px;line-height:{lh}px;color:{color};\">{html}</td></tr>",
        pad = props.padding,
        font = FONT_STACK,
        size = props.font_size,
        lh = line_height(props.font_size),
        color = escape_html(&props.text_color),
        html = props.html
    )
}

fn image_margin(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "0",
        Alignment::Center => "0 auto",
        Alignment::Right => "0 0 0 auto",
    }
}

fn render_image(props: &ImageProps) -> String {
    if props.src.is_empty() {
        return String::new();
    }

    let width = match props.width {
        0 => EMAIL_WIDTH,
        w => w.min(EMAIL_WIDTH),
    };
    let align = props.alignment.as_str();

    let mut image = format!(
        "<img src=\"{}\" alt=\"{}\" width=\"{w}\" style=\"display:block;width:100%;max-width:{w}px;height:auto;\
         border:0;border-radius:{r}px;margin:{m};\">",
        escape_html(&props.src),
        escape_html(&props.alt),
        w = width,
        r = props.border_radius,
        m = image_margin(props.alignment)
    );

    if !props.link.is_empty() {
        image = format!(
            "<a href=\"{}\" target=\"_blank\" style=\"text-decoration:none;\">{}</a>",
            escape_html(&props.link),
            image
        );
    }

    let mut out = format!("<tr><td align=\"{}\" style=\"padding:0;\">{}", align, image);

    if !props.caption.is_empty() {
        out.push_str(&format!(
            "<p style=\"margin:8px 20px 0 20px;font-family:{};font-size:13px;line-height:18px;color:#6b7280;text-align:{};\">{}</p>",
            FONT_STACK,
            align,
            escape_html(&props.caption)
        ));
    }

    out.push_str("</td></tr>");
    out
}

/// VML `arcsize` is the corner radius as a percentage of the button height
pub(crate) fn arc_size(border_radius: u32) -> u32 {
    let percent = (border_radius as f64 / BUTTON_HEIGHT as f64 * 100.0).round() as u32;
    percent.min(100)
}

fn render_cta(props: &CtaProps) -> String {
    let url = escape_html(&props.url);
    let text = escape_html(&props.text);
    let background = escape_html(&props.background_color);
    let color = escape_html(&props.text_color);

    let mut out = format!(
        "<tr><td align=\"{}\" style=\"padding:16px 20px;\">",
        props.alignment.as_str()
    );

    out.push_str("<!--[if mso]>");
    out.push_str(&format!(
        "<v:roundrect xmlns:v=\"urn:schemas-microsoft-com:vml\" xmlns:w=\"urn:schemas-microsoft-com:office:word\" \
         href=\"{url}\" style=\"height:{h}px;v-text-anchor:middle;width:{w}px;\" arcsize=\"{arc}%\" stroke=\"f\" \
         fillcolor=\"{bg}\"><w:anchorlock/><center style=\"color:{color};font-family:{font};font-size:16px;\
         font-weight:bold;\">{text}</center></v:roundrect>",
        url = url,
        h = BUTTON_HEIGHT,
        w = BUTTON_WIDTH,
        arc = arc_size(props.border_radius),
        bg = background,
        color = color,
        font = FONT_STACK,
        text = text
    ));
    out.push_str("<![endif]-->");

    out.push_str("<!--[if !mso]><!-->");
    out.push_str(&format!(
        "<a href=\"{url}\" target=\"_blank\" style=\"display:inline-block;background-color:{bg};color:{color};\
         font-family:{font};font-size:16px;font-weight:bold;line-height:{h}px;text-align:center;text-decoration:none;\
         padding:0 32px;border-radius:{r}px;-webkit-text-size-adjust:none;\">{text}</a>",
        url = url,
        bg = background,
        color = color,
        font = FONT_STACK,
        h = BUTTON_HEIGHT,
        r = props.border_radius,
        text = text
    ));
    out.push_str("<!--<![endif]-->");

    out.push_str("</td></tr>");
    out
}

fn render_product(props: &ProductProps) -> String {
    let name = escape_html(&props.name);

    let image_cell = if props.image_url.is_empty() {
        format!(
            "<td width=\"{w}\" height=\"{w}\" align=\"center\" valign=\"middle\" style=\"width:{w}px;height:{w}px;\
             background-color:#f3f4f6;border-radius:8px;font-family:{font};font-size:13px;color:#9ca3af;\">No image</td>",
            w = PRODUCT_IMAGE_WIDTH,
            font = FONT_STACK
        )
    } else {
        format!(
            "<td width=\"{w}\" valign=\"top\" style=\"width:{w}px;\"><img src=\"{src}\" alt=\"{alt}\" width=\"{w}\" \
             style=\"display:block;width:{w}px;max-width:{w}px;height:auto;border:0;border-radius:8px;\"></td>",
            w = PRODUCT_IMAGE_WIDTH,
            src = escape_html(&props.image_url),
            alt = name
        )
    };

    let mut details = format!(
        "<td valign=\"top\" style=\"padding:0 0 0 16px;font-family:{}\">\
         <h3 style=\"margin:0 0 8px 0;font-size:18px;line-height:24px;color:#111827;\">{}</h3>\
         <p style=\"margin:0 0 8px 0;font-size:16px;line-height:22px;font-weight:700;color:#111827;\">{}</p>",
        FONT_STACK,
        name,
        escape_html(&props.price)
    );

    if !props.description.is_empty() {
        details.push_str(&format!(
            "<p style=\"margin:0 0 16px 0;font-size:14px;line-height:20px;color:#4b5563;\">{}</p>",
            escape_html(&props.description)
        ));
    }

    if !props.button_text.is_empty() {
        details.push_str(&format!(
            "<a href=\"{}\" target=\"_blank\" style=\"display:inline-block;padding:10px 20px;background-color:#111827;\
             color:#ffffff;font-size:14px;font-weight:bold;text-decoration:none;border-radius:6px;\">{}</a>",
            escape_html(&props.button_url),
            escape_html(&props.button_text)
        ));
    }
    details.push_str("</td>");

    format!(
        "<tr><td style=\"padding:16px 20px;\"><table role=\"presentation\" width=\"100%\" cellpadding=\"0\" \
         cellspacing=\"0\" border=\"0\"><tr>{}{}</tr></table></td></tr>",
        image_cell, details
    )
}

fn render_testimonial(props: &TestimonialProps) -> String {
    let author = escape_html(&props.author);

    let mut inner = String::new();
    if !props.avatar_url.is_empty() {
        inner.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\" width=\"56\" height=\"56\" style=\"display:inline-block;width:56px;\
             height:56px;border:0;border-radius:28px;margin:0 0 12px 0;\"><br>",
            escape_html(&props.avatar_url),
            author
        ));
    }

    inner.push_str(&format!(
        "<p style=\"margin:0 0 12px 0;font-size:18px;line-height:28px;font-style:italic;color:#111827;\">&ldquo;{}&rdquo;</p>",
        escape_html(&props.quote)
    ));

    inner.push_str(&format!(
        "<p style=\"margin:0;font-size:14px;line-height:20px;font-weight:bold;color:#374151;\">{}",
        author
    ));
    if !props.role.is_empty() {
        inner.push_str(&format!(
            "<span style=\"font-weight:normal;color:#6b7280;\">, {}</span>",
            escape_html(&props.role)
        ));
    }
    inner.push_str("</p>");

    format!(
        "<tr><td style=\"padding:24px 20px;\"><table role=\"presentation\" width=\"100%\" cellpadding=\"0\" \
         cellspacing=\"0\" border=\"0\" style=\"background-color:{bg};border-radius:8px;\"><tr><td \
         style=\"padding:24px;font-family:{font};text-align:center;\">{inner}</td></tr></table></td></tr>",
        bg = escape_html(&props.background_color),
        font = FONT_STACK,
        inner = inner
    )
}

fn render_divider(props: &DividerProps) -> String {
    format!(
        "<tr><td style=\"padding:{m}px 20px;\"><hr style=\"border:0;border-top:{t}px solid {c};width:{w}%;margin:0 auto;\"></td></tr>",
        m = props.margin,
        t = props.thickness,
        c = escape_html(&props.color),
        w = props.width.min(100)
    )
}

fn render_spacer(props: &SpacerProps) -> String {
    // Some clients collapse empty cells; the nbsp plus explicit line-height
    // keeps the row at full height.
    format!(
        "<tr><td style=\"height:{h}px;line-height:{h}px;font-size:1px;mso-line-height-rule:exactly;\">&nbsp;</td></tr>",
        h = props.height
    )
}

fn render_two_column(props: &TwoColumnProps) -> String {
    let (left_percent, _) = props.ratio.percentages();
    let left_width = CONTENT_WIDTH * left_percent / 100;
    let right_width = CONTENT_WIDTH - left_width;

    let column_style = |width: u32| {
        format!(
            "display:inline-block;width:100%;max-width:{}px;vertical-align:top;font-family:{};font-size:16px;\
             line-height:24px;color:#374151;",
            width, FONT_STACK
        )
    };

    let mut out = String::from("<tr><td style=\"padding:16px 20px;font-size:0;\">");

    out.push_str(&format!(
        "<!--[if mso]><table role=\"presentation\" width=\"{}\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\">\
         <tr><td width=\"{}\" valign=\"top\"><![endif]-->",
        CONTENT_WIDTH, left_width
    ));
    out.push_str(&format!(
        "<div class=\"column\" style=\"{}\"><div style=\"padding:0 10px 0 0;\">{}</div></div>",
        column_style(left_width),
        props.left_html
    ));
    out.push_str(&format!(
        "<!--[if mso]></td><td width=\"{}\" valign=\"top\"><![endif]-->",
        right_width
    ));
    out.push_str(&format!(
        "<div class=\"column\" style=\"{}\"><div style=\"padding:0 0 0 10px;\">{}</div></div>",
        column_style(right_width),
        props.right_html
    ));
    out.push_str("<!--[if mso]></td></tr></table><![endif]-->");

    out.push_str("</td></tr>");
    out
}
