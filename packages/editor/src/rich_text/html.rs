//! HTML form of rich text.
//!
//! The serializer emits a small, fixed subset of HTML. The parser reads that
//! subset back along with a few common aliases (`<b>`, `<i>`, `<del>`,
//! `<strike>`, `<br>`). Tags outside the subset are dropped and their text
//! kept.

use super::{Inline, Marks, RichText, TextAlign, TextBlock, TextKind};
use logos::Logos;
use mailcraft_blocks::markup::{escape_html, unescape_html, MERGE_TAG_ATTR};
use regex::Regex;
use std::sync::OnceLock;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'src> {
    #[regex(r"<!--[^>]*-->")]
    Comment,

    #[regex(r"</[a-zA-Z][a-zA-Z0-9]*[ \t\r\n]*>", |lex| {
        let s = lex.slice();
        s[2..s.len() - 1].trim()
    })]
    Close(&'src str),

    #[regex(r"<[a-zA-Z][^>]*>", |lex| lex.slice())]
    Open(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),
}

// ---------------------------------------------------------------------------
// Serialize
// ---------------------------------------------------------------------------

fn block_tag(kind: TextKind) -> &'static str {
    match kind {
        TextKind::Paragraph => "p",
        TextKind::Heading1 => "h1",
        TextKind::Heading2 => "h2",
        TextKind::Heading3 => "h3",
        TextKind::Blockquote => "blockquote",
        TextKind::BulletItem | TextKind::OrderedItem => "li",
        TextKind::HorizontalRule => "hr",
    }
}

fn list_tag(kind: TextKind) -> Option<&'static str> {
    match kind {
        TextKind::BulletItem => Some("ul"),
        TextKind::OrderedItem => Some("ol"),
        _ => None,
    }
}

fn serialize_inline(out: &mut String, inline: &Inline) {
    let (text, marks) = match inline {
        Inline::MergeTag { id, placeholder } => {
            out.push_str(&format!(
                "<span {}=\"{}\" class=\"merge-tag\">{}</span>",
                MERGE_TAG_ATTR,
                escape_html(id),
                escape_html(placeholder)
            ));
            return;
        }
        Inline::Text { text, marks } => (text, marks),
    };

    let mut open = String::new();
    let mut close = Vec::new();

    if let Some(href) = &marks.link {
        open.push_str(&format!("<a href=\"{}\">", escape_html(href)));
        close.push("</a>".to_string());
    }

    let mut style = Vec::new();
    if let Some(color) = &marks.color {
        style.push(format!("color:{}", escape_html(color)));
    }
    if let Some(highlight) = &marks.highlight {
        style.push(format!("background-color:{}", escape_html(highlight)));
    }
    if !style.is_empty() {
        open.push_str(&format!("<span style=\"{}\">", style.join(";")));
        close.push("</span>".to_string());
    }

    for (on, tag) in [
        (marks.bold, "strong"),
        (marks.italic, "em"),
        (marks.underline, "u"),
        (marks.strikethrough, "s"),
    ] {
        if on {
            open.push_str(&format!("<{}>", tag));
            close.push(format!("</{}>", tag));
        }
    }

    out.push_str(&open);
    out.push_str(&escape_html(text));
    for tag in close.iter().rev() {
        out.push_str(tag);
    }
}

pub(super) fn serialize(blocks: &[TextBlock]) -> String {
    let mut out = String::new();
    let mut open_list: Option<&'static str> = None;

    for block in blocks {
        let list = list_tag(block.kind);
        if open_list != list {
            if let Some(tag) = open_list {
                out.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = list {
                out.push_str(&format!("<{}>", tag));
            }
            open_list = list;
        }

        let tag = block_tag(block.kind);
        if block.kind == TextKind::HorizontalRule {
            out.push_str("<hr>");
            continue;
        }

        match block.align {
            Some(align) => out.push_str(&format!("<{} style=\"text-align:{}\">", tag, align.as_str())),
            None => out.push_str(&format!("<{}>", tag)),
        }

        if block.inlines.is_empty() {
            out.push_str("<br>");
        }
        for inline in &block.inlines {
            serialize_inline(&mut out, inline);
        }

        out.push_str(&format!("</{}>", tag));
    }

    if let Some(tag) = open_list {
        out.push_str(&format!("</{}>", tag));
    }

    out
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

fn attribute_regex() -> &'static Regex {
    static ATTRIBUTE: OnceLock<Regex> = OnceLock::new();
    ATTRIBUTE.get_or_init(|| {
        Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
            .expect("attribute pattern is valid")
    })
}

/// A parsed opening tag
struct OpenTag {
    name: String,
    attributes: Vec<(String, String)>,
}

impl OpenTag {
    fn parse(source: &str) -> Self {
        let inner = source
            .trim_start_matches('<')
            .trim_end_matches('>')
            .trim_end_matches('/');
        let name_end = inner
            .find(|c: char| c.is_whitespace() || c == '/')
            .unwrap_or(inner.len());
        let name = inner[..name_end].to_ascii_lowercase();

        let attributes = attribute_regex()
            .captures_iter(&inner[name_end..])
            .map(|caps| {
                let key = caps[1].to_ascii_lowercase();
                let value = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .or_else(|| caps.get(4))
                    .map(|m| unescape_html(m.as_str()))
                    .unwrap_or_default();
                (key, value)
            })
            .collect();

        Self { name, attributes }
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// A declaration from the inline `style` attribute
    fn style(&self, property: &str) -> Option<String> {
        self.attr("style")?.split(';').find_map(|declaration| {
            let (key, value) = declaration.split_once(':')?;
            (key.trim().eq_ignore_ascii_case(property)).then(|| value.trim().to_string())
        })
        .filter(|value| !value.is_empty())
    }
}

/// An open inline element and the marks in effect inside it
struct InlineFrame {
    tag: String,
    marks: Marks,
}

#[derive(Default)]
struct Parser {
    blocks: Vec<TextBlock>,
    current: Option<TextBlock>,
    /// The current block came from an explicit tag, so keep it even if empty
    explicit: bool,
    frames: Vec<InlineFrame>,
    lists: Vec<TextKind>,
    quote_depth: usize,
    merge_tag: Option<(String, String)>,
}

impl Parser {
    fn marks(&self) -> Marks {
        self.frames.last().map(|frame| frame.marks.clone()).unwrap_or_default()
    }

    fn finish_block(&mut self) {
        if let Some(block) = self.current.take() {
            if self.explicit || !block.inlines.is_empty() {
                self.blocks.push(block);
            }
        }
        self.explicit = false;
        self.frames.clear();
        self.merge_tag = None;
    }

    fn start_block(&mut self, kind: TextKind, align: Option<TextAlign>) {
        self.finish_block();
        let mut block = TextBlock::new(kind);
        block.align = align;
        self.current = Some(block);
        self.explicit = true;
    }

    /// Kind for a paragraph-like block given the surrounding containers
    fn contextual_kind(&self, kind: TextKind) -> TextKind {
        if kind == TextKind::Paragraph && self.quote_depth > 0 {
            TextKind::Blockquote
        } else {
            kind
        }
    }

    fn ensure_block(&mut self) -> &mut TextBlock {
        if self.current.is_none() {
            let kind = self.contextual_kind(TextKind::Paragraph);
            self.current = Some(TextBlock::new(kind));
            self.explicit = false;
        }
        self.current.get_or_insert_with(TextBlock::default)
    }

    fn text(&mut self, raw: &str) {
        let text = unescape_html(raw);

        if let Some((_, placeholder)) = &mut self.merge_tag {
            placeholder.push_str(&text);
            return;
        }

        // Formatting whitespace between block tags
        if self.current.is_none() && text.trim().is_empty() {
            return;
        }

        let marks = self.marks();
        self.ensure_block().push_text(&text, &marks);
    }

    fn open(&mut self, source: &str) {
        let tag = OpenTag::parse(source);
        let align = tag.style("text-align").and_then(|value| TextAlign::parse(&value));

        match tag.name.as_str() {
            "p" | "div" => {
                let reuse_quote = self
                    .current
                    .as_ref()
                    .is_some_and(|block| block.kind == TextKind::Blockquote && block.inlines.is_empty());
                if reuse_quote {
                    if let Some(block) = self.current.as_mut() {
                        block.align = align.or(block.align);
                    }
                } else {
                    let kind = self.contextual_kind(TextKind::Paragraph);
                    self.start_block(kind, align);
                }
            }
            "h1" => self.start_block(TextKind::Heading1, align),
            "h2" => self.start_block(TextKind::Heading2, align),
            "h3" | "h4" | "h5" | "h6" => self.start_block(TextKind::Heading3, align),
            "blockquote" => {
                self.finish_block();
                self.quote_depth += 1;
                self.start_block(TextKind::Blockquote, align);
            }
            "ul" => {
                self.finish_block();
                self.lists.push(TextKind::BulletItem);
            }
            "ol" => {
                self.finish_block();
                self.lists.push(TextKind::OrderedItem);
            }
            "li" => {
                let kind = self.lists.last().copied().unwrap_or(TextKind::BulletItem);
                self.start_block(kind, align);
            }
            "hr" => {
                self.finish_block();
                self.blocks.push(TextBlock::new(TextKind::HorizontalRule));
            }
            "br" => {
                let has_content = self.current.as_ref().is_some_and(|block| !block.inlines.is_empty());
                if has_content {
                    let (kind, align) = self
                        .current
                        .as_ref()
                        .map(|block| (block.kind, block.align))
                        .unwrap_or_default();
                    self.start_block(kind, align);
                }
            }
            "span" if tag.attr(MERGE_TAG_ATTR).is_some() => {
                let id = tag.attr(MERGE_TAG_ATTR).unwrap_or_default().to_string();
                self.ensure_block();
                self.merge_tag = Some((id, String::new()));
            }
            "strong" | "b" | "em" | "i" | "u" | "s" | "strike" | "del" | "a" | "span" => {
                let mut marks = self.marks();
                match tag.name.as_str() {
                    "strong" | "b" => marks.bold = true,
                    "em" | "i" => marks.italic = true,
                    "u" => marks.underline = true,
                    "s" | "strike" | "del" => marks.strikethrough = true,
                    "a" => marks.link = tag.attr("href").map(str::to_string),
                    _ => {}
                }
                if let Some(color) = tag.style("color") {
                    marks.color = Some(color);
                }
                if let Some(highlight) = tag.style("background-color") {
                    marks.highlight = Some(highlight);
                }
                self.frames.push(InlineFrame {
                    tag: tag.name.clone(),
                    marks,
                });
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        let name = name.to_ascii_lowercase();

        match name.as_str() {
            "p" | "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "li" => self.finish_block(),
            "blockquote" => {
                self.finish_block();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            "ul" | "ol" => {
                self.finish_block();
                self.lists.pop();
            }
            "span" if self.merge_tag.is_some() => {
                if let Some((id, placeholder)) = self.merge_tag.take() {
                    self.ensure_block()
                        .inlines
                        .push(Inline::MergeTag { id, placeholder });
                }
            }
            _ => {
                if let Some(index) = self.frames.iter().rposition(|frame| frame.tag == name) {
                    self.frames.truncate(index);
                }
            }
        }
    }
}

pub(super) fn parse(html: &str) -> RichText {
    let mut parser = Parser::default();
    let mut lexer = Token::lexer(html);

    while let Some(token) = lexer.next() {
        match token {
            Ok(Token::Comment) => {}
            Ok(Token::Open(source)) => parser.open(source),
            Ok(Token::Close(name)) => parser.close(name),
            Ok(Token::Text(text)) => parser.text(text),
            // A stray `<` that does not start a tag
            Err(()) => parser.text(lexer.slice()),
        }
    }

    parser.finish_block();
    RichText::from_blocks(parser.blocks)
}
