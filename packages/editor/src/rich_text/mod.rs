//! # Rich Text
//!
//! The model behind the text and column blocks: a list of text blocks, each
//! holding runs of marked text and merge-tag atoms.
//!
//! Positions are `(block, offset)` pairs. Offsets count characters, and a
//! merge-tag atom counts as a single character no matter how long its
//! placeholder is.
//!
//! The serialized form ([`RichText::to_html`]) is what block props store;
//! [`RichText::from_html`] reads it back.

mod editor;
mod html;

pub use editor::{Key, RichTextField, TextEditor};

use mailcraft_blocks::MergeTag;

/// Stands in for a merge-tag atom in [`RichText::text_before`]
pub const ATOM_CHAR: char = '\u{FFFC}';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub block: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextKind {
    #[default]
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Blockquote,
    BulletItem,
    OrderedItem,
    HorizontalRule,
}

impl TextKind {
    pub fn is_heading(self) -> bool {
        matches!(self, TextKind::Heading1 | TextKind::Heading2 | TextKind::Heading3)
    }

    /// Kind of the block created by splitting this one
    fn continuation(self) -> TextKind {
        match self {
            TextKind::BulletItem | TextKind::OrderedItem | TextKind::Blockquote => self,
            _ => TextKind::Paragraph,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            "justify" => Some(TextAlign::Justify),
            _ => None,
        }
    }
}

/// Toggleable formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

/// Formatting carried by a run of text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub color: Option<String>,
    pub highlight: Option<String>,
    pub link: Option<String>,
}

impl Marks {
    pub fn has(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
            Mark::Strikethrough => self.strikethrough,
        }
    }

    pub fn set(&mut self, mark: Mark, on: bool) {
        match mark {
            Mark::Bold => self.bold = on,
            Mark::Italic => self.italic = on,
            Mark::Underline => self.underline = on,
            Mark::Strikethrough => self.strikethrough = on,
        }
    }

    /// Marks that typed text picks up from its neighbour
    fn inherited(&self) -> Marks {
        Marks {
            link: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text { text: String, marks: Marks },
    MergeTag { id: String, placeholder: String },
}

impl Inline {
    pub fn len(&self) -> usize {
        match self {
            Inline::Text { text, .. } => text.chars().count(),
            Inline::MergeTag { .. } => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBlock {
    pub kind: TextKind,
    pub align: Option<TextAlign>,
    pub inlines: Vec<Inline>,
}

/// One character position inside a block
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Char(char, Marks),
    Atom { id: String, placeholder: String },
}

impl TextBlock {
    pub fn new(kind: TextKind) -> Self {
        Self {
            kind,
            align: None,
            inlines: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inlines.iter().map(Inline::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn plain_text(&self) -> String {
        self.inlines
            .iter()
            .map(|inline| match inline {
                Inline::Text { text, .. } => text.as_str(),
                Inline::MergeTag { placeholder, .. } => placeholder.as_str(),
            })
            .collect()
    }

    fn cells(&self) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(self.len());
        for inline in &self.inlines {
            match inline {
                Inline::Text { text, marks } => {
                    cells.extend(text.chars().map(|c| Cell::Char(c, marks.clone())));
                }
                Inline::MergeTag { id, placeholder } => cells.push(Cell::Atom {
                    id: id.clone(),
                    placeholder: placeholder.clone(),
                }),
            }
        }
        cells
    }

    fn with_cells(kind: TextKind, align: Option<TextAlign>, cells: Vec<Cell>) -> Self {
        let mut block = TextBlock::new(kind);
        block.align = align;
        for cell in cells {
            match cell {
                Cell::Char(c, marks) => block.push_char(c, marks),
                Cell::Atom { id, placeholder } => block.inlines.push(Inline::MergeTag { id, placeholder }),
            }
        }
        block
    }

    /// Append a character, extending the last run when the marks match
    pub(crate) fn push_char(&mut self, c: char, marks: Marks) {
        if let Some(Inline::Text { text, marks: last }) = self.inlines.last_mut() {
            if *last == marks {
                text.push(c);
                return;
            }
        }
        self.inlines.push(Inline::Text {
            text: c.to_string(),
            marks,
        });
    }

    pub(crate) fn push_text(&mut self, text: &str, marks: &Marks) {
        for c in text.chars() {
            self.push_char(c, marks.clone());
        }
    }
}

/// A rich-text document. Always holds at least one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichText {
    blocks: Vec<TextBlock>,
}

impl Default for RichText {
    fn default() -> Self {
        Self::new()
    }
}

impl RichText {
    /// A single empty paragraph
    pub fn new() -> Self {
        Self {
            blocks: vec![TextBlock::new(TextKind::Paragraph)],
        }
    }

    pub fn from_blocks(blocks: Vec<TextBlock>) -> Self {
        if blocks.is_empty() {
            return Self::new();
        }
        Self { blocks }
    }

    pub fn from_html(html: &str) -> Self {
        html::parse(html)
    }

    pub fn to_html(&self) -> String {
        html::serialize(&self.blocks)
    }

    pub fn blocks(&self) -> &[TextBlock] {
        &self.blocks
    }

    pub fn start(&self) -> Position {
        Position::new(0, 0)
    }

    pub fn end(&self) -> Position {
        let last = self.blocks.len() - 1;
        Position::new(last, self.blocks[last].len())
    }

    /// Pull a position back inside the document
    pub fn clamp(&self, pos: Position) -> Position {
        let block = pos.block.min(self.blocks.len() - 1);
        Position::new(block, pos.offset.min(self.blocks[block].len()))
    }

    fn ordered(&self, a: Position, b: Position) -> (Position, Position) {
        let (a, b) = (self.clamp(a), self.clamp(b));
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Move a caret one character left, crossing block boundaries
    pub fn step_back(&self, pos: Position) -> Position {
        let pos = self.clamp(pos);
        if pos.offset > 0 {
            Position::new(pos.block, pos.offset - 1)
        } else if pos.block > 0 {
            Position::new(pos.block - 1, self.blocks[pos.block - 1].len())
        } else {
            pos
        }
    }

    /// Move a caret one character right, crossing block boundaries
    pub fn step_forward(&self, pos: Position) -> Position {
        let pos = self.clamp(pos);
        if pos.offset < self.blocks[pos.block].len() {
            Position::new(pos.block, pos.offset + 1)
        } else if pos.block + 1 < self.blocks.len() {
            Position::new(pos.block + 1, 0)
        } else {
            pos
        }
    }

    /// Text cannot live in a rule; move the caret to a paragraph after it
    fn writable(&mut self, pos: Position) -> Position {
        let pos = self.clamp(pos);
        if self.blocks[pos.block].kind != TextKind::HorizontalRule {
            return pos;
        }

        let next = pos.block + 1;
        let reusable = self
            .blocks
            .get(next)
            .is_some_and(|block| block.kind != TextKind::HorizontalRule && block.is_empty());
        if !reusable {
            self.blocks.insert(next, TextBlock::new(TextKind::Paragraph));
        }
        Position::new(next, 0)
    }

    /// Insert text at `pos`; newlines split the block. Returns the caret
    /// after the inserted text.
    pub fn insert_text(&mut self, pos: Position, text: &str) -> Position {
        let mut pos = self.writable(pos);

        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                pos = self.split_block(pos);
            }
            if line.is_empty() {
                continue;
            }

            let block = &self.blocks[pos.block];
            let (kind, align) = (block.kind, block.align);
            let mut cells = block.cells();
            let marks = cells[..pos.offset]
                .iter()
                .rev()
                .chain(cells[pos.offset..].iter())
                .find_map(|cell| match cell {
                    Cell::Char(_, marks) => Some(marks.inherited()),
                    Cell::Atom { .. } => None,
                })
                .unwrap_or_default();

            let tail = cells.split_off(pos.offset);
            let before = cells.len();
            cells.extend(line.chars().map(|c| Cell::Char(c, marks.clone())));
            let count = cells.len() - before;
            cells.extend(tail);

            self.blocks[pos.block] = TextBlock::with_cells(kind, align, cells);
            pos.offset += count;
        }

        pos
    }

    /// Remove everything between two positions, joining blocks when the
    /// range spans more than one. Returns the collapsed caret.
    pub fn delete(&mut self, from: Position, to: Position) -> Position {
        let (from, to) = self.ordered(from, to);
        if from == to {
            return from;
        }

        let first = &self.blocks[from.block];
        let last = &self.blocks[to.block];

        let mut cells = first.cells();
        cells.truncate(from.offset);
        cells.extend(last.cells().into_iter().skip(to.offset));

        let (kind, align) = if first.kind == TextKind::HorizontalRule {
            (last.kind, last.align)
        } else {
            (first.kind, first.align)
        };

        let joined = TextBlock::with_cells(kind, align, cells);
        self.blocks.drain(from.block..=to.block);
        self.blocks.insert(from.block, joined);

        if kind == TextKind::HorizontalRule {
            Position::new(from.block, 0)
        } else {
            from
        }
    }

    /// Split the block at `pos`. Returns the start of the new block.
    pub fn split_block(&mut self, pos: Position) -> Position {
        let pos = self.clamp(pos);
        let block = &self.blocks[pos.block];

        if block.kind == TextKind::HorizontalRule {
            self.blocks.insert(pos.block + 1, TextBlock::new(TextKind::Paragraph));
            return Position::new(pos.block + 1, 0);
        }

        let mut left = block.cells();
        let right = left.split_off(pos.offset);
        let (kind, align) = (block.kind, block.align);

        self.blocks[pos.block] = TextBlock::with_cells(kind, align, left);
        self.blocks
            .insert(pos.block + 1, TextBlock::with_cells(kind.continuation(), align, right));
        Position::new(pos.block + 1, 0)
    }

    /// Apply `edit` to the marks of every character in the range
    fn edit_marks(&mut self, from: Position, to: Position, mut edit: impl FnMut(&mut Marks)) {
        let (from, to) = self.ordered(from, to);

        for index in from.block..=to.block {
            let block = &self.blocks[index];
            let start = if index == from.block { from.offset } else { 0 };
            let end = if index == to.block { to.offset } else { block.len() };
            let (kind, align) = (block.kind, block.align);

            let mut cells = block.cells();
            for cell in &mut cells[start..end] {
                if let Cell::Char(_, marks) = cell {
                    edit(marks);
                }
            }
            self.blocks[index] = TextBlock::with_cells(kind, align, cells);
        }
    }

    fn all_marked(&self, from: Position, to: Position, mark: Mark) -> bool {
        let (from, to) = self.ordered(from, to);
        let mut any = false;

        for index in from.block..=to.block {
            let block = &self.blocks[index];
            let start = if index == from.block { from.offset } else { 0 };
            let end = if index == to.block { to.offset } else { block.len() };

            for cell in &block.cells()[start..end] {
                if let Cell::Char(_, marks) = cell {
                    if !marks.has(mark) {
                        return false;
                    }
                    any = true;
                }
            }
        }

        any
    }

    /// Turn `mark` off over the range when every character already has
    /// it, on otherwise. A collapsed range changes nothing.
    pub fn toggle_mark(&mut self, from: Position, to: Position, mark: Mark) {
        let on = !self.all_marked(from, to, mark);
        self.edit_marks(from, to, |marks| marks.set(mark, on));
    }

    pub fn set_color(&mut self, from: Position, to: Position, color: Option<&str>) {
        self.edit_marks(from, to, |marks| marks.color = color.map(str::to_string));
    }

    pub fn set_highlight(&mut self, from: Position, to: Position, color: Option<&str>) {
        self.edit_marks(from, to, |marks| marks.highlight = color.map(str::to_string));
    }

    pub fn set_link(&mut self, from: Position, to: Position, href: Option<&str>) {
        self.edit_marks(from, to, |marks| marks.link = href.map(str::to_string));
    }

    pub fn set_kind(&mut self, block: usize, kind: TextKind) {
        if let Some(block) = self.blocks.get_mut(block) {
            block.kind = kind;
            if kind == TextKind::HorizontalRule {
                block.inlines.clear();
            }
        }
    }

    pub fn set_alignment(&mut self, block: usize, align: Option<TextAlign>) {
        if let Some(block) = self.blocks.get_mut(block) {
            block.align = align;
        }
    }

    /// Insert a horizontal rule at `pos`, splitting the block around it.
    /// Returns the start of the block after the rule.
    pub fn insert_rule(&mut self, pos: Position) -> Position {
        let pos = self.clamp(pos);
        let block = &self.blocks[pos.block];

        if block.kind == TextKind::HorizontalRule {
            self.blocks.insert(pos.block + 1, TextBlock::new(TextKind::HorizontalRule));
            return self.writable(Position::new(pos.block + 1, 0));
        }

        let mut left = block.cells();
        let right = left.split_off(pos.offset);
        let (kind, align) = (block.kind, block.align);

        let mut replacement = Vec::with_capacity(3);
        if !left.is_empty() {
            replacement.push(TextBlock::with_cells(kind, align, left));
        }
        replacement.push(TextBlock::new(TextKind::HorizontalRule));
        let after_kind = if replacement.len() > 1 { kind.continuation() } else { kind };
        replacement.push(TextBlock::with_cells(after_kind, align, right));

        let after = pos.block + replacement.len() - 1;
        self.blocks.splice(pos.block..=pos.block, replacement);
        Position::new(after, 0)
    }

    /// Insert a merge-tag atom. Returns the caret after it.
    pub fn insert_merge_tag(&mut self, pos: Position, tag: &MergeTag) -> Position {
        let pos = self.writable(pos);
        let block = &self.blocks[pos.block];
        let (kind, align) = (block.kind, block.align);

        let mut cells = block.cells();
        cells.insert(
            pos.offset,
            Cell::Atom {
                id: tag.id.clone(),
                placeholder: tag.placeholder.clone(),
            },
        );

        self.blocks[pos.block] = TextBlock::with_cells(kind, align, cells);
        Position::new(pos.block, pos.offset + 1)
    }

    /// The block's text up to the caret, atoms as [`ATOM_CHAR`]
    pub fn text_before(&self, pos: Position) -> String {
        let pos = self.clamp(pos);
        self.blocks[pos.block]
            .cells()
            .iter()
            .take(pos.offset)
            .map(|cell| match cell {
                Cell::Char(c, _) => *c,
                Cell::Atom { .. } => ATOM_CHAR,
            })
            .collect()
    }

    /// All text, one line per block, atoms as their placeholders
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(TextBlock::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str) -> TextBlock {
        let mut block = TextBlock::new(TextKind::Paragraph);
        block.push_text(text, &Marks::default());
        block
    }

    #[test]
    fn test_insert_text_and_plain_text() {
        let mut doc = RichText::new();
        let caret = doc.insert_text(doc.start(), "Hello");
        let caret = doc.insert_text(caret, " world");

        assert_eq!(caret, Position::new(0, 11));
        assert_eq!(doc.plain_text(), "Hello world");
    }

    #[test]
    fn test_insert_newline_splits() {
        let mut doc = RichText::new();
        let caret = doc.insert_text(doc.start(), "one\ntwo");

        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(caret, Position::new(1, 3));
        assert_eq!(doc.plain_text(), "one\ntwo");
    }

    #[test]
    fn test_typed_text_inherits_marks() {
        let mut doc = RichText::from_blocks(vec![para("ab")]);
        doc.toggle_mark(Position::new(0, 0), Position::new(0, 2), Mark::Bold);
        doc.insert_text(Position::new(0, 2), "c");

        assert_eq!(doc.blocks()[0].inlines.len(), 1);
        match &doc.blocks()[0].inlines[0] {
            Inline::Text { text, marks } => {
                assert_eq!(text, "abc");
                assert!(marks.bold);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_toggle_mark_partial_then_full() {
        let mut doc = RichText::from_blocks(vec![para("hello")]);
        doc.toggle_mark(Position::new(0, 0), Position::new(0, 2), Mark::Italic);
        assert_eq!(doc.blocks()[0].inlines.len(), 2);

        // Mixed range turns the mark on everywhere
        doc.toggle_mark(Position::new(0, 0), Position::new(0, 5), Mark::Italic);
        assert_eq!(doc.blocks()[0].inlines.len(), 1);

        doc.toggle_mark(Position::new(0, 0), Position::new(0, 5), Mark::Italic);
        match &doc.blocks()[0].inlines[0] {
            Inline::Text { marks, .. } => assert_eq!(*marks, Marks::default()),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_delete_within_and_across_blocks() {
        let mut doc = RichText::from_blocks(vec![para("hello"), para("world")]);

        let caret = doc.delete(Position::new(0, 1), Position::new(0, 3));
        assert_eq!(caret, Position::new(0, 1));
        assert_eq!(doc.plain_text(), "hlo\nworld");

        let caret = doc.delete(Position::new(1, 2), Position::new(0, 2));
        assert_eq!(caret, Position::new(0, 2));
        assert_eq!(doc.plain_text(), "hlrld");
        assert_eq!(doc.blocks().len(), 1);
    }

    #[test]
    fn test_split_heading_continues_as_paragraph() {
        let mut block = para("Title");
        block.kind = TextKind::Heading2;
        let mut doc = RichText::from_blocks(vec![block]);

        let caret = doc.split_block(Position::new(0, 5));
        assert_eq!(caret, Position::new(1, 0));
        assert_eq!(doc.blocks()[1].kind, TextKind::Paragraph);

        let mut item = para("one");
        item.kind = TextKind::BulletItem;
        let mut list = RichText::from_blocks(vec![item]);
        list.split_block(Position::new(0, 3));
        assert_eq!(list.blocks()[1].kind, TextKind::BulletItem);
    }

    #[test]
    fn test_merge_tag_is_one_character() {
        let mut doc = RichText::from_blocks(vec![para("Hi !")]);
        let tag = MergeTag::new("first_name", "First Name");

        let caret = doc.insert_merge_tag(Position::new(0, 3), &tag);
        assert_eq!(caret, Position::new(0, 4));
        assert_eq!(doc.blocks()[0].len(), 5);
        assert_eq!(doc.plain_text(), "Hi {{first_name}}!");
        assert_eq!(doc.text_before(caret), format!("Hi {}", ATOM_CHAR));
    }

    #[test]
    fn test_insert_rule_splits_block() {
        let mut doc = RichText::from_blocks(vec![para("abcd")]);
        let caret = doc.insert_rule(Position::new(0, 2));

        let kinds: Vec<_> = doc.blocks().iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![TextKind::Paragraph, TextKind::HorizontalRule, TextKind::Paragraph]
        );
        assert_eq!(caret, Position::new(2, 0));
        assert_eq!(doc.plain_text(), "ab\n\ncd");
    }

    #[test]
    fn test_typing_on_rule_moves_to_next_paragraph() {
        let mut doc = RichText::from_blocks(vec![TextBlock::new(TextKind::HorizontalRule)]);
        let caret = doc.insert_text(Position::new(0, 0), "x");

        assert_eq!(caret, Position::new(1, 1));
        assert_eq!(doc.blocks()[0].kind, TextKind::HorizontalRule);
    }

    #[test]
    fn test_link_and_colors_over_range() {
        let mut doc = RichText::from_blocks(vec![para("click here")]);
        doc.set_link(Position::new(0, 6), Position::new(0, 10), Some("https://example.com"));
        doc.set_color(Position::new(0, 0), Position::new(0, 5), Some("#ff0000"));
        doc.set_highlight(Position::new(0, 0), Position::new(0, 5), Some("#ffff00"));

        let inlines = &doc.blocks()[0].inlines;
        assert_eq!(inlines.len(), 3);
        match (&inlines[0], &inlines[2]) {
            (Inline::Text { marks: first, .. }, Inline::Text { marks: last, .. }) => {
                assert_eq!(first.color.as_deref(), Some("#ff0000"));
                assert_eq!(first.highlight.as_deref(), Some("#ffff00"));
                assert_eq!(last.link.as_deref(), Some("https://example.com"));
            }
            other => panic!("unexpected inlines {:?}", other),
        }
    }

    #[test]
    fn test_step_across_blocks() {
        let doc = RichText::from_blocks(vec![para("ab"), para("c")]);
        assert_eq!(doc.step_forward(Position::new(0, 2)), Position::new(1, 0));
        assert_eq!(doc.step_back(Position::new(1, 0)), Position::new(0, 2));
        assert_eq!(doc.step_back(Position::new(0, 0)), Position::new(0, 0));
        assert_eq!(doc.end(), Position::new(1, 1));
    }
}
