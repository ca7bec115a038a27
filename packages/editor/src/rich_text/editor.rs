use super::{Mark, Position, RichText, TextAlign, TextKind};
use crate::slash_menu::{SlashAction, SlashMenu};
use mailcraft_blocks::{BlockId, BlockProps, BlockType, MergeTag};

/// Which HTML prop of a block an editor is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RichTextField {
    /// `richtext.html`
    Body,
    /// `twocolumn.leftHtml`
    LeftColumn,
    /// `twocolumn.rightHtml`
    RightColumn,
}

impl RichTextField {
    pub fn prop_name(self) -> &'static str {
        match self {
            RichTextField::Body => "html",
            RichTextField::LeftColumn => "leftHtml",
            RichTextField::RightColumn => "rightHtml",
        }
    }

    /// The field's current HTML, or `None` if `props` has no such field
    pub fn read(self, props: &BlockProps) -> Option<&str> {
        match (self, props) {
            (RichTextField::Body, BlockProps::RichText(p)) => Some(&p.html),
            (RichTextField::LeftColumn, BlockProps::TwoColumn(p)) => Some(&p.left_html),
            (RichTextField::RightColumn, BlockProps::TwoColumn(p)) => Some(&p.right_html),
            _ => None,
        }
    }

    /// A copy of `props` with the field replaced
    pub fn write(self, props: &BlockProps, html: String) -> Option<BlockProps> {
        let mut props = props.clone();
        match (self, &mut props) {
            (RichTextField::Body, BlockProps::RichText(p)) => p.html = html,
            (RichTextField::LeftColumn, BlockProps::TwoColumn(p)) => p.left_html = html,
            (RichTextField::RightColumn, BlockProps::TwoColumn(p)) => p.right_html = html,
            _ => return None,
        }
        Some(props)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Delete,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

/// A rich-text editor open on one block field, with its own caret and
/// slash menu
#[derive(Debug, Clone)]
pub struct TextEditor {
    block_id: BlockId,
    field: RichTextField,
    text: RichText,
    caret: Position,
    anchor: Option<Position>,
    slash: SlashMenu,
}

impl TextEditor {
    pub fn new(block_id: BlockId, field: RichTextField, html: &str, merge_tags: &[MergeTag]) -> Self {
        let text = RichText::from_html(html);
        let caret = text.end();
        Self {
            block_id,
            field,
            text,
            caret,
            anchor: None,
            slash: SlashMenu::new(merge_tags),
        }
    }

    pub fn block_id(&self) -> &BlockId {
        &self.block_id
    }

    pub fn field(&self) -> RichTextField {
        self.field
    }

    pub fn rich_text(&self) -> &RichText {
        &self.text
    }

    pub fn slash_menu(&self) -> &SlashMenu {
        &self.slash
    }

    pub fn caret(&self) -> Position {
        self.caret
    }

    pub fn html(&self) -> String {
        self.text.to_html()
    }

    /// Ordered selection bounds; collapsed when nothing is selected
    pub fn selection(&self) -> (Position, Position) {
        let anchor = self.anchor.unwrap_or(self.caret);
        if anchor <= self.caret {
            (anchor, self.caret)
        } else {
            (self.caret, anchor)
        }
    }

    pub fn set_caret(&mut self, pos: Position) {
        self.caret = self.text.clamp(pos);
        self.anchor = None;
        self.refresh_slash();
    }

    pub fn select(&mut self, anchor: Position, head: Position) {
        self.anchor = Some(self.text.clamp(anchor));
        self.caret = self.text.clamp(head);
        self.refresh_slash();
    }

    fn refresh_slash(&mut self) {
        let before = self.text.text_before(self.caret);
        self.slash.on_text_changed(&before);
    }

    /// Remove the selection, leaving a collapsed caret
    fn delete_selection(&mut self) -> bool {
        let (from, to) = self.selection();
        self.anchor = None;
        if from == to {
            return false;
        }
        self.caret = self.text.delete(from, to);
        true
    }

    /// Typed or pasted text, replacing any selection
    pub fn input(&mut self, text: &str) {
        self.delete_selection();
        self.caret = self.text.insert_text(self.caret, text);
        self.refresh_slash();
    }

    /// Handle a key press. While the slash menu is open it takes the
    /// navigation keys. Returns the block type the host should insert after
    /// this block when a block command was committed.
    pub fn key(&mut self, key: Key) -> Option<BlockType> {
        if self.slash.is_open() {
            match key {
                Key::ArrowDown => {
                    self.slash.arrow_down();
                    return None;
                }
                Key::ArrowUp => {
                    self.slash.arrow_up();
                    return None;
                }
                Key::Escape => {
                    self.slash.escape();
                    return None;
                }
                Key::Enter => return self.commit_slash(),
                _ => {}
            }
        }

        match key {
            Key::Enter => {
                self.delete_selection();
                self.caret = self.text.split_block(self.caret);
            }
            Key::Backspace => {
                if !self.delete_selection() {
                    let from = self.text.step_back(self.caret);
                    self.caret = self.text.delete(from, self.caret);
                }
            }
            Key::Delete => {
                if !self.delete_selection() {
                    let to = self.text.step_forward(self.caret);
                    self.caret = self.text.delete(self.caret, to);
                }
            }
            Key::ArrowLeft => {
                let (from, _) = self.selection();
                self.caret = if self.anchor.take().is_some() { from } else { self.text.step_back(self.caret) };
            }
            Key::ArrowRight => {
                let (_, to) = self.selection();
                self.caret = if self.anchor.take().is_some() { to } else { self.text.step_forward(self.caret) };
            }
            Key::ArrowUp | Key::ArrowDown | Key::Escape => return None,
        }

        self.refresh_slash();
        None
    }

    fn commit_slash(&mut self) -> Option<BlockType> {
        let commit = self.slash.enter()?;

        let from = Position::new(self.caret.block, self.caret.offset.saturating_sub(commit.trigger_len));
        self.anchor = None;
        self.caret = self.text.delete(from, self.caret);

        match commit.action {
            SlashAction::InsertMergeTag(tag) => {
                self.caret = self.text.insert_merge_tag(self.caret, &tag);
                None
            }
            SlashAction::InsertBlock(block_type) => Some(block_type),
        }
    }

    pub fn click_outside(&mut self) {
        self.slash.click_outside();
    }

    pub fn toggle_mark(&mut self, mark: Mark) {
        let (from, to) = self.selection();
        self.text.toggle_mark(from, to, mark);
    }

    pub fn set_color(&mut self, color: Option<&str>) {
        let (from, to) = self.selection();
        self.text.set_color(from, to, color);
    }

    pub fn set_highlight(&mut self, color: Option<&str>) {
        let (from, to) = self.selection();
        self.text.set_highlight(from, to, color);
    }

    pub fn set_link(&mut self, href: Option<&str>) {
        let (from, to) = self.selection();
        self.text.set_link(from, to, href);
    }

    /// Change the kind of every block the selection touches
    pub fn set_kind(&mut self, kind: TextKind) {
        let (from, to) = self.selection();
        for block in from.block..=to.block {
            self.text.set_kind(block, kind);
        }
        self.caret = self.text.clamp(self.caret);
        self.anchor = self.anchor.map(|anchor| self.text.clamp(anchor));
    }

    pub fn set_alignment(&mut self, align: Option<TextAlign>) {
        let (from, to) = self.selection();
        for block in from.block..=to.block {
            self.text.set_alignment(block, align);
        }
    }

    pub fn insert_rule(&mut self) {
        self.delete_selection();
        self.caret = self.text.insert_rule(self.caret);
        self.refresh_slash();
    }

    pub fn insert_merge_tag(&mut self, tag: &MergeTag) {
        self.delete_selection();
        self.caret = self.text.insert_merge_tag(self.caret, tag);
        self.refresh_slash();
    }
}
