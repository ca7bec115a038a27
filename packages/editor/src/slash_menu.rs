//! # Slash Commands
//!
//! Typing `/` in a rich-text editor opens a palette of block types and
//! merge tags, filtered by whatever word characters follow the slash.
//!
//! ```text
//!            "/" typed                 query edited
//!   Idle ─────────────────▶ MenuOpen ◀──────────────┐
//!    ▲                        │  │                  │
//!    │   Escape / click out   │  └──────────────────┘
//!    ├────────────────────────┤
//!    │   Enter (commit)       │
//!    └────────────────────────┘
//! ```

use mailcraft_blocks::{registry, BlockType, MergeTag};
use regex::Regex;
use std::sync::OnceLock;

/// Only this much text before the caret is searched for a trigger
const TRIGGER_WINDOW: usize = 50;

fn trigger_regex() -> &'static Regex {
    static TRIGGER: OnceLock<Regex> = OnceLock::new();
    TRIGGER.get_or_init(|| Regex::new(r"/([A-Za-z0-9_]*)$").expect("trigger pattern is valid"))
}

/// The query typed after an unfinished `/` command, if the text before the
/// caret ends with one
pub fn detect_trigger(text_before: &str) -> Option<String> {
    let skip = text_before.chars().count().saturating_sub(TRIGGER_WINDOW);
    let window: String = text_before.chars().skip(skip).collect();

    trigger_regex()
        .captures(&window)
        .map(|caps| caps[1].to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashCategory {
    Blocks,
    MergeTags,
}

impl SlashCategory {
    pub fn label(self) -> &'static str {
        match self {
            SlashCategory::Blocks => "Blocks",
            SlashCategory::MergeTags => "Merge Tags",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashAction {
    InsertBlock(BlockType),
    InsertMergeTag(MergeTag),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCandidate {
    pub category: SlashCategory,
    pub label: String,
    pub description: String,
    pub icon: &'static str,
    pub action: SlashAction,
}

impl SlashCandidate {
    fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.label.to_lowercase().contains(&query) || self.description.to_lowercase().contains(&query)
    }
}

/// Every block type in registry order, then every merge tag
pub fn candidates(merge_tags: &[MergeTag]) -> Vec<SlashCandidate> {
    let blocks = registry::all().iter().map(|entry| SlashCandidate {
        category: SlashCategory::Blocks,
        label: entry.label.to_string(),
        description: entry.description.to_string(),
        icon: entry.icon,
        action: SlashAction::InsertBlock(entry.block_type),
    });

    let tags = merge_tags.iter().map(|tag| SlashCandidate {
        category: SlashCategory::MergeTags,
        label: tag.label.clone(),
        description: tag.description.clone(),
        icon: "braces",
        action: SlashAction::InsertMergeTag(tag.clone()),
    });

    blocks.chain(tags).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SlashState {
    #[default]
    Idle,
    MenuOpen { query: String, selected: usize },
}

/// A committed command: remove `trigger_len` characters before the caret,
/// then perform `action`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCommit {
    pub trigger_len: usize,
    pub action: SlashAction,
}

#[derive(Debug, Clone)]
pub struct SlashMenu {
    candidates: Vec<SlashCandidate>,
    state: SlashState,
}

impl SlashMenu {
    pub fn new(merge_tags: &[MergeTag]) -> Self {
        Self {
            candidates: candidates(merge_tags),
            state: SlashState::Idle,
        }
    }

    pub fn state(&self) -> &SlashState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SlashState::MenuOpen { .. })
    }

    pub fn query(&self) -> Option<&str> {
        match &self.state {
            SlashState::MenuOpen { query, .. } => Some(query),
            SlashState::Idle => None,
        }
    }

    /// Candidates matching the current query; empty while idle
    pub fn filtered(&self) -> Vec<&SlashCandidate> {
        match self.query() {
            Some(query) => self.candidates.iter().filter(|c| c.matches(query)).collect(),
            None => Vec::new(),
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        match self.state {
            SlashState::MenuOpen { selected, .. } => Some(selected),
            SlashState::Idle => None,
        }
    }

    pub fn selected(&self) -> Option<&SlashCandidate> {
        let index = self.selected_index()?;
        self.filtered().get(index).copied()
    }

    /// Re-evaluate after the text before the caret changed
    pub fn on_text_changed(&mut self, text_before: &str) {
        let Some(query) = detect_trigger(text_before) else {
            if self.is_open() {
                tracing::debug!("Slash trigger gone - closing menu");
            }
            self.state = SlashState::Idle;
            return;
        };

        let unchanged = self.query() == Some(query.as_str());
        if !unchanged {
            self.state = SlashState::MenuOpen { query, selected: 0 };
        }
    }

    fn step(&mut self, forward: bool) {
        let count = self.filtered().len();
        if let SlashState::MenuOpen { selected, .. } = &mut self.state {
            if count == 0 {
                return;
            }
            *selected = if forward {
                (*selected + 1) % count
            } else {
                (*selected + count - 1) % count
            };
        }
    }

    pub fn arrow_down(&mut self) {
        self.step(true);
    }

    pub fn arrow_up(&mut self) {
        self.step(false);
    }

    /// Commit the highlighted candidate. With nothing to pick the menu just
    /// closes.
    pub fn enter(&mut self) -> Option<SlashCommit> {
        let commit = match (self.query(), self.selected()) {
            (Some(query), Some(candidate)) => Some(SlashCommit {
                trigger_len: 1 + query.chars().count(),
                action: candidate.action.clone(),
            }),
            _ => None,
        };

        self.state = SlashState::Idle;
        commit
    }

    pub fn escape(&mut self) {
        self.state = SlashState::Idle;
    }

    pub fn click_outside(&mut self) {
        self.state = SlashState::Idle;
    }
}
