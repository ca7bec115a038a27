//! # Mailcraft Editor
//!
//! Editing engine for block-based marketing emails.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ blocks: registry, typed props, JSON codec   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document + mutations                │
//! │  - Pure document operations                 │
//! │  - EditSession controller (select, drag,    │
//! │    insertion points, rich-text editing)     │
//! │  - Slash commands, snippets                 │
//! │  - Campaign composer + debounced auto-save  │
//! └─────────────────────────────────────────────┘
//!          ↓                          ↓
//! ┌──────────────────────┐  ┌──────────────────────┐
//! │ compiler-html        │  │ store: REST backend  │
//! │ blocks → email HTML  │  │ snippets, campaigns  │
//! └──────────────────────┘  └──────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Blocks are the source of truth**: compiled HTML is a derived view
//! 2. **Operations are pure**: each returns a new document; a missing target
//!    is a logged no-op, never an error
//! 3. **One change tracker**: document edits and campaign fields share a
//!    revision counter that drives auto-save
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mailcraft_blocks::BlockType;
//! use mailcraft_compiler_html::CompileOptions;
//! use mailcraft_editor::EditSession;
//!
//! let mut session = EditSession::with_clock();
//! let header = session.add_block(BlockType::Header).unwrap();
//! session.duplicate(header.as_str());
//!
//! let html = session.compile(&CompileOptions::default());
//! ```

mod autosave;
mod composer;
mod document;
mod errors;
mod mutations;
pub mod rich_text;
mod session;
pub mod slash_menu;
mod snippets;
mod toasts;

pub use autosave::{AutoSave, SaveOutcome, DEFAULT_AUTOSAVE_DELAY};
pub use composer::CampaignComposer;
pub use document::Document;
pub use errors::{EditorError, EditorResult};
pub use mutations::Mutation;
pub use rich_text::{Key, Mark, Position, RichText, RichTextField, TextAlign, TextEditor, TextKind};
pub use session::{ChangeTracker, EditSession};
pub use slash_menu::{SlashAction, SlashCandidate, SlashCategory, SlashMenu, SlashState};
pub use snippets::{category_label, SnippetLibrary, DEFAULT_CATEGORY};
pub use toasts::{Toast, ToastKind, Toasts};
