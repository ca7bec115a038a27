//! Error types for the editor

use mailcraft_blocks::{BlockError, BlockId};
use mailcraft_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Document error: {0}")]
    Document(#[from] BlockError),

    #[error("Persistence error: {0}")]
    Store(#[from] StoreError),

    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("No block is selected")]
    NoSelection,

    #[error("Block {id} has no rich-text field `{field}`")]
    NotRichText { id: BlockId, field: String },

    #[error("No rich-text editor is open")]
    NoOpenEditor,

    #[error("Snippet not found: {0}")]
    SnippetNotFound(String),
}

pub type EditorResult<T> = Result<T, EditorError>;
