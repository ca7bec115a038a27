//! Document wire format: a bare JSON array of `{id, type, props}` objects,
//! in render order. This is what stored drafts and campaigns hold in their
//! `body` field.

use crate::{Block, BlockError, BlockResult};
use serde_json::Value;

pub fn serialize_document(blocks: &[Block]) -> BlockResult<String> {
    Ok(serde_json::to_string(blocks)?)
}

pub fn parse_document(source: &str) -> BlockResult<Vec<Block>> {
    if source.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(source)?;
    if !value.is_array() {
        return Err(BlockError::NotAnArray);
    }

    Ok(serde_json::from_value(value)?)
}

/// Parse a stored document; anything unreadable loads as an empty document
/// so the editor can still open.
pub fn parse_document_lossy(source: &str) -> Vec<Block> {
    match parse_document(source) {
        Ok(blocks) => blocks,
        Err(err) => {
            tracing::warn!(error = %err, "Malformed stored document - loading empty");
            Vec::new()
        }
    }
}
