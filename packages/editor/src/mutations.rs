//! # Document Mutations
//!
//! Every change the editor makes to a document, as data. The session
//! records each mutation it applies, which keeps edits traceable and lets
//! a sequence of edits be replayed against another document.
//!
//! ## Semantics
//!
//! ### Insert
//! - New blocks always get a fresh id from the caller's [`IdSource`]
//! - Indices are clamped into range
//!
//! ### Move
//! - Equal or out-of-range indices leave the document unchanged
//!
//! ### UpdateProps
//! - Wholesale replacement, last write wins
//! - A replacement of a different block type is ignored
//!
//! ### Delete / Duplicate
//! - Missing targets are no-ops

use crate::Document;
use mailcraft_blocks::{Block, BlockId, BlockProps, BlockType, IdSource};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mutation {
    Append {
        block_type: BlockType,
    },

    InsertAt {
        index: usize,
        block_type: BlockType,
    },

    InsertAfter {
        after_id: BlockId,
        block_type: BlockType,
    },

    MoveBlock {
        from_index: usize,
        to_index: usize,
    },

    Duplicate {
        block_id: BlockId,
    },

    Delete {
        block_id: BlockId,
    },

    /// Typed replacement from the property panel or the rich-text editor
    UpdateProps {
        block_id: BlockId,
        #[serde(with = "typed_props")]
        props: BlockProps,
    },

    /// Untyped replacement, decoded against the target block's type
    UpdatePropsJson {
        block_id: BlockId,
        props: Map<String, Value>,
    },

    /// Snippet insertion; the blocks are re-identified on apply
    InsertBlocks {
        index: usize,
        blocks: Vec<Block>,
    },
}

impl Mutation {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::Append { .. } => "append",
            Mutation::InsertAt { .. } => "insertAt",
            Mutation::InsertAfter { .. } => "insertAfter",
            Mutation::MoveBlock { .. } => "moveBlock",
            Mutation::Duplicate { .. } => "duplicate",
            Mutation::Delete { .. } => "delete",
            Mutation::UpdateProps { .. } => "updateProps",
            Mutation::UpdatePropsJson { .. } => "updatePropsJson",
            Mutation::InsertBlocks { .. } => "insertBlocks",
        }
    }

    /// The block this mutation targets, if it names one
    pub fn target(&self) -> Option<&BlockId> {
        match self {
            Mutation::InsertAfter { after_id, .. } => Some(after_id),
            Mutation::Duplicate { block_id }
            | Mutation::Delete { block_id }
            | Mutation::UpdateProps { block_id, .. }
            | Mutation::UpdatePropsJson { block_id, .. } => Some(block_id),
            _ => None,
        }
    }

    /// Apply to a document, producing the next document
    pub fn apply(&self, doc: &Document, ids: &mut impl IdSource) -> Document {
        debug!(mutation = self.kind(), "Applying mutation");

        match self {
            Mutation::Append { block_type } => doc.append(*block_type, ids),

            Mutation::InsertAt { index, block_type } => doc.insert_at(*index, *block_type, ids),

            Mutation::InsertAfter { after_id, block_type } => {
                doc.insert_after(after_id.as_str(), *block_type, ids)
            }

            Mutation::MoveBlock { from_index, to_index } => doc.move_block(*from_index, *to_index),

            Mutation::Duplicate { block_id } => doc.duplicate(block_id.as_str(), ids),

            Mutation::Delete { block_id } => doc.delete(block_id.as_str()),

            Mutation::UpdateProps { block_id, props } => doc.update_props(block_id.as_str(), props.clone()),

            Mutation::UpdatePropsJson { block_id, props } => Self::apply_props_json(doc, block_id, props),

            Mutation::InsertBlocks { index, blocks } => doc.insert_blocks(*index, blocks, ids),
        }
    }

    fn apply_props_json(doc: &Document, block_id: &BlockId, props: &Map<String, Value>) -> Document {
        let Some(block) = doc.get(block_id.as_str()) else {
            debug!(block_id = %block_id, "Update target not found");
            return doc.clone();
        };

        match BlockProps::try_from_json(block.type_name(), props.clone()) {
            Ok(decoded) => doc.update_props(block_id.as_str(), decoded),
            Err(err) => {
                warn!(block_id = %block_id, error = %err, "Rejected undecodable props update");
                doc.clone()
            }
        }
    }
}

/// `BlockProps` on the wire as `{type, props}`
mod typed_props {
    use mailcraft_blocks::BlockProps;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::{Map, Value};

    #[derive(Serialize, Deserialize)]
    struct Tagged {
        #[serde(rename = "type")]
        type_name: String,
        #[serde(default)]
        props: Map<String, Value>,
    }

    pub fn serialize<S: Serializer>(props: &BlockProps, serializer: S) -> Result<S::Ok, S::Error> {
        Tagged {
            type_name: props.type_name().to_string(),
            props: props.to_json().map_err(serde::ser::Error::custom)?,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BlockProps, D::Error> {
        let tagged = Tagged::deserialize(deserializer)?;
        BlockProps::try_from_json(&tagged.type_name, tagged.props).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_blocks::{SequentialIds, SpacerProps};
    use serde_json::json;

    fn two_blocks(ids: &mut SequentialIds) -> Document {
        Document::new()
            .append(BlockType::Spacer, ids)
            .append(BlockType::Cta, ids)
    }

    #[test]
    fn test_apply_matches_document_ops() {
        let mut ids = SequentialIds::from_seed("m");
        let doc = two_blocks(&mut ids);

        let moved = Mutation::MoveBlock { from_index: 0, to_index: 1 }.apply(&doc, &mut ids);
        assert_eq!(moved, doc.move_block(0, 1));

        let first = doc.blocks()[0].id.clone();
        let deleted = Mutation::Delete { block_id: first }.apply(&doc, &mut ids);
        assert_eq!(deleted.len(), 1);
    }

    #[test]
    fn test_update_props_json_decodes_against_block_type() {
        let mut ids = SequentialIds::from_seed("m");
        let doc = two_blocks(&mut ids);
        let spacer = doc.blocks()[0].id.clone();

        let updated = Mutation::UpdatePropsJson {
            block_id: spacer.clone(),
            props: json!({ "height": "48px" }).as_object().cloned().unwrap(),
        }
        .apply(&doc, &mut ids);

        assert_eq!(
            updated.get(spacer.as_str()).unwrap().props,
            BlockProps::Spacer(SpacerProps {
                height: 48,
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_update_props_json_rejects_garbage() {
        let mut ids = SequentialIds::from_seed("m");
        let doc = two_blocks(&mut ids);
        let spacer = doc.blocks()[0].id.clone();

        let updated = Mutation::UpdatePropsJson {
            block_id: spacer,
            props: json!({ "height": "tall" }).as_object().cloned().unwrap(),
        }
        .apply(&doc, &mut ids);

        assert_eq!(updated, doc);
    }

    #[test]
    fn test_mutation_wire_format() {
        let mutation = Mutation::UpdateProps {
            block_id: BlockId::new("blk-1"),
            props: BlockProps::Spacer(SpacerProps {
                height: 12,
                ..Default::default()
            }),
        };

        let value = serde_json::to_value(&mutation).unwrap();
        assert_eq!(value["kind"], "updateProps");
        assert_eq!(value["blockId"], "blk-1");
        assert_eq!(value["props"]["type"], "spacer");
        assert_eq!(value["props"]["props"]["height"], 12);

        let back: Mutation = serde_json::from_value(value).unwrap();
        assert_eq!(back, mutation);

        let moved = serde_json::to_value(Mutation::MoveBlock { from_index: 2, to_index: 0 }).unwrap();
        assert_eq!(moved, json!({ "kind": "moveBlock", "fromIndex": 2, "toIndex": 0 }));
    }
}
