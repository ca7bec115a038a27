//! # Email Document
//!
//! An ordered list of blocks. List order is render order; there is no
//! separate ordering field and no nesting.
//!
//! Every operation is a pure transformation: it borrows the current
//! document and returns the next one. Operations that target a missing id or
//! an invalid index return an unchanged copy instead of failing, so a stale
//! UI event can never corrupt the document.
//!
//! ## Invariants
//!
//! - Block ids are pairwise unique
//! - A block's type never changes after creation

use mailcraft_blocks::{
    parse_document_lossy, registry, serialize_document, Block, BlockId, BlockProps, BlockResult,
    BlockType, IdSource,
};
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from loaded blocks. Any block whose id was already used
    /// earlier in the list is re-identified with an id no other block holds.
    pub fn from_blocks(blocks: Vec<Block>, ids: &mut impl IdSource) -> Self {
        let mut taken: HashSet<BlockId> = blocks.iter().map(|block| block.id.clone()).collect();
        let mut seen = HashSet::new();
        let blocks = blocks
            .into_iter()
            .map(|block| {
                if seen.insert(block.id.clone()) {
                    block
                } else {
                    let fresh = unused_id(&taken, ids);
                    debug!(duplicate = %block.id, fresh = %fresh, "Re-identified duplicate block id");
                    taken.insert(fresh.clone());
                    block.with_id(fresh)
                }
            })
            .collect();

        Self { blocks }
    }

    /// Decode the stored JSON form; malformed input loads as empty
    pub fn from_json_lossy(source: &str, ids: &mut impl IdSource) -> Self {
        Self::from_blocks(parse_document_lossy(source), ids)
    }

    pub fn to_json(&self) -> BlockResult<String> {
        serialize_document(&self.blocks)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &BlockId> {
        self.blocks.iter().map(|block| &block.id)
    }

    fn live_ids(&self) -> HashSet<BlockId> {
        self.ids().cloned().collect()
    }

    /// Default block of `block_type` under an id not already in the document
    fn create(&self, block_type: BlockType, ids: &mut impl IdSource) -> Block {
        Block::new(unused_id(&self.live_ids(), ids), registry::describe_type(block_type).default_props())
    }

    fn with_spliced(&self, index: usize, inserted: Vec<Block>) -> Document {
        let index = index.min(self.blocks.len());
        let mut blocks = Vec::with_capacity(self.blocks.len() + inserted.len());
        blocks.extend_from_slice(&self.blocks[..index]);
        blocks.extend(inserted);
        blocks.extend_from_slice(&self.blocks[index..]);
        Document { blocks }
    }

    /// New default block at the end
    pub fn append(&self, block_type: BlockType, ids: &mut impl IdSource) -> Document {
        self.with_spliced(self.blocks.len(), vec![self.create(block_type, ids)])
    }

    /// New default block at `index`, clamped to `0..=len`
    pub fn insert_at(&self, index: usize, block_type: BlockType, ids: &mut impl IdSource) -> Document {
        self.with_spliced(index, vec![self.create(block_type, ids)])
    }

    /// New default block right after `after_id`, or at the end when that
    /// block no longer exists
    pub fn insert_after(&self, after_id: &str, block_type: BlockType, ids: &mut impl IdSource) -> Document {
        match self.index_of(after_id) {
            Some(index) => self.insert_at(index + 1, block_type, ids),
            None => {
                debug!(after_id, "Insert target not found - appending");
                self.append(block_type, ids)
            }
        }
    }

    /// Move the block at `from` so it ends up at `to`; everything else keeps
    /// its relative order
    pub fn move_block(&self, from: usize, to: usize) -> Document {
        let len = self.blocks.len();
        if from == to || from >= len || to >= len {
            debug!(from, to, len, "Move is a no-op");
            return self.clone();
        }

        let mut blocks = self.blocks.clone();
        let moved = blocks.remove(from);
        blocks.insert(to, moved);
        Document { blocks }
    }

    /// Copy of the block with a fresh id, placed right after it
    pub fn duplicate(&self, id: &str, ids: &mut impl IdSource) -> Document {
        let Some(index) = self.index_of(id) else {
            debug!(block_id = id, "Duplicate target not found");
            return self.clone();
        };

        let copy = self.blocks[index].with_id(unused_id(&self.live_ids(), ids));
        self.with_spliced(index + 1, vec![copy])
    }

    pub fn delete(&self, id: &str) -> Document {
        if !self.contains(id) {
            debug!(block_id = id, "Delete target not found");
            return self.clone();
        }

        Document {
            blocks: self.blocks.iter().filter(|block| block.id != id).cloned().collect(),
        }
    }

    /// Replace a block's props wholesale. Props of a different type are
    /// rejected since a block never changes type.
    pub fn update_props(&self, id: &str, props: BlockProps) -> Document {
        let Some(index) = self.index_of(id) else {
            debug!(block_id = id, "Update target not found");
            return self.clone();
        };

        if !self.blocks[index].props.same_type(&props) {
            debug!(
                block_id = id,
                block_type = %self.blocks[index].type_name(),
                props_type = %props.type_name(),
                "Props type mismatch - update ignored"
            );
            return self.clone();
        }

        let mut blocks = self.blocks.clone();
        blocks[index].props = props;
        Document { blocks }
    }

    /// Splice copies of `blocks` at `index` (clamped), each under a fresh id
    pub fn insert_blocks(&self, index: usize, blocks: &[Block], ids: &mut impl IdSource) -> Document {
        let mut taken = self.live_ids();
        let fresh = blocks
            .iter()
            .map(|block| {
                let id = unused_id(&taken, ids);
                taken.insert(id.clone());
                block.with_id(id)
            })
            .collect();
        self.with_spliced(index, fresh)
    }
}

/// Next id from `ids` that is not in `taken`. Ids loaded from storage can
/// coincide with ones the source has yet to hand out.
fn unused_id(taken: &HashSet<BlockId>, ids: &mut impl IdSource) -> BlockId {
    loop {
        let id = ids.next_id();
        if !taken.contains(&id) {
            return id;
        }
        debug!(block_id = %id, "Generated id already in use - skipping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_blocks::{CtaProps, DividerProps, SequentialIds};

    fn doc_of(types: &[BlockType], ids: &mut SequentialIds) -> Document {
        types.iter().fold(Document::new(), |doc, ty| doc.append(*ty, ids))
    }

    fn types(doc: &Document) -> Vec<BlockType> {
        doc.blocks().iter().filter_map(Block::block_type).collect()
    }

    #[test]
    fn test_append_and_insert_at_clamps() {
        let mut ids = SequentialIds::from_seed("t");
        let doc = doc_of(&[BlockType::Header, BlockType::Divider], &mut ids);

        let doc = doc.insert_at(99, BlockType::Spacer, &mut ids);
        let doc = doc.insert_at(0, BlockType::Cta, &mut ids);

        assert_eq!(
            types(&doc),
            vec![BlockType::Cta, BlockType::Header, BlockType::Divider, BlockType::Spacer]
        );
    }

    #[test]
    fn test_insert_after() {
        let mut ids = SequentialIds::from_seed("t");
        let doc = doc_of(&[BlockType::Header, BlockType::Divider], &mut ids);
        let first = doc.blocks()[0].id.clone();

        let doc = doc.insert_after(first.as_str(), BlockType::Image, &mut ids);
        assert_eq!(types(&doc), vec![BlockType::Header, BlockType::Image, BlockType::Divider]);
    }

    #[test]
    fn test_insert_after_missing_is_append() {
        let mut ids_a = SequentialIds::from_seed("t");
        let mut ids_b = SequentialIds::from_seed("t");
        let doc_a = doc_of(&[BlockType::Header, BlockType::Divider], &mut ids_a);
        let doc_b = doc_of(&[BlockType::Header, BlockType::Divider], &mut ids_b);

        let inserted = doc_a.insert_after("nonexistent-id", BlockType::Cta, &mut ids_a);
        let appended = doc_b.append(BlockType::Cta, &mut ids_b);
        assert_eq!(inserted, appended);
    }

    #[test]
    fn test_move_block() {
        let mut ids = SequentialIds::from_seed("t");
        let doc = doc_of(&[BlockType::Header, BlockType::Image, BlockType::Cta], &mut ids);

        assert_eq!(
            types(&doc.move_block(0, 2)),
            vec![BlockType::Image, BlockType::Cta, BlockType::Header]
        );
        assert_eq!(
            types(&doc.move_block(2, 0)),
            vec![BlockType::Cta, BlockType::Header, BlockType::Image]
        );
        assert_eq!(doc.move_block(1, 1), doc);
        assert_eq!(doc.move_block(0, 3), doc);
        assert_eq!(doc.move_block(5, 0), doc);
    }

    #[test]
    fn test_duplicate_middle_of_three() {
        let mut ids = SequentialIds::from_seed("t");
        let doc = doc_of(&[BlockType::Header, BlockType::Cta, BlockType::Divider], &mut ids);
        let middle = doc.blocks()[1].clone();

        let doc = doc.duplicate(middle.id.as_str(), &mut ids);

        assert_eq!(doc.len(), 4);
        assert_eq!(doc.blocks()[2].props, middle.props);
        assert_ne!(doc.blocks()[2].id, middle.id);
        assert_eq!(doc.blocks()[3].block_type(), Some(BlockType::Divider));
    }

    #[test]
    fn test_missing_ids_are_no_ops() {
        let mut ids = SequentialIds::from_seed("t");
        let doc = doc_of(&[BlockType::Header], &mut ids);

        assert_eq!(doc.duplicate("missing", &mut ids), doc);
        assert_eq!(doc.delete("missing"), doc);
        assert_eq!(doc.update_props("missing", BlockProps::Spacer(Default::default())), doc);
    }

    #[test]
    fn test_update_props_rejects_type_change() {
        let mut ids = SequentialIds::from_seed("t");
        let doc = doc_of(&[BlockType::Cta], &mut ids);
        let id = doc.blocks()[0].id.clone();

        let unchanged = doc.update_props(id.as_str(), BlockProps::Divider(DividerProps::default()));
        assert_eq!(unchanged, doc);

        let updated = doc.update_props(
            id.as_str(),
            BlockProps::Cta(CtaProps {
                text: "Buy".to_string(),
                ..Default::default()
            }),
        );
        match &updated.blocks()[0].props {
            BlockProps::Cta(cta) => assert_eq!(cta.text, "Buy"),
            other => panic!("expected cta, got {:?}", other),
        }
        assert_eq!(updated.blocks()[0].id, id);
    }

    #[test]
    fn test_delete() {
        let mut ids = SequentialIds::from_seed("t");
        let doc = doc_of(&[BlockType::Header, BlockType::Cta], &mut ids);
        let id = doc.blocks()[0].id.clone();

        let doc = doc.delete(id.as_str());
        assert_eq!(types(&doc), vec![BlockType::Cta]);
    }

    #[test]
    fn test_insert_blocks_uses_fresh_ids() {
        let mut ids = SequentialIds::from_seed("t");
        let doc = doc_of(&[BlockType::Header, BlockType::Cta], &mut ids);
        let snippet = doc.blocks().to_vec();

        let doc = doc.insert_blocks(1, &snippet, &mut ids);

        assert_eq!(doc.len(), 4);
        let unique: HashSet<_> = doc.ids().collect();
        assert_eq!(unique.len(), 4);
        assert_eq!(doc.blocks()[1].props, snippet[0].props);
    }

    #[test]
    fn test_from_blocks_reassigns_duplicates() {
        let mut ids = SequentialIds::from_seed("t");
        let block = registry::create(BlockType::Spacer, &mut ids);
        let doc = Document::from_blocks(vec![block.clone(), block.clone()], &mut ids);

        assert_eq!(doc.blocks()[0].id, block.id);
        assert_ne!(doc.blocks()[1].id, block.id);
    }

    #[test]
    fn test_reassigned_id_avoids_later_blocks() {
        let mut ids = SequentialIds::from_seed("prop");
        let spacer = |id: &str| Block::new(id, BlockProps::Spacer(Default::default()));

        let doc = Document::from_blocks(
            vec![spacer("blk-prop-1"), spacer("blk-prop-1"), spacer("blk-prop-2")],
            &mut ids,
        );

        let unique: HashSet<_> = doc.ids().collect();
        assert_eq!(unique.len(), 3);
        assert_eq!(doc.blocks()[1].id, "blk-prop-3");
    }

    #[test]
    fn test_inserts_skip_ids_loaded_from_storage() {
        let mut loader = SequentialIds::from_seed("prop");
        let stored = registry::create(BlockType::Cta, &mut loader);

        let mut ids = SequentialIds::from_seed("prop");
        let doc = Document::from_blocks(vec![stored.clone()], &mut ids);

        let doc = doc.append(BlockType::Divider, &mut ids);
        let doc = doc.duplicate(stored.id.as_str(), &mut ids);
        let doc = doc.insert_blocks(0, &[stored.clone()], &mut ids);

        assert_eq!(doc.len(), 4);
        let unique: HashSet<_> = doc.ids().collect();
        assert_eq!(unique.len(), 4);
        assert_eq!(doc.blocks()[1].id, stored.id);
    }

    #[test]
    fn test_json_round_trip() {
        let mut ids = SequentialIds::from_seed("t");
        let doc = doc_of(&[BlockType::Header, BlockType::TwoColumn], &mut ids);

        let json = doc.to_json().unwrap();
        assert_eq!(Document::from_json_lossy(&json, &mut ids), doc);
        assert!(Document::from_json_lossy("{oops", &mut ids).is_empty());
    }
}
