//! Tests for long mutation sequences
//!
//! This tests:
//! - Id uniqueness under any mix of create/duplicate/insert-snippet
//! - Serialization round-trip after arbitrary edits
//! - `move_block(i, i)` identity
//! - Journal replay and the mutation wire format

use mailcraft_blocks::{parse_document, serialize_document, BlockId, BlockType, SequentialIds};
use mailcraft_editor::{Document, EditSession, Mutation};
use proptest::prelude::*;
use serde_json::json;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    InsertAt(usize, usize),
    InsertAfter(usize, usize),
    Move(usize, usize),
    Duplicate(usize),
    Delete(usize),
    Snippet(usize, usize),
    Select(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..9usize).prop_map(Op::Add),
        (0..12usize, 0..9usize).prop_map(|(i, t)| Op::InsertAt(i, t)),
        (0..12usize, 0..9usize).prop_map(|(i, t)| Op::InsertAfter(i, t)),
        (0..12usize, 0..12usize).prop_map(|(a, b)| Op::Move(a, b)),
        (0..12usize).prop_map(Op::Duplicate),
        (0..12usize).prop_map(Op::Delete),
        (0..12usize, 1..4usize).prop_map(|(i, n)| Op::Snippet(i, n)),
        (0..12usize).prop_map(Op::Select),
    ]
}

/// An existing id, or one that is never present
fn pick(session: &EditSession, i: usize) -> String {
    let blocks = session.blocks();
    if blocks.is_empty() || i >= blocks.len() + 2 {
        return "missing".to_string();
    }
    blocks[i % blocks.len()].id.to_string()
}

fn run(session: &mut EditSession, op: &Op) {
    match *op {
        Op::Add(t) => {
            session.add_block(BlockType::ALL[t]);
        }
        Op::InsertAt(index, t) => {
            session.apply(Mutation::InsertAt {
                index,
                block_type: BlockType::ALL[t],
            });
        }
        Op::InsertAfter(i, t) => {
            let after_id = BlockId::new(pick(session, i));
            session.apply(Mutation::InsertAfter {
                after_id,
                block_type: BlockType::ALL[t],
            });
        }
        Op::Move(from, to) => {
            session.move_block(from, to);
        }
        Op::Duplicate(i) => {
            let id = pick(session, i);
            session.duplicate(&id);
        }
        Op::Delete(i) => {
            let id = pick(session, i);
            session.delete(&id);
        }
        Op::Snippet(start, count) => {
            let blocks: Vec<_> = session.blocks().iter().skip(start).take(count).cloned().collect();
            session.insert_snippet(&blocks, None);
        }
        Op::Select(i) => {
            let id = pick(session, i);
            session.select(&id);
        }
    }
}

fn new_session() -> EditSession {
    EditSession::new(Document::new(), SequentialIds::from_seed("prop"))
}

proptest! {
    #[test]
    fn prop_ids_stay_unique(ops in prop::collection::vec(op(), 0..60)) {
        let mut session = new_session();
        for op in &ops {
            run(&mut session, op);
            let ids: HashSet<_> = session.document().ids().collect();
            prop_assert_eq!(ids.len(), session.blocks().len());
        }
    }

    #[test]
    fn prop_serialization_round_trips(ops in prop::collection::vec(op(), 0..40)) {
        let mut session = new_session();
        for op in &ops {
            run(&mut session, op);
        }

        let json = serialize_document(session.blocks()).unwrap();
        let parsed = parse_document(&json).unwrap();
        prop_assert_eq!(parsed.as_slice(), session.blocks());
    }

    #[test]
    fn prop_move_to_same_index_is_identity(ops in prop::collection::vec(op(), 0..30), i in 0..15usize) {
        let mut session = new_session();
        for op in &ops {
            run(&mut session, op);
        }

        let document = session.document().clone();
        prop_assert_eq!(document.move_block(i, i), document.clone());
        prop_assert!(!session.move_block(i, i));
    }

    #[test]
    fn prop_journal_replays_to_same_document(ops in prop::collection::vec(op(), 0..40)) {
        let mut session = new_session();
        for op in &ops {
            run(&mut session, op);
        }

        let mut replay = new_session();
        for mutation in session.journal() {
            replay.apply(mutation.clone());
        }
        prop_assert_eq!(replay.document(), session.document());
    }
}

#[test]
fn test_move_then_delete_sequence() {
    let mut session = new_session();
    let a = session.add_block(BlockType::Header).unwrap();
    let b = session.add_block(BlockType::RichText).unwrap();
    let c = session.add_block(BlockType::Cta).unwrap();

    assert!(session.move_block(2, 0));
    assert!(session.delete(a.as_str()));

    let order: Vec<_> = session.blocks().iter().map(|block| block.id.clone()).collect();
    assert_eq!(order, vec![c, b]);
    assert_eq!(session.version(), 5);
    assert_eq!(session.journal().len(), 5);
}

#[test]
fn test_deleted_id_is_never_reused() {
    let mut session = new_session();
    let first = session.add_block(BlockType::Spacer).unwrap();
    session.delete(first.as_str());
    let second = session.add_block(BlockType::Spacer).unwrap();

    assert_ne!(first, second);
}

#[test]
fn test_mutation_wire_format() {
    let mutation = Mutation::InsertAfter {
        after_id: BlockId::new("blk-1"),
        block_type: BlockType::TwoColumn,
    };
    let value = serde_json::to_value(&mutation).unwrap();
    assert_eq!(
        value,
        json!({"kind": "insertAfter", "afterId": "blk-1", "blockType": "twocolumn"})
    );

    let parsed: Mutation =
        serde_json::from_value(json!({"kind": "moveBlock", "fromIndex": 3, "toIndex": 0})).unwrap();
    assert_eq!(parsed, Mutation::MoveBlock { from_index: 3, to_index: 0 });
}

#[test]
fn test_json_props_update_applies_to_matching_type() {
    let mut session = new_session();
    let id = session.add_block(BlockType::Spacer).unwrap();

    let mut props = serde_json::Map::new();
    props.insert("height".to_string(), json!(64));
    assert!(session.update_props_json(id.as_str(), props));

    let json = session.export_json().unwrap();
    assert!(json.contains("\"height\":64"));
}
