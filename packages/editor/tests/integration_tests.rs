//! Integration tests for editor crate

use mailcraft_blocks::{BlockProps, BlockType, MergeTag, SequentialIds};
use mailcraft_compiler_html::CompileOptions;
use mailcraft_editor::{
    AutoSave, CampaignComposer, Document, EditSession, Key, Mutation, RichTextField, SaveOutcome,
    SnippetLibrary, Toasts,
};
use mailcraft_store::InMemoryBackend;
use std::sync::Arc;
use std::time::Duration;

fn session(seed: &str) -> EditSession {
    EditSession::new(Document::new(), SequentialIds::from_seed(seed))
}

#[test]
fn test_header_and_divider_compile() {
    let mut session = session("compile");
    session.import_json(
        r#"[
            {"id": "a", "type": "header", "props": {"brandName": "X & Co"}},
            {"id": "b", "type": "divider", "props": {}}
        ]"#,
    );

    let html = session.compile(&CompileOptions::default());
    assert!(html.contains(">X &amp; Co</h1>"));
    assert!(html.contains("<hr style=\"border:0;border-top:1px solid #e5e7eb;width:100%;margin:0 auto;\">"));
    assert!(html.contains("padding:20px 20px;"));

    // Compiling twice gives the same document
    assert_eq!(html, session.compile(&CompileOptions::default()));
}

#[test]
fn test_duplicate_middle_block() {
    let mut session = session("dup");
    session.add_block(BlockType::Header);
    let middle = session.add_block(BlockType::Cta).unwrap();
    session.add_block(BlockType::Spacer);

    let copy = session.duplicate(middle.as_str()).unwrap();
    let blocks = session.blocks();

    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks[2].id, copy);
    assert_ne!(blocks[2].id, blocks[1].id);
    assert_eq!(blocks[2].props, blocks[1].props);
    assert_eq!(blocks[3].block_type(), Some(BlockType::Spacer));
}

#[test]
fn test_insert_after_missing_id_appends() {
    let mut left = session("same");
    let mut right = session("same");
    for s in [&mut left, &mut right] {
        s.add_block(BlockType::Header);
        s.add_block(BlockType::Image);
    }

    left.apply(Mutation::InsertAfter {
        after_id: "nonexistent-id".into(),
        block_type: BlockType::Cta,
    });
    right.apply(Mutation::Append {
        block_type: BlockType::Cta,
    });

    assert_eq!(left.document(), right.document());
    assert_eq!(left.blocks()[2].block_type(), Some(BlockType::Cta));
}

#[test]
fn test_slash_merge_tag_reaches_compiled_email() {
    let mut tags = mailcraft_blocks::default_merge_tags();
    tags.push(MergeTag::new("anniversary_date", "Anniversary Date"));
    let mut session = session("slash").with_merge_tags(tags);

    let text = session.add_block(BlockType::RichText).unwrap();
    session.open_text_editor(text.as_str(), RichTextField::Body).unwrap();
    session.text_input(" /ann").unwrap();

    let menu = session.text_editor().unwrap().slash_menu();
    let labels: Vec<_> = menu.filtered().iter().map(|c| c.label.clone()).collect();
    assert_eq!(labels, vec!["Anniversary Date"]);

    assert_eq!(session.text_key(Key::Enter).unwrap(), None);
    session.close_text_editor();

    let BlockProps::RichText(props) = &session.blocks()[0].props else {
        panic!("expected a rich-text block");
    };
    assert!(props.html.contains("data-merge-tag=\"anniversary_date\""));
    assert!(!props.html.contains("/ann"));

    let html = session.compile(&CompileOptions::default());
    assert!(html.contains("{{anniversary_date}}"));
    assert!(!html.contains("data-merge-tag"));
}

#[test]
fn test_slash_block_command_inserts_after_host() {
    let mut session = session("cmd");
    let text = session.add_block(BlockType::RichText).unwrap();
    session.add_block(BlockType::Image);

    session.open_text_editor(text.as_str(), RichTextField::Body).unwrap();
    session.text_input("/testim").unwrap();
    let inserted = session.text_key(Key::Enter).unwrap().unwrap();

    let types: Vec<_> = session.blocks().iter().map(|b| b.block_type()).collect();
    assert_eq!(
        types,
        vec![Some(BlockType::RichText), Some(BlockType::Testimonial), Some(BlockType::Image)]
    );
    assert_eq!(session.blocks()[1].id, inserted);
}

#[test]
fn test_unknown_types_survive_editing() {
    let mut session = session("unknown");
    session.import_json(
        r#"[
            {"id": "t", "type": "countdown", "props": {"endsAt": "2026-12-01"}},
            {"id": "h", "type": "header", "props": {}}
        ]"#,
    );

    session.move_block(1, 0);
    assert_eq!(session.blocks()[1].type_name(), "countdown");

    let html = session.compile(&CompileOptions::default());
    assert!(html.contains("</h1>"));

    let json = session.export_json().unwrap();
    assert!(json.contains("\"endsAt\":\"2026-12-01\""));
}

#[test]
fn test_malformed_document_loads_empty() {
    let mut session = session("bad");
    session.add_block(BlockType::Header);
    session.import_json("{not json");
    assert!(session.blocks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_snippet_insert_triggers_autosave() {
    let backend = Arc::new(InMemoryBackend::new());
    let toasts = Toasts::new();

    let mut composer = CampaignComposer::new(session("flow"), toasts.clone())
        .with_autosave(AutoSave::new(Arc::clone(&backend), Duration::from_millis(300)));
    let mut library = SnippetLibrary::new(Arc::clone(&backend), toasts.clone());

    let cta = composer.edit(|s| s.add_block(BlockType::Cta)).unwrap();
    composer.edit(|s| s.select(cta.as_str()));
    library
        .save_from_selection(composer.session(), "Shop now", "Buttons")
        .await
        .unwrap();

    let snippet_id = library.snippets()[0].id.clone();
    let inserted = composer
        .edit(|s| library.insert(&snippet_id, s, None))
        .unwrap();
    assert_eq!(inserted.len(), 1);

    let outcome = composer.wait_for_save().await.unwrap();
    assert!(matches!(outcome, SaveOutcome::Saved { .. }));
    assert!(!composer.is_dirty());

    let saved = backend.campaign_saves();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].blocks().len(), 2);
    assert!(saved[0].body_html.contains("Shop"));
}
