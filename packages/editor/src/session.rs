//! # Edit Session
//!
//! The controller between user events and the document. An EditSession
//! owns the current document and every piece of transient canvas state:
//! the selected block, an in-progress drag, an open insertion point, and
//! the rich-text editor when one is open.
//!
//! Every document change goes through [`EditSession::apply`], which swaps in
//! the next document, fixes up state that pointed at removed blocks, and
//! records the change in the session's [`ChangeTracker`].

use crate::rich_text::{Key, RichText, RichTextField, TextEditor};
use crate::{Document, EditorError, EditorResult, Mutation};
use mailcraft_blocks::{default_merge_tags, Block, BlockId, BlockProps, BlockType, IdSource, MergeTag, SequentialIds};
use mailcraft_compiler_html::{compile_to_html, CompileOptions};
use mailcraft_store::NewSnippet;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

/// Unsaved-change bookkeeping. Every tracked edit bumps the revision; a
/// successful save records the revision it captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeTracker {
    revision: u64,
    saved: u64,
}

impl ChangeTracker {
    pub fn mark_changed(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }

    /// A save of `revision` completed. Saves that finish out of order never
    /// move the saved mark backwards.
    pub fn mark_saved(&mut self, revision: u64) {
        self.saved = self.saved.max(revision.min(self.revision));
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn saved_revision(&self) -> u64 {
        self.saved
    }

    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved
    }
}

/// Single-user editing session over one email document
#[derive(Debug)]
pub struct EditSession<I: IdSource = SequentialIds> {
    document: Document,
    ids: I,
    selection: Option<BlockId>,
    dragging: Option<BlockId>,
    insertion_point: Option<usize>,
    merge_tags: Vec<MergeTag>,
    text_editor: Option<TextEditor>,

    /// Increments on every applied mutation
    version: u64,
    changes: ChangeTracker,
    journal: Vec<Mutation>,
}

impl EditSession<SequentialIds> {
    /// Empty document, ids seeded from the clock, default merge tags
    pub fn with_clock() -> Self {
        Self::new(Document::new(), SequentialIds::from_clock())
    }
}

impl<I: IdSource> EditSession<I> {
    pub fn new(document: Document, ids: I) -> Self {
        Self {
            document,
            ids,
            selection: None,
            dragging: None,
            insertion_point: None,
            merge_tags: default_merge_tags(),
            text_editor: None,
            version: 0,
            changes: ChangeTracker::default(),
            journal: Vec::new(),
        }
    }

    /// Load stored blocks, re-identifying any duplicate ids
    pub fn from_blocks(blocks: Vec<Block>, mut ids: I) -> Self {
        let document = Document::from_blocks(blocks, &mut ids);
        Self::new(document, ids)
    }

    pub fn with_merge_tags(mut self, merge_tags: Vec<MergeTag>) -> Self {
        self.merge_tags = merge_tags;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn blocks(&self) -> &[Block] {
        self.document.blocks()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn changes(&self) -> &ChangeTracker {
        &self.changes
    }

    /// Record a change to state that lives outside the document (campaign
    /// fields) on the same tracker
    pub fn mark_changed(&mut self) -> u64 {
        self.changes.mark_changed()
    }

    pub fn mark_saved(&mut self, revision: u64) {
        self.changes.mark_saved(revision);
    }

    pub fn is_dirty(&self) -> bool {
        self.changes.is_dirty()
    }

    /// Mutations applied so far, oldest first
    pub fn journal(&self) -> &[Mutation] {
        &self.journal
    }

    pub fn merge_tags(&self) -> &[MergeTag] {
        &self.merge_tags
    }

    pub fn set_merge_tags(&mut self, merge_tags: Vec<MergeTag>) {
        self.merge_tags = merge_tags;
    }

    /// Apply a mutation. Returns whether the document changed.
    pub fn apply(&mut self, mutation: Mutation) -> bool {
        let next = mutation.apply(&self.document, &mut self.ids);
        if next == self.document {
            debug!(mutation = mutation.kind(), target = ?mutation.target(), "Mutation changed nothing");
            return false;
        }

        self.document = next;
        self.version += 1;
        let revision = self.changes.mark_changed();
        debug!(mutation = mutation.kind(), version = self.version, revision, "Applied mutation");
        self.journal.push(mutation);

        self.drop_stale_state();
        true
    }

    /// Clear state that refers to blocks no longer in the document
    fn drop_stale_state(&mut self) {
        if let Some(id) = &self.selection {
            if !self.document.contains(id.as_str()) {
                debug!(block_id = %id, "Selected block removed - clearing selection");
                self.selection = None;
            }
        }

        if let Some(id) = &self.dragging {
            if !self.document.contains(id.as_str()) {
                self.dragging = None;
            }
        }

        let editor_gone = self
            .text_editor
            .as_ref()
            .is_some_and(|editor| !self.document.contains(editor.block_id().as_str()));
        if editor_gone {
            self.text_editor = None;
        }

        if let Some(index) = self.insertion_point {
            self.insertion_point = Some(index.min(self.document.len()));
        }
    }

    /// Apply an insertion and report the id of the block it created
    fn apply_insert(&mut self, mutation: Mutation) -> Option<BlockId> {
        let before: HashSet<BlockId> = self.document.ids().cloned().collect();
        if !self.apply(mutation) {
            return None;
        }
        self.document.ids().find(|id| !before.contains(*id)).cloned()
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub fn selection(&self) -> Option<&BlockId> {
        self.selection.as_ref()
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.selection.as_ref().and_then(|id| self.document.get(id.as_str()))
    }

    /// Select a block; unknown ids are ignored
    pub fn select(&mut self, id: &str) {
        if self.document.contains(id) {
            self.selection = Some(BlockId::from(id));
        } else {
            debug!(block_id = id, "Ignoring selection of unknown block");
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // -----------------------------------------------------------------------
    // Block operations
    // -----------------------------------------------------------------------

    /// New block after the selected one, or at the end when nothing is
    /// selected
    pub fn add_block(&mut self, block_type: BlockType) -> Option<BlockId> {
        let mutation = match &self.selection {
            Some(after_id) => Mutation::InsertAfter {
                after_id: after_id.clone(),
                block_type,
            },
            None => Mutation::Append { block_type },
        };
        self.apply_insert(mutation)
    }

    pub fn duplicate(&mut self, id: &str) -> Option<BlockId> {
        self.apply_insert(Mutation::Duplicate {
            block_id: BlockId::from(id),
        })
    }

    pub fn delete(&mut self, id: &str) -> bool {
        self.apply(Mutation::Delete {
            block_id: BlockId::from(id),
        })
    }

    pub fn update_props(&mut self, id: &str, props: BlockProps) -> bool {
        self.apply(Mutation::UpdateProps {
            block_id: BlockId::from(id),
            props,
        })
    }

    pub fn update_props_json(&mut self, id: &str, props: Map<String, Value>) -> bool {
        self.apply(Mutation::UpdatePropsJson {
            block_id: BlockId::from(id),
            props,
        })
    }

    pub fn move_block(&mut self, from_index: usize, to_index: usize) -> bool {
        self.apply(Mutation::MoveBlock { from_index, to_index })
    }

    // -----------------------------------------------------------------------
    // Drag and drop
    // -----------------------------------------------------------------------

    pub fn begin_drag(&mut self, id: &str) {
        if self.document.contains(id) {
            self.dragging = Some(BlockId::from(id));
        }
    }

    pub fn dragging(&self) -> Option<&BlockId> {
        self.dragging.as_ref()
    }

    /// Finish a drag. Dropping onto a different block moves the dragged
    /// block to the target's index; anything else just ends the drag.
    pub fn end_drag(&mut self, drop_target: Option<&str>) -> bool {
        let Some(source) = self.dragging.take() else {
            return false;
        };
        let Some(target) = drop_target else {
            return false;
        };
        if source == target {
            return false;
        }

        match (self.document.index_of(source.as_str()), self.document.index_of(target)) {
            (Some(from), Some(to)) => self.move_block(from, to),
            _ => {
                debug!(source = %source, target, "Drop target no longer valid");
                false
            }
        }
    }

    pub fn cancel_drag(&mut self) {
        self.dragging = None;
    }

    // -----------------------------------------------------------------------
    // Insertion points
    // -----------------------------------------------------------------------

    /// Open the type picker for the gap before `index`
    pub fn open_insertion_point(&mut self, index: usize) {
        self.insertion_point = Some(index.min(self.document.len()));
    }

    pub fn insertion_point(&self) -> Option<usize> {
        self.insertion_point
    }

    /// Insert the picked type at the open insertion point and close it
    pub fn pick_block_type(&mut self, block_type: BlockType) -> Option<BlockId> {
        let index = self.insertion_point.take()?;
        self.apply_insert(Mutation::InsertAt { index, block_type })
    }

    pub fn close_insertion_point(&mut self) {
        self.insertion_point = None;
    }

    // -----------------------------------------------------------------------
    // Snippets
    // -----------------------------------------------------------------------

    /// Insert copies of a snippet's blocks at `index`, or after the
    /// selection, or at the end. Returns the ids of the inserted copies.
    pub fn insert_snippet(&mut self, blocks: &[Block], index: Option<usize>) -> Vec<BlockId> {
        let index = index
            .or_else(|| {
                self.selection
                    .as_ref()
                    .and_then(|id| self.document.index_of(id.as_str()))
                    .map(|i| i + 1)
            })
            .unwrap_or(self.document.len());

        let before: HashSet<BlockId> = self.document.ids().cloned().collect();
        self.apply(Mutation::InsertBlocks {
            index,
            blocks: blocks.to_vec(),
        });

        self.document
            .ids()
            .filter(|id| !before.contains(*id))
            .cloned()
            .collect()
    }

    /// The request body for saving the selected block as a snippet
    pub fn snippet_from_selection(&self, name: &str, category: &str) -> EditorResult<NewSnippet> {
        let block = self.selected_block().ok_or(EditorError::NoSelection)?;
        Ok(NewSnippet::new(name, category, vec![block.clone()])?)
    }

    // -----------------------------------------------------------------------
    // Rich-text editing
    // -----------------------------------------------------------------------

    pub fn text_editor(&self) -> Option<&TextEditor> {
        self.text_editor.as_ref()
    }

    /// Open a rich-text editor on one HTML field of a block, closing any
    /// editor that was already open
    pub fn open_text_editor(&mut self, id: &str, field: RichTextField) -> EditorResult<()> {
        let block = self
            .document
            .get(id)
            .ok_or_else(|| EditorError::BlockNotFound(BlockId::from(id)))?;
        let html = field.read(&block.props).ok_or_else(|| EditorError::NotRichText {
            id: block.id.clone(),
            field: field.prop_name().to_string(),
        })?;

        let editor = TextEditor::new(block.id.clone(), field, html, &self.merge_tags);
        self.close_text_editor();
        self.text_editor = Some(editor);
        Ok(())
    }

    pub fn close_text_editor(&mut self) {
        self.commit_text();
        self.text_editor = None;
    }

    /// Write the open editor's HTML back into its block
    fn commit_text(&mut self) -> bool {
        let Some(editor) = &self.text_editor else {
            return false;
        };
        let Some(block) = self.document.get(editor.block_id().as_str()) else {
            return false;
        };

        // Stored markup may predate the editor's serializer, so compare
        // normalized forms
        let html = editor.html();
        let Some(stored) = editor.field().read(&block.props) else {
            return false;
        };
        if RichText::from_html(stored).to_html() == html {
            return false;
        }

        match editor.field().write(&block.props, html) {
            Some(props) => {
                let id = block.id.clone();
                self.update_props(id.as_str(), props)
            }
            None => false,
        }
    }

    /// Run an edit against the open editor and commit the result
    pub fn edit_text<R>(&mut self, edit: impl FnOnce(&mut TextEditor) -> R) -> EditorResult<R> {
        let editor = self.text_editor.as_mut().ok_or(EditorError::NoOpenEditor)?;
        let result = edit(editor);
        self.commit_text();
        Ok(result)
    }

    pub fn text_input(&mut self, text: &str) -> EditorResult<()> {
        self.edit_text(|editor| editor.input(text))
    }

    /// Forward a key press. A committed block command inserts the new block
    /// right after the one being edited and returns its id.
    pub fn text_key(&mut self, key: Key) -> EditorResult<Option<BlockId>> {
        let Some(block_type) = self.edit_text(|editor| editor.key(key))? else {
            return Ok(None);
        };

        let host = self
            .text_editor
            .as_ref()
            .map(|editor| editor.block_id().clone())
            .ok_or(EditorError::NoOpenEditor)?;

        Ok(self.apply_insert(Mutation::InsertAfter {
            after_id: host,
            block_type,
        }))
    }

    pub fn text_click_outside(&mut self) {
        if let Some(editor) = &mut self.text_editor {
            editor.click_outside();
        }
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    pub fn compile(&self, options: &CompileOptions) -> String {
        compile_to_html(self.document.blocks(), options)
    }

    pub fn export_json(&self) -> EditorResult<String> {
        Ok(self.document.to_json()?)
    }

    /// Replace the document with stored JSON. Malformed input loads as an
    /// empty document.
    pub fn import_json(&mut self, source: &str) {
        self.text_editor = None;
        self.selection = None;
        self.dragging = None;
        self.insertion_point = None;

        self.document = Document::from_json_lossy(source, &mut self.ids);
        self.version += 1;
        self.changes.mark_changed();
        debug!(blocks = self.document.len(), "Imported document");
    }
}
