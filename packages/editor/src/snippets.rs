//! # Snippet Library
//!
//! Cached view of the saved snippets plus the three remote operations on
//! them. A failed request is logged, reported as an error toast and
//! returned; the cached list and the document are left as they were.

use crate::{EditSession, EditorError, EditorResult, Toasts};
use mailcraft_blocks::{BlockId, IdSource};
use mailcraft_store::{Backend, Snippet};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Group for snippets saved without a category
pub const DEFAULT_CATEGORY: &str = "General";

/// The category a snippet is listed under
pub fn category_label(snippet: &Snippet) -> &str {
    match snippet.category.trim() {
        "" => DEFAULT_CATEGORY,
        category => category,
    }
}

pub struct SnippetLibrary<B: Backend> {
    backend: B,
    snippets: Vec<Snippet>,
    toasts: Toasts,
}

impl<B: Backend> SnippetLibrary<B> {
    pub fn new(backend: B, toasts: Toasts) -> Self {
        Self {
            backend,
            snippets: Vec::new(),
            toasts,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn get(&self, id: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|snippet| snippet.id == id)
    }

    /// Palette grouping, keyed by [`category_label`]
    pub fn by_category(&self) -> BTreeMap<&str, Vec<&Snippet>> {
        let mut groups: BTreeMap<&str, Vec<&Snippet>> = BTreeMap::new();
        for snippet in &self.snippets {
            groups.entry(category_label(snippet)).or_default().push(snippet);
        }
        groups
    }

    /// Snippets whose [`category_label`] is `category`
    pub fn in_category(&self, category: &str) -> Vec<&Snippet> {
        self.snippets
            .iter()
            .filter(|snippet| category_label(snippet) == category)
            .collect()
    }

    fn report(&self, action: &str, err: EditorError) -> EditorError {
        warn!(action, error = %err, "Snippet request failed");
        self.toasts.error(format!("Could not {}: {}", action, err));
        err
    }

    /// Refetch the list from the backend
    pub async fn refresh(&mut self) -> EditorResult<()> {
        match self.backend.list_snippets().await {
            Ok(snippets) => {
                self.snippets = snippets;
                Ok(())
            }
            Err(err) => Err(self.report("load snippets", err.into())),
        }
    }

    /// Save the session's selected block as a new snippet
    pub async fn save_from_selection<I: IdSource>(
        &mut self,
        session: &EditSession<I>,
        name: &str,
        category: &str,
    ) -> EditorResult<Snippet> {
        let request = session
            .snippet_from_selection(name, category)
            .map_err(|err| self.report("save snippet", err))?;

        match self.backend.create_snippet(&request).await {
            Ok(snippet) => {
                info!(snippet_id = %snippet.id, name = %snippet.name, "Snippet saved");
                self.toasts.success(format!("Saved snippet \"{}\"", snippet.name));
                self.snippets.push(snippet.clone());
                Ok(snippet)
            }
            Err(err) => Err(self.report("save snippet", err.into())),
        }
    }

    /// Delete remotely, then refetch the list
    pub async fn delete(&mut self, id: &str) -> EditorResult<()> {
        if let Err(err) = self.backend.delete_snippet(id).await {
            return Err(self.report("delete snippet", err.into()));
        }

        info!(snippet_id = %id, "Snippet deleted");
        self.refresh().await
    }

    /// Insert a cached snippet's blocks into the session under fresh ids
    pub fn insert<I: IdSource>(
        &self,
        id: &str,
        session: &mut EditSession<I>,
        index: Option<usize>,
    ) -> EditorResult<Vec<BlockId>> {
        let snippet = self
            .get(id)
            .ok_or_else(|| EditorError::SnippetNotFound(id.to_string()))?;
        Ok(session.insert_snippet(&snippet.blocks, index))
    }
}
