use crate::{Campaign, DraftPayload, NewSnippet, Snippet, StoreResult};
use async_trait::async_trait;
use std::sync::Arc;

/// The REST persistence collaborator, as seen by the editor
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /snippets`
    async fn list_snippets(&self) -> StoreResult<Vec<Snippet>>;

    /// `POST /snippets`
    async fn create_snippet(&self, snippet: &NewSnippet) -> StoreResult<Snippet>;

    /// `DELETE /snippets/{id}`
    async fn delete_snippet(&self, id: &str) -> StoreResult<()>;

    /// `POST /campaigns`
    async fn create_campaign(&self, draft: &DraftPayload) -> StoreResult<Campaign>;

    /// `PUT /campaigns/{id}`
    async fn update_campaign(&self, id: &str, draft: &DraftPayload) -> StoreResult<Campaign>;

    /// `GET /campaigns/{id}`
    async fn get_campaign(&self, id: &str) -> StoreResult<Campaign>;

    /// Create on first save, update afterwards
    async fn save_campaign(&self, id: Option<&str>, draft: &DraftPayload) -> StoreResult<Campaign> {
        match id {
            Some(id) => self.update_campaign(id, draft).await,
            None => self.create_campaign(draft).await,
        }
    }
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Arc<B> {
    async fn list_snippets(&self) -> StoreResult<Vec<Snippet>> {
        (**self).list_snippets().await
    }

    async fn create_snippet(&self, snippet: &NewSnippet) -> StoreResult<Snippet> {
        (**self).create_snippet(snippet).await
    }

    async fn delete_snippet(&self, id: &str) -> StoreResult<()> {
        (**self).delete_snippet(id).await
    }

    async fn create_campaign(&self, draft: &DraftPayload) -> StoreResult<Campaign> {
        (**self).create_campaign(draft).await
    }

    async fn update_campaign(&self, id: &str, draft: &DraftPayload) -> StoreResult<Campaign> {
        (**self).update_campaign(id, draft).await
    }

    async fn get_campaign(&self, id: &str) -> StoreResult<Campaign> {
        (**self).get_campaign(id).await
    }
}
