//! In-process backend for tests and offline previews.

use crate::{Backend, Campaign, DraftPayload, NewSnippet, Snippet, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Default)]
struct MemoryState {
    snippets: Vec<Snippet>,
    campaigns: Vec<Campaign>,
    next_id: u64,
    offline: bool,
    campaign_saves: Vec<DraftPayload>,
}

impl MemoryState {
    fn allocate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}_{}", prefix, self.next_id)
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline {
            return Err(StoreError::Unavailable("backend is offline".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: Mutex<MemoryState>,
    latency: Option<Duration>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every campaign write waits this long before completing
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            state: Mutex::default(),
            latency: Some(latency),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Simulate the network going away (or coming back)
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    /// Every campaign payload written so far, in order
    pub fn campaign_saves(&self) -> Vec<DraftPayload> {
        self.state().campaign_saves.clone()
    }

    pub fn snippet_count(&self) -> usize {
        self.state().snippets.len()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn write_campaign(&self, id: Option<&str>, draft: &DraftPayload) -> StoreResult<Campaign> {
        let mut state = self.state();
        state.check_online()?;
        let now = Utc::now();

        let campaign = match id {
            Some(id) => {
                let existing = state
                    .campaigns
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or_else(|| StoreError::NotFound(format!("campaign {}", id)))?;
                existing.draft = draft.clone();
                existing.updated_at = now;
                existing.clone()
            }
            None => {
                let campaign = Campaign {
                    id: state.allocate_id("cmp"),
                    draft: draft.clone(),
                    status: Default::default(),
                    created_at: now,
                    updated_at: now,
                };
                state.campaigns.push(campaign.clone());
                campaign
            }
        };

        state.campaign_saves.push(draft.clone());
        Ok(campaign)
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn list_snippets(&self) -> StoreResult<Vec<Snippet>> {
        let state = self.state();
        state.check_online()?;
        Ok(state.snippets.clone())
    }

    async fn create_snippet(&self, snippet: &NewSnippet) -> StoreResult<Snippet> {
        let mut state = self.state();
        state.check_online()?;

        let now = Utc::now();
        let created = Snippet {
            id: state.allocate_id("snp"),
            name: snippet.name.clone(),
            category: snippet.category.clone(),
            blocks: snippet.blocks.clone(),
            created_at: now,
            updated_at: now,
        };
        state.snippets.push(created.clone());
        Ok(created)
    }

    async fn delete_snippet(&self, id: &str) -> StoreResult<()> {
        let mut state = self.state();
        state.check_online()?;

        let before = state.snippets.len();
        state.snippets.retain(|s| s.id != id);
        if state.snippets.len() == before {
            return Err(StoreError::NotFound(format!("snippet {}", id)));
        }
        Ok(())
    }

    async fn create_campaign(&self, draft: &DraftPayload) -> StoreResult<Campaign> {
        self.simulate_latency().await;
        self.write_campaign(None, draft)
    }

    async fn update_campaign(&self, id: &str, draft: &DraftPayload) -> StoreResult<Campaign> {
        self.simulate_latency().await;
        self.write_campaign(Some(id), draft)
    }

    async fn get_campaign(&self, id: &str) -> StoreResult<Campaign> {
        let state = self.state();
        state.check_online()?;
        state
            .campaigns
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("campaign {}", id)))
    }
}
