//! # Auto-save
//!
//! Debounced draft persistence. Every change hands the latest draft
//! snapshot to [`AutoSave::schedule`], which restarts a quiet-period timer.
//! When the timer expires a save is spawned. Saves never overlap: a save
//! that starts while another is in flight waits for it, then persists
//! whatever snapshot is newest at that moment, so a burst of edits costs at
//! most one extra request.
//!
//! ```text
//!   change ──▶ schedule(rev, draft) ──▶ pending = (rev, draft)
//!                    │                        ▲          │
//!                    ▼                        │ restore  │ take
//!              timer (abort + respawn)        │ on error │
//!                    │ expires                │          ▼
//!                    └──────▶ flush ── gate ──┴── backend.save_campaign
//!                                                        │
//!                                              SaveOutcome on channel
//! ```

use mailcraft_store::{Backend, DraftPayload};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Quiet period before a draft is persisted
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { revision: u64, campaign_id: String },
    Failed { revision: u64, error: String },
}

impl SaveOutcome {
    pub fn revision(&self) -> u64 {
        match self {
            SaveOutcome::Saved { revision, .. } | SaveOutcome::Failed { revision, .. } => *revision,
        }
    }
}

#[derive(Debug, Default)]
struct Pending {
    snapshot: Option<(u64, DraftPayload)>,
    campaign_id: Option<String>,
}

struct Shared<B> {
    backend: B,
    /// Held for the duration of a save
    gate: tokio::sync::Mutex<()>,
    pending: Mutex<Pending>,
}

impl<B> Shared<B> {
    fn pending(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

async fn flush<B: Backend>(shared: Arc<Shared<B>>) -> Option<SaveOutcome> {
    let _gate = shared.gate.lock().await;

    let (revision, draft, campaign_id) = {
        let mut pending = shared.pending();
        let Some((revision, draft)) = pending.snapshot.take() else {
            debug!("Auto-save skipped - nothing new since last save");
            return None;
        };
        (revision, draft, pending.campaign_id.clone())
    };

    debug!(revision, campaign_id = ?campaign_id, "Saving draft");
    match shared.backend.save_campaign(campaign_id.as_deref(), &draft).await {
        Ok(campaign) => {
            info!(revision, campaign_id = %campaign.id, "Draft saved");
            shared.pending().campaign_id = Some(campaign.id.clone());
            Some(SaveOutcome::Saved {
                revision,
                campaign_id: campaign.id,
            })
        }
        Err(err) => {
            warn!(revision, error = %err, "Draft save failed");
            let mut pending = shared.pending();
            if pending.snapshot.is_none() {
                pending.snapshot = Some((revision, draft));
            }
            Some(SaveOutcome::Failed {
                revision,
                error: err.to_string(),
            })
        }
    }
}

/// Debounced, serialized draft saver
pub struct AutoSave<B: Backend + 'static> {
    shared: Arc<Shared<B>>,
    delay: Duration,
    timer: Option<JoinHandle<()>>,
    outcomes_tx: mpsc::UnboundedSender<SaveOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<SaveOutcome>,
}

impl<B: Backend + 'static> AutoSave<B> {
    pub fn new(backend: B, delay: Duration) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            shared: Arc::new(Shared {
                backend,
                gate: tokio::sync::Mutex::new(()),
                pending: Mutex::new(Pending::default()),
            }),
            delay,
            timer: None,
            outcomes_tx,
            outcomes_rx,
        }
    }

    /// Continue saving into an existing campaign
    pub fn with_campaign_id(self, id: impl Into<String>) -> Self {
        self.set_campaign_id(id);
        self
    }

    pub fn set_campaign_id(&self, id: impl Into<String>) {
        self.shared.pending().campaign_id = Some(id.into());
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn campaign_id(&self) -> Option<String> {
        self.shared.pending().campaign_id.clone()
    }

    /// True while a snapshot is waiting to be saved
    pub fn has_pending(&self) -> bool {
        self.shared.pending().snapshot.is_some()
    }

    /// Record the newest snapshot and restart the quiet-period timer.
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, revision: u64, draft: DraftPayload) {
        {
            let mut pending = self.shared.pending();
            if matches!(&pending.snapshot, Some((newer, _)) if *newer > revision) {
                debug!(revision, "Ignoring stale snapshot");
                return;
            }
            pending.snapshot = Some((revision, draft));
        }

        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        let shared = Arc::clone(&self.shared);
        let outcomes = self.outcomes_tx.clone();
        let delay = self.delay;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached so a later restart of the timer cannot cancel a save
            // that has already begun
            tokio::spawn(async move {
                if let Some(outcome) = flush(shared).await {
                    let _ = outcomes.send(outcome);
                }
            });
        }));
    }

    /// Save the pending snapshot now, skipping the quiet period. The
    /// outcome is returned rather than sent on the channel.
    pub async fn flush_now(&mut self) -> Option<SaveOutcome> {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        flush(Arc::clone(&self.shared)).await
    }

    /// Wait for the next background save to finish
    pub async fn next_outcome(&mut self) -> Option<SaveOutcome> {
        self.outcomes_rx.recv().await
    }

    /// Background outcomes that have already arrived
    pub fn try_outcomes(&mut self) -> Vec<SaveOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            outcomes.push(outcome);
        }
        outcomes
    }
}

impl<B: Backend + 'static> Drop for AutoSave<B> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
