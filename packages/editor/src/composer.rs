//! # Campaign Composer
//!
//! Campaign metadata around an [`EditSession`]. All unsaved-change
//! bookkeeping goes through the session's [`ChangeTracker`]: field setters
//! bump the same revision as document edits, and every bump hands a fresh
//! draft snapshot to the auto-saver.
//!
//! [`ChangeTracker`]: crate::ChangeTracker

use crate::{AutoSave, EditSession, EditorResult, SaveOutcome, Toasts};
use chrono::{DateTime, Utc};
use mailcraft_blocks::{IdSource, SequentialIds};
use mailcraft_compiler_html::CompileOptions;
use mailcraft_store::{Audience, Backend, Campaign, DraftPayload, SegmentFilters};
use tracing::{debug, warn};

pub struct CampaignComposer<B: Backend + 'static, I: IdSource = SequentialIds> {
    subject: String,
    preheader: String,
    audience: Audience,
    segment_filters: SegmentFilters,
    scheduled_for: Option<DateTime<Utc>>,

    session: EditSession<I>,
    compile_options: CompileOptions,
    campaign_id: Option<String>,
    autosave: Option<AutoSave<B>>,
    toasts: Toasts,
}

impl<B: Backend + 'static, I: IdSource> CampaignComposer<B, I> {
    pub fn new(session: EditSession<I>, toasts: Toasts) -> Self {
        Self {
            subject: String::new(),
            preheader: String::new(),
            audience: Audience::default(),
            segment_filters: SegmentFilters::default(),
            scheduled_for: None,
            session,
            compile_options: CompileOptions::default(),
            campaign_id: None,
            autosave: None,
            toasts,
        }
    }

    pub fn with_autosave(mut self, autosave: AutoSave<B>) -> Self {
        if let Some(id) = &self.campaign_id {
            autosave.set_campaign_id(id.clone());
        }
        self.autosave = Some(autosave);
        self
    }

    /// Footer and layout settings; title and preheader come from the
    /// campaign fields
    pub fn with_compile_options(mut self, options: CompileOptions) -> Self {
        self.compile_options = options;
        self
    }

    /// Load a stored campaign. The loaded state counts as saved.
    pub fn load(&mut self, campaign: &Campaign) {
        let draft = &campaign.draft;
        self.subject = draft.subject.clone();
        self.preheader = draft.preheader.clone();
        self.audience = draft.audience;
        self.segment_filters = draft.segment_filters.clone();
        self.scheduled_for = draft.scheduled_for;
        self.session.import_json(&draft.body);

        self.campaign_id = Some(campaign.id.clone());
        if let Some(autosave) = &self.autosave {
            autosave.set_campaign_id(campaign.id.clone());
        }

        let revision = self.session.changes().revision();
        self.session.mark_saved(revision);
        debug!(campaign_id = %campaign.id, blocks = self.session.blocks().len(), "Loaded campaign");
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn preheader(&self) -> &str {
        &self.preheader
    }

    pub fn audience(&self) -> Audience {
        self.audience
    }

    pub fn segment_filters(&self) -> &SegmentFilters {
        &self.segment_filters
    }

    pub fn scheduled_for(&self) -> Option<DateTime<Utc>> {
        self.scheduled_for
    }

    pub fn session(&self) -> &EditSession<I> {
        &self.session
    }

    pub fn campaign_id(&self) -> Option<&str> {
        self.campaign_id.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.session.is_dirty()
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        let subject = subject.into();
        if subject != self.subject {
            self.subject = subject;
            self.changed();
        }
    }

    pub fn set_preheader(&mut self, preheader: impl Into<String>) {
        let preheader = preheader.into();
        if preheader != self.preheader {
            self.preheader = preheader;
            self.changed();
        }
    }

    pub fn set_audience(&mut self, audience: Audience) {
        if audience != self.audience {
            self.audience = audience;
            self.changed();
        }
    }

    pub fn set_segment_filters(&mut self, filters: SegmentFilters) {
        if filters != self.segment_filters {
            self.segment_filters = filters;
            self.changed();
        }
    }

    pub fn set_scheduled_for(&mut self, when: Option<DateTime<Utc>>) {
        if when != self.scheduled_for {
            self.scheduled_for = when;
            self.changed();
        }
    }

    /// Edit the document. If the edit changed anything the auto-saver is
    /// notified.
    pub fn edit<R>(&mut self, edit: impl FnOnce(&mut EditSession<I>) -> R) -> R {
        let before = self.session.changes().revision();
        let result = edit(&mut self.session);
        if self.session.changes().revision() != before {
            self.notify();
        }
        result
    }

    fn changed(&mut self) {
        self.session.mark_changed();
        self.notify();
    }

    fn notify(&mut self) {
        if self.autosave.is_none() {
            return;
        }

        let revision = self.session.changes().revision();
        let draft = match self.draft() {
            Ok(draft) => draft,
            Err(err) => {
                warn!(revision, error = %err, "Could not snapshot draft");
                return;
            }
        };

        if let Some(autosave) = &mut self.autosave {
            autosave.schedule(revision, draft);
        }
    }

    /// Compile options for the current campaign fields
    pub fn compile_options(&self) -> CompileOptions {
        let mut options = self.compile_options.clone();
        if !self.subject.trim().is_empty() {
            options.title = self.subject.clone();
        }
        options.preheader = self.preheader.clone();
        options
    }

    pub fn compile(&self) -> String {
        self.session.compile(&self.compile_options())
    }

    /// The payload persisted for this campaign
    pub fn draft(&self) -> EditorResult<DraftPayload> {
        let draft = DraftPayload {
            subject: self.subject.clone(),
            preheader: self.preheader.clone(),
            audience: self.audience,
            segment_filters: self.segment_filters.clone(),
            scheduled_for: self.scheduled_for,
            ..Default::default()
        };
        Ok(draft.with_blocks(self.session.blocks(), self.compile())?)
    }

    fn record(&mut self, outcome: &SaveOutcome) {
        match outcome {
            SaveOutcome::Saved { revision, campaign_id } => {
                self.session.mark_saved(*revision);
                self.campaign_id = Some(campaign_id.clone());
            }
            SaveOutcome::Failed { error, .. } => {
                self.toasts.error(format!("Could not save draft: {}", error));
            }
        }
    }

    /// Save right away instead of waiting for the quiet period. Returns
    /// `None` without an auto-saver or when everything is already saved.
    pub async fn save_now(&mut self) -> Option<SaveOutcome> {
        if !self.session.is_dirty() {
            return None;
        }

        let revision = self.session.changes().revision();
        let draft = match self.draft() {
            Ok(draft) => draft,
            Err(err) => {
                warn!(revision, error = %err, "Could not snapshot draft");
                return None;
            }
        };

        let autosave = self.autosave.as_mut()?;
        autosave.schedule(revision, draft);
        let outcome = autosave.flush_now().await?;

        self.record(&outcome);
        if matches!(outcome, SaveOutcome::Saved { .. }) {
            self.toasts.success("Draft saved");
        }
        Some(outcome)
    }

    /// Apply background save outcomes that have already arrived
    pub fn poll_saves(&mut self) -> Vec<SaveOutcome> {
        let outcomes = match &mut self.autosave {
            Some(autosave) => autosave.try_outcomes(),
            None => return Vec::new(),
        };
        for outcome in &outcomes {
            self.record(outcome);
        }
        outcomes
    }

    /// Wait for the next background save and apply it
    pub async fn wait_for_save(&mut self) -> Option<SaveOutcome> {
        let outcome = self.autosave.as_mut()?.next_outcome().await?;
        self.record(&outcome);
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Document, ToastKind};
    use mailcraft_blocks::{parse_document, BlockType};
    use mailcraft_store::InMemoryBackend;
    use std::sync::Arc;
    use std::time::Duration;

    type Composer = CampaignComposer<Arc<InMemoryBackend>>;

    fn composer(backend: &Arc<InMemoryBackend>, toasts: &Toasts) -> Composer {
        let session = EditSession::new(Document::new(), SequentialIds::from_seed("cmp"));
        CampaignComposer::new(session, toasts.clone())
            .with_autosave(AutoSave::new(Arc::clone(backend), Duration::from_millis(500)))
    }

    #[test]
    fn test_draft_carries_body_and_html() {
        let session = EditSession::new(Document::new(), SequentialIds::from_seed("d"));
        let mut composer: Composer = CampaignComposer::new(session, Toasts::new());
        composer.set_subject("Spring sale");
        composer.set_preheader("Everything 20% off");
        composer.edit(|session| session.add_block(BlockType::Header));

        let draft = composer.draft().unwrap();
        assert_eq!(draft.subject, "Spring sale");
        assert_eq!(parse_document(&draft.body).unwrap(), composer.session().blocks());
        assert!(draft.body_html.contains("<title>Spring sale</title>"));
        assert!(draft.body_html.contains("Everything 20% off"));
    }

    #[test]
    fn test_setters_share_one_revision() {
        let session = EditSession::new(Document::new(), SequentialIds::from_seed("r"));
        let mut composer: Composer = CampaignComposer::new(session, Toasts::new());

        composer.set_subject("A");
        composer.set_subject("A");
        composer.set_audience(Audience::Segment);
        composer.edit(|session| session.add_block(BlockType::Divider));
        composer.edit(|session| session.delete("missing"));

        assert_eq!(composer.session().changes().revision(), 3);
        assert!(composer.is_dirty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_autosave_after_quiet_period() {
        let backend = Arc::new(InMemoryBackend::new());
        let toasts = Toasts::new();
        let mut composer = composer(&backend, &toasts);

        composer.set_subject("Hello");
        composer.edit(|session| session.add_block(BlockType::Cta));
        composer.set_subject("Hello there");

        let outcome = composer.wait_for_save().await.unwrap();
        assert!(matches!(outcome, SaveOutcome::Saved { revision: 3, .. }));
        assert!(!composer.is_dirty());
        assert!(composer.campaign_id().is_some());

        let saves = backend.campaign_saves();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].subject, "Hello there");
        assert_eq!(saves[0].blocks().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_save_toasts_and_stays_dirty() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.set_offline(true);
        let toasts = Toasts::new();
        let mut composer = composer(&backend, &toasts);

        composer.set_subject("Offline");
        let outcome = composer.wait_for_save().await.unwrap();

        assert!(matches!(outcome, SaveOutcome::Failed { .. }));
        assert!(composer.is_dirty());
        assert_eq!(toasts.drain()[0].kind, ToastKind::Error);

        backend.set_offline(false);
        let retried = composer.save_now().await.unwrap();
        assert!(matches!(retried, SaveOutcome::Saved { .. }));
        assert!(!composer.is_dirty());
        assert!(composer.poll_saves().is_empty());
    }

    #[tokio::test]
    async fn test_load_counts_as_saved() {
        let backend = Arc::new(InMemoryBackend::new());
        let toasts = Toasts::new();

        let mut source = composer(&backend, &toasts);
        source.set_subject("Stored");
        source.edit(|session| session.add_block(BlockType::Image));
        source.save_now().await.unwrap();
        let id = source.campaign_id().unwrap().to_string();

        let campaign = backend.get_campaign(&id).await.unwrap();
        let mut loaded = composer(&backend, &toasts);
        loaded.load(&campaign);

        assert_eq!(loaded.subject(), "Stored");
        assert_eq!(loaded.session().blocks().len(), 1);
        assert!(!loaded.is_dirty());
        assert_eq!(loaded.campaign_id(), Some(id.as_str()));
    }
}
