use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use mailcraft_blocks::parse_document;
use mailcraft_editor::{AutoSave, CampaignComposer, EditSession, SaveOutcome, Toasts};
use mailcraft_store::{Backend, HttpBackend};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Args)]
pub struct PushArgs {
    /// Stored document to upload
    pub file: PathBuf,

    /// Campaign subject line
    #[arg(short, long)]
    pub subject: String,

    /// Hidden inbox preview text
    #[arg(long)]
    pub preheader: Option<String>,

    /// Update this campaign instead of creating a new one
    #[arg(long)]
    pub campaign: Option<String>,
}

pub fn push(args: PushArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = cwd.join(&args.file);
    let source = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_document(&source).with_context(|| format!("{} is not a valid document", path.display()))?;

    let backend = HttpBackend::new(config.api_base_url.as_str(), Config::api_token())?;

    println!("{}", "📤 Uploading draft...".bright_blue().bold());
    let runtime = tokio::runtime::Runtime::new()?;
    let campaign_id = runtime.block_on(push_draft(backend, &config, &args, &source))?;

    println!("{} Saved draft {}", "✓".green(), campaign_id.bright_white());
    Ok(())
}

/// Load the document into a composer and let auto-save persist it after
/// the configured quiet period
async fn push_draft<B: Backend + 'static>(
    backend: B,
    config: &Config,
    args: &PushArgs,
    source: &str,
) -> Result<String> {
    let mut autosave = AutoSave::new(backend, config.autosave_delay());
    if let Some(id) = &args.campaign {
        autosave = autosave.with_campaign_id(id.as_str());
    }

    let session = EditSession::with_clock().with_merge_tags(config.merge_tags.clone());
    let mut composer = CampaignComposer::new(session, Toasts::new())
        .with_autosave(autosave)
        .with_compile_options(config.compile.clone());

    composer.set_subject(args.subject.as_str());
    if let Some(preheader) = &args.preheader {
        composer.set_preheader(preheader.as_str());
    }
    composer.edit(|session| session.import_json(source));

    match composer.wait_for_save().await {
        Some(SaveOutcome::Saved { campaign_id, revision }) => {
            info!(campaign_id = %campaign_id, revision, blocks = composer.session().blocks().len(), "Draft pushed");
            Ok(campaign_id)
        }
        Some(SaveOutcome::Failed { error, .. }) => Err(anyhow!("Could not save draft: {}", error)),
        None => Err(anyhow!("Auto-save stopped before the draft was saved")),
    }
}
