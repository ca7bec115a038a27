use anyhow::Context;
use mailcraft_blocks::{default_merge_tags, MergeTag};
use mailcraft_compiler_html::CompileOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "mailcraft.config.json";

/// Bearer token for the REST backend
pub const API_TOKEN_ENV: &str = "MAILCRAFT_API_TOKEN";

/// Mailcraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the snippet/campaign API
    pub api_base_url: String,

    /// Quiet period before a draft is auto-saved
    pub autosave_delay_ms: u64,

    /// Directory holding stored documents (`*.json`)
    pub src_dir: String,

    /// Where compiled emails are written
    pub out_dir: String,

    /// Merge tags offered in the slash palette
    pub merge_tags: Vec<MergeTag>,

    /// Email shell and footer options
    pub compile: CompileOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            autosave_delay_ms: 1500,
            src_dir: "emails".to_string(),
            out_dir: "dist".to_string(),
            merge_tags: default_merge_tags(),
            compile: CompileOptions::default(),
        }
    }
}

impl Config {
    /// Load config from a directory; a missing file gives the defaults
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid {}", config_path.display()))
    }

    pub fn src_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.src_dir)
    }

    pub fn out_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.out_dir)
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    /// Token from the environment; empty counts as unset
    pub fn api_token() -> Option<String> {
        std::env::var(API_TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}
