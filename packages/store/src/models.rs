use crate::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use mailcraft_blocks::{parse_document_lossy, serialize_document, Block};
use serde::{Deserialize, Serialize};

/// A saved, reusable run of blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub blocks: Vec<Block>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /snippets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSnippet {
    pub name: String,
    pub category: String,
    pub blocks: Vec<Block>,
}

impl NewSnippet {
    pub fn new(name: impl Into<String>, category: impl Into<String>, blocks: Vec<Block>) -> StoreResult<Self> {
        if blocks.is_empty() {
            return Err(StoreError::EmptySnippet);
        }

        Ok(Self {
            name: name.into(),
            category: category.into(),
            blocks,
        })
    }
}

/// Who a campaign goes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[default]
    All,
    Segment,
}

/// Subscriber filters applied when the audience is a segment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SegmentFilters {
    pub sources: Vec<String>,
    pub tags: Vec<String>,
}

/// Persisted campaign fields, sent on create and update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DraftPayload {
    pub subject: String,
    pub preheader: String,
    /// Serialized document (JSON array of blocks)
    pub body: String,
    /// Compiled email HTML for `body`
    pub body_html: String,
    pub audience: Audience,
    pub segment_filters: SegmentFilters,
    pub scheduled_for: Option<DateTime<Utc>>,
}

impl DraftPayload {
    pub fn with_blocks(mut self, blocks: &[Block], body_html: String) -> StoreResult<Self> {
        self.body = serialize_document(blocks)?;
        self.body_html = body_html;
        Ok(self)
    }

    /// Decode `body`; malformed bodies load as an empty document
    pub fn blocks(&self) -> Vec<Block> {
        parse_document_lossy(&self.body)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Scheduled,
    Sent,
}

/// A stored campaign as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    #[serde(flatten)]
    pub draft: DraftPayload,
    #[serde(default)]
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
