//! # Mailcraft Store
//!
//! Contracts for the REST persistence collaborator that stores snippets and
//! campaign drafts. The editor only ever talks to a [`Backend`]; the HTTP
//! implementation speaks the JSON API and the in-memory one backs tests and
//! offline previews.

mod backend;
mod error;
mod http;
mod memory;
mod models;

pub use backend::Backend;
pub use error::{StoreError, StoreResult};
pub use http::HttpBackend;
pub use memory::InMemoryBackend;
pub use models::{Audience, Campaign, CampaignStatus, DraftPayload, NewSnippet, SegmentFilters, Snippet};
