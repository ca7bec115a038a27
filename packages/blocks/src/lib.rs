//! # Mailcraft Blocks
//!
//! Block schema for the email builder: the closed set of block types, their
//! typed property structs, the static registry, id generation, merge tags and
//! the JSON wire format for stored documents.
//!
//! ```rust,ignore
//! use mailcraft_blocks::{registry, BlockType, SequentialIds};
//!
//! let mut ids = SequentialIds::from_clock();
//! let block = registry::create(BlockType::Cta, &mut ids);
//!
//! let json = mailcraft_blocks::serialize_document(&[block])?;
//! let blocks = mailcraft_blocks::parse_document_lossy(&json);
//! ```

pub mod block;
pub mod error;
pub mod id_generator;
mod lenient;
pub mod markup;
pub mod merge_tag;
pub mod registry;
pub mod serializer;

pub use block::{
    Alignment, Block, BlockId, BlockProps, BlockType, ColumnRatio, CtaProps, DividerProps,
    HeaderProps, ImageProps, ProductProps, RichTextProps, SpacerProps, TestimonialProps,
    TwoColumnProps,
};
pub use error::{BlockError, BlockResult};
pub use id_generator::{IdSource, SequentialIds};
pub use merge_tag::{default_merge_tags, MergeTag};
pub use registry::BlockDescriptor;
pub use serializer::{parse_document, parse_document_lossy, serialize_document};
