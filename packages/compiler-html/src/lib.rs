//! # Email HTML Compiler
//!
//! Turns an ordered block list into a complete, self-contained HTML email:
//! table-based layout, inline styles only, and Outlook (MSO) conditional
//! markup where the desktop client needs its own rendering path.
//!
//! Compilation is a pure function of its inputs. It never fails: blocks of
//! unknown types contribute nothing and the rest of the email still renders.

mod compiler;
mod render;


pub use compiler::{compile, compile_to_html, strip_merge_tag_wrappers, CompileOptions, FooterOptions};
pub use render::{render_block, CONTENT_WIDTH, EMAIL_WIDTH};
