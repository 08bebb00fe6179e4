//! Markdown page rendering for apiref.
//!
//! [`MarkdownRenderer`] writes one page per package, module, struct, trait
//! and module-level function of a curated [`Document`](apiref_core::Document).
//! Member sections use headings whose anchors match the symbol table, and
//! every text field is linked right before it is written.

mod markdown;
mod page;

pub use markdown::{MarkdownRenderer, Rendered, RenderedPage};
