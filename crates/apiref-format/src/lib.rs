//! Output format backends for apiref.
//!
//! A [`Formatter`] maps an output path (the file-system segments of a page)
//! and a node [`Kind`](apiref_doc::Kind) to the file that gets written and to
//! the link text emitted in cross-references. Backends:
//!
//! - [`PlainFormatter`]: a plain Markdown directory tree
//! - [`MdBookFormatter`]: mdBook sources, including `SUMMARY.md`
//! - [`HugoFormatter`]: Hugo content with `ref` shortcode links
//!
//! Case-insensitive file systems are handled by [`fold_segment`].

mod backend;
mod case;
mod hugo;
mod mdbook;
mod plain;

pub use backend::{AuxFile, FormatError, FormatKind, Formatter, PageRef, formatter};
pub use case::{CASE_MARKER, fold_segment, probe_case_sensitivity};
pub use hugo::HugoFormatter;
pub use mdbook::MdBookFormatter;
pub use plain::PlainFormatter;
