//! Documentation engine for apiref.
//!
//! Turns a declaration tree into a curated, linkable document:
//!
//! 1. `Exports:` directives are parsed out of package and module text
//!    ([`ExportTable`]).
//! 2. Bracketed references are resolved against the declaration tree and
//!    replaced by placeholders carrying curated symbol paths ([`Linker`]).
//! 3. The curated tree is built by [`ExportResolver`], aliasing leaf nodes of
//!    the declaration tree.
//! 4. A [`SymbolTable`] over the curated tree maps symbol paths to output
//!    paths, and [`Resolver`] turns placeholders into relative Markdown links.
//!
//! [`Pipeline`] runs steps 1 to 4 and returns a [`Document`].

mod error;
mod exports;
mod fence;
mod links;
mod pipeline;
mod scan;
mod symbols;

pub use error::{Diagnostics, Error, LinkWarning};
pub use fence::UnclosedFence;
pub use exports::{ExportResolver, ExportTable, PathMap, Restructured, parse_exports};
pub use links::{Linker, Resolver, absolute_target};
pub use pipeline::{Document, Pipeline, PipelineConfig};
pub use scan::{Reference, scan_references};
pub use symbols::{Entry, SymbolTable, relative_segments};
