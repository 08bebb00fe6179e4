//! Declaration tree model for apiref.
//!
//! This crate provides:
//! - The declaration node types ([`Package`], [`Module`], [`Struct`], [`Trait`],
//!   [`Function`], [`Field`], [`Alias`], [`Parameter`], [`Argument`])
//! - [`Node`]: a borrowed, closed tagged union over all node kinds
//! - [`DocText`]: documentation text as literal runs and link placeholders
//! - [`load`]/[`parse`]: the JSON tree source
//! - [`walk`]: shared depth-first traversals
//!
//! # Sharing
//!
//! Module-level content (structs, traits, functions, aliases) is held behind
//! [`Arc`](std::sync::Arc) so that a curated tree can alias it without copying.
//! Text rewriting goes through [`Arc::make_mut`](std::sync::Arc::make_mut) and
//! must happen before any alias exists.

mod model;
mod node;
mod source;
mod text;
pub mod walk;

pub use model::{Alias, Argument, Docs, Field, Function, Module, Package, Parameter, Struct, Trait};
pub use node::{Kind, Node};
pub use source::{SourceError, load, parse};
pub use text::{DocText, Placeholder, TextPart};
