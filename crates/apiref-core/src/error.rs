//! Engine errors and resolution warnings.
//!
//! Every error and warning names the original symbol path of the node whose
//! text held the offending reference.

use std::fmt;

/// Fatal engine error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Export filtering is enabled but nothing declares an `Exports:` block.
    #[error("Export filtering is enabled but no package or module declares `Exports:`")]
    NoExports,

    /// A reference label has unbalanced braces.
    #[error("{path}: malformed reference label in `{reference}`")]
    MalformedLabel { path: String, reference: String },

    /// A reference names no node (strict mode).
    #[error("{path}: unresolved reference `{reference}`")]
    UnresolvedReference { path: String, reference: String },

    /// A reference names a node the curated tree does not export (strict mode).
    #[error("{path}: reference `{reference}` names a symbol that is not exported")]
    NotExported { path: String, reference: String },

    /// A relative reference climbs above the root (strict mode).
    #[error(
        "{path}: relative reference `{reference}` climbs {dots} level(s) but only {depth} available"
    )]
    RelativeScope {
        path: String,
        reference: String,
        dots: usize,
        depth: usize,
    },

    /// A fenced code block is still open at the end of a text field.
    #[error("{path}: unclosed code fence")]
    UnbalancedFence { path: String },
}

/// Non-fatal resolution problem.
///
/// Promoted to an [`Error`] in strict mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkWarning {
    Unresolved {
        path: String,
        reference: String,
    },
    NotExported {
        path: String,
        reference: String,
    },
    RelativeScope {
        path: String,
        reference: String,
        dots: usize,
        depth: usize,
    },
}

impl LinkWarning {
    /// Original symbol path of the node holding the reference.
    pub fn path(&self) -> &str {
        match self {
            Self::Unresolved { path, .. }
            | Self::NotExported { path, .. }
            | Self::RelativeScope { path, .. } => path,
        }
    }

    #[must_use]
    pub fn into_error(self) -> Error {
        match self {
            Self::Unresolved { path, reference } => Error::UnresolvedReference { path, reference },
            Self::NotExported { path, reference } => Error::NotExported { path, reference },
            Self::RelativeScope {
                path,
                reference,
                dots,
                depth,
            } => Error::RelativeScope {
                path,
                reference,
                dots,
                depth,
            },
        }
    }
}

impl fmt::Display for LinkWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.clone().into_error(), f)
    }
}

/// Accumulated resolution warnings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    warnings: Vec<LinkWarning>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning, or fail with it in strict mode.
    pub(crate) fn report(&mut self, warning: LinkWarning, strict: bool) -> Result<(), Error> {
        if strict {
            return Err(warning.into_error());
        }
        tracing::warn!(path = warning.path(), "{warning}");
        self.warnings.push(warning);
        Ok(())
    }

    pub fn warnings(&self) -> &[LinkWarning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Append the warnings of `other`.
    pub fn extend(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
    }
}
