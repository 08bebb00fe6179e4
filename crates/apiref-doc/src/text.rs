//! Documentation text with resolved-reference placeholders.
//!
//! Text enters the tree as plain strings. Cross-reference scanning replaces
//! bracketed references with [`Placeholder`] parts carrying the target's
//! curated symbol path; final link emission turns each placeholder into a
//! Markdown link once output paths are known.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A run of documentation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextPart {
    /// Text emitted as-is.
    Literal(String),
    /// A resolved reference awaiting link rendering.
    Placeholder(Placeholder),
}

/// A reference resolved to a curated symbol path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Dotted symbol path in the curated tree.
    pub path: String,
    /// Explicit link text, if the author supplied one.
    pub label: Option<String>,
    /// Original bracketed text, emitted when the placeholder cannot be resolved.
    pub source: String,
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{{{} {}}}", self.path, label),
            None => write!(f, "{{{}}}", self.path),
        }
    }
}

/// Documentation text as a sequence of literal runs and placeholders.
///
/// Serializes to and from a plain string. The string form of a placeholder is
/// `{path}` or `{path label}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub struct DocText {
    parts: Vec<TextPart>,
}

impl DocText {
    /// Create literal text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::from_parts(vec![TextPart::Literal(text.into())])
    }

    /// Build text from parts, merging adjacent literals and dropping empty ones.
    #[must_use]
    pub fn from_parts(parts: Vec<TextPart>) -> Self {
        let mut merged: Vec<TextPart> = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                TextPart::Literal(text) if text.is_empty() => {}
                TextPart::Literal(text) => {
                    if let Some(TextPart::Literal(prev)) = merged.last_mut() {
                        prev.push_str(&text);
                    } else {
                        merged.push(TextPart::Literal(text));
                    }
                }
                placeholder @ TextPart::Placeholder(_) => merged.push(placeholder),
            }
        }
        Self { parts: merged }
    }

    pub fn parts(&self) -> &[TextPart] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The text as a single string, if it holds no placeholders.
    pub fn as_literal(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [] => Some(""),
            [TextPart::Literal(text)] => Some(text),
            _ => None,
        }
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.parts.iter().filter_map(|part| match part {
            TextPart::Placeholder(p) => Some(p),
            TextPart::Literal(_) => None,
        })
    }
}

impl fmt::Display for DocText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            match part {
                TextPart::Literal(text) => f.write_str(text)?,
                TextPart::Placeholder(p) => write!(f, "{p}")?,
            }
        }
        Ok(())
    }
}

impl From<String> for DocText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for DocText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<DocText> for String {
    fn from(text: DocText) -> Self {
        text.to_string()
    }
}
