//! Bracketed reference scanner.
//!
//! A reference is `[target]` or `[target label]`, where `target` is a dotted
//! symbol path optionally prefixed with dots for relative lookup. Matches are
//! skipped when they:
//!
//! - start inside a fenced code block or an inline code span,
//! - are followed by `(` (a regular Markdown link),
//! - are preceded by `\` or an identifier character (escapes, `xs[0]`).

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::fence::{UnclosedFence, code_regions};

static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\.*)([A-Za-z0-9_][A-Za-z0-9_.]*)(?: ([^\[\]\n]+))?\]").unwrap()
});

/// A reference found in documentation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference<'t> {
    /// Byte range of the whole bracketed token.
    pub range: Range<usize>,
    /// Number of leading dots.
    pub dots: usize,
    /// Dotted path after the leading dots.
    pub target: &'t str,
    /// Explicit link text.
    pub label: Option<&'t str>,
    /// The bracketed token as written.
    pub source: &'t str,
}

/// Find every reference in `text`, in order.
///
/// Fails if a fenced code block is left open.
pub fn scan_references(text: &str) -> Result<Vec<Reference<'_>>, UnclosedFence> {
    let regions = code_regions(text)?;
    let bytes = text.as_bytes();

    let references = REFERENCE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let range = whole.range();
            if regions.iter().any(|r| r.contains(&range.start)) {
                return None;
            }
            if bytes.get(range.end) == Some(&b'(') {
                return None;
            }
            if let Some(&prev) = range.start.checked_sub(1).and_then(|i| bytes.get(i))
                && (prev == b'\\' || prev == b'_' || prev.is_ascii_alphanumeric())
            {
                return None;
            }
            Some(Reference {
                dots: caps.get(1).map_or(0, |m| m.len()),
                target: caps.get(2)?.as_str(),
                label: caps.get(3).map(|m| m.as_str()),
                source: whole.as_str(),
                range,
            })
        })
        .collect();
    Ok(references)
}

/// Whether braces in a label are balanced.
pub(crate) fn balanced_label(label: &str) -> bool {
    let mut depth: usize = 0;
    for ch in label.chars() {
        match ch {
            '{' => depth += 1,
            '}' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}
