//! The [`Formatter`] contract and backend selection.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use apiref_doc::Kind;
use serde::Deserialize;

use crate::hugo::HugoFormatter;
use crate::mdbook::MdBookFormatter;
use crate::plain::PlainFormatter;

/// Path naming rules supplied by an output backend.
///
/// Output paths are the file-system segments of a page, with case folding
/// already applied. Packages and modules are directories holding an index
/// page; every other page kind is a single file in its parent's directory.
pub trait Formatter: Send + Sync {
    /// Backend name for diagnostics.
    fn name(&self) -> &'static str;

    /// File to write for a page, relative to the output directory.
    fn file_path(&self, segments: &[String], kind: Kind) -> PathBuf;

    /// Link to emit for a page, given its path relative to the linking page's
    /// directory (`/`-joined, `.` when both share a directory).
    fn link_path(&self, relative: &str, kind: Kind, anchor: Option<&str>) -> String;

    /// Whether output file names may differ only by case.
    fn case_sensitive(&self) -> bool;

    /// Extra files the backend needs besides the pages themselves.
    fn auxiliary_files(&self, pages: &[PageRef]) -> Vec<AuxFile> {
        let _ = pages;
        Vec::new()
    }
}

/// A rendered page, as listed for auxiliary files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    /// Display name (the node's own name).
    pub name: String,
    /// Output path segments.
    pub segments: Vec<String>,
    pub kind: Kind,
}

/// An extra output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxFile {
    /// Path relative to the output directory.
    pub path: PathBuf,
    pub content: String,
}

/// Available output backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    #[default]
    Plain,
    MdBook,
    Hugo,
}

impl FormatKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::MdBook => "mdbook",
            Self::Hugo => "hugo",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatKind {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "mdbook" => Ok(Self::MdBook),
            "hugo" => Ok(Self::Hugo),
            other => Err(FormatError::UnknownFormat(other.to_owned())),
        }
    }
}

/// Error returned for invalid format selection.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Unknown output format '{0}' (expected plain, mdbook or hugo)")]
    UnknownFormat(String),
}

/// Create the backend for `kind`.
pub fn formatter(kind: FormatKind, case_sensitive: bool) -> Box<dyn Formatter> {
    match kind {
        FormatKind::Plain => Box::new(PlainFormatter::new(case_sensitive)),
        FormatKind::MdBook => Box::new(MdBookFormatter::new(case_sensitive)),
        FormatKind::Hugo => Box::new(HugoFormatter::new(case_sensitive)),
    }
}

/// Directory-with-index layout shared by all backends.
pub(crate) fn page_file(segments: &[String], kind: Kind, index: &str) -> PathBuf {
    let Some((last, parents)) = segments.split_last() else {
        return PathBuf::from(index);
    };
    let mut path: PathBuf = parents.iter().collect();
    if kind.is_container() {
        path.push(last);
        path.push(index);
    } else {
        path.push(format!("{last}.md"));
    }
    path
}

/// Relative link to a page file in the same layout, with optional anchor.
pub(crate) fn page_link(relative: &str, kind: Kind, index: &str, anchor: Option<&str>) -> String {
    let file = if kind.is_container() {
        format!("{relative}/{index}")
    } else {
        format!("{relative}.md")
    };
    match anchor {
        Some(anchor) => format!("{file}#{anchor}"),
        None => file,
    }
}
