//! Plain Markdown directory tree.

use std::path::PathBuf;

use apiref_doc::Kind;

use crate::backend::{Formatter, page_file, page_link};

const INDEX_FILE: &str = "_index.md";

/// Writes a plain Markdown tree with `_index.md` files for containers.
#[derive(Debug, Clone)]
pub struct PlainFormatter {
    case_sensitive: bool,
}

impl PlainFormatter {
    #[must_use]
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }
}

impl Formatter for PlainFormatter {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn file_path(&self, segments: &[String], kind: Kind) -> PathBuf {
        page_file(segments, kind, INDEX_FILE)
    }

    fn link_path(&self, relative: &str, kind: Kind, anchor: Option<&str>) -> String {
        page_link(relative, kind, INDEX_FILE, anchor)
    }

    fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}
