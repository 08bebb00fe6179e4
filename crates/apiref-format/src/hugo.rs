//! Hugo content tree.
//!
//! Pages use Hugo's `_index.md` section convention. Links go through the
//! `ref` shortcode so Hugo validates them at site build time.

use std::path::PathBuf;

use apiref_doc::Kind;

use crate::backend::{Formatter, page_file, page_link};

const INDEX_FILE: &str = "_index.md";

#[derive(Debug, Clone)]
pub struct HugoFormatter {
    case_sensitive: bool,
}

impl HugoFormatter {
    #[must_use]
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }
}

impl Formatter for HugoFormatter {
    fn name(&self) -> &'static str {
        "hugo"
    }

    fn file_path(&self, segments: &[String], kind: Kind) -> PathBuf {
        page_file(segments, kind, INDEX_FILE)
    }

    fn link_path(&self, relative: &str, kind: Kind, anchor: Option<&str>) -> String {
        let target = page_link(relative, kind, INDEX_FILE, anchor);
        format!("{{{{< ref \"{target}\" >}}}}")
    }

    fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}
