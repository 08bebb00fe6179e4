//! mdBook source tree.
//!
//! Containers use `README.md`, which mdBook turns into the chapter index.
//! A `SUMMARY.md` listing every page in tree order is written alongside.

use std::fmt::Write;
use std::path::PathBuf;

use apiref_doc::Kind;

use crate::backend::{AuxFile, Formatter, PageRef, page_file, page_link};

const INDEX_FILE: &str = "README.md";
const SUMMARY_FILE: &str = "SUMMARY.md";

#[derive(Debug, Clone)]
pub struct MdBookFormatter {
    case_sensitive: bool,
}

impl MdBookFormatter {
    #[must_use]
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }
}

impl Formatter for MdBookFormatter {
    fn name(&self) -> &'static str {
        "mdbook"
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

    fn auxiliary_files(&self, pages: &[PageRef]) -> Vec<AuxFile> {
        let mut summary = String::from("# Summary\n\n");
        for page in pages {
            let depth = page.segments.len().saturating_sub(1);
            let link = page_link(&page.segments.join("/"), page.kind, INDEX_FILE, None);
            let _ = writeln!(summary, "{}- [{}]({})", "  ".repeat(depth), page.name, link);
        }
        vec![AuxFile {
            path: PathBuf::from(SUMMARY_FILE),
            content: summary,
        }]
    }
}
