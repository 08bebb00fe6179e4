//! Page buffer with link resolution.

use std::fmt::Write;

use apiref_core::{Diagnostics, Document, Entry, Error, Resolver};
use apiref_doc::DocText;

/// A page being written.
pub(crate) struct Page<'a> {
    document: &'a Document,
    resolver: Resolver<'a>,
    entry: &'a Entry,
    out: String,
    diagnostics: Diagnostics,
}

impl<'a> Page<'a> {
    pub(crate) fn new(document: &'a Document, resolver: Resolver<'a>, entry: &'a Entry) -> Self {
        Self {
            document,
            resolver,
            entry,
            out: String::with_capacity(2048),
            diagnostics: Diagnostics::new(),
        }
    }

    pub(crate) fn entry(&self) -> &'a Entry {
        self.entry
    }

    /// Link text for `text`, written by the node at curated `symbol`.
    pub(crate) fn resolve(&mut self, text: &DocText, symbol: &str) -> Result<String, Error> {
        let origin = self.document.origin(symbol);
        let resolved = self
            .resolver
            .resolve(text, self.entry, origin, &mut self.diagnostics)?;
        Ok(resolved.trim().to_owned())
    }

    /// Link from this page to the page or section of `symbol`.
    pub(crate) fn link(&self, symbol: &str) -> Option<String> {
        let target = self.document.symbols.get(symbol)?;
        Some(self.resolver.link_to(target, self.entry))
    }

    pub(crate) fn heading(&mut self, level: usize, title: &str) {
        let _ = writeln!(self.out, "{} {title}\n", "#".repeat(level));
    }

    /// Write `text` as a paragraph, if non-empty.
    pub(crate) fn paragraph(&mut self, text: &DocText, symbol: &str) -> Result<(), Error> {
        if text.is_empty() {
            return Ok(());
        }
        let resolved = self.resolve(text, symbol)?;
        if !resolved.is_empty() {
            let _ = writeln!(self.out, "{resolved}\n");
        }
        Ok(())
    }

    /// Write `text` after a bold label, if non-empty.
    pub(crate) fn labeled(&mut self, label: &str, text: &DocText, symbol: &str) -> Result<(), Error> {
        if text.is_empty() {
            return Ok(());
        }
        let resolved = self.resolve(text, symbol)?;
        let _ = writeln!(self.out, "**{label}:** {resolved}\n");
        Ok(())
    }

    pub(crate) fn code_block(&mut self, code: &str) {
        if code.is_empty() {
            return;
        }
        let _ = writeln!(self.out, "```mojo\n{}\n```\n", code.trim_end());
    }

    pub(crate) fn line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    pub(crate) fn blank(&mut self) {
        self.out.push('\n');
    }

    pub(crate) fn finish(self) -> (String, Diagnostics) {
        let mut content = self.out;
        let trimmed = content.trim_end().len();
        content.truncate(trimmed);
        content.push('\n');
        (content, self.diagnostics)
    }
}
