//! End-to-end engine run.

use apiref_doc::{Docs, Package};
use apiref_format::Formatter;

use crate::error::{Diagnostics, Error};
use crate::exports::{ExportResolver, ExportTable, PathMap};
use crate::links::{Linker, Resolver};
use crate::symbols::SymbolTable;

/// Engine settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineConfig {
    /// Restructure the tree according to `Exports:` directives.
    pub exports: bool,
    /// Promote resolution warnings to errors.
    pub strict: bool,
    /// Shorten derived link text to the last path segment(s).
    pub short_links: bool,
    /// Whether output file names may differ only by case.
    pub case_sensitive: bool,
}

/// A curated tree ready for rendering.
#[derive(Debug)]
pub struct Document {
    /// Version of the documented library.
    pub version: String,
    /// Curated tree, with placeholders in its texts.
    pub root: Package,
    /// Original to curated symbol paths.
    pub map: PathMap,
    /// Symbol table of the curated tree.
    pub symbols: SymbolTable,
    /// Warnings from placeholder insertion.
    pub diagnostics: Diagnostics,
    config: PipelineConfig,
}

impl Document {
    /// Placeholder resolver for pages of this document.
    pub fn resolver<'a>(&'a self, formatter: &'a dyn Formatter) -> Resolver<'a> {
        Resolver::new(
            &self.symbols,
            formatter,
            self.config.short_links,
            self.config.strict,
        )
    }

    /// Original symbol path of a curated symbol, for diagnostics.
    pub fn origin<'a>(&'a self, curated: &'a str) -> &'a str {
        self.map.original(curated).unwrap_or(curated)
    }
}

/// Runs export collection, linking and restructuring.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Turn a declaration tree into a [`Document`].
    ///
    /// Fails on the first fatal error; in strict mode any resolution warning
    /// is fatal.
    pub fn run(&self, docs: Docs) -> Result<Document, Error> {
        let Docs { version, decl } = docs;
        let mut root = decl;
        let mut diagnostics = Diagnostics::new();

        let exports = ExportTable::collect(&mut root);
        let original = SymbolTable::build(&root, self.config.case_sensitive);
        let resolver = ExportResolver::new(&exports, self.config.exports);
        let map = resolver.plan(&root)?;
        tracing::info!(
            symbols = original.len(),
            exported = map.len(),
            "Planned export mapping"
        );

        Linker::new(&map, &original, self.config.strict)
            .insert_placeholders(&mut root, &mut diagnostics)?;
        tracing::info!(warnings = diagnostics.len(), "Inserted placeholders");

        let restructured = resolver.restructure(&root)?;
        let symbols = SymbolTable::build(&restructured.root, self.config.case_sensitive);
        tracing::info!(symbols = symbols.len(), "Built curated symbol table");

        Ok(Document {
            version,
            root: restructured.root,
            map: restructured.map,
            symbols,
            diagnostics,
            config: self.config,
        })
    }
}
