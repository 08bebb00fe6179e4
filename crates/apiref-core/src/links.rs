//! Cross-reference linking.
//!
//! [`Linker`] runs on the declaration tree before restructuring. It resolves
//! each bracketed reference to an original symbol path, maps that to the
//! curated path, and replaces the token with a [`Placeholder`].
//!
//! [`Resolver`] runs on the curated tree while rendering. It turns each
//! placeholder into a Markdown link relative to the referencing page.

use apiref_doc::walk::visit_texts_mut;
use apiref_doc::{DocText, Package, Placeholder, TextPart};
use apiref_format::Formatter;

use crate::error::{Diagnostics, Error, LinkWarning};
use crate::exports::PathMap;
use crate::scan::{Reference, balanced_label, scan_references};
use crate::symbols::{Entry, SymbolTable, relative_segments};

/// Absolute original symbol path for a reference written at `scope`.
///
/// `scope` is the symbol path of the referencing node. A relative reference
/// resolves in the namespace enclosing that node: one dot names a sibling,
/// each further dot climbs one level. Returns the available depth when the
/// dots climb past the root.
pub fn absolute_target(scope: &[String], dots: usize, target: &str) -> Result<String, usize> {
    if dots == 0 {
        return Ok(target.to_owned());
    }
    let depth = scope.len().saturating_sub(1);
    if dots > depth {
        return Err(depth);
    }
    let prefix = &scope[..scope.len() - dots];
    Ok(format!("{}.{target}", prefix.join(".")))
}

/// Phase 1: placeholder insertion on the declaration tree.
#[derive(Debug, Clone, Copy)]
pub struct Linker<'a> {
    map: &'a PathMap,
    original: &'a SymbolTable,
    strict: bool,
}

impl<'a> Linker<'a> {
    /// `map` comes from [`ExportResolver::plan`](crate::ExportResolver::plan);
    /// `original` is the symbol table of the declaration tree.
    pub fn new(map: &'a PathMap, original: &'a SymbolTable, strict: bool) -> Self {
        Self {
            map,
            original,
            strict,
        }
    }

    /// Replace references in every text field under `root`.
    pub fn insert_placeholders(
        &self,
        root: &mut Package,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), Error> {
        visit_texts_mut(root, &mut |site, text| {
            self.link_text(site.path, text, diagnostics)
        })
    }

    /// Replace references in one text written at `scope`.
    pub fn link_text(
        &self,
        scope: &[String],
        text: &mut DocText,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), Error> {
        let Some(literal) = text.as_literal() else {
            return Ok(());
        };
        let references = scan_references(literal).map_err(|_| Error::UnbalancedFence {
            path: scope.join("."),
        })?;
        if references.is_empty() {
            return Ok(());
        }

        let mut parts = Vec::with_capacity(references.len() * 2 + 1);
        let mut cursor = 0;
        for reference in &references {
            if let Some(placeholder) = self.placeholder(scope, reference, diagnostics)? {
                parts.push(TextPart::Literal(literal[cursor..reference.range.start].to_owned()));
                parts.push(TextPart::Placeholder(placeholder));
                cursor = reference.range.end;
            }
        }
        parts.push(TextPart::Literal(literal[cursor..].to_owned()));
        *text = DocText::from_parts(parts);
        Ok(())
    }

    fn placeholder(
        &self,
        scope: &[String],
        reference: &Reference<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<Placeholder>, Error> {
        let path = || scope.join(".");
        if let Some(label) = reference.label
            && !balanced_label(label)
        {
            return Err(Error::MalformedLabel {
                path: path(),
                reference: reference.source.to_owned(),
            });
        }

        let absolute = match absolute_target(scope, reference.dots, reference.target) {
            Ok(absolute) => absolute,
            Err(depth) => {
                let warning = LinkWarning::RelativeScope {
                    path: path(),
                    reference: reference.source.to_owned(),
                    dots: reference.dots,
                    depth,
                };
                diagnostics.report(warning, self.strict)?;
                return Ok(None);
            }
        };

        if let Some(curated) = self.map.get(&absolute) {
            return Ok(Some(Placeholder {
                path: curated.to_owned(),
                label: reference.label.map(str::to_owned),
                source: reference.source.to_owned(),
            }));
        }

        let warning = if self.original.contains(&absolute) {
            LinkWarning::NotExported {
                path: path(),
                reference: reference.source.to_owned(),
            }
        } else {
            LinkWarning::Unresolved {
                path: path(),
                reference: reference.source.to_owned(),
            }
        };
        diagnostics.report(warning, self.strict)?;
        Ok(None)
    }
}

/// Phase 2: placeholder resolution on the curated tree.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    symbols: &'a SymbolTable,
    formatter: &'a dyn Formatter,
    short_links: bool,
    strict: bool,
}

impl<'a> Resolver<'a> {
    pub fn new(
        symbols: &'a SymbolTable,
        formatter: &'a dyn Formatter,
        short_links: bool,
        strict: bool,
    ) -> Self {
        Self {
            symbols,
            formatter,
            short_links,
            strict,
        }
    }

    /// Render `text` as Markdown, linking placeholders relative to `from`.
    ///
    /// `origin` is the original symbol path of the node holding the text,
    /// used in diagnostics. Unresolved placeholders fall back to the
    /// reference as written.
    pub fn resolve(
        &self,
        text: &DocText,
        from: &Entry,
        origin: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<String, Error> {
        let mut out = String::new();
        for part in text.parts() {
            match part {
                TextPart::Literal(literal) => out.push_str(literal),
                TextPart::Placeholder(placeholder) => {
                    match self.symbols.get(&placeholder.path) {
                        Some(target) => {
                            let label = placeholder
                                .label
                                .clone()
                                .unwrap_or_else(|| self.display_text(&placeholder.path, target));
                            out.push('[');
                            out.push_str(&label);
                            out.push_str("](");
                            out.push_str(&self.link_to(target, from));
                            out.push(')');
                        }
                        None => {
                            let warning = LinkWarning::Unresolved {
                                path: origin.to_owned(),
                                reference: placeholder.source.clone(),
                            };
                            diagnostics.report(warning, self.strict)?;
                            out.push_str(&placeholder.source);
                        }
                    }
                }
            }
        }
        Ok(out)
    }

    /// Link path from the page of `from` to `target`.
    pub fn link_to(&self, target: &Entry, from: &Entry) -> String {
        let relative = relative_segments(from.dir(), &target.segments).join("/");
        self.formatter
            .link_path(&relative, target.page, target.anchor.as_deref())
    }

    /// Link text derived from a curated symbol path.
    fn display_text(&self, path: &str, target: &Entry) -> String {
        if !self.short_links {
            return path.to_owned();
        }
        let keep = if target.is_section() { 2 } else { 1 };
        let segments: Vec<&str> = path.split('.').collect();
        segments[segments.len().saturating_sub(keep)..].join(".")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use apiref_doc::{Field, Function, Module, Struct};
    use apiref_format::PlainFormatter;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::exports::{ExportResolver, ExportTable};

    fn path(dotted: &str) -> Vec<String> {
        dotted.split('.').map(str::to_owned).collect()
    }

    fn tree() -> Package {
        let mut foo = Struct::new("Foo");
        foo.fields.push(Field {
            name: "x".to_owned(),
            ..Field::default()
        });
        foo.functions.push(Function::new("run"));

        let mut module = Module::new("mod");
        module.structs.push(Arc::new(foo));
        module.structs.push(Arc::new(Struct::new("Bar")));
        module.functions.push(Arc::new(Function::new("helper")));

        let mut pkg = Package::new("pkg");
        pkg.modules.push(module);
        pkg
    }

    fn identity(root: &Package) -> (PathMap, SymbolTable) {
        let exports = ExportTable::default();
        let map = ExportResolver::new(&exports, false).plan(root).unwrap();
        (map, SymbolTable::build(root, true))
    }

    fn link(root: &Package, scope: &str, text: &str, strict: bool) -> Result<DocText, Error> {
        let (map, original) = identity(root);
        let mut text = DocText::new(text);
        let mut diagnostics = Diagnostics::new();
        Linker::new(&map, &original, strict).link_text(&path(scope), &mut text, &mut diagnostics)?;
        Ok(text)
    }

    #[test]
    fn test_absolute_target() {
        let scope = path("a.b.c");
        assert_eq!(absolute_target(&scope, 0, "x.Y"), Ok("x.Y".to_owned()));
        assert_eq!(absolute_target(&scope, 1, "X"), Ok("a.b.X".to_owned()));
        assert_eq!(absolute_target(&scope, 2, "X"), Ok("a.X".to_owned()));
        assert_eq!(absolute_target(&scope, 3, "X"), Err(2));
    }

    #[test]
    fn test_relative_matches_absolute() {
        let root = tree();
        let relative = link(&root, "pkg.mod.Foo", "See [..mod.Bar].", false).unwrap();
        let absolute = link(&root, "pkg.mod.Foo", "See [pkg.mod.Bar].", false).unwrap();

        let paths = |text: &DocText| -> Vec<String> {
            text.placeholders().map(|p| p.path.clone()).collect()
        };
        assert_eq!(paths(&relative), vec!["pkg.mod.Bar".to_owned()]);
        assert_eq!(paths(&relative), paths(&absolute));
    }

    #[test]
    fn test_placeholder_with_label() {
        let root = tree();
        let text = link(&root, "pkg.mod", "Use [.mod.Foo.run the run method] now.", false).unwrap();
        assert_eq!(text.to_string(), "Use {pkg.mod.Foo.run the run method} now.");
    }

    #[test]
    fn test_code_is_untouched() {
        let root = tree();
        let source = "Code `[pkg.mod.Foo]` and\n```\n[pkg.mod.Bar]\n```\n";
        let text = link(&root, "pkg", source, false).unwrap();
        assert_eq!(text.as_literal(), Some(source));
    }

    #[test]
    fn test_unresolved_lenient_keeps_text() {
        let root = tree();
        let (map, original) = identity(&root);
        let mut text = DocText::new("See [pkg.Missing].");
        let mut diagnostics = Diagnostics::new();

        Linker::new(&map, &original, false)
            .link_text(&path("pkg.mod"), &mut text, &mut diagnostics)
            .unwrap();

        assert_eq!(text.as_literal(), Some("See [pkg.Missing]."));
        assert_eq!(
            diagnostics.warnings(),
            &[LinkWarning::Unresolved {
                path: "pkg.mod".to_owned(),
                reference: "[pkg.Missing]".to_owned(),
            }]
        );
    }

    #[test]
    fn test_unresolved_strict_fails() {
        let err = link(&tree(), "pkg.mod", "See [pkg.Missing].", true).unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { .. }));
    }

    #[test]
    fn test_relative_scope_exceeded() {
        let err = link(&tree(), "pkg.mod", "See [...Foo].", true).unwrap_err();
        assert_eq!(
            err,
            Error::RelativeScope {
                path: "pkg.mod".to_owned(),
                reference: "[...Foo]".to_owned(),
                dots: 3,
                depth: 1,
            }
        );
    }

    #[test]
    fn test_malformed_label_always_fatal() {
        let err = link(&tree(), "pkg", "See [pkg.mod.Foo a {broken label].", false).unwrap_err();
        assert!(matches!(err, Error::MalformedLabel { .. }));
    }

    #[test]
    fn test_unbalanced_fence_always_fatal() {
        let err = link(&tree(), "pkg.mod", "```\nnever closed", false).unwrap_err();
        assert_eq!(
            err,
            Error::UnbalancedFence {
                path: "pkg.mod".to_owned()
            }
        );
    }

    #[test]
    fn test_not_exported_warning() {
        let mut root = tree();
        root.description = "Exports:\n - mod.Foo".into();
        let exports = ExportTable::collect(&mut root);
        let map = ExportResolver::new(&exports, true).plan(&root).unwrap();
        let original = SymbolTable::build(&root, true);

        let mut text = DocText::new("[pkg.mod.Bar]");
        let mut diagnostics = Diagnostics::new();
        Linker::new(&map, &original, false)
            .link_text(&path("pkg"), &mut text, &mut diagnostics)
            .unwrap();
        assert!(matches!(
            diagnostics.warnings()[0],
            LinkWarning::NotExported { .. }
        ));
    }

    #[test]
    fn test_resolve_links() {
        let root = tree();
        let symbols = SymbolTable::build(&root, true);
        let formatter = PlainFormatter::new(true);
        let resolver = Resolver::new(&symbols, &formatter, false, false);
        let from = symbols.get("pkg.mod.Foo").unwrap();

        let text = link(
            &root,
            "pkg.mod.Foo",
            "See [.Bar], [.Foo.x], [..mod] and [pkg the package].",
            false,
        )
        .unwrap();
        let mut diagnostics = Diagnostics::new();
        let rendered = resolver
            .resolve(&text, from, "pkg.mod.Foo", &mut diagnostics)
            .unwrap();

        assert_eq!(
            rendered,
            "See [pkg.mod.Bar](Bar.md), [pkg.mod.Foo.x](Foo.md#fields), \
             [pkg.mod](./_index.md) and [the package](../_index.md)."
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_short_links() {
        let root = tree();
        let symbols = SymbolTable::build(&root, true);
        let formatter = PlainFormatter::new(true);
        let resolver = Resolver::new(&symbols, &formatter, true, false);
        let from = symbols.get("pkg").unwrap();

        let text = link(&root, "pkg.mod", "[.mod.Foo] and [.mod.Foo.run]", false).unwrap();
        let rendered = resolver
            .resolve(&text, from, "pkg", &mut Diagnostics::new())
            .unwrap();
        assert_eq!(
            rendered,
            "[Foo](mod/Foo.md) and [Foo.run](mod/Foo.md#run)"
        );
    }

    #[test]
    fn test_resolve_unknown_placeholder_falls_back() {
        let root = tree();
        let symbols = SymbolTable::build(&root, true);
        let formatter = PlainFormatter::new(true);
        let from = symbols.get("pkg").unwrap();
        let text = DocText::from_parts(vec![TextPart::Placeholder(Placeholder {
            path: "pkg.Gone".to_owned(),
            label: None,
            source: "[.Gone]".to_owned(),
        })]);

        let mut diagnostics = Diagnostics::new();
        let rendered = Resolver::new(&symbols, &formatter, false, false)
            .resolve(&text, from, "pkg.mod", &mut diagnostics)
            .unwrap();
        assert_eq!(rendered, "[.Gone]");
        assert_eq!(diagnostics.len(), 1);

        let err = Resolver::new(&symbols, &formatter, false, true)
            .resolve(&text, from, "pkg.mod", &mut Diagnostics::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { .. }));
    }
}
