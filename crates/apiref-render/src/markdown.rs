//! Markdown renderer for curated documents.

use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;

use apiref_core::{Diagnostics, Document, Error};
use apiref_doc::{
    Alias, Argument, DocText, Field, Function, Kind, Module, Node, Package, Parameter, Struct,
    Trait,
};
use apiref_format::{Formatter, PageRef};

use crate::page::Page;

/// A file to write, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub path: PathBuf,
    pub content: String,
}

/// All output files plus warnings raised while linking.
#[derive(Debug, Default)]
pub struct Rendered {
    pub pages: Vec<RenderedPage>,
    pub diagnostics: Diagnostics,
}

#[derive(Default)]
struct Sink {
    rendered: Rendered,
    refs: Vec<PageRef>,
}

/// Renders every page of a [`Document`].
pub struct MarkdownRenderer<'a> {
    document: &'a Document,
    formatter: &'a dyn Formatter,
}

impl<'a> MarkdownRenderer<'a> {
    pub fn new(document: &'a Document, formatter: &'a dyn Formatter) -> Self {
        Self {
            document,
            formatter,
        }
    }

    /// Render all pages in tree order, followed by backend auxiliary files.
    pub fn render(&self) -> Result<Rendered, Error> {
        let mut sink = Sink::default();
        let mut path = Vec::new();
        self.package(&self.document.root, &mut path, &mut sink)?;

        let page_count = sink.rendered.pages.len();
        let aux = self.formatter.auxiliary_files(&sink.refs);
        sink.rendered
            .pages
            .extend(aux.into_iter().map(|file| RenderedPage {
                path: file.path,
                content: file.content,
            }));
        tracing::info!(
            pages = page_count,
            format = self.formatter.name(),
            "Rendered pages"
        );
        Ok(sink.rendered)
    }

    fn start(&self, symbol: &str) -> Option<Page<'a>> {
        let Some(entry) = self.document.symbols.get(symbol) else {
            tracing::warn!(%symbol, "No symbol table entry, skipping page");
            return None;
        };
        Some(Page::new(
            self.document,
            self.document.resolver(self.formatter),
            entry,
        ))
    }

    fn finish(&self, page: Page<'a>, name: &str, kind: Kind, sink: &mut Sink) {
        let entry = page.entry();
        let path = self.formatter.file_path(&entry.segments, entry.page);
        tracing::debug!(path = %path.display(), "Rendered page");
        sink.refs.push(PageRef {
            name: name.to_owned(),
            segments: entry.segments.clone(),
            kind,
        });
        let (content, diagnostics) = page.finish();
        sink.rendered.pages.push(RenderedPage { path, content });
        sink.rendered.diagnostics.extend(diagnostics);
    }

    fn package(&self, pkg: &Package, path: &mut Vec<String>, sink: &mut Sink) -> Result<(), Error> {
        path.push(pkg.name.clone());
        let symbol = path.join(".");

        if let Some(mut page) = self.start(&symbol) {
            page.heading(1, &format!("`{}`", pkg.name));
            page.paragraph(&pkg.summary, &symbol)?;
            page.paragraph(&pkg.description, &symbol)?;
            child_index(&mut page, &symbol, Node::Package(pkg))?;
            let aliases: Vec<&Alias> = pkg.aliases.iter().map(AsRef::as_ref).collect();
            alias_section(&mut page, &symbol, &aliases)?;
            self.finish(page, &pkg.name, Kind::Package, sink);
        }

        for sub in &pkg.packages {
            self.package(sub, path, sink)?;
        }
        for module in &pkg.modules {
            self.module(module, path, sink)?;
        }
        self.members(&pkg.structs, &pkg.traits, &pkg.functions, path, sink)?;
        path.pop();
        Ok(())
    }

    fn module(&self, module: &Module, path: &mut Vec<String>, sink: &mut Sink) -> Result<(), Error> {
        path.push(module.name.clone());
        let symbol = path.join(".");

        if let Some(mut page) = self.start(&symbol) {
            page.heading(1, &format!("`{}`", module.name));
            page.paragraph(&module.summary, &symbol)?;
            page.paragraph(&module.description, &symbol)?;
            child_index(&mut page, &symbol, Node::Module(module))?;
            let aliases: Vec<&Alias> = module.aliases.iter().map(AsRef::as_ref).collect();
            alias_section(&mut page, &symbol, &aliases)?;
            self.finish(page, &module.name, Kind::Module, sink);
        }

        self.members(&module.structs, &module.traits, &module.functions, path, sink)?;
        path.pop();
        Ok(())
    }

    fn members(
        &self,
        structs: &[Arc<Struct>],
        traits: &[Arc<Trait>],
        functions: &[Arc<Function>],
        path: &mut Vec<String>,
        sink: &mut Sink,
    ) -> Result<(), Error> {
        for s in structs {
            self.structure(s, path, sink)?;
        }
        for t in traits {
            self.trait_page(t, path, sink)?;
        }
        for f in functions {
            self.function(f, path, sink)?;
        }
        Ok(())
    }

    fn structure(&self, s: &Struct, path: &[String], sink: &mut Sink) -> Result<(), Error> {
        let symbol = child_symbol(path, &s.name);
        let Some(mut page) = self.start(&symbol) else {
            return Ok(());
        };
        page.heading(1, &format!("`{}`", s.name));
        page.paragraph(&s.summary, &symbol)?;
        page.code_block(&s.signature);
        page.labeled("Deprecated", &s.deprecated, &symbol)?;
        page.paragraph(&s.description, &symbol)?;
        parent_traits(&mut page, &s.parent_traits);
        parameter_section(&mut page, &symbol, &s.parameters, true)?;
        field_section(&mut page, &symbol, &s.fields)?;
        let aliases: Vec<&Alias> = s.aliases.iter().collect();
        alias_section(&mut page, &symbol, &aliases)?;
        method_section(&mut page, &symbol, &s.functions)?;
        self.finish(page, &s.name, Kind::Struct, sink);
        Ok(())
    }

    fn trait_page(&self, t: &Trait, path: &[String], sink: &mut Sink) -> Result<(), Error> {
        let symbol = child_symbol(path, &t.name);
        let Some(mut page) = self.start(&symbol) else {
            return Ok(());
        };
        page.heading(1, &format!("`{}`", t.name));
        page.paragraph(&t.summary, &symbol)?;
        page.code_block(&t.signature);
        page.labeled("Deprecated", &t.deprecated, &symbol)?;
        page.paragraph(&t.description, &symbol)?;
        parent_traits(&mut page, &t.parent_traits);
        parameter_section(&mut page, &symbol, &t.parameters, true)?;
        field_section(&mut page, &symbol, &t.fields)?;
        let aliases: Vec<&Alias> = t.aliases.iter().collect();
        alias_section(&mut page, &symbol, &aliases)?;
        method_section(&mut page, &symbol, &t.functions)?;
        self.finish(page, &t.name, Kind::Trait, sink);
        Ok(())
    }

    fn function(&self, func: &Function, path: &[String], sink: &mut Sink) -> Result<(), Error> {
        let symbol = child_symbol(path, &func.name);
        let Some(mut page) = self.start(&symbol) else {
            return Ok(());
        };
        page.heading(1, &format!("`{}`", func.name));
        signatures(&mut page, &symbol, func, true)?;
        self.finish(page, &func.name, Kind::Function, sink);
        Ok(())
    }
}

fn child_symbol(path: &[String], name: &str) -> String {
    if path.is_empty() {
        name.to_owned()
    } else {
        format!("{}.{name}", path.join("."))
    }
}

/// Member heading: a level-2 section on pages that own the anchor,
/// a bold label inside a method.
fn section_title(page: &mut Page<'_>, title: &str, top: bool) {
    if top {
        page.heading(2, title);
    } else {
        page.line(&format!("**{title}:**"));
        page.blank();
    }
}

/// Text of a member entry: summary and description on one line.
fn member_text(page: &mut Page<'_>, texts: &[&DocText], symbol: &str) -> Result<String, Error> {
    let mut parts = Vec::new();
    for text in texts {
        let resolved = page.resolve(text, symbol)?;
        if !resolved.is_empty() {
            parts.push(resolved);
        }
    }
    Ok(parts.join(" "))
}

fn member_line(page: &mut Page<'_>, head: &str, text: &str) {
    if text.is_empty() {
        page.line(head);
    } else {
        page.line(&format!("{head}: {text}"));
    }
}

fn type_suffix(type_name: &str) -> String {
    if type_name.is_empty() {
        String::new()
    } else {
        format!(" (`{type_name}`)")
    }
}

/// Child listings on a package or module page, one section per kind.
fn child_index(page: &mut Page<'_>, parent: &str, container: Node<'_>) -> Result<(), Error> {
    const SECTIONS: [(Kind, &str); 5] = [
        (Kind::Package, "Packages"),
        (Kind::Module, "Modules"),
        (Kind::Struct, "Structs"),
        (Kind::Trait, "Traits"),
        (Kind::Function, "Functions"),
    ];
    let children = container.children();

    for (kind, title) in SECTIONS {
        let items: Vec<Node<'_>> = children.iter().copied().filter(|c| c.kind() == kind).collect();
        if items.is_empty() {
            continue;
        }
        page.heading(2, title);
        for item in items {
            let name = item.name();
            let symbol = format!("{parent}.{name}");
            let head = match page.link(&symbol) {
                Some(link) => format!("- [`{name}`]({link})"),
                None => format!("- `{name}`"),
            };
            let text = match item.summary() {
                Some(summary) => member_text(page, &[summary], &symbol)?,
                None => String::new(),
            };
            member_line(page, &head, &text);
        }
        page.blank();
    }
    Ok(())
}

fn parent_traits(page: &mut Page<'_>, traits: &[String]) {
    if traits.is_empty() {
        return;
    }
    let list: Vec<String> = traits.iter().map(|t| format!("`{t}`")).collect();
    page.line(&format!("Implemented traits: {}", list.join(", ")));
    page.blank();
}

fn alias_section(page: &mut Page<'_>, owner: &str, aliases: &[&Alias]) -> Result<(), Error> {
    if aliases.is_empty() {
        return Ok(());
    }
    page.heading(2, "Aliases");
    for alias in aliases {
        let symbol = format!("{owner}.{}", alias.name);
        let head = if alias.value.is_empty() {
            format!("- `{}`", alias.name)
        } else {
            format!("- `{} = {}`", alias.name, alias.value)
        };
        let text = member_text(page, &[&alias.summary, &alias.description], &symbol)?;
        member_line(page, &head, &text);
    }
    page.blank();
    Ok(())
}

fn field_section(page: &mut Page<'_>, owner: &str, fields: &[Field]) -> Result<(), Error> {
    if fields.is_empty() {
        return Ok(());
    }
    page.heading(2, "Fields");
    for field in fields {
        let symbol = format!("{owner}.{}", field.name);
        let head = format!("- **{}**{}", field.name, type_suffix(&field.type_name));
        let text = member_text(page, &[&field.summary, &field.description], &symbol)?;
        member_line(page, &head, &text);
    }
    page.blank();
    Ok(())
}

fn parameter_section(
    page: &mut Page<'_>,
    owner: &str,
    parameters: &[Parameter],
    top: bool,
) -> Result<(), Error> {
    if parameters.is_empty() {
        return Ok(());
    }
    section_title(page, "Parameters", top);
    for param in parameters {
        let symbol = format!("{owner}.{}", param.name);
        let mut head = format!("- **{}**{}", param.name, type_suffix(&param.type_name));
        if let Some(default) = &param.default {
            let _ = write!(head, " = `{default}`");
        }
        let text = member_text(page, &[&param.description], &symbol)?;
        member_line(page, &head, &text);
    }
    page.blank();
    Ok(())
}

fn argument_section(
    page: &mut Page<'_>,
    owner: &str,
    args: &[Argument],
    top: bool,
) -> Result<(), Error> {
    if args.is_empty() {
        return Ok(());
    }
    section_title(page, "Arguments", top);
    for arg in args {
        let symbol = format!("{owner}.{}", arg.name);
        let mut head = format!("- **{}**{}", arg.name, type_suffix(&arg.type_name));
        if let Some(default) = &arg.default {
            let _ = write!(head, " = `{default}`");
        }
        let text = member_text(page, &[&arg.description], &symbol)?;
        member_line(page, &head, &text);
    }
    page.blank();
    Ok(())
}

fn method_section(page: &mut Page<'_>, owner: &str, methods: &[Function]) -> Result<(), Error> {
    if methods.is_empty() {
        return Ok(());
    }
    page.heading(2, "Methods");
    for method in methods {
        let symbol = format!("{owner}.{}", method.name);
        page.heading(3, &format!("`{}`", method.name));
        signatures(page, &symbol, method, false)?;
    }
    Ok(())
}

/// A function's documentation, once per overload.
///
/// `top` is set on function pages, where parameters and arguments own
/// level-2 sections.
fn signatures(page: &mut Page<'_>, symbol: &str, func: &Function, top: bool) -> Result<(), Error> {
    let overloads: Vec<&Function> = if func.overloads.is_empty() {
        vec![func]
    } else {
        page.paragraph(&func.summary, symbol)?;
        page.paragraph(&func.description, symbol)?;
        func.overloads.iter().collect()
    };

    for sig in overloads {
        page.code_block(&sig.signature);
        page.paragraph(&sig.summary, symbol)?;
        page.labeled("Deprecated", &sig.deprecated, symbol)?;
        page.paragraph(&sig.description, symbol)?;
        parameter_section(page, symbol, &sig.parameters, top)?;
        argument_section(page, symbol, &sig.args, top)?;
        if sig.returns_doc.is_empty() && !sig.return_type.is_empty() {
            page.line(&format!("**Returns:** `{}`", sig.return_type));
            page.blank();
        } else {
            page.labeled("Returns", &sig.returns_doc, symbol)?;
        }
        page.labeled("Raises", &sig.raises_doc, symbol)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use apiref_core::{Pipeline, PipelineConfig};
    use apiref_doc::{Docs, parse};
    use apiref_format::{FormatKind, formatter};
    use pretty_assertions::assert_eq;

    use super::*;

    fn config(exports: bool, strict: bool) -> PipelineConfig {
        PipelineConfig {
            exports,
            strict,
            short_links: false,
            case_sensitive: true,
        }
    }

    fn sample() -> Docs {
        let mut run = Function::new("run");
        run.signature = "run(self)".to_owned();
        run.summary = "Runs [..Foo].".into();

        let mut foo = Struct::new("Foo");
        foo.summary = "A foo.".into();
        foo.description = "See [.Bar].".into();
        foo.fields.push(Field {
            name: "x".to_owned(),
            summary: "The x.".into(),
            type_name: "Int".to_owned(),
            ..Field::default()
        });
        foo.functions.push(run);

        let mut module = Module::new("mod");
        module.summary = "The module.".into();
        module.structs.push(Arc::new(foo));
        module.structs.push(Arc::new(Struct::new("Bar")));

        let mut pkg = Package::new("pkg");
        pkg.modules.push(module);
        Docs {
            version: "1.0".to_owned(),
            decl: pkg,
        }
    }

    fn render(docs: Docs, kind: FormatKind) -> Rendered {
        let document = Pipeline::new(config(false, false)).run(docs).unwrap();
        let formatter = formatter(kind, true);
        MarkdownRenderer::new(&document, formatter.as_ref())
            .render()
            .unwrap()
    }

    fn page<'r>(rendered: &'r Rendered, path: &str) -> &'r str {
        rendered
            .pages
            .iter()
            .find(|p| p.path == PathBuf::from(path))
            .map(|p| p.content.as_str())
            .unwrap()
    }

    #[test]
    fn test_struct_page() {
        let rendered = render(sample(), FormatKind::Plain);
        assert_eq!(
            page(&rendered, "pkg/mod/Foo.md"),
            "# `Foo`\n\n\
             A foo.\n\n\
             See [pkg.mod.Bar](Bar.md).\n\n\
             ## Fields\n\n\
             - **x** (`Int`): The x.\n\n\
             ## Methods\n\n\
             ### `run`\n\n\
             ```mojo\nrun(self)\n```\n\n\
             Runs [pkg.mod.Foo](Foo.md).\n"
        );
    }

    #[test]
    fn test_module_index_links() {
        let rendered = render(sample(), FormatKind::Plain);
        assert_eq!(
            page(&rendered, "pkg/mod/_index.md"),
            "# `mod`\n\n\
             The module.\n\n\
             ## Structs\n\n\
             - [`Foo`](Foo.md): A foo.\n\
             - [`Bar`](Bar.md)\n"
        );
        assert!(page(&rendered, "pkg/_index.md").contains("- [`mod`](mod/_index.md): The module."));
    }

    #[test]
    fn test_pages_in_tree_order() {
        let rendered = render(sample(), FormatKind::Plain);
        let paths: Vec<PathBuf> = rendered.pages.iter().map(|p| p.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("pkg/_index.md"),
                PathBuf::from("pkg/mod/_index.md"),
                PathBuf::from("pkg/mod/Foo.md"),
                PathBuf::from("pkg/mod/Bar.md"),
            ]
        );
    }

    #[test]
    fn test_mdbook_summary_written() {
        let rendered = render(sample(), FormatKind::MdBook);
        let summary = page(&rendered, "SUMMARY.md");
        assert!(summary.contains("- [pkg](pkg/README.md)"));
        assert!(summary.contains("    - [Foo](pkg/mod/Foo.md)"));
        assert!(page(&rendered, "pkg/mod/README.md").contains("[`Foo`](Foo.md)"));
    }

    #[test]
    fn test_hugo_ref_links() {
        let rendered = render(sample(), FormatKind::Hugo);
        assert!(
            page(&rendered, "pkg/mod/Foo.md")
                .contains(r#"See [pkg.mod.Bar]({{< ref "Bar.md" >}})."#)
        );
    }

    #[test]
    fn test_function_page_sections() {
        let json = r#"{
            "decl": {
                "name": "lib",
                "modules": [{
                    "name": "math",
                    "functions": [{
                        "name": "clamp",
                        "overloads": [{
                            "name": "clamp",
                            "signature": "clamp[T: Comparable](x: T) -> T",
                            "summary": "Clamps [.clamp.x].",
                            "parameters": [{"name": "T", "type": "Comparable", "description": "Element type."}],
                            "args": [{"name": "x", "type": "T", "description": "Value."}],
                            "returnsDoc": "The clamped value."
                        }]
                    }]
                }]
            }
        }"#;
        let rendered = render(parse(json).unwrap(), FormatKind::Plain);
        assert_eq!(
            page(&rendered, "lib/math/clamp.md"),
            "# `clamp`\n\n\
             ```mojo\nclamp[T: Comparable](x: T) -> T\n```\n\n\
             Clamps [lib.math.clamp.x](clamp.md#arguments).\n\n\
             ## Parameters\n\n\
             - **T** (`Comparable`): Element type.\n\n\
             ## Arguments\n\n\
             - **x** (`T`): Value.\n\n\
             **Returns:** The clamped value.\n"
        );
    }

    #[test]
    fn test_trait_page_sections() {
        let json = r#"{
            "decl": {
                "name": "lib",
                "modules": [{
                    "name": "m",
                    "traits": [{
                        "name": "T",
                        "description": "Sized by [.T.P].",
                        "parameters": [{"name": "P", "description": "Element."}],
                        "aliases": [{"name": "A", "value": "Int"}]
                    }]
                }]
            }
        }"#;
        let rendered = render(parse(json).unwrap(), FormatKind::Plain);
        assert_eq!(
            page(&rendered, "lib/m/T.md"),
            "# `T`\n\n\
             Sized by [lib.m.T.P](T.md#parameters).\n\n\
             ## Parameters\n\n\
             - **P**: Element.\n\n\
             ## Aliases\n\n\
             - `A = Int`\n"
        );
    }

    #[test]
    fn test_every_page_written() {
        let json = r#"{
            "decl": {
                "name": "lib",
                "description": "Exports:\n - core\n - util.helper",
                "modules": [
                    {"name": "core",
                     "structs": [{"name": "Vec", "fields": [{"name": "len"}]}],
                     "traits": [{"name": "Sized", "functions": [{"name": "size"}]}]},
                    {"name": "util", "functions": [{"name": "helper"}, {"name": "hidden"}]}
                ]
            }
        }"#;
        let document = Pipeline::new(config(true, false))
            .run(parse(json).unwrap())
            .unwrap();
        let formatter = formatter(FormatKind::Plain, true);
        let rendered = MarkdownRenderer::new(&document, formatter.as_ref())
            .render()
            .unwrap();

        let written: HashSet<PathBuf> = rendered.pages.iter().map(|p| p.path.clone()).collect();
        for (symbol, entry) in document.symbols.iter() {
            let file = formatter.file_path(&entry.segments, entry.page);
            assert!(written.contains(&file), "{symbol} -> {}", file.display());
        }
        assert_eq!(written.len(), document.symbols.pages().count());
    }

    #[test]
    fn test_colliding_exports_write_one_page() {
        let json = r#"{
            "decl": {
                "name": "pkg",
                "description": "Exports:\n - a.Foo\n - b.Foo",
                "modules": [
                    {"name": "a", "structs": [{"name": "Foo", "summary": "From a."}]},
                    {"name": "b", "structs": [{"name": "Foo", "summary": "From b."}]}
                ]
            }
        }"#;
        let document = Pipeline::new(config(true, false))
            .run(parse(json).unwrap())
            .unwrap();
        let formatter = formatter(FormatKind::Plain, true);
        let rendered = MarkdownRenderer::new(&document, formatter.as_ref())
            .render()
            .unwrap();

        let foo_pages: Vec<&RenderedPage> = rendered
            .pages
            .iter()
            .filter(|p| p.path == PathBuf::from("pkg/Foo.md"))
            .collect();
        assert_eq!(foo_pages.len(), 1);
        assert!(foo_pages[0].content.contains("From a."));
        assert!(!page(&rendered, "pkg/_index.md").contains("From b."));
    }

    #[test]
    fn test_strict_phase_two_failure() {
        let document = Pipeline::new(config(false, true)).run(sample()).unwrap();
        let mut broken = document;
        let foo = Arc::make_mut(&mut broken.root.modules[0].structs[0]);
        foo.summary = DocText::from_parts(vec![apiref_doc::TextPart::Placeholder(
            apiref_doc::Placeholder {
                path: "pkg.Gone".to_owned(),
                label: None,
                source: "[pkg.Gone]".to_owned(),
            },
        )]);

        let formatter = formatter(FormatKind::Plain, true);
        let err = MarkdownRenderer::new(&broken, formatter.as_ref())
            .render()
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { .. }));
    }
}
