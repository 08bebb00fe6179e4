//! Symbol path table.
//!
//! Maps every dotted symbol path in a tree to its output location: the page
//! segments, the page kind, and an anchor for members that render as a
//! section of their owner's page.
//!
//! Pages are packages, modules, structs, traits and functions owned by a
//! package or module. Everything else is a section:
//!
//! | Member | Anchor |
//! |--------|--------|
//! | field | `fields` |
//! | struct or function parameter | `parameters` |
//! | alias | `aliases` |
//! | method | lowercased method name |
//! | argument of a page function | `arguments` |
//! | argument or parameter of a method | the method's anchor |

use std::collections::HashMap;

use apiref_doc::{Function, Kind, Node, Package};
use apiref_format::fold_segment;

/// Output location of one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Output path segments of the page holding the symbol, case folded.
    pub segments: Vec<String>,
    /// Kind of the symbol itself.
    pub kind: Kind,
    /// Kind of the page holding the symbol.
    pub page: Kind,
    /// Fragment within the page, for members.
    pub anchor: Option<String>,
}

impl Entry {
    /// Whether the symbol is a section of another node's page.
    pub fn is_section(&self) -> bool {
        self.anchor.is_some()
    }

    /// Directory the page lives in. Container pages are their own directory.
    pub fn dir(&self) -> &[String] {
        if self.page.is_container() {
            &self.segments
        } else {
            self.segments
                .split_last()
                .map_or(&[][..], |(_, parent)| parent)
        }
    }

    fn page(segments: Vec<String>, kind: Kind) -> Self {
        Self {
            segments,
            kind,
            page: kind,
            anchor: None,
        }
    }

    fn section(&self, kind: Kind, anchor: impl Into<String>) -> Self {
        Self {
            segments: self.segments.clone(),
            kind,
            page: self.page,
            anchor: Some(anchor.into()),
        }
    }
}

/// Symbol path table over one tree.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    entries: HashMap<String, Entry>,
}

impl SymbolTable {
    /// Build the table for the tree rooted at `root`.
    pub fn build(root: &Package, case_sensitive: bool) -> Self {
        let mut builder = Builder {
            table: Self::default(),
            case_sensitive,
            symbol: Vec::new(),
        };
        builder.node(Node::Package(root), None);
        tracing::debug!(
            root = %root.name,
            entries = builder.table.len(),
            "Built symbol table"
        );
        builder.table
    }

    pub fn get(&self, symbol: &str) -> Option<&Entry> {
        self.entries.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries that own a page.
    pub fn pages(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.iter().filter(|(_, entry)| !entry.is_section())
    }

    fn insert(&mut self, symbol: String, entry: Entry) {
        if self.entries.contains_key(&symbol) {
            tracing::debug!(%symbol, "Duplicate symbol path, keeping first");
            return;
        }
        self.entries.insert(symbol, entry);
    }
}

struct Builder {
    table: SymbolTable,
    case_sensitive: bool,
    symbol: Vec<String>,
}

impl Builder {
    fn node(&mut self, node: Node<'_>, parent: Option<&Entry>) {
        self.symbol.push(node.name().to_owned());
        let entry = self.entry(node, parent);
        self.table.insert(self.symbol.join("."), entry.clone());

        for child in node.children() {
            self.node(child, Some(&entry));
        }
        if let Node::Function(func) = node {
            self.overload_members(func, &entry);
        }
        self.symbol.pop();
    }

    /// Arguments and parameters that only appear on overloads.
    fn overload_members(&mut self, func: &Function, entry: &Entry) {
        for overload in &func.overloads {
            let members = overload
                .parameters
                .iter()
                .map(Node::Parameter)
                .chain(overload.args.iter().map(Node::Argument));
            for member in members {
                let symbol = format!("{}.{}", self.symbol.join("."), member.name());
                if !self.table.contains(&symbol) {
                    let member_entry = member_entry(member.kind(), entry);
                    self.table.insert(symbol, member_entry);
                }
            }
        }
    }

    fn entry(&self, node: Node<'_>, parent: Option<&Entry>) -> Entry {
        let kind = node.kind();
        let Some(parent) = parent else {
            return Entry::page(vec![self.fold(node.name())], kind);
        };
        match kind {
            Kind::Package | Kind::Module | Kind::Struct | Kind::Trait => {
                Entry::page(self.child_segments(parent, node.name()), kind)
            }
            Kind::Function if parent.kind.is_container() => {
                Entry::page(self.child_segments(parent, node.name()), kind)
            }
            Kind::Function => parent.section(kind, node.name().to_lowercase()),
            Kind::Field | Kind::Alias | Kind::Parameter | Kind::Argument => {
                member_entry(kind, parent)
            }
        }
    }

    fn child_segments(&self, parent: &Entry, name: &str) -> Vec<String> {
        let mut segments = parent.dir().to_vec();
        segments.push(self.fold(name));
        segments
    }

    fn fold(&self, name: &str) -> String {
        fold_segment(name, self.case_sensitive)
    }
}

/// Entry for a member rendered as a section of its parent.
fn member_entry(kind: Kind, parent: &Entry) -> Entry {
    if parent.kind == Kind::Function && parent.is_section() {
        // Members of a method share the method's anchor.
        let anchor = parent.anchor.clone().unwrap_or_default();
        return parent.section(kind, anchor);
    }
    let anchor = match kind {
        Kind::Field => "fields",
        Kind::Alias => "aliases",
        Kind::Argument => "arguments",
        _ => "parameters",
    };
    parent.section(kind, anchor)
}

/// Relative path segments from directory `from` to `to`.
///
/// One `..` per segment of `from` past the shared prefix, then the rest of
/// `to`. An empty result becomes `["."]`.
pub fn relative_segments(from: &[String], to: &[String]) -> Vec<String> {
    let common = from
        .iter()
        .zip(to)
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = std::iter::repeat_n("..".to_owned(), from.len() - common)
        .chain(to[common..].iter().cloned())
        .collect();
    if segments.is_empty() {
        segments.push(".".to_owned());
    }
    segments
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use apiref_doc::{Alias, Argument, Field, Module, Parameter, Struct, Trait};
    use pretty_assertions::assert_eq;

    use super::*;

    fn segs(path: &str) -> Vec<String> {
        path.split('/').map(str::to_owned).collect()
    }

    fn sample() -> Package {
        let mut method = Function::new("Run");
        method.args.push(Argument {
            name: "self".to_owned(),
            ..Argument::default()
        });
        let mut overload = Function::new("Run");
        overload.args.push(Argument {
            name: "count".to_owned(),
            ..Argument::default()
        });
        method.overloads.push(overload);

        let mut foo = Struct::new("Foo");
        foo.fields.push(Field {
            name: "x".to_owned(),
            ..Field::default()
        });
        foo.parameters.push(Parameter {
            name: "T".to_owned(),
            ..Parameter::default()
        });
        foo.aliases.push(Alias {
            name: "Elem".to_owned(),
            ..Alias::default()
        });
        foo.functions.push(method);

        let mut helper = Function::new("helper");
        helper.args.push(Argument {
            name: "value".to_owned(),
            ..Argument::default()
        });

        let mut module = Module::new("mod");
        module.structs.push(Arc::new(foo));
        module.functions.push(Arc::new(helper));
        module.aliases.push(Arc::new(Alias {
            name: "Size".to_owned(),
            ..Alias::default()
        }));

        let mut pkg = Package::new("pkg");
        pkg.modules.push(module);
        pkg
    }

    #[test]
    fn test_pages() {
        let table = SymbolTable::build(&sample(), true);

        let module = table.get("pkg.mod").unwrap();
        assert_eq!(module.segments, segs("pkg/mod"));
        assert_eq!(module.dir(), segs("pkg/mod").as_slice());

        let foo = table.get("pkg.mod.Foo").unwrap();
        assert_eq!(foo.segments, segs("pkg/mod/Foo"));
        assert_eq!(foo.dir(), segs("pkg/mod").as_slice());
        assert!(!foo.is_section());

        let helper = table.get("pkg.mod.helper").unwrap();
        assert_eq!(helper.page, Kind::Function);
        assert!(!helper.is_section());
    }

    #[test]
    fn test_struct_member_anchors() {
        let table = SymbolTable::build(&sample(), true);
        let anchor = |symbol: &str| table.get(symbol).unwrap().anchor.clone();

        assert_eq!(anchor("pkg.mod.Foo.x"), Some("fields".to_owned()));
        assert_eq!(anchor("pkg.mod.Foo.T"), Some("parameters".to_owned()));
        assert_eq!(anchor("pkg.mod.Foo.Elem"), Some("aliases".to_owned()));
        assert_eq!(anchor("pkg.mod.Foo.Run"), Some("run".to_owned()));
        assert_eq!(anchor("pkg.mod.Foo.Run.self"), Some("run".to_owned()));

        let field = table.get("pkg.mod.Foo.x").unwrap();
        assert_eq!(field.segments, segs("pkg/mod/Foo"));
        assert_eq!(field.page, Kind::Struct);
    }

    #[test]
    fn test_function_and_module_members() {
        let table = SymbolTable::build(&sample(), true);

        let arg = table.get("pkg.mod.helper.value").unwrap();
        assert_eq!(arg.segments, segs("pkg/mod/helper"));
        assert_eq!(arg.anchor.as_deref(), Some("arguments"));

        let alias = table.get("pkg.mod.Size").unwrap();
        assert_eq!(alias.segments, segs("pkg/mod"));
        assert_eq!(alias.page, Kind::Module);
        assert_eq!(alias.anchor.as_deref(), Some("aliases"));
    }

    #[test]
    fn test_overload_members_included() {
        let table = SymbolTable::build(&sample(), true);
        let count = table.get("pkg.mod.Foo.Run.count").unwrap();
        assert_eq!(count.anchor.as_deref(), Some("run"));
        assert_eq!(count.kind, Kind::Argument);
    }

    #[test]
    fn test_trait_member_anchors() {
        let mut sized = Trait::new("Sized");
        sized.parameters.push(Parameter {
            name: "P".to_owned(),
            ..Parameter::default()
        });
        sized.aliases.push(Alias {
            name: "A".to_owned(),
            ..Alias::default()
        });
        let mut module = Module::new("m");
        module.traits.push(Arc::new(sized));
        let mut pkg = Package::new("lib");
        pkg.modules.push(module);

        let table = SymbolTable::build(&pkg, true);
        let param = table.get("lib.m.Sized.P").unwrap();
        assert_eq!(param.segments, segs("lib/m/Sized"));
        assert_eq!(param.page, Kind::Trait);
        assert_eq!(param.anchor.as_deref(), Some("parameters"));
        let alias = table.get("lib.m.Sized.A").unwrap();
        assert_eq!(alias.anchor.as_deref(), Some("aliases"));
    }

    #[test]
    fn test_case_folding() {
        let table = SymbolTable::build(&sample(), false);
        assert_eq!(
            table.get("pkg.mod.Foo").unwrap().segments,
            segs("pkg/mod/Foo-")
        );
        assert_eq!(table.get("pkg.mod").unwrap().segments, segs("pkg/mod"));
    }

    #[test]
    fn test_every_node_once() {
        let table = SymbolTable::build(&sample(), true);
        // pkg, mod, Foo, T, x, Elem, Run, self, count, helper, value, Size
        assert_eq!(table.len(), 12);
        assert_eq!(table.pages().count(), 4);
    }

    #[test]
    fn test_relative_segments() {
        assert_eq!(relative_segments(&segs("pkg"), &segs("pkg/Foo")), segs("Foo"));
        assert_eq!(
            relative_segments(&segs("pkg/mod"), &segs("pkg/other/Bar")),
            segs("../other/Bar")
        );
        assert_eq!(relative_segments(&segs("pkg/mod"), &segs("pkg/mod")), segs("."));
        assert_eq!(relative_segments(&segs("pkg/mod"), &segs("pkg")), segs(".."));
    }

    static_assertions::assert_impl_all!(super::SymbolTable: Send, Sync);
}
