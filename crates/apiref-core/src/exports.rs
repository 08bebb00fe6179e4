//! Export directives and the curated tree.
//!
//! A package or module declares its public surface with a block in its
//! description:
//!
//! ```text
//! Exports:
//!  - mod
//!  - other.Type
//! ```
//!
//! The block ends at the first line that is not an entry. Blocks are removed
//! from the description once parsed.
//!
//! In the curated tree an entry naming a direct child package or module keeps
//! that child, which then exposes what its own directives list. An entry with
//! more segments reparents the node it names under the exporting package.
//! Directives are never inherited.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock};

use apiref_doc::walk::visit_under;
use apiref_doc::{Alias, DocText, Function, Module, Node, Package, Struct, Trait};
use regex::Regex;

use crate::error::Error;

const MARKER: &str = "Exports:";

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*- ([A-Za-z0-9_][A-Za-z0-9_.]*)\s*$").unwrap());

/// Parse and strip `Exports:` blocks from `text`.
///
/// Returns the dotted entries and the text without the blocks, or `None`
/// when the text declares no exports.
pub fn parse_exports(text: &str) -> Option<(Vec<String>, String)> {
    let mut entries = Vec::new();
    let mut kept = String::with_capacity(text.len());
    let mut in_block = false;
    let mut found = false;

    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        if in_block {
            if let Some(caps) = ENTRY_RE.captures(content) {
                entries.push(caps[1].to_owned());
                continue;
            }
            in_block = false;
        }
        if content.trim_end() == MARKER {
            in_block = true;
            found = true;
            continue;
        }
        kept.push_str(line);
    }

    found.then(|| (entries, kept.trim_end().to_owned()))
}

/// Export directives of every package and module, by dotted symbol path.
#[derive(Debug, Default, Clone)]
pub struct ExportTable {
    directives: HashMap<String, Vec<Vec<String>>>,
}

impl ExportTable {
    /// Collect directives from `root`, stripping them from descriptions.
    pub fn collect(root: &mut Package) -> Self {
        let mut table = Self::default();
        let mut path = Vec::new();
        table.collect_package(root, &mut path);
        tracing::debug!(containers = table.directives.len(), "Collected export directives");
        table
    }

    fn collect_package(&mut self, pkg: &mut Package, path: &mut Vec<String>) {
        path.push(pkg.name.clone());
        self.take(&mut pkg.description, path);
        for child in &mut pkg.packages {
            self.collect_package(child, path);
        }
        for module in &mut pkg.modules {
            path.push(module.name.clone());
            self.take(&mut module.description, path);
            path.pop();
        }
        path.pop();
    }

    fn take(&mut self, description: &mut DocText, path: &[String]) {
        let Some((entries, text)) = parse_exports(&description.to_string()) else {
            return;
        };
        *description = DocText::new(text);
        let entries = entries
            .iter()
            .map(|entry| entry.split('.').map(str::to_owned).collect())
            .collect();
        self.directives.insert(path.join("."), entries);
    }

    /// Directive entries of the container at `symbol`.
    pub fn get(&self, symbol: &str) -> Option<&[Vec<String>]> {
        self.directives.get(symbol).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }
}

/// Original symbol path to curated symbol path.
#[derive(Debug, Default, Clone)]
pub struct PathMap {
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
}

impl PathMap {
    /// Curated path of an original symbol.
    pub fn get(&self, original: &str) -> Option<&str> {
        self.forward.get(original).map(String::as_str)
    }

    /// Original path of a curated symbol.
    pub fn original(&self, curated: &str) -> Option<&str> {
        self.reverse.get(curated).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.forward.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether `original` is unmapped and `curated` is unclaimed.
    fn is_free(&self, original: &[String], curated: &[String]) -> bool {
        !self.forward.contains_key(&original.join("."))
            && !self.reverse.contains_key(&curated.join("."))
    }

    fn insert(&mut self, original: &[String], curated: &[String]) {
        let original = original.join(".");
        let curated = curated.join(".");
        if self.forward.contains_key(&original) {
            return;
        }
        if let Some(first) = self.reverse.get(&curated) {
            tracing::warn!(
                symbol = %curated,
                first = %first,
                ignored = %original,
                "Two exported symbols share a path, keeping the first"
            );
            return;
        }
        self.reverse.insert(curated.clone(), original.clone());
        self.forward.insert(original, curated);
    }
}

/// Curated tree and the path mapping that produced it.
#[derive(Debug, Clone)]
pub struct Restructured {
    pub root: Package,
    pub map: PathMap,
}

/// Builds the curated tree.
///
/// With exports disabled, every package keeps all its children and the
/// curated tree equals the declaration tree.
#[derive(Debug, Clone, Copy)]
pub struct ExportResolver<'a> {
    exports: &'a ExportTable,
    enabled: bool,
}

impl<'a> ExportResolver<'a> {
    pub fn new(exports: &'a ExportTable, enabled: bool) -> Self {
        Self { exports, enabled }
    }

    /// Compute the path mapping without keeping the curated tree.
    ///
    /// The transient tree is dropped before returning, so leaf nodes are
    /// uniquely owned again and can be rewritten in place.
    pub fn plan(&self, root: &Package) -> Result<PathMap, Error> {
        self.restructure(root).map(|restructured| restructured.map)
    }

    /// Build the curated tree. Leaf nodes are shared with `root`.
    pub fn restructure(&self, root: &Package) -> Result<Restructured, Error> {
        if self.enabled && self.exports.is_empty() {
            return Err(Error::NoExports);
        }
        let mut builder = Builder {
            resolver: *self,
            map: PathMap::default(),
        };
        let path = vec![root.name.clone()];
        let root = builder.package(root, &path, &path);
        tracing::debug!(mapped = builder.map.len(), "Restructured tree");
        Ok(Restructured {
            root,
            map: builder.map,
        })
    }

    /// Entries of the container at `path`, or `None` when everything is kept.
    fn entries(&self, path: &[String]) -> Option<&'a [Vec<String>]> {
        if !self.enabled {
            return None;
        }
        Some(self.exports.get(&path.join(".")).unwrap_or(&[]))
    }
}

/// A node found by an export entry.
enum Found<'a> {
    Package(&'a Package),
    Module(&'a Module),
    Struct(&'a Arc<Struct>),
    Trait(&'a Arc<Trait>),
    Function(&'a Arc<Function>),
    Alias(&'a Arc<Alias>),
}

impl<'a> Found<'a> {
    fn node(&self) -> Node<'a> {
        match *self {
            Self::Package(p) => Node::Package(p),
            Self::Module(m) => Node::Module(m),
            Self::Struct(s) => Node::Struct(s),
            Self::Trait(t) => Node::Trait(t),
            Self::Function(f) => Node::Function(f),
            Self::Alias(a) => Node::Alias(a),
        }
    }
}

/// Resolve a dotted entry below `pkg`.
fn lookup<'a>(pkg: &'a Package, entry: &[String]) -> Option<Found<'a>> {
    let (first, rest) = entry.split_first()?;
    if let Some(child) = pkg.packages.iter().find(|p| &p.name == first) {
        return if rest.is_empty() {
            Some(Found::Package(child))
        } else {
            lookup(child, rest)
        };
    }
    if let Some(module) = pkg.modules.iter().find(|m| &m.name == first) {
        return match rest {
            [] => Some(Found::Module(module)),
            [name] => module_member(module, name),
            _ => None,
        };
    }
    match rest {
        [] => package_member(pkg, first),
        _ => None,
    }
}

fn module_member<'a>(module: &'a Module, name: &str) -> Option<Found<'a>> {
    members(
        &module.structs,
        &module.traits,
        &module.functions,
        &module.aliases,
        name,
    )
}

fn package_member<'a>(pkg: &'a Package, name: &str) -> Option<Found<'a>> {
    members(&pkg.structs, &pkg.traits, &pkg.functions, &pkg.aliases, name)
}

fn members<'a>(
    structs: &'a [Arc<Struct>],
    traits: &'a [Arc<Trait>],
    functions: &'a [Arc<Function>],
    aliases: &'a [Arc<Alias>],
    name: &str,
) -> Option<Found<'a>> {
    structs
        .iter()
        .find(|s| s.name == name)
        .map(Found::Struct)
        .or_else(|| traits.iter().find(|t| t.name == name).map(Found::Trait))
        .or_else(|| functions.iter().find(|f| f.name == name).map(Found::Function))
        .or_else(|| aliases.iter().find(|a| a.name == name).map(Found::Alias))
}

fn child(path: &[String], name: &str) -> Vec<String> {
    let mut path = path.to_vec();
    path.push(name.to_owned());
    path
}

struct Builder<'a> {
    resolver: ExportResolver<'a>,
    map: PathMap,
}

impl Builder<'_> {
    fn package(&mut self, pkg: &Package, old: &[String], new: &[String]) -> Package {
        self.map.insert(old, new);
        let mut out = pkg.empty_like();

        let Some(entries) = self.resolver.entries(old) else {
            for sub in &pkg.packages {
                let built = self.package(sub, &child(old, &sub.name), &child(new, &sub.name));
                out.packages.push(built);
            }
            for module in &pkg.modules {
                let built = self.module(module, &child(old, &module.name), &child(new, &module.name));
                out.modules.push(built);
            }
            for found in own_members(pkg) {
                self.place(&found, old, new, &mut out);
            }
            return out;
        };

        let full: HashSet<&str> = entries
            .iter()
            .filter_map(|entry| match entry.as_slice() {
                [name] => Some(name.as_str()),
                _ => None,
            })
            .collect();

        for sub in pkg.packages.iter().filter(|p| full.contains(p.name.as_str())) {
            let built = self.package(sub, &child(old, &sub.name), &child(new, &sub.name));
            out.packages.push(built);
        }
        for module in pkg.modules.iter().filter(|m| full.contains(m.name.as_str())) {
            let built = self.module(module, &child(old, &module.name), &child(new, &module.name));
            out.modules.push(built);
        }

        for entry in entries {
            let is_child = matches!(entry.as_slice(), [name]
                if pkg.packages.iter().any(|p| &p.name == name)
                    || pkg.modules.iter().any(|m| &m.name == name));
            if is_child {
                continue;
            }
            let Some(found) = lookup(pkg, entry) else {
                tracing::warn!(
                    package = %old.join("."),
                    entry = %entry.join("."),
                    "Export entry names nothing"
                );
                continue;
            };
            let mut origin = old.to_vec();
            origin.extend(entry.iter().take(entry.len() - 1).cloned());
            tracing::debug!(
                package = %old.join("."),
                entry = %entry.join("."),
                "Reparenting exported symbol"
            );
            self.place(&found, &origin, new, &mut out);
        }
        out
    }

    fn module(&mut self, module: &Module, old: &[String], new: &[String]) -> Module {
        self.map.insert(old, new);
        let mut out = module.empty_like();

        let selected: Option<HashSet<&str>> = self.resolver.entries(old).and_then(|entries| {
            if entries.is_empty() {
                return None;
            }
            let mut names = HashSet::new();
            for entry in entries {
                match entry.as_slice() {
                    [name] if module_member(module, name).is_some() => {
                        names.insert(name.as_str());
                    }
                    _ => tracing::warn!(
                        module = %old.join("."),
                        entry = %entry.join("."),
                        "Module export entry names no member"
                    ),
                }
            }
            Some(names)
        });
        let keep = |name: &str| selected.as_ref().is_none_or(|names| names.contains(name));

        for s in module.structs.iter().filter(|s| keep(&s.name)) {
            self.record(Node::Struct(s), old, new);
            out.structs.push(Arc::clone(s));
        }
        for t in module.traits.iter().filter(|t| keep(&t.name)) {
            self.record(Node::Trait(t), old, new);
            out.traits.push(Arc::clone(t));
        }
        for f in module.functions.iter().filter(|f| keep(&f.name)) {
            self.record(Node::Function(f), old, new);
            out.functions.push(Arc::clone(f));
        }
        for a in module.aliases.iter().filter(|a| keep(&a.name)) {
            self.record(Node::Alias(a), old, new);
            out.aliases.push(Arc::clone(a));
        }
        out
    }

    /// Place a found node under `out`, whose curated path is `new`.
    ///
    /// `old_parent` is the original path of the node's parent.
    ///
    /// Nothing is placed when the node is already in the curated tree or
    /// its curated path is taken; the first placement wins.
    fn place(&mut self, found: &Found<'_>, old_parent: &[String], new: &[String], out: &mut Package) {
        let name = found.node().name();
        let old = child(old_parent, name);
        let new_child = child(new, name);
        if !self.map.is_free(&old, &new_child) {
            tracing::warn!(
                symbol = %new_child.join("."),
                ignored = %old.join("."),
                "Exported symbol already placed or its path is taken, keeping the first"
            );
            return;
        }
        match found {
            Found::Package(p) => {
                let built = self.package(p, &old, &new_child);
                out.packages.push(built);
            }
            Found::Module(m) => {
                let built = self.module(m, &old, &new_child);
                out.modules.push(built);
            }
            Found::Struct(s) => {
                self.record(found.node(), old_parent, new);
                out.structs.push(Arc::clone(s));
            }
            Found::Trait(t) => {
                self.record(found.node(), old_parent, new);
                out.traits.push(Arc::clone(t));
            }
            Found::Function(f) => {
                self.record(found.node(), old_parent, new);
                out.functions.push(Arc::clone(f));
            }
            Found::Alias(a) => {
                self.record(found.node(), old_parent, new);
                out.aliases.push(Arc::clone(a));
            }
        }
    }

    /// Map a leaf subtree from under `old_parent` to under `new_parent`.
    ///
    /// Parameters and arguments that only appear on overloads are mapped
    /// under their function.
    fn record(&mut self, node: Node<'_>, old_parent: &[String], new_parent: &[String]) {
        let map = &mut self.map;
        let mut insert = |path: &[String]| {
            let mut curated = new_parent.to_vec();
            curated.extend_from_slice(&path[old_parent.len()..]);
            map.insert(path, &curated);
        };
        visit_under(node, old_parent, &mut |node, path| {
            insert(path);
            let Node::Function(func) = node else {
                return;
            };
            for overload in &func.overloads {
                let names = overload
                    .parameters
                    .iter()
                    .map(|p| &p.name)
                    .chain(overload.args.iter().map(|a| &a.name));
                for name in names {
                    insert(child(path, name).as_slice());
                }
            }
        });
    }
}

/// Leaf members a package already holds.
fn own_members(pkg: &Package) -> Vec<Found<'_>> {
    pkg.structs
        .iter()
        .map(Found::Struct)
        .chain(pkg.traits.iter().map(Found::Trait))
        .chain(pkg.functions.iter().map(Found::Function))
        .chain(pkg.aliases.iter().map(Found::Alias))
        .collect()
}
