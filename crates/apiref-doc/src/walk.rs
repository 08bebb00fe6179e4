//! Depth-first traversals shared by the engine.
//!
//! [`visit`] walks addressable nodes read-only with their symbol path
//! segments. [`visit_texts_mut`] walks every documentation text field,
//! including those of function overloads, for in-place rewriting.

use std::sync::Arc;

use crate::model::{Alias, Function, Module, Package, Struct, Trait};
use crate::node::{Kind, Node};
use crate::text::DocText;

/// Visit `root` and all addressable descendants, parents before children.
///
/// The callback receives each node with its full symbol path segments,
/// starting with `root`'s own name.
pub fn visit<'a, F>(root: Node<'a>, f: &mut F)
where
    F: FnMut(Node<'a>, &[String]),
{
    visit_under(root, &[], f);
}

/// Like [`visit`], with every path prefixed by `parent`.
pub fn visit_under<'a, F>(node: Node<'a>, parent: &[String], f: &mut F)
where
    F: FnMut(Node<'a>, &[String]),
{
    let mut path = parent.to_vec();
    visit_inner(node, &mut path, f);
}

fn visit_inner<'a, F>(node: Node<'a>, path: &mut Vec<String>, f: &mut F)
where
    F: FnMut(Node<'a>, &[String]),
{
    path.push(node.name().to_owned());
    f(node, path);
    for child in node.children() {
        visit_inner(child, path, f);
    }
    path.pop();
}

/// Which text field of a node is being visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Summary,
    Description,
    Deprecated,
    Returns,
    Raises,
}

/// Location of a text field: owning node's symbol path and kind.
#[derive(Debug, Clone, Copy)]
pub struct TextSite<'p> {
    pub path: &'p [String],
    pub kind: Kind,
    pub field: TextField,
}

impl TextSite<'_> {
    /// Dotted symbol path of the owning node.
    pub fn symbol(&self) -> String {
        self.path.join(".")
    }
}

/// Visit every documentation text field under `root` mutably.
///
/// Shared module-level nodes are unshared with [`Arc::make_mut`] before
/// being touched, so this must run before any curated tree aliases them.
/// Overload texts are reported under their function's path.
pub fn visit_texts_mut<E, F>(root: &mut Package, f: &mut F) -> Result<(), E>
where
    F: FnMut(TextSite<'_>, &mut DocText) -> Result<(), E>,
{
    let mut path = Vec::new();
    package_texts(root, &mut path, f)
}

fn scoped<E>(
    path: &mut Vec<String>,
    name: &str,
    body: impl FnOnce(&mut Vec<String>) -> Result<(), E>,
) -> Result<(), E> {
    path.push(name.to_owned());
    let result = body(path);
    path.pop();
    result
}

fn emit<E, F>(
    path: &[String],
    kind: Kind,
    field: TextField,
    text: &mut DocText,
    f: &mut F,
) -> Result<(), E>
where
    F: FnMut(TextSite<'_>, &mut DocText) -> Result<(), E>,
{
    if text.is_empty() {
        return Ok(());
    }
    f(TextSite { path, kind, field }, text)
}

fn package_texts<E, F>(pkg: &mut Package, path: &mut Vec<String>, f: &mut F) -> Result<(), E>
where
    F: FnMut(TextSite<'_>, &mut DocText) -> Result<(), E>,
{
    let name = pkg.name.clone();
    scoped(path, &name, |path| {
        emit(path, Kind::Package, TextField::Summary, &mut pkg.summary, f)?;
        emit(path, Kind::Package, TextField::Description, &mut pkg.description, f)?;
        for child in &mut pkg.packages {
            package_texts(child, path, f)?;
        }
        for module in &mut pkg.modules {
            module_texts(module, path, f)?;
        }
        for s in &mut pkg.structs {
            struct_texts(Arc::make_mut(s), path, f)?;
        }
        for t in &mut pkg.traits {
            trait_texts(Arc::make_mut(t), path, f)?;
        }
        for func in &mut pkg.functions {
            function_texts(Arc::make_mut(func), path, f)?;
        }
        for alias in &mut pkg.aliases {
            alias_texts(Arc::make_mut(alias), path, f)?;
        }
        Ok(())
    })
}

fn module_texts<E, F>(module: &mut Module, path: &mut Vec<String>, f: &mut F) -> Result<(), E>
where
    F: FnMut(TextSite<'_>, &mut DocText) -> Result<(), E>,
{
    let name = module.name.clone();
    scoped(path, &name, |path| {
        emit(path, Kind::Module, TextField::Summary, &mut module.summary, f)?;
        emit(path, Kind::Module, TextField::Description, &mut module.description, f)?;
        for s in &mut module.structs {
            struct_texts(Arc::make_mut(s), path, f)?;
        }
        for t in &mut module.traits {
            trait_texts(Arc::make_mut(t), path, f)?;
        }
        for func in &mut module.functions {
            function_texts(Arc::make_mut(func), path, f)?;
        }
        for alias in &mut module.aliases {
            alias_texts(Arc::make_mut(alias), path, f)?;
        }
        Ok(())
    })
}

fn struct_texts<E, F>(s: &mut Struct, path: &mut Vec<String>, f: &mut F) -> Result<(), E>
where
    F: FnMut(TextSite<'_>, &mut DocText) -> Result<(), E>,
{
    let name = s.name.clone();
    scoped(path, &name, |path| {
        emit(path, Kind::Struct, TextField::Summary, &mut s.summary, f)?;
        emit(path, Kind::Struct, TextField::Description, &mut s.description, f)?;
        emit(path, Kind::Struct, TextField::Deprecated, &mut s.deprecated, f)?;
        for param in &mut s.parameters {
            leaf_text(path, &param.name, Kind::Parameter, &mut param.description, f)?;
        }
        for field in &mut s.fields {
            let name = field.name.clone();
            scoped(path, &name, |path| {
                emit(path, Kind::Field, TextField::Summary, &mut field.summary, f)?;
                emit(path, Kind::Field, TextField::Description, &mut field.description, f)
            })?;
        }
        for alias in &mut s.aliases {
            alias_texts(alias, path, f)?;
        }
        for method in &mut s.functions {
            function_texts(method, path, f)?;
        }
        Ok(())
    })
}

fn trait_texts<E, F>(t: &mut Trait, path: &mut Vec<String>, f: &mut F) -> Result<(), E>
where
    F: FnMut(TextSite<'_>, &mut DocText) -> Result<(), E>,
{
    let name = t.name.clone();
    scoped(path, &name, |path| {
        emit(path, Kind::Trait, TextField::Summary, &mut t.summary, f)?;
        emit(path, Kind::Trait, TextField::Description, &mut t.description, f)?;
        emit(path, Kind::Trait, TextField::Deprecated, &mut t.deprecated, f)?;
        for param in &mut t.parameters {
            leaf_text(path, &param.name, Kind::Parameter, &mut param.description, f)?;
        }
        for field in &mut t.fields {
            let name = field.name.clone();
            scoped(path, &name, |path| {
                emit(path, Kind::Field, TextField::Summary, &mut field.summary, f)?;
                emit(path, Kind::Field, TextField::Description, &mut field.description, f)
            })?;
        }
        for alias in &mut t.aliases {
            alias_texts(alias, path, f)?;
        }
        for method in &mut t.functions {
            function_texts(method, path, f)?;
        }
        Ok(())
    })
}

fn function_texts<E, F>(func: &mut Function, path: &mut Vec<String>, f: &mut F) -> Result<(), E>
where
    F: FnMut(TextSite<'_>, &mut DocText) -> Result<(), E>,
{
    let name = func.name.clone();
    scoped(path, &name, |path| signature_texts(func, path, f))
}

/// Texts of one function signature, then of its overloads under the same path.
fn signature_texts<E, F>(func: &mut Function, path: &mut Vec<String>, f: &mut F) -> Result<(), E>
where
    F: FnMut(TextSite<'_>, &mut DocText) -> Result<(), E>,
{
    emit(path, Kind::Function, TextField::Summary, &mut func.summary, f)?;
    emit(path, Kind::Function, TextField::Description, &mut func.description, f)?;
    emit(path, Kind::Function, TextField::Deprecated, &mut func.deprecated, f)?;
    emit(path, Kind::Function, TextField::Returns, &mut func.returns_doc, f)?;
    emit(path, Kind::Function, TextField::Raises, &mut func.raises_doc, f)?;
    for param in &mut func.parameters {
        leaf_text(path, &param.name, Kind::Parameter, &mut param.description, f)?;
    }
    for arg in &mut func.args {
        leaf_text(path, &arg.name, Kind::Argument, &mut arg.description, f)?;
    }
    for overload in &mut func.overloads {
        signature_texts(overload, path, f)?;
    }
    Ok(())
}

fn alias_texts<E, F>(alias: &mut Alias, path: &mut Vec<String>, f: &mut F) -> Result<(), E>
where
    F: FnMut(TextSite<'_>, &mut DocText) -> Result<(), E>,
{
    let name = alias.name.clone();
    scoped(path, &name, |path| {
        emit(path, Kind::Alias, TextField::Summary, &mut alias.summary, f)?;
        emit(path, Kind::Alias, TextField::Description, &mut alias.description, f)?;
        emit(path, Kind::Alias, TextField::Deprecated, &mut alias.deprecated, f)
    })
}

fn leaf_text<E, F>(
    path: &mut Vec<String>,
    name: &str,
    kind: Kind,
    text: &mut DocText,
    f: &mut F,
) -> Result<(), E>
where
    F: FnMut(TextSite<'_>, &mut DocText) -> Result<(), E>,
{
    scoped(path, name, |path| {
        emit(path, kind, TextField::Description, text, f)
    })
}
