//! Declaration node types.
//!
//! Field names follow the JSON declaration format (camelCase on the wire).
//! Every field is optional in the input and defaults to empty.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::text::DocText;

/// Root of a declaration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Docs {
    /// Version of the documented library.
    pub version: String,
    /// Root package.
    pub decl: Package,
}

/// A package: owns sub-packages and modules.
///
/// In a curated tree a package may also hold re-exported structs, traits,
/// functions and aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Package {
    pub name: String,
    pub summary: DocText,
    pub description: DocText,
    pub packages: Vec<Package>,
    pub modules: Vec<Module>,
    pub structs: Vec<Arc<Struct>>,
    pub traits: Vec<Arc<Trait>>,
    pub functions: Vec<Arc<Function>>,
    pub aliases: Vec<Arc<Alias>>,
}

impl Package {
    /// Create an empty package with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Fresh container carrying this package's name and text but no children.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self {
            name: self.name.clone(),
            summary: self.summary.clone(),
            description: self.description.clone(),
            ..Self::default()
        }
    }
}

/// A module: owns structs, traits, functions and aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Module {
    pub name: String,
    pub summary: DocText,
    pub description: DocText,
    pub aliases: Vec<Arc<Alias>>,
    pub structs: Vec<Arc<Struct>>,
    pub traits: Vec<Arc<Trait>>,
    pub functions: Vec<Arc<Function>>,
}

impl Module {
    /// Create an empty module with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Fresh container carrying this module's name and text but no members.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self {
            name: self.name.clone(),
            summary: self.summary.clone(),
            description: self.description.clone(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Struct {
    pub name: String,
    pub summary: DocText,
    pub description: DocText,
    pub deprecated: DocText,
    pub signature: String,
    pub parent_traits: Vec<String>,
    pub aliases: Vec<Alias>,
    pub fields: Vec<Field>,
    pub parameters: Vec<Parameter>,
    pub functions: Vec<Function>,
}

impl Struct {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Trait {
    pub name: String,
    pub summary: DocText,
    pub description: DocText,
    pub deprecated: DocText,
    pub signature: String,
    pub parent_traits: Vec<String>,
    pub aliases: Vec<Alias>,
    pub fields: Vec<Field>,
    pub parameters: Vec<Parameter>,
    pub functions: Vec<Function>,
}

impl Trait {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A function or method.
///
/// `overloads` holds sibling signatures sharing this function's name. They are
/// documented and linked, but only the function itself is addressable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Function {
    pub name: String,
    pub summary: DocText,
    pub description: DocText,
    pub deprecated: DocText,
    pub signature: String,
    pub returns_doc: DocText,
    pub raises_doc: DocText,
    pub return_type: String,
    pub is_static: bool,
    pub args: Vec<Argument>,
    pub parameters: Vec<Parameter>,
    pub overloads: Vec<Function>,
}

impl Function {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub summary: DocText,
    pub description: DocText,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Compile-time parameter of a struct or function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    pub description: DocText,
    #[serde(rename = "type")]
    pub type_name: String,
    pub passing_kind: String,
    pub default: Option<String>,
}

/// Run-time argument of a function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Argument {
    pub name: String,
    pub description: DocText,
    #[serde(rename = "type")]
    pub type_name: String,
    pub convention: String,
    pub passing_kind: String,
    pub default: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Alias {
    pub name: String,
    pub summary: DocText,
    pub description: DocText,
    pub deprecated: DocText,
    pub value: String,
}
