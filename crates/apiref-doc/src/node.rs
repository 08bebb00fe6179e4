//! Node kinds and the borrowed [`Node`] union.

use std::fmt;

use serde::Serialize;

use crate::model::{Alias, Argument, Field, Function, Module, Package, Parameter, Struct, Trait};
use crate::text::DocText;

/// The fixed set of declaration kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Package,
    Module,
    Struct,
    Trait,
    Function,
    Field,
    Alias,
    Parameter,
    Argument,
}

impl Kind {
    /// Lowercase name as used in the declaration format.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Module => "module",
            Self::Struct => "struct",
            Self::Trait => "trait",
            Self::Function => "function",
            Self::Field => "field",
            Self::Alias => "alias",
            Self::Parameter => "parameter",
            Self::Argument => "argument",
        }
    }

    /// Packages and modules render as directories with an index page.
    pub fn is_container(self) -> bool {
        matches!(self, Self::Package | Self::Module)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A borrowed reference to any declaration node.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Package(&'a Package),
    Module(&'a Module),
    Struct(&'a Struct),
    Trait(&'a Trait),
    Function(&'a Function),
    Field(&'a Field),
    Alias(&'a Alias),
    Parameter(&'a Parameter),
    Argument(&'a Argument),
}

impl<'a> Node<'a> {
    pub fn kind(self) -> Kind {
        match self {
            Self::Package(_) => Kind::Package,
            Self::Module(_) => Kind::Module,
            Self::Struct(_) => Kind::Struct,
            Self::Trait(_) => Kind::Trait,
            Self::Function(_) => Kind::Function,
            Self::Field(_) => Kind::Field,
            Self::Alias(_) => Kind::Alias,
            Self::Parameter(_) => Kind::Parameter,
            Self::Argument(_) => Kind::Argument,
        }
    }

    pub fn name(self) -> &'a str {
        match self {
            Self::Package(n) => &n.name,
            Self::Module(n) => &n.name,
            Self::Struct(n) => &n.name,
            Self::Trait(n) => &n.name,
            Self::Function(n) => &n.name,
            Self::Field(n) => &n.name,
            Self::Alias(n) => &n.name,
            Self::Parameter(n) => &n.name,
            Self::Argument(n) => &n.name,
        }
    }

    /// One-line summary. Parameters and arguments only carry a description.
    pub fn summary(self) -> Option<&'a DocText> {
        match self {
            Self::Package(n) => Some(&n.summary),
            Self::Module(n) => Some(&n.summary),
            Self::Struct(n) => Some(&n.summary),
            Self::Trait(n) => Some(&n.summary),
            Self::Function(n) => Some(&n.summary),
            Self::Field(n) => Some(&n.summary),
            Self::Alias(n) => Some(&n.summary),
            Self::Parameter(_) | Self::Argument(_) => None,
        }
    }

    pub fn description(self) -> &'a DocText {
        match self {
            Self::Package(n) => &n.description,
            Self::Module(n) => &n.description,
            Self::Struct(n) => &n.description,
            Self::Trait(n) => &n.description,
            Self::Function(n) => &n.description,
            Self::Field(n) => &n.description,
            Self::Alias(n) => &n.description,
            Self::Parameter(n) => &n.description,
            Self::Argument(n) => &n.description,
        }
    }

    /// Addressable children in traversal order.
    ///
    /// Packages come before modules, modules before structs, traits,
    /// functions and aliases. Function overloads are not included.
    pub fn children(self) -> Vec<Node<'a>> {
        let mut out = Vec::new();
        match self {
            Self::Package(p) => {
                out.extend(p.packages.iter().map(Node::Package));
                out.extend(p.modules.iter().map(Node::Module));
                out.extend(p.structs.iter().map(|s| Node::Struct(s)));
                out.extend(p.traits.iter().map(|t| Node::Trait(t)));
                out.extend(p.functions.iter().map(|f| Node::Function(f)));
                out.extend(p.aliases.iter().map(|a| Node::Alias(a)));
            }
            Self::Module(m) => {
                out.extend(m.structs.iter().map(|s| Node::Struct(s)));
                out.extend(m.traits.iter().map(|t| Node::Trait(t)));
                out.extend(m.functions.iter().map(|f| Node::Function(f)));
                out.extend(m.aliases.iter().map(|a| Node::Alias(a)));
            }
            Self::Struct(s) => {
                out.extend(s.parameters.iter().map(Node::Parameter));
                out.extend(s.fields.iter().map(Node::Field));
                out.extend(s.aliases.iter().map(Node::Alias));
                out.extend(s.functions.iter().map(Node::Function));
            }
            Self::Trait(t) => {
                out.extend(t.parameters.iter().map(Node::Parameter));
                out.extend(t.fields.iter().map(Node::Field));
                out.extend(t.aliases.iter().map(Node::Alias));
                out.extend(t.functions.iter().map(Node::Function));
            }
            Self::Function(f) => {
                out.extend(f.parameters.iter().map(Node::Parameter));
                out.extend(f.args.iter().map(Node::Argument));
            }
            Self::Field(_) | Self::Alias(_) | Self::Parameter(_) | Self::Argument(_) => {}
        }
        out
    }
}
