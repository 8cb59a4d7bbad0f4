//! Front-end representation consumed by the back-end
//!
//! The front-end parses, type-checks and evaluates the P4 program; what reaches the back-end is the evaluated
//! top-level instance plus the program's declarations. This module models exactly the part of that output the
//! orchestrator and its phases read:
//!
//! - [`TopLevel`]: the main package instance and the ordered program declarations
//! - [`PackageInstance`]: the package type name, its constructor parameters and the bound arguments
//! - [`Block`]: what an argument evaluated to (parser, control, extern, nested package)
//! - [`types`]: declared types and the [`TypeMap`] binding context

pub mod types;

use std::collections::HashMap;

pub use types::{Field, FieldType, TypeDecl, TypeKind, TypeMap};

/// A named, typed parameter (constructor or apply parameter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// An evaluated parser instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserBlock {
    pub name: String,
    pub type_name: String,
    /// Apply parameters in declaration order (packet, headers, metadata...)
    pub parameters: Vec<Parameter>,
}

/// An evaluated control instance (pipelines and deparsers are both controls).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlBlock {
    pub name: String,
    pub type_name: String,
    /// Apply parameters in declaration order
    pub parameters: Vec<Parameter>,
}

/// What a constructor argument evaluated to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Parser(ParserBlock),
    Control(ControlBlock),
    Extern { type_name: String },
    Package(Box<PackageInstance>),
}

impl Block {
    /// Short description used in invariant messages.
    pub fn describe(&self) -> String {
        match self {
            Block::Parser(p) => format!("parser block `{}`", p.name),
            Block::Control(c) => format!("control block `{}`", c.name),
            Block::Extern { type_name } => format!("extern instance of `{}`", type_name),
            Block::Package(p) => format!("package instance of `{}`", p.type_name),
        }
    }
}

/// An instantiated package: `ZodiacfxSwitch(MyParser(), MySwitch(), MyDeparser()) main;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInstance {
    pub type_name: String,
    /// Constructor parameters of the package type, in declaration order
    pub parameters: Vec<Parameter>,
    /// Argument bound to each constructor parameter, keyed by parameter name
    arguments: HashMap<String, Block>,
}

impl PackageInstance {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            parameters: Vec::new(),
            arguments: HashMap::new(),
        }
    }

    /// Declare a constructor parameter and bind its argument.
    pub fn with_argument(mut self, param: Parameter, value: Block) -> Self {
        self.arguments.insert(param.name.clone(), value);
        self.parameters.push(param);
        self
    }

    /// Declare a constructor parameter without an argument bound to it.
    pub fn with_unbound_parameter(mut self, param: Parameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Number of constructor parameters of the package type.
    pub fn constructor_arity(&self) -> usize {
        self.parameters.len()
    }

    /// Look up the argument bound to the constructor parameter `name`.
    pub fn parameter_value(&self, name: &str) -> Option<&Block> {
        self.arguments.get(name)
    }
}

/// A top-level program declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Type(TypeDecl),
    Constant { name: String },
    Instance { name: String, type_name: String },
}

/// The evaluated program handed to the back-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopLevel {
    pub main: PackageInstance,
    /// Program declarations in source order
    pub declarations: Vec<Declaration>,
}

impl TopLevel {
    pub fn new(main: PackageInstance, declarations: Vec<Declaration>) -> Self {
        Self { main, declarations }
    }

    /// The main package instance.
    pub fn main(&self) -> &PackageInstance {
        &self.main
    }

    /// Iterate over declared types in source order.
    pub fn type_decls(&self) -> impl Iterator<Item = &TypeDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Type(t) => Some(t),
            _ => None,
        })
    }

    /// Build the type-binding context for this program.
    pub fn type_map(&self) -> TypeMap {
        TypeMap::from_decls(self.type_decls())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(name: &str) -> Block {
        Block::Control(ControlBlock {
            name: name.to_string(),
            type_name: name.to_string(),
            parameters: Vec::new(),
        })
    }

    #[test]
    fn test_parameter_value_by_name() {
        let pkg = PackageInstance::new("ZodiacfxSwitch")
            .with_argument(Parameter::new("swtch", "Switch"), control("MySwitch"))
            .with_argument(Parameter::new("deprs", "Deparser"), control("MyDeparser"));
        assert_eq!(pkg.constructor_arity(), 2);
        assert_eq!(pkg.parameter_value("deprs"), Some(&control("MyDeparser")));
        assert!(pkg.parameter_value("prs").is_none());
    }

    #[test]
    fn test_unbound_parameter_counts_toward_arity() {
        let pkg = PackageInstance::new("ZodiacfxSwitch").with_unbound_parameter(Parameter::new("prs", "Parser"));
        assert_eq!(pkg.constructor_arity(), 1);
        assert!(pkg.parameter_value("prs").is_none());
    }

    #[test]
    fn test_describe_block() {
        assert_eq!(control("Sw").describe(), "control block `Sw`");
        let ext = Block::Extern {
            type_name: "counter".to_string(),
        };
        assert_eq!(ext.describe(), "extern instance of `counter`");
    }
}
