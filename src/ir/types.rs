//! Declared types and the type-binding context

use std::collections::HashMap;

/// Type of a struct/header field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// `bit<W>`
    Bits(u32),
    Bool,
    /// Reference to another declared type by name
    Named(String),
}

/// A field of a struct-like type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self { name: name.into(), ty }
    }

    pub fn bits(name: impl Into<String>, width: u32) -> Self {
        Self::new(name, FieldType::Bits(width))
    }
}

/// Declaration kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Header { fields: Vec<Field> },
    HeaderUnion { fields: Vec<Field> },
    Struct { fields: Vec<Field> },
    Enum { members: Vec<String> },
    /// `error { ... }` declarations
    Error { members: Vec<String> },
    /// `typedef T Name;`
    Typedef { target: FieldType },
    Extern,
    Parser,
    Control,
    /// Package types are containers
    Package,
}

impl TypeKind {
    /// Whether declarations of this kind get a C declaration in the generated header.
    ///
    /// Containers, externs, parser and control types, typedefs and error enumerations never do.
    pub fn is_emittable(&self) -> bool {
        !matches!(
            self,
            TypeKind::Package
                | TypeKind::Extern
                | TypeKind::Parser
                | TypeKind::Control
                | TypeKind::Typedef { .. }
                | TypeKind::Error { .. }
        )
    }
}

/// A declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self { name: name.into(), kind }
    }

    pub fn header(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(name, TypeKind::Header { fields })
    }

    pub fn structure(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(name, TypeKind::Struct { fields })
    }
}

/// Type-binding context: resolves declared type names.
///
/// Built once from the program and shared read-only by every phase.
#[derive(Debug, Clone, Default)]
pub struct TypeMap {
    types: HashMap<String, TypeDecl>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_decls<'a>(decls: impl IntoIterator<Item = &'a TypeDecl>) -> Self {
        let types = decls.into_iter().map(|d| (d.name.clone(), d.clone())).collect();
        Self { types }
    }

    /// Register a declaration (later registrations win)
    pub fn insert(&mut self, decl: TypeDecl) {
        self.types.insert(decl.name.clone(), decl);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDecl> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Follow typedef chains until a non-alias type is reached.
    ///
    /// Returns `None` for unknown names and for cyclic aliases.
    pub fn resolve<'a>(&'a self, ty: &'a FieldType) -> Option<ResolvedType<'a>> {
        let mut current = ty;
        // A chain longer than the map must revisit a name.
        for _ in 0..=self.types.len() {
            match current {
                FieldType::Bits(w) => return Some(ResolvedType::Bits(*w)),
                FieldType::Bool => return Some(ResolvedType::Bool),
                FieldType::Named(name) => {
                    let decl = self.types.get(name)?;
                    match &decl.kind {
                        TypeKind::Typedef { target } => current = target,
                        _ => return Some(ResolvedType::Decl(decl)),
                    }
                }
            }
        }
        None
    }
}

/// Result of resolving a [`FieldType`] through a [`TypeMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedType<'a> {
    Bits(u32),
    Bool,
    Decl(&'a TypeDecl),
}
