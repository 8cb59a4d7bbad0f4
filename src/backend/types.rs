//! Type declarations for the generated header
//!
//! A [`TypeFactory`] turns a declared type into something that can write its C declaration, or reports it as not
//! translatable (the orchestrator then skips it silently). [`CTypeFactory`] is the default translation:
//!
//! | P4                  | C                                   |
//! |---------------------|-------------------------------------|
//! | `bit<1..=8>`        | `uint8_t`                           |
//! | `bit<9..=16>`       | `uint16_t`                          |
//! | `bit<17..=32>`      | `uint32_t`                          |
//! | `bit<33..=64>`      | `uint64_t`                          |
//! | wider `bit<W>`      | `uint8_t name[(W + 7) / 8]`         |
//! | `bool`, `error`     | `uint8_t`                           |
//! | header / struct     | `struct N` (headers get a `valid` byte) |
//! | header_union        | `union N`                           |
//! | enum                | `enum N`                            |

use zfx_core::conventions;

use crate::ir::types::ResolvedType;
use crate::ir::{Field, FieldType, TypeDecl, TypeKind, TypeMap};

use super::code_builder::CodeBuilder;

/// A type that knows how to declare itself in C.
pub trait EmittableType {
    fn emit(&self, builder: &mut CodeBuilder<'_>);
}

/// Translates declared types for the header artifact.
pub trait TypeFactory {
    /// `None` when the declaration has no C form.
    fn create(&self, decl: &TypeDecl) -> Option<Box<dyn EmittableType>>;
}

/// Scalar or aggregate C type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CField {
    c_type: String,
    name: String,
    /// Byte count for fields wider than 64 bits
    array_len: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CStruct {
    keyword: &'static str,
    name: String,
    fields: Vec<CField>,
}

impl EmittableType for CStruct {
    fn emit(&self, builder: &mut CodeBuilder<'_>) {
        builder.emit_indent();
        builder.append_format(format_args!("{} {} ", self.keyword, self.name));
        builder.block_start();
        for field in &self.fields {
            builder.emit_indent();
            match field.array_len {
                Some(len) => builder.append_format(format_args!("{} {}[{}]", field.c_type, field.name, len)),
                None => builder.append_format(format_args!("{} {}", field.c_type, field.name)),
            }
            builder.end_of_statement(true);
        }
        builder.block_end(false);
        builder.end_of_statement(true);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CEnum {
    name: String,
    members: Vec<String>,
}

impl EmittableType for CEnum {
    fn emit(&self, builder: &mut CodeBuilder<'_>) {
        builder.emit_indent();
        builder.append_format(format_args!("enum {} ", self.name));
        builder.block_start();
        for member in &self.members {
            // C enumerators share one namespace; prefix with the type name.
            builder.append_line(&format!("{}_{},", self.name, member));
        }
        builder.block_end(false);
        builder.end_of_statement(true);
    }
}

/// Default C translation of declared types
#[derive(Debug, Clone, Copy)]
pub struct CTypeFactory<'a> {
    types: &'a TypeMap,
}

impl<'a> CTypeFactory<'a> {
    pub fn new(types: &'a TypeMap) -> Self {
        Self { types }
    }

    fn field(&self, field: &Field) -> Option<CField> {
        let resolved = self.types.resolve(&field.ty)?;
        let (c_type, array_len) = match resolved {
            ResolvedType::Bits(width) => bits_type(width)?,
            ResolvedType::Bool => ("uint8_t".to_string(), None),
            ResolvedType::Decl(decl) => match &decl.kind {
                TypeKind::Header { .. } | TypeKind::Struct { .. } => (format!("struct {}", decl.name), None),
                TypeKind::HeaderUnion { .. } => (format!("union {}", decl.name), None),
                TypeKind::Enum { .. } => (format!("enum {}", decl.name), None),
                TypeKind::Error { .. } => ("uint8_t".to_string(), None),
                _ => return None,
            },
        };
        Some(CField {
            c_type,
            name: field.name.clone(),
            array_len,
        })
    }

    fn fields(&self, fields: &[Field]) -> Option<Vec<CField>> {
        fields.iter().map(|f| self.field(f)).collect()
    }
}

/// Smallest unsigned C type holding `width` bits, or a byte array past 64 bits.
fn bits_type(width: u32) -> Option<(String, Option<u32>)> {
    let ty = match width {
        0 => return None,
        1..=8 => "uint8_t",
        9..=16 => "uint16_t",
        17..=32 => "uint32_t",
        33..=64 => "uint64_t",
        _ => return Some(("uint8_t".to_string(), Some(width.div_ceil(8)))),
    };
    Some((ty.to_string(), None))
}

impl TypeFactory for CTypeFactory<'_> {
    fn create(&self, decl: &TypeDecl) -> Option<Box<dyn EmittableType>> {
        match &decl.kind {
            TypeKind::Header { fields } => {
                let mut fields = self.fields(fields)?;
                fields.push(CField {
                    c_type: "uint8_t".to_string(),
                    name: conventions::HEADER_VALID_FIELD.to_string(),
                    array_len: None,
                });
                Some(Box::new(CStruct {
                    keyword: "struct",
                    name: decl.name.clone(),
                    fields,
                }))
            }
            TypeKind::Struct { fields } => Some(Box::new(CStruct {
                keyword: "struct",
                name: decl.name.clone(),
                fields: self.fields(fields)?,
            })),
            TypeKind::HeaderUnion { fields } => Some(Box::new(CStruct {
                keyword: "union",
                name: decl.name.clone(),
                fields: self.fields(fields)?,
            })),
            TypeKind::Enum { members } => Some(Box::new(CEnum {
                name: decl.name.clone(),
                members: members.clone(),
            })),
            _ => None,
        }
    }
}
