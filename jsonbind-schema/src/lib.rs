//! # jsonbind Schema
//!
//! JSON Schema parsing and type graph synthesis.
//!
//! This crate provides:
//! - Schema document parsing into an immutable node arena
//! - The resolved type graph (objects, arrays, unions, intersections, enums, scalars)
//! - The synthesis driver that resolves references and composition lazily
//! - Identifier derivation and collision handling

pub mod document;
pub mod driver;
pub mod error;
pub mod graph;
pub mod naming;

pub use document::{Additional, Items, JsonType, SchemaDocument, SchemaId, SchemaKind, SchemaNode};
pub use driver::{SynthesisDriver, SynthesisOptions};
pub use error::{ParseError, SchemaError};
pub use graph::{
    AdditionalPolicy, Alternative, ArrayType, EnumLiteral, EnumType, IntersectionType, ObjectType,
    Property, ScalarKind, ScalarType, TypeGraph, TypeId, TypeKind, TypeNode, UnionType,
};
pub use naming::NameAllocator;

/// Parses a schema document from JSON text.
///
/// # Arguments
/// * `name` - Document name, used as the root type name and for `$ref`
/// * `text` - JSON Schema content
///
/// # Errors
/// Returns `ParseError` if the text is not JSON or a keyword is malformed.
pub fn parse_schema(name: &str, text: &str) -> Result<SchemaDocument, ParseError> {
    SchemaDocument::parse(name, text)
}
