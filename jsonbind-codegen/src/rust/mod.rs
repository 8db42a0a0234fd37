//! Rust code generation modules.

pub mod enums;
pub mod interfaces;
pub mod objects;
pub mod types;
pub mod unions;

pub use enums::EnumGenerator;
pub use interfaces::InterfaceGenerator;
pub use objects::ObjectGenerator;
pub use types::TypeMapper;
pub use unions::UnionGenerator;

use crate::descriptor::{DescriptorKind, DescriptorSet};
use crate::render::{RenderOptions, Renderer};

/// Renders descriptor sets as Rust source over the runtime crate.
#[derive(Debug, Clone, Default)]
pub struct RustRenderer {
    options: RenderOptions,
}

impl RustRenderer {
    /// Creates a renderer with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a renderer with the given options.
    #[must_use]
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    fn generate_header(&self) -> String {
        let rt = &self.options.runtime_crate;
        let mut output = String::new();
        output.push_str("// @generated by jsonbind-codegen. Do not edit.\n\n");
        output.push_str(&format!("use {rt}::FormatCodec as _;\n\n"));
        output
    }
}

impl Renderer for RustRenderer {
    fn render(&self, set: &DescriptorSet) -> String {
        let types = TypeMapper::new(set, &self.options.runtime_crate);
        let objects = ObjectGenerator::new(set, &types);
        let enums = EnumGenerator::new(&types);
        let unions = UnionGenerator::new(&types);
        let interfaces = InterfaceGenerator::new(set, &types);

        let mut output = self.generate_header();
        for descriptor in set.iter() {
            match descriptor.kind {
                DescriptorKind::Object => output.push_str(&objects.generate(descriptor)),
                DescriptorKind::Enum => output.push_str(&enums.generate(descriptor)),
                DescriptorKind::Union => output.push_str(&unions.generate_union(descriptor)),
                DescriptorKind::Array => output.push_str(&unions.generate_array(descriptor)),
            }
        }
        output.push_str(&interfaces.generate());
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::InterfaceDecl;
    use crate::descriptor::ValueShape;
    use crate::session::BuildSession;
    use jsonbind_schema::ScalarKind;

    fn render(name: &str, text: &str) -> String {
        let mut session = BuildSession::default();
        session.add_schema(name, text).unwrap();
        let set = session.run(name).unwrap();
        RustRenderer::new().render(set)
    }

    #[test]
    fn test_header_and_object_surface() {
        let code = render(
            "Person",
            r#"{"properties": {"Name": {"type": "string"}, "born": {"type": "string", "format": "date"}},
                "required": ["Name"]}"#,
        );
        assert!(code.starts_with("// @generated by jsonbind-codegen. Do not edit."));
        assert!(code.contains("use jsonbind::FormatCodec as _;"));
        assert!(code.contains("pub struct Person {\n    bindings: jsonbind::Bindings,\n}"));
        assert!(code.contains("pub const DECLARED: &'static [&'static str] = &[\"Name\", \"born\"];"));
        assert!(code.contains("pub fn name(&self) -> Result<String, jsonbind::FormatError> {"));
        assert!(code.contains(
            "pub fn born(&self) -> Result<Option<jsonbind::chrono::NaiveDate>, jsonbind::FormatError> {"
        ));
        assert!(code.contains("jsonbind::DateCodec::decode(value)"));
        assert!(code.contains("pub fn set_name(&mut self, value: String) -> &mut Self {"));
        assert!(code.contains("pub fn create(name: String) -> Self {"));
        assert!(code.contains("pub struct PersonBuilder {"));
        assert!(code.contains("pub fn with_born(self, value: jsonbind::chrono::NaiveDate) -> Self {"));
        assert!(code.contains("pub fn copy(&self) -> Self {"));
        assert!(code.contains("pub fn put(&mut self, key: impl Into<String>"));
    }

    #[test]
    fn test_forbidden_and_constrained_puts() {
        let closed = render(
            "Closed",
            r#"{"properties": {"a": {"type": "string"}}, "additionalProperties": false}"#,
        );
        assert!(!closed.contains("pub fn put("));
        assert!(closed.contains("!Self::DECLARED.contains(&key.as_str())"));

        let patterned = render(
            "Tagged",
            r#"{"properties": {"a": {"type": "string"}}, "patternProperties": {"^x-": {}}}"#,
        );
        assert!(patterned.contains("pub const KEY_PATTERNS: &'static [&'static str] = &[\"^x-\"];"));
        assert!(patterned.contains("Result<Option<jsonbind::Value>, jsonbind::AccessError>"));
        assert!(patterned.contains("jsonbind::AccessError::RejectedKey"));
    }

    #[test]
    fn test_enum_rendering() {
        let code = render("Color", r#"{"enum": ["red", "green", 4.0, null]}"#);
        assert!(code.contains("pub enum Color {"));
        assert!(code.contains("#[allow(non_camel_case_types)]"));
        assert!(code.contains("Self::red => \"\\\"red\\\"\","));
        assert!(code.contains("Self::_4_0 => \"4.0\","));
        assert!(code.contains("Self::Null => \"null\","));
        assert!(code.contains("pub fn from_value(value: &jsonbind::Value) -> Result<Self, jsonbind::FormatError>"));
    }

    #[test]
    fn test_union_property_rendering() {
        let code = render(
            "Owner",
            r#"{"properties": {"pet": {"oneOf": [
                {"type": "object", "title": "Cat", "properties": {"meow": {"type": "boolean"}}, "required": ["meow"]},
                {"type": "string"}]}}}"#,
        );
        assert!(code.contains("pub enum "));
        assert!(code.contains("let scores: [Option<u32>; 2]"));
        assert!(code.contains("Cat::match_score(value)"));
        assert!(code.contains("jsonbind::StringCodec::decode(value).ok().map(|_| 1)"));
        assert!(code.contains("pub fn pet_as_cat(&self) -> Result<Option<Cat>, jsonbind::FormatError>"));
        assert!(code.contains("pub fn set_pet_as_cat(&mut self, value: Cat) -> &mut Self"));
        assert!(code.contains(
            "self.bindings.put_alternative(\"pet\", jsonbind::Value::Object(value.bindings().clone()), 0);"
        ));
        assert!(code.contains(
            "Some(value) => self.bindings.put_alternative(\"pet\", value.to_value(), value.alternative()),"
        ));
        assert!(code.contains("Some(ref value) => match self.bindings.alternative(\"pet\") {"));
        assert!(code.contains(
            "pub fn from_alternative(value: &jsonbind::Value, index: usize) -> Result<Self, jsonbind::FormatError> {"
        ));
        assert!(code.contains("pub const fn alternative(&self) -> usize {"));
    }

    #[test]
    fn test_root_array_rendering() {
        let code = render(
            "Row",
            r#"{"type": "array", "items": [{"type": "string"}, {"type": "integer"}]}"#,
        );
        assert!(code.contains("pub struct Row {\n    items: Vec<jsonbind::Value>,\n}"));
        assert!(code.contains("Ok((jsonbind::IntegerCodec::decode(value)).ok())"));
    }

    #[test]
    fn test_declared_interface_rendering() {
        let mut session = BuildSession::default();
        session
            .add_schema(
                "Person",
                r#"{"properties": {"Name": {"type": "string"}}, "required": ["Name"]}"#,
            )
            .unwrap();
        session.declare_interface(InterfaceDecl::new("Named").getter(
            "name",
            ValueShape::scalar(ScalarKind::String),
            false,
        ));
        let set = session.run("Person").unwrap();
        let code = RustRenderer::with_options(RenderOptions::new().runtime_crate("::rt")).render(set);

        assert!(code.contains("pub trait Named {"));
        assert!(code.contains("fn name(&self) -> Result<String, ::rt::FormatError>;"));
        assert!(code.contains("impl Named for Person {"));
        assert!(code.contains("Self::name(self)"));
        assert!(code.contains("pub fn as_named(&self) -> Box<dyn Named> {"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let schema = r#"{"properties": {"b": {"type": "integer"}, "a": {"enum": ["x", "y"]}}}"#;
        assert_eq!(render("Thing", schema), render("Thing", schema));
    }
}
