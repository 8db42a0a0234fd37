//! Enum code generation.

use crate::descriptor::TypeDescriptor;
use crate::rust::types::TypeMapper;

/// Generator for enum definitions.
pub struct EnumGenerator<'a> {
    types: &'a TypeMapper<'a>,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator.
    #[must_use]
    pub fn new(types: &'a TypeMapper<'a>) -> Self {
        Self { types }
    }

    /// Generates an enum with one variant per literal.
    #[must_use]
    pub fn generate(&self, descriptor: &TypeDescriptor) -> String {
        let rt = self.types.runtime();
        let name = &descriptor.name;
        let mut output = String::new();

        output.push_str(&format!("/// Generated from `{}`.\n", descriptor.path));
        output.push_str("#[allow(non_camel_case_types)]\n");
        output.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]\n");
        output.push_str(&format!("pub enum {name} {{\n"));
        for constant in &descriptor.constants {
            output.push_str(&format!("    /// `{}`\n", constant.literal));
            output.push_str(&format!("    {},\n", constant.identifier));
        }
        output.push_str("}\n\n");

        output.push_str(&format!("impl {name} {{\n"));
        let all: Vec<String> = descriptor
            .constants
            .iter()
            .map(|c| format!("Self::{}", c.identifier))
            .collect();
        output.push_str("    /// Every literal, in declaration order.\n");
        output.push_str(&format!(
            "    pub const ALL: &'static [Self] = &[{}];\n\n",
            all.join(", ")
        ));

        // Literal JSON text
        output.push_str("    /// Returns the literal as canonical JSON text.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub const fn literal(&self) -> &'static str {\n");
        output.push_str("        match *self {\n");
        for constant in &descriptor.constants {
            output.push_str(&format!(
                "            Self::{} => {:?},\n",
                constant.identifier, constant.literal
            ));
        }
        output.push_str("        }\n");
        output.push_str("    }\n\n");

        output.push_str("    /// Returns the stored form of the literal.\n");
        output.push_str("    #[must_use]\n");
        output.push_str(&format!("    pub fn to_value(&self) -> {rt}::Value {{\n"));
        output.push_str(&format!(
            "        {rt}::Value::from_json(self.literal()).unwrap_or_default()\n"
        ));
        output.push_str("    }\n\n");

        output.push_str("    /// Finds the literal equal to a stored value.\n");
        output.push_str("    ///\n");
        output.push_str("    /// # Errors\n");
        output.push_str("    /// Returns `FormatError` if no literal matches.\n");
        output.push_str(&format!(
            "    pub fn from_value(value: &{rt}::Value) -> Result<Self, {rt}::FormatError> {{\n"
        ));
        output.push_str("        let text = value.to_canonical_text();\n");
        output.push_str("        Self::ALL\n");
        output.push_str("            .iter()\n");
        output.push_str("            .copied()\n");
        output.push_str("            .find(|literal| literal.literal() == text)\n");
        output.push_str(&format!(
            "            .ok_or_else(|| {rt}::FormatError::unexpected({:?}, \"enum literal\", value.kind()))\n",
            descriptor.name
        ));
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output
    }
}
