//! Union and root array code generation.

use crate::descriptor::{AccessorKind, TypeDescriptor, ValueShape};
use crate::rust::types::TypeMapper;

/// Generator for unions and entry-root arrays.
pub struct UnionGenerator<'a> {
    types: &'a TypeMapper<'a>,
}

impl<'a> UnionGenerator<'a> {
    /// Creates a new union generator.
    #[must_use]
    pub fn new(types: &'a TypeMapper<'a>) -> Self {
        Self { types }
    }

    /// Generates a union enum with one variant per alternative.
    #[must_use]
    pub fn generate_union(&self, descriptor: &TypeDescriptor) -> String {
        let rt = self.types.runtime();
        let name = &descriptor.name;
        let mut output = String::new();

        output.push_str(&format!("/// Generated from `{}`.\n", descriptor.path));
        output.push_str("#[derive(Debug, Clone, PartialEq)]\n");
        output.push_str(&format!("pub enum {name} {{\n"));
        for alt in &descriptor.alternatives {
            output.push_str(&format!("    /// `{}` alternative.\n", alt.name));
            if alt.shape == ValueShape::Null {
                output.push_str(&format!("    {},\n", alt.variant));
            } else {
                output.push_str(&format!(
                    "    {}({}),\n",
                    alt.variant,
                    self.types.rust_type(&alt.shape)
                ));
            }
        }
        output.push_str("}\n\n");

        output.push_str(&format!("impl {name} {{\n"));

        // Discrimination picks the best-scoring alternative, earliest on ties
        output.push_str("    /// Decodes the alternative that best fits a stored value.\n");
        output.push_str("    ///\n");
        output.push_str("    /// # Errors\n");
        output.push_str("    /// Returns `FormatError` if no alternative fits or decoding fails.\n");
        output.push_str(&format!(
            "    pub fn from_value(value: &{rt}::Value) -> Result<Self, {rt}::FormatError> {{\n"
        ));
        let scores: Vec<String> = descriptor
            .alternatives
            .iter()
            .map(|alt| self.types.score_expr(&alt.shape, "value"))
            .collect();
        output.push_str(&format!(
            "        let scores: [Option<u32>; {}] = [{}];\n",
            scores.len(),
            scores.join(", ")
        ));
        output.push_str("        let mut best: Option<(usize, u32)> = None;\n");
        output.push_str("        for (index, score) in scores.iter().enumerate() {\n");
        output.push_str("            if let Some(score) = *score {\n");
        output.push_str("                if best.is_none_or(|(_, top)| score > top) {\n");
        output.push_str("                    best = Some((index, score));\n");
        output.push_str("                }\n");
        output.push_str("            }\n");
        output.push_str("        }\n");
        output.push_str("        match best {\n");
        output.push_str("            Some((index, _)) => Self::from_alternative(value, index),\n");
        output.push_str(&format!(
            "            None => Err({rt}::FormatError::unexpected({name:?}, \"union alternative\", value.kind())),\n"
        ));
        output.push_str("        }\n");
        output.push_str("    }\n\n");

        output.push_str("    /// Decodes a stored value as alternative `index`.\n");
        output.push_str("    ///\n");
        output.push_str("    /// # Errors\n");
        output.push_str("    /// Returns `FormatError` if the index is out of range or decoding fails.\n");
        output.push_str(&format!(
            "    pub fn from_alternative(value: &{rt}::Value, index: usize) -> Result<Self, {rt}::FormatError> {{\n"
        ));
        output.push_str("        match index {\n");
        for (i, alt) in descriptor.alternatives.iter().enumerate() {
            if alt.shape == ValueShape::Null {
                output.push_str(&format!("            {i} => Ok(Self::{}),\n", alt.variant));
            } else {
                output.push_str(&format!(
                    "            {i} => Ok(Self::{}({}?)),\n",
                    alt.variant,
                    self.types.decode_expr(&alt.shape, "value", 0)
                ));
            }
        }
        output.push_str(&format!(
            "            _ => Err({rt}::FormatError::unexpected({name:?}, \"union alternative\", value.kind())),\n"
        ));
        output.push_str("        }\n");
        output.push_str("    }\n\n");

        output.push_str("    /// Returns the index of the held alternative.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub const fn alternative(&self) -> usize {\n");
        output.push_str("        match self {\n");
        for (i, alt) in descriptor.alternatives.iter().enumerate() {
            if alt.shape == ValueShape::Null {
                output.push_str(&format!("            Self::{} => {i},\n", alt.variant));
            } else {
                output.push_str(&format!("            Self::{}(_) => {i},\n", alt.variant));
            }
        }
        output.push_str("        }\n");
        output.push_str("    }\n\n");

        output.push_str("    /// Returns the stored form of the held alternative.\n");
        output.push_str("    #[must_use]\n");
        output.push_str(&format!("    pub fn to_value(&self) -> {rt}::Value {{\n"));
        output.push_str("        match self {\n");
        for alt in &descriptor.alternatives {
            if alt.shape == ValueShape::Null {
                output.push_str(&format!(
                    "            Self::{} => {rt}::Value::Null,\n",
                    alt.variant
                ));
            } else {
                output.push_str(&format!(
                    "            Self::{}(inner) => {},\n",
                    alt.variant,
                    self.types.encode_expr(&alt.shape, "inner", 0)
                ));
            }
        }
        output.push_str("        }\n");
        output.push_str("    }\n\n");

        for accessor in &descriptor.accessors {
            let AccessorKind::QualifiedGetter { alternative, .. } = accessor.kind else {
                continue;
            };
            let Some(alt) = descriptor.alternatives.get(alternative) else {
                continue;
            };
            output.push_str(&format!(
                "    /// Returns the `{}` alternative, if held.\n",
                alt.name
            ));
            output.push_str("    #[must_use]\n");
            output.push_str(&format!(
                "    pub fn {}(&self) -> Option<&{}> {{\n",
                accessor.name,
                self.types.rust_type(&accessor.shape)
            ));
            output.push_str("        match self {\n");
            output.push_str(&format!(
                "            Self::{}(inner) => Some(inner),\n",
                alt.variant
            ));
            output.push_str("            #[allow(unreachable_patterns)]\n");
            output.push_str("            _ => None,\n");
            output.push_str("        }\n");
            output.push_str("    }\n\n");
        }

        output.push_str("}\n\n");
        output
    }

    /// Generates a wrapper over an entry-root array.
    #[must_use]
    pub fn generate_array(&self, descriptor: &TypeDescriptor) -> String {
        let rt = self.types.runtime();
        let name = &descriptor.name;
        let mut output = String::new();

        output.push_str(&format!("/// Generated from `{}`.\n", descriptor.path));
        output.push_str("#[derive(Debug, Clone, PartialEq, Default)]\n");
        output.push_str(&format!("pub struct {name} {{\n"));
        output.push_str(&format!("    items: Vec<{rt}::Value>,\n"));
        output.push_str("}\n\n");

        output.push_str(&format!("impl {name} {{\n"));
        output.push_str("    /// Wraps stored elements.\n");
        output.push_str("    #[must_use]\n");
        output.push_str(&format!(
            "    pub fn from_values(items: Vec<{rt}::Value>) -> Self {{\n"
        ));
        output.push_str("        Self { items }\n");
        output.push_str("    }\n\n");

        output.push_str("    /// Wraps a stored array.\n");
        output.push_str("    ///\n");
        output.push_str("    /// # Errors\n");
        output.push_str("    /// Returns `FormatError` if the value is not an array.\n");
        output.push_str(&format!(
            "    pub fn from_value(value: &{rt}::Value) -> Result<Self, {rt}::FormatError> {{\n"
        ));
        output.push_str("        value\n");
        output.push_str("            .as_array()\n");
        output.push_str("            .map(|items| Self::from_values(items.to_vec()))\n");
        output.push_str(&format!(
            "            .ok_or_else(|| {rt}::FormatError::unexpected({name:?}, \"array\", value.kind()))\n"
        ));
        output.push_str("    }\n\n");

        output.push_str("    /// Returns the stored elements.\n");
        output.push_str("    #[must_use]\n");
        output.push_str(&format!("    pub fn values(&self) -> &[{rt}::Value] {{\n"));
        output.push_str("        &self.items\n");
        output.push_str("    }\n\n");

        output.push_str("    /// Returns the stored form.\n");
        output.push_str("    #[must_use]\n");
        output.push_str(&format!("    pub fn to_value(&self) -> {rt}::Value {{\n"));
        output.push_str(&format!("        {rt}::Value::Array(self.items.clone())\n"));
        output.push_str("    }\n\n");

        output.push_str("    /// Returns the number of elements.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub fn len(&self) -> usize {\n");
        output.push_str("        self.items.len()\n");
        output.push_str("    }\n\n");

        output.push_str("    /// Returns true if there are no elements.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub fn is_empty(&self) -> bool {\n");
        output.push_str("        self.items.is_empty()\n");
        output.push_str("    }\n\n");

        for accessor in &descriptor.accessors {
            let AccessorKind::ElementGetter { alternative } = accessor.kind else {
                continue;
            };
            let ty = self.types.rust_type(&accessor.shape);
            let decode = self.types.decode_expr(&accessor.shape, "value", 0);
            output.push_str("    /// Reads the element at `index`.\n");
            output.push_str("    ///\n");
            output.push_str("    /// # Errors\n");
            output.push_str("    /// Returns `FormatError` if the element does not decode.\n");
            output.push_str(&format!(
                "    pub fn {}(&self, index: usize) -> Result<Option<{ty}>, {rt}::FormatError> {{\n",
                accessor.name
            ));
            output.push_str("        let Some(value) = self.items.get(index) else {\n");
            output.push_str("            return Ok(None);\n");
            output.push_str("        };\n");
            if alternative.is_some() {
                // Positional elements that hold another alternative read as absent
                output.push_str(&format!("        Ok(({decode}).ok())\n"));
            } else {
                if accessor.nullable {
                    output.push_str("        if value.is_null() {\n");
                    output.push_str("            return Ok(None);\n");
                    output.push_str("        }\n");
                }
                output.push_str(&format!("        ({decode}).map(Some)\n"));
            }
            output.push_str("    }\n\n");
        }

        output.push_str("}\n\n");
        output
    }
}
