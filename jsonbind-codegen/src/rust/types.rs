//! Shape to Rust type and expression mapping.

use crate::descriptor::{AccessorDescriptor, DescriptorKind, DescriptorSet, ValueShape};
use jsonbind_core::Format;
use jsonbind_schema::ScalarKind;

/// Maps value shapes to Rust types and codec calls.
pub struct TypeMapper<'a> {
    set: &'a DescriptorSet,
    rt: &'a str,
}

impl<'a> TypeMapper<'a> {
    /// Creates a mapper over a descriptor set.
    #[must_use]
    pub fn new(set: &'a DescriptorSet, runtime_crate: &'a str) -> Self {
        Self {
            set,
            rt: runtime_crate,
        }
    }

    /// Returns the runtime crate path.
    #[must_use]
    pub fn runtime(&self) -> &str {
        self.rt
    }

    fn named_kind(&self, shape: &ValueShape) -> Option<DescriptorKind> {
        match shape {
            ValueShape::Named { target, .. } => self.set.get(*target).map(|d| d.kind),
            _ => None,
        }
    }

    /// Returns the union type a shape names, if it names one.
    #[must_use]
    pub fn union_name<'s>(&self, shape: &'s ValueShape) -> Option<&'s str> {
        match shape {
            ValueShape::Named { type_name, .. }
                if self.named_kind(shape) == Some(DescriptorKind::Union) =>
            {
                Some(type_name)
            }
            _ => None,
        }
    }

    /// Returns the codec type for a scalar.
    #[must_use]
    pub fn codec(&self, kind: ScalarKind, format: Option<Format>) -> String {
        let name = match (format, kind) {
            (Some(format), _) => format.codec_name(),
            (None, ScalarKind::String) => "StringCodec",
            (None, ScalarKind::Boolean) => "BooleanCodec",
            (None, ScalarKind::Integer) => "IntegerCodec",
            (None, ScalarKind::Number) => "NumberCodec",
        };
        format!("{}::{name}", self.rt)
    }

    /// Rewrites a typed-value path so it resolves through the runtime crate.
    fn qualify(&self, path: &str) -> String {
        let rt = self.rt;
        path.replace("jsonbind::", "")
            .replace("chrono::", &format!("{rt}::chrono::"))
            .replace("num_bigint::", &format!("{rt}::num_bigint::"))
            .replace("bigdecimal::", &format!("{rt}::bigdecimal::"))
    }

    /// Returns the Rust type of a shape.
    #[must_use]
    pub fn rust_type(&self, shape: &ValueShape) -> String {
        match shape {
            ValueShape::Scalar {
                format: Some(format),
                ..
            } => {
                let path = self.qualify(format.rust_type());
                if path.contains("::") {
                    path
                } else {
                    format!("{}::{path}", self.rt)
                }
            }
            ValueShape::Scalar { kind, .. } => match kind {
                ScalarKind::String => "String".to_string(),
                ScalarKind::Boolean => "bool".to_string(),
                ScalarKind::Integer => "i64".to_string(),
                ScalarKind::Number => "f64".to_string(),
            },
            ValueShape::Named { type_name, .. } => type_name.clone(),
            ValueShape::List { element } => format!("Vec<{}>", self.rust_type(element)),
            ValueShape::Any => format!("{}::Value", self.rt),
            ValueShape::Null => "()".to_string(),
        }
    }

    /// Returns the getter result type.
    #[must_use]
    pub fn getter_type(&self, accessor: &AccessorDescriptor) -> String {
        let ty = self.rust_type(&accessor.shape);
        if accessor.optional() {
            format!("Result<Option<{ty}>, {}::FormatError>", self.rt)
        } else {
            format!("Result<{ty}, {}::FormatError>", self.rt)
        }
    }

    /// Returns the setter parameter type.
    #[must_use]
    pub fn setter_type(&self, accessor: &AccessorDescriptor) -> String {
        self.param_type(&accessor.shape, accessor.optional())
    }

    /// Returns a parameter type, wrapped in `Option` when optional.
    #[must_use]
    pub fn param_type(&self, shape: &ValueShape, optional: bool) -> String {
        let ty = self.rust_type(shape);
        if optional { format!("Option<{ty}>") } else { ty }
    }

    /// Returns an expression of type `Result<T, FormatError>` decoding the
    /// `&Value` named `var`.
    #[must_use]
    pub fn decode_expr(&self, shape: &ValueShape, var: &str, depth: usize) -> String {
        let rt = self.rt;
        match shape {
            ValueShape::Scalar { kind, format } => {
                format!("{}::decode({var})", self.codec(*kind, *format))
            }
            ValueShape::Named { type_name, .. } => match self.named_kind(shape) {
                Some(DescriptorKind::Object) => format!(
                    "{var}.as_object().cloned().map({type_name}::from_bindings).ok_or_else(|| \
                     {rt}::FormatError::unexpected(\"object\", \"object\", {var}.kind()))"
                ),
                _ => format!("{type_name}::from_value({var})"),
            },
            ValueShape::List { element } => {
                let item = format!("item{depth}");
                format!(
                    "{var}.as_array().ok_or_else(|| {rt}::FormatError::unexpected(\"array\", \
                     \"array\", {var}.kind()))?.iter().map(|{item}| {}).collect::<Result<Vec<_>, _>>()",
                    self.decode_expr(element, &item, depth + 1)
                )
            }
            ValueShape::Any => format!("Ok::<_, {rt}::FormatError>({var}.clone())"),
            ValueShape::Null => format!("Ok::<_, {rt}::FormatError>(())"),
        }
    }

    /// Returns an expression of type `Value` encoding the binding `var`,
    /// which holds either a `T` or a `&T`.
    #[must_use]
    pub fn encode_expr(&self, shape: &ValueShape, var: &str, depth: usize) -> String {
        let rt = self.rt;
        match shape {
            ValueShape::Scalar { kind, format } => {
                format!("{}::encode(&{var})", self.codec(*kind, *format))
            }
            ValueShape::Named { .. } => match self.named_kind(shape) {
                Some(DescriptorKind::Object) => {
                    format!("{rt}::Value::Object({var}.bindings().clone())")
                }
                _ => format!("{var}.to_value()"),
            },
            ValueShape::List { element } => {
                let item = format!("item{depth}");
                format!(
                    "{rt}::Value::Array({var}.iter().map(|{item}| {}).collect())",
                    self.encode_expr(element, &item, depth + 1)
                )
            }
            ValueShape::Any => format!("{var}.clone()"),
            ValueShape::Null => format!("{rt}::Value::Null"),
        }
    }

    /// Returns an expression of type `Option<u32>` scoring how well the
    /// `&Value` named `var` fits a union alternative.
    #[must_use]
    pub fn score_expr(&self, shape: &ValueShape, var: &str) -> String {
        match shape {
            ValueShape::Scalar { kind, format } => {
                let score = if format.is_some() { 2 } else { 1 };
                format!(
                    "{}::decode({var}).ok().map(|_| {score})",
                    self.codec(*kind, *format)
                )
            }
            ValueShape::Named { type_name, .. } => match self.named_kind(shape) {
                Some(DescriptorKind::Object) => format!("{type_name}::match_score({var})"),
                Some(DescriptorKind::Enum) => {
                    format!("{type_name}::from_value({var}).ok().map(|_| 3)")
                }
                _ => format!("{type_name}::from_value({var}).ok().map(|_| 1)"),
            },
            ValueShape::List { .. } => format!("{var}.as_array().map(|_| 1)"),
            ValueShape::Any => "Some(0)".to_string(),
            ValueShape::Null => format!("{var}.is_null().then_some(1)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_types_route_through_runtime() {
        let set = DescriptorSet::default();
        let types = TypeMapper::new(&set, "jsonbind");
        assert_eq!(
            types.rust_type(&ValueShape::formatted(ScalarKind::String, Format::Date)),
            "jsonbind::chrono::NaiveDate"
        );
        assert_eq!(
            types.rust_type(&ValueShape::formatted(
                ScalarKind::Integer,
                Format::TimestampMillis
            )),
            "jsonbind::chrono::DateTime<jsonbind::chrono::Utc>"
        );
        assert_eq!(
            types.rust_type(&ValueShape::formatted(ScalarKind::String, Format::Base64Binary)),
            "jsonbind::Base64Encoding"
        );
        assert_eq!(
            types.rust_type(&ValueShape::List {
                element: Box::new(ValueShape::scalar(ScalarKind::Integer))
            }),
            "Vec<i64>"
        );
    }

    #[test]
    fn test_codec_expressions() {
        let set = DescriptorSet::default();
        let types = TypeMapper::new(&set, "rt");
        let shape = ValueShape::formatted(ScalarKind::String, Format::BigDecimal);
        assert_eq!(types.decode_expr(&shape, "value", 0), "rt::BigDecimalCodec::decode(value)");
        assert_eq!(types.encode_expr(&shape, "value", 0), "rt::BigDecimalCodec::encode(&value)");
        assert_eq!(
            types.score_expr(&ValueShape::Null, "value"),
            "value.is_null().then_some(1)"
        );
    }
}
