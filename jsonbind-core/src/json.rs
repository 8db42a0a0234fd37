//! JSON text conversion for bindings.
//!
//! The canonical text is compact JSON with keys in insertion order. It is the
//! round-trip form for tests and is stable across repeated calls while the
//! binding is unmodified. The pretty form indents by two spaces.

use crate::bindings::Bindings;
use crate::error::{Error, Result};
use crate::value::Value;

impl Value {
    /// Converts a `serde_json` value, preserving object key order.
    #[must_use]
    pub fn from_json_value(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from_json_value).collect())
            }
            serde_json::Value::Object(map) => {
                let bindings = Bindings::with_capacity(map.len());
                for (k, v) in map {
                    bindings.put(k, Self::from_json_value(v));
                }
                Self::Object(bindings)
            }
        }
    }

    /// Parses JSON text.
    ///
    /// # Errors
    /// Returns `Error::Json` if the text is not valid JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Ok(Self::from_json_value(json))
    }

    /// Converts to a `serde_json` value.
    ///
    /// Non-finite numbers have no JSON form and become null.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Integer(i) => serde_json::Value::Number((*i).into()),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json_value).collect())
            }
            Self::Object(b) => b.to_json_value(),
        }
    }

    /// Returns the compact canonical text.
    #[must_use]
    pub fn to_canonical_text(&self) -> String {
        self.to_json_value().to_string()
    }
}

impl Bindings {
    /// Parses JSON text whose root is an object.
    ///
    /// # Errors
    /// Returns `Error::Json` for invalid JSON, or `Error::NotAnObject` if the
    /// root is not an object.
    pub fn from_json(text: &str) -> Result<Self> {
        match Value::from_json(text)? {
            Value::Object(b) => Ok(b),
            other => Err(Error::NotAnObject {
                found: other.kind(),
            }),
        }
    }

    /// Converts to a `serde_json` object, preserving key order.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let mut map = serde_json::Map::with_capacity(self.len());
        for (k, v) in self.entries() {
            map.insert(k, v.to_json_value());
        }
        serde_json::Value::Object(map)
    }

    /// Returns the compact canonical text, e.g. `{"Name":"Joe Namath"}`.
    #[must_use]
    pub fn to_canonical_text(&self) -> String {
        self.to_json_value().to_string()
    }

    /// Returns two-space indented JSON text.
    #[must_use]
    pub fn to_pretty_text(&self) -> String {
        format!("{:#}", self.to_json_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_text_single_property() {
        let b = Bindings::new();
        b.put("Name", "Joe Namath");
        assert_eq!(b.to_canonical_text(), r#"{"Name":"Joe Namath"}"#);
        assert_eq!(b.to_string(), r#"{"Name":"Joe Namath"}"#);
    }

    #[test]
    fn test_canonical_text_is_stable() {
        let b = Bindings::new();
        b.put("b", 1i64);
        b.put("a", vec![Value::from(true), Value::Null]);
        let first = b.to_canonical_text();
        assert_eq!(first, b.to_canonical_text());
        assert_eq!(first, r#"{"b":1,"a":[true,null]}"#);
    }

    #[test]
    fn test_pretty_text() {
        let address = Bindings::new();
        address.put("street_address", "111 Main St.");
        address.put("city", "Cupertino");
        let contact = Bindings::new();
        contact.put("Name", "Scott McKinney");
        contact.put("PrimaryAddress", address);

        assert_eq!(
            contact.to_pretty_text(),
            "{\n  \"Name\": \"Scott McKinney\",\n  \"PrimaryAddress\": {\n    \"street_address\": \"111 Main St.\",\n    \"city\": \"Cupertino\"\n  }\n}"
        );
    }

    #[test]
    fn test_from_json_preserves_order_and_kinds() {
        let b = Bindings::from_json(r#"{"z": 1, "a": 2.5, "m": {"k": [1, "x"]}}"#)
            .expect("Failed to parse");
        assert_eq!(b.keys(), vec!["z", "a", "m"]);
        assert_eq!(b.get("z"), Some(Value::Integer(1)));
        assert_eq!(b.get("a"), Some(Value::Number(2.5)));
        assert_eq!(b.to_canonical_text(), r#"{"z":1,"a":2.5,"m":{"k":[1,"x"]}}"#);
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = Bindings::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::NotAnObject { found: "array" }));
        assert!(matches!(Bindings::from_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_non_finite_number_serializes_as_null() {
        assert_eq!(Value::Number(f64::INFINITY).to_canonical_text(), "null");
    }
}
