//! Error types for schema parsing and synthesis.

use thiserror::Error;

/// Error type for schema document parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Document is not valid JSON.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A schema position holds something other than an object or boolean.
    #[error("invalid schema at '{pointer}': expected an object, found {found}")]
    InvalidSchema {
        /// JSON pointer of the offending value.
        pointer: String,
        /// Kind of JSON value found.
        found: &'static str,
    },

    /// A keyword has a value of the wrong shape.
    #[error("invalid value for keyword '{keyword}' at '{pointer}': {message}")]
    InvalidKeyword {
        /// JSON pointer of the schema holding the keyword.
        pointer: String,
        /// Keyword name.
        keyword: String,
        /// What was wrong.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Creates an invalid keyword error.
    pub fn invalid_keyword(
        pointer: impl Into<String>,
        keyword: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidKeyword {
            pointer: pointer.into(),
            keyword: keyword.into(),
            message: message.into(),
        }
    }
}

/// Error type for type graph synthesis.
///
/// A `SchemaError` is fatal for the entry point being synthesized; sibling
/// entry points are unaffected.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// No document registered under the entry name.
    #[error("unknown schema entry '{name}'")]
    UnknownEntry {
        /// Entry name.
        name: String,
    },

    /// A document with this name is already registered.
    #[error("duplicate schema document '{name}'")]
    DuplicateDocument {
        /// Document name.
        name: String,
    },

    /// A `$ref` names a document that is not registered.
    #[error("reference '{reference}' at '{from}' names unknown document '{document}'")]
    UnknownDocument {
        /// The raw reference.
        reference: String,
        /// Path of the referring node.
        from: String,
        /// Document name extracted from the reference.
        document: String,
    },

    /// A `$ref` pointer does not resolve to a schema node.
    #[error("unresolvable reference '{reference}' at '{from}'")]
    UnresolvedReference {
        /// The raw reference.
        reference: String,
        /// Path of the referring node.
        from: String,
    },

    /// A reference or `allOf` chain refers back to itself with no structure
    /// in between.
    #[error("circular type reference detected: {path}")]
    CircularReference {
        /// Path where the cycle was closed.
        path: String,
    },

    /// Two `allOf` members declare the same property with different types.
    #[error("incompatible allOf merge at '{path}': property '{property}' is declared with different types")]
    IncompatibleMerge {
        /// Path of the intersection.
        path: String,
        /// Conflicting property name.
        property: String,
    },

    /// An `allOf` member is not an object type.
    #[error("allOf at '{path}' has non-object member '{member}'")]
    NonObjectIntersection {
        /// Path of the intersection.
        path: String,
        /// Path of the offending member.
        member: String,
    },

    /// Identifier disambiguation exhausted its suffixes.
    #[error("name collision for '{name}' in '{scope}' could not be resolved after {attempts} attempts")]
    NameCollision {
        /// Sanitized base name.
        name: String,
        /// Scope in which names must be unique.
        scope: String,
        /// Number of suffixes tried.
        attempts: usize,
    },

    /// A `patternProperties` key is not a valid regular expression.
    #[error("invalid property pattern '{pattern}' at '{path}': {message}")]
    InvalidPattern {
        /// The pattern.
        pattern: String,
        /// Path of the object type.
        path: String,
        /// Regex compiler message.
        message: String,
    },
}

impl SchemaError {
    /// Creates a circular reference error.
    pub fn circular(path: impl Into<String>) -> Self {
        Self::CircularReference { path: path.into() }
    }

    /// Creates an unresolved reference error.
    pub fn unresolved(reference: impl Into<String>, from: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            reference: reference.into(),
            from: from.into(),
        }
    }

    /// Creates an incompatible merge error.
    pub fn incompatible_merge(path: impl Into<String>, property: impl Into<String>) -> Self {
        Self::IncompatibleMerge {
            path: path.into(),
            property: property.into(),
        }
    }
}
