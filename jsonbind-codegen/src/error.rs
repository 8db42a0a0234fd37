//! Error types for code generation.

use crate::phase::Phase;
use jsonbind_core::FormatError;
use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema parsing error.
    #[error("schema parse error: {0}")]
    Parse(#[from] jsonbind_schema::ParseError),

    /// Schema resolution error.
    #[error("schema error: {0}")]
    Schema(#[from] jsonbind_schema::SchemaError),

    /// Build phase error.
    #[error("phase error: {0}")]
    Phase(#[from] PhaseError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }
}

/// Error raised by the phase coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhaseError {
    /// The requested transition is not allowed from the current phase.
    #[error("entry '{path}' cannot move from {from} to {to}")]
    InvalidTransition {
        /// Entry path.
        path: String,
        /// Current phase.
        from: Phase,
        /// Requested phase.
        to: Phase,
    },
}

/// Error raised by dynamic accessor calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No generated type has this name.
    #[error("unknown type '{name}'")]
    UnknownType {
        /// Requested type name.
        name: String,
    },

    /// The type is not an object surface.
    #[error("type '{type_name}' is not an object")]
    NotAnObject {
        /// Type name.
        type_name: String,
    },

    /// The type has no accessor with this name and role.
    #[error("type '{type_name}' has no accessor '{accessor}'")]
    UnknownAccessor {
        /// Type name.
        type_name: String,
        /// Accessor name.
        accessor: String,
    },

    /// The value does not fit the accessor's shape.
    #[error("accessor '{accessor}' expects {expected}, found {found}")]
    WrongKind {
        /// Accessor name.
        accessor: String,
        /// Expected shape.
        expected: String,
        /// Supplied value kind.
        found: &'static str,
    },

    /// The type forbids additional properties.
    #[error("type '{type_name}' has no generic get/put")]
    NoGenericAccess {
        /// Type name.
        type_name: String,
    },

    /// The key is neither declared nor matched by a pattern.
    #[error("type '{type_name}' does not accept key '{key}'")]
    RejectedKey {
        /// Type name.
        type_name: String,
        /// Rejected key.
        key: String,
    },

    /// A required builder or constructor value was not supplied.
    #[error("type '{type_name}' requires '{property}'")]
    MissingRequired {
        /// Type name.
        type_name: String,
        /// Missing property.
        property: String,
    },

    /// More positional values than required properties.
    #[error("type '{type_name}' takes {expected} required values, got {found}")]
    Arity {
        /// Type name.
        type_name: String,
        /// Number of required properties.
        expected: usize,
        /// Number of supplied values.
        found: usize,
    },

    /// A stored scalar did not decode.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// The type does not satisfy the interface.
    #[error("type '{type_name}' cannot be viewed as '{interface}'")]
    ViewNotSatisfied {
        /// Type name.
        type_name: String,
        /// Interface name.
        interface: String,
    },
}

impl AccessError {
    /// Creates an unknown accessor error.
    pub fn unknown_accessor(type_name: impl Into<String>, accessor: impl Into<String>) -> Self {
        Self::UnknownAccessor {
            type_name: type_name.into(),
            accessor: accessor.into(),
        }
    }
}
