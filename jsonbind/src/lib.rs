//! # jsonbind
//!
//! Schema-driven type synthesis over ordered JSON bindings.
//!
//! A schema document is parsed, resolved into a type graph, and turned into
//! accessor descriptors. Every generated surface, whether rendered Rust code
//! or a [`DynamicObject`], reads and writes one shared [`Bindings`] container.
//!
//! ## Features
//!
//! - **Lazy synthesis** - Self- and cross-referential schemas terminate
//! - **Format codecs** - Exact round trips for dates, big numbers and binary payloads
//! - **Structural views** - An object is usable as any interface it satisfies
//! - **Deterministic output** - Repeated builds produce identical descriptors and text
//!
//! ## Quick Start
//!
//! ```
//! use jsonbind::prelude::*;
//!
//! let mut session = BuildSession::default();
//! session
//!     .add_schema("Person", r#"{"properties": {"Name": {"type": "string"}}}"#)
//!     .unwrap();
//! session.run("Person").unwrap();
//!
//! let set = session.descriptors("Person").unwrap();
//! let person = DynamicObject::new(set, session.graph(), "Person").unwrap();
//! person.set("set_name", "Joe Namath").unwrap();
//! assert_eq!(person.to_canonical_text(), r#"{"Name":"Joe Namath"}"#);
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Bindings, values and format codecs
//! - [`schema`] - Schema parsing and type graph synthesis
//! - [`codegen`] - Descriptors, phases, dynamic access and rendering

pub mod prelude;

/// Bindings, values and format codecs.
pub mod core {
    pub use jsonbind_core::*;
}

/// Schema parsing and type graph synthesis.
pub mod schema {
    pub use jsonbind_schema::*;
}

/// Descriptors, phases, dynamic access and rendering.
pub mod codegen {
    pub use jsonbind_codegen::*;
}

// Runtime items referenced by generated code
pub use jsonbind_core::{
    Base64Codec, Base64Encoding, BigDecimalCodec, BigIntegerCodec, BooleanCodec, Bindings,
    DateCodec, DateTimeCodec, Format, FormatCodec, FormatError, IntegerCodec, NumberCodec,
    OctetCodec, OctetEncoding, StringCodec, TimeCodec, TimestampMillisCodec, Value,
};

pub use jsonbind_codegen::{AccessError, DynamicObject, key_matches_any};

pub use bigdecimal;
pub use chrono;
pub use num_bigint;
