//! # jsonbind Core
//!
//! Runtime storage and scalar codecs for schema-synthesized types.
//!
//! This crate provides:
//! - [`Bindings`], the ordered key/value container behind every instance
//! - [`Value`], the values it stores
//! - Format codecs for dates, timestamps, big numbers and binary payloads
//! - Canonical and pretty JSON text, plus a JSON loader
//! - Error types for decoding operations

pub mod binary;
pub mod bindings;
pub mod error;
pub mod format;
pub mod json;
pub mod value;

pub use binary::{Base64Encoding, OctetEncoding};
pub use bindings::Bindings;
pub use error::{Error, FormatError, Result};
pub use format::{
    Base64Codec, BigDecimalCodec, BigIntegerCodec, BooleanCodec, DateCodec, DateTimeCodec,
    Format, FormatCodec, IntegerCodec, NumberCodec, OctetCodec, StringCodec, TimeCodec,
    TimestampMillisCodec,
};
pub use value::Value;
