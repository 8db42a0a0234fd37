//! Rust bindings generated from `schemas/` at build time.
//!
//! A renderer change that emits invalid Rust breaks this crate's build.

#![allow(clippy::all, unused_imports)]

/// Generated from `schemas/Person.json`.
pub mod person {
    include!(concat!(env!("OUT_DIR"), "/person.rs"));
}

/// Generated from `schemas/Holder.json`.
pub mod holder {
    include!(concat!(env!("OUT_DIR"), "/holder.rs"));
}
