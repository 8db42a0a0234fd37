//! Prelude module for convenient imports.
//!
//! ```
//! use jsonbind::prelude::*;
//! ```

// Runtime types
pub use jsonbind_core::{Bindings, Format, FormatCodec, FormatError, Value};

// Synthesis
pub use jsonbind_schema::{SchemaError, SynthesisDriver, SynthesisOptions, TypeGraph, TypeId};

// Emission and access
pub use jsonbind_codegen::{
    AccessError, BuildSession, CodegenError, DescriptorSet, DynamicBuilder, DynamicList,
    DynamicObject, DynamicView, Generator, InterfaceDecl, Phase, RenderOptions, Renderer,
    RustRenderer, TypeDescriptor, TypedValue, ValueShape,
};
