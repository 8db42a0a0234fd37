//! # jsonbind Codegen
//!
//! Accessor emission and code generation from synthesized type graphs.
//!
//! This crate provides:
//! - Accessor descriptors for objects, unions, enums and root arrays
//! - Structural cast resolution between object types and interfaces
//! - Build-phase coordination over a per-run session
//! - A dynamic interpreter that runs descriptors against bindings
//! - Rust code generation behind the [`Renderer`] trait

pub mod capability;
pub mod descriptor;
pub mod dynamic;
pub mod emitter;
pub mod error;
pub mod generator;
pub mod phase;
pub mod render;
pub mod rust;
pub mod session;

pub use capability::{Capability, CapabilityIndex, InterfaceDecl, MemberRole, MemberSignature};
pub use descriptor::{
    AccessorDescriptor, AccessorKind, AlternativeDescriptor, BuilderDescriptor, BuilderStep,
    ConstantDescriptor, DescriptorKind, DescriptorSet, ParameterDescriptor, StructuralView,
    TypeDescriptor, ValueShape,
};
pub use dynamic::{
    DynamicBuilder, DynamicList, DynamicObject, DynamicView, TypedValue, key_matches_any,
};
pub use emitter::AccessorEmitter;
pub use error::{AccessError, CodegenError, PhaseError};
pub use generator::{Generator, generate_from_file, generate_from_str};
pub use phase::{Phase, PhaseCoordinator};
pub use render::{RenderOptions, Renderer};
pub use rust::RustRenderer;
pub use session::BuildSession;
