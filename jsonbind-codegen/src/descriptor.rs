//! Declarative accessor descriptions.
//!
//! A [`TypeDescriptor`] fixes every naming, nullability and mutability
//! decision for one generated type. Renderers and the dynamic interpreter
//! consume descriptors; neither looks at the schema again.

use crate::capability::{CapabilityIndex, InterfaceDecl};
use jsonbind_core::Format;
use jsonbind_schema::{AdditionalPolicy, ScalarKind, TypeId};
use serde::Serialize;
use std::collections::HashMap;

/// The value an accessor reads or writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ValueShape {
    /// A scalar, decoded with the matching codec.
    Scalar {
        /// Primitive kind.
        kind: ScalarKind,
        /// Format tag.
        format: Option<Format>,
    },
    /// A generated type (object, union or enum).
    Named {
        /// Generated type name.
        type_name: String,
        /// Graph slot.
        target: TypeId,
    },
    /// A sequence.
    List {
        /// Element shape.
        element: Box<ValueShape>,
    },
    /// Any stored value.
    Any,
    /// Only null.
    Null,
}

impl ValueShape {
    /// Creates a plain scalar shape.
    #[must_use]
    pub const fn scalar(kind: ScalarKind) -> Self {
        Self::Scalar { kind, format: None }
    }

    /// Creates a formatted scalar shape.
    #[must_use]
    pub const fn formatted(kind: ScalarKind, format: Format) -> Self {
        Self::Scalar {
            kind,
            format: Some(format),
        }
    }

    /// Returns a short description used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Scalar {
                format: Some(format),
                ..
            } => format.keyword().to_string(),
            Self::Scalar { kind, .. } => kind.type_name().to_ascii_lowercase(),
            Self::Named { type_name, .. } => type_name.clone(),
            Self::List { element } => format!("list of {}", element.describe()),
            Self::Any => "any".to_string(),
            Self::Null => "null".to_string(),
        }
    }
}

/// Accessor role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum AccessorKind {
    /// Reads a declared property.
    Getter,
    /// Writes a declared property.
    Setter,
    /// Reads a union property only when the given alternative is stored.
    QualifiedGetter {
        /// Union slot.
        union: TypeId,
        /// Alternative index.
        alternative: usize,
    },
    /// Writes a union property as the given alternative.
    QualifiedSetter {
        /// Union slot.
        union: TypeId,
        /// Alternative index.
        alternative: usize,
    },
    /// Generic `get(key)`.
    GenericGet,
    /// Generic `put(key, value)`.
    GenericPut,
    /// Reads a root array element by index, decoded as the given positional
    /// alternative when set.
    ElementGetter {
        /// Positional alternative, if any.
        alternative: Option<usize>,
    },
}

impl AccessorKind {
    /// Returns true for roles that read.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        matches!(
            self,
            Self::Getter
                | Self::QualifiedGetter { .. }
                | Self::GenericGet
                | Self::ElementGetter { .. }
        )
    }
}

/// One generated accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorDescriptor {
    /// Method name, unique within the type.
    pub name: String,
    /// Role.
    pub kind: AccessorKind,
    /// Binding key, for property accessors.
    pub key: Option<String>,
    /// Value shape.
    pub shape: ValueShape,
    /// The property is listed in `required`.
    pub required: bool,
    /// The property admits null.
    pub nullable: bool,
}

impl AccessorDescriptor {
    /// Returns true if reads may produce no value.
    #[must_use]
    pub const fn optional(&self) -> bool {
        !self.required || self.nullable
    }
}

/// One positional constructor or builder parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    /// Parameter name (snake case).
    pub name: String,
    /// Binding key.
    pub key: String,
    /// Value shape.
    pub shape: ValueShape,
    /// The property admits null.
    pub nullable: bool,
}

/// One optional builder step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuilderStep {
    /// Method name (`with_x`).
    pub method: String,
    /// Binding key.
    pub key: String,
    /// Value shape.
    pub shape: ValueShape,
    /// The property admits null.
    pub nullable: bool,
}

/// Builder surface for an object with required properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuilderDescriptor {
    /// Builder type name.
    pub name: String,
    /// Required values, collected positionally.
    pub required: Vec<ParameterDescriptor>,
    /// Optional writable properties.
    pub steps: Vec<BuilderStep>,
}

/// An enum constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstantDescriptor {
    /// Generated identifier.
    pub identifier: String,
    /// Canonical JSON text of the literal.
    pub literal: String,
}

/// A union alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlternativeDescriptor {
    /// Alternative name as synthesized.
    pub name: String,
    /// Generated variant name.
    pub variant: String,
    /// Alternative value shape.
    pub shape: ValueShape,
}

/// A structural conversion from this type to an interface it satisfies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuralView {
    /// Interface name.
    pub interface: String,
    /// Conversion method name (`as_x`).
    pub conversion: String,
    /// The interface is a declared one rather than another object type.
    pub declared: bool,
}

/// Generated type category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorKind {
    /// Object or `allOf` merge.
    Object,
    /// Union.
    Union,
    /// Enum.
    Enum,
    /// Entry-root array.
    Array,
}

/// Everything generated for one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    /// Graph slot.
    pub id: TypeId,
    /// Generated type name.
    pub name: String,
    /// Identity path of the slot.
    pub path: String,
    /// Category.
    pub kind: DescriptorKind,
    /// Accessors in declaration order.
    pub accessors: Vec<AccessorDescriptor>,
    /// `create` parameters (required properties in order); objects only.
    pub constructor: Option<Vec<ParameterDescriptor>>,
    /// Builder surface.
    pub builder: Option<BuilderDescriptor>,
    /// `copy` is emitted.
    pub copier: bool,
    /// Additional-property policy; objects only.
    pub additional: Option<AdditionalPolicy>,
    /// Enum constants.
    pub constants: Vec<ConstantDescriptor>,
    /// Union alternatives.
    pub alternatives: Vec<AlternativeDescriptor>,
    /// Structural views.
    pub views: Vec<StructuralView>,
    /// Array participates in a union with a non-array sibling.
    pub in_mixed_union: bool,
}

impl TypeDescriptor {
    pub(crate) fn new(id: TypeId, name: String, path: String, kind: DescriptorKind) -> Self {
        Self {
            id,
            name,
            path,
            kind,
            accessors: Vec::new(),
            constructor: None,
            builder: None,
            copier: false,
            additional: None,
            constants: Vec::new(),
            alternatives: Vec::new(),
            views: Vec::new(),
            in_mixed_union: false,
        }
    }

    /// Finds an accessor by method name.
    #[must_use]
    pub fn accessor(&self, name: &str) -> Option<&AccessorDescriptor> {
        self.accessors.iter().find(|a| a.name == name)
    }

    /// Returns the accessors of one role.
    pub fn accessors_of(&self, kind: AccessorKind) -> impl Iterator<Item = &AccessorDescriptor> {
        self.accessors.iter().filter(move |a| a.kind == kind)
    }

    /// Returns true if generic `get`/`put` are emitted.
    #[must_use]
    pub fn has_generic_access(&self) -> bool {
        self.accessors
            .iter()
            .any(|a| matches!(a.kind, AccessorKind::GenericGet | AccessorKind::GenericPut))
    }

    /// Finds a view by interface name.
    #[must_use]
    pub fn view(&self, interface: &str) -> Option<&StructuralView> {
        self.views.iter().find(|v| v.interface == interface)
    }
}

/// The descriptors generated for one entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DescriptorSet {
    descriptors: Vec<TypeDescriptor>,
    interfaces: Vec<InterfaceDecl>,
    #[serde(skip)]
    capabilities: CapabilityIndex,
    #[serde(skip)]
    by_id: HashMap<TypeId, usize>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl DescriptorSet {
    pub(crate) fn new(
        descriptors: Vec<TypeDescriptor>,
        interfaces: Vec<InterfaceDecl>,
        capabilities: CapabilityIndex,
    ) -> Self {
        let by_id = descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id, i))
            .collect();
        let by_name = descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.clone(), i))
            .collect();
        Self {
            descriptors,
            interfaces,
            capabilities,
            by_id,
            by_name,
        }
    }

    /// Returns the descriptor generated for a slot.
    #[must_use]
    pub fn get(&self, id: TypeId) -> Option<&TypeDescriptor> {
        self.by_id.get(&id).map(|&i| &self.descriptors[i])
    }

    /// Returns a descriptor by generated type name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&TypeDescriptor> {
        self.by_name.get(name).map(|&i| &self.descriptors[i])
    }

    /// Returns every descriptor in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.descriptors.iter()
    }

    /// Returns the declared interfaces.
    #[must_use]
    pub fn interfaces(&self) -> &[InterfaceDecl] {
        &self.interfaces
    }

    /// Returns a declared interface by name.
    #[must_use]
    pub fn interface(&self, name: &str) -> Option<&InterfaceDecl> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Returns the structural cast index.
    #[must_use]
    pub fn capabilities(&self) -> &CapabilityIndex {
        &self.capabilities
    }

    /// Returns the number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if nothing was generated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Serializes the set as pretty JSON for the emission collaborator.
    ///
    /// # Errors
    /// Returns the serializer error; descriptor sets are plain data, so this
    /// does not fail in practice.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
