//! Structural cast resolution.
//!
//! An object can be viewed through an interface when the interface's
//! members are a subset of the object's accessors, compared by name, role,
//! shape and optionality. Matching runs once over a finished descriptor set
//! and never consults nominal relationships.

use crate::descriptor::{AccessorKind, DescriptorKind, TypeDescriptor, ValueShape};
use jsonbind_schema::TypeId;
use serde::Serialize;

/// Role of an interface member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// Reads a property.
    Getter,
    /// Writes a property.
    Setter,
}

impl MemberRole {
    fn matches(self, kind: AccessorKind) -> bool {
        matches!(
            (self, kind),
            (Self::Getter, AccessorKind::Getter) | (Self::Setter, AccessorKind::Setter)
        )
    }
}

/// One required interface member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSignature {
    /// Method name.
    pub name: String,
    /// Role.
    pub role: MemberRole,
    /// Value shape.
    pub shape: ValueShape,
    /// The member reads or writes an optional value.
    pub optional: bool,
}

/// An interface that object types may satisfy structurally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceDecl {
    /// Interface name.
    pub name: String,
    /// Required members.
    pub members: Vec<MemberSignature>,
}

impl InterfaceDecl {
    /// Creates an interface with no members.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Adds a required getter.
    #[must_use]
    pub fn getter(mut self, name: impl Into<String>, shape: ValueShape, optional: bool) -> Self {
        self.members.push(MemberSignature {
            name: name.into(),
            role: MemberRole::Getter,
            shape,
            optional,
        });
        self
    }

    /// Adds a required setter.
    #[must_use]
    pub fn setter(mut self, name: impl Into<String>, shape: ValueShape, optional: bool) -> Self {
        self.members.push(MemberSignature {
            name: name.into(),
            role: MemberRole::Setter,
            shape,
            optional,
        });
        self
    }

    /// Derives the interface an object descriptor presents to others.
    #[must_use]
    pub fn from_descriptor(descriptor: &TypeDescriptor) -> Self {
        let members = descriptor
            .accessors
            .iter()
            .filter_map(|accessor| {
                let role = match accessor.kind {
                    AccessorKind::Getter => MemberRole::Getter,
                    AccessorKind::Setter => MemberRole::Setter,
                    _ => return None,
                };
                Some(MemberSignature {
                    name: accessor.name.clone(),
                    role,
                    shape: accessor.shape.clone(),
                    optional: accessor.optional(),
                })
            })
            .collect();
        Self {
            name: descriptor.name.clone(),
            members,
        }
    }

    /// Returns true if `descriptor` exposes every member.
    #[must_use]
    pub fn is_satisfied_by(&self, descriptor: &TypeDescriptor) -> bool {
        self.members.iter().all(|member| {
            descriptor.accessors.iter().any(|accessor| {
                accessor.name == member.name
                    && member.role.matches(accessor.kind)
                    && accessor.shape == member.shape
                    && accessor.optional() == member.optional
            })
        })
    }

    /// Returns the member names.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name.as_str())
    }
}

/// One resolved structural cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capability {
    /// Interface name.
    pub interface: String,
    /// Object type that satisfies it.
    pub target: TypeId,
    /// The interface was declared rather than derived from an object type.
    pub declared: bool,
}

/// Every structural cast available in one descriptor set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapabilityIndex {
    capabilities: Vec<Capability>,
}

impl CapabilityIndex {
    /// Matches every declared interface, and every object type taken as an
    /// interface, against every object type.
    ///
    /// Interfaces without members and an object matched against itself are
    /// skipped.
    #[must_use]
    pub fn compute(descriptors: &[TypeDescriptor], declared: &[InterfaceDecl]) -> Self {
        let objects: Vec<&TypeDescriptor> = descriptors
            .iter()
            .filter(|d| d.kind == DescriptorKind::Object)
            .collect();

        let mut candidates: Vec<(InterfaceDecl, Option<TypeId>, bool)> = declared
            .iter()
            .map(|decl| (decl.clone(), None, true))
            .collect();
        candidates.extend(
            objects
                .iter()
                .map(|d| (InterfaceDecl::from_descriptor(d), Some(d.id), false)),
        );

        let mut capabilities = Vec::new();
        for (interface, source, is_declared) in &candidates {
            if interface.members.is_empty() {
                continue;
            }
            for target in &objects {
                if *source == Some(target.id) {
                    continue;
                }
                if interface.is_satisfied_by(target) {
                    capabilities.push(Capability {
                        interface: interface.name.clone(),
                        target: target.id,
                        declared: *is_declared,
                    });
                }
            }
        }
        Self { capabilities }
    }

    /// Returns true if `target` can be viewed as `interface`.
    #[must_use]
    pub fn satisfies(&self, target: TypeId, interface: &str) -> bool {
        self.capabilities
            .iter()
            .any(|c| c.target == target && c.interface == interface)
    }

    /// Returns the object types that satisfy `interface`.
    #[must_use]
    pub fn implementors(&self, interface: &str) -> Vec<TypeId> {
        self.capabilities
            .iter()
            .filter(|c| c.interface == interface)
            .map(|c| c.target)
            .collect()
    }

    /// Returns the interfaces `target` satisfies.
    pub fn interfaces_of(&self, target: TypeId) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter().filter(move |c| c.target == target)
    }

    /// Returns every cast.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Returns the number of casts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Returns true if no cast was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}
