//! Accessor emission.
//!
//! [`AccessorEmitter`] walks the slots reachable from an entry's named types
//! and produces one [`TypeDescriptor`] per slot that needs a nominal
//! surface: objects, intersections, unions, enums and arrays at an entry
//! root. Nullable wrappers and positional element unions are folded into
//! the accessors that use them.

use crate::capability::{CapabilityIndex, InterfaceDecl};
use crate::descriptor::{
    AccessorDescriptor, AccessorKind, AlternativeDescriptor, BuilderDescriptor, BuilderStep,
    ConstantDescriptor, DescriptorKind, DescriptorSet, ParameterDescriptor, StructuralView,
    TypeDescriptor, ValueShape,
};
use indexmap::IndexMap;
use jsonbind_schema::naming::{to_pascal_case, to_snake_case};
use jsonbind_schema::{
    AdditionalPolicy, NameAllocator, ObjectType, SchemaError, SynthesisOptions, TypeGraph, TypeId,
    TypeKind, UnionType,
};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, trace};

/// Member names every object surface defines itself.
pub const RESERVED_MEMBERS: &[&str] = &[
    "new",
    "create",
    "builder",
    "copy",
    "get",
    "put",
    "bindings",
    "from_bindings",
    "into_bindings",
    "to_canonical_text",
];

/// Depth limit when folding arrays and nullable wrappers into a shape.
const SHAPE_DEPTH: usize = 16;

/// Produces descriptor sets from a type graph.
pub struct AccessorEmitter<'a> {
    graph: &'a TypeGraph,
    options: &'a SynthesisOptions,
    interfaces: Vec<InterfaceDecl>,
}

impl<'a> AccessorEmitter<'a> {
    /// Creates an emitter over a synthesized graph.
    #[must_use]
    pub fn new(graph: &'a TypeGraph, options: &'a SynthesisOptions) -> Self {
        Self {
            graph,
            options,
            interfaces: Vec::new(),
        }
    }

    /// Sets the interfaces the capability pass matches against.
    #[must_use]
    pub fn with_interfaces(mut self, interfaces: Vec<InterfaceDecl>) -> Self {
        self.interfaces = interfaces;
        self
    }

    /// Emits descriptors for every surface reachable from `roots`.
    ///
    /// Arrays get a descriptor only when they are one of the roots.
    ///
    /// # Arguments
    /// * `roots` - Named entry types, usually from `SynthesisDriver::entry_types`
    ///
    /// # Errors
    /// Returns `SchemaError::NameCollision` when a type or member name cannot
    /// be disambiguated.
    pub fn emit(&self, roots: &[TypeId]) -> Result<DescriptorSet, SchemaError> {
        let ids = self.reachable(roots);

        let mut type_names = NameAllocator::new("types", self.options.max_disambiguation);
        for interface in &self.interfaces {
            type_names.reserve(interface.name.clone());
        }
        let mut names: IndexMap<TypeId, String> = IndexMap::with_capacity(ids.len());
        for &id in &ids {
            let name = type_names.allocate(&to_pascal_case(&self.graph.node(id).name))?;
            trace!(slot = %id, name = %name, "allocated type name");
            names.insert(id, name);
        }

        let mut descriptors = Vec::with_capacity(ids.len());
        let mut members = Vec::with_capacity(ids.len());
        for &id in &ids {
            let (descriptor, allocator) = self.describe(id, &names, &mut type_names)?;
            descriptors.push(descriptor);
            members.push(allocator);
        }

        let capabilities = CapabilityIndex::compute(&descriptors, &self.interfaces);
        for (descriptor, allocator) in descriptors.iter_mut().zip(members.iter_mut()) {
            for capability in capabilities.interfaces_of(descriptor.id) {
                let conversion =
                    allocator.allocate(&format!("as_{}", to_snake_case(&capability.interface)))?;
                descriptor.views.push(StructuralView {
                    interface: capability.interface.clone(),
                    conversion,
                    declared: capability.declared,
                });
            }
        }

        debug!(
            types = descriptors.len(),
            casts = capabilities.len(),
            "emitted descriptor set"
        );
        Ok(DescriptorSet::new(
            descriptors,
            self.interfaces.clone(),
            capabilities,
        ))
    }

    /// Collects descriptor-worthy slots breadth-first from the roots.
    fn reachable(&self, roots: &[TypeId]) -> Vec<TypeId> {
        let mut seen = HashSet::new();
        let mut queue: VecDeque<TypeId> = roots.iter().copied().collect();
        let mut result = Vec::new();

        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            let node = self.graph.node(id);
            let worthy = match &node.kind {
                TypeKind::Object(_) | TypeKind::Intersection(_) | TypeKind::Enum(_) => true,
                TypeKind::Union(union) => {
                    !union.positional && self.graph.nullable_inner(id).is_none()
                }
                TypeKind::Array(_) => roots.contains(&id),
                _ => false,
            };
            if worthy {
                result.push(id);
            }
            match &node.kind {
                TypeKind::Object(obj) => queue.extend(obj.properties.values().map(|p| p.ty)),
                TypeKind::Intersection(inter) => {
                    queue.extend(inter.merged.properties.values().map(|p| p.ty));
                }
                TypeKind::Union(union) => queue.extend(union.alternatives.iter().map(|a| a.ty)),
                TypeKind::Array(array) => queue.push_back(array.element),
                _ => {}
            }
        }
        result
    }

    /// Returns the shape of a slot and whether it admits null.
    fn shape(&self, id: TypeId, names: &IndexMap<TypeId, String>) -> (ValueShape, bool) {
        self.shape_at(id, names, 0)
    }

    fn shape_at(
        &self,
        id: TypeId,
        names: &IndexMap<TypeId, String>,
        depth: usize,
    ) -> (ValueShape, bool) {
        if depth > SHAPE_DEPTH {
            return (ValueShape::Any, false);
        }
        if let Some(inner) = self.graph.nullable_inner(id) {
            return (self.shape_at(inner, names, depth + 1).0, true);
        }
        let named = |id: TypeId| match names.get(&id) {
            Some(type_name) => ValueShape::Named {
                type_name: type_name.clone(),
                target: id,
            },
            None => ValueShape::Any,
        };
        let shape = match &self.graph.node(id).kind {
            TypeKind::Scalar(scalar) => ValueShape::Scalar {
                kind: scalar.kind,
                format: scalar.format,
            },
            TypeKind::Object(_) | TypeKind::Intersection(_) | TypeKind::Enum(_) => named(id),
            TypeKind::Union(union) if !union.positional => named(id),
            TypeKind::Array(array) => ValueShape::List {
                element: Box::new(self.shape_at(array.element, names, depth + 1).0),
            },
            TypeKind::Null => ValueShape::Null,
            TypeKind::Union(_) | TypeKind::Placeholder | TypeKind::Any => ValueShape::Any,
        };
        (shape, false)
    }

    /// Returns the union behind a property type, looking through a nullable
    /// wrapper.
    fn union_of(&self, id: TypeId) -> Option<(TypeId, &'a UnionType)> {
        let id = self.graph.nullable_inner(id).unwrap_or(id);
        match &self.graph.node(id).kind {
            TypeKind::Union(union) if !union.positional && self.graph.nullable_inner(id).is_none() => {
                Some((id, union))
            }
            _ => None,
        }
    }

    fn describe(
        &self,
        id: TypeId,
        names: &IndexMap<TypeId, String>,
        type_names: &mut NameAllocator,
    ) -> Result<(TypeDescriptor, NameAllocator), SchemaError> {
        let node = self.graph.node(id);
        let name = names[&id].clone();
        let mut members = NameAllocator::new(name.clone(), self.options.max_disambiguation);
        for reserved in RESERVED_MEMBERS {
            members.reserve(*reserved);
        }

        let descriptor = match &node.kind {
            TypeKind::Enum(en) => {
                let mut descriptor =
                    TypeDescriptor::new(id, name, node.path.clone(), DescriptorKind::Enum);
                descriptor.constants = en
                    .literals
                    .iter()
                    .map(|literal| ConstantDescriptor {
                        identifier: literal.identifier.clone(),
                        literal: literal.value.to_canonical_text(),
                    })
                    .collect();
                descriptor
            }
            TypeKind::Union(union) => {
                let mut descriptor =
                    TypeDescriptor::new(id, name, node.path.clone(), DescriptorKind::Union);
                self.describe_union(&mut descriptor, union, names, &mut members)?;
                descriptor
            }
            TypeKind::Array(array) => {
                let mut descriptor =
                    TypeDescriptor::new(id, name, node.path.clone(), DescriptorKind::Array);
                descriptor.in_mixed_union = array.in_mixed_union;
                match &self.graph.node(array.element).kind {
                    TypeKind::Union(positional) if positional.positional => {
                        for (i, alt) in positional.alternatives.iter().enumerate() {
                            let accessor = members
                                .allocate(&format!("get_as_{}", to_snake_case(&alt.name)))?;
                            descriptor.accessors.push(AccessorDescriptor {
                                name: accessor,
                                kind: AccessorKind::ElementGetter {
                                    alternative: Some(i),
                                },
                                key: None,
                                shape: self.shape(alt.ty, names).0,
                                required: false,
                                nullable: false,
                            });
                        }
                    }
                    _ => {
                        let (shape, nullable) = self.shape(array.element, names);
                        descriptor.accessors.push(AccessorDescriptor {
                            name: members.allocate("element")?,
                            kind: AccessorKind::ElementGetter { alternative: None },
                            key: None,
                            shape,
                            required: false,
                            nullable,
                        });
                    }
                }
                descriptor
            }
            _ => {
                let object = node.as_object().ok_or_else(|| {
                    SchemaError::NonObjectIntersection {
                        path: node.path.clone(),
                        member: node.kind.label().to_string(),
                    }
                })?;
                let mut descriptor =
                    TypeDescriptor::new(id, name, node.path.clone(), DescriptorKind::Object);
                self.describe_object(&mut descriptor, object, names, &mut members, type_names)?;
                descriptor
            }
        };
        Ok((descriptor, members))
    }

    fn describe_union(
        &self,
        descriptor: &mut TypeDescriptor,
        union: &UnionType,
        names: &IndexMap<TypeId, String>,
        members: &mut NameAllocator,
    ) -> Result<(), SchemaError> {
        let mut variants = NameAllocator::new(descriptor.name.clone(), self.options.max_disambiguation);
        for (i, alt) in union.alternatives.iter().enumerate() {
            let shape = self.shape(alt.ty, names).0;
            descriptor.alternatives.push(AlternativeDescriptor {
                name: alt.name.clone(),
                variant: variants.allocate(&to_pascal_case(&alt.name))?,
                shape: shape.clone(),
            });
            if shape == ValueShape::Null {
                continue;
            }
            descriptor.accessors.push(AccessorDescriptor {
                name: members.allocate(&format!("as_{}", to_snake_case(&alt.name)))?,
                kind: AccessorKind::QualifiedGetter {
                    union: descriptor.id,
                    alternative: i,
                },
                key: None,
                shape,
                required: false,
                nullable: false,
            });
        }
        Ok(())
    }

    fn describe_object(
        &self,
        descriptor: &mut TypeDescriptor,
        object: &ObjectType,
        names: &IndexMap<TypeId, String>,
        members: &mut NameAllocator,
        type_names: &mut NameAllocator,
    ) -> Result<(), SchemaError> {
        let mut params = NameAllocator::new(descriptor.name.clone(), self.options.max_disambiguation);
        let mut steps = NameAllocator::new(descriptor.name.clone(), self.options.max_disambiguation);
        let mut required = Vec::new();
        let mut optional = Vec::new();

        for prop in object.properties.values() {
            let (shape, nullable) = self.shape(prop.ty, names);
            let snake = to_snake_case(&prop.name);
            let accessor = |name: String, kind: AccessorKind, shape: ValueShape, nullable: bool| {
                AccessorDescriptor {
                    name,
                    kind,
                    key: Some(prop.name.clone()),
                    shape,
                    required: prop.required,
                    nullable,
                }
            };

            if !prop.write_only {
                let name = members.allocate(&snake)?;
                descriptor
                    .accessors
                    .push(accessor(name, AccessorKind::Getter, shape.clone(), nullable));
            }
            if !prop.read_only {
                let name = members.allocate(&format!("set_{snake}"))?;
                descriptor
                    .accessors
                    .push(accessor(name, AccessorKind::Setter, shape.clone(), nullable));
            }

            if let Some((union_id, union)) = self.union_of(prop.ty) {
                for (i, alt) in union.alternatives.iter().enumerate() {
                    let (alt_shape, _) = self.shape(alt.ty, names);
                    if alt_shape == ValueShape::Null {
                        continue;
                    }
                    let alt_snake = to_snake_case(&alt.name);
                    if !prop.write_only {
                        let name = members.allocate(&format!("{snake}_as_{alt_snake}"))?;
                        descriptor.accessors.push(accessor(
                            name,
                            AccessorKind::QualifiedGetter {
                                union: union_id,
                                alternative: i,
                            },
                            alt_shape.clone(),
                            false,
                        ));
                    }
                    if !prop.read_only {
                        let name = members.allocate(&format!("set_{snake}_as_{alt_snake}"))?;
                        descriptor.accessors.push(accessor(
                            name,
                            AccessorKind::QualifiedSetter {
                                union: union_id,
                                alternative: i,
                            },
                            alt_shape,
                            false,
                        ));
                    }
                }
            }

            if prop.required {
                required.push(ParameterDescriptor {
                    name: params.allocate(&snake)?,
                    key: prop.name.clone(),
                    shape,
                    nullable,
                });
            } else {
                // Read-only properties have no setter; the builder still sets them
                optional.push(BuilderStep {
                    method: steps.allocate(&format!("with_{snake}"))?,
                    key: prop.name.clone(),
                    shape,
                    nullable,
                });
            }
        }

        if object.additional != AdditionalPolicy::Forbidden {
            for (name, kind) in [("get", AccessorKind::GenericGet), ("put", AccessorKind::GenericPut)] {
                descriptor.accessors.push(AccessorDescriptor {
                    name: name.to_string(),
                    kind,
                    key: None,
                    shape: ValueShape::Any,
                    required: false,
                    nullable: true,
                });
            }
        }

        if self.options.emit_builders && !required.is_empty() {
            descriptor.builder = Some(BuilderDescriptor {
                name: type_names.allocate(&format!("{}Builder", descriptor.name))?,
                required: required.clone(),
                steps: optional,
            });
        }
        descriptor.constructor = Some(required);
        descriptor.copier = self.options.emit_copiers;
        descriptor.additional = Some(object.additional.clone());
        Ok(())
    }
}
