//! Synthesis driver.
//!
//! Builds the [`TypeGraph`] from registered schema documents. Every schema
//! position that owns a type gets exactly one slot, memoized by
//! (document, node). A slot is reserved as a placeholder the first time it is
//! reached and queued; the queue is drained breadth-first, so forward and
//! recursive references resolve to the already-reserved slot instead of
//! recursing.
//!
//! `allOf` members are forced to build before merging. Re-declared
//! properties whose types differ by slot are checked for structural
//! equivalence once the queue is empty, when every slot they reach is
//! complete.

use crate::document::{Additional, Items, JsonType, SchemaDocument, SchemaId, SchemaNode};
use crate::error::SchemaError;
use crate::graph::{
    AdditionalPolicy, Alternative, ArrayType, EnumLiteral, EnumType, IntersectionType, ObjectType,
    Property, ScalarKind, ScalarType, TypeGraph, TypeId, TypeKind, UnionType,
};
use crate::naming::{
    DEFAULT_MAX_DISAMBIGUATION, NameAllocator, enum_literal_identifier, to_pascal_case,
};
use indexmap::IndexMap;
use jsonbind_core::{Format, Value};
use regex::Regex;
use serde_json::Value as Json;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, trace, warn};

/// Configuration for synthesis and emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Suffixes tried before a name collision is fatal.
    pub max_disambiguation: usize,
    /// Emit builder surfaces for objects with required properties.
    pub emit_builders: bool,
    /// Emit `copy` on object surfaces.
    pub emit_copiers: bool,
    /// Synthesize every definition of an entry document as a named type.
    pub definitions_as_entries: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            max_disambiguation: DEFAULT_MAX_DISAMBIGUATION,
            emit_builders: true,
            emit_copiers: true,
            definitions_as_entries: true,
        }
    }
}

impl SynthesisOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of disambiguating suffixes.
    #[must_use]
    pub fn max_disambiguation(mut self, max: usize) -> Self {
        self.max_disambiguation = max;
        self
    }

    /// Enables or disables builder surfaces.
    #[must_use]
    pub fn emit_builders(mut self, enabled: bool) -> Self {
        self.emit_builders = enabled;
        self
    }

    /// Enables or disables copiers.
    #[must_use]
    pub fn emit_copiers(mut self, enabled: bool) -> Self {
        self.emit_copiers = enabled;
        self
    }

    /// Enables or disables eager synthesis of definitions.
    #[must_use]
    pub fn definitions_as_entries(mut self, enabled: bool) -> Self {
        self.definitions_as_entries = enabled;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Job {
    doc: usize,
    schema: SchemaId,
    slot: TypeId,
}

#[derive(Debug)]
struct PendingMerge {
    slot: TypeId,
    property: String,
    left: TypeId,
    right: TypeId,
}

/// Lazily builds a [`TypeGraph`] from schema documents.
#[derive(Debug, Default)]
pub struct SynthesisDriver {
    options: SynthesisOptions,
    documents: IndexMap<String, SchemaDocument>,
    graph: TypeGraph,
    memo: HashMap<(usize, SchemaId), TypeId>,
    origins: HashMap<TypeId, (usize, SchemaId)>,
    queue: VecDeque<Job>,
    building: HashSet<TypeId>,
    pending_merges: Vec<PendingMerge>,
    entries: IndexMap<String, TypeId>,
}

impl SynthesisDriver {
    /// Creates a driver with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a driver with the given options.
    #[must_use]
    pub fn with_options(options: SynthesisOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> &SynthesisOptions {
        &self.options
    }

    /// Registers a parsed document.
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateDocument` if the name is taken.
    pub fn add_document(&mut self, document: SchemaDocument) -> Result<(), SchemaError> {
        if self.documents.contains_key(document.name()) {
            return Err(SchemaError::DuplicateDocument {
                name: document.name().to_string(),
            });
        }
        debug!(document = document.name(), nodes = document.len(), "registered schema document");
        self.documents.insert(document.name().to_string(), document);
        Ok(())
    }

    /// Parses and registers a document.
    ///
    /// # Errors
    /// Returns `SchemaError` if parsing fails or the name is taken.
    pub fn add_schema(&mut self, name: &str, text: &str) -> Result<(), SchemaError> {
        let document = SchemaDocument::parse(name, text)?;
        self.add_document(document)
    }

    /// Returns a registered document.
    #[must_use]
    pub fn document(&self, name: &str) -> Option<&SchemaDocument> {
        self.documents.get(name)
    }

    /// Returns the registered document names in registration order.
    pub fn document_names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// Returns the graph built so far.
    #[must_use]
    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    /// Consumes the driver, returning the graph.
    #[must_use]
    pub fn into_graph(self) -> TypeGraph {
        self.graph
    }

    /// Returns the root slot of a synthesized entry.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<TypeId> {
        self.entries.get(name).copied()
    }

    /// Returns every synthesized entry in synthesis order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, TypeId)> {
        self.entries.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Returns the named types of a synthesized entry: its root followed by
    /// its definitions when `definitions_as_entries` is set.
    #[must_use]
    pub fn entry_types(&self, entry: &str) -> Vec<TypeId> {
        let Some(root) = self.entry(entry) else {
            return Vec::new();
        };
        let mut types = vec![root];
        let Some(doc) = self.documents.get_index_of(entry) else {
            return types;
        };
        if self.options.definitions_as_entries {
            for &definition in self.documents[doc].definitions() {
                let slot = self
                    .follow_refs(doc, definition)
                    .ok()
                    .and_then(|key| self.memo.get(&key).copied());
                if let Some(slot) = slot {
                    if !types.contains(&slot) {
                        types.push(slot);
                    }
                }
            }
        }
        types
    }

    /// Synthesizes the document registered as `entry` and returns its root.
    ///
    /// Synthesizing an entry twice returns the same root without adding
    /// slots. On failure the graph is rolled back to its size before the
    /// call.
    ///
    /// # Errors
    /// Returns `SchemaError` if the entry is unknown or its schema is
    /// malformed or contradictory.
    pub fn synthesize(&mut self, entry: &str) -> Result<TypeId, SchemaError> {
        if let Some(root) = self.entries.get(entry) {
            trace!(entry, "entry already synthesized");
            return Ok(*root);
        }
        let doc = self
            .documents
            .get_index_of(entry)
            .ok_or_else(|| SchemaError::UnknownEntry {
                name: entry.to_string(),
            })?;

        let mark = self.graph.len();
        match self.synthesize_document(doc) {
            Ok(root) => {
                debug!(entry, slots = self.graph.len() - mark, "synthesized entry");
                self.entries.insert(entry.to_string(), root);
                Ok(root)
            }
            Err(err) => {
                self.rollback(mark);
                Err(err)
            }
        }
    }

    /// Synthesizes every registered document.
    ///
    /// A failing entry does not stop its siblings.
    pub fn synthesize_all(&mut self) -> Vec<(String, Result<TypeId, SchemaError>)> {
        let names: Vec<String> = self.documents.keys().cloned().collect();
        names
            .into_iter()
            .map(|name| {
                let result = self.synthesize(&name);
                if let Err(err) = &result {
                    warn!(entry = %name, error = %err, "schema entry failed");
                }
                (name, result)
            })
            .collect()
    }

    fn synthesize_document(&mut self, doc: usize) -> Result<TypeId, SchemaError> {
        let root = self.resolve(doc, SchemaId::ROOT)?;
        if self.options.definitions_as_entries {
            let definitions = self.documents[doc].definitions().to_vec();
            for definition in definitions {
                self.resolve(doc, definition)?;
            }
        }
        self.drain()?;
        self.verify_merges()?;
        self.graph.mark_mixed_arrays();
        Ok(root)
    }

    fn rollback(&mut self, mark: usize) {
        debug!(slots = self.graph.len() - mark, "rolling back failed entry");
        self.graph.truncate(mark);
        self.memo.retain(|_, slot| slot.index() < mark);
        self.origins.retain(|slot, _| slot.index() < mark);
        self.queue.clear();
        self.building.clear();
        self.pending_merges.clear();
    }

    fn drain(&mut self) -> Result<(), SchemaError> {
        while let Some(job) = self.queue.pop_front() {
            if matches!(self.graph.node(job.slot).kind, TypeKind::Placeholder) {
                self.build(job)?;
            }
        }
        Ok(())
    }

    fn verify_merges(&mut self) -> Result<(), SchemaError> {
        for merge in std::mem::take(&mut self.pending_merges) {
            if !self.graph.structurally_equivalent(merge.left, merge.right) {
                return Err(SchemaError::incompatible_merge(
                    self.graph.node(merge.slot).path.clone(),
                    merge.property,
                ));
            }
        }
        Ok(())
    }

    /// Follows `$ref` chains to the node that owns a type.
    fn follow_refs(&self, doc: usize, id: SchemaId) -> Result<(usize, SchemaId), SchemaError> {
        let mut current = (doc, id);
        let mut seen = HashSet::new();
        loop {
            let node = self.documents[current.0].node(current.1);
            let Some(reference) = node.reference.as_deref() else {
                return Ok(current);
            };
            if !seen.insert(current) {
                return Err(SchemaError::circular(node.path.clone()));
            }
            let next = self.lookup_reference(current.0, reference, &node.path)?;
            trace!(reference, from = %node.path, "followed reference");
            current = next;
        }
    }

    fn lookup_reference(
        &self,
        doc: usize,
        reference: &str,
        from: &str,
    ) -> Result<(usize, SchemaId), SchemaError> {
        let (document, fragment) = reference.split_once('#').unwrap_or((reference, ""));
        let target = if document.is_empty() {
            doc
        } else {
            let stem = document.rsplit('/').next().unwrap_or(document);
            let stem = stem.strip_suffix(".json").unwrap_or(stem);
            self.documents
                .get_index_of(stem)
                .ok_or_else(|| SchemaError::UnknownDocument {
                    reference: reference.to_string(),
                    from: from.to_string(),
                    document: stem.to_string(),
                })?
        };
        let pointer = match fragment {
            "" | "/" => "#".to_string(),
            rest => format!("#{rest}"),
        };
        self.documents[target]
            .lookup_pointer(&pointer)
            .map(|id| (target, id))
            .ok_or_else(|| SchemaError::unresolved(reference, from))
    }

    /// Returns the slot for a schema node, reserving and queueing it on
    /// first use.
    fn resolve(&mut self, doc: usize, id: SchemaId) -> Result<TypeId, SchemaError> {
        let key = self.follow_refs(doc, id)?;
        if let Some(&slot) = self.memo.get(&key) {
            return Ok(slot);
        }

        let document = &self.documents[key.0];
        let target = document.node(key.1);
        let (path, name) = (target.path.clone(), target.name.clone());
        let document_name = document.name().to_string();

        let slot = self.graph.reserve(path, name, document_name);
        trace!(path = %self.graph.node(slot).path, %slot, "reserved slot");
        self.memo.insert(key, slot);
        self.origins.insert(slot, key);
        self.queue.push_back(Job {
            doc: key.0,
            schema: key.1,
            slot,
        });
        Ok(slot)
    }

    fn ensure_built(&mut self, slot: TypeId) -> Result<(), SchemaError> {
        if !matches!(self.graph.node(slot).kind, TypeKind::Placeholder) {
            return Ok(());
        }
        if self.building.contains(&slot) {
            return Err(SchemaError::circular(self.graph.node(slot).path.clone()));
        }
        let Some(&(doc, schema)) = self.origins.get(&slot) else {
            return Ok(());
        };
        self.build(Job { doc, schema, slot })
    }

    fn build(&mut self, job: Job) -> Result<(), SchemaError> {
        self.building.insert(job.slot);
        let node = self.documents[job.doc].node(job.schema).clone();
        let kind = self.build_kind(job.doc, &node, job.slot)?;
        debug!(path = %node.path, kind = kind.label(), slot = %job.slot, "completed slot");
        self.graph.complete(job.slot, kind);
        self.building.remove(&job.slot);
        Ok(())
    }

    fn build_kind(
        &mut self,
        doc: usize,
        node: &SchemaNode,
        slot: TypeId,
    ) -> Result<TypeKind, SchemaError> {
        if let Some(values) = &node.enum_values {
            return Ok(TypeKind::Enum(self.enum_type(values, &node.path)?));
        }
        if let Some(value) = &node.const_value {
            if node.properties.is_empty() {
                return Ok(TypeKind::Enum(
                    self.enum_type(std::slice::from_ref(value), &node.path)?,
                ));
            }
        }
        if !node.all_of.is_empty() {
            return self.build_intersection(doc, node, slot);
        }
        if !node.alternatives().is_empty() {
            return self.build_composition(doc, node);
        }

        let mut types = node.types.clone();
        if node.nullable && !types.is_empty() && !types.contains(&JsonType::Null) {
            types.push(JsonType::Null);
        }
        match types.as_slice() {
            [] => self.infer(doc, node),
            [single] => self.build_single(doc, node, *single),
            _ => self.build_type_list(doc, node, &types),
        }
    }

    fn infer(&mut self, doc: usize, node: &SchemaNode) -> Result<TypeKind, SchemaError> {
        if node.has_object_keywords() || !node.required.is_empty() {
            return Ok(TypeKind::Object(self.build_object(doc, node)?));
        }
        if node.items != Items::None {
            return Ok(TypeKind::Array(self.build_array(doc, node)?));
        }
        match scalar_format(node) {
            Some(Format::TimestampMillis) => Ok(TypeKind::Scalar(ScalarType {
                kind: ScalarKind::Integer,
                format: Some(Format::TimestampMillis),
            })),
            Some(format) => Ok(TypeKind::Scalar(ScalarType {
                kind: ScalarKind::String,
                format: Some(format),
            })),
            None => Ok(TypeKind::Any),
        }
    }

    fn build_single(
        &mut self,
        doc: usize,
        node: &SchemaNode,
        ty: JsonType,
    ) -> Result<TypeKind, SchemaError> {
        let kind = match ty {
            JsonType::Object => return Ok(TypeKind::Object(self.build_object(doc, node)?)),
            JsonType::Array => return Ok(TypeKind::Array(self.build_array(doc, node)?)),
            JsonType::Null => return Ok(TypeKind::Null),
            JsonType::String => ScalarKind::String,
            JsonType::Number => ScalarKind::Number,
            JsonType::Integer => ScalarKind::Integer,
            JsonType::Boolean => ScalarKind::Boolean,
        };
        Ok(TypeKind::Scalar(ScalarType {
            kind,
            format: scalar_format(node),
        }))
    }

    /// Builds a union with one synthetic slot per listed type.
    fn build_type_list(
        &mut self,
        doc: usize,
        node: &SchemaNode,
        types: &[JsonType],
    ) -> Result<TypeKind, SchemaError> {
        let document_name = self.documents[doc].name().to_string();
        let mut alternatives = Vec::with_capacity(types.len());
        for &ty in types {
            let name = match ty {
                JsonType::Object => "Object",
                other => other.type_name(),
            }
            .to_string();
            let slot_name = match ty {
                JsonType::Object | JsonType::Array => node.name.clone(),
                _ => name.clone(),
            };
            let slot = self.graph.reserve(
                format!("{}.{name}", node.path),
                slot_name,
                document_name.clone(),
            );
            let kind = self.build_single(doc, node, ty)?;
            self.graph.complete(slot, kind);
            alternatives.push(Alternative { name, ty: slot });
        }
        Ok(TypeKind::Union(UnionType {
            alternatives,
            positional: false,
        }))
    }

    fn build_object(&mut self, doc: usize, node: &SchemaNode) -> Result<ObjectType, SchemaError> {
        let mut object = ObjectType::default();
        for (name, &child) in &node.properties {
            let child_node = self.documents[doc].node(child);
            let required = node.required.contains(name) || child_node.required_flag;
            let (read_only, write_only) = (child_node.read_only, child_node.write_only);
            let ty = self.resolve(doc, child)?;
            object.properties.insert(
                name.clone(),
                Property {
                    name: name.clone(),
                    ty,
                    required,
                    read_only,
                    write_only,
                },
            );
        }

        let patterns: Vec<String> = node.pattern_properties.keys().cloned().collect();
        for pattern in &patterns {
            Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
                pattern: pattern.clone(),
                path: node.path.clone(),
                message: e.to_string(),
            })?;
        }
        object.additional = match (&node.additional, patterns.is_empty()) {
            (Additional::Forbidden, true) => AdditionalPolicy::Forbidden,
            (Additional::Allowed | Additional::Schema(_), _) => AdditionalPolicy::FreeForm,
            (_, false) => AdditionalPolicy::ConstrainedByPattern(patterns),
            (Additional::Unspecified, true) => AdditionalPolicy::FreeForm,
        };
        Ok(object)
    }

    fn build_array(&mut self, doc: usize, node: &SchemaNode) -> Result<ArrayType, SchemaError> {
        let document_name = self.documents[doc].name().to_string();
        let element = match &node.items {
            Items::Single(item) => self.resolve(doc, *item)?,
            Items::Positional(items) => {
                let slot = self.graph.reserve(
                    format!("{}.Items", node.path),
                    format!("{}Item", to_pascal_case(&node.name)),
                    document_name,
                );
                let mut names = NameAllocator::new(node.path.clone(), self.options.max_disambiguation);
                let mut alternatives = Vec::with_capacity(items.len());
                for (i, &item) in items.iter().enumerate() {
                    let ty = self.resolve(doc, item)?;
                    let label = self.label(doc, item)?;
                    let name = names.allocate(&label.unwrap_or_else(|| format!("Item{i}")))?;
                    alternatives.push(Alternative { name, ty });
                }
                self.graph.complete(
                    slot,
                    TypeKind::Union(UnionType {
                        alternatives,
                        positional: true,
                    }),
                );
                slot
            }
            Items::None => {
                let slot = self.graph.reserve(
                    format!("{}.items", node.path),
                    node.name.clone(),
                    document_name,
                );
                self.graph.complete(slot, TypeKind::Any);
                slot
            }
        };
        Ok(ArrayType {
            element,
            in_mixed_union: false,
        })
    }

    fn build_composition(
        &mut self,
        doc: usize,
        node: &SchemaNode,
    ) -> Result<TypeKind, SchemaError> {
        let mut targets = Vec::with_capacity(node.alternatives().len());
        for &alt in node.alternatives() {
            targets.push(self.follow_refs(doc, alt)?);
        }
        if let Some(literals) = self.literal_set(&targets) {
            return Ok(TypeKind::Enum(self.enum_type(&literals, &node.path)?));
        }

        let mut names = NameAllocator::new(node.path.clone(), self.options.max_disambiguation);
        let mut alternatives: Vec<Alternative> = Vec::with_capacity(targets.len());
        for (i, &alt) in node.alternatives().iter().enumerate() {
            let ty = self.resolve(doc, alt)?;
            if alternatives.iter().any(|a| a.ty == ty) {
                continue;
            }
            let label = self.label(doc, alt)?;
            let inline = label.is_none();
            let name = names.allocate(&label.unwrap_or_else(|| format!("Option{i}")))?;
            if inline && self.origins.get(&ty) == Some(&(doc, alt)) {
                self.graph.rename(
                    ty,
                    format!("{}{}", to_pascal_case(&node.name), to_pascal_case(&name)),
                );
            }
            alternatives.push(Alternative { name, ty });
        }
        Ok(TypeKind::Union(UnionType {
            alternatives,
            positional: false,
        }))
    }

    /// Returns the merged literals if every target is a literal set of one
    /// JSON kind.
    fn literal_set(&self, targets: &[(usize, SchemaId)]) -> Option<Vec<Json>> {
        let mut literals: Vec<Json> = Vec::new();
        for &(doc, id) in targets {
            let node = self.documents[doc].node(id);
            if !node.is_literal() {
                return None;
            }
            let values = node
                .enum_values
                .clone()
                .or_else(|| node.const_value.clone().map(|v| vec![v]))?;
            for value in values {
                if !literals.contains(&value) {
                    literals.push(value);
                }
            }
        }
        let kinds: HashSet<_> = literals.iter().map(std::mem::discriminant).collect();
        (!literals.is_empty() && kinds.len() == 1).then_some(literals)
    }

    fn build_intersection(
        &mut self,
        doc: usize,
        node: &SchemaNode,
        slot: TypeId,
    ) -> Result<TypeKind, SchemaError> {
        let mut members = Vec::with_capacity(node.all_of.len());
        let mut merged = ObjectType::default();

        for &member in &node.all_of {
            let ty = self.resolve(doc, member)?;
            self.ensure_built(ty)?;
            let member_node = self.graph.node(ty);
            let object = match (member_node.as_object(), &member_node.kind) {
                (Some(object), _) => object.clone(),
                (None, TypeKind::Any) => {
                    members.push(ty);
                    continue;
                }
                (None, _) => {
                    return Err(SchemaError::NonObjectIntersection {
                        path: node.path.clone(),
                        member: member_node.path.clone(),
                    });
                }
            };
            self.merge_into(&mut merged, &object, slot);
            members.push(ty);
        }

        if node.has_object_keywords() {
            let own = self.build_object(doc, node)?;
            self.merge_into(&mut merged, &own, slot);
        }
        for name in &node.required {
            if let Some(property) = merged.properties.get_mut(name) {
                property.required = true;
            }
        }

        Ok(TypeKind::Intersection(IntersectionType { members, merged }))
    }

    fn merge_into(&mut self, merged: &mut ObjectType, object: &ObjectType, slot: TypeId) {
        for property in object.properties.values() {
            match merged.properties.get_mut(&property.name) {
                Some(existing) => {
                    if existing.ty != property.ty {
                        self.pending_merges.push(PendingMerge {
                            slot,
                            property: property.name.clone(),
                            left: existing.ty,
                            right: property.ty,
                        });
                    }
                    existing.required |= property.required;
                    existing.read_only |= property.read_only;
                    existing.write_only |= property.write_only;
                }
                None => {
                    merged
                        .properties
                        .insert(property.name.clone(), property.clone());
                }
            }
        }
        merged.additional = match (&merged.additional, &object.additional) {
            (AdditionalPolicy::Forbidden, _) | (_, AdditionalPolicy::Forbidden) => {
                AdditionalPolicy::Forbidden
            }
            (
                AdditionalPolicy::ConstrainedByPattern(left),
                AdditionalPolicy::ConstrainedByPattern(right),
            ) => {
                let mut patterns = left.clone();
                patterns.extend(right.iter().filter(|p| !left.contains(p)).cloned());
                AdditionalPolicy::ConstrainedByPattern(patterns)
            }
            (AdditionalPolicy::ConstrainedByPattern(p), AdditionalPolicy::FreeForm)
            | (AdditionalPolicy::FreeForm, AdditionalPolicy::ConstrainedByPattern(p)) => {
                AdditionalPolicy::ConstrainedByPattern(p.clone())
            }
            (AdditionalPolicy::FreeForm, AdditionalPolicy::FreeForm) => AdditionalPolicy::FreeForm,
        };
    }

    fn enum_type(&self, values: &[Json], scope: &str) -> Result<EnumType, SchemaError> {
        let mut names = NameAllocator::new(scope, self.options.max_disambiguation);
        let mut seen: Vec<&Json> = Vec::with_capacity(values.len());
        let mut literals = Vec::with_capacity(values.len());
        for value in values {
            if seen.contains(&value) {
                continue;
            }
            seen.push(value);
            literals.push(EnumLiteral {
                identifier: names.allocate(&enum_literal_identifier(value))?,
                value: Value::from_json_value(value.clone()),
            });
        }
        Ok(EnumType { literals })
    }

    /// Derives a name for a union alternative or positional item.
    ///
    /// Returns `None` for inline objects, which are named by position.
    fn label(&self, doc: usize, id: SchemaId) -> Result<Option<String>, SchemaError> {
        let node = self.documents[doc].node(id);
        if let Some(title) = &node.title {
            return Ok(Some(title.clone()));
        }
        if node.reference.is_some() {
            let (target_doc, target) = self.follow_refs(doc, id)?;
            let target = self.documents[target_doc].node(target);
            return Ok(Some(
                target.title.clone().unwrap_or_else(|| target.name.clone()),
            ));
        }
        Ok(match node.types.as_slice() {
            [JsonType::Array] => match &node.items {
                Items::Single(item) => Some(match self.label(doc, *item)? {
                    Some(inner) => format!("ListOf{}", to_pascal_case(&inner)),
                    None => "List".to_string(),
                }),
                _ => Some("List".to_string()),
            },
            [JsonType::Object] | [] => None,
            [single] => Some(single.type_name().to_string()),
            _ => None,
        })
    }
}

fn scalar_format(node: &SchemaNode) -> Option<Format> {
    let keyword = node.format.as_deref()?;
    let format = Format::from_keyword(keyword);
    if format.is_none() {
        warn!(format = keyword, path = %node.path, "ignoring unknown format");
    }
    format
}
