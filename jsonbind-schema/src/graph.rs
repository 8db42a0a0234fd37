//! Resolved type graph.
//!
//! The graph is an arena of [`TypeNode`]s addressed by [`TypeId`]. A slot is
//! reserved as a [`TypeKind::Placeholder`] before its contents are built and
//! later completed in place, so a `TypeId` handed out for a forward or
//! recursive reference stays valid. Slots are never moved or replaced.

use indexmap::IndexMap;
use jsonbind_core::{Format, Value};
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Depth limit for nested value checks during union discrimination.
const MATCH_DEPTH: usize = 8;

/// Index of a slot in a [`TypeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TypeId(u32);

impl TypeId {
    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Primitive scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// Text.
    String,
    /// Floating point number.
    Number,
    /// 64-bit integer.
    Integer,
    /// Boolean.
    Boolean,
}

impl ScalarKind {
    /// Returns the PascalCase name used for union alternatives.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Number => "Number",
            Self::Integer => "Integer",
            Self::Boolean => "Boolean",
        }
    }
}

/// A scalar, optionally tagged with a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScalarType {
    /// Primitive kind.
    pub kind: ScalarKind,
    /// Format tag, if any.
    pub format: Option<Format>,
}

/// One declared object property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name as declared.
    pub name: String,
    /// Property type.
    pub ty: TypeId,
    /// Listed in `required`.
    pub required: bool,
    /// `readOnly`.
    pub read_only: bool,
    /// `writeOnly`.
    pub write_only: bool,
}

/// What an object does with keys it does not declare.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "policy", content = "patterns", rename_all = "snake_case")]
pub enum AdditionalPolicy {
    /// No undeclared keys.
    Forbidden,
    /// Any undeclared key.
    #[default]
    FreeForm,
    /// Undeclared keys must match one of the patterns.
    ConstrainedByPattern(Vec<String>),
}

/// An object type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectType {
    /// Declared properties, in declaration order.
    pub properties: IndexMap<String, Property>,
    /// Additional-property policy.
    pub additional: AdditionalPolicy,
}

impl ObjectType {
    /// Returns the required properties in declaration order.
    pub fn required(&self) -> impl Iterator<Item = &Property> {
        self.properties.values().filter(|p| p.required)
    }
}

/// An array type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayType {
    /// Element type. For positional arrays this is a positional union.
    pub element: TypeId,
    /// The array is an alternative of a union with a non-array sibling.
    pub in_mixed_union: bool,
}

/// One union alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    /// Alternative name (title, target name, type name or `Option{i}`).
    pub name: String,
    /// Alternative type.
    pub ty: TypeId,
}

/// A `oneOf`/`anyOf` union, a type list, or a positional element union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    /// Alternatives in declaration order.
    pub alternatives: Vec<Alternative>,
    /// Built from `items: [..]` or `prefixItems`.
    pub positional: bool,
}

/// An `allOf` merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionType {
    /// Member types in declaration order.
    pub members: Vec<TypeId>,
    /// Merged object shape.
    pub merged: ObjectType,
}

/// One enum constant.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumLiteral {
    /// Generated identifier, unique within the enum.
    pub identifier: String,
    /// Literal value.
    pub value: Value,
}

/// A closed set of literals.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    /// Literals in declaration order.
    pub literals: Vec<EnumLiteral>,
}

/// Slot contents.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Reserved, not yet built.
    Placeholder,
    /// Object.
    Object(ObjectType),
    /// Array.
    Array(ArrayType),
    /// Union.
    Union(UnionType),
    /// Intersection.
    Intersection(IntersectionType),
    /// Enum.
    Enum(EnumType),
    /// Scalar.
    Scalar(ScalarType),
    /// The null alternative of a nullable type.
    Null,
    /// Unconstrained value.
    Any,
}

impl TypeKind {
    /// Returns a short name for logs and errors.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Placeholder => "placeholder",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::Union(_) => "union",
            Self::Intersection(_) => "intersection",
            Self::Enum(_) => "enum",
            Self::Scalar(_) => "scalar",
            Self::Null => "null",
            Self::Any => "any",
        }
    }
}

/// One arena slot.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    /// Slot id.
    pub id: TypeId,
    /// Identity path, unique within the graph.
    pub path: String,
    /// Type name candidate.
    pub name: String,
    /// Owning document.
    pub document: String,
    /// Contents.
    pub kind: TypeKind,
}

impl TypeNode {
    /// Returns the object shape of an object or intersection.
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectType> {
        match &self.kind {
            TypeKind::Object(obj) => Some(obj),
            TypeKind::Intersection(inter) => Some(&inter.merged),
            _ => None,
        }
    }

    /// Returns true for objects and intersections.
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.as_object().is_some()
    }
}

/// Arena of resolved types.
#[derive(Debug, Default)]
pub struct TypeGraph {
    nodes: Vec<TypeNode>,
    by_path: HashMap<String, TypeId>,
}

impl TypeGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a placeholder slot.
    ///
    /// If `path` is already taken a `_2`, `_3`, ... suffix is appended.
    pub fn reserve(
        &mut self,
        path: impl Into<String>,
        name: impl Into<String>,
        document: impl Into<String>,
    ) -> TypeId {
        let base = path.into();
        let mut path = base.clone();
        let mut n = 2;
        while self.by_path.contains_key(&path) {
            path = format!("{base}_{n}");
            n += 1;
        }

        let id = TypeId(self.nodes.len() as u32);
        self.by_path.insert(path.clone(), id);
        self.nodes.push(TypeNode {
            id,
            path,
            name: name.into(),
            document: document.into(),
            kind: TypeKind::Placeholder,
        });
        id
    }

    /// Completes a slot in place.
    pub fn complete(&mut self, id: TypeId, kind: TypeKind) {
        self.nodes[id.index()].kind = kind;
    }

    /// Replaces a slot's name candidate.
    pub fn rename(&mut self, id: TypeId, name: impl Into<String>) {
        self.nodes[id.index()].name = name.into();
    }

    /// Returns a slot.
    ///
    /// # Panics
    /// Panics if `id` was not handed out by this graph.
    #[must_use]
    pub fn node(&self, id: TypeId) -> &TypeNode {
        &self.nodes[id.index()]
    }

    /// Returns a slot if it exists.
    #[must_use]
    pub fn get(&self, id: TypeId) -> Option<&TypeNode> {
        self.nodes.get(id.index())
    }

    pub(crate) fn node_mut(&mut self, id: TypeId) -> &mut TypeNode {
        &mut self.nodes[id.index()]
    }

    /// Looks up a slot by identity path.
    #[must_use]
    pub fn lookup_path(&self, path: &str) -> Option<TypeId> {
        self.by_path.get(path).copied()
    }

    /// Returns every slot in arena order.
    #[must_use]
    pub fn nodes(&self) -> &[TypeNode] {
        &self.nodes
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drops every slot at index `len` or above.
    pub fn truncate(&mut self, len: usize) {
        for node in self.nodes.drain(len.min(self.nodes.len())..) {
            self.by_path.remove(&node.path);
        }
    }

    /// Returns the non-null alternative of a nullable wrapper.
    ///
    /// A nullable wrapper is a union with exactly two alternatives, one of
    /// which is `Null`.
    #[must_use]
    pub fn nullable_inner(&self, id: TypeId) -> Option<TypeId> {
        let TypeKind::Union(union) = &self.node(id).kind else {
            return None;
        };
        if union.positional || union.alternatives.len() != 2 {
            return None;
        }
        let (nulls, others): (Vec<_>, Vec<_>) = union
            .alternatives
            .iter()
            .partition(|alt| self.node(alt.ty).kind == TypeKind::Null);
        match (nulls.as_slice(), others.as_slice()) {
            ([_], [other]) => Some(other.ty),
            _ => None,
        }
    }

    /// Returns the named children of a slot: properties, alternatives,
    /// intersection members and array elements.
    #[must_use]
    pub fn children(&self, id: TypeId) -> Vec<(String, TypeId)> {
        let node = self.node(id);
        match &node.kind {
            TypeKind::Object(obj) => obj
                .properties
                .values()
                .map(|p| (p.name.clone(), p.ty))
                .collect(),
            TypeKind::Intersection(inter) => {
                let mut children: Vec<_> = inter
                    .merged
                    .properties
                    .values()
                    .map(|p| (p.name.clone(), p.ty))
                    .collect();
                children.extend(
                    inter
                        .members
                        .iter()
                        .map(|m| (self.node(*m).name.clone(), *m)),
                );
                children
            }
            TypeKind::Union(union) => union
                .alternatives
                .iter()
                .map(|alt| (alt.name.clone(), alt.ty))
                .collect(),
            TypeKind::Array(array) => vec![(self.node(array.element).name.clone(), array.element)],
            _ => Vec::new(),
        }
    }

    /// Finds a direct child by property, alternative or type name.
    #[must_use]
    pub fn find_child(&self, id: TypeId, name: &str) -> Option<TypeId> {
        self.children(id).into_iter().find_map(|(key, child)| {
            let child_name = crate::naming::to_pascal_case(&self.node(child).name);
            (key == name || child_name == name || crate::naming::to_pascal_case(&key) == name)
                .then_some(child)
        })
    }

    /// Flags every array alternative of a union that has a non-array,
    /// non-null alternative.
    pub fn mark_mixed_arrays(&mut self) {
        let mut mixed = Vec::new();
        for node in &self.nodes {
            let TypeKind::Union(union) = &node.kind else {
                continue;
            };
            let (arrays, others): (Vec<_>, Vec<_>) = union
                .alternatives
                .iter()
                .filter(|alt| self.node(alt.ty).kind != TypeKind::Null)
                .partition(|alt| matches!(self.node(alt.ty).kind, TypeKind::Array(_)));
            if !arrays.is_empty() && !others.is_empty() {
                mixed.extend(arrays.iter().map(|alt| alt.ty));
            }
        }
        for id in mixed {
            if let TypeKind::Array(array) = &mut self.node_mut(id).kind {
                array.in_mixed_union = true;
            }
        }
    }

    /// Decides whether two slots describe the same shape.
    ///
    /// Cycles are handled coinductively: a pair already under comparison is
    /// assumed equivalent.
    #[must_use]
    pub fn structurally_equivalent(&self, a: TypeId, b: TypeId) -> bool {
        self.equivalent(a, b, &mut HashSet::new())
    }

    fn equivalent(&self, a: TypeId, b: TypeId, assumed: &mut HashSet<(TypeId, TypeId)>) -> bool {
        if a == b || !assumed.insert((a, b)) {
            return true;
        }
        let (left, right) = (self.node(a), self.node(b));
        if let (Some(x), Some(y)) = (left.as_object(), right.as_object()) {
            return self.objects_equivalent(x, y, assumed);
        }
        match (&left.kind, &right.kind) {
            (TypeKind::Scalar(x), TypeKind::Scalar(y)) => x == y,
            (TypeKind::Null, TypeKind::Null) | (TypeKind::Any, TypeKind::Any) => true,
            (TypeKind::Enum(x), TypeKind::Enum(y)) => {
                x.literals.len() == y.literals.len()
                    && x.literals
                        .iter()
                        .zip(&y.literals)
                        .all(|(l, r)| l.value == r.value)
            }
            (TypeKind::Array(x), TypeKind::Array(y)) => self.equivalent(x.element, y.element, assumed),
            (TypeKind::Union(x), TypeKind::Union(y)) => {
                x.positional == y.positional
                    && x.alternatives.len() == y.alternatives.len()
                    && x.alternatives
                        .iter()
                        .zip(&y.alternatives)
                        .all(|(l, r)| self.equivalent(l.ty, r.ty, assumed))
            }
            _ => false,
        }
    }

    fn objects_equivalent(
        &self,
        x: &ObjectType,
        y: &ObjectType,
        assumed: &mut HashSet<(TypeId, TypeId)>,
    ) -> bool {
        if x.additional != y.additional || x.properties.len() != y.properties.len() {
            return false;
        }
        x.properties.values().all(|p| {
            y.properties.get(&p.name).is_some_and(|q| {
                p.required == q.required
                    && p.read_only == q.read_only
                    && p.write_only == q.write_only
                    && self.equivalent(p.ty, q.ty, assumed)
            })
        })
    }

    /// Picks the union alternative that best describes a stored value.
    /// Accessors use it only for values that carry no alternative tag.
    ///
    /// An alternative is disqualified when the value has the wrong kind, an
    /// object lacks a required key or carries a key the policy forbids.
    /// Remaining alternatives are scored by how many declared keys they
    /// cover; formatted scalars and enums outrank plain scalars. Ties go to
    /// the earliest alternative.
    #[must_use]
    pub fn discriminate(&self, union: &UnionType, value: &Value) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (i, alt) in union.alternatives.iter().enumerate() {
            if let Some(score) = self.match_score(alt.ty, value, 0) {
                if best.is_none_or(|(_, top)| score > top) {
                    best = Some((i, score));
                }
            }
        }
        best.map(|(i, _)| i)
    }

    /// Returns true if `value` fits the type in slot `id`.
    #[must_use]
    pub fn accepts(&self, id: TypeId, value: &Value) -> bool {
        self.match_score(id, value, 0).is_some()
    }

    fn match_score(&self, id: TypeId, value: &Value, depth: usize) -> Option<u32> {
        if depth > MATCH_DEPTH {
            return Some(0);
        }
        let node = self.node(id);
        if let Some(obj) = node.as_object() {
            return self.object_score(obj, value, depth);
        }
        match &node.kind {
            TypeKind::Placeholder | TypeKind::Any => Some(0),
            TypeKind::Null => value.is_null().then_some(1),
            TypeKind::Scalar(scalar) => scalar_score(scalar, value),
            TypeKind::Enum(en) => en.literals.iter().any(|l| &l.value == value).then_some(3),
            TypeKind::Array(array) => {
                let items = value.as_array()?;
                let element = self.node(array.element);
                if let TypeKind::Union(positional) = &element.kind {
                    if positional.positional {
                        let fits = items.iter().zip(&positional.alternatives).all(|(item, alt)| {
                            self.match_score(alt.ty, item, depth + 1).is_some()
                        });
                        return fits.then_some(1);
                    }
                }
                items
                    .iter()
                    .all(|item| self.match_score(array.element, item, depth + 1).is_some())
                    .then_some(1)
            }
            TypeKind::Union(union) => union
                .alternatives
                .iter()
                .filter_map(|alt| self.match_score(alt.ty, value, depth + 1))
                .max(),
            TypeKind::Object(_) | TypeKind::Intersection(_) => None,
        }
    }

    fn object_score(&self, obj: &ObjectType, value: &Value, depth: usize) -> Option<u32> {
        let bindings = value.as_object()?;
        let mut score = 1;
        for prop in obj.properties.values() {
            match bindings.get(&prop.name) {
                Some(child) => {
                    self.match_score(prop.ty, &child, depth + 1)?;
                    score += 1;
                }
                None if prop.required => return None,
                None => {}
            }
        }
        let undeclared = bindings
            .keys()
            .into_iter()
            .filter(|key| !obj.properties.contains_key(key));
        match &obj.additional {
            AdditionalPolicy::FreeForm => {}
            AdditionalPolicy::Forbidden => {
                if undeclared.count() > 0 {
                    return None;
                }
            }
            AdditionalPolicy::ConstrainedByPattern(patterns) => {
                let compiled: Vec<Regex> =
                    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect();
                for key in undeclared {
                    if !compiled.iter().any(|re| re.is_match(&key)) {
                        return None;
                    }
                }
            }
        }
        Some(score)
    }
}

fn scalar_score(scalar: &ScalarType, value: &Value) -> Option<u32> {
    let kind_fits = match scalar.kind {
        ScalarKind::Boolean => matches!(value, Value::Bool(_)),
        ScalarKind::String => matches!(value, Value::String(_)),
        ScalarKind::Integer => match value {
            Value::Integer(_) => true,
            Value::Number(n) => n.fract() == 0.0,
            _ => false,
        },
        ScalarKind::Number => matches!(value, Value::Integer(_) | Value::Number(_)),
    };
    match scalar.format {
        Some(format) if format.accepts(value) => Some(2),
        Some(_) => None,
        None => kind_fits.then_some(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonbind_core::Bindings;

    fn property(name: &str, ty: TypeId, required: bool) -> Property {
        Property {
            name: name.to_string(),
            ty,
            required,
            read_only: false,
            write_only: false,
        }
    }

    fn scalar(graph: &mut TypeGraph, path: &str, kind: ScalarKind) -> TypeId {
        let id = graph.reserve(path, path, "Test");
        graph.complete(id, TypeKind::Scalar(ScalarType { kind, format: None }));
        id
    }

    #[test]
    fn test_reserve_dedupes_paths() {
        let mut graph = TypeGraph::new();
        let a = graph.reserve("A", "A", "A");
        let b = graph.reserve("A", "A", "A");
        assert_ne!(a, b);
        assert_eq!(graph.node(b).path, "A_2");
        assert_eq!(graph.lookup_path("A_2"), Some(b));
        assert_eq!(graph.node(a).kind, TypeKind::Placeholder);
    }

    #[test]
    fn test_truncate_forgets_paths() {
        let mut graph = TypeGraph::new();
        graph.reserve("A", "A", "A");
        graph.reserve("B", "B", "B");
        graph.truncate(1);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.lookup_path("B"), None);
        assert!(graph.lookup_path("A").is_some());
    }

    #[test]
    fn test_recursive_equivalence_terminates() {
        let mut graph = TypeGraph::new();
        let a = graph.reserve("A", "Node", "A");
        let b = graph.reserve("B", "Node", "B");
        let mut obj_a = ObjectType::default();
        obj_a.properties.insert("next".into(), property("next", a, false));
        let mut obj_b = ObjectType::default();
        obj_b.properties.insert("next".into(), property("next", b, false));
        graph.complete(a, TypeKind::Object(obj_a));
        graph.complete(b, TypeKind::Object(obj_b));
        assert!(graph.structurally_equivalent(a, b));

        let s = scalar(&mut graph, "S", ScalarKind::String);
        assert!(!graph.structurally_equivalent(a, s));
    }

    #[test]
    fn test_discriminate_by_declared_keys() {
        let mut graph = TypeGraph::new();
        let s = scalar(&mut graph, "S", ScalarKind::String);
        let flag = scalar(&mut graph, "Flag", ScalarKind::Boolean);
        let a = graph.reserve("A", "A", "T");
        let b = graph.reserve("B", "B", "T");
        let mut obj_a = ObjectType::default();
        obj_a.properties.insert("a".into(), property("a", s, false));
        let mut obj_b = ObjectType::default();
        obj_b.properties.insert("b".into(), property("b", s, true));
        graph.complete(a, TypeKind::Object(obj_a));
        graph.complete(b, TypeKind::Object(obj_b));

        let union = UnionType {
            alternatives: vec![
                Alternative { name: "Boolean".into(), ty: flag },
                Alternative { name: "A".into(), ty: a },
                Alternative { name: "B".into(), ty: b },
            ],
            positional: false,
        };

        assert_eq!(graph.discriminate(&union, &Value::Bool(true)), Some(0));

        let with_b = Bindings::new();
        with_b.put("b", "x");
        assert_eq!(graph.discriminate(&union, &Value::Object(with_b)), Some(2));

        let with_a = Bindings::new();
        with_a.put("a", "x");
        assert_eq!(graph.discriminate(&union, &Value::Object(with_a)), Some(1));

        assert_eq!(graph.discriminate(&union, &Value::Integer(3)), None);
    }

    #[test]
    fn test_forbidden_extra_key_disqualifies() {
        let mut graph = TypeGraph::new();
        let s = scalar(&mut graph, "S", ScalarKind::String);
        let closed = graph.reserve("Closed", "Closed", "T");
        let mut obj = ObjectType {
            additional: AdditionalPolicy::Forbidden,
            ..ObjectType::default()
        };
        obj.properties.insert("a".into(), property("a", s, false));
        graph.complete(closed, TypeKind::Object(obj));

        let extra = Bindings::new();
        extra.put("a", "x");
        extra.put("z", 1i64);
        assert!(!graph.accepts(closed, &Value::Object(extra)));
    }

    #[test]
    fn test_formatted_scalar_outranks_plain() {
        let mut graph = TypeGraph::new();
        let plain = scalar(&mut graph, "Plain", ScalarKind::String);
        let date = graph.reserve("Date", "Date", "T");
        graph.complete(
            date,
            TypeKind::Scalar(ScalarType {
                kind: ScalarKind::String,
                format: Some(Format::Date),
            }),
        );
        let union = UnionType {
            alternatives: vec![
                Alternative { name: "String".into(), ty: plain },
                Alternative { name: "Date".into(), ty: date },
            ],
            positional: false,
        };
        assert_eq!(graph.discriminate(&union, &Value::from("1999-05-22")), Some(1));
        assert_eq!(graph.discriminate(&union, &Value::from("hello")), Some(0));
    }

    #[test]
    fn test_mark_mixed_arrays_and_nullable() {
        let mut graph = TypeGraph::new();
        let s = scalar(&mut graph, "S", ScalarKind::String);
        let list = graph.reserve("List", "List", "T");
        graph.complete(
            list,
            TypeKind::Array(ArrayType {
                element: s,
                in_mixed_union: false,
            }),
        );
        let null = graph.reserve("Null", "Null", "T");
        graph.complete(null, TypeKind::Null);

        let nullable_list = graph.reserve("MaybeList", "MaybeList", "T");
        graph.complete(
            nullable_list,
            TypeKind::Union(UnionType {
                alternatives: vec![
                    Alternative { name: "List".into(), ty: list },
                    Alternative { name: "Null".into(), ty: null },
                ],
                positional: false,
            }),
        );
        graph.mark_mixed_arrays();
        assert_eq!(graph.nullable_inner(nullable_list), Some(list));
        assert!(matches!(
            &graph.node(list).kind,
            TypeKind::Array(ArrayType { in_mixed_union: false, .. })
        ));

        let mixed = graph.reserve("Mixed", "Mixed", "T");
        graph.complete(
            mixed,
            TypeKind::Union(UnionType {
                alternatives: vec![
                    Alternative { name: "String".into(), ty: s },
                    Alternative { name: "List".into(), ty: list },
                ],
                positional: false,
            }),
        );
        graph.mark_mixed_arrays();
        assert!(matches!(
            &graph.node(list).kind,
            TypeKind::Array(ArrayType { in_mixed_union: true, .. })
        ));
        assert_eq!(graph.find_child(mixed, "List"), Some(list));
    }
}
