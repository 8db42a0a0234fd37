//! JSON Schema document parser.
//!
//! A [`SchemaDocument`] is an immutable arena of [`SchemaNode`]s, one per
//! schema position in the source. Nodes are addressed by [`SchemaId`] and can
//! be looked up by JSON pointer (for `$ref`) or by identity path (for
//! naming).
//!
//! Identity paths are dot-separated and start with the document name:
//! `Person`, `Person.Address`, `Person.hobby.items`, `Person.MyDef`
//! (a definition), `OneOf.thing.Option0` (a union alternative).

use crate::error::ParseError;
use indexmap::IndexMap;
use serde_json::Value as Json;
use std::collections::{HashMap, HashSet};

/// Index of a node inside its [`SchemaDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(u32);

impl SchemaId {
    /// The document root.
    pub const ROOT: Self = Self(0);

    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Primitive `type` keyword values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    /// `object`
    Object,
    /// `array`
    Array,
    /// `string`
    String,
    /// `number`
    Number,
    /// `integer`
    Integer,
    /// `boolean`
    Boolean,
    /// `null`
    Null,
}

impl JsonType {
    /// Parses a `type` keyword value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    /// Returns the PascalCase name used for union alternatives.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::Array => "List",
            Self::String => "String",
            Self::Number => "Number",
            Self::Integer => "Integer",
            Self::Boolean => "Boolean",
            Self::Null => "Null",
        }
    }
}

/// Coarse classification of a raw schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// Declares properties or `type: object`.
    Object,
    /// Declares items or `type: array`.
    Array,
    /// Any other concrete type, enum or const.
    Scalar,
    /// A `$ref`.
    Reference,
    /// `allOf`, `oneOf` or `anyOf`.
    Composition,
}

/// `items` / `prefixItems` shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Items {
    /// No items keyword.
    #[default]
    None,
    /// One schema for every element.
    Single(SchemaId),
    /// One schema per position.
    Positional(Vec<SchemaId>),
}

/// Raw `additionalProperties` keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Additional {
    /// Keyword absent.
    #[default]
    Unspecified,
    /// `true`.
    Allowed,
    /// `false`.
    Forbidden,
    /// A schema constraining additional values.
    Schema(SchemaId),
}

/// One parsed schema position.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    /// Node index.
    pub id: SchemaId,
    /// Dot-separated identity path, unique within the document.
    pub path: String,
    /// JSON pointer within the document (`#`, `#/properties/Name`).
    pub pointer: String,
    /// Type name candidate (property name, definition key, alternative name).
    pub name: String,
    /// `title`.
    pub title: Option<String>,
    /// `type`, as one or more primitive types.
    pub types: Vec<JsonType>,
    /// `format`.
    pub format: Option<String>,
    /// `properties`, in declaration order.
    pub properties: IndexMap<String, SchemaId>,
    /// `required` names.
    pub required: Vec<String>,
    /// Draft-3 style `"required": true` on the node itself.
    pub required_flag: bool,
    /// `additionalProperties`.
    pub additional: Additional,
    /// `patternProperties`, in declaration order.
    pub pattern_properties: IndexMap<String, SchemaId>,
    /// `items` or `prefixItems`.
    pub items: Items,
    /// `enum` literals.
    pub enum_values: Option<Vec<Json>>,
    /// `const` literal.
    pub const_value: Option<Json>,
    /// `$ref`.
    pub reference: Option<String>,
    /// `allOf` members.
    pub all_of: Vec<SchemaId>,
    /// `oneOf` alternatives.
    pub one_of: Vec<SchemaId>,
    /// `anyOf` alternatives.
    pub any_of: Vec<SchemaId>,
    /// `definitions` and `$defs`.
    pub definitions: IndexMap<String, SchemaId>,
    /// `readOnly`.
    pub read_only: bool,
    /// `writeOnly`.
    pub write_only: bool,
    /// OpenAPI-style `nullable`.
    pub nullable: bool,
}

impl SchemaNode {
    fn new(id: SchemaId, path: String, pointer: String, name: String) -> Self {
        Self {
            id,
            path,
            pointer,
            name,
            title: None,
            types: Vec::new(),
            format: None,
            properties: IndexMap::new(),
            required: Vec::new(),
            required_flag: false,
            additional: Additional::Unspecified,
            pattern_properties: IndexMap::new(),
            items: Items::None,
            enum_values: None,
            const_value: None,
            reference: None,
            all_of: Vec::new(),
            one_of: Vec::new(),
            any_of: Vec::new(),
            definitions: IndexMap::new(),
            read_only: false,
            write_only: false,
            nullable: false,
        }
    }

    /// Classifies the node.
    #[must_use]
    pub fn kind(&self) -> SchemaKind {
        if self.reference.is_some() {
            SchemaKind::Reference
        } else if !self.all_of.is_empty() || !self.one_of.is_empty() || !self.any_of.is_empty() {
            SchemaKind::Composition
        } else if self.types.contains(&JsonType::Object)
            || !self.properties.is_empty()
            || !self.pattern_properties.is_empty()
        {
            SchemaKind::Object
        } else if self.types.contains(&JsonType::Array) || self.items != Items::None {
            SchemaKind::Array
        } else {
            SchemaKind::Scalar
        }
    }

    /// Returns the composition keywords present on this node.
    #[must_use]
    pub fn composition_keywords(&self) -> Vec<&'static str> {
        let mut keywords = Vec::new();
        if !self.all_of.is_empty() {
            keywords.push("allOf");
        }
        if !self.one_of.is_empty() {
            keywords.push("oneOf");
        }
        if !self.any_of.is_empty() {
            keywords.push("anyOf");
        }
        if self.reference.is_some() {
            keywords.push("$ref");
        }
        keywords
    }

    /// Returns `oneOf` alternatives, or `anyOf` if there are none.
    #[must_use]
    pub fn alternatives(&self) -> &[SchemaId] {
        if self.one_of.is_empty() {
            &self.any_of
        } else {
            &self.one_of
        }
    }

    /// Returns true if this node is an enum or const literal set.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        (self.enum_values.is_some() || self.const_value.is_some()) && self.properties.is_empty()
    }

    /// Returns true if the node has object structure of its own.
    #[must_use]
    pub fn has_object_keywords(&self) -> bool {
        !self.properties.is_empty()
            || !self.pattern_properties.is_empty()
            || self.additional != Additional::Unspecified
    }
}

/// A parsed schema document.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    name: String,
    nodes: Vec<SchemaNode>,
    by_pointer: HashMap<String, SchemaId>,
    by_path: HashMap<String, SchemaId>,
    definitions: Vec<SchemaId>,
}

impl SchemaDocument {
    /// Parses a document from JSON text.
    ///
    /// # Errors
    /// Returns `ParseError` if the text is not JSON or a keyword is malformed.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, ParseError> {
        let json: Json = serde_json::from_str(text)?;
        Self::from_json(name, &json)
    }

    /// Builds a document from an already parsed JSON value.
    ///
    /// # Errors
    /// Returns `ParseError` if a keyword is malformed.
    pub fn from_json(name: impl Into<String>, json: &Json) -> Result<Self, ParseError> {
        let name = name.into();
        let mut parser = Parser {
            nodes: Vec::new(),
            by_pointer: HashMap::new(),
            by_path: HashMap::new(),
            used_paths: HashSet::new(),
            definitions: Vec::new(),
        };
        parser.parse_node(json, name.clone(), "#".to_string(), name.clone())?;

        Ok(Self {
            name,
            nodes: parser.nodes,
            by_pointer: parser.by_pointer,
            by_path: parser.by_path,
            definitions: parser.definitions,
        })
    }

    /// Reads and parses a document file, naming it after the file stem.
    ///
    /// # Errors
    /// Returns `ParseError` if reading or parsing fails.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ParseError> {
        let text = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Root")
            .to_string();
        Self::parse(name, &text)
    }

    /// Returns the document name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> &SchemaNode {
        &self.nodes[0]
    }

    /// Returns a node by id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this document.
    #[must_use]
    pub fn node(&self, id: SchemaId) -> &SchemaNode {
        &self.nodes[id.index()]
    }

    /// Looks up a node by JSON pointer (`#/definitions/Foo`).
    #[must_use]
    pub fn lookup_pointer(&self, pointer: &str) -> Option<SchemaId> {
        self.by_pointer.get(pointer).copied()
    }

    /// Looks up a node by identity path.
    #[must_use]
    pub fn lookup_path(&self, path: &str) -> Option<SchemaId> {
        self.by_path.get(path).copied()
    }

    /// Returns every definition node (at any depth) in document order.
    #[must_use]
    pub fn definitions(&self) -> &[SchemaId] {
        &self.definitions
    }

    /// Returns all nodes.
    #[must_use]
    pub fn nodes(&self) -> &[SchemaNode] {
        &self.nodes
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the document has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

struct Parser {
    nodes: Vec<SchemaNode>,
    by_pointer: HashMap<String, SchemaId>,
    by_path: HashMap<String, SchemaId>,
    used_paths: HashSet<String>,
    definitions: Vec<SchemaId>,
}

impl Parser {
    fn unique_path(&mut self, base: String) -> String {
        if self.used_paths.insert(base.clone()) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if self.used_paths.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    fn parse_node(
        &mut self,
        json: &Json,
        path: String,
        pointer: String,
        name: String,
    ) -> Result<SchemaId, ParseError> {
        let id = SchemaId(self.nodes.len() as u32);
        let path = self.unique_path(path);
        self.nodes
            .push(SchemaNode::new(id, path.clone(), pointer.clone(), name));
        self.by_pointer.insert(pointer.clone(), id);
        self.by_path.insert(path.clone(), id);

        let map = match json {
            Json::Object(map) => map,
            // `true` / `false` schemas carry no structure.
            Json::Bool(_) => return Ok(id),
            other => {
                return Err(ParseError::InvalidSchema {
                    pointer,
                    found: json_kind(other),
                });
            }
        };

        let mut node = self.nodes[id.index()].clone();

        for (key, value) in map {
            match key.as_str() {
                "title" => node.title = Some(expect_str(value, &pointer, key)?.to_string()),
                "type" => node.types = parse_types(value, &pointer)?,
                "format" => node.format = Some(expect_str(value, &pointer, key)?.to_string()),
                "$ref" => node.reference = Some(expect_str(value, &pointer, key)?.to_string()),
                "readOnly" => node.read_only = expect_bool(value, &pointer, key)?,
                "writeOnly" => node.write_only = expect_bool(value, &pointer, key)?,
                "nullable" => node.nullable = expect_bool(value, &pointer, key)?,
                "required" => match value {
                    Json::Bool(flag) => node.required_flag = *flag,
                    Json::Array(items) => {
                        node.required = items
                            .iter()
                            .map(|v| expect_str(v, &pointer, key).map(str::to_string))
                            .collect::<Result<_, _>>()?;
                    }
                    _ => {
                        return Err(ParseError::invalid_keyword(
                            pointer.as_str(),
                            key.as_str(),
                            "expected an array of names",
                        ));
                    }
                },
                "enum" => match value {
                    Json::Array(items) => node.enum_values = Some(items.clone()),
                    _ => {
                        return Err(ParseError::invalid_keyword(
                            pointer.as_str(),
                            key.as_str(),
                            "expected an array",
                        ));
                    }
                },
                "const" => node.const_value = Some(value.clone()),
                _ => {}
            }
        }

        // Children are parsed after scalar keywords so paths can use the node's path.
        if let Some(properties) = map.get("properties") {
            let properties = expect_object(properties, &pointer, "properties")?;
            for (prop, schema) in properties {
                let child = self.parse_node(
                    schema,
                    format!("{path}.{prop}"),
                    format!("{pointer}/properties/{}", escape_pointer(prop)),
                    prop.clone(),
                )?;
                node.properties.insert(prop.clone(), child);
            }
        }

        if let Some(patterns) = map.get("patternProperties") {
            let patterns = expect_object(patterns, &pointer, "patternProperties")?;
            for (i, (pattern, schema)) in patterns.iter().enumerate() {
                let child = self.parse_node(
                    schema,
                    format!("{path}.Pattern{i}"),
                    format!("{pointer}/patternProperties/{}", escape_pointer(pattern)),
                    format!("Pattern{i}"),
                )?;
                node.pattern_properties.insert(pattern.clone(), child);
            }
        }

        if let Some(additional) = map.get("additionalProperties") {
            node.additional = match additional {
                Json::Bool(true) => Additional::Allowed,
                Json::Bool(false) => Additional::Forbidden,
                schema => Additional::Schema(self.parse_node(
                    schema,
                    format!("{path}.Additional"),
                    format!("{pointer}/additionalProperties"),
                    "Additional".to_string(),
                )?),
            };
        }

        let items_name = node.name.clone();
        if let Some(prefix) = map.get("prefixItems") {
            node.items = Items::Positional(self.parse_positional(
                prefix,
                &path,
                &pointer,
                "prefixItems",
            )?);
        } else if let Some(items) = map.get("items") {
            node.items = match items {
                Json::Array(_) => {
                    Items::Positional(self.parse_positional(items, &path, &pointer, "items")?)
                }
                schema => Items::Single(self.parse_node(
                    schema,
                    format!("{path}.items"),
                    format!("{pointer}/items"),
                    items_name,
                )?),
            };
        }

        for keyword in ["allOf", "oneOf", "anyOf"] {
            let Some(list) = map.get(keyword) else {
                continue;
            };
            let Json::Array(members) = list else {
                return Err(ParseError::invalid_keyword(
                    pointer.as_str(),
                    keyword,
                    "expected an array of schemas",
                ));
            };
            let mut ids = Vec::with_capacity(members.len());
            for (i, member) in members.iter().enumerate() {
                let title = member
                    .get("title")
                    .and_then(Json::as_str)
                    .map(str::to_string);
                let member_name = match (keyword, title) {
                    ("allOf", _) => format!("Member{i}"),
                    (_, Some(title)) => title,
                    _ => format!("Option{i}"),
                };
                ids.push(self.parse_node(
                    member,
                    format!("{path}.{member_name}"),
                    format!("{pointer}/{keyword}/{i}"),
                    member_name,
                )?);
            }
            match keyword {
                "allOf" => node.all_of = ids,
                "oneOf" => node.one_of = ids,
                _ => node.any_of = ids,
            }
        }

        for keyword in ["definitions", "$defs"] {
            let Some(defs) = map.get(keyword) else {
                continue;
            };
            let defs = expect_object(defs, &pointer, keyword)?;
            for (def, schema) in defs {
                let child = self.parse_node(
                    schema,
                    format!("{path}.{def}"),
                    format!("{pointer}/{keyword}/{}", escape_pointer(def)),
                    def.clone(),
                )?;
                node.definitions.insert(def.clone(), child);
                self.definitions.push(child);
            }
        }

        self.nodes[id.index()] = node;
        Ok(id)
    }

    fn parse_positional(
        &mut self,
        json: &Json,
        path: &str,
        pointer: &str,
        keyword: &str,
    ) -> Result<Vec<SchemaId>, ParseError> {
        let Json::Array(items) = json else {
            return Err(ParseError::invalid_keyword(
                pointer,
                keyword,
                "expected an array of schemas",
            ));
        };
        let mut ids = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            ids.push(self.parse_node(
                item,
                format!("{path}.Item{i}"),
                format!("{pointer}/{keyword}/{i}"),
                format!("Item{i}"),
            )?);
        }
        Ok(ids)
    }
}

fn parse_types(value: &Json, pointer: &str) -> Result<Vec<JsonType>, ParseError> {
    let parse_one = |v: &Json| {
        v.as_str().and_then(JsonType::parse).ok_or_else(|| {
            ParseError::invalid_keyword(pointer, "type", format!("unknown type {v}"))
        })
    };
    match value {
        Json::Array(items) => items.iter().map(parse_one).collect(),
        single => Ok(vec![parse_one(single)?]),
    }
}

fn expect_str<'a>(value: &'a Json, pointer: &str, keyword: &str) -> Result<&'a str, ParseError> {
    value
        .as_str()
        .ok_or_else(|| ParseError::invalid_keyword(pointer, keyword, "expected a string"))
}

fn expect_bool(value: &Json, pointer: &str, keyword: &str) -> Result<bool, ParseError> {
    value
        .as_bool()
        .ok_or_else(|| ParseError::invalid_keyword(pointer, keyword, "expected a boolean"))
}

fn expect_object<'a>(
    value: &'a Json,
    pointer: &str,
    keyword: &str,
) -> Result<&'a serde_json::Map<String, Json>, ParseError> {
    value
        .as_object()
        .ok_or_else(|| ParseError::invalid_keyword(pointer, keyword, "expected an object"))
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// Escapes a key for use as a JSON pointer segment.
#[must_use]
pub fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
