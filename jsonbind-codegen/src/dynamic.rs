//! Descriptor-driven access to live bindings.
//!
//! [`DynamicObject`] executes a [`TypeDescriptor`] against a [`Bindings`]
//! exactly as generated code would: getters decode through the format
//! codecs, setters encode and `put`, and views share the underlying binding.
//!
//! A union property remembers the alternative it was last written as through
//! the binding's alternative tag. Reads honor the tag and fall back to
//! discriminating the stored value only for untagged values, such as those
//! loaded from JSON.

use crate::descriptor::{
    AccessorDescriptor, AccessorKind, DescriptorKind, DescriptorSet, ParameterDescriptor,
    TypeDescriptor, ValueShape,
};
use crate::error::AccessError;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use jsonbind_core::{
    Base64Codec, Base64Encoding, BigDecimalCodec, BigIntegerCodec, Bindings, BooleanCodec,
    DateCodec, DateTimeCodec, Format, FormatCodec, IntegerCodec, NumberCodec, OctetCodec,
    OctetEncoding, StringCodec, TimeCodec, TimestampMillisCodec, Value,
};
use jsonbind_schema::{AdditionalPolicy, ScalarKind, TypeGraph, TypeId, TypeKind, UnionType};
use num_bigint::BigInt;
use regex::Regex;

/// A decoded accessor value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Null.
    Null,
    /// Plain text.
    String(String),
    /// Boolean.
    Boolean(bool),
    /// Integer.
    Integer(i64),
    /// Number.
    Number(f64),
    /// `date`.
    Date(NaiveDate),
    /// `date-time`.
    DateTime(NaiveDateTime),
    /// `time`.
    Time(NaiveTime),
    /// `utc-millisec`.
    Timestamp(DateTime<Utc>),
    /// `big-integer`.
    BigInteger(BigInt),
    /// `big-decimal`.
    BigDecimal(BigDecimal),
    /// `byte`.
    Base64(Base64Encoding),
    /// `binary`.
    Octet(OctetEncoding),
    /// Enum constant, by identifier.
    Enum(String),
    /// Nested object, shared with the parent binding.
    Object(Bindings),
    /// Sequence.
    List(Vec<TypedValue>),
    /// Unconstrained value.
    Any(Value),
}

impl TypedValue {
    /// Returns a short name of the value kind, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::Date(_) => "date",
            Self::DateTime(_) => "date-time",
            Self::Time(_) => "time",
            Self::Timestamp(_) => "utc-millisec",
            Self::BigInteger(_) => "big-integer",
            Self::BigDecimal(_) => "big-decimal",
            Self::Base64(_) => "byte",
            Self::Octet(_) => "binary",
            Self::Enum(_) => "enum constant",
            Self::Object(_) => "object",
            Self::List(_) => "list",
            Self::Any(_) => "value",
        }
    }

    /// Returns the text of a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested binding of an object value.
    #[must_use]
    pub const fn as_bindings(&self) -> Option<&Bindings> {
        match self {
            Self::Object(b) => Some(b),
            _ => None,
        }
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Bindings> for TypedValue {
    fn from(value: Bindings) -> Self {
        Self::Object(value)
    }
}

/// Encodes and decodes values for one descriptor set.
#[derive(Clone, Copy)]
struct Codec<'a> {
    set: &'a DescriptorSet,
    graph: &'a TypeGraph,
}

impl<'a> Codec<'a> {
    /// Returns the union a named shape refers to.
    fn union_of<'s>(&self, shape: &'s ValueShape) -> Option<(&'s str, &'a UnionType)> {
        let ValueShape::Named { type_name, target } = shape else {
            return None;
        };
        match &self.graph.node(*target).kind {
            TypeKind::Union(union) => Some((type_name.as_str(), union)),
            _ => None,
        }
    }

    /// Decodes a property value, reading a union as alternative `tag` when
    /// the value carries one.
    fn decode_tagged(
        &self,
        shape: &ValueShape,
        value: &Value,
        tag: Option<usize>,
    ) -> Result<TypedValue, AccessError> {
        if let (Some(index), Some((type_name, _))) = (tag, self.union_of(shape)) {
            if let Some(alt) = self.descriptor(type_name)?.alternatives.get(index) {
                return self.decode(&alt.shape, value);
            }
        }
        self.decode(shape, value)
    }

    /// Encodes a property value, returning the union alternative it was
    /// encoded as.
    fn encode_tagged(
        &self,
        shape: &ValueShape,
        typed: &TypedValue,
    ) -> Result<(Value, Option<usize>), AccessError> {
        if *typed != TypedValue::Null {
            if let Some((type_name, union)) = self.union_of(shape) {
                let (value, index) = self.encode_union(shape, type_name, union, typed)?;
                return Ok((value, Some(index)));
            }
        }
        Ok((self.encode(shape, typed)?, None))
    }

    /// Encodes as the first alternative that takes the value.
    fn encode_union(
        &self,
        shape: &ValueShape,
        type_name: &str,
        union: &UnionType,
        typed: &TypedValue,
    ) -> Result<(Value, usize), AccessError> {
        let descriptor = self.descriptor(type_name)?;
        union
            .alternatives
            .iter()
            .zip(&descriptor.alternatives)
            .enumerate()
            .find_map(|(index, (alt, desc))| {
                self.encode(&desc.shape, typed)
                    .ok()
                    .filter(|value| self.graph.accepts(alt.ty, value))
                    .map(|value| (value, index))
            })
            .ok_or_else(|| wrong(shape, typed.kind()))
    }

    fn decode(&self, shape: &ValueShape, value: &Value) -> Result<TypedValue, AccessError> {
        if value.is_null() {
            return Ok(TypedValue::Null);
        }
        Ok(match shape {
            ValueShape::Scalar { kind, format } => decode_scalar(*kind, *format, value)?,
            ValueShape::Named { type_name, target } => {
                self.decode_named(type_name, *target, value)?
            }
            ValueShape::List { element } => {
                let items = value.as_array().ok_or_else(|| wrong(shape, value.kind()))?;
                TypedValue::List(
                    items
                        .iter()
                        .map(|item| self.decode(element, item))
                        .collect::<Result<_, _>>()?,
                )
            }
            ValueShape::Any => TypedValue::Any(value.clone()),
            ValueShape::Null => return Err(wrong(shape, value.kind())),
        })
    }

    fn decode_named(
        &self,
        type_name: &str,
        target: TypeId,
        value: &Value,
    ) -> Result<TypedValue, AccessError> {
        let mismatch = || AccessError::WrongKind {
            accessor: type_name.to_string(),
            expected: type_name.to_string(),
            found: value.kind(),
        };
        match &self.graph.node(target).kind {
            TypeKind::Enum(en) => en
                .literals
                .iter()
                .find(|literal| &literal.value == value)
                .map(|literal| TypedValue::Enum(literal.identifier.clone()))
                .ok_or_else(mismatch),
            TypeKind::Union(union) => {
                let descriptor = self.descriptor(type_name)?;
                match self.graph.discriminate(union, value) {
                    Some(i) => self.decode(&descriptor.alternatives[i].shape, value),
                    None => Ok(TypedValue::Any(value.clone())),
                }
            }
            _ => value
                .as_object()
                .map(|b| TypedValue::Object(b.clone()))
                .ok_or_else(mismatch),
        }
    }

    fn encode(&self, shape: &ValueShape, typed: &TypedValue) -> Result<Value, AccessError> {
        if *typed == TypedValue::Null {
            return Ok(Value::Null);
        }
        let mismatch = || wrong(shape, typed.kind());
        match shape {
            ValueShape::Scalar { kind, format } => {
                encode_scalar(*kind, *format, typed).ok_or_else(mismatch)
            }
            ValueShape::Named { type_name, target } => match &self.graph.node(*target).kind {
                TypeKind::Enum(en) => match typed {
                    TypedValue::Enum(identifier) => en
                        .literals
                        .iter()
                        .find(|literal| &literal.identifier == identifier)
                        .map(|literal| literal.value.clone())
                        .ok_or_else(mismatch),
                    _ => Err(mismatch()),
                },
                TypeKind::Union(union) => self
                    .encode_union(shape, type_name, union, typed)
                    .map(|(value, _)| value),
                _ => match typed {
                    TypedValue::Object(b) => Ok(Value::Object(b.clone())),
                    TypedValue::Any(value @ Value::Object(_)) => Ok(value.clone()),
                    _ => Err(mismatch()),
                },
            },
            ValueShape::List { element } => match typed {
                TypedValue::List(items) => Ok(Value::Array(
                    items
                        .iter()
                        .map(|item| self.encode(element, item))
                        .collect::<Result<_, _>>()?,
                )),
                TypedValue::Any(value @ Value::Array(_)) => Ok(value.clone()),
                _ => Err(mismatch()),
            },
            ValueShape::Any => Ok(match typed {
                TypedValue::Any(value) => value.clone(),
                other => self.encode_untyped(other),
            }),
            ValueShape::Null => Err(mismatch()),
        }
    }

    /// Encodes a value for an unconstrained slot.
    fn encode_untyped(&self, typed: &TypedValue) -> Value {
        match typed {
            TypedValue::Null => Value::Null,
            TypedValue::String(s) | TypedValue::Enum(s) => Value::String(s.clone()),
            TypedValue::Boolean(b) => Value::Bool(*b),
            TypedValue::Integer(i) => Value::Integer(*i),
            TypedValue::Number(n) => Value::Number(*n),
            TypedValue::Date(d) => DateCodec::encode(d),
            TypedValue::DateTime(d) => DateTimeCodec::encode(d),
            TypedValue::Time(t) => TimeCodec::encode(t),
            TypedValue::Timestamp(t) => TimestampMillisCodec::encode(t),
            TypedValue::BigInteger(n) => BigIntegerCodec::encode(n),
            TypedValue::BigDecimal(n) => BigDecimalCodec::encode(n),
            TypedValue::Base64(b) => Base64Codec::encode(b),
            TypedValue::Octet(o) => OctetCodec::encode(o),
            TypedValue::Object(b) => Value::Object(b.clone()),
            TypedValue::List(items) => {
                Value::Array(items.iter().map(|item| self.encode_untyped(item)).collect())
            }
            TypedValue::Any(value) => value.clone(),
        }
    }

    fn descriptor(&self, name: &str) -> Result<&TypeDescriptor, AccessError> {
        self.set.by_name(name).ok_or_else(|| AccessError::UnknownType {
            name: name.to_string(),
        })
    }
}

fn wrong(shape: &ValueShape, found: &'static str) -> AccessError {
    AccessError::WrongKind {
        accessor: shape.describe(),
        expected: shape.describe(),
        found,
    }
}

fn decode_scalar(
    kind: ScalarKind,
    format: Option<Format>,
    value: &Value,
) -> Result<TypedValue, AccessError> {
    Ok(match format {
        Some(Format::Date) => TypedValue::Date(DateCodec::decode(value)?),
        Some(Format::DateTime) => TypedValue::DateTime(DateTimeCodec::decode(value)?),
        Some(Format::Time) => TypedValue::Time(TimeCodec::decode(value)?),
        Some(Format::TimestampMillis) => TypedValue::Timestamp(TimestampMillisCodec::decode(value)?),
        Some(Format::BigInteger) => TypedValue::BigInteger(BigIntegerCodec::decode(value)?),
        Some(Format::BigDecimal) => TypedValue::BigDecimal(BigDecimalCodec::decode(value)?),
        Some(Format::Base64Binary) => TypedValue::Base64(Base64Codec::decode(value)?),
        Some(Format::OctetBinary) => TypedValue::Octet(OctetCodec::decode(value)?),
        None => match kind {
            ScalarKind::String => TypedValue::String(StringCodec::decode(value)?),
            ScalarKind::Boolean => TypedValue::Boolean(BooleanCodec::decode(value)?),
            ScalarKind::Integer => TypedValue::Integer(IntegerCodec::decode(value)?),
            ScalarKind::Number => TypedValue::Number(NumberCodec::decode(value)?),
        },
    })
}

fn encode_scalar(kind: ScalarKind, format: Option<Format>, typed: &TypedValue) -> Option<Value> {
    Some(match (format, typed) {
        (Some(Format::Date), TypedValue::Date(d)) => DateCodec::encode(d),
        (Some(Format::DateTime), TypedValue::DateTime(d)) => DateTimeCodec::encode(d),
        (Some(Format::Time), TypedValue::Time(t)) => TimeCodec::encode(t),
        (Some(Format::TimestampMillis), TypedValue::Timestamp(t)) => TimestampMillisCodec::encode(t),
        (Some(Format::BigInteger), TypedValue::BigInteger(n)) => BigIntegerCodec::encode(n),
        (Some(Format::BigDecimal), TypedValue::BigDecimal(n)) => BigDecimalCodec::encode(n),
        (Some(Format::Base64Binary), TypedValue::Base64(b)) => Base64Codec::encode(b),
        (Some(Format::OctetBinary), TypedValue::Octet(o)) => OctetCodec::encode(o),
        (None, TypedValue::String(s)) if kind == ScalarKind::String => StringCodec::encode(s),
        (None, TypedValue::Boolean(b)) if kind == ScalarKind::Boolean => BooleanCodec::encode(b),
        (None, TypedValue::Integer(i)) if kind == ScalarKind::Integer => IntegerCodec::encode(i),
        (None, TypedValue::Integer(i)) if kind == ScalarKind::Number => Value::Integer(*i),
        (None, TypedValue::Number(n)) if kind == ScalarKind::Number => NumberCodec::encode(n),
        _ => return None,
    })
}

/// Stores a value, tagging it with its union alternative when it has one.
fn store(bindings: &Bindings, key: impl Into<String>, value: Value, tag: Option<usize>) {
    match tag {
        Some(index) if !value.is_null() => bindings.put_alternative(key, value, index),
        _ => bindings.put(key, value),
    };
}

/// Returns true if `key` matches one of the property-name patterns.
///
/// Generated `put` methods call this for objects whose undeclared keys are
/// constrained by `patternProperties`.
#[must_use]
pub fn key_matches_any<S: AsRef<str>>(patterns: &[S], key: &str) -> bool {
    patterns
        .iter()
        .filter_map(|p| Regex::new(p.as_ref()).ok())
        .any(|re| re.is_match(key))
}

/// Looks up an object descriptor by type name.
fn object_descriptor<'a>(
    set: &'a DescriptorSet,
    type_name: &str,
) -> Result<&'a TypeDescriptor, AccessError> {
    let descriptor = set.by_name(type_name).ok_or_else(|| AccessError::UnknownType {
        name: type_name.to_string(),
    })?;
    if descriptor.kind != DescriptorKind::Object {
        return Err(AccessError::NotAnObject {
            type_name: type_name.to_string(),
        });
    }
    Ok(descriptor)
}

/// Checks and stores positional required values.
fn put_required(
    codec: Codec<'_>,
    bindings: &Bindings,
    type_name: &str,
    params: &[ParameterDescriptor],
    values: Vec<TypedValue>,
) -> Result<(), AccessError> {
    if values.len() > params.len() {
        return Err(AccessError::Arity {
            type_name: type_name.to_string(),
            expected: params.len(),
            found: values.len(),
        });
    }
    if let Some(missing) = params.get(values.len()) {
        return Err(AccessError::MissingRequired {
            type_name: type_name.to_string(),
            property: missing.key.clone(),
        });
    }
    for (param, value) in params.iter().zip(values) {
        if value == TypedValue::Null && !param.nullable {
            return Err(AccessError::MissingRequired {
                type_name: type_name.to_string(),
                property: param.key.clone(),
            });
        }
        let (encoded, tag) = codec.encode_tagged(&param.shape, &value)?;
        store(bindings, param.key.clone(), encoded, tag);
    }
    Ok(())
}

/// An object instance driven by its descriptor.
#[derive(Clone)]
pub struct DynamicObject<'a> {
    bindings: Bindings,
    descriptor: &'a TypeDescriptor,
    codec: Codec<'a>,
}

impl std::fmt::Debug for DynamicObject<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicObject")
            .field("type", &self.descriptor.name)
            .field("bindings", &self.bindings)
            .finish()
    }
}

impl<'a> DynamicObject<'a> {
    /// Creates an empty instance of `type_name`.
    ///
    /// # Errors
    /// Returns `AccessError::UnknownType` or `AccessError::NotAnObject`.
    pub fn new(
        set: &'a DescriptorSet,
        graph: &'a TypeGraph,
        type_name: &str,
    ) -> Result<Self, AccessError> {
        Self::wrap(set, graph, type_name, Bindings::new())
    }

    /// Views an existing binding as `type_name`.
    ///
    /// # Errors
    /// Returns `AccessError::UnknownType` or `AccessError::NotAnObject`.
    pub fn wrap(
        set: &'a DescriptorSet,
        graph: &'a TypeGraph,
        type_name: &str,
        bindings: Bindings,
    ) -> Result<Self, AccessError> {
        Ok(Self {
            bindings,
            descriptor: object_descriptor(set, type_name)?,
            codec: Codec { set, graph },
        })
    }

    /// Creates an instance from the required values, in declaration order.
    ///
    /// # Errors
    /// Returns `AccessError::MissingRequired` or `AccessError::Arity` if the
    /// values do not line up with the required properties.
    pub fn create(
        set: &'a DescriptorSet,
        graph: &'a TypeGraph,
        type_name: &str,
        values: Vec<TypedValue>,
    ) -> Result<Self, AccessError> {
        let object = Self::new(set, graph, type_name)?;
        let params = object.descriptor.constructor.as_deref().unwrap_or_default();
        put_required(object.codec, &object.bindings, type_name, params, values)?;
        Ok(object)
    }

    /// Starts a builder from the required values, in declaration order.
    ///
    /// # Errors
    /// Returns `AccessError::UnknownAccessor` if the type has no builder, or
    /// the errors of [`DynamicObject::create`].
    pub fn builder(
        set: &'a DescriptorSet,
        graph: &'a TypeGraph,
        type_name: &str,
        required: Vec<TypedValue>,
    ) -> Result<DynamicBuilder<'a>, AccessError> {
        let object = Self::new(set, graph, type_name)?;
        let builder = object
            .descriptor
            .builder
            .as_ref()
            .ok_or_else(|| AccessError::unknown_accessor(type_name, "builder"))?;
        put_required(object.codec, &object.bindings, type_name, &builder.required, required)?;
        Ok(DynamicBuilder { object })
    }

    /// Returns the descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &'a TypeDescriptor {
        self.descriptor
    }

    /// Returns the generated type name.
    #[must_use]
    pub fn type_name(&self) -> &'a str {
        &self.descriptor.name
    }

    /// Returns the backing binding.
    #[must_use]
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Consumes the instance, returning its binding.
    #[must_use]
    pub fn into_bindings(self) -> Bindings {
        self.bindings
    }

    /// Returns the canonical text of the backing binding.
    #[must_use]
    pub fn to_canonical_text(&self) -> String {
        self.bindings.to_canonical_text()
    }

    fn accessor(&self, name: &str) -> Result<&'a AccessorDescriptor, AccessError> {
        self.descriptor
            .accessor(name)
            .ok_or_else(|| AccessError::unknown_accessor(&self.descriptor.name, name))
    }

    fn key(&self, accessor: &'a AccessorDescriptor) -> Result<&'a str, AccessError> {
        accessor
            .key
            .as_deref()
            .ok_or_else(|| AccessError::unknown_accessor(&self.descriptor.name, &accessor.name))
    }

    /// Calls a getter. Absent and null values read as `None`.
    ///
    /// A qualified union getter returns a value only when the property was
    /// last written as its alternative. An untagged value counts as the
    /// alternative it discriminates to.
    ///
    /// # Errors
    /// Returns `AccessError::UnknownAccessor` for a name that is not a
    /// getter, or `AccessError::Format` if the stored value does not decode.
    pub fn get(&self, accessor: &str) -> Result<Option<TypedValue>, AccessError> {
        let descriptor = self.accessor(accessor)?;
        let key = self.key(descriptor)?;
        let stored = match self.bindings.get(key) {
            Some(Value::Null) | None => return Ok(None),
            Some(stored) => stored,
        };
        match descriptor.kind {
            AccessorKind::Getter => Ok(Some(self.codec.decode_tagged(
                &descriptor.shape,
                &stored,
                self.bindings.alternative(key),
            )?)),
            AccessorKind::QualifiedGetter { union, alternative } => {
                let current = match self.bindings.alternative(key) {
                    Some(index) => Some(index),
                    None => match &self.codec.graph.node(union).kind {
                        TypeKind::Union(union) => self.codec.graph.discriminate(union, &stored),
                        _ => None,
                    },
                };
                if current != Some(alternative) {
                    return Ok(None);
                }
                Ok(Some(self.codec.decode(&descriptor.shape, &stored)?))
            }
            _ => Err(AccessError::unknown_accessor(&self.descriptor.name, accessor)),
        }
    }

    /// Calls a getter whose value is a generated object and wraps the
    /// nested binding.
    ///
    /// # Errors
    /// Returns the errors of [`DynamicObject::get`], or
    /// `AccessError::WrongKind` if the accessor is not object-typed.
    pub fn get_object(&self, accessor: &str) -> Result<Option<DynamicObject<'a>>, AccessError> {
        let descriptor = self.accessor(accessor)?;
        let ValueShape::Named { type_name, .. } = &descriptor.shape else {
            return Err(AccessError::WrongKind {
                accessor: accessor.to_string(),
                expected: "object".to_string(),
                found: "non-object shape",
            });
        };
        match self.get(accessor)? {
            Some(TypedValue::Object(bindings)) => Ok(Some(DynamicObject::wrap(
                self.codec.set,
                self.codec.graph,
                type_name,
                bindings,
            )?)),
            _ => Ok(None),
        }
    }

    /// Calls a setter.
    ///
    /// A nested object is stored by reference: later mutation through either
    /// handle is visible through both. A qualified union setter tags the
    /// property with its alternative; an unqualified one tags it with the
    /// first alternative that takes the value.
    ///
    /// # Errors
    /// Returns `AccessError::UnknownAccessor` for a name that is not a
    /// setter, `AccessError::WrongKind` if the value does not fit, or
    /// `AccessError::MissingRequired` when clearing a required non-nullable
    /// property.
    pub fn set(&self, accessor: &str, value: impl Into<TypedValue>) -> Result<(), AccessError> {
        let value = value.into();
        let descriptor = self.accessor(accessor)?;
        if !matches!(
            descriptor.kind,
            AccessorKind::Setter | AccessorKind::QualifiedSetter { .. }
        ) {
            return Err(AccessError::unknown_accessor(&self.descriptor.name, accessor));
        }
        let key = self.key(descriptor)?;
        if value == TypedValue::Null && descriptor.required && !descriptor.nullable {
            return Err(AccessError::MissingRequired {
                type_name: self.descriptor.name.clone(),
                property: key.to_string(),
            });
        }
        let encoded = match descriptor.kind {
            AccessorKind::QualifiedSetter { alternative, .. } => self
                .codec
                .encode(&descriptor.shape, &value)
                .map(|encoded| (encoded, Some(alternative))),
            _ => self.codec.encode_tagged(&descriptor.shape, &value),
        };
        let (encoded, tag) = encoded.map_err(|err| match err {
            AccessError::WrongKind {
                expected, found, ..
            } => AccessError::WrongKind {
                accessor: accessor.to_string(),
                expected,
                found,
            },
            other => other,
        })?;
        store(&self.bindings, key, encoded, tag);
        Ok(())
    }

    /// Generic `get(key)`.
    ///
    /// # Errors
    /// Returns `AccessError::NoGenericAccess` if the type forbids additional
    /// properties.
    pub fn get_any(&self, key: &str) -> Result<Option<Value>, AccessError> {
        self.generic()?;
        Ok(self.bindings.get(key))
    }

    /// Generic `put(key, value)`, returning the previous value.
    ///
    /// Undeclared keys must match a pattern when the policy carries
    /// patterns.
    ///
    /// # Errors
    /// Returns `AccessError::NoGenericAccess` if the type forbids additional
    /// properties, or `AccessError::RejectedKey` for a key no pattern
    /// matches.
    pub fn put_any(&self, key: &str, value: impl Into<Value>) -> Result<Option<Value>, AccessError> {
        self.generic()?;
        if let Some(AdditionalPolicy::ConstrainedByPattern(patterns)) = &self.descriptor.additional
        {
            let declared = self
                .descriptor
                .accessors
                .iter()
                .any(|a| a.key.as_deref() == Some(key));
            if !declared && !key_matches_any(patterns, key) {
                return Err(AccessError::RejectedKey {
                    type_name: self.descriptor.name.clone(),
                    key: key.to_string(),
                });
            }
        }
        Ok(self.bindings.put(key, value))
    }

    fn generic(&self) -> Result<(), AccessError> {
        if self.descriptor.has_generic_access() {
            Ok(())
        } else {
            Err(AccessError::NoGenericAccess {
                type_name: self.descriptor.name.clone(),
            })
        }
    }

    /// Returns a detached deep copy.
    ///
    /// # Errors
    /// Returns `AccessError::UnknownAccessor` if copiers were not emitted.
    pub fn copy(&self) -> Result<DynamicObject<'a>, AccessError> {
        if !self.descriptor.copier {
            return Err(AccessError::unknown_accessor(&self.descriptor.name, "copy"));
        }
        Ok(Self {
            bindings: self.bindings.deep_copy(),
            ..self.clone()
        })
    }

    /// Views the instance through an interface it satisfies structurally.
    ///
    /// The view shares this instance's binding.
    ///
    /// # Errors
    /// Returns `AccessError::ViewNotSatisfied` if the type has no such view.
    pub fn view_as(&self, interface: &str) -> Result<DynamicView<'a>, AccessError> {
        let not_satisfied = || AccessError::ViewNotSatisfied {
            type_name: self.descriptor.name.clone(),
            interface: interface.to_string(),
        };
        let view = self.descriptor.view(interface).ok_or_else(not_satisfied)?;
        let members: Vec<String> = if view.declared {
            self.codec
                .set
                .interface(interface)
                .ok_or_else(not_satisfied)?
                .member_names()
                .map(str::to_string)
                .collect()
        } else {
            self.codec
                .set
                .by_name(interface)
                .ok_or_else(not_satisfied)?
                .accessors
                .iter()
                .filter(|a| matches!(a.kind, AccessorKind::Getter | AccessorKind::Setter))
                .map(|a| a.name.clone())
                .collect()
        };
        Ok(DynamicView {
            interface: interface.to_string(),
            members,
            object: self.clone(),
        })
    }
}

/// An instance seen through an interface.
#[derive(Debug, Clone)]
pub struct DynamicView<'a> {
    interface: String,
    members: Vec<String>,
    object: DynamicObject<'a>,
}

impl<'a> DynamicView<'a> {
    /// Returns the interface name.
    #[must_use]
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Returns the shared binding.
    #[must_use]
    pub fn bindings(&self) -> &Bindings {
        self.object.bindings()
    }

    fn check(&self, accessor: &str) -> Result<(), AccessError> {
        if self.members.iter().any(|m| m == accessor) {
            Ok(())
        } else {
            Err(AccessError::unknown_accessor(&self.interface, accessor))
        }
    }

    /// Calls an interface getter.
    ///
    /// # Errors
    /// Returns `AccessError::UnknownAccessor` for a name the interface does
    /// not declare, or the errors of [`DynamicObject::get`].
    pub fn get(&self, accessor: &str) -> Result<Option<TypedValue>, AccessError> {
        self.check(accessor)?;
        self.object.get(accessor)
    }

    /// Calls an interface setter.
    ///
    /// # Errors
    /// Returns `AccessError::UnknownAccessor` for a name the interface does
    /// not declare, or the errors of [`DynamicObject::set`].
    pub fn set(&self, accessor: &str, value: impl Into<TypedValue>) -> Result<(), AccessError> {
        self.check(accessor)?;
        self.object.set(accessor, value)
    }

    /// Returns the underlying instance.
    #[must_use]
    pub fn into_object(self) -> DynamicObject<'a> {
        self.object
    }
}

/// Builder surface of an object with required properties.
#[derive(Debug)]
pub struct DynamicBuilder<'a> {
    object: DynamicObject<'a>,
}

impl<'a> DynamicBuilder<'a> {
    /// Sets an optional property through its `with_x` step.
    ///
    /// # Errors
    /// Returns `AccessError::UnknownAccessor` for an unknown step or
    /// `AccessError::WrongKind` if the value does not fit.
    pub fn with(self, method: &str, value: impl Into<TypedValue>) -> Result<Self, AccessError> {
        let type_name = self.object.type_name();
        let step = self
            .object
            .descriptor
            .builder
            .as_ref()
            .and_then(|b| b.steps.iter().find(|s| s.method == method))
            .ok_or_else(|| AccessError::unknown_accessor(type_name, method))?;
        let (encoded, tag) = self.object.codec.encode_tagged(&step.shape, &value.into())?;
        store(&self.object.bindings, step.key.clone(), encoded, tag);
        Ok(self)
    }

    /// Finishes construction.
    #[must_use]
    pub fn build(self) -> DynamicObject<'a> {
        self.object
    }
}

/// A root array instance driven by its descriptor.
#[derive(Debug, Clone)]
pub struct DynamicList<'a> {
    items: Vec<Value>,
    descriptor: &'a TypeDescriptor,
    graph: &'a TypeGraph,
    set: &'a DescriptorSet,
}

impl<'a> DynamicList<'a> {
    /// Views stored elements as the array type `type_name`.
    ///
    /// # Errors
    /// Returns `AccessError::UnknownType` if no array descriptor has the
    /// name.
    pub fn wrap(
        set: &'a DescriptorSet,
        graph: &'a TypeGraph,
        type_name: &str,
        items: Vec<Value>,
    ) -> Result<Self, AccessError> {
        let descriptor = set
            .by_name(type_name)
            .filter(|d| d.kind == DescriptorKind::Array)
            .ok_or_else(|| AccessError::UnknownType {
                name: type_name.to_string(),
            })?;
        Ok(Self {
            items,
            descriptor,
            graph,
            set,
        })
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reads element `index` through an element getter.
    ///
    /// A positional getter returns a value only when the element fits its
    /// alternative.
    ///
    /// # Errors
    /// Returns `AccessError::UnknownAccessor` for a name that is not an
    /// element getter, or `AccessError::Format` if the element does not
    /// decode.
    pub fn element(&self, accessor: &str, index: usize) -> Result<Option<TypedValue>, AccessError> {
        let descriptor = self
            .descriptor
            .accessor(accessor)
            .ok_or_else(|| AccessError::unknown_accessor(&self.descriptor.name, accessor))?;
        let AccessorKind::ElementGetter { alternative } = descriptor.kind else {
            return Err(AccessError::unknown_accessor(&self.descriptor.name, accessor));
        };
        let Some(item) = self.items.get(index) else {
            return Ok(None);
        };
        if let Some(i) = alternative {
            let TypeKind::Array(array) = &self.graph.node(self.descriptor.id).kind else {
                return Ok(None);
            };
            let TypeKind::Union(positional) = &self.graph.node(array.element).kind else {
                return Ok(None);
            };
            let fits = positional
                .alternatives
                .get(i)
                .is_some_and(|alt| self.graph.accepts(alt.ty, item));
            if !fits {
                return Ok(None);
            }
        }
        let codec = Codec {
            set: self.set,
            graph: self.graph,
        };
        match codec.decode(&descriptor.shape, item)? {
            TypedValue::Null => Ok(None),
            value => Ok(Some(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::AccessorEmitter;
    use jsonbind_schema::SynthesisDriver;

    fn synthesize(name: &str, text: &str) -> (SynthesisDriver, DescriptorSet) {
        let mut driver = SynthesisDriver::new();
        driver.add_schema(name, text).unwrap();
        driver.synthesize(name).unwrap();
        let roots = driver.entry_types(name);
        let set = AccessorEmitter::new(driver.graph(), driver.options())
            .emit(&roots)
            .unwrap();
        (driver, set)
    }

    #[test]
    fn test_create_and_canonical_text() {
        let (driver, set) = synthesize(
            "Person",
            r#"{"properties": {"Name": {"type": "string"}}, "required": ["Name"]}"#,
        );
        let person =
            DynamicObject::create(&set, driver.graph(), "Person", vec!["Joe Namath".into()])
                .unwrap();
        assert_eq!(person.to_canonical_text(), r#"{"Name":"Joe Namath"}"#);
        assert_eq!(
            person.get("name").unwrap(),
            Some(TypedValue::String("Joe Namath".to_string()))
        );
        assert!(matches!(
            DynamicObject::create(&set, driver.graph(), "Person", vec![]),
            Err(AccessError::MissingRequired { .. })
        ));
    }

    #[test]
    fn test_formats_through_accessors() {
        let (driver, set) = synthesize(
            "Event",
            r#"{"properties": {
                "day": {"type": "string", "format": "date"},
                "amount": {"type": "string", "format": "big-decimal"},
                "payload": {"type": "string", "format": "byte"}}}"#,
        );
        let event = DynamicObject::new(&set, driver.graph(), "Event").unwrap();
        let day = NaiveDate::from_ymd_opt(1999, 5, 22).unwrap();
        event.set("set_day", TypedValue::Date(day)).unwrap();
        assert_eq!(event.bindings().get("day"), Some(Value::from("1999-05-22")));
        assert_eq!(event.get("day").unwrap(), Some(TypedValue::Date(day)));

        let amount: BigDecimal = "12345678901234567890.000100".parse().unwrap();
        event
            .set("set_amount", TypedValue::BigDecimal(amount.clone()))
            .unwrap();
        assert_eq!(event.get("amount").unwrap(), Some(TypedValue::BigDecimal(amount)));

        let payload = Base64Encoding::from_bytes(&[0, 1, 2, 255]);
        event.set("set_payload", TypedValue::Base64(payload)).unwrap();
        let Some(TypedValue::Base64(read)) = event.get("payload").unwrap() else {
            panic!("expected base64 payload");
        };
        assert_eq!(read.bytes().unwrap(), vec![0, 1, 2, 255]);
        assert_eq!(read.bytes().unwrap(), vec![0, 1, 2, 255]);

        event.bindings().put("day", "not a date");
        assert!(matches!(event.get("day"), Err(AccessError::Format(_))));
        assert!(matches!(
            event.set("set_day", "1999-05-22"),
            Err(AccessError::WrongKind { .. })
        ));
    }

    #[test]
    fn test_union_qualified_accessors() {
        let (driver, set) = synthesize(
            "Holder",
            r##"{"properties": {"value": {"oneOf": [
                    {"$ref": "#/definitions/A"},
                    {"$ref": "#/definitions/B"}]}},
                "definitions": {
                    "A": {"properties": {"a": {"type": "string"}}, "required": ["a"],
                          "additionalProperties": false},
                    "B": {"properties": {"b": {"type": "integer"}}, "required": ["b"],
                          "additionalProperties": false}}}"##,
        );
        let graph = driver.graph();
        let holder = DynamicObject::new(&set, graph, "Holder").unwrap();
        let a = DynamicObject::create(&set, graph, "A", vec!["x".into()]).unwrap();
        let b = DynamicObject::create(&set, graph, "B", vec![7i64.into()]).unwrap();

        holder.set("set_value_as_a", a.bindings().clone()).unwrap();
        let value = holder.get("value").unwrap().unwrap();
        assert!(value.as_bindings().unwrap().ptr_eq(a.bindings()));
        assert!(holder.get("value_as_a").unwrap().is_some());
        assert!(holder.get("value_as_b").unwrap().is_none());

        holder.set("set_value_as_b", b.bindings().clone()).unwrap();
        let value = holder.get("value").unwrap().unwrap();
        assert!(value.as_bindings().unwrap().ptr_eq(b.bindings()));
        assert!(holder.get("value_as_a").unwrap().is_none());
        assert!(holder.get("value_as_b").unwrap().is_some());
    }

    #[test]
    fn test_overlapping_objects_follow_last_setter() {
        let (driver, set) = synthesize(
            "Holder",
            r##"{"properties": {"v": {"oneOf": [
                    {"$ref": "#/definitions/A"},
                    {"$ref": "#/definitions/B"}]}},
                "definitions": {
                    "A": {"properties": {"a": {"type": "string"}}},
                    "B": {"properties": {"b": {"type": "string"}}}}}"##,
        );
        let graph = driver.graph();
        let holder = DynamicObject::new(&set, graph, "Holder").unwrap();
        let a = DynamicObject::new(&set, graph, "A").unwrap();
        let b = DynamicObject::new(&set, graph, "B").unwrap();

        holder.set("set_v_as_b", b.bindings().clone()).unwrap();
        assert!(holder.get("v_as_a").unwrap().is_none());
        assert!(holder.get("v_as_b").unwrap().is_some());

        holder.set("set_v_as_a", a.bindings().clone()).unwrap();
        let current = holder.get("v").unwrap().unwrap();
        assert!(current.as_bindings().unwrap().ptr_eq(a.bindings()));
        assert!(holder.get("v_as_a").unwrap().is_some());
        assert!(holder.get("v_as_b").unwrap().is_none());

        // A view over the same binding sees the same alternative
        let alias = DynamicObject::wrap(&set, graph, "Holder", holder.bindings().clone()).unwrap();
        assert!(alias.get("v_as_a").unwrap().is_some());
        assert!(alias.get("v_as_b").unwrap().is_none());
    }

    #[test]
    fn test_string_and_formatted_string_alternatives() {
        let (driver, set) = synthesize(
            "Entry",
            r#"{"properties": {"v": {"oneOf": [
                {"type": "string"},
                {"type": "string", "format": "date", "title": "Day"}]}}}"#,
        );
        let entry = DynamicObject::new(&set, driver.graph(), "Entry").unwrap();
        let day = NaiveDate::from_ymd_opt(1999, 5, 22).unwrap();

        entry.set("set_v_as_string", "1999-05-22").unwrap();
        assert_eq!(entry.get("v_as_string").unwrap(), Some("1999-05-22".into()));
        assert_eq!(entry.get("v_as_day").unwrap(), None);
        assert_eq!(entry.get("v").unwrap(), Some("1999-05-22".into()));

        entry.set("set_v_as_day", TypedValue::Date(day)).unwrap();
        assert_eq!(entry.get("v_as_string").unwrap(), None);
        assert_eq!(entry.get("v_as_day").unwrap(), Some(TypedValue::Date(day)));
        assert_eq!(entry.get("v").unwrap(), Some(TypedValue::Date(day)));

        // Writing outside the qualified setters drops the tag
        entry.bindings().put("v", "1999-05-22");
        assert_eq!(entry.get("v_as_day").unwrap(), Some(TypedValue::Date(day)));
    }

    #[test]
    fn test_integer_and_number_alternatives() {
        let (driver, set) = synthesize(
            "Measure",
            r#"{"properties": {"v": {"oneOf": [{"type": "integer"}, {"type": "number"}]}}}"#,
        );
        let measure = DynamicObject::new(&set, driver.graph(), "Measure").unwrap();

        measure.set("set_v_as_number", 2.0).unwrap();
        assert_eq!(measure.get("v_as_integer").unwrap(), None);
        assert_eq!(measure.get("v_as_number").unwrap(), Some(TypedValue::Number(2.0)));

        measure.set("set_v_as_integer", 2i64).unwrap();
        assert_eq!(measure.get("v_as_integer").unwrap(), Some(TypedValue::Integer(2)));
        assert_eq!(measure.get("v_as_number").unwrap(), None);
        assert_eq!(measure.get("v").unwrap(), Some(TypedValue::Integer(2)));

        let copy = measure.copy().unwrap();
        assert_eq!(copy.get("v_as_integer").unwrap(), Some(TypedValue::Integer(2)));
    }

    #[test]
    fn test_generic_access_policies() {
        let (driver, set) = synthesize(
            "Open",
            r#"{"properties": {"a": {"type": "string"}}}"#,
        );
        let open = DynamicObject::new(&set, driver.graph(), "Open").unwrap();
        open.put_any("anything", 1i64).unwrap();
        assert_eq!(open.get_any("anything").unwrap(), Some(Value::Integer(1)));

        let (driver, set) = synthesize(
            "Closed",
            r#"{"properties": {"a": {"type": "string"}}, "additionalProperties": false}"#,
        );
        let closed = DynamicObject::new(&set, driver.graph(), "Closed").unwrap();
        assert!(matches!(
            closed.put_any("a", "x"),
            Err(AccessError::NoGenericAccess { .. })
        ));

        let (driver, set) = synthesize(
            "Tagged",
            r#"{"properties": {"a": {"type": "string"}},
                "patternProperties": {"^x-": {"type": "string"}}}"#,
        );
        let tagged = DynamicObject::new(&set, driver.graph(), "Tagged").unwrap();
        tagged.put_any("x-trace", "1").unwrap();
        tagged.put_any("a", "declared").unwrap();
        assert!(matches!(
            tagged.put_any("other", "2"),
            Err(AccessError::RejectedKey { .. })
        ));
    }

    #[test]
    fn test_builder_and_copy() {
        let (driver, set) = synthesize(
            "Order",
            r#"{"properties": {
                "id": {"type": "string"},
                "qty": {"type": "integer"},
                "note": {"type": "string"}},
                "required": ["id", "qty"]}"#,
        );
        let graph = driver.graph();
        let order = DynamicObject::builder(&set, graph, "Order", vec!["o-1".into(), 3i64.into()])
            .unwrap()
            .with("with_note", "rush")
            .unwrap()
            .build();
        assert_eq!(
            order.to_canonical_text(),
            r#"{"id":"o-1","qty":3,"note":"rush"}"#
        );
        assert!(matches!(
            DynamicObject::builder(&set, graph, "Order", vec!["o-2".into()]),
            Err(AccessError::MissingRequired { property, .. }) if property == "qty"
        ));

        let copy = order.copy().unwrap();
        copy.set("set_note", "later").unwrap();
        assert_eq!(order.get("note").unwrap(), Some("rush".into()));
        assert_eq!(copy.get("note").unwrap(), Some("later".into()));
    }

    #[test]
    fn test_structural_view_shares_bindings() {
        let (driver, set) = synthesize(
            "Catalog",
            r##"{"properties": {"wide": {"$ref": "#/definitions/X"}},
                "definitions": {
                    "X": {"properties": {"a": {"type": "string"}, "b": {"type": "string"},
                        "c": {"type": "string"}}},
                    "Y": {"properties": {"a": {"type": "string"}, "b": {"type": "string"}}}}}"##,
        );
        let x = DynamicObject::new(&set, driver.graph(), "X").unwrap();
        let y = x.view_as("Y").unwrap();
        x.set("set_a", "through x").unwrap();
        assert_eq!(y.get("a").unwrap(), Some("through x".into()));
        y.set("set_b", "through y").unwrap();
        assert_eq!(x.get("b").unwrap(), Some("through y".into()));
        assert!(y.bindings().ptr_eq(x.bindings()));
        assert!(matches!(y.get("c"), Err(AccessError::UnknownAccessor { .. })));

        let plain = DynamicObject::new(&set, driver.graph(), "Y").unwrap();
        assert!(matches!(
            plain.view_as("X"),
            Err(AccessError::ViewNotSatisfied { .. })
        ));
    }

    #[test]
    fn test_positional_list_elements() {
        let (driver, set) = synthesize(
            "Row",
            r#"{"type": "array", "items": [{"type": "string"}, {"type": "integer"}]}"#,
        );
        let row = DynamicList::wrap(
            &set,
            driver.graph(),
            "Row",
            vec![Value::from("label"), Value::Integer(42)],
        )
        .unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row.element("get_as_string", 0).unwrap(), Some("label".into()));
        assert_eq!(row.element("get_as_integer", 1).unwrap(), Some(TypedValue::Integer(42)));
        assert_eq!(row.element("get_as_integer", 0).unwrap(), None);
        assert_eq!(row.element("get_as_string", 5).unwrap(), None);
    }
}
