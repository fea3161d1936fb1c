use serde::ser::{Serialize, Serializer};
use smol_str::SmolStr;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::error::FieldError;
use crate::message::Message;
use crate::types::FieldNumber;

// ─── ByteString ─────────────────────────────────────────────────────────────

/// Immutable byte payload. Clones share the same allocation.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ByteString(Rc<[u8]>);

impl ByteString {
    pub fn new(bytes: &[u8]) -> Self {
        ByteString(Rc::from(bytes))
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ByteString {
    fn default() -> Self {
        ByteString::new(&[])
    }
}

impl fmt::Debug for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteString({:?})", &*self.0)
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(bytes: Vec<u8>) -> Self {
        ByteString(Rc::from(bytes))
    }
}

impl From<&[u8]> for ByteString {
    fn from(bytes: &[u8]) -> Self {
        ByteString::new(bytes)
    }
}

// ─── Value ──────────────────────────────────────────────────────────────────

/// A single stored scalar. Nested messages and bytes are shared by reference.
///
/// Enum fields hold either `Enum(number)` for a constant the generated enum
/// declares, or `I32(number)` for a wire value it does not know. Readers map
/// the latter to a caller-supplied sentinel (see [`ProtoEnum`]).
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(SmolStr),
    Bytes(ByteString),
    Enum(i32),
    Message(Message),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::I32(_) => "int32",
            Value::I64(_) => "int64",
            Value::U32(_) => "uint32",
            Value::U64(_) => "uint64",
            Value::F32(_) => "float",
            Value::F64(_) => "double",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Enum(_) => "enum",
            Value::Message(_) => "message",
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Value::Message(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

// Floats compare by bit pattern so that equality agrees with `Hash`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a.to_bits() == b.to_bits(),
            (Value::F64(a), Value::F64(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Message(a), Value::Message(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Bool(b) => b.hash(state),
            Value::I32(i) | Value::Enum(i) => i.hash(state),
            Value::I64(i) => i.hash(state),
            Value::U32(u) => u.hash(state),
            Value::U64(u) => u.hash(state),
            Value::F32(f) => f.to_bits().hash(state),
            Value::F64(f) => f.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::Message(m) => m.hash(state),
        }
    }
}

// ─── Serialize (debug dumps) ────────────────────────────────────────────────

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::I32(i) | Value::Enum(i) => serializer.serialize_i32(*i),
            Value::I64(i) => serializer.serialize_i64(*i),
            Value::U32(u) => serializer.serialize_u32(*u),
            Value::U64(u) => serializer.serialize_u64(*u),
            Value::F32(f) => serializer.serialize_f32(*f),
            Value::F64(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s.as_str()),
            Value::Bytes(b) => serializer.serialize_bytes(b.as_slice()),
            Value::Message(m) => m.serialize(serializer),
        }
    }
}

// ─── MapKey ─────────────────────────────────────────────────────────────────

/// The scalar kinds a map field may be keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapKey {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    Str(SmolStr),
}

impl MapKey {
    /// Narrow a decoded value to a key. Floats, bytes, enums and messages
    /// cannot key a map.
    pub fn from_value(field: FieldNumber, value: Value) -> Result<Self, FieldError> {
        match value {
            Value::Bool(b) => Ok(MapKey::Bool(b)),
            Value::I32(i) => Ok(MapKey::I32(i)),
            Value::I64(i) => Ok(MapKey::I64(i)),
            Value::U32(u) => Ok(MapKey::U32(u)),
            Value::U64(u) => Ok(MapKey::U64(u)),
            Value::Str(s) => Ok(MapKey::Str(s)),
            _ => Err(FieldError::invalid(field, "value kind cannot be used as a map key")),
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Bool(b) => write!(f, "{b}"),
            MapKey::I32(i) => write!(f, "{i}"),
            MapKey::I64(i) => write!(f, "{i}"),
            MapKey::U32(u) => write!(f, "{u}"),
            MapKey::U64(u) => write!(f, "{u}"),
            MapKey::Str(s) => f.write_str(s),
        }
    }
}

impl From<MapKey> for Value {
    fn from(key: MapKey) -> Self {
        match key {
            MapKey::Bool(b) => Value::Bool(b),
            MapKey::I32(i) => Value::I32(i),
            MapKey::I64(i) => Value::I64(i),
            MapKey::U32(u) => Value::U32(u),
            MapKey::U64(u) => Value::U64(u),
            MapKey::Str(s) => Value::Str(s),
        }
    }
}

macro_rules! map_key_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for MapKey {
                fn from(v: $ty) -> Self {
                    MapKey::$variant(v.into())
                }
            }
        )*
    };
}

map_key_from! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    u32 => U32,
    u64 => U64,
    SmolStr => Str,
    &str => Str,
    String => Str,
}

// ─── FieldType ──────────────────────────────────────────────────────────────

/// Typed boundary over the erased [`Value`].
///
/// `from_value` is the checked downcast used by every typed read; `None`
/// means the stored value is of a different kind.
pub trait FieldType: Clone + Sized {
    fn from_value(value: &Value) -> Option<Self>;
    fn into_value(self) -> Value;
    /// Returned by unchecked-mode reads that fall outside a list.
    fn zero() -> Self;
}

macro_rules! scalar_field_type {
    ($($ty:ty => $variant:ident, $zero:expr);* $(;)?) => {
        $(
            impl FieldType for $ty {
                #[inline]
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }

                #[inline]
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                #[inline]
                fn zero() -> Self {
                    $zero
                }
            }
        )*
    };
}

scalar_field_type! {
    bool => Bool, false;
    i64 => I64, 0;
    u32 => U32, 0;
    u64 => U64, 0;
    f32 => F32, 0.0;
    f64 => F64, 0.0;
    SmolStr => Str, SmolStr::default();
    ByteString => Bytes, ByteString::default();
    Message => Message, Message::empty();
}

// Enums travel as int32 on the wire, so the raw numeric view accepts both.
impl FieldType for i32 {
    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::I32(i) | Value::Enum(i) => Some(*i),
            _ => None,
        }
    }

    #[inline]
    fn into_value(self) -> Value {
        Value::I32(self)
    }

    #[inline]
    fn zero() -> Self {
        0
    }
}

impl FieldType for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }

    fn into_value(self) -> Value {
        Value::Str(SmolStr::from(self))
    }

    fn zero() -> Self {
        String::new()
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl<T: FieldType> From<T> for Value {
    fn from(v: T) -> Self {
        v.into_value()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(SmolStr::from(s))
    }
}

// ─── ProtoEnum ──────────────────────────────────────────────────────────────

/// Implemented by generated enum types.
///
/// A generated enum may carry a placeholder constant (e.g. `Unrecognized`)
/// that `from_number` never yields; it is only handed back to readers when
/// the stored number is unknown.
pub trait ProtoEnum: Copy + Sized {
    /// The schema default (first declared value).
    const DEFAULT: Self;

    fn number(self) -> i32;
    fn from_number(number: i32) -> Option<Self>;

    /// Placeholder for numbers this enum does not declare, if it has one.
    fn unrecognized() -> Option<Self> {
        None
    }
}

/// Storage form for an enum wire number: a constant when `E` declares it, the
/// raw integer otherwise.
pub fn enum_value_for_number<E: ProtoEnum>(number: i32) -> Value {
    if E::from_number(number).is_some() {
        Value::Enum(number)
    } else {
        Value::I32(number)
    }
}

/// Storage form for a declared constant. Rejects placeholders that do not
/// round-trip through `from_number`.
pub(crate) fn enum_to_value<E: ProtoEnum>(field: FieldNumber, value: E) -> Result<Value, FieldError> {
    let number = value.number();
    match E::from_number(number) {
        Some(_) => Ok(Value::Enum(number)),
        None => Err(FieldError::invalid(
            field,
            "can't store the number of an unrecognized enum value",
        )),
    }
}

/// `None` when the stored value is not an enum at all.
pub(crate) fn enum_or_unrecognized<E: ProtoEnum>(value: &Value, unrecognized: E) -> Option<E> {
    match value {
        Value::Enum(n) => Some(E::from_number(*n).unwrap_or(unrecognized)),
        Value::I32(_) => Some(unrecognized),
        _ => None,
    }
}

pub(crate) fn enum_number(value: &Value) -> Option<i32> {
    match value {
        Value::Enum(n) | Value::I32(n) => Some(*n),
        _ => None,
    }
}
