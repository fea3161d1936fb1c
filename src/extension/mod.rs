//! Typed handles for fields declared outside a message's own schema.
//!
//! An extension is nothing more than a field number plus converters between
//! the host type and the stored [`Value`]; reads and writes go through the
//! same store as regular fields (see [`FieldReader`](crate::FieldReader) and
//! [`Builder`](crate::Builder)).

pub mod numeric;

use crate::types::FieldNumber;
use crate::value::{FieldType, ProtoEnum, Value, enum_or_unrecognized, enum_value_for_number};

/// Anything that names a field number in a message's store.
pub trait ExtensionDescriptor {
    fn number(&self) -> FieldNumber;
}

// ─── Extension ──────────────────────────────────────────────────────────────

/// A singular extension. `read` returning `None` means the stored value does
/// not have the shape this extension expects.
pub struct Extension<T> {
    number: FieldNumber,
    default: T,
    read: fn(&Value) -> Option<T>,
    write: fn(T) -> Value,
}

impl<T> Extension<T> {
    pub const fn with_converters(
        number: FieldNumber,
        default: T,
        read: fn(&Value) -> Option<T>,
        write: fn(T) -> Value,
    ) -> Self {
        Extension {
            number,
            default,
            read,
            write,
        }
    }

    #[inline]
    pub fn default_value(&self) -> &T {
        &self.default
    }

    #[inline]
    pub(crate) fn read(&self, value: &Value) -> Option<T> {
        (self.read)(value)
    }

    #[inline]
    pub(crate) fn write(&self, value: T) -> Value {
        (self.write)(value)
    }
}

impl<T: FieldType> Extension<T> {
    /// Stored as-is, no conversion.
    pub const fn new(number: FieldNumber, default: T) -> Self {
        Self::with_converters(number, default, T::from_value, T::into_value)
    }
}

impl<E: ProtoEnum> Extension<E> {
    /// Unknown stored numbers read as the enum's placeholder, if it has one.
    pub const fn enumeration(number: FieldNumber, default: E) -> Self {
        Self::with_converters(number, default, read_enum::<E>, write_enum::<E>)
    }
}

impl<T> ExtensionDescriptor for Extension<T> {
    #[inline]
    fn number(&self) -> FieldNumber {
        self.number
    }
}

// ─── RepeatedExtension ──────────────────────────────────────────────────────

/// A repeated extension. Converters apply per element; the default is the
/// empty list.
pub struct RepeatedExtension<T> {
    number: FieldNumber,
    read: fn(&Value) -> Option<T>,
    write: fn(T) -> Value,
    fallback: fn() -> T,
}

impl<T> RepeatedExtension<T> {
    /// `fallback` supplies the element returned by unchecked out-of-range
    /// reads.
    pub const fn with_converters(
        number: FieldNumber,
        read: fn(&Value) -> Option<T>,
        write: fn(T) -> Value,
        fallback: fn() -> T,
    ) -> Self {
        RepeatedExtension {
            number,
            read,
            write,
            fallback,
        }
    }

    #[inline]
    pub(crate) fn read(&self, value: &Value) -> Option<T> {
        (self.read)(value)
    }

    #[inline]
    pub(crate) fn write(&self, value: T) -> Value {
        (self.write)(value)
    }

    #[inline]
    pub(crate) fn fallback(&self) -> T {
        (self.fallback)()
    }
}

impl<T: FieldType> RepeatedExtension<T> {
    pub const fn new(number: FieldNumber) -> Self {
        Self::with_converters(number, T::from_value, T::into_value, T::zero)
    }
}

impl<E: ProtoEnum> RepeatedExtension<E> {
    pub const fn enumeration(number: FieldNumber) -> Self {
        Self::with_converters(number, read_enum::<E>, write_enum::<E>, enum_fallback::<E>)
    }
}

impl<T> ExtensionDescriptor for RepeatedExtension<T> {
    #[inline]
    fn number(&self) -> FieldNumber {
        self.number
    }
}

// ─── Enum converters ────────────────────────────────────────────────────────

fn read_enum<E: ProtoEnum>(value: &Value) -> Option<E> {
    match E::unrecognized() {
        Some(placeholder) => enum_or_unrecognized(value, placeholder),
        None => match value {
            Value::Enum(n) | Value::I32(n) => E::from_number(*n),
            _ => None,
        },
    }
}

fn write_enum<E: ProtoEnum>(value: E) -> Value {
    enum_value_for_number::<E>(value.number())
}

fn enum_fallback<E: ProtoEnum>() -> E {
    E::unrecognized().unwrap_or(E::DEFAULT)
}
