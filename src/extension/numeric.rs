//! Converters for hosts that keep every number in one wide type.
//!
//! The store still distinguishes 32-bit floats, 32-bit ints and 64-bit ints;
//! these extensions present all of them as `f64` and narrow on every write.
//!
//! Narrowing follows `as` casts. Integer targets truncate toward zero and
//! saturate at their bounds, and NaN stores `0`. The `f32` target rounds to
//! nearest and overflows to infinity. No write reports an error.

use super::{Extension, RepeatedExtension};
use crate::types::FieldNumber;
use crate::value::Value;

pub fn read_f32_widened(value: &Value) -> Option<f64> {
    match value {
        Value::F32(f) => Some(f64::from(*f)),
        _ => None,
    }
}

pub fn write_f32_narrowed(value: f64) -> Value {
    Value::F32(value as f32)
}

pub fn read_i32_widened(value: &Value) -> Option<f64> {
    match value {
        Value::I32(i) => Some(f64::from(*i)),
        _ => None,
    }
}

pub fn write_i32_narrowed(value: f64) -> Value {
    Value::I32(value as i32)
}

pub fn read_i64_widened(value: &Value) -> Option<f64> {
    match value {
        Value::I64(i) => Some(*i as f64),
        _ => None,
    }
}

pub fn write_i64_narrowed(value: f64) -> Value {
    Value::I64(value as i64)
}

fn zero() -> f64 {
    0.0
}

impl Extension<f64> {
    pub const fn float_as_f64(number: FieldNumber, default: f64) -> Self {
        Self::with_converters(number, default, read_f32_widened, write_f32_narrowed)
    }

    pub const fn int32_as_f64(number: FieldNumber, default: f64) -> Self {
        Self::with_converters(number, default, read_i32_widened, write_i32_narrowed)
    }

    pub const fn int64_as_f64(number: FieldNumber, default: f64) -> Self {
        Self::with_converters(number, default, read_i64_widened, write_i64_narrowed)
    }
}

impl RepeatedExtension<f64> {
    pub const fn float_as_f64(number: FieldNumber) -> Self {
        Self::with_converters(number, read_f32_widened, write_f32_narrowed, zero)
    }

    pub const fn int32_as_f64(number: FieldNumber) -> Self {
        Self::with_converters(number, read_i32_widened, write_i32_narrowed, zero)
    }

    pub const fn int64_as_f64(number: FieldNumber) -> Self {
        Self::with_converters(number, read_i64_widened, write_i64_narrowed, zero)
    }
}
