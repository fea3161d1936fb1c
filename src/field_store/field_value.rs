use rustc_hash::FxHasher;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::hash::{Hash, Hasher};

use crate::types::FastMap;
use crate::value::{MapKey, Value};

/// What a single field number holds.
///
/// Containers are owned, so cloning a `FieldValue` duplicates repeated and map
/// contents while scalars inside stay shared (see [`Value`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(Value),
    Repeated(Vec<Value>),
    Map(FastMap<MapKey, Value>),
}

impl FieldValue {
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Scalar(_) => "scalar",
            FieldValue::Repeated(_) => "repeated",
            FieldValue::Map(_) => "map",
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            FieldValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_repeated(&self) -> Option<&[Value]> {
        match self {
            FieldValue::Repeated(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&FastMap<MapKey, Value>> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        FieldValue::Scalar(v)
    }
}

impl Hash for FieldValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FieldValue::Scalar(v) => v.hash(state),
            FieldValue::Repeated(list) => list.hash(state),
            FieldValue::Map(map) => {
                // Iteration order is arbitrary; combine entries commutatively.
                let mut combined = 0u64;
                for (k, v) in map {
                    let mut h = FxHasher::default();
                    k.hash(&mut h);
                    v.hash(&mut h);
                    combined = combined.wrapping_add(h.finish());
                }
                state.write_usize(map.len());
                state.write_u64(combined);
            }
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Scalar(v) => v.serialize(serializer),
            FieldValue::Repeated(list) => {
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for v in list {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            FieldValue::Map(map) => {
                let mut entries: Vec<(&MapKey, &Value)> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                let mut m = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    m.serialize_entry(&k.to_string(), v)?;
                }
                m.end()
            }
        }
    }
}
