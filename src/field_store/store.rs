use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};
use tracing::trace;

use super::FieldValue;
use crate::error::FieldError;
use crate::types::{FastMap, FieldIter, FieldNumber};
use crate::value::{MapKey, Value};

/// Slots allocated up front so that the first few writes don't reallocate.
const INITIAL_SLOTS: usize = 5;

// ─── Layout ─────────────────────────────────────────────────────────────────
//
//   field numbers   1 ........ pivot-1 | pivot ........ ∞
//                   ┌──────────────────┐ ┌────────────────────┐
//   storage         │ indexed slots    │ │ expansion map      │
//                   │ slot = n - 1     │ │ created on demand  │
//                   └──────────────────┘ └────────────────────┘
//
// `size` is one past the highest slot ever written. Slots at or beyond `size`
// are always `None`; removal clears a slot without shrinking `size`.

/// Where a field number lives. Decided purely by the pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Indexed(usize),
    Expanded,
}

/// Sparse, hybrid-indexed storage for one message instance.
pub struct FieldStore {
    pivot: FieldNumber,
    size: usize,
    array: Vec<Option<FieldValue>>,
    expansion: Option<FastMap<FieldNumber, FieldValue>>,
}

impl FieldStore {
    // ════════════════════════════════════════════════════════════════════════
    // Construction
    // ════════════════════════════════════════════════════════════════════════

    /// Create an empty store. Field numbers below `pivot` use indexed slots,
    /// the rest go to the expansion map. A pivot of 0 is treated as 1.
    pub fn new(pivot: FieldNumber) -> Self {
        let pivot = pivot.max(1);
        let slots = INITIAL_SLOTS.min(Self::max_slots(pivot));
        let mut array = Vec::with_capacity(slots);
        array.resize_with(slots, || None);
        FieldStore {
            pivot,
            size: 0,
            array,
            expansion: None,
        }
    }

    #[inline]
    pub fn pivot(&self) -> FieldNumber {
        self.pivot
    }

    #[inline]
    fn max_slots(pivot: FieldNumber) -> usize {
        (pivot - 1) as usize
    }

    /// The store does not validate numbers; callers reject 0 before getting
    /// here. Were it to arrive it would simply key the expansion map.
    #[inline]
    fn locate(&self, field: FieldNumber) -> Slot {
        if field > 0 && field < self.pivot {
            Slot::Indexed((field - 1) as usize)
        } else {
            Slot::Expanded
        }
    }

    /// Grow the indexed slots to hold at least `needed` entries, by half again
    /// each time but never past the pivot.
    fn ensure_capacity(&mut self, needed: usize) {
        let old = self.array.len();
        if needed <= old {
            return;
        }
        let grown = needed.max(old + (old >> 1)) + 1;
        let new_len = grown.min(Self::max_slots(self.pivot));
        self.array.resize_with(new_len, || None);
    }

    #[inline]
    fn expansion_mut(&mut self) -> &mut FastMap<FieldNumber, FieldValue> {
        self.expansion.get_or_insert_with(FastMap::default)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Reads
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn get(&self, field: FieldNumber) -> Option<&FieldValue> {
        match self.locate(field) {
            Slot::Indexed(i) if i < self.size => self.array[i].as_ref(),
            Slot::Indexed(_) => None,
            Slot::Expanded => self.expansion.as_ref()?.get(&field),
        }
    }

    /// The stored value, or `default` when the field is absent.
    #[inline]
    pub fn get_or<'a>(&'a self, field: FieldNumber, default: &'a FieldValue) -> &'a FieldValue {
        self.get(field).unwrap_or(default)
    }

    #[inline]
    pub fn has(&self, field: FieldNumber) -> bool {
        self.get(field).is_some()
    }

    pub fn get_mut(&mut self, field: FieldNumber) -> Option<&mut FieldValue> {
        match self.locate(field) {
            Slot::Indexed(i) if i < self.size => self.array[i].as_mut(),
            Slot::Indexed(_) => None,
            Slot::Expanded => self.expansion.as_mut()?.get_mut(&field),
        }
    }

    /// Number of populated fields.
    pub fn len(&self) -> usize {
        let indexed = self.array[..self.size].iter().filter(|s| s.is_some()).count();
        indexed + self.expansion.as_ref().map_or(0, |m| m.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Populated fields: indexed ones in ascending order, then expansion
    /// entries in arbitrary order.
    pub fn iter(&self) -> FieldIter<'_> {
        FieldIter {
            indexed: self.array[..self.size].iter().enumerate(),
            expanded: self.expansion.as_ref().map(|m| m.iter()),
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Writes
    // ════════════════════════════════════════════════════════════════════════

    /// Unconditional overwrite.
    pub fn put(&mut self, field: FieldNumber, value: FieldValue) {
        match self.locate(field) {
            Slot::Indexed(i) => {
                self.ensure_capacity(i + 1);
                self.array[i] = Some(value);
                self.size = self.size.max(i + 1);
            }
            Slot::Expanded => {
                self.expansion_mut().insert(field, value);
            }
        }
    }

    /// Clear a field. Indexed slots are emptied in place.
    pub fn remove(&mut self, field: FieldNumber) -> Option<FieldValue> {
        match self.locate(field) {
            Slot::Indexed(i) if i < self.size => self.array[i].take(),
            Slot::Indexed(_) => None,
            Slot::Expanded => self.expansion.as_mut()?.remove(&field),
        }
    }

    fn ensure_with(&mut self, field: FieldNumber, init: fn() -> FieldValue) -> &mut FieldValue {
        match self.locate(field) {
            Slot::Indexed(i) => {
                self.ensure_capacity(i + 1);
                self.size = self.size.max(i + 1);
                let slot = &mut self.array[i];
                if slot.is_none() {
                    trace!(field, "materializing empty container");
                }
                slot.get_or_insert_with(init)
            }
            Slot::Expanded => self.expansion_mut().entry(field).or_insert_with(|| {
                trace!(field, "materializing empty container");
                init()
            }),
        }
    }

    /// The live list for `field`, created empty on first use.
    pub fn ensure_repeated(&mut self, field: FieldNumber) -> Result<&mut Vec<Value>, FieldError> {
        match self.ensure_with(field, || FieldValue::Repeated(Vec::new())) {
            FieldValue::Repeated(list) => Ok(list),
            _ => Err(FieldError::invalid(field, "field does not hold a repeated value")),
        }
    }

    /// The live map for `field`, created empty on first use.
    pub fn ensure_map(
        &mut self,
        field: FieldNumber,
    ) -> Result<&mut FastMap<MapKey, Value>, FieldError> {
        match self.ensure_with(field, || FieldValue::Map(FastMap::default())) {
            FieldValue::Map(map) => Ok(map),
            _ => Err(FieldError::invalid(field, "field does not hold a map value")),
        }
    }

    /// Independent copy: containers are duplicated, scalars shared.
    pub fn copy(&self) -> FieldStore {
        trace!(pivot = self.pivot, slots = self.size, "copying field store");
        FieldStore {
            pivot: self.pivot,
            size: self.size,
            array: self.array[..self.size].to_vec(),
            expansion: self.expansion.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn indexed_slots(&self) -> (usize, usize) {
        (self.size, self.array.len())
    }

    #[cfg(test)]
    pub(crate) fn has_expansion(&self) -> bool {
        self.expansion.is_some()
    }
}

impl Clone for FieldStore {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl std::fmt::Debug for FieldStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut entries: Vec<(FieldNumber, &FieldValue)> = self.iter().collect();
        entries.sort_by_key(|(n, _)| *n);
        f.debug_map().entries(entries).finish()
    }
}

// ─── Equality & hashing ─────────────────────────────────────────────────────
//
// Both look only at populated entries, so slot growth, trailing cleared slots,
// an empty expansion map and the pivot itself never affect the outcome.

impl PartialEq for FieldStore {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(n, v)| other.get(n) == Some(v))
    }
}

impl Eq for FieldStore {}

impl Hash for FieldStore {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut combined = 0u64;
        for (n, v) in self.iter() {
            let mut h = FxHasher::default();
            n.hash(&mut h);
            v.hash(&mut h);
            combined = combined.wrapping_add(h.finish());
        }
        state.write_u64(combined);
    }
}
