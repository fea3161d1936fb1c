use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;

use crate::field_store::FieldValue;

/// Positive field identifier from the schema.
pub type FieldNumber = u32;

pub type FastMap<K, V> = std::collections::HashMap<K, V, BuildHasherDefault<FxHasher>>;

// ─── Iterator ───────────────────────────────────────────────────────────────

/// Populated entries of a [`FieldStore`](crate::field_store::FieldStore).
pub struct FieldIter<'a> {
    pub(crate) indexed: std::iter::Enumerate<std::slice::Iter<'a, Option<FieldValue>>>,
    pub(crate) expanded: Option<std::collections::hash_map::Iter<'a, FieldNumber, FieldValue>>,
}

impl<'a> Iterator for FieldIter<'a> {
    type Item = (FieldNumber, &'a FieldValue);

    fn next(&mut self) -> Option<Self::Item> {
        for (i, slot) in self.indexed.by_ref() {
            if let Some(value) = slot {
                return Some((i as FieldNumber + 1, value));
            }
        }
        let (n, value) = self.expanded.as_mut()?.next()?;
        Some((*n, value))
    }
}
