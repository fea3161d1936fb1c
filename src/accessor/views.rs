use std::marker::PhantomData;

use super::read_op::{map_of, read_element, repeated_slice};
use crate::config::AccessMode;
use crate::error::FieldError;
use crate::field_store::{FieldValue, SharedStore};
use crate::types::{FastMap, FieldNumber};
use crate::value::{FieldType, MapKey, ProtoEnum, Value, enum_or_unrecognized};

// ─── ListView ───────────────────────────────────────────────────────────────

/// Read-only projection of a repeated field.
///
/// Every call re-reads the store by field number, so writes made through the
/// owning builder after the view was taken are visible. Removing the field
/// makes the view read as empty.
#[derive(Clone)]
pub struct ListView<T> {
    store: SharedStore,
    field: FieldNumber,
    mode: AccessMode,
    _marker: PhantomData<fn() -> T>,
}

impl<T: FieldType> ListView<T> {
    pub(crate) fn new(store: SharedStore, field: FieldNumber, mode: AccessMode) -> Self {
        ListView {
            store,
            field,
            mode,
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        let store = self.store.borrow();
        repeated_slice(&store, self.field).map_or(0, <[_]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Result<T, FieldError> {
        read_element(&self.store.borrow(), self.mode, self.field, index, T::from_value, T::zero)
    }

    pub fn iter(&self) -> ListIter<'_, Self> {
        ListIter { view: self, pos: 0 }
    }

    pub fn to_vec(&self) -> Result<Vec<T>, FieldError> {
        self.iter().collect()
    }
}

// ─── EnumListView ───────────────────────────────────────────────────────────

/// Like [`ListView`], mapping unknown wire numbers to `unrecognized` on each
/// access.
#[derive(Clone)]
pub struct EnumListView<E> {
    store: SharedStore,
    field: FieldNumber,
    mode: AccessMode,
    unrecognized: E,
}

impl<E: ProtoEnum> EnumListView<E> {
    pub(crate) fn new(store: SharedStore, field: FieldNumber, mode: AccessMode, unrecognized: E) -> Self {
        EnumListView {
            store,
            field,
            mode,
            unrecognized,
        }
    }

    pub fn len(&self) -> usize {
        let store = self.store.borrow();
        repeated_slice(&store, self.field).map_or(0, <[_]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Result<E, FieldError> {
        let unrecognized = self.unrecognized;
        read_element(
            &self.store.borrow(),
            self.mode,
            self.field,
            index,
            |v| enum_or_unrecognized(v, unrecognized),
            || unrecognized,
        )
    }

    pub fn iter(&self) -> ListIter<'_, Self> {
        ListIter { view: self, pos: 0 }
    }

    pub fn to_vec(&self) -> Result<Vec<E>, FieldError> {
        self.iter().collect()
    }
}

// ─── Iterator ───────────────────────────────────────────────────────────────

/// Index-based walk over a live list; the length is re-read on every step.
pub struct ListIter<'a, V> {
    view: &'a V,
    pos: usize,
}

impl<'a, T: FieldType> Iterator for ListIter<'a, ListView<T>> {
    type Item = Result<T, FieldError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.view.len() {
            return None;
        }
        let item = self.view.get(self.pos);
        self.pos += 1;
        Some(item)
    }
}

impl<'a, E: ProtoEnum> Iterator for ListIter<'a, EnumListView<E>> {
    type Item = Result<E, FieldError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.view.len() {
            return None;
        }
        let item = self.view.get(self.pos);
        self.pos += 1;
        Some(item)
    }
}

// ─── MapView ────────────────────────────────────────────────────────────────

/// Read-only projection of a map field. Lookups read the live map.
#[derive(Clone)]
pub struct MapView<V> {
    store: SharedStore,
    field: FieldNumber,
    _marker: PhantomData<fn() -> V>,
}

impl<V: FieldType> MapView<V> {
    pub(crate) fn new(store: SharedStore, field: FieldNumber) -> Self {
        MapView {
            store,
            field,
            _marker: PhantomData,
        }
    }

    fn with_map<R>(&self, f: impl FnOnce(Option<&FastMap<MapKey, Value>>) -> R) -> R {
        let store = self.store.borrow();
        f(store.get(self.field).and_then(FieldValue::as_map))
    }

    pub fn len(&self) -> usize {
        self.with_map(|m| m.map_or(0, |m| m.len()))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: impl Into<MapKey>) -> bool {
        let key = key.into();
        self.with_map(|m| m.is_some_and(|m| m.contains_key(&key)))
    }

    pub fn get(&self, key: impl Into<MapKey>) -> Result<Option<V>, FieldError> {
        let key = key.into();
        let store = self.store.borrow();
        match map_of(&store, self.field)?.and_then(|m| m.get(&key)) {
            Some(v) => V::from_value(v)
                .map(Some)
                .ok_or(FieldError::invalid(self.field, "stored value has a different type")),
            None => Ok(None),
        }
    }

    /// All entries, sorted by key.
    pub fn entries(&self) -> Result<Vec<(MapKey, V)>, FieldError> {
        let field = self.field;
        let store = self.store.borrow();
        let mut entries = map_of(&store, field)?
            .into_iter()
            .flatten()
            .map(|(k, v)| {
                V::from_value(v)
                    .map(|v| (k.clone(), v))
                    .ok_or(FieldError::invalid(field, "stored value has a different type"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }
}
