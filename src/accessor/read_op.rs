use std::cell::Ref;
use tracing::trace;

use super::views::{EnumListView, ListView, MapView};
use crate::config::AccessMode;
use crate::error::FieldError;
use crate::extension::{Extension, ExtensionDescriptor, RepeatedExtension};
use crate::field_store::{FieldStore, FieldValue, SharedStore};
use crate::types::{FastMap, FieldNumber};
use crate::value::{FieldType, MapKey, ProtoEnum, Value, enum_number, enum_or_unrecognized};

// ─── Shared helpers ─────────────────────────────────────────────────────────

/// The list stored at `field`; an absent field reads as empty.
pub(crate) fn repeated_slice(store: &FieldStore, field: FieldNumber) -> Result<&[Value], FieldError> {
    FieldError::check_number(field)?;
    match store.get(field) {
        None => Ok(&[]),
        Some(FieldValue::Repeated(list)) => Ok(list),
        Some(_) => Err(FieldError::invalid(field, "field does not hold a repeated value")),
    }
}

/// Element read shared by the accessors, views and repeated extensions.
///
/// Out-of-range indexes fail in checked mode and produce `fallback()`
/// otherwise.
pub(crate) fn read_element<T>(
    store: &FieldStore,
    mode: AccessMode,
    field: FieldNumber,
    index: usize,
    read: impl FnOnce(&Value) -> Option<T>,
    fallback: impl FnOnce() -> T,
) -> Result<T, FieldError> {
    let list = repeated_slice(store, field)?;
    match list.get(index) {
        Some(v) => read(v).ok_or(FieldError::invalid(field, "stored element has a different type")),
        None if mode.is_checked() => Err(FieldError::IndexOutOfRange {
            field,
            index,
            len: list.len(),
        }),
        None => {
            trace!(field, index, len = list.len(), "out-of-range read, returning fallback");
            Ok(fallback())
        }
    }
}

fn scalar_mismatch(field: FieldNumber, found: &FieldValue) -> FieldError {
    match found {
        FieldValue::Scalar(_) => FieldError::invalid(field, "stored value has a different type"),
        _ => FieldError::invalid(field, "field does not hold a scalar value"),
    }
}

pub(crate) fn map_of(store: &FieldStore, field: FieldNumber) -> Result<Option<&FastMap<MapKey, Value>>, FieldError> {
    FieldError::check_number(field)?;
    match store.get(field) {
        None => Ok(None),
        Some(FieldValue::Map(map)) => Ok(Some(map)),
        Some(_) => Err(FieldError::invalid(field, "field does not hold a map value")),
    }
}

// ─── FieldReader ────────────────────────────────────────────────────────────

/// Schema-agnostic read access, shared by [`Message`](crate::Message) and
/// [`Builder`](crate::Builder). Generated getters forward here with their
/// field numbers.
///
/// Field number 0 is never stored. Fallible reads reject it with
/// `InvalidArgument`; presence and count queries report it absent.
pub trait FieldReader {
    fn shared_store(&self) -> &SharedStore;
    fn access_mode(&self) -> AccessMode;

    /// Borrow the underlying store. The borrow must be released before the
    /// owning builder is mutated.
    #[inline]
    fn fields(&self) -> Ref<'_, FieldStore> {
        self.shared_store().borrow()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Singular fields
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    fn has_field(&self, field: FieldNumber) -> bool {
        self.fields().has(field)
    }

    /// Raw stored scalar, whatever its kind.
    fn get_field_value(&self, field: FieldNumber) -> Option<Value> {
        self.fields().get(field)?.as_scalar().cloned()
    }

    fn get_field<T: FieldType>(&self, field: FieldNumber, default: T) -> Result<T, FieldError> {
        FieldError::check_number(field)?;
        match self.fields().get(field) {
            None => Ok(default),
            Some(FieldValue::Scalar(v)) => {
                T::from_value(v).ok_or(FieldError::invalid(field, "stored value has a different type"))
            }
            Some(other) => Err(scalar_mismatch(field, other)),
        }
    }

    /// Enum read: unknown wire numbers come back as `unrecognized`.
    fn get_field_for_enum<E: ProtoEnum>(
        &self,
        field: FieldNumber,
        default: E,
        unrecognized: E,
    ) -> Result<E, FieldError> {
        FieldError::check_number(field)?;
        match self.fields().get(field) {
            None => Ok(default),
            Some(FieldValue::Scalar(v)) => enum_or_unrecognized(v, unrecognized)
                .ok_or(FieldError::invalid(field, "stored value is not an enum")),
            Some(other) => Err(scalar_mismatch(field, other)),
        }
    }

    /// The wire number of an enum field, known to the enum or not.
    fn get_field_for_enum_value<E: ProtoEnum>(
        &self,
        field: FieldNumber,
        default: E,
    ) -> Result<i32, FieldError> {
        FieldError::check_number(field)?;
        match self.fields().get(field) {
            None => Ok(default.number()),
            Some(FieldValue::Scalar(v)) => {
                enum_number(v).ok_or(FieldError::invalid(field, "stored value is not an enum"))
            }
            Some(other) => Err(scalar_mismatch(field, other)),
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Repeated fields
    // ════════════════════════════════════════════════════════════════════════

    /// Live read-only view; later writes through the owning builder show up.
    fn get_field_list<T: FieldType>(&self, field: FieldNumber) -> ListView<T> {
        ListView::new(self.shared_store().clone(), field, self.access_mode())
    }

    fn get_field_list_for_enum<E: ProtoEnum>(
        &self,
        field: FieldNumber,
        unrecognized: E,
    ) -> EnumListView<E> {
        EnumListView::new(self.shared_store().clone(), field, self.access_mode(), unrecognized)
    }

    fn get_repeated_field<T: FieldType>(&self, field: FieldNumber, index: usize) -> Result<T, FieldError> {
        read_element(&self.fields(), self.access_mode(), field, index, T::from_value, T::zero)
    }

    fn get_repeated_field_for_enum<E: ProtoEnum>(
        &self,
        field: FieldNumber,
        index: usize,
        unrecognized: E,
    ) -> Result<E, FieldError> {
        read_element(
            &self.fields(),
            self.access_mode(),
            field,
            index,
            |v| enum_or_unrecognized(v, unrecognized),
            || unrecognized,
        )
    }

    fn get_repeated_field_for_enum_value(&self, field: FieldNumber, index: usize) -> Result<i32, FieldError> {
        read_element(&self.fields(), self.access_mode(), field, index, enum_number, || 0)
    }

    /// Length of the list, 0 when absent or not a list.
    fn get_repeated_field_count(&self, field: FieldNumber) -> usize {
        self.fields()
            .get(field)
            .and_then(FieldValue::as_repeated)
            .map_or(0, <[Value]>::len)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Map fields
    // ════════════════════════════════════════════════════════════════════════

    fn get_field_map<V: FieldType>(&self, field: FieldNumber) -> MapView<V> {
        MapView::new(self.shared_store().clone(), field)
    }

    fn get_or_throw<V: FieldType>(&self, field: FieldNumber, key: impl Into<MapKey>) -> Result<V, FieldError> {
        let key = key.into();
        let fields = self.fields();
        match map_of(&fields, field)?.and_then(|m| m.get(&key)) {
            Some(v) => V::from_value(v).ok_or(FieldError::invalid(field, "stored value has a different type")),
            None => Err(FieldError::MissingKey { field, key }),
        }
    }

    fn get_or_default<V: FieldType>(
        &self,
        field: FieldNumber,
        key: impl Into<MapKey>,
        default: V,
    ) -> Result<V, FieldError> {
        let key = key.into();
        let fields = self.fields();
        match map_of(&fields, field)?.and_then(|m| m.get(&key)) {
            Some(v) => V::from_value(v).ok_or(FieldError::invalid(field, "stored value has a different type")),
            None => Ok(default),
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Extensions
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    fn has_extension(&self, extension: &impl ExtensionDescriptor) -> bool {
        self.has_field(extension.number())
    }

    fn get_extension<T: Clone>(&self, extension: &Extension<T>) -> Result<T, FieldError> {
        let field = extension.number();
        FieldError::check_number(field)?;
        match self.fields().get(field) {
            None => Ok(extension.default_value().clone()),
            Some(FieldValue::Scalar(v)) => extension
                .read(v)
                .ok_or(FieldError::invalid(field, "stored value does not match the extension type")),
            Some(other) => Err(scalar_mismatch(field, other)),
        }
    }

    /// Whole-list read, each element passed through the element converter.
    fn get_extension_list<T>(&self, extension: &RepeatedExtension<T>) -> Result<Vec<T>, FieldError> {
        let field = extension.number();
        let fields = self.fields();
        repeated_slice(&fields, field)?
            .iter()
            .map(|v| {
                extension
                    .read(v)
                    .ok_or(FieldError::invalid(field, "stored element does not match the extension type"))
            })
            .collect()
    }

    fn get_extension_at<T>(&self, extension: &RepeatedExtension<T>, index: usize) -> Result<T, FieldError> {
        read_element(
            &self.fields(),
            self.access_mode(),
            extension.number(),
            index,
            |v| extension.read(v),
            || extension.fallback(),
        )
    }

    #[inline]
    fn get_extension_count<T>(&self, extension: &RepeatedExtension<T>) -> usize {
        self.get_repeated_field_count(extension.number())
    }
}
