use super::Builder;
use crate::error::FieldError;
use crate::extension::{Extension, ExtensionDescriptor, RepeatedExtension};
use crate::field_store::FieldValue;
use crate::types::FieldNumber;
use crate::value::{FieldType, MapKey, ProtoEnum, Value, enum_to_value, enum_value_for_number};

impl Builder {
    // ════════════════════════════════════════════════════════════════════════
    // Singular fields
    // ════════════════════════════════════════════════════════════════════════

    pub fn set_field(&mut self, field: FieldNumber, value: impl Into<Value>) -> Result<&mut Self, FieldError> {
        self.set_field_value(field, value.into())
    }

    /// Overwrite with an already-erased value, whatever the field held before.
    pub fn set_field_value(&mut self, field: FieldNumber, value: Value) -> Result<&mut Self, FieldError> {
        FieldError::check_number(field)?;
        self.store_mut().put(field, FieldValue::Scalar(value));
        Ok(self)
    }

    pub fn remove_field(&mut self, field: FieldNumber) -> Result<&mut Self, FieldError> {
        FieldError::check_number(field)?;
        self.store_mut().remove(field);
        Ok(self)
    }

    /// Store a declared constant. Placeholders like `Unrecognized` have no
    /// wire number and are rejected.
    pub fn set_field_for_enum<E: ProtoEnum>(&mut self, field: FieldNumber, value: E) -> Result<&mut Self, FieldError> {
        let value = enum_to_value(field, value)?;
        self.set_field_value(field, value)
    }

    /// Store a wire number, as a constant when `E` declares it and as a raw
    /// integer otherwise.
    pub fn set_field_for_enum_value<E: ProtoEnum>(
        &mut self,
        field: FieldNumber,
        number: i32,
    ) -> Result<&mut Self, FieldError> {
        self.set_field_value(field, enum_value_for_number::<E>(number))
    }

    // ════════════════════════════════════════════════════════════════════════
    // Repeated fields
    // ════════════════════════════════════════════════════════════════════════

    pub fn add_repeated_field<T: FieldType>(&mut self, field: FieldNumber, value: T) -> Result<&mut Self, FieldError> {
        self.add_repeated_value(field, value.into_value())
    }

    pub fn add_repeated_value(&mut self, field: FieldNumber, value: Value) -> Result<&mut Self, FieldError> {
        FieldError::check_number(field)?;
        self.store_mut().ensure_repeated(field)?.push(value);
        Ok(self)
    }

    pub fn add_repeated_field_for_enum<E: ProtoEnum>(
        &mut self,
        field: FieldNumber,
        value: E,
    ) -> Result<&mut Self, FieldError> {
        let value = enum_to_value(field, value)?;
        self.add_repeated_value(field, value)
    }

    pub fn add_repeated_field_for_enum_value<E: ProtoEnum>(
        &mut self,
        field: FieldNumber,
        number: i32,
    ) -> Result<&mut Self, FieldError> {
        self.add_repeated_value(field, enum_value_for_number::<E>(number))
    }

    pub fn add_all_repeated_field<T: FieldType>(
        &mut self,
        field: FieldNumber,
        values: impl IntoIterator<Item = T>,
    ) -> Result<&mut Self, FieldError> {
        FieldError::check_number(field)?;
        // Drain the source before borrowing the store: it may be a live view
        // over this same builder.
        let values: Vec<Value> = values.into_iter().map(T::into_value).collect();
        self.store_mut().ensure_repeated(field)?.extend(values);
        Ok(self)
    }

    pub fn set_repeated_field<T: FieldType>(
        &mut self,
        field: FieldNumber,
        index: usize,
        value: T,
    ) -> Result<&mut Self, FieldError> {
        self.set_repeated_value(field, index, value.into_value())
    }

    pub fn set_repeated_field_for_enum_value<E: ProtoEnum>(
        &mut self,
        field: FieldNumber,
        index: usize,
        number: i32,
    ) -> Result<&mut Self, FieldError> {
        self.set_repeated_value(field, index, enum_value_for_number::<E>(number))
    }

    /// Replace one element. Writes past the end are reported in both access
    /// modes and leave the store untouched.
    ///
    /// Unlike the other repeated writes this does not go through
    /// `ensure_repeated`: a failed write to an absent field leaves it absent
    /// instead of materializing an empty list.
    pub fn set_repeated_value(
        &mut self,
        field: FieldNumber,
        index: usize,
        value: Value,
    ) -> Result<&mut Self, FieldError> {
        FieldError::check_number(field)?;
        {
            let mut store = self.store_mut();
            let list = match store.get_mut(field) {
                Some(FieldValue::Repeated(list)) => list,
                Some(_) => return Err(FieldError::invalid(field, "field does not hold a repeated value")),
                None => return Err(FieldError::IndexOutOfRange { field, index, len: 0 }),
            };
            let len = list.len();
            let slot = list
                .get_mut(index)
                .ok_or(FieldError::IndexOutOfRange { field, index, len })?;
            *slot = value;
        }
        Ok(self)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Map fields
    // ════════════════════════════════════════════════════════════════════════

    pub fn put_map_field<K: Into<MapKey>, V: FieldType>(
        &mut self,
        field: FieldNumber,
        key: K,
        value: V,
    ) -> Result<&mut Self, FieldError> {
        FieldError::check_number(field)?;
        self.store_mut()
            .ensure_map(field)?
            .insert(key.into(), value.into_value());
        Ok(self)
    }

    /// Insert an entry whose key arrives as an erased value, as map entries
    /// do off the wire. Keys of a kind that cannot key a map are rejected.
    pub fn put_map_field_value(&mut self, field: FieldNumber, key: Value, value: Value) -> Result<&mut Self, FieldError> {
        FieldError::check_number(field)?;
        let key = MapKey::from_value(field, key)?;
        self.store_mut().ensure_map(field)?.insert(key, value);
        Ok(self)
    }

    pub fn put_all_map_field<K: Into<MapKey>, V: FieldType>(
        &mut self,
        field: FieldNumber,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Result<&mut Self, FieldError> {
        FieldError::check_number(field)?;
        let entries: Vec<(MapKey, Value)> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into_value()))
            .collect();
        self.store_mut().ensure_map(field)?.extend(entries);
        Ok(self)
    }

    /// Drop one entry. An absent map stays absent.
    pub fn remove_map_field(&mut self, field: FieldNumber, key: impl Into<MapKey>) -> Result<&mut Self, FieldError> {
        FieldError::check_number(field)?;
        let key = key.into();
        match self.store_mut().get_mut(field) {
            None => {}
            Some(FieldValue::Map(map)) => {
                map.remove(&key);
            }
            Some(_) => return Err(FieldError::invalid(field, "field does not hold a map value")),
        }
        Ok(self)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Extensions
    // ════════════════════════════════════════════════════════════════════════

    pub fn set_extension<T>(&mut self, extension: &Extension<T>, value: T) -> Result<&mut Self, FieldError> {
        let value = extension.write(value);
        self.set_field_value(extension.number(), value)
    }

    pub fn clear_extension(&mut self, extension: &impl ExtensionDescriptor) -> Result<&mut Self, FieldError> {
        self.remove_field(extension.number())
    }

    pub fn add_extension<T>(&mut self, extension: &RepeatedExtension<T>, value: T) -> Result<&mut Self, FieldError> {
        let value = extension.write(value);
        self.add_repeated_value(extension.number(), value)
    }

    pub fn set_extension_at<T>(
        &mut self,
        extension: &RepeatedExtension<T>,
        index: usize,
        value: T,
    ) -> Result<&mut Self, FieldError> {
        let value = extension.write(value);
        self.set_repeated_value(extension.number(), index, value)
    }

    /// Whole-list assignment: clear, then append element by element so every
    /// element goes through the extension's converter. The source is drained
    /// first, so it may read the list being replaced.
    pub fn set_repeated_extension<T>(
        &mut self,
        extension: &RepeatedExtension<T>,
        values: impl IntoIterator<Item = T>,
    ) -> Result<&mut Self, FieldError> {
        let values: Vec<T> = values.into_iter().collect();
        self.clear_extension(extension)?;
        for value in values {
            self.add_extension(extension, value)?;
        }
        Ok(self)
    }
}
