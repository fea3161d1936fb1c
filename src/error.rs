// ─── Error ──────────────────────────────────────────────────────────────────
use thiserror::Error;

use crate::types::FieldNumber;
use crate::value::MapKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("invalid argument for field {field}: {reason}")]
    InvalidArgument {
        field: FieldNumber,
        reason: &'static str,
    },
    #[error("field {field}: unknown map key {key}")]
    MissingKey { field: FieldNumber, key: MapKey },
    #[error("field {field}: index {index} out of range for length {len}")]
    IndexOutOfRange {
        field: FieldNumber,
        index: usize,
        len: usize,
    },
}

impl FieldError {
    #[inline]
    pub(crate) fn invalid(field: FieldNumber, reason: &'static str) -> Self {
        FieldError::InvalidArgument { field, reason }
    }

    /// Field numbers start at 1. Number 0 never reaches a store.
    #[inline]
    pub(crate) fn check_number(field: FieldNumber) -> Result<(), Self> {
        if field == 0 {
            return Err(FieldError::invalid(field, "field numbers start at 1"));
        }
        Ok(())
    }
}
