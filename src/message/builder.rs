use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::{Message, MessageType};
use crate::accessor::FieldReader;
use crate::config::AccessMode;
use crate::field_store::{FieldStore, SharedStore};

/// Mutable counterpart of [`Message`]. Owns its store exclusively; the only
/// other holders are read-only views taken from it.
pub struct Builder {
    ty: &'static MessageType,
    mode: AccessMode,
    store: SharedStore,
}

impl Builder {
    // ════════════════════════════════════════════════════════════════════════
    // Construction
    // ════════════════════════════════════════════════════════════════════════

    /// Empty builder using the build's default [`AccessMode`].
    pub fn new(ty: &'static MessageType) -> Self {
        Self::with_mode(ty, AccessMode::default())
    }

    pub fn with_mode(ty: &'static MessageType, mode: AccessMode) -> Self {
        Self::from_parts(ty, mode, FieldStore::new(ty.pivot))
    }

    pub(crate) fn from_parts(ty: &'static MessageType, mode: AccessMode, store: FieldStore) -> Self {
        Builder {
            ty,
            mode,
            store: Rc::new(RefCell::new(store)),
        }
    }

    #[inline]
    pub fn message_type(&self) -> &'static MessageType {
        self.ty
    }

    /// Freeze the builder. No copy is made; the builder is consumed so its
    /// store cannot be written again.
    pub fn build(self) -> Message {
        Message::from_parts(self.ty, self.mode, self.store)
    }

    #[inline]
    pub(crate) fn store_mut(&self) -> RefMut<'_, FieldStore> {
        self.store.borrow_mut()
    }
}

impl Clone for Builder {
    /// Copies the store; the two builders never observe each other's writes.
    fn clone(&self) -> Self {
        let copy = self.store.borrow().copy();
        Self::from_parts(self.ty, self.mode, copy)
    }
}

impl FieldReader for Builder {
    #[inline]
    fn shared_store(&self) -> &SharedStore {
        &self.store
    }

    #[inline]
    fn access_mode(&self) -> AccessMode {
        self.mode
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("type", &self.ty.name)
            .field("mode", &self.mode)
            .field("fields", &*self.store.borrow())
            .finish()
    }
}
