use rustc_hash::FxHasher;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use super::Builder;
use crate::accessor::FieldReader;
use crate::config::AccessMode;
use crate::field_store::{FieldStore, FieldValue, SharedStore};
use crate::types::FieldNumber;

// ─── MessageType ────────────────────────────────────────────────────────────

/// Per-type constants emitted once by the generator.
#[derive(Debug)]
pub struct MessageType {
    /// Fully qualified schema name.
    pub name: &'static str,
    /// Array/map split chosen by the schema compiler.
    pub pivot: FieldNumber,
}

impl MessageType {
    pub const fn new(name: &'static str, pivot: FieldNumber) -> Self {
        MessageType { name, pivot }
    }

    fn same_as(&self, other: &MessageType) -> bool {
        std::ptr::eq(self, other) || self.name == other.name
    }
}

static UNTYPED: MessageType = MessageType::new("", 1);

// ─── Message ────────────────────────────────────────────────────────────────

/// An immutable message. Clones share storage.
///
/// The store is never written once the message exists: the builder that
/// produced it was consumed by [`Builder::build`], and
/// [`to_builder`](Message::to_builder) works on a copy.
#[derive(Clone)]
pub struct Message(Rc<MessageInner>);

struct MessageInner {
    ty: &'static MessageType,
    mode: AccessMode,
    store: SharedStore,
    hash: OnceCell<u64>,
}

impl Message {
    pub(crate) fn from_parts(ty: &'static MessageType, mode: AccessMode, store: SharedStore) -> Self {
        Message(Rc::new(MessageInner {
            ty,
            mode,
            store,
            hash: OnceCell::new(),
        }))
    }

    /// A message with no fields set.
    pub fn default_instance(ty: &'static MessageType) -> Self {
        Self::default_instance_with_mode(ty, AccessMode::default())
    }

    pub fn default_instance_with_mode(ty: &'static MessageType, mode: AccessMode) -> Self {
        Self::from_parts(ty, mode, Rc::new(RefCell::new(FieldStore::new(ty.pivot))))
    }

    /// Empty message of no particular type, used as the zero value of
    /// message-typed reads.
    pub fn empty() -> Self {
        Self::default_instance(&UNTYPED)
    }

    #[inline]
    pub fn message_type(&self) -> &'static MessageType {
        self.0.ty
    }

    /// A builder over an independent copy of this message's fields.
    pub fn to_builder(&self) -> Builder {
        let copy = self.0.store.borrow().copy();
        Builder::from_parts(self.0.ty, self.0.mode, copy)
    }
}

impl FieldReader for Message {
    #[inline]
    fn shared_store(&self) -> &SharedStore {
        &self.0.store
    }

    #[inline]
    fn access_mode(&self) -> AccessMode {
        self.0.mode
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        self.0.ty.same_as(other.0.ty) && *self.0.store.borrow() == *other.0.store.borrow()
    }
}

impl Eq for Message {}

impl Hash for Message {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let hash = *self.0.hash.get_or_init(|| {
            let mut h = FxHasher::default();
            self.0.store.borrow().hash(&mut h);
            h.finish()
        });
        state.write_u64(hash);
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("type", &self.0.ty.name)
            .field("fields", &*self.0.store.borrow())
            .finish()
    }
}

// ─── Serialize (debug dumps) ────────────────────────────────────────────────

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let store = self.0.store.borrow();
        let mut entries: Vec<(FieldNumber, &FieldValue)> = store.iter().collect();
        entries.sort_by_key(|(n, _)| *n);

        let mut m = serializer.serialize_map(Some(entries.len() + 1))?;
        m.serialize_entry("$name", self.0.ty.name)?;
        for (n, v) in entries {
            m.serialize_entry(&n.to_string(), v)?;
        }
        m.end()
    }
}
