//! Storage runtime for schema-generated messages.
//!
//! Fields are addressed by number. Each message instance keeps them in a
//! [`FieldStore`] that splits dense low numbers into indexed slots and sends
//! the rest (including extensions) to a lazily created map. Generated code
//! reads through [`FieldReader`] and writes through [`Builder`].

pub mod accessor;
pub mod config;
pub mod debug;
pub mod error;
pub mod extension;
pub mod field_store;
pub mod message;
pub mod types;
pub mod value;

pub use accessor::{EnumListView, FieldReader, ListIter, ListView, MapView};
pub use config::{AccessMode, RuntimeConfig};
pub use error::FieldError;
pub use extension::{Extension, ExtensionDescriptor, RepeatedExtension};
pub use field_store::{FieldStore, FieldValue};
pub use message::{Builder, Message, MessageType};
pub use types::FieldNumber;
pub use value::{ByteString, FieldType, MapKey, ProtoEnum, Value};
