mod field_value;
mod store;

pub use field_value::FieldValue;
pub use store::FieldStore;

use std::cell::RefCell;
use std::rc::Rc;

/// A store shared between its owner and the live views handed out over it.
pub type SharedStore = Rc<RefCell<FieldStore>>;
