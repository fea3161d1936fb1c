mod read_op;
mod views;

pub use read_op::FieldReader;
pub use views::{EnumListView, ListIter, ListView, MapView};
