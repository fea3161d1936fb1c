mod builder;
#[allow(clippy::module_inception)]
mod message;
mod write_op;

pub use builder::Builder;
pub use message::{Message, MessageType};

#[cfg(test)]
mod tests;
