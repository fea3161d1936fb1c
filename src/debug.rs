use serde_json::Value as Json;
use tracing::trace;

use crate::message::Message;

/// JSON rendering of a message for logs and test failures.
///
/// The object holds a `"$name"` entry and one entry per populated field keyed
/// by its decimal number. Nested messages render the same way and bytes become
/// number arrays. The returned object sorts its keys as strings, so `"10"`
/// comes before `"2"`; use [`dump_string`] for numeric field order.
pub fn dump(message: &Message) -> Result<Json, serde_json::Error> {
    trace!(message = message.message_type().name, "dumping message");
    serde_json::to_value(message)
}

/// Pretty-printed form of [`dump`]. Streams straight from the message, so
/// `"$name"` comes first and fields follow in ascending numeric order; map
/// entries are sorted by key.
pub fn dump_string(message: &Message) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(message)
}
