//! JSON documents persisted by the client.
//!
//! Output uses 2-space indentation and a trailing newline; object keys are
//! sorted when the source types use `BTreeMap`.

mod json;
mod session;

pub use json::{SerializationError, from_json_bytes, to_json_stable_bytes};
pub use session::{SESSION_SCHEMA_VERSION, SessionDocument};
