//! Per-session state that survives from one render pass to the next.
//!
//! A [`SessionStore`] is created empty when a session opens, filled lazily
//! by `get_or_init` as passes run, mutated by callbacks, and dropped as a
//! whole when the session ends. Values are addressed by typed [`Key`]s so a
//! key's value type is fixed where the key is declared.

mod registry;
mod store;

pub use registry::{SessionId, Sessions};
pub use store::{Key, SessionStore};
