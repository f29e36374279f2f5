//! Foundation types for the JSON file store (JFS).
//!
//! Every other JFS crate depends on `jfs-types`. Nothing here touches the
//! filesystem; these are the identity and request types shared between the
//! object store, the watch hub, and the host that embeds them.
//!
//! # Key Types
//!
//! - [`Key`] — Logical identity of a stored object (name + optional namespace)
//! - [`Scope`] — The set of keys a list, watch, or collection delete covers
//! - [`RequestContext`] — Per-request values handed to validators
//! - [`Named`] — Metadata accessor for objects that carry their own name
//! - [`ValidationError`] — Rejection returned by a validator

pub mod context;
pub mod error;
pub mod key;
pub mod scope;

pub use context::RequestContext;
pub use error::ValidationError;
pub use key::{Key, Named};
pub use scope::Scope;
