//! Filesystem-backed object storage for the JSON file store (JFS).
//!
//! Each object is one file, `<root>/[<namespace>/]<name>.json`, holding the
//! codec's encoding of the object. The file is the record: there is no index
//! and no log, and a file exists exactly when its object does.
//!
//! # Components
//!
//! - [`Layout`] -- key addressing and its inverse
//! - [`Codec`] / [`JsonCodec`] / [`FnCodec`] -- record codec adapter
//! - [`walk`] -- directory walker behind list, watch, and collection delete
//! - [`FileStore`] -- CRUD, list, collection delete, and watch
//! - [`ResourceStorage`] -- per-resource facade addressed by request context
//!
//! # Design Rules
//!
//! 1. Writes go to a temp file and are renamed into place; a failed write
//!    leaves the previous file intact.
//! 2. Mutations are serialized per store; reads are lock-free.
//! 3. Every successful mutation produces exactly one event per touched
//!    object, broadcast before the call returns.
//! 4. A missing file is `NotFound`; every other filesystem failure is
//!    surfaced as `Io` with the operation and path.
//! 5. Nothing retries internally.
//! 6. List order is filesystem traversal order and carries no meaning.

pub mod codec;
pub mod config;
pub mod error;
mod file;
pub mod layout;
pub mod list;
pub mod resource;
pub mod store;
pub mod validation;
pub mod walker;

#[cfg(test)]
mod fixtures;

pub use codec::{Codec, CodecError, FnCodec, JsonCodec};
pub use config::{StoreConfig, SyncMode};
pub use error::{StoreError, StoreResult};
pub use layout::{Layout, OBJECT_SUFFIX};
pub use list::ObjectList;
pub use resource::{GroupResource, ResourceStorage};
pub use store::FileStore;
pub use validation::{AcceptAll, Validator};
pub use walker::walk;

// Re-export the shared types so embedders need only this crate.
pub use jfs_types::{Key, Named, RequestContext, Scope, ValidationError};
pub use jfs_watch::{Event, EventType, Notification, Subscription};
