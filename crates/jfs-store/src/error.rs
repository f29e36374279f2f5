use std::io;
use std::path::{Path, PathBuf};

use jfs_types::{Key, ValidationError};
use jfs_watch::WatchError;

use crate::codec::CodecError;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No object is stored under the key.
    #[error("object not found: {key}")]
    NotFound { key: Key },

    /// A create targeted a key that is already present.
    #[error("object already exists: {key}")]
    AlreadyExists { key: Key },

    /// A validator rejected the object. Carried through unchanged.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Unexpected filesystem failure (permissions, disk full, bad path).
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Stored bytes do not parse into the expected type.
    #[error("cannot decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// The codec could not serialize the object.
    #[error("cannot encode {key}: {source}")]
    Encode {
        key: Key,
        #[source]
        source: CodecError,
    },

    /// A single-object request against a namespaced resource carried no
    /// namespace.
    #[error("namespace required for namespaced resource {resource}")]
    NamespaceRequired { resource: String },

    /// A watch could not be registered.
    #[error(transparent)]
    Watch(#[from] WatchError),

    /// The store configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub(crate) fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
