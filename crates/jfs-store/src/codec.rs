//! Record codec adapter.
//!
//! The store never looks inside an object; it hands it to a [`Codec`] and
//! writes whatever bytes come back. [`JsonCodec`] covers any serde type,
//! [`FnCodec`] adapts an externally supplied encode/decode pair.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialization failure reported by a codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Converts objects of type `T` to and from their stored bytes.
pub trait Codec<T>: Send + Sync {
    fn encode(&self, object: &T) -> Result<Vec<u8>, CodecError>;

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

/// Pretty-printed JSON, one trailing newline.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl<T> Codec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, object: &T) -> Result<Vec<u8>, CodecError> {
        let mut bytes = serde_json::to_vec_pretty(object)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// A codec built from a pair of functions.
pub struct FnCodec<E, D> {
    encode: E,
    decode: D,
}

impl<E, D> FnCodec<E, D> {
    pub fn new(encode: E, decode: D) -> Self {
        Self { encode, decode }
    }
}

impl<T, E, D> Codec<T> for FnCodec<E, D>
where
    E: Fn(&T) -> Result<Vec<u8>, CodecError> + Send + Sync,
    D: Fn(&[u8]) -> Result<T, CodecError> + Send + Sync,
{
    fn encode(&self, object: &T) -> Result<Vec<u8>, CodecError> {
        (self.encode)(object)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        (self.decode)(bytes)
    }
}

impl<E, D> fmt::Debug for FnCodec<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnCodec")
    }
}
