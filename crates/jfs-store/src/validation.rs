use jfs_types::{RequestContext, ValidationError};

/// Admission checks run before an object is written or removed.
///
/// Every method accepts by default. A rejection aborts the operation before
/// the filesystem is touched and reaches the caller as
/// [`StoreError::Invalid`](crate::StoreError::Invalid).
pub trait Validator<T>: Send + Sync {
    fn validate_create(&self, _ctx: &RequestContext, _object: &T) -> Result<(), ValidationError> {
        Ok(())
    }

    fn validate_update(
        &self,
        _ctx: &RequestContext,
        _new: &T,
        _old: &T,
    ) -> Result<(), ValidationError> {
        Ok(())
    }

    fn validate_delete(&self, _ctx: &RequestContext, _object: &T) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Validator that accepts everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl<T> Validator<T> for AcceptAll {}
