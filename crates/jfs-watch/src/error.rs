/// Errors produced by a watch subscription.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WatchError {
    /// The owning store (and with it the hub) has been dropped, or the
    /// subscription was removed from the registry.
    #[error("watch stream closed")]
    Closed,

    /// The snapshot plus the live capacity does not fit in one queue.
    #[error("watch queue too large: {snapshot} snapshot events plus {capacity} live")]
    QueueTooLarge { snapshot: usize, capacity: usize },
}

/// Convenience alias used throughout the watch crate.
pub type WatchResult<T> = std::result::Result<T, WatchError>;
