use std::fmt;

use jfs_types::Key;

/// What happened to an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    Added,
    Modified,
    Deleted,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Added => "ADDED",
            Self::Modified => "MODIFIED",
            Self::Deleted => "DELETED",
        };
        f.write_str(s)
    }
}

/// One change to one object.
///
/// For `Deleted` the object is the value that existed immediately before the
/// deletion.
#[derive(Clone, Debug, PartialEq)]
pub struct Event<T> {
    pub event_type: EventType,
    pub key: Key,
    pub object: T,
}

impl<T> Event<T> {
    pub fn new(event_type: EventType, key: Key, object: T) -> Self {
        Self {
            event_type,
            key,
            object,
        }
    }

    pub fn added(key: Key, object: T) -> Self {
        Self::new(EventType::Added, key, object)
    }

    pub fn modified(key: Key, object: T) -> Self {
        Self::new(EventType::Modified, key, object)
    }

    pub fn deleted(key: Key, object: T) -> Self {
        Self::new(EventType::Deleted, key, object)
    }
}

/// What a subscriber pulls off its queue.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification<T> {
    /// The next event, in broadcast order.
    Event(Event<T>),
    /// The consumer fell behind and `missed` events were dropped from the
    /// front of its queue. Events after the marker are again contiguous.
    Gap { missed: u64 },
}

impl<T> Notification<T> {
    /// The carried event, or `None` for a gap marker.
    pub fn into_event(self) -> Option<Event<T>> {
        match self {
            Self::Event(event) => Some(event),
            Self::Gap { .. } => None,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, Self::Gap { .. })
    }
}
