//! Watch hub for the JSON file store.
//!
//! A [`WatchHub`] is owned by exactly one store. Every successful mutation in
//! that store is broadcast through the hub to each registered
//! [`Subscription`] whose filter matches. A subscription starts with a replay
//! of the objects present when it was opened, then goes live.
//!
//! # Delivery
//!
//! - Events reach all subscribers in the same relative order: broadcasting
//!   happens while the store holds its mutation lock.
//! - Each subscriber has its own bounded queue, sized to its snapshot plus
//!   the hub capacity and rounded up to a power of two. A consumer that
//!   falls behind loses its oldest queued events and sees a
//!   [`Notification::Gap`] in their place. Broadcasting never waits on a
//!   consumer.
//! - Stopping (or dropping) a subscription removes it from the registry; no
//!   event is queued for it afterwards.

pub mod error;
pub mod event;
pub mod hub;

pub use error::{WatchError, WatchResult};
pub use event::{Event, EventType, Notification};
pub use hub::{Subscription, WatchFilter, WatchHub, DEFAULT_CAPACITY, MAX_CAPACITY};
