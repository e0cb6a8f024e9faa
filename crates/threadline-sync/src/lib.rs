//! Comment synchronization for Threadline.
//!
//! The [`SyncController`] is the only component that talks to the comment
//! store. It owns a [`CommentCache`] keyed by post, refreshes it on a fixed
//! interval, posts new comments, and invalidates the cached list after a
//! successful post so the new comment shows up without waiting for the next
//! tick.
//!
//! Views observe each post's cache entry as a [`CommentsQuery`]: `Loading`
//! until the first fetch lands, then `Ready` or `Error`. A failed fetch keeps
//! the last good list around and is retried on the next tick.

pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod identity;
pub mod poll;

pub use cache::{CacheStats, CommentCache, CommentsQuery, QueryStatus};
pub use config::{SyncConfig, DEFAULT_POLL_INTERVAL_MS};
pub use controller::SyncController;
pub use error::{SyncError, SyncResult};
pub use identity::{IdentityProvider, SessionIdentity, StaticIdentity};
pub use poll::PollHandle;
