//! Comment store clients for Threadline.
//!
//! The comment store is the remote table every comment lives in. This crate
//! defines the narrow interface the sync layer needs from it and ships two
//! backends.
//!
//! # Operations
//!
//! - fetch all comments of a post, ordered by `created_at` ascending
//! - insert a new comment row
//!
//! # Backends
//!
//! All backends implement the [`CommentStore`] trait:
//!
//! - [`InMemoryCommentStore`] -- process-local store for tests, demos, and
//!   embedding; supports fault and latency injection
//! - [`RestCommentStore`] -- PostgREST-style HTTP table endpoint
//!
//! # Design Rules
//!
//! 1. Rows are immutable once written; the store assigns `id` and `created_at`.
//! 2. Insertion order equals creation order, so a reply can only reference an
//!    id that already exists.
//! 3. Failures carry the store's own message so it can be shown to the user.
//! 4. Access control is the store's business, not the client's.

pub mod error;
pub mod memory;
pub mod rest;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryCommentStore;
pub use rest::{RestCommentStore, RestStoreConfig};
pub use traits::CommentStore;
