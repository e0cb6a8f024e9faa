//! Foundation types for Threadline.
//!
//! This crate provides the data-shape contracts shared by every other
//! Threadline crate: the stored comment row, its identifiers, the write
//! request sent to the store, and the draft submitted by a view.
//!
//! # Key Types
//!
//! - [`Comment`] — Immutable comment row as returned by the store
//! - [`CommentId`] / [`PostId`] — Integer identifiers assigned by the store
//! - [`NewComment`] — Insert request for a new comment row
//! - [`CommentDraft`] — What a compose form submits (content + optional parent)
//! - [`Identity`] — The signed-in principal a comment is attributed to

pub mod comment;
pub mod draft;
pub mod error;
pub mod identity;
pub mod ids;

pub use comment::{Comment, NewComment};
pub use draft::CommentDraft;
pub use error::{TypeError, TypeResult};
pub use identity::Identity;
pub use ids::{CommentId, PostId};
