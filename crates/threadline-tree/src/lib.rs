//! Reply-tree construction for Threadline.
//!
//! Converts the flat, creation-ordered comment list of one post into a forest
//! of reply threads. The forest is a *derived* structure: it is rebuilt
//! wholesale from the flat list whenever that list changes and is never
//! mutated in place.
//!
//! # Policy
//!
//! - Comments without a parent are roots, in creation order.
//! - Replies are attached under their parent, in creation order.
//! - A reply whose parent is not in the list is dropped silently, together
//!   with anything that only hangs off it. This is not an error.

pub mod forest;
pub mod node;
pub mod walk;

pub use forest::{build_forest, build_forest_with_report, ForestReport};
pub use node::CommentNode;
pub use walk::{walk, Walk};
