//! Forest construction from a flat comment list.
//!
//! Two passes over an insertion-ordered map keep root and reply order equal
//! to input order, which the store guarantees is creation order. A plain
//! `HashMap` would scramble threads between rebuilds.

use std::collections::HashMap;

use indexmap::IndexMap;
use threadline_types::{Comment, CommentId};
use tracing::debug;

use crate::node::CommentNode;

/// What a build kept and what it dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForestReport {
    /// Number of top-level threads.
    pub roots: usize,
    /// Number of nodes in the forest, roots included.
    pub placed: usize,
    /// Input comments absent from the forest, in input order.
    pub orphans: Vec<CommentId>,
}

impl ForestReport {
    pub fn is_complete(&self) -> bool {
        self.orphans.is_empty()
    }
}

/// Build the reply forest of one post.
///
/// `flat` must be ordered by `created_at` ascending. Comments whose parent is
/// not in `flat` are dropped, never promoted to roots.
pub fn build_forest(flat: &[Comment]) -> Vec<CommentNode> {
    build_forest_with_report(flat).0
}

/// Same as [`build_forest`], also reporting which comments were dropped.
pub fn build_forest_with_report(flat: &[Comment]) -> (Vec<CommentNode>, ForestReport) {
    // Pass 1: id -> comment. A duplicate id keeps its first position and
    // takes the last value.
    let mut by_id: IndexMap<CommentId, &Comment> = IndexMap::with_capacity(flat.len());
    for comment in flat {
        by_id.insert(comment.id, comment);
    }

    // Pass 2: sort every entry into roots or its parent's replies.
    let mut roots: Vec<CommentId> = Vec::new();
    let mut replies: HashMap<CommentId, Vec<CommentId>> = HashMap::new();
    for (&id, comment) in &by_id {
        match comment.parent_comment_id {
            None => roots.push(id),
            Some(parent) if by_id.contains_key(&parent) => {
                replies.entry(parent).or_default().push(id);
            }
            Some(parent) => {
                debug!(comment = %id, parent = %parent, "dropping reply to unknown comment");
            }
        }
    }

    let mut forest = Vec::with_capacity(roots.len());
    let mut placed = 0usize;
    for root in roots {
        if let Some((node, count)) = assemble(root, &by_id, &mut replies) {
            placed += count;
            forest.push(node);
        }
    }

    let report = ForestReport {
        roots: forest.len(),
        placed,
        orphans: collect_orphans(&by_id, &forest),
    };
    if !report.is_complete() {
        debug!(orphans = report.orphans.len(), "forest built with dropped comments");
    }
    (forest, report)
}

struct Frame {
    node: CommentNode,
    pending: std::vec::IntoIter<CommentId>,
}

/// Assemble the subtree under `root` with an explicit stack, so deep reply
/// chains do not recurse here. Returns the node and the subtree size.
fn assemble(
    root: CommentId,
    by_id: &IndexMap<CommentId, &Comment>,
    replies: &mut HashMap<CommentId, Vec<CommentId>>,
) -> Option<(CommentNode, usize)> {
    let mut open = |id: CommentId| Frame {
        node: CommentNode::leaf((*by_id[&id]).clone()),
        pending: replies.remove(&id).unwrap_or_default().into_iter(),
    };

    let mut count = 1usize;
    let mut stack = vec![open(root)];
    while let Some(mut frame) = stack.pop() {
        if let Some(child) = frame.pending.next() {
            count += 1;
            let child = open(child);
            stack.push(frame);
            stack.push(child);
        } else if let Some(parent) = stack.last_mut() {
            parent.node.children.push(frame.node);
        } else {
            return Some((frame.node, count));
        }
    }
    None
}

fn collect_orphans(by_id: &IndexMap<CommentId, &Comment>, forest: &[CommentNode]) -> Vec<CommentId> {
    let mut placed = std::collections::HashSet::with_capacity(by_id.len());
    let mut stack: Vec<&CommentNode> = forest.iter().collect();
    while let Some(node) = stack.pop() {
        placed.insert(node.id());
        stack.extend(node.children.iter());
    }
    by_id
        .keys()
        .filter(|id| !placed.contains(*id))
        .copied()
        .collect()
}
