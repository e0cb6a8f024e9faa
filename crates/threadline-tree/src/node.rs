use serde::Serialize;
use threadline_types::{Comment, CommentId};

/// A comment together with its replies, in creation order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    /// A node with no replies.
    pub fn leaf(comment: Comment) -> Self {
        Self {
            comment,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> CommentId {
        self.comment.id
    }

    /// Number of direct replies.
    pub fn reply_count(&self) -> usize {
        self.children.len()
    }

    /// Number of nodes below this one, at any depth.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Height of the subtree rooted here. A node without replies has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(CommentNode::depth).max().unwrap_or(0)
    }

    /// Find a node by id in this subtree.
    pub fn find(&self, id: CommentId) -> Option<&CommentNode> {
        if self.comment.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}
