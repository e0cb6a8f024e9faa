use crate::node::CommentNode;

/// Pre-order, depth-first traversal of a forest.
///
/// Yields `(depth, node)` with roots at depth 0, in display order: a comment
/// is followed by its replies before its next sibling.
pub fn walk(forest: &[CommentNode]) -> Walk<'_> {
    Walk {
        stack: forest.iter().rev().map(|node| (0, node)).collect(),
    }
}

/// Iterator returned by [`walk`].
pub struct Walk<'a> {
    stack: Vec<(usize, &'a CommentNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a CommentNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}
