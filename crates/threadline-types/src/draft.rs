use serde::{Deserialize, Serialize};

use crate::comment::NewComment;
use crate::error::{TypeError, TypeResult};
use crate::identity::Identity;
use crate::ids::{CommentId, PostId};

/// What a compose form submits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDraft {
    pub content: String,
    #[serde(default)]
    pub parent_comment_id: Option<CommentId>,
}

impl CommentDraft {
    /// A new top-level comment.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            parent_comment_id: None,
        }
    }

    /// A reply to `parent`.
    pub fn reply(parent: CommentId, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            parent_comment_id: Some(parent),
        }
    }

    /// Check the draft can be written. Content must contain something other
    /// than whitespace.
    pub fn validate(&self) -> TypeResult<()> {
        if self.content.trim().is_empty() {
            return Err(TypeError::EmptyContent);
        }
        Ok(())
    }

    /// Validate and turn the draft into an insert request attributed to
    /// `author`. Surrounding whitespace is trimmed from the content.
    pub fn into_new_comment(self, post_id: PostId, author: &Identity) -> TypeResult<NewComment> {
        self.validate()?;
        Ok(NewComment {
            post_id,
            content: self.content.trim().to_string(),
            parent_comment_id: self.parent_comment_id,
            author_id: author.user_id.clone(),
            author_display_name: author.display_name.clone(),
        })
    }
}
