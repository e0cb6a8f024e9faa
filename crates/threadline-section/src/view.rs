use std::sync::Arc;

use serde::Serialize;
use threadline_tree::CommentNode;
use threadline_types::PostId;

/// Shown in place of the compose form when nobody is signed in.
pub const SIGN_IN_NOTICE: &str = "Sign in to join the discussion.";

/// Everything needed to draw a comment section once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub post_id: PostId,
    pub thread: ThreadBody,
    pub composer: Composer,
    /// Message of the last failed submit, cleared by the next success.
    pub post_error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ThreadBody {
    Loading,
    /// The last fetch failed. `stale` holds the forest of the last good
    /// fetch, if there was one.
    Failed {
        message: String,
        stale: Option<Arc<Vec<CommentNode>>>,
    },
    Ready { forest: Arc<Vec<CommentNode>> },
}

impl ThreadBody {
    /// The forest to draw, fresh or stale.
    pub fn forest(&self) -> Option<&[CommentNode]> {
        match self {
            Self::Ready { forest } => Some(forest.as_slice()),
            Self::Failed { stale: Some(forest), .. } => Some(forest.as_slice()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Composer {
    Open { display_name: String },
    SignInNotice,
}
