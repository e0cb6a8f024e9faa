use thiserror::Error;
use threadline_store::StoreError;
use threadline_types::{PostId, TypeError};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("sign in to post a comment")]
    Unauthenticated,

    #[error("invalid comment: {0}")]
    InvalidDraft(#[from] TypeError),

    #[error("failed to load comments for post {post_id}: {source}")]
    StoreRead { post_id: PostId, source: StoreError },

    #[error("failed to post comment on post {post_id}: {source}")]
    StoreWrite { post_id: PostId, source: StoreError },
}

impl SyncError {
    /// The message a view should show for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::StoreRead { source, .. } | Self::StoreWrite { source, .. } => source.message(),
            other => other.to_string(),
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
