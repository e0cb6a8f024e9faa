use async_trait::async_trait;
use threadline_types::{Comment, NewComment, PostId};

use crate::error::StoreResult;

/// Client for the remote comment table.
///
/// Implementations must satisfy these invariants:
/// - `fetch_comments` returns only rows of the requested post, ordered by
///   `created_at` ascending.
/// - `insert_comment` either stores the row and returns `Ok(())`, or stores
///   nothing and returns a descriptive error.
/// - Neither call retries on its own; retry policy belongs to the caller.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Fetch every comment of `post_id` in creation order.
    async fn fetch_comments(&self, post_id: PostId) -> StoreResult<Vec<Comment>>;

    /// Insert a new comment row.
    async fn insert_comment(&self, comment: &NewComment) -> StoreResult<()>;
}
