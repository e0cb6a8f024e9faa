use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use threadline_types::{Comment, CommentId, NewComment, PostId};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::CommentStore;

#[derive(Default)]
struct MemoryState {
    rows: HashMap<PostId, Vec<Comment>>,
    next_id: i64,
    last_created_at: Option<DateTime<Utc>>,
    read_failure: Option<String>,
    write_failure: Option<String>,
    latency: Option<Duration>,
}

/// In-memory comment table.
///
/// Intended for tests, demos, and embedding. Ids are assigned sequentially
/// starting at 1 and `created_at` is strictly increasing, matching the
/// guarantees of the real table. Failures and latency can be injected to
/// exercise the sync layer's error paths.
pub struct InMemoryCommentStore {
    state: RwLock<MemoryState>,
    fetches: AtomicUsize,
    inserts: AtomicUsize,
}

impl InMemoryCommentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                next_id: 1,
                ..MemoryState::default()
            }),
            fetches: AtomicUsize::new(0),
            inserts: AtomicUsize::new(0),
        }
    }

    /// Create a store pre-populated with existing rows.
    ///
    /// Rows are kept as given; the next assigned id follows the largest
    /// seeded id.
    pub fn with_comments(comments: impl IntoIterator<Item = Comment>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.write().expect("lock poisoned");
            for comment in comments {
                state.next_id = state.next_id.max(comment.id.get() + 1);
                state.last_created_at = state.last_created_at.max(Some(comment.created_at));
                state.rows.entry(comment.post_id).or_default().push(comment);
            }
        }
        store
    }

    /// Number of rows across all posts.
    pub fn len(&self) -> usize {
        self.state
            .read()
            .expect("lock poisoned")
            .rows
            .values()
            .map(Vec::len)
            .sum()
    }

    /// Returns `true` if the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every fetch fail with `message` until cleared with `None`.
    pub fn set_read_failure(&self, message: Option<String>) {
        self.state.write().expect("lock poisoned").read_failure = message;
    }

    /// Make every insert fail with `message` until cleared with `None`.
    pub fn set_write_failure(&self, message: Option<String>) {
        self.state.write().expect("lock poisoned").write_failure = message;
    }

    /// Delay every call by `latency` before answering.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.state.write().expect("lock poisoned").latency = latency;
    }

    /// Number of fetch calls received, including failed ones.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Number of insert calls received, including failed ones.
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    fn latency(&self) -> Option<Duration> {
        self.state.read().expect("lock poisoned").latency
    }
}

impl Default for InMemoryCommentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn fetch_comments(&self, post_id: PostId) -> StoreResult<Vec<Comment>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency() {
            tokio::time::sleep(latency).await;
        }

        let state = self.state.read().expect("lock poisoned");
        if let Some(message) = &state.read_failure {
            return Err(StoreError::Unavailable(message.clone()));
        }
        let mut rows = state.rows.get(&post_id).cloned().unwrap_or_default();
        // Stable: ties keep insertion order.
        rows.sort_by_key(|c| c.created_at);
        debug!(post = %post_id, rows = rows.len(), "memory store fetch");
        Ok(rows)
    }

    async fn insert_comment(&self, comment: &NewComment) -> StoreResult<()> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency() {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.write().expect("lock poisoned");
        if let Some(message) = &state.write_failure {
            return Err(StoreError::Unavailable(message.clone()));
        }

        let id = CommentId::new(state.next_id);
        state.next_id += 1;

        let now = Utc::now();
        let created_at = match state.last_created_at {
            Some(last) if now <= last => last + chrono::Duration::milliseconds(1),
            _ => now,
        };
        state.last_created_at = Some(created_at);

        state.rows.entry(comment.post_id).or_default().push(Comment {
            id,
            post_id: comment.post_id,
            parent_comment_id: comment.parent_comment_id,
            content: comment.content.clone(),
            author_id: comment.author_id.clone(),
            author_display_name: comment.author_display_name.clone(),
            created_at,
        });
        debug!(post = %comment.post_id, id = %id, "memory store insert");
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryCommentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCommentStore")
            .field("row_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_comment(post: i64, parent: Option<i64>, content: &str) -> NewComment {
        NewComment {
            post_id: PostId::new(post),
            content: content.into(),
            parent_comment_id: parent.map(CommentId::new),
            author_id: "u-1".into(),
            author_display_name: "Ada".into(),
        }
    }

    fn seeded(id: i64, post: i64, minute: u32) -> Comment {
        Comment {
            id: CommentId::new(id),
            post_id: PostId::new(post),
            parent_comment_id: None,
            content: format!("seed {id}"),
            author_id: "u-2".into(),
            author_display_name: "Grace".into(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, minute, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = InMemoryCommentStore::new();
        store.insert_comment(&new_comment(1, None, "a")).await.unwrap();
        store.insert_comment(&new_comment(1, Some(1), "b")).await.unwrap();

        let rows = store.fetch_comments(PostId::new(1)).await.unwrap();
        let ids: Vec<i64> = rows.iter().map(|c| c.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(rows[1].parent_comment_id, Some(CommentId::new(1)));
        assert!(rows[0].created_at < rows[1].created_at);
    }

    #[tokio::test]
    async fn fetch_is_scoped_to_post() {
        let store = InMemoryCommentStore::new();
        store.insert_comment(&new_comment(1, None, "a")).await.unwrap();
        store.insert_comment(&new_comment(2, None, "b")).await.unwrap();

        let rows = store.fetch_comments(PostId::new(2)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].content, "b");
        assert!(store.fetch_comments(PostId::new(3)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_orders_by_created_at() {
        let store = InMemoryCommentStore::with_comments(vec![
            seeded(2, 1, 30),
            seeded(1, 1, 10),
        ]);
        let rows = store.fetch_comments(PostId::new(1)).await.unwrap();
        let ids: Vec<i64> = rows.iter().map(|c| c.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn seeded_store_continues_id_sequence() {
        let store = InMemoryCommentStore::with_comments(vec![seeded(10, 1, 0)]);
        store.insert_comment(&new_comment(1, None, "next")).await.unwrap();
        let rows = store.fetch_comments(PostId::new(1)).await.unwrap();
        assert_eq!(rows.last().unwrap().id, CommentId::new(11));
        assert!(rows.last().unwrap().created_at > rows[0].created_at);
    }

    #[tokio::test]
    async fn injected_read_failure() {
        let store = InMemoryCommentStore::new();
        store.set_read_failure(Some("connection reset".into()));
        let err = store.fetch_comments(PostId::new(1)).await.unwrap_err();
        assert_eq!(err, StoreError::Unavailable("connection reset".into()));

        store.set_read_failure(None);
        assert!(store.fetch_comments(PostId::new(1)).await.is_ok());
        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test]
    async fn injected_write_failure_stores_nothing() {
        let store = InMemoryCommentStore::new();
        store.set_write_failure(Some("quota exceeded".into()));
        let err = store.insert_comment(&new_comment(1, None, "a")).await.unwrap_err();
        assert!(err.message().contains("quota exceeded"));
        assert!(store.is_empty());
        assert_eq!(store.insert_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn latency_delays_answer() {
        let store = InMemoryCommentStore::new();
        store.set_latency(Some(Duration::from_millis(250)));
        let started = tokio::time::Instant::now();
        store.fetch_comments(PostId::new(1)).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(250));
    }

    #[test]
    fn debug_shows_row_count() {
        let store = InMemoryCommentStore::with_comments(vec![seeded(1, 1, 0)]);
        assert_eq!(format!("{store:?}"), "InMemoryCommentStore { row_count: 1 }");
    }
}
