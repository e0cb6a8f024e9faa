use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use threadline_types::{Comment, PostId};
use tokio::sync::watch;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryStatus {
    Loading,
    Error,
    Ready,
}

/// Observable state of one post's comment list.
///
/// `data` survives a failed refresh: after an error it still holds the last
/// successfully fetched list, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentsQuery {
    pub status: QueryStatus,
    pub data: Option<Arc<Vec<Comment>>>,
    pub error: Option<String>,
}

impl CommentsQuery {
    pub fn loading() -> Self {
        Self {
            status: QueryStatus::Loading,
            data: None,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_ready(&self) -> bool {
        self.status == QueryStatus::Ready
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }
}

impl Default for CommentsQuery {
    fn default() -> Self {
        Self::loading()
    }
}

/// Bookkeeping for one cache entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Fetches started for this post.
    pub fetches: u64,
    /// Times the list was invalidated.
    pub invalidations: u64,
    /// Set by invalidation, cleared by the next successful fetch.
    pub stale: bool,
    pub last_success_at: Option<DateTime<Utc>>,
}

struct CacheEntry {
    state: watch::Sender<CommentsQuery>,
    stats: CacheStats,
}

impl CacheEntry {
    fn new() -> Self {
        let (state, _) = watch::channel(CommentsQuery::loading());
        Self {
            state,
            stats: CacheStats::default(),
        }
    }
}

/// Comment lists keyed by post.
///
/// Written only by the sync controller's fetch path and by invalidation;
/// read by any number of views through [`CommentCache::query`] or a watch
/// receiver. Entries are created by [`CommentCache::subscribe`] and live
/// until [`CommentCache::evict`]; results arriving for a post without an
/// entry are discarded.
#[derive(Default)]
pub struct CommentCache {
    entries: RwLock<HashMap<PostId, CacheEntry>>,
}

impl CommentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of `post_id`. `Loading` if nothing was fetched yet.
    pub fn query(&self, post_id: PostId) -> CommentsQuery {
        self.entries
            .read()
            .expect("lock poisoned")
            .get(&post_id)
            .map(|entry| entry.state.borrow().clone())
            .unwrap_or_default()
    }

    /// Subscribe to state changes of `post_id`, creating its entry.
    pub fn subscribe(&self, post_id: PostId) -> watch::Receiver<CommentsQuery> {
        self.entries
            .write()
            .expect("lock poisoned")
            .entry(post_id)
            .or_insert_with(CacheEntry::new)
            .state
            .subscribe()
    }

    pub fn stats(&self, post_id: PostId) -> Option<CacheStats> {
        self.entries
            .read()
            .expect("lock poisoned")
            .get(&post_id)
            .map(|entry| entry.stats.clone())
    }

    /// Mark the list of `post_id` stale. A post without an entry has nothing
    /// to invalidate: this is a no-op returning `false`.
    pub fn invalidate(&self, post_id: PostId) -> bool {
        let mut entries = self.entries.write().expect("lock poisoned");
        match entries.get_mut(&post_id) {
            Some(entry) => {
                entry.stats.stale = true;
                entry.stats.invalidations += 1;
                true
            }
            None => false,
        }
    }

    /// Drop the entry of `post_id`. Open watch receivers see the channel close.
    pub fn evict(&self, post_id: PostId) -> bool {
        self.entries
            .write()
            .expect("lock poisoned")
            .remove(&post_id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count a fetch for `post_id`. Returns `false` if the post has no entry;
    /// only [`CommentCache::subscribe`] creates entries.
    pub(crate) fn begin_fetch(&self, post_id: PostId) -> bool {
        let mut entries = self.entries.write().expect("lock poisoned");
        match entries.get_mut(&post_id) {
            Some(entry) => {
                entry.stats.fetches += 1;
                true
            }
            None => false,
        }
    }

    /// Replace the list of `post_id`. Returns `false` if the entry was
    /// evicted while the fetch was in flight.
    pub(crate) fn record_success(&self, post_id: PostId, data: Arc<Vec<Comment>>) -> bool {
        let mut entries = self.entries.write().expect("lock poisoned");
        let Some(entry) = entries.get_mut(&post_id) else {
            debug!(post = %post_id, "discarding fetch result for evicted post");
            return false;
        };
        entry.stats.stale = false;
        entry.stats.last_success_at = Some(Utc::now());
        entry.state.send_replace(CommentsQuery {
            status: QueryStatus::Ready,
            data: Some(data),
            error: None,
        });
        true
    }

    /// Record a failed fetch, keeping the last good list.
    pub(crate) fn record_failure(&self, post_id: PostId, message: String) {
        let mut entries = self.entries.write().expect("lock poisoned");
        let Some(entry) = entries.get_mut(&post_id) else {
            debug!(post = %post_id, "discarding fetch error for evicted post");
            return;
        };
        entry.state.send_modify(|query| {
            query.status = QueryStatus::Error;
            query.error = Some(message);
        });
    }
}

impl std::fmt::Debug for CommentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentCache")
            .field("entries", &self.len())
            .finish()
    }
}
