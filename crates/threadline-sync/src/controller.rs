use std::sync::Arc;

use threadline_store::CommentStore;
use threadline_types::{Comment, CommentDraft, Identity, PostId};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::cache::{CommentCache, CommentsQuery};
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::identity::IdentityProvider;
use crate::poll::PollHandle;

/// Mediates every interaction with the comment store.
///
/// Cloning is cheap; clones share the store, the identity provider, and the
/// cache.
#[derive(Clone)]
pub struct SyncController {
    store: Arc<dyn CommentStore>,
    identity: Arc<dyn IdentityProvider>,
    cache: Arc<CommentCache>,
    config: SyncConfig,
}

impl SyncController {
    pub fn new(
        store: Arc<dyn CommentStore>,
        identity: Arc<dyn IdentityProvider>,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            identity,
            cache: Arc::new(CommentCache::new()),
            config,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn cache(&self) -> &CommentCache {
        &self.cache
    }

    /// The identity a post would be attributed to right now.
    pub fn identity(&self) -> Option<Identity> {
        self.identity.current()
    }

    /// Snapshot of the cached state of `post_id`. Never waits on the store.
    pub fn load_comments(&self, post_id: PostId) -> CommentsQuery {
        self.cache.query(post_id)
    }

    /// Receiver that sees every state change of `post_id`. Creates the cache
    /// entry for the post, which then lives until evicted.
    pub fn watch(&self, post_id: PostId) -> watch::Receiver<CommentsQuery> {
        self.cache.subscribe(post_id)
    }

    /// Run one fetch cycle for `post_id`.
    ///
    /// On success the cached list is replaced. On failure the entry moves to
    /// the error state but keeps its previous list. Overlapping refreshes are
    /// not sequenced: the last one to complete wins.
    ///
    /// Only posts with a cache entry (see [`SyncController::watch`]) are
    /// cached. For any other post, including one evicted while this fetch
    /// was in flight, the result is returned and then dropped.
    pub async fn refresh(&self, post_id: PostId) -> SyncResult<Arc<Vec<Comment>>> {
        if !self.cache.begin_fetch(post_id) {
            debug!(post = %post_id, "fetching untracked post; result will not be cached");
        }
        match self.store.fetch_comments(post_id).await {
            Ok(rows) => {
                debug!(post = %post_id, rows = rows.len(), "comments fetched");
                let data = Arc::new(rows);
                self.cache.record_success(post_id, Arc::clone(&data));
                Ok(data)
            }
            Err(source) => {
                warn!(post = %post_id, error = %source, "comment fetch failed");
                self.cache.record_failure(post_id, source.message());
                Err(SyncError::StoreRead { post_id, source })
            }
        }
    }

    /// Mark the cached list of `post_id` stale. Does nothing for a post
    /// without a cache entry.
    pub fn invalidate(&self, post_id: PostId) {
        if self.cache.invalidate(post_id) {
            debug!(post = %post_id, "comment cache invalidated");
        }
    }

    /// Post a new comment or reply on `post_id`.
    ///
    /// Fails with [`SyncError::Unauthenticated`] before touching the store if
    /// nobody is signed in. After a successful insert the cached list is
    /// invalidated once and re-fetched immediately; a failure of that
    /// re-fetch shows up in the cache state, not in this result. If the
    /// post's entry is evicted while the insert is in flight, the re-fetch
    /// is not cached.
    pub async fn post_comment(&self, post_id: PostId, draft: CommentDraft) -> SyncResult<()> {
        let Some(author) = self.identity.current() else {
            debug!(post = %post_id, "post rejected: no identity");
            return Err(SyncError::Unauthenticated);
        };
        let row = draft.into_new_comment(post_id, &author)?;

        self.store
            .insert_comment(&row)
            .await
            .map_err(|source| {
                warn!(post = %post_id, error = %source, "comment insert failed");
                SyncError::StoreWrite { post_id, source }
            })?;
        info!(
            post = %post_id,
            author = %author.user_id,
            reply_to = ?row.parent_comment_id,
            "comment posted"
        );

        self.invalidate(post_id);
        if let Err(err) = self.refresh(post_id).await {
            debug!(post = %post_id, error = %err, "refresh after post failed");
        }
        Ok(())
    }

    /// Start polling `post_id`: one fetch now, then one per poll interval,
    /// until the returned handle is cancelled or dropped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_polling(&self, post_id: PostId) -> PollHandle {
        PollHandle::spawn(self.clone(), post_id)
    }
}

impl std::fmt::Debug for SyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncController")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish()
    }
}
