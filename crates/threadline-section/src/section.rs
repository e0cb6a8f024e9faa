use std::sync::Arc;

use threadline_sync::{CommentsQuery, PollHandle, QueryStatus, SyncController, SyncError};
use threadline_tree::{build_forest_with_report, CommentNode};
use threadline_types::{Comment, CommentDraft, PostId};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::{SectionError, SectionResult};
use crate::view::{Composer, SectionView, ThreadBody, SIGN_IN_NOTICE};

/// Forest built from one flat list, kept until the list changes.
struct BuiltForest {
    source: Arc<Vec<Comment>>,
    forest: Arc<Vec<CommentNode>>,
}

/// The discussion under one post.
///
/// While mounted, the section polls its post and the cache entry for the
/// post exists; unmounting (or dropping the section) stops the poll and
/// evicts the entry. Use one section per post and controller.
pub struct CommentSection {
    post_id: PostId,
    controller: SyncController,
    state: watch::Receiver<CommentsQuery>,
    poll: Option<PollHandle>,
    built: Option<BuiltForest>,
    rebuilds: usize,
    post_error: Option<String>,
}

impl CommentSection {
    pub fn new(controller: SyncController, post_id: PostId) -> Self {
        let state = controller.watch(post_id);
        Self {
            post_id,
            controller,
            state,
            poll: None,
            built: None,
            rebuilds: 0,
            post_error: None,
        }
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    pub fn controller(&self) -> &SyncController {
        &self.controller
    }

    pub fn is_mounted(&self) -> bool {
        self.poll.is_some()
    }

    /// Start polling. Calling it on a mounted section does nothing.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(&mut self) {
        if self.poll.is_some() {
            return;
        }
        if self.state.has_changed().is_err() {
            // Evicted by an earlier unmount.
            self.state = self.controller.watch(self.post_id);
        }
        self.poll = Some(self.controller.start_polling(self.post_id));
        info!(post = %self.post_id, "comment section mounted");
    }

    /// Stop polling and drop the cached list of this post. Also releases the
    /// entry of a section that was never mounted.
    pub fn unmount(&mut self) {
        let poll = self.poll.take();
        let evicted = self.controller.cache().evict(self.post_id);
        self.built = None;
        if let Some(poll) = poll {
            poll.cancel();
            info!(post = %self.post_id, "comment section unmounted");
        } else if evicted {
            debug!(post = %self.post_id, "released cache entry of unmounted section");
        }
    }

    /// Number of times the forest was rebuilt from a new flat list.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    /// Wait for the next state change of this post.
    pub async fn changed(&mut self) -> SectionResult<()> {
        if !self.is_mounted() {
            return Err(SectionError::NotMounted(self.post_id));
        }
        self.state
            .changed()
            .await
            .map_err(|_| SectionError::NotMounted(self.post_id))
    }

    /// Produce the current view.
    ///
    /// The forest is rebuilt only when the synchronized list is a different
    /// list than the one the previous render used.
    pub fn render(&mut self) -> SectionView {
        let query = self.state.borrow_and_update().clone();

        let forest = query.data.as_ref().map(|data| self.forest_for(data));
        let thread = match (query.status, forest) {
            (QueryStatus::Ready, Some(forest)) => ThreadBody::Ready { forest },
            (QueryStatus::Error, stale) => ThreadBody::Failed {
                message: query.error.unwrap_or_default(),
                stale,
            },
            _ => ThreadBody::Loading,
        };

        let composer = match self.controller.identity() {
            Some(identity) => Composer::Open {
                display_name: identity.display_name,
            },
            None => Composer::SignInNotice,
        };

        SectionView {
            post_id: self.post_id,
            thread,
            composer,
            post_error: self.post_error.clone(),
        }
    }

    /// Submit the compose form.
    ///
    /// A failure is returned and also kept as the view's `post_error` until
    /// the next successful submit. Without an identity that message is
    /// [`SIGN_IN_NOTICE`]. The cached list is only touched on
    /// success.
    pub async fn submit(&mut self, draft: CommentDraft) -> SectionResult<()> {
        match self.controller.post_comment(self.post_id, draft).await {
            Ok(()) => {
                self.post_error = None;
                Ok(())
            }
            Err(SyncError::Unauthenticated) => {
                self.post_error = Some(SIGN_IN_NOTICE.to_string());
                Err(SyncError::Unauthenticated.into())
            }
            Err(err) => {
                self.post_error = Some(err.user_message());
                Err(err.into())
            }
        }
    }

    fn forest_for(&mut self, data: &Arc<Vec<Comment>>) -> Arc<Vec<CommentNode>> {
        if let Some(built) = &self.built {
            if Arc::ptr_eq(&built.source, data) {
                return Arc::clone(&built.forest);
            }
        }

        let (forest, report) = build_forest_with_report(data);
        if !report.is_complete() {
            debug!(post = %self.post_id, dropped = ?report.orphans, "comments without a resolvable parent");
        }
        let forest = Arc::new(forest);
        self.built = Some(BuiltForest {
            source: Arc::clone(data),
            forest: Arc::clone(&forest),
        });
        self.rebuilds += 1;
        forest
    }
}

impl Drop for CommentSection {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for CommentSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentSection")
            .field("post_id", &self.post_id)
            .field("mounted", &self.is_mounted())
            .field("rebuilds", &self.rebuilds)
            .finish()
    }
}
