use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use threadline_types::PostId;

use crate::controller::SyncController;

/// A running poll loop for one post.
///
/// The loop fetches once immediately and then once per poll interval. A
/// failed fetch is logged and retried on the next tick. Cancelling or
/// dropping the handle aborts the loop; a fetch in flight at that moment is
/// abandoned and its result never reaches the cache.
#[derive(Debug)]
pub struct PollHandle {
    post_id: PostId,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub(crate) fn spawn(controller: SyncController, post_id: PostId) -> Self {
        let period = controller.config().poll_interval();
        info!(post = %post_id, period_ms = period.as_millis() as u64, "polling started");

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                debug!(post = %post_id, "poll tick");
                // Errors are already recorded in the cache entry.
                let _ = controller.refresh(post_id).await;
            }
        });

        Self { post_id, task }
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop polling.
    pub fn cancel(self) {
        // Drop does the work.
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if !self.task.is_finished() {
            self.task.abort();
            info!(post = %self.post_id, "polling stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use threadline_store::{CommentStore, InMemoryCommentStore};
    use threadline_types::NewComment;
    use tokio::time::Instant;

    use super::*;
    use crate::config::SyncConfig;
    use crate::identity::StaticIdentity;

    const POST: PostId = PostId::new(3);

    fn setup() -> (Arc<InMemoryCommentStore>, SyncController) {
        let store = Arc::new(InMemoryCommentStore::new());
        let controller = SyncController::new(
            store.clone(),
            Arc::new(StaticIdentity::anonymous()),
            SyncConfig::default(),
        );
        (store, controller)
    }

    fn row(content: &str) -> NewComment {
        NewComment {
            post_id: POST,
            content: content.into(),
            parent_comment_id: None,
            author_id: "u-2".into(),
            author_display_name: "Grace".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_on_start_then_every_interval() {
        let (store, controller) = setup();
        let mut rx = controller.watch(POST);
        let started = Instant::now();
        let handle = controller.start_polling(POST);
        assert!(handle.is_active());

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_ready());
        assert!(started.elapsed() < Duration::from_millis(5_000));
        assert_eq!(store.fetch_count(), 1);

        store.insert_comment(&row("new")).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().data.as_ref().unwrap().len(), 1);
        assert!(started.elapsed() >= Duration::from_millis(5_000));
        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_tick_is_retried_next_tick() {
        let (store, controller) = setup();
        store.insert_comment(&row("kept")).await.unwrap();
        let mut rx = controller.watch(POST);
        let _handle = controller.start_polling(POST);

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_ready());

        store.set_read_failure(Some("gateway timeout".into()));
        rx.changed().await.unwrap();
        {
            let query = rx.borrow_and_update();
            assert!(query.is_error());
            assert_eq!(query.data.as_ref().unwrap().len(), 1);
        }

        store.set_read_failure(None);
        rx.changed().await.unwrap();
        let query = rx.borrow_and_update();
        assert!(query.is_ready());
        assert!(query.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_the_loop() {
        let (store, controller) = setup();
        let mut rx = controller.watch(POST);
        let handle = controller.start_polling(POST);
        rx.changed().await.unwrap();
        assert_eq!(handle.post_id(), POST);

        handle.cancel();
        let seen = store.fetch_count();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(store.fetch_count(), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_loop() {
        let (store, controller) = setup();
        {
            let mut rx = controller.watch(POST);
            let _handle = controller.start_polling(POST);
            rx.changed().await.unwrap();
        }
        let seen = store.fetch_count();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(store.fetch_count(), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_in_flight_is_abandoned_on_cancel() {
        let (store, controller) = setup();
        store.set_latency(Some(Duration::from_secs(2)));
        let handle = controller.start_polling(POST);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(store.fetch_count(), 1);

        handle.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(controller.load_comments(POST).is_loading());
    }
}
