//! # Board controller
//!
//! The explicit state object behind one client's board: topic store,
//! mutation gateway, active filter and loading flag. Every state change ends
//! with a fresh [`BoardView`] pushed to the render sink.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dpd_core::error::Result;
use dpd_core::models::{Filter, NewReply, NewTopic, Reply, Topic};
use dpd_core::projection::project;
use dpd_core::traits::{BoardView, LatencyProvider, RemoteCall, RenderSink};
use tokio::sync::RwLock;

use crate::gateway::MutationGateway;
use crate::identity::ClientIdentity;
use crate::record_store::RecordStore;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load topics. Please try again later.";

pub struct Board {
    store: Arc<RecordStore>,
    gateway: MutationGateway,
    latency: Arc<dyn LatencyProvider>,
    identity: ClientIdentity,
    sink: Arc<dyn RenderSink>,
    filter: RwLock<Filter>,
    loading: AtomicBool,
}

impl Board {
    pub fn new(
        store: Arc<RecordStore>,
        latency: Arc<dyn LatencyProvider>,
        identity: ClientIdentity,
        sink: Arc<dyn RenderSink>,
    ) -> Self {
        Self {
            gateway: MutationGateway::new(store.clone(), latency.clone()),
            store,
            latency,
            identity,
            sink,
            filter: RwLock::new(Filter::All),
            loading: AtomicBool::new(true),
        }
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn gateway(&self) -> &MutationGateway {
        &self.gateway
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub async fn filter(&self) -> Filter {
        *self.filter.read().await
    }

    /// Initial (or repeated) fetch of the collection.
    pub async fn fetch_topics(&self) -> Result<()> {
        self.loading.store(true, Ordering::SeqCst);
        self.sink.render(&BoardView::Loading);

        let fetched = match self.latency.settle(RemoteCall::FetchTopics).await {
            Ok(()) => self.store.hydrate().await,
            Err(e) => Err(e),
        };
        self.loading.store(false, Ordering::SeqCst);

        match fetched {
            Ok(count) => {
                tracing::info!(count, "topics loaded");
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "error fetching topics");
                self.sink
                    .render(&BoardView::Unavailable(LOAD_FAILED_MESSAGE.to_string()));
                Err(e)
            }
        }
    }

    pub async fn set_filter(&self, filter: Filter) {
        *self.filter.write().await = filter;
        tracing::debug!(%filter, "filter changed");
        self.refresh().await;
    }

    /// Posts a topic. Without an explicit `user_id` it is posted on behalf
    /// of this client.
    pub async fn submit_topic(&self, mut input: NewTopic) -> Result<Topic> {
        // Bad input must not mint a client id.
        input.validate()?;
        if input.user_id.is_none() {
            input.user_id = Some(self.identity.get_or_create().await?);
        }
        let topic = self.gateway.create_topic(input).await?;
        self.refresh().await;
        Ok(topic)
    }

    pub async fn submit_reply(&self, topic_id: i64, mut input: NewReply) -> Result<Reply> {
        input.validate()?;
        if input.user_id.is_none() {
            input.user_id = Some(self.identity.get_or_create().await?);
        }
        let reply = self.gateway.create_reply(topic_id, input).await?;
        self.refresh().await;
        Ok(reply)
    }

    /// What the sink should show right now.
    pub async fn view(&self) -> BoardView {
        if self.is_loading() {
            return BoardView::Loading;
        }
        let filter = self.filter().await;
        let topics = project(&self.store.snapshot().await, filter);
        BoardView::Topics { filter, topics }
    }

    async fn refresh(&self) {
        let view = self.view().await;
        self.sink.render(&view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latency::SimulatedLatency;
    use crate::record_store::DEFAULT_TOPICS_KEY;
    use dpd_core::error::AppError;
    use dpd_core::models::Category;
    use async_trait::async_trait;
    use dpd_core::traits::{KeyValueStore, MockKeyValueStore, MockLatencyProvider};
    use dpd_storage_local::MemoryKeyValueStore;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Storage whose reads finish only after `delay`, holding the value read
    /// at the start.
    struct SlowReads {
        inner: MemoryKeyValueStore,
        delay: Duration,
    }

    #[async_trait]
    impl KeyValueStore for SlowReads {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            let value = self.inner.get(key).await?;
            tokio::time::sleep(self.delay).await;
            Ok(value)
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key).await
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        frames: Mutex<Vec<BoardView>>,
    }

    impl RecordingSink {
        fn frames(&self) -> Vec<BoardView> {
            self.frames.lock().unwrap().clone()
        }

        fn last(&self) -> BoardView {
            self.frames().pop().expect("nothing rendered")
        }
    }

    impl RenderSink for RecordingSink {
        fn render(&self, view: &BoardView) {
            self.frames.lock().unwrap().push(view.clone());
        }
    }

    fn board_with(latency: Arc<dyn LatencyProvider>) -> (Board, Arc<RecordingSink>, Arc<dyn KeyValueStore>) {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let store = Arc::new(RecordStore::new(storage.clone(), DEFAULT_TOPICS_KEY));
        let identity = ClientIdentity::new(storage.clone(), "dpd_user_id");
        let sink = Arc::new(RecordingSink::default());
        let board = Board::new(store, latency, identity, sink.clone());
        (board, sink, storage)
    }

    fn topic_ids(view: &BoardView) -> Vec<i64> {
        match view {
            BoardView::Topics { topics, .. } => topics.iter().map(|t| t.id).collect(),
            other => panic!("expected topics, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_renders_loading_then_topics() {
        let (board, sink, _) = board_with(Arc::new(SimulatedLatency::instant()));
        assert!(board.is_loading());

        board.fetch_topics().await.unwrap();

        let frames = sink.frames();
        assert_eq!(frames[0], BoardView::Loading);
        assert_eq!(topic_ids(&frames[1]), vec![1, 2, 3]);
        assert!(!board.is_loading());
    }

    #[tokio::test]
    async fn failed_fetch_renders_unavailable() {
        let mut latency = MockLatencyProvider::new();
        latency
            .expect_settle()
            .returning(|_| Err(AppError::Internal("offline".into())));
        let (board, sink, _) = board_with(Arc::new(latency));

        assert!(board.fetch_topics().await.is_err());
        assert_eq!(sink.last(), BoardView::Unavailable(LOAD_FAILED_MESSAGE.into()));
        assert!(!board.is_loading());
    }

    #[tokio::test]
    async fn filter_changes_rerender_projection() {
        let (board, sink, _) = board_with(Arc::new(SimulatedLatency::instant()));
        board.fetch_topics().await.unwrap();

        board.set_filter(Filter::Category(Category::Education)).await;
        assert_eq!(topic_ids(&sink.last()), vec![3]);

        board.set_filter(Filter::Category(Category::Science)).await;
        assert_eq!(
            sink.last(),
            BoardView::Topics { filter: Filter::Category(Category::Science), topics: vec![] }
        );

        board.set_filter(Filter::All).await;
        assert_eq!(topic_ids(&sink.last()), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn submissions_carry_client_identity_and_rerender() {
        let (board, sink, storage) = board_with(Arc::new(SimulatedLatency::instant()));
        board.fetch_topics().await.unwrap();

        let topic = board
            .submit_topic(NewTopic {
                title: "X".into(),
                content: "Y".into(),
                category: "science".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let reply = board
            .submit_reply(topic.id, NewReply { content: "hi".into(), ..Default::default() })
            .await
            .unwrap();

        let client_id = storage.get("dpd_user_id").await.unwrap();
        assert!(client_id.is_some());
        assert_eq!(topic.user_id, client_id);
        assert_eq!(reply.user_id, client_id);
        assert_eq!(topic_ids(&sink.last()), vec![topic.id, 1, 2, 3]);
    }

    #[tokio::test]
    async fn explicit_user_id_is_kept() {
        let (board, _, _) = board_with(Arc::new(SimulatedLatency::instant()));
        board.fetch_topics().await.unwrap();

        let reply = board
            .submit_reply(
                2,
                NewReply {
                    content: "hi".into(),
                    user_id: Some("user_remote".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(reply.user_id.as_deref(), Some("user_remote"));
    }

    #[tokio::test]
    async fn rejected_submission_does_not_rerender() {
        let (board, sink, _) = board_with(Arc::new(SimulatedLatency::instant()));
        board.fetch_topics().await.unwrap();
        let rendered = sink.frames().len();

        let err = board
            .submit_reply(1, NewReply { content: " ".into(), ..Default::default() })
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(sink.frames().len(), rendered);
    }

    #[tokio::test]
    async fn rejected_submission_mints_no_client_id() {
        let mut storage = MockKeyValueStore::new();
        storage.expect_get().never();
        storage.expect_set().never();
        let storage: Arc<dyn KeyValueStore> = Arc::new(storage);
        let board = Board::new(
            Arc::new(RecordStore::new(storage.clone(), DEFAULT_TOPICS_KEY)),
            Arc::new(SimulatedLatency::instant()),
            ClientIdentity::new(storage, "dpd_user_id"),
            Arc::new(RecordingSink::default()),
        );

        let err = board
            .submit_topic(NewTopic { title: "X".into(), category: "science".into(), ..Default::default() })
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let err = board
            .submit_reply(1, NewReply { content: "".into(), ..Default::default() })
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn refetch_during_create_keeps_the_new_topic() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(SlowReads {
            inner: MemoryKeyValueStore::new(),
            delay: Duration::from_millis(50),
        });
        let store = Arc::new(RecordStore::new(storage.clone(), DEFAULT_TOPICS_KEY));
        let board = Arc::new(Board::new(
            store.clone(),
            Arc::new(SimulatedLatency::instant()),
            ClientIdentity::new(storage.clone(), "dpd_user_id"),
            Arc::new(RecordingSink::default()),
        ));
        board.fetch_topics().await.unwrap();

        let refetch = tokio::spawn({
            let board = board.clone();
            async move { board.fetch_topics().await }
        });
        // Let the refetch start reading storage before the create commits.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let created = board
            .submit_topic(NewTopic {
                title: "X".into(),
                content: "Y".into(),
                category: "science".into(),
                user_id: Some("user_a".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        refetch.await.unwrap().unwrap();

        let ids: Vec<i64> = store.snapshot().await.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![created.id, 1, 2, 3]);

        board
            .submit_reply(2, NewReply { content: "later".into(), user_id: Some("user_a".into()), ..Default::default() })
            .await
            .unwrap();
        let durable = store.load().await.unwrap();
        assert_eq!(durable[0].id, created.id);
        assert_eq!(durable.len(), 4);
    }

    #[tokio::test]
    async fn second_fetch_after_commits_shows_committed_state() {
        let (board, sink, _) = board_with(Arc::new(SimulatedLatency::instant()));
        board.fetch_topics().await.unwrap();
        let topic = board
            .submit_topic(NewTopic {
                title: "X".into(),
                content: "Y".into(),
                category: "ethics".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        board
            .submit_reply(topic.id, NewReply { content: "a".into(), ..Default::default() })
            .await
            .unwrap();

        board.fetch_topics().await.unwrap();

        assert_eq!(topic_ids(&sink.last()), vec![topic.id, 1, 2, 3]);
        let refetched = board.store().find(topic.id).await.unwrap();
        assert_eq!(refetched.replies.len(), 1);
    }
}
