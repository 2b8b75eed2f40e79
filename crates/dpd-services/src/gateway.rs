//! # Async Mutation Gateway
//!
//! The only way topics and replies come into existence. Each operation
//! validates, waits out the (simulated) remote round trip, then commits to
//! the [`RecordStore`].
//!
//! # Developer Note
//! Mutations are funneled through a fair async mutex, so two calls issued
//! back to back commit in issue order and never interleave their
//! locate/modify/persist steps.

use std::sync::Arc;

use chrono::Utc;
use dpd_core::error::{AppError, Result};
use dpd_core::models::{NewReply, NewTopic, Reply, Topic};
use dpd_core::traits::{LatencyProvider, RemoteCall};
use tokio::sync::Mutex;

use crate::record_store::RecordStore;

pub struct MutationGateway {
    store: Arc<RecordStore>,
    latency: Arc<dyn LatencyProvider>,
    queue: Mutex<()>,
}

impl MutationGateway {
    pub fn new(store: Arc<RecordStore>, latency: Arc<dyn LatencyProvider>) -> Self {
        Self {
            store,
            latency,
            queue: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Creates a topic and prepends it to the collection (newest first).
    #[tracing::instrument(skip_all, fields(category = %input.category))]
    pub async fn create_topic(&self, input: NewTopic) -> Result<Topic> {
        let draft = input.validate().inspect_err(|e| {
            tracing::debug!(error = %e, "rejected topic");
        })?;

        let _turn = self.queue.lock().await;
        self.latency.settle(RemoteCall::CreateTopic).await?;

        let topic = Topic {
            id: self.store.next_id(),
            title: draft.title,
            content: draft.content,
            author: draft.author,
            category: draft.category,
            date: Utc::now(),
            replies: Vec::new(),
            user_id: draft.user_id,
        };

        let created = topic.clone();
        self.store
            .commit(move |topics| {
                topics.insert(0, created);
                Ok(())
            })
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to create topic"))?;

        tracing::info!(topic_id = topic.id, "topic created");
        Ok(topic)
    }

    /// Appends a reply to the topic with `topic_id`.
    #[tracing::instrument(skip(self, input))]
    pub async fn create_reply(&self, topic_id: i64, input: NewReply) -> Result<Reply> {
        let draft = input.validate().inspect_err(|e| {
            tracing::debug!(error = %e, "rejected reply");
        })?;

        let _turn = self.queue.lock().await;
        self.latency.settle(RemoteCall::CreateReply).await?;

        let reply = Reply {
            id: self.store.next_id(),
            author: draft.author,
            content: draft.content,
            date: Utc::now(),
            user_id: draft.user_id,
        };

        let created = reply.clone();
        self.store
            .commit(move |topics| {
                let topic = topics
                    .iter_mut()
                    .find(|t| t.id == topic_id)
                    .ok_or_else(|| AppError::topic_not_found(topic_id))?;
                topic.replies.push(created);
                Ok(())
            })
            .await
            .inspect_err(|e| match e {
                AppError::NotFound(..) => tracing::warn!(error = %e, "reply to unknown topic"),
                _ => tracing::error!(error = %e, "failed to create reply"),
            })?;

        tracing::info!(reply_id = reply.id, "reply created");
        Ok(reply)
    }
}
