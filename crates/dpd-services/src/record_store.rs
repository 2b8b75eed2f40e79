//! # Record Store
//!
//! Owns the canonical topic collection (replies included) and its durable
//! copy. Every write goes through [`RecordStore::commit`], which persists the
//! full collection before the in-memory state is replaced.

use std::sync::Arc;

use dpd_core::error::{AppError, Result};
use dpd_core::models::{MalformedDataPolicy, Topic};
use dpd_core::traits::KeyValueStore;
use tokio::sync::RwLock;

use crate::ids::IdSequence;
use crate::seed::sample_topics;

pub const DEFAULT_TOPICS_KEY: &str = "dpd_topics";

pub struct RecordStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    on_malformed: MalformedDataPolicy,
    topics: RwLock<Vec<Topic>>,
    ids: IdSequence,
}

impl RecordStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            on_malformed: MalformedDataPolicy::default(),
            topics: RwLock::new(Vec::new()),
            ids: IdSequence::new(),
        }
    }

    pub fn with_malformed_policy(mut self, policy: MalformedDataPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    /// Reads the durable collection. With nothing stored yet this returns the
    /// seed set without writing it; the first mutation persists it.
    pub async fn load(&self) -> Result<Vec<Topic>> {
        let Some(raw) = self.storage.get(&self.key).await? else {
            tracing::info!(key = %self.key, "no stored topics, using sample data");
            return Ok(sample_topics());
        };

        match serde_json::from_str::<Vec<Topic>>(&raw) {
            Ok(topics) => Ok(topics),
            Err(err) => match self.on_malformed {
                MalformedDataPolicy::Fail => {
                    tracing::error!(key = %self.key, error = %err, "stored topics are malformed");
                    Err(AppError::MalformedData(err.to_string()))
                }
                MalformedDataPolicy::Reseed => {
                    tracing::warn!(key = %self.key, error = %err, "stored topics are malformed, falling back to sample data");
                    Ok(sample_topics())
                }
            },
        }
    }

    /// Serializes the full collection and replaces the stored copy.
    pub async fn persist(&self, topics: &[Topic]) -> Result<()> {
        let raw = serde_json::to_string(topics)
            .map_err(|e| AppError::Persistence(format!("serialize topics: {e}")))?;
        self.storage.set(&self.key, &raw).await?;
        tracing::debug!(key = %self.key, topics = topics.len(), "persisted topics");
        Ok(())
    }

    /// Loads from storage into memory and primes the id sequence past every
    /// id already in use.
    ///
    /// The write lock is taken before reading storage, so a commit can never
    /// land between the read and the swap and then be overwritten by it.
    pub async fn hydrate(&self) -> Result<usize> {
        let mut guard = self.topics.write().await;
        let loaded = self.load().await?;
        if let Some(max) = loaded.iter().map(Topic::max_id).max() {
            self.ids.observe(max);
        }
        *guard = loaded;
        Ok(guard.len())
    }

    /// A copy of the current collection, in store order (newest first).
    pub async fn snapshot(&self) -> Vec<Topic> {
        self.topics.read().await.clone()
    }

    pub async fn find(&self, topic_id: i64) -> Option<Topic> {
        self.topics
            .read()
            .await
            .iter()
            .find(|t| t.id == topic_id)
            .cloned()
    }

    pub fn next_id(&self) -> i64 {
        self.ids.next()
    }

    /// Applies `apply` to a working copy, persists the copy, then swaps it in.
    ///
    /// Holds the write lock throughout, so commits are atomic with respect to
    /// each other and to readers. If `apply` or `persist` fails, neither memory
    /// nor storage changes.
    pub async fn commit<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Topic>) -> Result<T> + Send,
        T: Send,
    {
        let mut guard = self.topics.write().await;
        let mut working = guard.clone();
        let out = apply(&mut working)?;
        self.persist(&working).await?;
        *guard = working;
        Ok(out)
    }
}
