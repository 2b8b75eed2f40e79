//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be wired into the board.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Filter, Topic};

#[cfg(feature = "testing")]
use mockall::automock;

/// A durable storage namespace (one directory, one browser storage area, ...).
///
/// `set` replaces the whole value: a concurrent `get` observes either the
/// previous or the new value, never a partial write.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// The remote calls the board pretends to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCall {
    FetchTopics,
    CreateTopic,
    CreateReply,
}

/// Models the round trip of a remote call: how long it takes and whether it
/// succeeds. Swapping in a real backend means replacing this, not the callers.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait LatencyProvider: Send + Sync {
    async fn settle(&self, call: RemoteCall) -> Result<()>;
}

/// What the board hands to its display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardView {
    /// Initial fetch still in flight
    Loading,
    /// Fetch failed; carries the message to show
    Unavailable(String),
    /// Projected topics for the active filter. Empty means "no topics yet".
    Topics { filter: Filter, topics: Vec<Topic> },
}

/// Display surface contract. Called after the initial load, after every
/// successful mutation and after every filter change.
#[cfg_attr(feature = "testing", automock)]
pub trait RenderSink: Send + Sync {
    fn render(&self, view: &BoardView);
}
