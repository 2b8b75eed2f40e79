//! `LatencyProvider` implementations standing in for a remote backend.

use std::time::Duration;

use async_trait::async_trait;
use dpd_core::error::Result;
use dpd_core::traits::{LatencyProvider, RemoteCall};

/// Sleeps for a fixed window per call kind and always succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedLatency {
    pub fetch: Duration,
    pub mutation: Duration,
}

impl SimulatedLatency {
    pub fn new(fetch: Duration, mutation: Duration) -> Self {
        Self { fetch, mutation }
    }

    /// No delay at all. Tests use this to run mutations back to back.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    fn window(&self, call: RemoteCall) -> Duration {
        match call {
            RemoteCall::FetchTopics => self.fetch,
            RemoteCall::CreateTopic | RemoteCall::CreateReply => self.mutation,
        }
    }
}

impl Default for SimulatedLatency {
    /// One second to fetch, half a second per write.
    fn default() -> Self {
        Self::new(Duration::from_millis(1000), Duration::from_millis(500))
    }
}

#[async_trait]
impl LatencyProvider for SimulatedLatency {
    async fn settle(&self, call: RemoteCall) -> Result<()> {
        let window = self.window(call);
        if !window.is_zero() {
            tokio::time::sleep(window).await;
        }
        tracing::trace!(?call, ?window, "simulated round trip settled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn waits_for_the_configured_window() {
        let latency = SimulatedLatency::new(Duration::from_millis(1000), Duration::from_millis(500));
        let start = tokio::time::Instant::now();
        latency.settle(RemoteCall::CreateReply).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert!(start.elapsed() < Duration::from_millis(1000));
        latency.settle(RemoteCall::FetchTopics).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }
}
