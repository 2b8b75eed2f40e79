//! Shared fixtures for the cross-crate tests.

use std::path::Path;
use std::sync::Arc;

use dpd_core::traits::{KeyValueStore, LatencyProvider};
use dpd_services::{
    Board, ClientIdentity, RecordStore, SimulatedLatency, DEFAULT_CLIENT_ID_KEY, DEFAULT_TOPICS_KEY,
};
use dpd_storage_local::LocalKeyValueStore;
use dpd_ui::HtmlRenderer;

/// Everything one client session needs, backed by a directory on disk.
pub struct Session {
    pub storage: Arc<dyn KeyValueStore>,
    pub renderer: Arc<HtmlRenderer>,
    pub board: Board,
}

impl Session {
    pub fn open(dir: &Path) -> Self {
        Self::open_with(dir, Arc::new(SimulatedLatency::instant()))
    }

    pub fn open_with(dir: &Path, latency: Arc<dyn LatencyProvider>) -> Self {
        let storage: Arc<dyn KeyValueStore> = Arc::new(LocalKeyValueStore::new(dir.to_path_buf()));
        let store = Arc::new(RecordStore::new(storage.clone(), DEFAULT_TOPICS_KEY));
        let identity = ClientIdentity::new(storage.clone(), DEFAULT_CLIENT_ID_KEY);
        let renderer = Arc::new(HtmlRenderer::new());
        let board = Board::new(store, latency, identity, renderer.clone());
        Self { storage, renderer, board }
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        self.board.store()
    }
}
