//! # Deer Park Binary
//!
//! The entry point that assembles the board from its plugins and serves it.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use dpd_api::handlers::AppState;
use dpd_config::{LogFormat, LogSettings, Settings};
use dpd_core::traits::KeyValueStore;
use dpd_services::{Board, ClientIdentity, RecordStore, SimulatedLatency};
use dpd_storage_local::LocalKeyValueStore;
use dpd_ui::HtmlRenderer;
use tracing_subscriber::EnvFilter;

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings.log);

    // 1. Durable storage namespace
    let storage: Arc<dyn KeyValueStore> =
        Arc::new(LocalKeyValueStore::new(settings.storage.data_dir.clone()));

    // 2. Client identity (storage must be usable before anything else runs)
    let identity = ClientIdentity::new(storage.clone(), settings.storage.client_id_key.clone());
    let client_id = identity
        .get_or_create()
        .await
        .context("durable storage is unavailable")?;

    // 3. Record store + simulated backend
    let store = Arc::new(
        RecordStore::new(storage, settings.storage.topics_key.clone())
            .with_malformed_policy(settings.storage.on_malformed),
    );
    let latency = Arc::new(SimulatedLatency::new(
        settings.latency.fetch(),
        settings.latency.mutation(),
    ));

    // 4. Board controller with the HTML sink
    let renderer = Arc::new(HtmlRenderer::new());
    let board = Arc::new(Board::new(store, latency, identity, renderer.clone()));
    if board.fetch_topics().await.is_err() {
        // The page now shows the load failure; keep serving it.
        tracing::warn!("starting with topics unavailable");
    }

    let state = web::Data::new(AppState { board, renderer });
    let (host, port) = settings.bind_address();
    tracing::info!(%client_id, "Deer Park starting on http://{host}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(dpd_api::middleware::cors_policy())
            .wrap(dpd_api::middleware::standard_middleware())
            .configure(dpd_api::configure_routes)
    })
    .bind((host, port))?
    .run()
    .await?;

    Ok(())
}
