//! # dpd-api
//!
//! The HTTP surface of the board: a JSON API over the same gateway the
//! client uses, plus the rendered board page.

pub mod handlers;
pub mod middleware;

use actix_web::{web, HttpRequest};
use dpd_core::error::AppError;

use crate::handlers::ApiError;

/// Malformed JSON bodies are validation failures, reported like any other.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        ApiError(AppError::Validation(err.to_string())).into()
    })
}

/// Configures the routes for the board.
///
/// # Developer Note
/// Kept as a `ServiceConfig` hook so the binary and the tests mount the
/// exact same routing table.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        // The board page (e.g., /?filter=politics)
        .route("/", web::get().to(handlers::index))
        .service(
            web::scope("/api")
                .route("/topics", web::get().to(handlers::list_topics))
                .route("/topics", web::post().to(handlers::create_topic))
                .route(
                    "/topics/category/{category}",
                    web::get().to(handlers::list_by_category),
                )
                .route(
                    "/topics/{topic_id}/replies",
                    web::post().to(handlers::create_reply),
                ),
        );
}
