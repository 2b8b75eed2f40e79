//! Middleware
//!
//! Request logging and cross-origin policy for the board API.

use actix_cors::Cors;
use actix_web::middleware::Logger;

/// Access log: remote-ip "request-line" status-code response-size and latency.
pub fn standard_middleware() -> Logger {
    Logger::new("%a \"%r\" %s %b %Dms")
}

/// The JSON API is read and written by board pages that may live on another
/// origin (a static page during development, for one). Only the two verbs
/// the API routes use are allowed.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST"])
        .allow_any_header()
        .max_age(3600)
}
