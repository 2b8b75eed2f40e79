//! # dpd-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the board.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use dpd_core::error::AppError;
use dpd_core::models::{Filter, NewReply, NewTopic};
use dpd_core::projection::project;
use dpd_services::Board;
use dpd_ui::HtmlRenderer;
use serde::Deserialize;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub board: Arc<Board>,
    /// The board's render sink; holds the page `GET /` serves.
    pub renderer: Arc<HtmlRenderer>,
}

/// Maps board failures onto HTTP responses with a JSON `{ "error": ... }` body.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(..) => StatusCode::NOT_FOUND,
            AppError::Persistence(_) | AppError::MalformedData(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
            "Server error".to_string()
        } else {
            self.0.to_string()
        };
        HttpResponse::build(status).json(serde_json::json!({ "error": message }))
    }
}

type ApiResult = Result<HttpResponse, ApiError>;

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub filter: Option<String>,
}

fn parse_filter(raw: Option<&str>) -> Result<Filter, ApiError> {
    match raw {
        None => Ok(Filter::All),
        Some(raw) => Ok(raw.parse()?),
    }
}

/// `GET /api/topics[?category=C]`, newest first.
pub async fn list_topics(
    data: web::Data<AppState>,
    query: web::Query<CategoryQuery>,
) -> ApiResult {
    let filter = parse_filter(query.category.as_deref())?;
    let topics = project(&data.board.store().snapshot().await, filter);
    Ok(HttpResponse::Ok().json(topics))
}

/// `GET /api/topics/category/{category}`
pub async fn list_by_category(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult {
    let category = path.into_inner().parse()?;
    let topics = project(&data.board.store().snapshot().await, Filter::Category(category));
    Ok(HttpResponse::Ok().json(topics))
}

/// `POST /api/topics`
pub async fn create_topic(
    data: web::Data<AppState>,
    body: web::Json<NewTopic>,
) -> ApiResult {
    let topic = data.board.submit_topic(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(topic))
}

/// `POST /api/topics/{topic_id}/replies`
pub async fn create_reply(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<NewReply>,
) -> ApiResult {
    let reply = data
        .board
        .submit_reply(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(reply))
}

/// Serves the board page. `?filter=politics` switches the board's active
/// filter first; without it the current filter stays.
pub async fn index(data: web::Data<AppState>, query: web::Query<IndexQuery>) -> ApiResult {
    if let Some(raw) = query.filter.as_deref() {
        let filter: Filter = raw.parse()?;
        data.board.set_filter(filter).await;
    }
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(data.renderer.current_page()))
}
