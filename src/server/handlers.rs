use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use crate::search::{SearchError, SearchResponse};

use super::state::AppState;
use super::static_files;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        match self {
            SearchError::UnknownBody(_) => (
                StatusCode::NOT_FOUND,
                Json(SearchResponse::Existence { has_data: false }),
            )
                .into_response(),
        }
    }
}

/// Panics inside a handler become an opaque 500; the server keeps running.
pub(super) fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail, "handler panicked");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}

// ─── Landing page ────────────────────────────────────────────────

pub async fn index() -> Html<&'static str> {
    Html(static_files::INDEX_HTML)
}

// ─── GET /1/search ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct BodiesResponse {
    pub planets: Vec<String>,
}

pub async fn list_bodies(State(state): State<Arc<AppState>>) -> Json<BodiesResponse> {
    Json(BodiesResponse {
        planets: state.search.list_bodies(),
    })
}

// ─── GET /1/search/{planet} ──────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(planet): Path<String>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, SearchError> {
    let start = Instant::now();
    let response = state.search.search(&planet, params.query.as_deref())?;

    tracing::info!(
        planet = %planet.to_lowercase(),
        query = params.query.as_deref().unwrap_or(""),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /1/search"
    );
    Ok(Json(response))
}

// ─── GET /1/list/{planet} ────────────────────────────────────────

pub async fn list_features(
    State(state): State<Arc<AppState>>,
    Path(planet): Path<String>,
) -> Result<Json<SearchResponse>, SearchError> {
    state.search.list(&planet).map(Json)
}
