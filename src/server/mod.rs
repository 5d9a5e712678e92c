mod handlers;
mod state;
mod static_files;

use axum::Router;
use axum::routing::get;
use state::AppState;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::search::SearchService;

pub fn build_router(search: SearchService) -> Router {
    let state = Arc::new(AppState { search });

    Router::new()
        .route("/", get(handlers::index))
        .route("/1/search", get(handlers::list_bodies))
        .route("/1/search/{planet}", get(handlers::search))
        .route("/1/list/{planet}", get(handlers::list_features))
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(search: SearchService, addr: &str) -> std::io::Result<()> {
    let app = build_router(search);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Gazetteer listening on http://{}", addr);
    axum::serve(listener, app).await
}
