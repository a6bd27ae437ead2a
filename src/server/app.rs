use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{self, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS};
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;
use axum::{extract::FromRef, routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::routes::{
    self, category_router, questions_router, quiz_router, ApiError, ApiResponse,
};
use crate::configuration::ApplicationSettings;
use crate::db::TriviaStore;

pub type SharedStore = Arc<dyn TriviaStore>;

const ALLOWED_HEADERS: &str = "Content-Type, Authorization, true";
const ALLOWED_METHODS: &str = "GET, PUT, POST, PATCH, DELETE, OPTIONS";

#[derive(FromRef, Clone)]
pub struct AppState {
    store: SharedStore,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .merge(category_router())
        .merge(questions_router())
        .merge(quiz_router())
        .method_not_allowed_fallback(routes::method_not_allowed)
        .fallback(routes::not_found)
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(state: AppState, settings: &ApplicationSettings) -> anyhow::Result<()> {
    let addr = settings.address();
    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn metrics() -> ApiResponse<Response> {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    encoder
        .encode(&metrics, &mut buf)
        .map_err(|e| ApiError::Internal(e.into()))?;
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .body(Body::from(buf))
        .map_err(|e| ApiError::Internal(e.into()))
}
