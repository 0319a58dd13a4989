use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;

use super::AppState;
use crate::pipeline::build_report;

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(api_orders))
        .route("/healthz", get(health))
}

#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
}

async fn api_orders(State(state): State<AppState>) -> Response {
    match build_report(
        &state.fetcher,
        &state.classifier,
        state.config.classify_concurrency,
    )
    .await
    {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            tracing::error!("Failed to build order report: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError {
                    error: format!("{e:#}"),
                }),
            )
                .into_response()
        }
    }
}

async fn health() -> &'static str {
    "OK"
}
