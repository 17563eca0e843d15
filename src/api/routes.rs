use axum::{
    routing::get,
    Router,
    extract::{Json, Query, State},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use chrono::Utc;
use std::time::Instant;
use tracing::{error, info};

use crate::error::Result;
use crate::api::models::{FilterType, NewsQuery, NewsResponse, RootResponse, StatusResponse};
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/get-news", get(get_news_handler))
        .route("/api/status", get(status_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn get_news_handler(
    State(state): State<AppState>,
    Query(params): Query<NewsQuery>,
) -> Result<Json<NewsResponse>> {
    info!(filter_type = %params.filter_type, "Requesting news");
    let start_time = Instant::now();

    let query = FilterType::from_param(&params.filter_type).query();

    let news = state.agent.run(query).await.inspect_err(|err| {
        error!(error = %err, "Failed to get news");
    })?;

    info!(count = news.len(), elapsed = ?start_time.elapsed(), "Returning news");
    Ok(Json(NewsResponse::success(params.filter_type, news)))
}

async fn status_handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "active".to_string(),
        message: "News API is running".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "AI & Marketing News Platform - API active".to_string(),
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}
