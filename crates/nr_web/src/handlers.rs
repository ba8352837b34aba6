use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use nr_core::SortKey;

use crate::AppState;

#[derive(Deserialize)]
pub struct NewsQuery {
    sort_by: Option<String>,
}

pub async fn list_news(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewsQuery>,
) -> Response {
    let raw = query.sort_by.as_deref().unwrap_or("latest");
    let key: SortKey = match raw.parse() {
        Ok(key) => key,
        Err(reason) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"status": "error", "reason": reason})),
            )
                .into_response();
        }
    };

    match state.store.load_sorted(key).await {
        Ok(articles) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "count": articles.len(),
                "articles": articles,
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to load articles");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "reason": "storage unavailable"})),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct RunQuery {
    topic: Option<String>,
}

/// Kick off a pipeline run in the background and return immediately; a long
/// run must never block unrelated reads.
pub async fn run_pipeline(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RunQuery>,
) -> Response {
    let topic = query.topic.unwrap_or_else(|| state.default_topic.clone());
    info!(%topic, "pipeline run requested over HTTP");

    let commander = state.commander.clone();
    let run_topic = topic.clone();
    tokio::spawn(async move {
        match commander.run(&run_topic).await {
            Ok(result) => {
                info!(topic = %run_topic, status = ?result.status, stored = result.stored, "pipeline run finished")
            }
            Err(e) => error!(topic = %run_topic, error = %e, "pipeline run failed"),
        }
    });

    (
        StatusCode::ACCEPTED,
        Json(json!({
            "status": "accepted",
            "message": format!("Pipeline started for topic '{topic}'."),
        })),
    )
        .into_response()
}

pub async fn health() -> Response {
    Json(json!({"status": "ok"})).into_response()
}
