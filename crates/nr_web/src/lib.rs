use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/news", get(handlers::list_news))
        .route("/api/run-pipeline", post(handlers::run_pipeline))
        .route("/api/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use super::{create_app, AppState};
    pub use nr_core::{Article, Error, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use nr_core::{Result, Tool};
    use nr_inference::ScriptedModel;
    use nr_pipeline::{Commander, Dispatcher, NewsClassifier, NewsDiscovery, NewsRanker};
    use nr_storage::MemoryStore;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct NullSearch;

    #[async_trait]
    impl Tool for NullSearch {
        fn name(&self) -> &str {
            "news_search"
        }

        fn description(&self) -> &str {
            "Test search."
        }

        fn parameters(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }

        async fn call(&self, _args: Value) -> Result<Value> {
            Ok(json!({"results": []}))
        }
    }

    fn test_app() -> Router {
        let model = Arc::new(ScriptedModel::new(Vec::<String>::new()));
        let store = Arc::new(MemoryStore::new());
        let dispatcher = Dispatcher::new(
            Arc::new(NewsDiscovery::new(model.clone(), Arc::new(NullSearch))),
            Arc::new(NewsClassifier::new(model.clone())),
            Arc::new(NewsRanker::new(model)),
            store.clone(),
        );
        create_app(AppState {
            commander: Arc::new(Commander::new(dispatcher)),
            store,
            default_topic: "technology".to_string(),
        })
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let response = test_app()
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn news_defaults_to_latest() {
        let response = test_app()
            .oneshot(Request::builder().uri("/api/news").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn news_accepts_popular_sort() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/news?sort_by=popular")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn news_rejects_unknown_sort_keys() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/news?sort_by=newest")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn run_pipeline_is_accepted_immediately() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/run-pipeline?topic=rust")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
}
