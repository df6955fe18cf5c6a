//! API Routes
//!
//! Configures the Axum router with all cache inspection endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, get_handler, health_handler, list_handler, set_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /caches` - Names of the registered caches
/// - `GET /caches/:name/stats` - Stats snapshot of one cache
/// - `GET|PUT|DELETE /caches/:name/entries/:key` - Read, store or delete an entry
/// - `DELETE /caches/:name` - Clear one cache
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/caches", get(list_handler))
        .route("/caches/:name", delete(clear_handler))
        .route("/caches/:name/stats", get(stats_handler))
        .route(
            "/caches/:name/entries/:key",
            get(get_handler).put(set_handler).delete(delete_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_router(AppState::from_config(&Config::default()))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/caches/api/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_set_endpoint() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/caches/api/entries/test")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"value":"hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/caches/api/entries/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_cache_not_found() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/caches/sessions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
