//! Route table.
//!
//! Customers live under `/customers` (collection) and `/customer/{id}`
//! (item); results under `/results` (collection) and `/result` (keyed by the
//! request body). Every route shares the same CORS, tracing and compression
//! stack.

use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Build the application router around `state`.
pub fn create_router(state: AppState) -> Router {
    // Any origin, any method, any header.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        // Customers
        .route(
            "/customers",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/customer/{id}",
            get(handlers::get_customer)
                .patch(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        // Results
        .route(
            "/results",
            get(handlers::list_results).post(handlers::create_result),
        )
        .route(
            "/result",
            patch(handlers::update_result).delete(handlers::delete_result),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(all(test, feature = "local-repo"))]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState::new(Arc::new(LocalRepository::new())))
    }

    #[tokio::test]
    async fn test_result_item_route_rejects_get() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/result")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let request = Request::builder()
            .uri("/customers/1")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
