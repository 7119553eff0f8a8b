//! Feriwala storefront library.
//!
//! Server-rendered storefront and admin dashboard over the backend REST API.
//! The binary in `main.rs` adds configuration, logging and Sentry around the
//! router built by [`app`]; integration tests drive the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use std::path::Path;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Directory holding `/static` assets, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the application router with sessions, request IDs and security headers.
///
/// Tracing and Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    app_with_static_dir(state, Path::new(STATIC_DIR))
}

/// Same as [`app`] but serving static files from `static_dir`.
pub fn app_with_static_dir(state: AppState, static_dir: &Path) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::LOCATION},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;

    /// App wired to a backend address nothing listens on.
    fn offline_app() -> Router {
        let config = StorefrontConfig::from_lookup(|key| {
            (key == "BACKEND_API_URL").then(|| "http://127.0.0.1:9".to_string())
        })
        .unwrap();
        app(AppState::new(config))
    }

    async fn get(uri: &str) -> axum::response::Response {
        offline_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_liveness_and_headers() {
        let response = get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(
            response.headers().get("x-frame-options").unwrap(),
            "DENY"
        );
        assert!(response.headers().contains_key("content-security-policy"));
    }

    #[tokio::test]
    async fn test_readiness_fails_without_backend() {
        let response = get("/health/ready").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_home_is_all_or_nothing() {
        let response = get("/").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_dashboard_without_token_redirects_to_login() {
        for uri in [
            "/dashboard",
            "/dashboard/allProducts",
            "/dashboard/createProduct",
            "/dashboard/categories",
            "/dashboard/slider",
            "/dashboard/deliveryform",
        ] {
            let response = get(uri).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(response.headers().get(LOCATION).unwrap(), "/login", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_blank_search_redirects_home() {
        let response = get("/search?query=%20%20").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/");
    }

    #[tokio::test]
    async fn test_empty_cart_badge_is_zero() {
        let response = get("/cart/count").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains(">0<"), "{body}");
    }

    #[tokio::test]
    async fn test_checkout_with_empty_cart_redirects_to_cart() {
        let response = get("/checkout").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/cart");
    }
}
