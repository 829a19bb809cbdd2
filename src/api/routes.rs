//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderName, Method, StatusCode, header},
    middleware,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers::{health::health_routes, users::user_routes};
use crate::api::middleware::{
    error_envelope_middleware, logging_middleware, request_id_middleware,
};
use crate::config::ServerConfig;
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. CORS answers preflight requests before anything else runs
/// 2. Compression of the final response body
/// 3. Request ID middleware - generates/propagates request IDs
/// 4. Logging middleware - logs requests with request IDs
/// 5. Error envelope - rewrites plain error responses, including timeouts
///
/// # Routes
/// - `/users`, `/users/{id}` - User CRUD operations
/// - `/health`, `/health/ready`, `/health/live` - Health checks
/// - `/swagger-ui` and `/api-docs/openapi.json` - API documentation
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(user_routes())
        .merge(health_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server.request_timeout),
        ))
        .layer(middleware::from_fn(error_envelope_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CompressionLayer::new())
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
            Method::DELETE,
            Method::HEAD,
        ])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CACHE_CONTROL,
            header::CONTENT_TYPE,
            HeaderName::from_static("dnt"),
            header::IF_MODIFIED_SINCE,
            HeaderName::from_static("keep-alive"),
            header::ORIGIN,
            header::USER_AGENT,
            HeaderName::from_static("x-requested-with"),
        ])
}
