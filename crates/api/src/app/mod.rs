//! HTTP API application wiring (Axum router).
//!
//! - `routes/`: HTTP handlers (one file per area)
//! - `dto.rs`: response envelope and JSON shapes
//! - `errors.rs`: consistent error responses

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::context::ApiContext;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(ctx: ApiContext) -> Router {
    let auth_state = middleware::AuthState {
        gate: ctx.gate().clone(),
    };

    // Protected routes: require a valid API key.
    let protected = routes::router()
        .layer(Extension(ctx.catalog().clone()))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::api_key_middleware,
        ));

    Router::new()
        .route(
            "/health",
            get(routes::system::health).fallback(routes::system::method_not_allowed),
        )
        .nest("/api/products", protected)
        .fallback(routes::system::not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
