use axum::{Router, routing::get};

pub mod products;
pub mod system;

/// Router for all API-key protected endpoints, nested under `/api/products`.
pub fn router() -> Router {
    Router::new()
        .route(
            "/",
            get(products::list_products).fallback(system::method_not_allowed),
        )
        .route(
            "/:id",
            get(products::get_product).fallback(system::method_not_allowed),
        )
}
