use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, rejection::PathRejection},
};

use shopfront_core::{Product, ProductId};
use shopfront_infra::CatalogStore;

use crate::app::dto::Envelope;
use crate::app::errors::ApiError;
use crate::context::CallerContext;

pub async fn list_products(
    Extension(catalog): Extension<Arc<CatalogStore>>,
    Extension(_caller): Extension<CallerContext>,
) -> Json<Envelope<Vec<Product>>> {
    let products = catalog.list();
    tracing::debug!(count = products.len(), "listing products");
    Json(Envelope::success(products))
}

pub async fn get_product(
    Extension(catalog): Extension<Arc<CatalogStore>>,
    Extension(_caller): Extension<CallerContext>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Envelope<Product>>, ApiError> {
    let Path(id) = id.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unreadable product id segment");
        ApiError::InvalidId
    })?;
    let id: ProductId = id.parse().map_err(ApiError::from)?;
    let product = catalog.get_by_id(id).map_err(|e| {
        tracing::debug!(%id, "product not found");
        ApiError::from(e)
    })?;
    Ok(Json(Envelope::success(product)))
}
