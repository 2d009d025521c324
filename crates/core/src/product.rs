use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::ProductId;

/// A catalog entry.
///
/// Products are read-only: they are materialized from the catalog document
/// and never created, updated or deleted by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Kept as the document wrote it, so `3` is served as `3` and not `3.0`.
    pub price: Number,
}

/// Shape of the catalog document: `{"products": [Product, ...]}`.
///
/// A document without a `products` key is treated as an empty catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    #[serde(default)]
    pub products: Vec<Product>,
}

impl ProductDocument {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
