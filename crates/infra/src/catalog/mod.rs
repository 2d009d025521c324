//! Read-only product catalog backed by a static JSON document.

pub mod source;
pub mod store;

pub use source::{CatalogSource, FileCatalogSource, InMemoryCatalogSource};
pub use store::{Catalog, CatalogError, CatalogStore};
