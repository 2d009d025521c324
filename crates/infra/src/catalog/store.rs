use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use thiserror::Error;

use shopfront_core::{DomainError, DomainResult, Product, ProductDocument, ProductId};

use super::source::CatalogSource;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog from {location}: {source}")]
    Read {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog from {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Parsed catalog: products in document order plus an id index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Index a product list. On duplicate ids the first occurrence wins.
    pub fn new(products: Vec<Product>) -> Self {
        let mut index = HashMap::with_capacity(products.len());
        for (pos, product) in products.iter().enumerate() {
            if index.contains_key(&product.id) {
                tracing::warn!(id = %product.id, "duplicate product id in catalog; keeping first");
                continue;
            }
            index.insert(product.id, pos);
        }
        Self { products, index }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).map(|pos| &self.products[*pos])
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Best-effort, read-only access to the product catalog.
///
/// The first successful parse is cached for the lifetime of the store and
/// never mutated. Read or parse failures degrade to an empty catalog (logged
/// at error level) and are retried on the next access, so `/health` and the
/// rest of the service stay up when the document is unavailable.
pub struct CatalogStore {
    source: Box<dyn CatalogSource>,
    snapshot: OnceLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(source: impl CatalogSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            snapshot: OnceLock::new(),
        }
    }

    /// Read and parse the source, bypassing the cache.
    pub fn load(&self) -> Result<Catalog, CatalogError> {
        let location = self.source.describe();
        let bytes = self.source.read().map_err(|source| CatalogError::Read {
            location: location.clone(),
            source,
        })?;
        let doc = ProductDocument::from_slice(&bytes)
            .map_err(|source| CatalogError::Parse { location, source })?;
        Ok(Catalog::new(doc.products))
    }

    /// Current snapshot; loads on first use.
    pub fn snapshot(&self) -> Arc<Catalog> {
        if let Some(catalog) = self.snapshot.get() {
            return Arc::clone(catalog);
        }

        match self.load() {
            Ok(catalog) => {
                tracing::info!(
                    source = %self.source.describe(),
                    products = catalog.len(),
                    "catalog loaded"
                );
                Arc::clone(self.snapshot.get_or_init(|| Arc::new(catalog)))
            }
            Err(e) => {
                tracing::error!(error = %e, "catalog unavailable; serving empty catalog");
                Arc::new(Catalog::default())
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.get().is_some()
    }

    /// All products in document order.
    pub fn list(&self) -> Vec<Product> {
        self.snapshot().products().to_vec()
    }

    pub fn get_by_id(&self, id: ProductId) -> DomainResult<Product> {
        self.snapshot()
            .get(id)
            .cloned()
            .ok_or_else(DomainError::not_found)
    }
}

impl core::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("source", &self.source.describe())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
