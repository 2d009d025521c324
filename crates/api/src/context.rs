use std::sync::Arc;

use shopfront_auth::{AuthGate, Credential};
use shopfront_infra::CatalogStore;

/// Everything the router needs, built once at startup.
///
/// Immutable after construction; handlers only ever read it.
#[derive(Debug, Clone)]
pub struct ApiContext {
    gate: AuthGate,
    catalog: Arc<CatalogStore>,
}

impl ApiContext {
    pub fn new(gate: AuthGate, catalog: Arc<CatalogStore>) -> Self {
        Self { gate, catalog }
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }
}

/// Caller context for a request that passed the API-key check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    credential: Credential,
}

impl CallerContext {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}
