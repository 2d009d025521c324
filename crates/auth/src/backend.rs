//! Secret-store capability consumed by the resolver.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretBackendError {
    #[error("secret backend unreachable: {0}")]
    Transport(String),

    #[error("secret backend returned status {status} for '{identifier}'")]
    Status { identifier: String, status: u16 },

    #[error("secret '{0}' has no string payload")]
    MissingPayload(String),

    #[error("secret payload is not valid JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Opaque "fetch secret by name" capability.
///
/// Implementations perform a single attempt with a bounded timeout and
/// return the secret's JSON document.
#[async_trait::async_trait]
pub trait SecretBackend: Send + Sync {
    async fn fetch_secret(
        &self,
        identifier: &str,
        region: &str,
    ) -> Result<serde_json::Value, SecretBackendError>;
}
