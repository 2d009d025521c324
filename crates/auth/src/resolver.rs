//! Startup-time resolution of the expected API key.
//!
//! Sources are tried in a fixed order and the first one that yields a value
//! wins:
//!
//! 1. test mode (explicit operator flag) → configured test key
//! 2. local value (environment / `.env`)
//! 3. secret store, via [`SecretBackend`], reading one field of the secret JSON
//!
//! If none yields a non-empty value, resolution fails and the process must not
//! start serving.

use thiserror::Error;

use crate::backend::{SecretBackend, SecretBackendError};
use crate::key::{ExpectedKey, KeyError, redact};

/// Where a secret lives in the secret store and which field holds the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef {
    pub name: String,
    pub region: String,
    pub field: String,
}

/// The configured candidate sources, in priority order.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct KeySources {
    pub test_mode: bool,
    pub test_key: String,
    pub local_key: Option<String>,
    pub secret: Option<SecretRef>,
}

impl core::fmt::Debug for KeySources {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeySources")
            .field("test_mode", &self.test_mode)
            .field("test_key", &redact(&self.test_key))
            .field("local_key", &self.local_key.as_deref().map(redact))
            .field("secret", &self.secret)
            .finish()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeySource {
    TestMode,
    Local,
    SecretStore,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TestMode => "test_mode",
            Self::Local => "local",
            Self::SecretStore => "secret_store",
        }
    }
}

impl core::fmt::Display for KeySource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    pub key: ExpectedKey,
    pub source: KeySource,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no api key source configured (set API_KEY, or SECRET_NAME for the secret store)")]
    NoSource,

    #[error("failed to fetch secret '{name}': {source}")]
    Backend {
        name: String,
        #[source]
        source: SecretBackendError,
    },

    #[error("secret '{name}' has no string field '{field}'")]
    MissingField { name: String, field: String },

    #[error("api key from {origin} is empty")]
    EmptyKey { origin: KeySource },
}

/// Resolves the expected key once; the caller keeps the result for the
/// lifetime of the process.
#[derive(Debug, Clone)]
pub struct SecretResolver {
    sources: KeySources,
}

impl SecretResolver {
    pub fn new(sources: KeySources) -> Self {
        Self { sources }
    }

    /// Walk the sources in order. The backend is consulted at most once, and
    /// only when no earlier source produced a value.
    pub async fn resolve(&self, backend: &dyn SecretBackend) -> Result<ResolvedKey, ResolveError> {
        let resolved = self.resolve_inner(backend).await?;
        tracing::info!(
            source = %resolved.source,
            key = %resolved.key.redacted(),
            "api key resolved"
        );
        Ok(resolved)
    }

    async fn resolve_inner(&self, backend: &dyn SecretBackend) -> Result<ResolvedKey, ResolveError> {
        if self.sources.test_mode {
            tracing::warn!("TEST_MODE is active; using the configured test api key");
            return build(&self.sources.test_key, KeySource::TestMode);
        }

        if let Some(local) = self.sources.local_key.as_deref().filter(|v| !v.is_empty()) {
            return build(local, KeySource::Local);
        }

        let Some(secret) = &self.sources.secret else {
            return Err(ResolveError::NoSource);
        };

        tracing::info!(
            secret = %secret.name,
            region = %secret.region,
            "fetching api key from secret store"
        );
        let document = backend
            .fetch_secret(&secret.name, &secret.region)
            .await
            .map_err(|source| ResolveError::Backend {
                name: secret.name.clone(),
                source,
            })?;

        let value = document
            .get(&secret.field)
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ResolveError::MissingField {
                name: secret.name.clone(),
                field: secret.field.clone(),
            })?;

        build(value, KeySource::SecretStore)
    }
}

fn build(value: &str, source: KeySource) -> Result<ResolvedKey, ResolveError> {
    let key = ExpectedKey::new(value).map_err(|e| match e {
        KeyError::Empty => ResolveError::EmptyKey { origin: source },
    })?;
    Ok(ResolvedKey { key, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    /// Backend returning a canned document and counting calls.
    struct FakeBackend {
        response: Result<serde_json::Value, String>,
        calls: AtomicUsize,
    }

    impl FakeBackend {
        fn ok(doc: serde_json::Value) -> Self {
            Self {
                response: Ok(doc),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(msg: &str) -> Self {
            Self {
                response: Err(msg.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl SecretBackend for FakeBackend {
        async fn fetch_secret(
            &self,
            _identifier: &str,
            _region: &str,
        ) -> Result<serde_json::Value, SecretBackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .clone()
                .map_err(SecretBackendError::Transport)
        }
    }

    fn secret_ref(field: &str) -> SecretRef {
        SecretRef {
            name: "shop/api_key".to_string(),
            region: "eu-west-1".to_string(),
            field: field.to_string(),
        }
    }

    #[tokio::test]
    async fn test_mode_wins_over_every_other_source() {
        let backend = FakeBackend::ok(json!({"api_key": "from-store"}));
        let resolver = SecretResolver::new(KeySources {
            test_mode: true,
            test_key: "test-key".to_string(),
            local_key: Some("local-key".to_string()),
            secret: Some(secret_ref("api_key")),
        });

        let resolved = resolver.resolve(&backend).await.unwrap();
        assert_eq!(resolved.source, KeySource::TestMode);
        assert!(resolved.key.matches("test-key"));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn local_value_skips_secret_store() {
        let backend = FakeBackend::ok(json!({"api_key": "from-store"}));
        let resolver = SecretResolver::new(KeySources {
            local_key: Some("local-key".to_string()),
            secret: Some(secret_ref("api_key")),
            ..Default::default()
        });

        let resolved = resolver.resolve(&backend).await.unwrap();
        assert_eq!(resolved.source, KeySource::Local);
        assert!(resolved.key.matches("local-key"));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn empty_local_value_falls_through_to_secret_store() {
        let backend = FakeBackend::ok(json!({"api_key": "from-store"}));
        let resolver = SecretResolver::new(KeySources {
            local_key: Some(String::new()),
            secret: Some(secret_ref("api_key")),
            ..Default::default()
        });

        let resolved = resolver.resolve(&backend).await.unwrap();
        assert_eq!(resolved.source, KeySource::SecretStore);
        assert!(resolved.key.matches("from-store"));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn secret_field_name_is_configurable() {
        let backend = FakeBackend::ok(json!({"API_KEY": "upper", "api_key": "lower"}));
        let resolver = SecretResolver::new(KeySources {
            secret: Some(secret_ref("API_KEY")),
            ..Default::default()
        });

        let resolved = resolver.resolve(&backend).await.unwrap();
        assert!(resolved.key.matches("upper"));
    }

    #[tokio::test]
    async fn missing_field_is_fatal() {
        let backend = FakeBackend::ok(json!({"other": "x"}));
        let resolver = SecretResolver::new(KeySources {
            secret: Some(secret_ref("api_key")),
            ..Default::default()
        });

        match resolver.resolve(&backend).await {
            Err(ResolveError::MissingField { field, .. }) => assert_eq!(field, "api_key"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_string_field_is_fatal() {
        let backend = FakeBackend::ok(json!({"api_key": 1234}));
        let resolver = SecretResolver::new(KeySources {
            secret: Some(secret_ref("api_key")),
            ..Default::default()
        });

        assert!(matches!(
            resolver.resolve(&backend).await,
            Err(ResolveError::MissingField { .. })
        ));
    }

    #[tokio::test]
    async fn empty_secret_value_is_fatal() {
        let backend = FakeBackend::ok(json!({"api_key": ""}));
        let resolver = SecretResolver::new(KeySources {
            secret: Some(secret_ref("api_key")),
            ..Default::default()
        });

        assert!(matches!(
            resolver.resolve(&backend).await,
            Err(ResolveError::EmptyKey {
                origin: KeySource::SecretStore
            })
        ));
    }

    #[tokio::test]
    async fn backend_failure_is_fatal_and_not_retried() {
        let backend = FakeBackend::failing("connection refused");
        let resolver = SecretResolver::new(KeySources {
            secret: Some(secret_ref("api_key")),
            ..Default::default()
        });

        assert!(matches!(
            resolver.resolve(&backend).await,
            Err(ResolveError::Backend { .. })
        ));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn no_configured_source_is_fatal() {
        let backend = FakeBackend::ok(json!({}));
        let resolver = SecretResolver::new(KeySources::default());

        assert!(matches!(
            resolver.resolve(&backend).await,
            Err(ResolveError::NoSource)
        ));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn blank_test_key_is_fatal() {
        let backend = FakeBackend::ok(json!({}));
        let resolver = SecretResolver::new(KeySources {
            test_mode: true,
            test_key: "   ".to_string(),
            ..Default::default()
        });

        assert!(matches!(
            resolver.resolve(&backend).await,
            Err(ResolveError::EmptyKey {
                origin: KeySource::TestMode
            })
        ));
    }
}
