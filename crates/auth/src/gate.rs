use std::sync::Arc;

use crate::key::{ExpectedKey, redact};

/// Header carrying the caller's API key. HTTP header names are
/// case-insensitive; this is the canonical lowercase form.
pub const API_KEY_HEADER: &str = "x-api-key";

/// The value a caller supplied and that was accepted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Credential").field(&redact(&self.0)).finish()
    }
}

/// Outcome of checking a request's credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Authorized(Credential),
    Missing,
    Invalid(String),
}

impl AuthResult {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }

    fn reason(&self) -> &'static str {
        match self {
            Self::Authorized(_) => "authorized",
            Self::Missing => "missing_api_key",
            Self::Invalid(_) => "invalid_api_key",
        }
    }
}

/// Validates inbound credentials against the process-wide expected key.
///
/// Cheap to clone; the key itself is shared and never mutated.
#[derive(Debug, Clone)]
pub struct AuthGate {
    expected: Arc<ExpectedKey>,
}

impl AuthGate {
    pub fn new(expected: ExpectedKey) -> Self {
        Self {
            expected: Arc::new(expected),
        }
    }

    /// Check a credential extracted from the designated header.
    ///
    /// `None` means the header was absent. Failures emit an audit line that
    /// carries only the redacted expected key.
    pub fn authorize(&self, credential: Option<&str>) -> AuthResult {
        let result = match credential {
            None => AuthResult::Missing,
            Some(received) if self.expected.matches(received) => {
                AuthResult::Authorized(Credential(received.to_string()))
            }
            Some(received) => AuthResult::Invalid(received.to_string()),
        };

        match &result {
            AuthResult::Authorized(_) => {
                tracing::debug!(event = "auth_success", "api key accepted");
            }
            AuthResult::Missing => {
                tracing::warn!(
                    event = "auth_failure",
                    reason = result.reason(),
                    expected = %self.expected.redacted(),
                    "request without api key"
                );
            }
            AuthResult::Invalid(received) => {
                tracing::warn!(
                    event = "auth_failure",
                    reason = result.reason(),
                    received = %redact(received),
                    received_len = received.len(),
                    expected = %self.expected.redacted(),
                    "api key mismatch"
                );
            }
        }

        result
    }
}
