use subtle::ConstantTimeEq;
use thiserror::Error;

/// Longest prefix ever shown by [`ExpectedKey::redacted`].
const MAX_VISIBLE_PREFIX: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("api key is empty")]
    Empty,
}

/// The single credential value the service accepts.
///
/// Resolved once at startup and immutable afterwards. The raw value is never
/// exposed through `Debug`; use [`ExpectedKey::redacted`] for logging.
#[derive(Clone, PartialEq, Eq)]
pub struct ExpectedKey(String);

impl ExpectedKey {
    /// Wrap a resolved key. Empty or whitespace-only values are rejected.
    pub fn new(value: impl Into<String>) -> Result<Self, KeyError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(KeyError::Empty);
        }
        Ok(Self(value))
    }

    /// Exact byte-for-byte comparison.
    ///
    /// Both sides are zero-padded to a common length so the comparison runs
    /// over the same number of bytes whatever the candidate's length.
    pub fn matches(&self, candidate: &str) -> bool {
        let expected = self.0.as_bytes();
        let candidate = candidate.as_bytes();

        let width = expected.len().max(candidate.len());
        let mut padded_expected = vec![0u8; width];
        let mut padded_candidate = vec![0u8; width];
        padded_expected[..expected.len()].copy_from_slice(expected);
        padded_candidate[..candidate.len()].copy_from_slice(candidate);

        let bytes_match: bool = padded_expected.ct_eq(&padded_candidate).into();
        let lengths_match: bool = (expected.len() as u64).ct_eq(&(candidate.len() as u64)).into();
        bytes_match & lengths_match
    }

    /// Truncated form safe for operator logs: at most four leading characters
    /// and never more than a quarter of the key, followed by `...`.
    pub fn redacted(&self) -> String {
        redact(&self.0)
    }
}

impl core::fmt::Debug for ExpectedKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("ExpectedKey").field(&self.redacted()).finish()
    }
}

/// Redact an arbitrary secret-like string with the same rules as
/// [`ExpectedKey::redacted`].
pub fn redact(value: &str) -> String {
    let visible = (value.chars().count() / 4).min(MAX_VISIBLE_PREFIX);
    let prefix: String = value.chars().take(visible).collect();
    format!("{prefix}...")
}
