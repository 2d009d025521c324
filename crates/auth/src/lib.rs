//! `shopfront-auth` — API-key authentication boundary.
//!
//! This crate is intentionally decoupled from HTTP and from any concrete
//! secret store: the API layer extracts header values, and infrastructure
//! supplies a [`SecretBackend`] implementation.

pub mod backend;
pub mod gate;
pub mod key;
pub mod resolver;

pub use backend::{SecretBackend, SecretBackendError};
pub use gate::{API_KEY_HEADER, AuthGate, AuthResult, Credential};
pub use key::{ExpectedKey, KeyError};
pub use resolver::{KeySource, KeySources, ResolveError, ResolvedKey, SecretRef, SecretResolver};
