//! Infrastructure layer: configuration, secret store, catalog source.

pub mod catalog;
pub mod config;
pub mod secrets;

pub use catalog::{CatalogSource, CatalogStore, FileCatalogSource, InMemoryCatalogSource};
pub use config::{AppConfig, ConfigError, SecretBackendConfig, load_dotenv};
pub use secrets::AgentSecretBackend;
