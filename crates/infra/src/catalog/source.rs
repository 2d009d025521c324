use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// Read-only blob holding the catalog document.
pub trait CatalogSource: Send + Sync {
    fn read(&self) -> io::Result<Vec<u8>>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

impl<S> CatalogSource for Arc<S>
where
    S: CatalogSource + ?Sized,
{
    fn read(&self) -> io::Result<Vec<u8>> {
        (**self).read()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Catalog document stored on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for FileCatalogSource {
    fn read(&self) -> io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory catalog document for tests/dev.
#[derive(Debug, Clone)]
pub struct InMemoryCatalogSource {
    bytes: Vec<u8>,
}

impl InMemoryCatalogSource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl CatalogSource for InMemoryCatalogSource {
    fn read(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }

    fn describe(&self) -> String {
        "<in-memory>".to_string()
    }
}
