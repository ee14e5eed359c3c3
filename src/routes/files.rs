//! File access for the `/files` routes.
//!
//! The router only sees the three-way outcome of the store: bytes (or
//! success), `NotFound`, or some other I/O failure.

use std::fmt;
use std::future::Future;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub enum FileError {
    NotFound,
    Io(io::Error),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::NotFound => write!(f, "file not found"),
            FileError::Io(e) => write!(f, "file i/o failed: {}", e),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::Io(e) => Some(e),
            FileError::NotFound => None,
        }
    }
}

impl From<io::Error> for FileError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => FileError::NotFound,
            _ => FileError::Io(e),
        }
    }
}

/// Reads and writes named files under a root directory.
pub trait FileStore: Send + Sync + 'static {
    fn read(
        &self,
        root: &Path,
        name: &str,
    ) -> impl Future<Output = Result<Vec<u8>, FileError>> + Send;

    fn write(
        &self,
        root: &Path,
        name: &str,
        contents: &[u8],
    ) -> impl Future<Output = Result<(), FileError>> + Send;
}

/// `FileStore` backed by the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStore;

impl FileStore for DiskStore {
    async fn read(&self, root: &Path, name: &str) -> Result<Vec<u8>, FileError> {
        Ok(tokio::fs::read(root.join(name)).await?)
    }

    async fn write(&self, root: &Path, name: &str, contents: &[u8]) -> Result<(), FileError> {
        Ok(tokio::fs::write(root.join(name), contents).await?)
    }
}
