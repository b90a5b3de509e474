//! Durable key-addressed byte store for materialized views.

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::AppError;

/// Key-addressed byte store holding materialized views.
///
/// Keys are flat file-style names such as `institute_faculty.csv`.
/// Implementations must create any missing parent location on first write
/// and must never expose a partially written value under a key.
#[async_trait]
pub trait ViewStore: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool, AppError>;

    /// Full value stored under the key, or `None` when absent.
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, AppError>;

    /// Store the full value under the key, replacing any prior value.
    async fn save(&self, key: &str, bytes: &[u8]) -> Result<(), AppError>;
}

/// Filesystem-backed view store, one file per key under a root directory.
///
/// A save writes a uniquely named temp file in the root and renames it over
/// the key, so racing writers each publish a complete file and the last
/// rename wins. Views are a few kilobytes of CSV; the blocking file calls
/// are short enough to run on the async runtime directly.
pub struct FsViewStore {
    root: PathBuf,
}

impl FsViewStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_of(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn failure(key: &str, err: impl std::fmt::Display) -> AppError {
        AppError::CacheBuild {
            view: key.to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl ViewStore for FsViewStore {
    async fn exists(&self, key: &str) -> Result<bool, AppError> {
        match std::fs::metadata(self.path_of(key)) {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(Self::failure(key, err)),
        }
    }

    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        match std::fs::read(self.path_of(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::failure(key, err)),
        }
    }

    async fn save(&self, key: &str, bytes: &[u8]) -> Result<(), AppError> {
        std::fs::create_dir_all(&self.root).map_err(|err| Self::failure(key, err))?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(&self.root).map_err(|err| Self::failure(key, err))?;
        tmp.write_all(bytes).map_err(|err| Self::failure(key, err))?;
        tmp.persist(self.path_of(key))
            .map_err(|err| Self::failure(key, err))?;
        Ok(())
    }
}
