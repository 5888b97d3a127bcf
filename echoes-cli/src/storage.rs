//! File-backed implementations of the planner traits.
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use echoes_planner::{Catalog, CatalogError, CatalogLoader, PreferenceStore, Preferences};

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FileStoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Loads the catalog from a JSON file, or the bundled one when no path is set.
#[derive(Debug, Clone, Default)]
pub struct FileCatalogLoader {
    path: Option<PathBuf>,
}

impl FileCatalogLoader {
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl CatalogLoader for FileCatalogLoader {
    type Error = FileStoreError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        let Some(path) = &self.path else {
            return Ok(Catalog::bundled()?);
        };
        log::info!("loading catalog from {}", path.display());
        let json = fs::read_to_string(path).map_err(|e| FileStoreError::io(path, e))?;
        Ok(Catalog::from_json(&json)?)
    }
}

/// Preferences kept as a JSON document on disk.
///
/// Without a path nothing is persisted and defaults are reported.
#[derive(Debug, Clone, Default)]
pub struct FilePreferenceStore {
    path: Option<PathBuf>,
}

impl FilePreferenceStore {
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl PreferenceStore for FilePreferenceStore {
    type Error = FileStoreError;

    fn load_preferences(&self) -> Result<Option<Preferences>, Self::Error> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        match fs::read_to_string(path) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FileStoreError::io(path, e)),
        }
    }

    fn save_preferences(&self, preferences: &Preferences) -> Result<(), Self::Error> {
        let Some(path) = &self.path else {
            log::warn!("no preferences file configured; nothing saved");
            return Ok(());
        };
        let json = serde_json::to_string_pretty(preferences)?;
        fs::write(path, json).map_err(|e| FileStoreError::io(path, e))
    }

    fn clear_preferences(&self) -> Result<(), Self::Error> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        match fs::remove_file(path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(FileStoreError::io(path, e)),
            _ => Ok(()),
        }
    }
}
