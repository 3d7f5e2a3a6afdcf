//! JSON manifest backend for installed distribution metadata

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::config;
use crate::dist::{DistStore, Distribution, StoreError};

/// Manifest entry for one installed distribution.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Where the distribution is installed.
    pub location: PathBuf,
    /// Version recorded at install time.
    pub version: String,
}

/// Installed distribution metadata loaded from a JSON manifest mapping
/// distribution names to their install record:
///
/// ```json
/// {
///   "my-pkg": { "location": "/src/my-pkg", "version": "1.2.3" }
/// }
/// ```
#[derive(Debug)]
pub struct ManifestStore {
    entries: HashMap<String, ManifestEntry>,
}

impl ManifestStore {
    /// Load the manifest at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: HashMap<String, ManifestEntry> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), distributions = entries.len(), "loaded manifest");

        Ok(Self { entries })
    }

    /// Load the manifest from [`config::manifest_path`]. A missing file is
    /// an empty registry, not an error.
    pub fn open_default() -> Result<Self, StoreError> {
        let path = config::manifest_path();
        if !path.exists() {
            debug!(path = %path.display(), "no manifest, registry is empty");
            return Ok(Self {
                entries: HashMap::new(),
            });
        }
        Self::open(&path)
    }

    /// Store over in-memory entries.
    pub fn from_entries(entries: HashMap<String, ManifestEntry>) -> Self {
        Self { entries }
    }
}

impl DistStore for ManifestStore {
    fn lookup(&self, name: &str) -> Result<Option<Distribution>, StoreError> {
        Ok(self.entries.get(name).map(|entry| Distribution {
            name: name.to_string(),
            location: entry.location.clone(),
            version: entry.version.clone(),
        }))
    }
}
