//! Installed distribution metadata
//!
//! The resolver never owns packaging metadata; it consumes it through the
//! [`DistStore`] lookup interface. One backend ships: a JSON manifest of
//! installed distributions ([`manifest::ManifestStore`]).
//!
//! # Modules
//!
//! - [`manifest`]: JSON manifest backend

#[cfg(test)]
use mockall::automock;

pub mod manifest;

pub use manifest::ManifestStore;

use std::path::PathBuf;

use thiserror::Error;

/// One installed distribution as recorded by packaging metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    /// Distribution name the record was found under.
    pub name: String,
    /// Install location. A working copy here is more authoritative than
    /// `version`.
    pub location: PathBuf,
    /// Version recorded at install time.
    pub version: String,
}

/// Error reading the metadata backend itself.
///
/// "Name not installed" is not an error; lookups report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed manifest {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Lookup interface over installed distribution metadata.
#[cfg_attr(test, automock)]
pub trait DistStore: Send + Sync {
    /// Look up `name` exactly. `Ok(None)` means no such distribution is
    /// installed; the resolver treats that as recoverable and retries a
    /// shorter prefix.
    fn lookup(&self, name: &str) -> Result<Option<Distribution>, StoreError>;
}
