//! Working copy detection and live version description
//!
//! A distribution installed in editable/development mode carries stale
//! recorded metadata; the checkout it points at is the authority. This
//! module classifies install locations as working copies and derives a
//! live descriptor from them by shelling out to the source control tool.
//!
//! # Modules
//!
//! - [`git`]: the one shipped provider, driving `git describe`

#[cfg(test)]
use mockall::automock;

pub mod git;

pub use git::GitRepo;

use std::io;
use std::path::Path;
use std::process::{ExitStatus, Output};

use thiserror::Error;

/// Failure of an external source control command.
///
/// Both variants classify the queried path as "not a working copy of this
/// provider's kind"; neither is a hard error. Callers fall back to recorded
/// metadata.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The tool ran and exited nonzero.
    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: &'static str,
        status: ExitStatus,
        stderr: String,
    },

    /// The tool could not be launched at all (not installed, not on PATH).
    #[error("{program} could not be run: {source}")]
    CommandMissing {
        program: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Capability interface for one kind of source control working copy.
#[cfg_attr(test, automock)]
pub trait RepoProvider: Send + Sync {
    /// Provider kind, used in logs.
    fn kind(&self) -> &'static str;

    /// Whether `path` is a working copy of this provider's kind.
    ///
    /// Equivalent to [`RepoProvider::describe`] succeeding; any failure
    /// means "not a working copy", never an error.
    fn detect(&self, path: &Path) -> bool {
        self.describe(path).is_ok()
    }

    /// A human-readable descriptor of the working copy state at `path`,
    /// e.g. `v1.2.3-4-feature-x-gabcdef`.
    fn describe(&self, path: &Path) -> Result<String, RepoError>;
}

/// Seam for launching external commands, so tests can script outputs and
/// count invocations.
///
/// Commands run synchronously with no timeout; a hung tool hangs the
/// resolution request.
#[cfg_attr(test, automock)]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, with `cwd` as working directory, and
    /// capture its output.
    fn run(
        &self,
        program: &'static str,
        args: &'static [&'static str],
        cwd: &Path,
    ) -> io::Result<Output>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &'static str,
        args: &'static [&'static str],
        cwd: &Path,
    ) -> io::Result<Output> {
        std::process::Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
    }
}
