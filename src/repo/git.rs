//! Git working copy provider
//!
//! Describes a checkout with `git describe --tags --dirty` and annotates
//! the result with the current branch. Descriptors are memoized per path
//! for the lifetime of the process: the commands are subprocess-expensive,
//! and a mid-process mutation of the checkout is accepted as not visible.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};

use regex::Regex;
use tracing::debug;

use crate::config::{GIT, GIT_BRANCH_ARGS, GIT_DESCRIBE_ARGS};
use crate::repo::{CommandRunner, RepoError, RepoProvider, SystemRunner};

/// Marker left by `git describe` when the checkout is past the nearest tag:
/// `-<commits>-`, as in `v1.2.3-4-gabcdef`.
fn distance_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"-(\d+)-").expect("static pattern"))
}

/// Git-backed [`RepoProvider`] with a process-lifetime descriptor cache.
pub struct GitRepo<R: CommandRunner = SystemRunner> {
    runner: R,
    described: Mutex<HashMap<PathBuf, String>>,
}

impl GitRepo {
    pub fn new() -> Self {
        Self::with_runner(SystemRunner)
    }
}

impl Default for GitRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> GitRepo<R> {
    /// Provider over a custom [`CommandRunner`].
    pub fn with_runner(runner: R) -> Self {
        Self {
            runner,
            described: Mutex::new(HashMap::new()),
        }
    }

    fn lock_described(&self) -> MutexGuard<'_, HashMap<PathBuf, String>> {
        // Entries are inserted whole, so a poisoned lock still guards a
        // consistent map.
        self.described.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run one git command at `path` and return its trimmed stdout.
    fn run(&self, args: &'static [&'static str], path: &Path) -> Result<String, RepoError> {
        let output = self
            .runner
            .run(GIT, args, path)
            .map_err(|source| RepoError::CommandMissing {
                program: GIT,
                source,
            })?;

        if !output.status.success() {
            return Err(RepoError::CommandFailed {
                program: GIT,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl<R: CommandRunner> RepoProvider for GitRepo<R> {
    fn kind(&self) -> &'static str {
        "git"
    }

    fn describe(&self, path: &Path) -> Result<String, RepoError> {
        if let Some(cached) = self.lock_described().get(path) {
            debug!(path = %path.display(), version = %cached, "descriptor cache hit");
            return Ok(cached.clone());
        }

        let raw = self.run(GIT_DESCRIBE_ARGS, path)?;
        let descriptor = if distance_marker().is_match(&raw) {
            let branch = self.run(GIT_BRANCH_ARGS, path)?;
            annotate_with_branch(&raw, &branch)
        } else {
            raw
        };
        debug!(path = %path.display(), version = %descriptor, "described working copy");

        Ok(self
            .lock_described()
            .entry(path.to_path_buf())
            .or_insert(descriptor)
            .clone())
    }
}

/// Insert the branch name after the first distance marker:
/// `v1.2.3-4-gabcdef` on branch `feature-x` becomes
/// `v1.2.3-4-feature-x-gabcdef`.
///
/// Only the first marker is rewritten; a well-formed descriptor carries at
/// most one. Descriptors without a marker are returned unmodified.
fn annotate_with_branch(raw: &str, branch: &str) -> String {
    distance_marker()
        .replace(raw, |caps: &regex::Captures| {
            format!("-{}-{}-", &caps[1], branch)
        })
        .into_owned()
}
