use std::path::PathBuf;

// =============================================================================
// Environment override
// =============================================================================

/// Prefix for per-module version override variables.
pub const OVERRIDE_PREFIX: &str = "AUTOVER_";

/// Returns the environment variable name consulted by the override check
/// for `module`.
///
/// The dotted name is uppercased, with `.` and `-` mapped to `_`:
/// `my.pkg-extra` -> `AUTOVER_MY_PKG_EXTRA`.
pub fn override_key(module: &str) -> String {
    let mut key = String::with_capacity(OVERRIDE_PREFIX.len() + module.len());
    key.push_str(OVERRIDE_PREFIX);
    for ch in module.chars() {
        match ch {
            '.' | '-' => key.push('_'),
            _ => key.extend(ch.to_uppercase()),
        }
    }
    key
}

// =============================================================================
// External source control commands
// =============================================================================

/// Program name of the source control tool.
pub const GIT: &str = "git";

/// Arguments describing the checkout relative to the nearest tag.
pub const GIT_DESCRIBE_ARGS: &[&str] = &["describe", "--tags", "--dirty"];

/// Arguments printing the current branch name (`HEAD` when detached).
pub const GIT_BRANCH_ARGS: &[&str] = &["rev-parse", "--abbrev-ref", "HEAD"];

// =============================================================================
// Data locations
// =============================================================================

/// File name of the installed distribution manifest inside the data dir.
pub const MANIFEST_FILE: &str = "distributions.json";

/// Returns the path to the installed distribution manifest, kept under the
/// autover data directory: `$XDG_DATA_HOME/autover` when set, then
/// `~/.local/share/autover`, then `./autover` when no home is known.
pub fn manifest_path() -> PathBuf {
    manifest_path_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

fn manifest_path_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("autover")
        .join(MANIFEST_FILE)
}
