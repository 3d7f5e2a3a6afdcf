//! Automatic version resolution for installed and editable distributions
//!
//! A library should be able to report its version without hardcoding one,
//! even when installed in development mode where the recorded metadata is
//! stale. `autover` resolves the version at request time:
//!
//! 1. an environment override (`AUTOVER_<MODULE>`), checked first and
//!    returned verbatim,
//! 2. installed distribution metadata, found by truncating the requesting
//!    module's dotted name at successive dot boundaries,
//! 3. when the matched distribution's install location is a git working
//!    copy, a live `git describe` of it, branch-annotated and memoized
//!    per path for the process lifetime.
//!
//! The raw descriptor can also be parsed into a lexicographically
//! comparable tuple ([`version::tuple`]).
//!
//! ```no_run
//! use autover::{Resolver, origin};
//!
//! let resolver = Resolver::open_default()?;
//! println!("{}", resolver.version_or_unknown(&origin!()));
//! # Ok::<(), autover::StoreError>(())
//! ```

pub mod config;
pub mod dist;
pub mod repo;
pub mod version;

pub use dist::{DistStore, Distribution, ManifestStore, StoreError};
pub use repo::{GitRepo, RepoError, RepoProvider};
pub use version::resolve::{Origin, Resolver};
pub use version::tuple::VersionTuple;

/// Identity of the calling module, for handing to [`Resolver::version`].
///
/// Expands to an [`Origin`] built from `module_path!`, with `::` mapped to
/// the dotted form distribution names use.
#[macro_export]
macro_rules! origin {
    () => {
        $crate::version::resolve::Origin::Module(module_path!().replace("::", "."))
    };
}
