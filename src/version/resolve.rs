//! Requester identity and version resolution
//!
//! A version request names the module asking. Resolution walks a fixed
//! chain: environment override, then installed distribution metadata found
//! by truncating the dotted name, then a live description of the checkout
//! when the matched distribution lives in a working copy.

use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use crate::config;
use crate::dist::{DistStore, Distribution, ManifestStore, StoreError};
use crate::repo::{GitRepo, RepoProvider};
use crate::version::tuple::{self, VersionTuple};

/// Identity of the code asking for its version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Fully qualified dotted module name, e.g. `my_pkg.cli`.
    Module(String),
    /// No module identity is available (generated or interactive code);
    /// the call site stands in for it.
    Unknown { file: String, line: u32 },
}

impl Origin {
    pub fn module(name: impl Into<String>) -> Self {
        Origin::Module(name.into())
    }

    pub fn unknown_at(file: impl Into<String>, line: u32) -> Self {
        Origin::Unknown {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Module(name) => write!(f, "{name}"),
            Origin::Unknown { file, line } => write!(f, "<unknown from {file}:{line}>"),
        }
    }
}

/// Resolves versions for requesting modules against a metadata store and a
/// set of working copy providers.
///
/// Nothing is cached at this layer; every request re-runs the chain. Only
/// the providers memoize, keyed by path.
pub struct Resolver<S> {
    store: S,
    repos: Vec<Box<dyn RepoProvider>>,
}

impl Resolver<ManifestStore> {
    /// Resolver over the default manifest location with git detection.
    pub fn open_default() -> Result<Self, StoreError> {
        Ok(Self::new(ManifestStore::open_default()?))
    }
}

impl<S: DistStore> Resolver<S> {
    /// Resolver with the standard provider set (git).
    pub fn new(store: S) -> Self {
        Self::with_repos(store, vec![Box::new(GitRepo::new())])
    }

    /// Resolver with an explicit provider list.
    pub fn with_repos(store: S, repos: Vec<Box<dyn RepoProvider>>) -> Self {
        Self { store, repos }
    }

    /// The version of the requesting module, or `None` when no override is
    /// set and no installed distribution matches any prefix of its name.
    ///
    /// An [`Origin::Unknown`] requester always yields its sentinel
    /// descriptor; the request never fails.
    pub fn version(&self, origin: &Origin) -> Option<String> {
        self.version_with_env(origin, |key| std::env::var(key).ok())
    }

    /// [`Resolver::version`] rendered as a string in every case, using the
    /// `<unknown ...>` sentinel when nothing could be determined.
    pub fn version_or_unknown(&self, origin: &Origin) -> String {
        self.version(origin)
            .unwrap_or_else(|| format!("<unknown {origin}>"))
    }

    /// The comparable tuple form of [`Resolver::version`]. Undeterminable
    /// versions become the unknown tuple.
    pub fn version_tuple(&self, origin: &Origin) -> VersionTuple {
        tuple::parse(self.version(origin).as_deref())
    }

    fn version_with_env(
        &self,
        origin: &Origin,
        env: impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        let name = match origin {
            Origin::Module(name) => name,
            Origin::Unknown { .. } => {
                debug!(origin = %origin, "requester has no module identity");
                return Some(origin.to_string());
            }
        };

        if let Some(value) = env(&config::override_key(name)) {
            debug!(module = name, version = %value, "version overridden from environment");
            return Some(value);
        }

        self.resolve_distribution(name)
    }

    /// Walk `name` from most to least specific, truncating at the last dot,
    /// until the store has a match. At most one lookup per dotted component.
    fn resolve_distribution(&self, name: &str) -> Option<String> {
        let mut candidate = name;
        loop {
            match self.store.lookup(candidate) {
                Ok(Some(dist)) => {
                    debug!(module = name, distribution = candidate, "matched distribution");
                    return Some(self.distribution_version(&dist));
                }
                Ok(None) => match candidate.rsplit_once('.') {
                    Some((shorter, _)) => candidate = shorter,
                    None => {
                        debug!(module = name, "no installed distribution matches any prefix");
                        return None;
                    }
                },
                Err(err) => {
                    warn!(distribution = candidate, error = %err, "metadata lookup failed");
                    return None;
                }
            }
        }
    }

    /// The first provider claiming `path` as a working copy, if any.
    fn working_copy_provider(&self, path: &Path) -> Option<&dyn RepoProvider> {
        self.repos.iter().map(|r| r.as_ref()).find(|repo| {
            let detected = repo.detect(path);
            if detected {
                debug!(path = %path.display(), kind = repo.kind(), "install location is a working copy");
            }
            detected
        })
    }

    /// Live working copy state wins over the version recorded at install
    /// time.
    fn distribution_version(&self, dist: &Distribution) -> String {
        if let Some(repo) = self.working_copy_provider(&dist.location) {
            match repo.describe(&dist.location) {
                Ok(descriptor) => return descriptor,
                Err(err) => {
                    warn!(
                        path = %dist.location.display(),
                        kind = repo.kind(),
                        error = %err,
                        "describe failed after detection, using recorded version"
                    );
                }
            }
        }
        dist.version.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::MockDistStore;
    use crate::repo::{MockRepoProvider, RepoError};
    use mockall::Sequence;
    use mockall::predicate::eq;
    use serial_test::serial;
    use std::path::PathBuf;

    fn dist(name: &str, location: &str, version: &str) -> Distribution {
        Distribution {
            name: name.to_string(),
            location: PathBuf::from(location),
            version: version.to_string(),
        }
    }

    #[test]
    fn override_short_circuits_all_lookup() {
        // No expectations: any store or repo call would panic.
        let store = MockDistStore::new();
        let resolver = Resolver::with_repos(store, vec![Box::new(MockRepoProvider::new())]);

        let version = resolver.version_with_env(&Origin::module("my.pkg"), |key| {
            (key == "AUTOVER_MY_PKG").then(|| "9.9.9-forced".to_string())
        });

        assert_eq!(version, Some("9.9.9-forced".to_string()));
    }

    #[test]
    #[serial]
    fn override_is_read_from_the_process_environment() {
        let store = MockDistStore::new();
        let resolver = Resolver::with_repos(store, vec![]);

        unsafe { std::env::set_var("AUTOVER_ENV_PKG", "7.7.7") };
        let version = resolver.version(&Origin::module("env_pkg"));
        unsafe { std::env::remove_var("AUTOVER_ENV_PKG") };

        assert_eq!(version, Some("7.7.7".to_string()));
    }

    #[test]
    fn fallback_walk_tries_each_prefix_once_most_specific_first() {
        let mut store = MockDistStore::new();
        let mut seq = Sequence::new();
        for name in ["a.b.c", "a.b", "a"] {
            store
                .expect_lookup()
                .with(eq(name))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(None));
        }
        let resolver = Resolver::with_repos(store, vec![]);

        assert_eq!(resolver.version(&Origin::module("a.b.c")), None);
    }

    #[test]
    fn fallback_walk_stops_at_first_match() {
        let mut store = MockDistStore::new();
        let mut seq = Sequence::new();
        store
            .expect_lookup()
            .with(eq("a.b.c"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        store
            .expect_lookup()
            .with(eq("a.b"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(dist("a.b", "/nowhere", "2.0.0"))));
        let resolver = Resolver::with_repos(store, vec![]);

        assert_eq!(
            resolver.version(&Origin::module("a.b.c")),
            Some("2.0.0".to_string())
        );
    }

    #[test]
    fn recorded_version_is_used_when_location_is_not_a_working_copy() {
        let mut store = MockDistStore::new();
        store
            .expect_lookup()
            .returning(|_| Ok(Some(dist("pkg", "/opt/site/pkg", "1.4.2"))));
        let mut repo = MockRepoProvider::new();
        repo.expect_detect().return_const(false);
        let resolver = Resolver::with_repos(store, vec![Box::new(repo)]);

        assert_eq!(
            resolver.version(&Origin::module("pkg")),
            Some("1.4.2".to_string())
        );
    }

    #[test]
    fn working_copy_description_overrides_recorded_version() {
        let mut store = MockDistStore::new();
        store
            .expect_lookup()
            .returning(|_| Ok(Some(dist("pkg", "/src/pkg", "1.4.2"))));
        let mut repo = MockRepoProvider::new();
        repo.expect_detect()
            .with(eq(Path::new("/src/pkg")))
            .return_const(true);
        // kind() is only read by disabled log callsites
        repo.expect_kind().times(0..).return_const("git");
        repo.expect_describe()
            .with(eq(Path::new("/src/pkg")))
            .returning(|_| Ok("v1.4.2-3-main-gabcdef".to_string()));
        let resolver = Resolver::with_repos(store, vec![Box::new(repo)]);

        assert_eq!(
            resolver.version(&Origin::module("pkg")),
            Some("v1.4.2-3-main-gabcdef".to_string())
        );
    }

    #[test]
    fn describe_failure_after_detection_falls_back_to_recorded_version() {
        let mut store = MockDistStore::new();
        store
            .expect_lookup()
            .returning(|_| Ok(Some(dist("pkg", "/src/pkg", "1.4.2"))));
        let mut repo = MockRepoProvider::new();
        repo.expect_detect().return_const(true);
        repo.expect_kind().times(0..).return_const("git");
        repo.expect_describe().returning(|_| {
            Err(RepoError::CommandMissing {
                program: "git",
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            })
        });
        let resolver = Resolver::with_repos(store, vec![Box::new(repo)]);

        assert_eq!(
            resolver.version(&Origin::module("pkg")),
            Some("1.4.2".to_string())
        );
    }

    #[test]
    fn unknown_origin_yields_sentinel_and_unknown_tuple() {
        let store = MockDistStore::new();
        let resolver = Resolver::with_repos(store, vec![]);
        let origin = Origin::unknown_at("src/main.rs", 42);

        assert_eq!(
            resolver.version(&origin),
            Some("<unknown from src/main.rs:42>".to_string())
        );
        assert_eq!(resolver.version_tuple(&origin), VersionTuple::unknown());
    }

    #[test]
    fn exhausted_walk_renders_as_unknown() {
        let mut store = MockDistStore::new();
        store.expect_lookup().returning(|_| Ok(None));
        let resolver = Resolver::with_repos(store, vec![]);
        let origin = Origin::module("ghost.pkg");

        assert_eq!(resolver.version(&origin), None);
        assert_eq!(resolver.version_or_unknown(&origin), "<unknown ghost.pkg>");
        assert_eq!(resolver.version_tuple(&origin), VersionTuple::unknown());
    }

    #[test]
    fn store_errors_resolve_to_none_rather_than_failing() {
        let mut store = MockDistStore::new();
        store.expect_lookup().returning(|_| {
            Err(StoreError::Io {
                path: PathBuf::from("/data/distributions.json"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        });
        let resolver = Resolver::with_repos(store, vec![]);

        assert_eq!(resolver.version(&Origin::module("pkg")), None);
    }
}
