//! Comparable tuple form of version descriptors
//!
//! Version descriptors come in heterogeneous shapes: plain releases
//! (`1.0.3`), pre-releases (`1.0.3-rc-5`), and `git describe` output
//! (`v1.2.3-4-feature-x-gabcdef`). Splitting on `.` and grouping on `-`
//! turns any of them into a nested tuple that orders lexicographically,
//! which is close enough to semantic ordering for same-shaped versions.
//!
//! Parsing is total: every input produces some tuple, worst case one made
//! entirely of text components.

use std::fmt;

use serde::{Serialize, Serializer, ser::SerializeSeq};

/// Prefix of descriptors produced for requesters without a resolvable
/// identity. Such descriptors parse to [`VersionTuple::unknown`].
pub const UNKNOWN_PREFIX: &str = "<unknown";

/// One element of a version group: an integer where the token was entirely
/// numeric, otherwise the token text.
///
/// The derived ordering puts all numbers before all text, so comparing
/// structurally different versions is deterministic even though it carries
/// no semantic meaning.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    Number(u64),
    Text(String),
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Number(n) => write!(f, "{n}"),
            Component::Text(t) => write!(f, "{t}"),
        }
    }
}

impl Serialize for Component {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Component::Number(n) => serializer.serialize_u64(*n),
            Component::Text(t) => serializer.serialize_str(t),
        }
    }
}

/// A version descriptor decomposed into `-`-delimited groups of components,
/// comparable by the standard lexicographic tuple ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct VersionTuple(Vec<Vec<Component>>);

impl VersionTuple {
    /// Tuple representing an undeterminable version: `(("unknown",),)`.
    pub fn unknown() -> Self {
        VersionTuple(vec![vec![Component::Text("unknown".to_string())]])
    }

    /// The `-`-delimited groups, outermost first.
    pub fn groups(&self) -> &[Vec<Component>] {
        &self.0
    }
}

impl fmt::Display for VersionTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, group) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "(")?;
            for (j, component) in group.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{component}")?;
            }
            write!(f, ")")?;
        }
        write!(f, ")")
    }
}

impl Serialize for VersionTuple {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for group in &self.0 {
            seq.serialize_element(group)?;
        }
        seq.end()
    }
}

/// Parse a descriptor into its comparable tuple form.
///
/// Grammar: `.` splits components within a group, `-` starts a new group.
/// Empty tokens (leading, trailing, or doubled separators) are dropped, so
/// no group is ever empty. Entirely numeric tokens become integers via
/// [`normalize`].
///
/// `None` and descriptors carrying the [`UNKNOWN_PREFIX`] sentinel both map
/// to the fixed unknown tuple.
///
/// Examples:
/// - `"1.0.3"` -> `((1, 0, 3),)`
/// - `"1.0.3-dev"` -> `((1, 0, 3), ("dev",))`
/// - `"1.0.3-rc-5"` -> `((1, 0, 3), ("rc",), (5,))`
pub fn parse(descriptor: Option<&str>) -> VersionTuple {
    let Some(descriptor) = descriptor else {
        return VersionTuple::unknown();
    };
    if descriptor.starts_with(UNKNOWN_PREFIX) {
        return VersionTuple::unknown();
    }

    let groups = descriptor
        .split('-')
        .map(|segment| {
            segment
                .split('.')
                .filter(|token| !token.is_empty())
                .map(normalize)
                .collect::<Vec<_>>()
        })
        .filter(|group| !group.is_empty())
        .collect();

    VersionTuple(groups)
}

/// Normalize one token: entirely numeric tokens lose leading zeros and
/// become integers (all zeros -> 0), everything else stays text. A numeric
/// token too large for `u64` stays text rather than failing.
fn normalize(token: &str) -> Component {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Component::Text(token.to_string());
    }

    let stripped = token.trim_start_matches('0');
    if stripped.is_empty() {
        return Component::Number(0);
    }

    match stripped.parse::<u64>() {
        Ok(n) => Component::Number(n),
        Err(_) => Component::Text(token.to_string()),
    }
}
