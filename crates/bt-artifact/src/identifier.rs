//! Component identifiers
//!
//! The resolved identity of a dependency. Exactly three kinds exist and every
//! consumer matches on all of them; the identity-string format depends on it.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Resolved identity of a dependency component
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ComponentIdentifier {
    /// Module of the current build, addressed by its path (`:feature:base`)
    Project { path: String },

    /// Published package, addressed by coordinates
    Module {
        group: String,
        module: String,
        #[serde(default)]
        version: String,
    },

    /// Anything else (local file dependencies, opaque binaries)
    Other { display_name: String },
}

impl ComponentIdentifier {
    /// Project identifier
    #[inline]
    #[must_use]
    pub fn project(path: impl Into<String>) -> Self {
        Self::Project { path: path.into() }
    }

    /// Published module identifier
    #[inline]
    #[must_use]
    pub fn module(
        group: impl Into<String>,
        module: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self::Module {
            group: group.into(),
            module: module.into(),
            version: version.into(),
        }
    }

    /// Identifier of any other kind
    #[inline]
    #[must_use]
    pub fn other(display_name: impl Into<String>) -> Self {
        Self::Other {
            display_name: display_name.into(),
        }
    }

    /// True for build-local project components
    #[inline]
    #[must_use]
    pub fn is_project(&self) -> bool {
        matches!(self, Self::Project { .. })
    }
}

impl Display for ComponentIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project { path } => write!(f, "project {path}"),
            Self::Module {
                group,
                module,
                version,
            } if version.is_empty() => write!(f, "{group}:{module}"),
            Self::Module {
                group,
                module,
                version,
            } => write!(f, "{group}:{module}:{version}"),
            Self::Other { display_name } => f.write_str(display_name),
        }
    }
}
