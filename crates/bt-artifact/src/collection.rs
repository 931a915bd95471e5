//! Artifact collections
//!
//! [`ArtifactCollection`] is the seam to whatever resolved the dependencies.
//! [`ResolvedArtifactSet`] is the plain in-memory implementation.

use crate::artifact::ResolvedArtifact;
use crate::error::ArtifactResult;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Failure recorded while resolving a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("could not resolve {component}: {message}")]
pub struct ResolutionFailure {
    pub component: String,
    pub message: String,
}

impl ResolutionFailure {
    #[must_use]
    pub fn new(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            message: message.into(),
        }
    }
}

/// A resolved set of artifacts with their files
///
/// # Contract
/// - `artifacts` iterates in a stable order
/// - `artifact_files` lists the files of the same artifacts
/// - `failures` never fails; it reports what resolution recorded
pub trait ArtifactCollection: Send + Sync {
    /// Resolved artifacts in iteration order
    ///
    /// # Errors
    /// Returns error if the artifacts cannot be materialized
    fn artifacts(&self) -> ArtifactResult<IndexSet<ResolvedArtifact>>;

    /// Files of the resolved artifacts
    ///
    /// # Errors
    /// Returns error if the files cannot be materialized
    fn artifact_files(&self) -> ArtifactResult<Vec<PathBuf>>;

    /// Failures recorded during resolution
    fn failures(&self) -> Vec<ResolutionFailure>;
}

impl<C: ArtifactCollection + ?Sized> ArtifactCollection for Arc<C> {
    fn artifacts(&self) -> ArtifactResult<IndexSet<ResolvedArtifact>> {
        (**self).artifacts()
    }

    fn artifact_files(&self) -> ArtifactResult<Vec<PathBuf>> {
        (**self).artifact_files()
    }

    fn failures(&self) -> Vec<ResolutionFailure> {
        (**self).failures()
    }
}

impl<C: ArtifactCollection + ?Sized> ArtifactCollection for &C {
    fn artifacts(&self) -> ArtifactResult<IndexSet<ResolvedArtifact>> {
        (**self).artifacts()
    }

    fn artifact_files(&self) -> ArtifactResult<Vec<PathBuf>> {
        (**self).artifact_files()
    }

    fn failures(&self) -> Vec<ResolutionFailure> {
        (**self).failures()
    }
}

/// In-memory artifact collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedArtifactSet {
    artifacts: IndexSet<ResolvedArtifact>,
    failures: Vec<ResolutionFailure>,
}

impl ResolvedArtifactSet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an artifact; duplicates keep their first position
    pub fn push(&mut self, artifact: ResolvedArtifact) {
        self.artifacts.insert(artifact);
    }

    /// Record a resolution failure
    pub fn record_failure(&mut self, failure: ResolutionFailure) {
        self.failures.push(failure);
    }

    /// With a resolution failure
    #[must_use]
    pub fn with_failure(mut self, failure: ResolutionFailure) -> Self {
        self.record_failure(failure);
        self
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Iterate artifacts in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedArtifact> {
        self.artifacts.iter()
    }
}

impl FromIterator<ResolvedArtifact> for ResolvedArtifactSet {
    fn from_iter<I: IntoIterator<Item = ResolvedArtifact>>(iter: I) -> Self {
        Self {
            artifacts: iter.into_iter().collect(),
            failures: Vec::new(),
        }
    }
}

impl ArtifactCollection for ResolvedArtifactSet {
    fn artifacts(&self) -> ArtifactResult<IndexSet<ResolvedArtifact>> {
        Ok(self.artifacts.clone())
    }

    fn artifact_files(&self) -> ArtifactResult<Vec<PathBuf>> {
        Ok(self
            .artifacts
            .iter()
            .map(|artifact| artifact.file().to_path_buf())
            .collect())
    }

    fn failures(&self) -> Vec<ResolutionFailure> {
        self.failures.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::ComponentIdentifier;

    fn artifact(path: &str) -> ResolvedArtifact {
        ResolvedArtifact::new(ComponentIdentifier::project(path), format!("{path}.jar"))
    }

    #[test]
    fn preserves_insertion_order() {
        let set: ResolvedArtifactSet = [":c", ":a", ":b"].into_iter().map(artifact).collect();
        let files = set.artifact_files().unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from(":c.jar"),
                PathBuf::from(":a.jar"),
                PathBuf::from(":b.jar")
            ]
        );
    }

    #[test]
    fn duplicates_collapse() {
        let mut set = ResolvedArtifactSet::new();
        set.push(artifact(":a"));
        set.push(artifact(":b"));
        set.push(artifact(":a"));
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().next(), Some(&artifact(":a")));
    }

    #[test]
    fn failures_pass_through_shared_handles() {
        let set = Arc::new(
            ResolvedArtifactSet::new().with_failure(ResolutionFailure::new("g:m:1", "not found")),
        );
        let failures = set.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].to_string(), "could not resolve g:m:1: not found");
    }
}
