//! Filtered artifact collections
//!
//! [`FilteredArtifactCollection`] is a primary collection minus every
//! artifact whose identity string appears in a set of exclusion lists. The
//! main use is the runtime classpath of a test or feature module minus what
//! the tested/base module already ships.
//!
//! The filtered view is computed on first access and memoized for the
//! lifetime of the instance.

use crate::artifact::ResolvedArtifact;
use crate::collection::{ArtifactCollection, ResolutionFailure};
use crate::error::ArtifactResult;
use crate::exclusions::ExclusionLists;
use crate::identity::identity_string;
use indexmap::IndexSet;
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::path::PathBuf;

/// Memoized result of a filter pass
///
/// `files` is parallel to `artifacts` when something was excluded; when
/// nothing was excluded both are taken from the primary collection as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredArtifacts {
    artifacts: IndexSet<ResolvedArtifact>,
    files: Vec<PathBuf>,
}

impl FilteredArtifacts {
    #[inline]
    #[must_use]
    pub fn artifacts(&self) -> &IndexSet<ResolvedArtifact> {
        &self.artifacts
    }

    #[inline]
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
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
}

/// Primary collection filtered by exclusion lists
///
/// # Invariants
/// - Computed at most once; concurrent first callers block on the single
///   computation and then share its result
/// - Retained artifacts keep the primary iteration order
/// - An artifact is dropped iff its identity string is excluded
/// - With an empty exclusion set the primary collection passes through
///   untouched and no identity is computed
#[derive(Debug)]
pub struct FilteredArtifactCollection<C> {
    primary: C,
    exclusions: ExclusionLists,
    state: OnceCell<FilteredArtifacts>,
}

impl<C: ArtifactCollection> FilteredArtifactCollection<C> {
    /// Create a lazy filter; nothing is read until first access
    #[must_use]
    pub fn new(primary: C, exclusions: ExclusionLists) -> Self {
        Self {
            primary,
            exclusions,
            state: OnceCell::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn primary(&self) -> &C {
        &self.primary
    }

    #[inline]
    #[must_use]
    pub fn exclusions(&self) -> &ExclusionLists {
        &self.exclusions
    }

    /// Whether the filtered view has been computed yet
    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.state.get().is_some()
    }

    /// Identities read from the exclusion lists (not memoized)
    ///
    /// # Errors
    /// Returns error if an existing list file cannot be read
    pub fn excluded_identities(&self) -> ArtifactResult<HashSet<String>> {
        self.exclusions.read_identities()
    }

    /// The memoized filter result, computing it on first call
    ///
    /// A failed computation is not memoized.
    ///
    /// # Errors
    /// Returns error if a list file cannot be read, the primary collection
    /// cannot be materialized, or an identity cannot be computed
    pub fn resolve(&self) -> ArtifactResult<&FilteredArtifacts> {
        self.state.get_or_try_init(|| self.compute())
    }

    /// Retained artifacts in primary order
    ///
    /// # Errors
    /// See [`Self::resolve`]
    pub fn filtered_artifacts(&self) -> ArtifactResult<&IndexSet<ResolvedArtifact>> {
        self.resolve().map(FilteredArtifacts::artifacts)
    }

    /// Files of the retained artifacts
    ///
    /// # Errors
    /// See [`Self::resolve`]
    pub fn filtered_files(&self) -> ArtifactResult<&[PathBuf]> {
        self.resolve().map(FilteredArtifacts::files)
    }

    fn compute(&self) -> ArtifactResult<FilteredArtifacts> {
        let excluded = self.excluded_identities()?;

        if excluded.is_empty() {
            tracing::debug!("no excluded identities, passing primary collection through");
            return Ok(FilteredArtifacts {
                artifacts: self.primary.artifacts()?,
                files: self.primary.artifact_files()?,
            });
        }

        let mut retained = FilteredArtifacts::default();
        let mut dropped = 0usize;
        for artifact in self.primary.artifacts()? {
            let identity = identity_string(&artifact)?;
            if excluded.contains(&identity) {
                tracing::trace!(%identity, "excluding artifact");
                dropped += 1;
                continue;
            }
            retained.files.push(artifact.file().to_path_buf());
            retained.artifacts.insert(artifact);
        }

        tracing::debug!(
            retained = retained.len(),
            dropped,
            "filtered artifact collection"
        );
        Ok(retained)
    }
}

impl<C: ArtifactCollection> ArtifactCollection for FilteredArtifactCollection<C> {
    fn artifacts(&self) -> ArtifactResult<IndexSet<ResolvedArtifact>> {
        self.filtered_artifacts().cloned()
    }

    fn artifact_files(&self) -> ArtifactResult<Vec<PathBuf>> {
        self.filtered_files().map(<[PathBuf]>::to_vec)
    }

    /// Failures of the primary collection; filtering adds none
    fn failures(&self) -> Vec<ResolutionFailure> {
        self.primary.failures()
    }
}
