//! Transitive dependency lists
//!
//! The producer side of the exclusion-list contract: a module publishes the
//! identity of everything on its runtime classpath so that dependents can
//! filter those artifacts out of their own.

use crate::collection::ArtifactCollection;
use crate::error::{ArtifactError, ArtifactResult};
use crate::identity::identity_string;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Distinct identity strings of every artifact in `collection`
///
/// # Errors
/// Returns error if the collection cannot be materialized or an identity
/// cannot be computed
pub fn collect_identities<C>(collection: &C) -> ArtifactResult<BTreeSet<String>>
where
    C: ArtifactCollection + ?Sized,
{
    collection
        .artifacts()?
        .iter()
        .map(|artifact| identity_string(artifact).map_err(ArtifactError::from))
        .collect()
}

/// One identity per line, no trailing line break
#[must_use]
pub fn render_identities(identities: &BTreeSet<String>) -> String {
    identities
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes the identity list of a runtime classpath
#[derive(Debug)]
pub struct TransitiveDepsWriter<C> {
    runtime: C,
    output: PathBuf,
}

impl<C: ArtifactCollection> TransitiveDepsWriter<C> {
    #[must_use]
    pub fn new(runtime: C, output: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            output: output.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Write the list, replacing any previous file
    ///
    /// Returns the number of identities written.
    ///
    /// # Errors
    /// Returns error if an identity cannot be computed or the output (or
    /// its parent directory) cannot be written
    pub fn write(&self) -> ArtifactResult<usize> {
        let identities = collect_identities(&self.runtime)?;

        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ArtifactError::io_error(parent, e))?;
        }
        fs::write(&self.output, render_identities(&identities))
            .map_err(|e| ArtifactError::io_error(&self.output, e))?;

        tracing::info!(
            output = %self.output.display(),
            identities = identities.len(),
            "wrote transitive dependency list"
        );
        Ok(identities.len())
    }
}
