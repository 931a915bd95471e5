//! Exclusion lists
//!
//! Plain text files, one identity string per line, published by the
//! transitive-dependency writer of other modules. Missing inputs are normal
//! (the producing module may have nothing to publish) and contribute nothing.

use crate::error::{ArtifactError, ArtifactResult};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Read one list file
///
/// Returns an empty list if `path` does not exist or is not a regular file.
/// Invalid UTF-8 sequences are replaced rather than rejected.
///
/// # Errors
/// Returns error if an existing regular file cannot be read
pub fn read_exclusion_list(path: &Path) -> ArtifactResult<Vec<String>> {
    if !path.is_file() {
        if path.exists() {
            tracing::warn!(path = %path.display(), "exclusion list is not a regular file, skipping");
        } else {
            tracing::debug!(path = %path.display(), "exclusion list missing");
        }
        return Ok(Vec::new());
    }
    let bytes = fs::read(path).map_err(|e| ArtifactError::io_error(path, e))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.lines().map(str::to_owned).collect())
}

/// The set of list files feeding one filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionLists {
    files: Vec<PathBuf>,
}

impl ExclusionLists {
    /// Lists read from `files`
    #[must_use]
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// No list files at all
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Union of every identity listed in every file
    ///
    /// # Errors
    /// Returns error if an existing regular file cannot be read
    pub fn read_identities(&self) -> ArtifactResult<HashSet<String>> {
        let mut identities = HashSet::new();
        for file in &self.files {
            identities.extend(read_exclusion_list(file)?);
        }
        tracing::debug!(
            files = self.files.len(),
            identities = identities.len(),
            "read exclusion lists"
        );
        Ok(identities)
    }
}
