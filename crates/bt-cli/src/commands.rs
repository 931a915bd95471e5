//! Subcommand implementations
//!
//! Each command returns what it would print so tests can drive them without
//! a process boundary.

use crate::config::Config;
use crate::manifest::load_manifest;
use anyhow::{Context, Result};
use bt_artifact::{
    identity_string, ArtifactCollection, ExclusionLists, FilteredArtifactCollection,
    ResolutionFailure, TransitiveDepsWriter,
};
use bt_attr::{AttrExtractor, ExtractionReport};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// `bt extract-attrs`
///
/// # Errors
/// Returns error if the archive cannot be read, the class is malformed or
/// the output cannot be written
pub fn extract_attrs(config: &Config, input: &Path, output: &Path) -> Result<ExtractionReport> {
    AttrExtractor::new(input, output)
        .with_entry(config.attr.entry.clone())
        .run()
        .with_context(|| format!("failed to extract attributes from {}", input.display()))
}

/// `bt write-transitive-deps`
///
/// # Errors
/// Returns error if the manifest is invalid or the list cannot be written
pub fn write_transitive_deps(manifest: &Path, output: &Path) -> Result<usize> {
    let runtime = load_manifest(manifest)?;
    TransitiveDepsWriter::new(runtime, output)
        .write()
        .with_context(|| format!("failed to write {}", output.display()))
}

/// One retained artifact in `bt filter --json` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetainedArtifact {
    /// `None` when the identity cannot be computed
    pub identity: Option<String>,
    pub file: PathBuf,
}

/// `bt filter --json` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    pub retained: Vec<RetainedArtifact>,
    pub failures: Vec<ResolutionFailure>,
}

/// `bt filter`; returns the text to print
///
/// # Errors
/// Returns error if the manifest is invalid, a list cannot be read or an
/// identity cannot be computed
pub fn filter(manifest: &Path, exclude: &[PathBuf], json: bool) -> Result<String> {
    let primary = load_manifest(manifest)?;
    let filtered = FilteredArtifactCollection::new(primary, ExclusionLists::new(exclude));

    let artifacts = filtered
        .filtered_artifacts()
        .context("failed to filter artifacts")?;
    tracing::info!(
        retained = artifacts.len(),
        lists = exclude.len(),
        "filtered artifact manifest"
    );

    if json {
        let report = FilterReport {
            retained: artifacts
                .iter()
                .map(|artifact| RetainedArtifact {
                    identity: identity_string(artifact).ok(),
                    file: artifact.file().to_path_buf(),
                })
                .collect(),
            failures: filtered.failures(),
        };
        let mut text = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        text.push('\n');
        return Ok(text);
    }

    let files = filtered.filtered_files()?;
    Ok(files
        .iter()
        .map(|file| format!("{}\n", file.display()))
        .collect())
}
