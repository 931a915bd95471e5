//! Artifact manifests
//!
//! A TOML stand-in for a resolved dependency configuration:
//!
//! ```toml
//! [[artifact]]
//! file = "libs/lib-debug.aar"
//! component = { kind = "project", path = ":lib" }
//! attributes = { variant = "debug" }
//!
//! [[artifact]]
//! file = "cache/appcompat-v7-26.0.0.aar"
//! component = { kind = "module", group = "com.android.support", module = "appcompat-v7", version = "26.0.0" }
//!
//! [[failure]]
//! component = "com.example:missing:1.0"
//! message = "not found"
//! ```

use anyhow::{Context, Result};
use bt_artifact::{ResolutionFailure, ResolvedArtifact, ResolvedArtifactSet};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default, rename = "artifact")]
    artifacts: Vec<ResolvedArtifact>,
    #[serde(default, rename = "failure")]
    failures: Vec<ResolutionFailure>,
}

/// Parse manifest text
///
/// # Errors
/// Returns error if the text is not a valid manifest
pub fn parse_manifest(text: &str) -> Result<ResolvedArtifactSet> {
    let manifest: Manifest = toml::from_str(text).context("invalid artifact manifest")?;

    let mut set: ResolvedArtifactSet = manifest.artifacts.into_iter().collect();
    for failure in manifest.failures {
        set.record_failure(failure);
    }
    Ok(set)
}

/// Read and parse a manifest file
///
/// # Errors
/// Returns error if the file cannot be read or parsed
pub fn load_manifest(path: &Path) -> Result<ResolvedArtifactSet> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let set = parse_manifest(&text).with_context(|| format!("in {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        artifacts = set.len(),
        "loaded artifact manifest"
    );
    Ok(set)
}
