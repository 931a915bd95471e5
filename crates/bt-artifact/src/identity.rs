//! Identity strings
//!
//! The text form written into transitive-dependency list files and matched by
//! [`FilteredArtifactCollection`](crate::FilteredArtifactCollection). Producer
//! and consumer both go through [`identity_string`]; the format is
//! whitespace-, case- and order-sensitive:
//!
//! | component | identity                      |
//! |-----------|-------------------------------|
//! | project   | `<path>` or `<path>::<variant>` |
//! | module    | `<group>:<module>`            |
//! | other     | display string                |

use crate::artifact::{ResolvedArtifact, VARIANT_ATTRIBUTE};
use crate::error::IdentityError;
use crate::identifier::ComponentIdentifier;

/// Separator between a project path and its variant name
pub const VARIANT_SEPARATOR: &str = "::";

/// Compute the identity string of an artifact
///
/// # Errors
/// Returns error if a project artifact carries a `variant` attribute that is
/// not a named value
pub fn identity_string(artifact: &ResolvedArtifact) -> Result<String, IdentityError> {
    match artifact.component() {
        ComponentIdentifier::Project { path } => match variant_name(artifact, path)? {
            None => Ok(path.clone()),
            Some(variant) => Ok(format!("{path}{VARIANT_SEPARATOR}{variant}")),
        },
        ComponentIdentifier::Module { group, module, .. } => Ok(format!("{group}:{module}")),
        other @ ComponentIdentifier::Other { .. } => Ok(other.to_string()),
    }
}

fn variant_name<'a>(
    artifact: &'a ResolvedArtifact,
    project: &str,
) -> Result<Option<&'a str>, IdentityError> {
    match artifact.attribute(VARIANT_ATTRIBUTE) {
        None => Ok(None),
        Some(value) => value
            .as_name()
            .map(Some)
            .ok_or_else(|| IdentityError::VariantNotNamed {
                project: project.to_string(),
                value: value.clone(),
            }),
    }
}
