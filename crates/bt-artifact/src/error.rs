//! Error types for artifact identity and filtering

use crate::artifact::AttributeValue;
use std::path::PathBuf;

/// Identity string could not be computed for an artifact
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// The `variant` attribute exists but does not carry a name
    #[error("project {project}: variant attribute is not a named value ({value})")]
    VariantNotNamed {
        project: String,
        value: AttributeValue,
    },
}

/// Errors while reading exclusion lists or filtering collections
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// Filesystem failure on a list file or an output
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Identity string computation failed
    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),
}

impl ArtifactError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for artifact operations
pub type ArtifactResult<T> = Result<T, ArtifactError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_error_display() {
        let err = IdentityError::VariantNotNamed {
            project: ":app".to_string(),
            value: AttributeValue::Flag(true),
        };
        assert_eq!(
            err.to_string(),
            "project :app: variant attribute is not a named value (true)"
        );
    }

    #[test]
    fn error_conversions() {
        let identity = IdentityError::VariantNotNamed {
            project: ":lib".to_string(),
            value: AttributeValue::Number(3),
        };
        let err: ArtifactError = identity.into();
        assert!(matches!(err, ArtifactError::Identity(_)));
    }
}
