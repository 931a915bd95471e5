//! Resolved artifacts
//!
//! A [`ResolvedArtifact`] pairs a component identifier, the materialized file
//! and the attributes of the variant it was resolved from.

use crate::identifier::ComponentIdentifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

/// Attribute holding the build variant name of a project artifact
pub const VARIANT_ATTRIBUTE: &str = "variant";

/// Value of a variant attribute
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Flag(bool),
    Number(i64),
    Named(String),
}

impl AttributeValue {
    /// Name carried by a [`AttributeValue::Named`] value
    #[inline]
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Flag(_) | Self::Number(_) => None,
        }
    }
}

impl Display for AttributeValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// Variant attributes, ordered by name
pub type AttributeContainer = BTreeMap<String, AttributeValue>;

/// One dependency-resolution result
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedArtifact {
    component: ComponentIdentifier,
    file: PathBuf,
    #[serde(default, rename = "attributes")]
    variant: AttributeContainer,
}

impl ResolvedArtifact {
    /// Artifact with no variant attributes
    #[must_use]
    pub fn new(component: ComponentIdentifier, file: impl Into<PathBuf>) -> Self {
        Self {
            component,
            file: file.into(),
            variant: AttributeContainer::new(),
        }
    }

    /// Add (or replace) a variant attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.variant.insert(name.into(), value.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn component(&self) -> &ComponentIdentifier {
        &self.component
    }

    #[inline]
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    #[inline]
    #[must_use]
    pub fn variant_attributes(&self) -> &AttributeContainer {
        &self.variant
    }

    /// Look up one variant attribute
    #[inline]
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.variant.get(name)
    }
}
