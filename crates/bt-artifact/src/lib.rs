//! BT Artifact Identity Filtering
//!
//! Resolved artifacts, their identity strings, and the lazily computed
//! collection that drops artifacts listed in exclusion files.
//!
//! # Example
//!
//! ```rust,ignore
//! use bt_artifact::{ExclusionLists, FilteredArtifactCollection};
//!
//! let filtered = FilteredArtifactCollection::new(runtime, ExclusionLists::new(["base-deps.txt"]));
//! for file in filtered.filtered_files()? {
//!     println!("{}", file.display());
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod artifact;
mod collection;
mod error;
mod exclusions;
mod filter;
mod identifier;
mod identity;
mod transitive;

pub use artifact::{AttributeContainer, AttributeValue, ResolvedArtifact, VARIANT_ATTRIBUTE};
pub use collection::{ArtifactCollection, ResolutionFailure, ResolvedArtifactSet};
pub use error::{ArtifactError, ArtifactResult, IdentityError};
pub use exclusions::{read_exclusion_list, ExclusionLists};
pub use filter::{FilteredArtifactCollection, FilteredArtifacts};
pub use identifier::ComponentIdentifier;
pub use identity::{identity_string, VARIANT_SEPARATOR};
pub use transitive::{collect_identities, render_identities, TransitiveDepsWriter};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
