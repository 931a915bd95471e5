//! BT Platform Attribute Extraction
//!
//! Reads the generated `android/R$attr.class` out of a platform archive and
//! writes every integer constant field as an R.txt line.
//!
//! # Example
//!
//! ```rust,ignore
//! use bt_attr::AttrExtractor;
//!
//! let report = AttrExtractor::new("platforms/android-26/android.jar", "build/R.txt").run()?;
//! println!("{} attributes", report.records.len());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod classfile;
mod error;
mod extract;
mod record;

pub use classfile::{ClassFile, ConstantValue, FieldInfo};
pub use error::{AttrError, AttrResult, ClassFileError};
pub use extract::{parse_attr_fields, AttrExtractor, ExtractionReport, ATTR_CLASS_ENTRY};
pub use record::{render_records, AttributeRecord};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
