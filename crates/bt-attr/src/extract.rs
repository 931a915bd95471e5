//! Platform attribute extraction
//!
//! [`parse_attr_fields`] is the pure step (class bytes in, records out);
//! [`AttrExtractor`] wraps it with the archive read and the report write.

use crate::classfile::{ClassFile, FieldInfo};
use crate::error::{AttrError, AttrResult, ClassFileError};
use crate::record::{render_records, AttributeRecord};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::ZipArchive;

/// Archive path of the generated attribute-ID holder class
pub const ATTR_CLASS_ENTRY: &str = "android/R$attr.class";

/// Collect every field with an integer constant, in declaration order
///
/// # Errors
/// Returns error if the bytes are not a well-formed class file
pub fn parse_attr_fields(class_bytes: &[u8]) -> Result<Vec<AttributeRecord>, ClassFileError> {
    let class = ClassFile::parse(class_bytes)?;
    Ok(class.fields.iter().filter_map(attribute_of).collect())
}

fn attribute_of(field: &FieldInfo) -> Option<AttributeRecord> {
    field
        .int_constant()
        .map(|value| AttributeRecord::new(field.name.clone(), value))
}

/// Outcome of one extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Whether the archive contained the designated class
    pub entry_found: bool,
    /// Records written to the output
    pub records: Vec<AttributeRecord>,
}

/// Reads the attribute class out of a platform archive and writes an R.txt
#[derive(Debug, Clone)]
pub struct AttrExtractor {
    input: PathBuf,
    output: PathBuf,
    entry: String,
}

impl AttrExtractor {
    /// Extractor for the default [`ATTR_CLASS_ENTRY`]
    #[must_use]
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            entry: ATTR_CLASS_ENTRY.to_string(),
        }
    }

    /// Look up a different archive entry
    #[must_use]
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = entry.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &Path {
        &self.input
    }

    #[inline]
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    #[inline]
    #[must_use]
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Read and decode the designated entry
    ///
    /// Returns `Ok(None)` when the archive has no such entry.
    ///
    /// # Errors
    /// Returns error if the archive cannot be opened or read, or the entry
    /// is not a well-formed class
    pub fn read_records(&self) -> AttrResult<Option<Vec<AttributeRecord>>> {
        let Some(bytes) = self.read_entry()? else {
            tracing::debug!(
                archive = %self.input.display(),
                entry = %self.entry,
                "attribute class not present"
            );
            return Ok(None);
        };

        parse_attr_fields(&bytes)
            .map(Some)
            .map_err(|source| AttrError::ClassFile {
                entry: self.entry.clone(),
                source,
            })
    }

    /// Extract records and write the report, truncating any previous output
    ///
    /// The archive is closed before the output is opened. A missing entry
    /// still produces an empty report.
    ///
    /// # Errors
    /// Returns error on archive, class-file or output failures
    pub fn run(&self) -> AttrResult<ExtractionReport> {
        let found = self.read_records()?;
        let entry_found = found.is_some();
        let records = found.unwrap_or_default();

        fs::write(&self.output, render_records(&records))
            .map_err(|e| AttrError::io_error(&self.output, e))?;

        tracing::info!(
            archive = %self.input.display(),
            output = %self.output.display(),
            count = records.len(),
            "extracted platform attributes"
        );

        Ok(ExtractionReport {
            entry_found,
            records,
        })
    }

    fn read_entry(&self) -> AttrResult<Option<Vec<u8>>> {
        let file = File::open(&self.input).map_err(|e| AttrError::io_error(&self.input, e))?;
        let mut archive = ZipArchive::new(BufReader::new(file))
            .map_err(|e| AttrError::archive_error(&self.input, e))?;

        let mut entry = match archive.by_name(&self.entry) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(AttrError::archive_error(&self.input, e)),
        };

        // The declared size comes from the archive headers and is not trusted
        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| AttrError::io_error(&self.input, e))?;
        Ok(Some(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bt_test_utils::ClassFileBuilder;

    #[test]
    fn keeps_only_integer_constants() {
        let bytes = ClassFileBuilder::new("android/R$attr")
            .int_field("A", 1)
            .plain_field("noValue", "I")
            .long_field("wide", 9)
            .float_field("scale", 1.5)
            .string_field("label", "x")
            .int_field("B", 255)
            .build();

        let records = parse_attr_fields(&bytes).unwrap();
        assert_eq!(
            records,
            vec![AttributeRecord::new("A", 1), AttributeRecord::new("B", 255)]
        );
    }

    #[test]
    fn boolean_fields_count_as_integers() {
        // `static final boolean` compiles to a CONSTANT_Integer as well
        let bytes = ClassFileBuilder::new("android/R$attr")
            .typed_int_field("flag", "Z", 1)
            .build();
        assert_eq!(
            parse_attr_fields(&bytes).unwrap(),
            vec![AttributeRecord::new("flag", 1)]
        );
    }

    #[test]
    fn class_valued_constant_does_not_stop_extraction() {
        let bytes = ClassFileBuilder::new("android/R$attr")
            .int_field("A", 1)
            .class_valued_field("kind", "java/lang/String")
            .int_field("B", 2)
            .build();
        assert_eq!(
            parse_attr_fields(&bytes).unwrap(),
            vec![AttributeRecord::new("A", 1), AttributeRecord::new("B", 2)]
        );
    }

    #[test]
    fn class_without_fields_yields_nothing() {
        let bytes = ClassFileBuilder::new("android/R$attr").build();
        assert!(parse_attr_fields(&bytes).unwrap().is_empty());
    }

    #[test]
    fn custom_entry_is_used() {
        let extractor = AttrExtractor::new("in.jar", "out.txt").with_entry("com/x/R$attr.class");
        assert_eq!(extractor.entry(), "com/x/R$attr.class");
        assert_eq!(extractor.input(), Path::new("in.jar"));
        assert_eq!(extractor.output(), Path::new("out.txt"));
    }
}
