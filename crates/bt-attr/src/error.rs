//! Error types for attribute extraction
//!
//! Two layers:
//! - [`ClassFileError`]: structural problems in the class bytes
//! - [`AttrError`]: archive/file I/O around the extraction

use std::path::PathBuf;

/// Errors while decoding a class file
#[derive(Debug, thiserror::Error)]
pub enum ClassFileError {
    /// File does not start with `0xCAFEBABE`
    #[error("bad class magic: 0x{found:08x}")]
    BadMagic { found: u32 },

    /// Ran past the end of the input
    #[error("truncated class file: needed {needed} bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    /// Constant pool tag outside the JVM specification
    #[error("unknown constant pool tag {tag} at index {index}")]
    UnknownConstantTag { tag: u8, index: u16 },

    /// Reference to a constant pool slot that does not exist
    #[error("constant pool index {index} out of range")]
    InvalidConstantIndex { index: u16 },

    /// Constant pool slot holds the wrong kind of entry
    #[error("constant pool index {index}: expected {expected}")]
    UnexpectedConstant { index: u16, expected: &'static str },

    /// Utf8 entry is not valid modified UTF-8
    #[error("malformed modified UTF-8 in constant pool index {index}")]
    InvalidUtf8 { index: u16 },

    /// Fixed-size attribute with the wrong length
    #[error("attribute {name} has length {length}")]
    InvalidAttributeLength { name: &'static str, length: u32 },
}

/// Errors during attribute extraction
#[derive(Debug, thiserror::Error)]
pub enum AttrError {
    /// Filesystem failure on the input archive or output report
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Archive could not be opened or an entry could not be read
    #[error("invalid archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// Designated entry exists but is not a well-formed class
    #[error("malformed class {entry}: {source}")]
    ClassFile {
        entry: String,
        #[source]
        source: ClassFileError,
    },
}

impl AttrError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create archive error for path
    pub fn archive_error(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Archive {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for extraction operations
pub type AttrResult<T> = Result<T, AttrError>;
