//! Attribute records and the R.txt line format
//!
//! Every record renders as `int attr <name> 0x<8 lowercase hex digits>`.
//! Negative values render as their two's complement bit pattern.

use std::fmt::{self, Display, Formatter};

/// A named integer constant discovered in the attribute class
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeRecord {
    pub name: String,
    pub value: i32,
}

impl AttributeRecord {
    /// Create new record
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl Display for AttributeRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "int attr {} 0x{:08x}", self.name, self.value)
    }
}

/// Render records in discovery order, one newline-terminated line each
#[must_use]
pub fn render_records(records: &[AttributeRecord]) -> String {
    records.iter().map(|record| format!("{record}\n")).collect()
}
