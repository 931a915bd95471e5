//! Minimal JVM class-file reader
//!
//! Decodes the header, the constant pool and the field table. Methods and
//! class-level attributes are never needed for constant extraction, so the
//! reader stops after the last field.

use crate::error::ClassFileError;

/// Magic number every class file starts with
pub const CLASS_MAGIC: u32 = 0xCAFE_BABE;

const TAG_UTF8: u8 = 1;
const TAG_INTEGER: u8 = 3;
const TAG_FLOAT: u8 = 4;
const TAG_LONG: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_CLASS: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_FIELDREF: u8 = 9;
const TAG_METHODREF: u8 = 10;
const TAG_INTERFACE_METHODREF: u8 = 11;
const TAG_NAME_AND_TYPE: u8 = 12;
const TAG_METHOD_HANDLE: u8 = 15;
const TAG_METHOD_TYPE: u8 = 16;
const TAG_DYNAMIC: u8 = 17;
const TAG_INVOKE_DYNAMIC: u8 = 18;
const TAG_MODULE: u8 = 19;
const TAG_PACKAGE: u8 = 20;

const CONSTANT_VALUE_ATTRIBUTE: &str = "ConstantValue";

/// Constant pool entry
///
/// Only the kinds a field constant can resolve through are decoded; every
/// other valid tag is kept as [`Constant::Other`] with its payload skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name_index: u16 },
    String { string_index: u16 },
    Other { tag: u8 },
    /// Slot 0, and the slot after every Long or Double
    Unusable,
}

/// Indexed constant pool (index 0 is never valid)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    /// Number of slots, including the unusable slot 0
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the pool has no usable entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Entry at `index`
    ///
    /// # Errors
    /// Returns error if the index is 0, past the end, or names the second
    /// slot of a Long/Double
    pub fn get(&self, index: u16) -> Result<&Constant, ClassFileError> {
        match self.entries.get(usize::from(index)) {
            Some(Constant::Unusable) | None => Err(ClassFileError::InvalidConstantIndex { index }),
            Some(constant) => Ok(constant),
        }
    }

    /// Utf8 entry at `index`
    ///
    /// # Errors
    /// Returns error if the slot is invalid or not a Utf8 entry
    pub fn utf8(&self, index: u16) -> Result<&str, ClassFileError> {
        match self.get(index)? {
            Constant::Utf8(value) => Ok(value),
            _ => Err(ClassFileError::UnexpectedConstant {
                index,
                expected: "Utf8",
            }),
        }
    }

    /// Class entry at `index`, resolved to its internal name
    ///
    /// # Errors
    /// Returns error if the slot is invalid or not a Class entry
    pub fn class_name(&self, index: u16) -> Result<&str, ClassFileError> {
        match self.get(index)? {
            Constant::Class { name_index } => self.utf8(*name_index),
            _ => Err(ClassFileError::UnexpectedConstant {
                index,
                expected: "Class",
            }),
        }
    }
}

/// Value of a field's `ConstantValue` attribute
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    /// `CONSTANT_Integer` (int, short, char, byte and boolean fields)
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

/// Declared field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub constant_value: Option<ConstantValue>,
}

impl FieldInfo {
    /// Integer constant, if the field declares one
    #[inline]
    #[must_use]
    pub fn int_constant(&self) -> Option<i32> {
        match self.constant_value {
            Some(ConstantValue::Int(value)) => Some(value),
            _ => None,
        }
    }
}

/// Class header, constant pool and fields
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: u16,
    pub this_class: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<FieldInfo>,
}

impl ClassFile {
    /// Decode class bytes up to and including the field table
    ///
    /// # Errors
    /// Returns error on bad magic, truncation, unknown constant tags,
    /// dangling pool references or a `ConstantValue` of the wrong length
    pub fn parse(bytes: &[u8]) -> Result<Self, ClassFileError> {
        let mut reader = ByteReader::new(bytes);

        let magic = reader.u32()?;
        if magic != CLASS_MAGIC {
            return Err(ClassFileError::BadMagic { found: magic });
        }
        let minor_version = reader.u16()?;
        let major_version = reader.u16()?;
        let constant_pool = read_constant_pool(&mut reader)?;

        let access_flags = reader.u16()?;
        let this_class = constant_pool.class_name(reader.u16()?)?.to_owned();
        let super_class = match reader.u16()? {
            0 => None,
            index => Some(constant_pool.class_name(index)?.to_owned()),
        };

        let interface_count = reader.u16()?;
        let mut interfaces = Vec::with_capacity(usize::from(interface_count));
        for _ in 0..interface_count {
            interfaces.push(constant_pool.class_name(reader.u16()?)?.to_owned());
        }

        let field_count = reader.u16()?;
        let mut fields = Vec::with_capacity(usize::from(field_count));
        for _ in 0..field_count {
            fields.push(read_field(&mut reader, &constant_pool)?);
        }

        Ok(Self {
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
        })
    }
}

fn read_constant_pool(reader: &mut ByteReader<'_>) -> Result<ConstantPool, ClassFileError> {
    let count = reader.u16()?;
    let mut entries = Vec::with_capacity(usize::from(count));
    entries.push(Constant::Unusable);

    let mut index: u16 = 1;
    while index < count {
        let tag = reader.u8()?;
        let constant = match tag {
            TAG_UTF8 => {
                let length = reader.u16()?;
                let raw = reader.take(usize::from(length))?;
                Constant::Utf8(
                    decode_modified_utf8(raw).ok_or(ClassFileError::InvalidUtf8 { index })?,
                )
            }
            TAG_INTEGER => Constant::Integer(reader.i32()?),
            TAG_FLOAT => Constant::Float(f32::from_bits(reader.u32()?)),
            TAG_LONG => Constant::Long(reader.i64()?),
            TAG_DOUBLE => Constant::Double(f64::from_bits(reader.u64()?)),
            TAG_CLASS => Constant::Class {
                name_index: reader.u16()?,
            },
            TAG_STRING => Constant::String {
                string_index: reader.u16()?,
            },
            TAG_FIELDREF | TAG_METHODREF | TAG_INTERFACE_METHODREF | TAG_NAME_AND_TYPE
            | TAG_DYNAMIC | TAG_INVOKE_DYNAMIC => {
                reader.skip(4)?;
                Constant::Other { tag }
            }
            TAG_METHOD_HANDLE => {
                reader.skip(3)?;
                Constant::Other { tag }
            }
            TAG_METHOD_TYPE | TAG_MODULE | TAG_PACKAGE => {
                reader.skip(2)?;
                Constant::Other { tag }
            }
            _ => return Err(ClassFileError::UnknownConstantTag { tag, index }),
        };

        let wide = matches!(constant, Constant::Long(_) | Constant::Double(_));
        entries.push(constant);
        index += 1;
        if wide {
            entries.push(Constant::Unusable);
            index = index.saturating_add(1);
        }
    }

    Ok(ConstantPool { entries })
}

fn read_field(
    reader: &mut ByteReader<'_>,
    pool: &ConstantPool,
) -> Result<FieldInfo, ClassFileError> {
    let access_flags = reader.u16()?;
    let name = pool.utf8(reader.u16()?)?.to_owned();
    let descriptor = pool.utf8(reader.u16()?)?.to_owned();

    let mut constant_value = None;
    let attribute_count = reader.u16()?;
    for _ in 0..attribute_count {
        let attribute_name = pool.utf8(reader.u16()?)?;
        let length = reader.u32()?;
        if attribute_name != CONSTANT_VALUE_ATTRIBUTE {
            reader.skip(usize::try_from(length).unwrap_or(usize::MAX))?;
            continue;
        }
        if length != 2 {
            return Err(ClassFileError::InvalidAttributeLength {
                name: CONSTANT_VALUE_ATTRIBUTE,
                length,
            });
        }
        let index = reader.u16()?;
        constant_value = Some(match pool.get(index)? {
            Constant::Integer(value) => ConstantValue::Int(*value),
            Constant::Long(value) => ConstantValue::Long(*value),
            Constant::Float(value) => ConstantValue::Float(*value),
            Constant::Double(value) => ConstantValue::Double(*value),
            Constant::String { string_index } => {
                ConstantValue::String(pool.utf8(*string_index)?.to_owned())
            }
            _ => {
                tracing::debug!(field = %name, index, "constant value is not a literal, skipping");
                continue;
            }
        });
    }

    Ok(FieldInfo {
        access_flags,
        name,
        descriptor,
        constant_value,
    })
}

/// Decode the JVM's modified UTF-8 (`\0` as `C0 80`, supplementary
/// characters as surrogate pairs)
fn decode_modified_utf8(raw: &[u8]) -> Option<String> {
    if let Ok(text) = std::str::from_utf8(raw) {
        if !raw.contains(&0) {
            return Some(text.to_owned());
        }
    }

    let mut units: Vec<u16> = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let b0 = raw[i];
        if b0 & 0x80 == 0 && b0 != 0 {
            units.push(u16::from(b0));
            i += 1;
        } else if b0 & 0xE0 == 0xC0 {
            let b1 = continuation(raw.get(i + 1))?;
            units.push((u16::from(b0 & 0x1F) << 6) | b1);
            i += 2;
        } else if b0 & 0xF0 == 0xE0 {
            let b1 = continuation(raw.get(i + 1))?;
            let b2 = continuation(raw.get(i + 2))?;
            units.push((u16::from(b0 & 0x0F) << 12) | (b1 << 6) | b2);
            i += 3;
        } else {
            return None;
        }
    }
    String::from_utf16(&units).ok()
}

fn continuation(byte: Option<&u8>) -> Option<u16> {
    match byte {
        Some(b) if b & 0xC0 == 0x80 => Some(u16::from(b & 0x3F)),
        _ => None,
    }
}

/// Big-endian cursor over a byte slice
struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], ClassFileError> {
        let end = self
            .offset
            .checked_add(needed)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(ClassFileError::Truncated {
                offset: self.offset,
                needed,
            })?;
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], ClassFileError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn skip(&mut self, count: usize) -> Result<(), ClassFileError> {
        self.take(count).map(|_| ())
    }

    fn u8(&mut self) -> Result<u8, ClassFileError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, ClassFileError> {
        self.array().map(u16::from_be_bytes)
    }

    fn u32(&mut self) -> Result<u32, ClassFileError> {
        self.array().map(u32::from_be_bytes)
    }

    fn i32(&mut self) -> Result<i32, ClassFileError> {
        self.array().map(i32::from_be_bytes)
    }

    fn u64(&mut self) -> Result<u64, ClassFileError> {
        self.array().map(u64::from_be_bytes)
    }

    fn i64(&mut self) -> Result<i64, ClassFileError> {
        self.array().map(i64::from_be_bytes)
    }
}
