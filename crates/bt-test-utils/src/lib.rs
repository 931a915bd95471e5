//! Testing utilities for BT workspace
//!
//! Shared test helpers, fixtures, and assertions.

#![allow(missing_docs)]

use bt_artifact::{
    ArtifactCollection, ArtifactResult, ComponentIdentifier, ResolutionFailure, ResolvedArtifact,
    ResolvedArtifactSet, VARIANT_ATTRIBUTE,
};
use indexmap::IndexSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

// ============================================================================
// Class files
// ============================================================================

const ACC_PUBLIC_SUPER: u16 = 0x0021;
const ACC_PUBLIC_STATIC_FINAL: u16 = 0x0019;

#[derive(Debug, Clone)]
enum PoolValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Class(String),
}

#[derive(Debug, Clone)]
struct FieldSpec {
    name: String,
    descriptor: String,
    value: Option<PoolValue>,
    extra_attribute: Option<(String, Vec<u8>)>,
}

/// Assembles minimal class files (version 52, no methods) holding constant fields
#[derive(Debug, Clone)]
pub struct ClassFileBuilder {
    class_name: String,
    raw_constants: Vec<(u8, Vec<u8>)>,
    fields: Vec<FieldSpec>,
}

impl ClassFileBuilder {
    pub fn new(class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            raw_constants: Vec::new(),
            fields: Vec::new(),
        }
    }

    fn field(mut self, name: &str, descriptor: &str, value: Option<PoolValue>) -> Self {
        self.fields.push(FieldSpec {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            value,
            extra_attribute: None,
        });
        self
    }

    pub fn int_field(self, name: &str, value: i32) -> Self {
        self.field(name, "I", Some(PoolValue::Int(value)))
    }

    /// Integer constant with another descriptor (`Z`, `B`, `C`, `S`)
    pub fn typed_int_field(self, name: &str, descriptor: &str, value: i32) -> Self {
        self.field(name, descriptor, Some(PoolValue::Int(value)))
    }

    pub fn long_field(self, name: &str, value: i64) -> Self {
        self.field(name, "J", Some(PoolValue::Long(value)))
    }

    pub fn float_field(self, name: &str, value: f32) -> Self {
        self.field(name, "F", Some(PoolValue::Float(value)))
    }

    pub fn double_field(self, name: &str, value: f64) -> Self {
        self.field(name, "D", Some(PoolValue::Double(value)))
    }

    pub fn string_field(self, name: &str, value: &str) -> Self {
        self.field(
            name,
            "Ljava/lang/String;",
            Some(PoolValue::String(value.to_string())),
        )
    }

    /// Field whose `ConstantValue` points at a Class constant
    pub fn class_valued_field(self, name: &str, class_name: &str) -> Self {
        self.field(
            name,
            "Ljava/lang/Class;",
            Some(PoolValue::Class(class_name.to_string())),
        )
    }

    /// Extra pool entry written verbatim (`tag` then `payload`)
    pub fn raw_constant(mut self, tag: u8, payload: &[u8]) -> Self {
        self.raw_constants.push((tag, payload.to_vec()));
        self
    }

    /// Field without a `ConstantValue` attribute
    pub fn plain_field(self, name: &str, descriptor: &str) -> Self {
        self.field(name, descriptor, None)
    }

    /// Int field whose `ConstantValue` follows an arbitrary other attribute
    pub fn field_with_extra_attribute(
        mut self,
        name: &str,
        value: i32,
        attribute_name: &str,
        payload: &[u8],
    ) -> Self {
        self = self.int_field(name, value);
        if let Some(field) = self.fields.last_mut() {
            field.extra_attribute = Some((attribute_name.to_string(), payload.to_vec()));
        }
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = PoolWriter::default();
        for (tag, payload) in &self.raw_constants {
            pool.push(*tag, payload, 1);
        }
        let this_class = pool.class(&self.class_name);
        let super_class = pool.class("java/lang/Object");
        let constant_value = pool.utf8("ConstantValue");

        let mut fields = Vec::new();
        for field in &self.fields {
            put_u16(&mut fields, ACC_PUBLIC_STATIC_FINAL);
            put_u16(&mut fields, pool.utf8(&field.name));
            put_u16(&mut fields, pool.utf8(&field.descriptor));

            let count = u16::from(field.value.is_some()) + u16::from(field.extra_attribute.is_some());
            put_u16(&mut fields, count);

            if let Some((name, payload)) = &field.extra_attribute {
                put_u16(&mut fields, pool.utf8(name));
                put_u32(&mut fields, u32::try_from(payload.len()).unwrap());
                fields.extend_from_slice(payload);
            }
            if let Some(value) = &field.value {
                let index = pool.value(value);
                put_u16(&mut fields, constant_value);
                put_u32(&mut fields, 2);
                put_u16(&mut fields, index);
            }
        }

        let mut out = Vec::new();
        put_u32(&mut out, 0xCAFE_BABE);
        put_u16(&mut out, 0);
        put_u16(&mut out, 52);
        put_u16(&mut out, pool.next);
        out.extend_from_slice(&pool.bytes);
        put_u16(&mut out, ACC_PUBLIC_SUPER);
        put_u16(&mut out, this_class);
        put_u16(&mut out, super_class);
        put_u16(&mut out, 0); // interfaces
        put_u16(&mut out, u16::try_from(self.fields.len()).unwrap());
        out.extend_from_slice(&fields);
        put_u16(&mut out, 0); // methods
        put_u16(&mut out, 0); // attributes
        out
    }
}

struct PoolWriter {
    bytes: Vec<u8>,
    next: u16,
}

impl Default for PoolWriter {
    fn default() -> Self {
        Self {
            bytes: Vec::new(),
            next: 1,
        }
    }
}

impl PoolWriter {
    fn push(&mut self, tag: u8, body: &[u8], slots: u16) -> u16 {
        let index = self.next;
        self.bytes.push(tag);
        self.bytes.extend_from_slice(body);
        self.next += slots;
        index
    }

    fn utf8(&mut self, text: &str) -> u16 {
        let mut body = Vec::new();
        put_u16(&mut body, u16::try_from(text.len()).unwrap());
        body.extend_from_slice(text.as_bytes());
        self.push(1, &body, 1)
    }

    fn class(&mut self, name: &str) -> u16 {
        let name = self.utf8(name);
        self.push(7, &name.to_be_bytes(), 1)
    }

    fn value(&mut self, value: &PoolValue) -> u16 {
        match value {
            PoolValue::Int(v) => self.push(3, &v.to_be_bytes(), 1),
            PoolValue::Float(v) => self.push(4, &v.to_bits().to_be_bytes(), 1),
            PoolValue::Long(v) => self.push(5, &v.to_be_bytes(), 2),
            PoolValue::Double(v) => self.push(6, &v.to_bits().to_be_bytes(), 2),
            PoolValue::String(text) => {
                let text = self.utf8(text);
                self.push(8, &text.to_be_bytes(), 1)
            }
            PoolValue::Class(name) => self.class(name),
        }
    }
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

// ============================================================================
// Archives
// ============================================================================

/// Write a zip archive holding `entries` (name, contents)
pub fn write_archive(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (name, contents) in entries {
        zip.start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(contents).unwrap();
    }
    zip.finish().unwrap();
}

/// IEEE CRC-32 as stored in zip headers
pub fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &byte in bytes {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

/// Write a single stored entry whose central directory claims
/// `declared_size` uncompressed bytes through a ZIP64 extra field
///
/// The local header and the data are intact; only the declared size lies.
pub fn write_archive_with_declared_size(
    path: &Path,
    name: &str,
    contents: &[u8],
    declared_size: u64,
    crc: u32,
) {
    let name_len = u16::try_from(name.len()).unwrap();
    let size = u32::try_from(contents.len()).unwrap();
    let mut out = Vec::new();

    // local file header
    put_u32_le(&mut out, 0x0403_4b50);
    put_u16_le(&mut out, 45);
    put_u16_le(&mut out, 0); // flags
    put_u16_le(&mut out, 0); // stored
    put_u16_le(&mut out, 0); // time
    put_u16_le(&mut out, 0x21); // 1980-01-01
    put_u32_le(&mut out, crc);
    put_u32_le(&mut out, size);
    put_u32_le(&mut out, size);
    put_u16_le(&mut out, name_len);
    put_u16_le(&mut out, 0);
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(contents);

    // central directory
    let cd_start = u32::try_from(out.len()).unwrap();
    put_u32_le(&mut out, 0x0201_4b50);
    put_u16_le(&mut out, 45); // made by
    put_u16_le(&mut out, 45); // needed
    put_u16_le(&mut out, 0);
    put_u16_le(&mut out, 0);
    put_u16_le(&mut out, 0);
    put_u16_le(&mut out, 0x21);
    put_u32_le(&mut out, crc);
    put_u32_le(&mut out, size);
    put_u32_le(&mut out, 0xFFFF_FFFF); // size lives in the ZIP64 extra
    put_u16_le(&mut out, name_len);
    put_u16_le(&mut out, 12); // extra length
    put_u16_le(&mut out, 0); // comment
    put_u16_le(&mut out, 0); // disk
    put_u16_le(&mut out, 0); // internal attributes
    put_u32_le(&mut out, 0); // external attributes
    put_u32_le(&mut out, 0); // local header offset
    out.extend_from_slice(name.as_bytes());
    put_u16_le(&mut out, 0x0001);
    put_u16_le(&mut out, 8);
    out.extend_from_slice(&declared_size.to_le_bytes());
    let cd_size = u32::try_from(out.len()).unwrap() - cd_start;

    // end of central directory
    put_u32_le(&mut out, 0x0605_4b50);
    put_u16_le(&mut out, 0);
    put_u16_le(&mut out, 0);
    put_u16_le(&mut out, 1);
    put_u16_le(&mut out, 1);
    put_u32_le(&mut out, cd_size);
    put_u32_le(&mut out, cd_start);
    put_u16_le(&mut out, 0);

    std::fs::write(path, out).unwrap();
}

fn put_u16_le(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_u32_le(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

// ============================================================================
// Artifacts
// ============================================================================

pub fn project_artifact(path: &str, variant: Option<&str>) -> ResolvedArtifact {
    let artifact = ResolvedArtifact::new(
        ComponentIdentifier::project(path),
        format!("{}.jar", path.trim_start_matches(':').replace(':', "-")),
    );
    match variant {
        Some(name) => artifact.with_attribute(VARIANT_ATTRIBUTE, name),
        None => artifact,
    }
}

pub fn module_artifact(group: &str, module: &str, version: &str) -> ResolvedArtifact {
    ResolvedArtifact::new(
        ComponentIdentifier::module(group, module, version),
        format!("{module}-{version}.jar"),
    )
}

pub fn other_artifact(display_name: &str) -> ResolvedArtifact {
    ResolvedArtifact::new(ComponentIdentifier::other(display_name), display_name)
}

/// Collection that counts how often it is materialized
#[derive(Debug, Default)]
pub struct CountingCollection {
    inner: ResolvedArtifactSet,
    delay: Option<Duration>,
    artifact_calls: AtomicUsize,
    file_calls: AtomicUsize,
}

impl CountingCollection {
    pub fn new(inner: ResolvedArtifactSet) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Sleep inside every materialization, widening race windows
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn artifact_calls(&self) -> usize {
        self.artifact_calls.load(Ordering::SeqCst)
    }

    pub fn file_calls(&self) -> usize {
        self.file_calls.load(Ordering::SeqCst)
    }

    fn pause(&self) {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
    }
}

impl ArtifactCollection for CountingCollection {
    fn artifacts(&self) -> ArtifactResult<IndexSet<ResolvedArtifact>> {
        self.artifact_calls.fetch_add(1, Ordering::SeqCst);
        self.pause();
        self.inner.artifacts()
    }

    fn artifact_files(&self) -> ArtifactResult<Vec<PathBuf>> {
        self.file_calls.fetch_add(1, Ordering::SeqCst);
        self.pause();
        self.inner.artifact_files()
    }

    fn failures(&self) -> Vec<ResolutionFailure> {
        self.inner.failures()
    }
}
