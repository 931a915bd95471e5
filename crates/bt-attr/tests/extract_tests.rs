use bt_attr::{AttrError, AttrExtractor, ATTR_CLASS_ENTRY};
use bt_test_utils::{crc32, write_archive, write_archive_with_declared_size, ClassFileBuilder};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn attr_class(fields: &[(&str, i32)]) -> Vec<u8> {
    fields
        .iter()
        .fold(ClassFileBuilder::new("android/R$attr"), |builder, (name, value)| {
            builder.int_field(name, *value)
        })
        .build()
}

#[test]
fn test_writes_records_in_declaration_order() {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("android.jar");
    let out = dir.path().join("R.txt");
    write_archive(&jar, &[(ATTR_CLASS_ENTRY, attr_class(&[("A", 1), ("B", 255)]))]);

    let report = AttrExtractor::new(&jar, &out).run().unwrap();

    assert!(report.entry_found);
    assert_eq!(report.records.len(), 2);
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "int attr A 0x00000001\nint attr B 0x000000ff\n"
    );
}

#[test]
fn test_missing_entry_writes_empty_file() {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("android.jar");
    let out = dir.path().join("R.txt");
    write_archive(
        &jar,
        &[("android/R$string.class", attr_class(&[("hello", 3)]))],
    );

    let report = AttrExtractor::new(&jar, &out).run().unwrap();

    assert!(!report.entry_found);
    assert!(report.records.is_empty());
    assert_eq!(fs::read_to_string(&out).unwrap(), "");
}

#[test]
fn test_existing_output_is_truncated() {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("android.jar");
    let out = dir.path().join("R.txt");
    fs::write(&out, "stale contents\nfrom a previous run\n").unwrap();
    write_archive(&jar, &[("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n".to_vec())]);

    AttrExtractor::new(&jar, &out).run().unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), "");
}

#[test]
fn test_negative_values_render_as_bit_pattern() {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("android.jar");
    let out = dir.path().join("R.txt");
    write_archive(&jar, &[(ATTR_CLASS_ENTRY, attr_class(&[("neg", -1)]))]);

    AttrExtractor::new(&jar, &out).run().unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), "int attr neg 0xffffffff\n");
}

#[test]
fn test_custom_entry_path() {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("lib.jar");
    let out = dir.path().join("R.txt");
    write_archive(&jar, &[("com/example/R$attr.class", attr_class(&[("custom", 16)]))]);

    let report = AttrExtractor::new(&jar, &out)
        .with_entry("com/example/R$attr.class")
        .run()
        .unwrap();

    assert!(report.entry_found);
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "int attr custom 0x00000010\n"
    );
}

#[test]
fn test_corrupt_archive_is_fatal() {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("android.jar");
    let out = dir.path().join("R.txt");
    fs::write(&jar, b"this is not a zip archive").unwrap();

    let result = AttrExtractor::new(&jar, &out).run();

    assert!(matches!(result, Err(AttrError::Archive { .. })));
    assert!(!out.exists());
}

#[test]
fn test_missing_archive_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = AttrExtractor::new(dir.path().join("absent.jar"), dir.path().join("R.txt")).run();
    assert!(matches!(result, Err(AttrError::Io { .. })));
}

#[test]
fn test_malformed_class_is_fatal() {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("android.jar");
    let out = dir.path().join("R.txt");
    write_archive(&jar, &[(ATTR_CLASS_ENTRY, vec![0xCA, 0xFE, 0xBA, 0xBE, 0, 0])]);

    let result = AttrExtractor::new(&jar, &out).run();

    match result {
        Err(AttrError::ClassFile { entry, .. }) => assert_eq!(entry, ATTR_CLASS_ENTRY),
        other => panic!("expected class file error, got {other:?}"),
    }
}

#[test]
fn test_unwritable_output_is_io_error() {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("android.jar");
    write_archive(&jar, &[(ATTR_CLASS_ENTRY, attr_class(&[("A", 1)]))]);

    let out = dir.path().join("missing-dir").join("R.txt");
    let result = AttrExtractor::new(&jar, &out).run();

    assert!(matches!(result, Err(AttrError::Io { path, .. }) if path == out));
}

#[test]
fn test_declared_entry_size_is_not_trusted() {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("android.jar");
    let out = dir.path().join("R.txt");
    let class = attr_class(&[("A", 1)]);
    write_archive_with_declared_size(&jar, ATTR_CLASS_ENTRY, &class, u64::MAX, crc32(&class));

    let report = AttrExtractor::new(&jar, &out).run().unwrap();

    assert!(report.entry_found);
    assert_eq!(fs::read_to_string(&out).unwrap(), "int attr A 0x00000001\n");
}

#[test]
fn test_corrupt_entry_with_huge_declared_size_is_an_error() {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("android.jar");
    let out = dir.path().join("R.txt");
    let class = attr_class(&[("A", 1)]);
    write_archive_with_declared_size(&jar, ATTR_CLASS_ENTRY, &class, u64::MAX, !crc32(&class));

    let result = AttrExtractor::new(&jar, &out).run();

    assert!(matches!(result, Err(AttrError::Io { .. })));
    assert!(!out.exists());
}
