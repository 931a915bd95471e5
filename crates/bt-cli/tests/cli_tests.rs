use bt_attr::ATTR_CLASS_ENTRY;
use bt_cli::cli::{build_cli, run};
use bt_test_utils::{write_archive, ClassFileBuilder};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const BASE_MANIFEST: &str = r#"
[[artifact]]
file = "cache/m-2.0.jar"
component = { kind = "module", group = "g", module = "m", version = "2.0" }

[[artifact]]
file = "base/lib.aar"
component = { kind = "project", path = ":lib" }
attributes = { variant = "debug" }
"#;

const FEATURE_MANIFEST: &str = r#"
[[artifact]]
file = "feature/p1.jar"
component = { kind = "project", path = ":p1" }

[[artifact]]
file = "cache/m-1.0.jar"
component = { kind = "module", group = "g", module = "m", version = "1.0" }

[[artifact]]
file = "base/lib.aar"
component = { kind = "project", path = ":lib" }
attributes = { variant = "debug" }

[[failure]]
component = "g:absent:1"
message = "not found"
"#;

fn bt(args: &[&str]) -> anyhow::Result<String> {
    let argv = std::iter::once("bt").chain(args.iter().copied());
    let matches = build_cli().try_get_matches_from(argv)?;
    run(&matches)
}

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_extract_attrs_writes_report() {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("android.jar");
    let out = dir.path().join("R.txt");
    let class = ClassFileBuilder::new("android/R$attr")
        .int_field("A", 1)
        .int_field("B", 255)
        .build();
    write_archive(&jar, &[(ATTR_CLASS_ENTRY, class)]);
    let config = write(dir.path(), "bt.toml", "");

    let stdout = bt(&[
        "--config",
        arg(&config),
        "extract-attrs",
        "--input",
        arg(&jar),
        "--output",
        arg(&out),
    ])
    .unwrap();

    assert_eq!(stdout, "");
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "int attr A 0x00000001\nint attr B 0x000000ff\n"
    );
}

#[test]
fn test_extract_attrs_honors_configured_entry() {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("platform.jar");
    let out = dir.path().join("R.txt");
    let class = ClassFileBuilder::new("com/x/R$attr").int_field("c", 16).build();
    write_archive(&jar, &[("com/x/R$attr.class", class)]);
    let config = write(dir.path(), "bt.toml", "[attr]\nentry = \"com/x/R$attr.class\"\n");

    bt(&[
        "--config",
        arg(&config),
        "extract-attrs",
        "--input",
        arg(&jar),
        "--output",
        arg(&out),
    ])
    .unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), "int attr c 0x00000010\n");
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    let err = bt(&[
        "--config",
        arg(&dir.path().join("absent.toml")),
        "extract-attrs",
        "--input",
        "a.jar",
        "--output",
        "R.txt",
    ])
    .unwrap_err();

    assert!(format!("{err:#}").contains("config file not found"));
}

#[test]
fn test_deps_written_then_filtered() {
    let dir = TempDir::new().unwrap();
    let config = write(dir.path(), "bt.toml", "");
    let base = write(dir.path(), "base.toml", BASE_MANIFEST);
    let feature = write(dir.path(), "feature.toml", FEATURE_MANIFEST);
    let deps = dir.path().join("out").join("base-deps.txt");

    bt(&[
        "--config",
        arg(&config),
        "write-transitive-deps",
        "--manifest",
        arg(&base),
        "--output",
        arg(&deps),
    ])
    .unwrap();
    assert_eq!(fs::read_to_string(&deps).unwrap(), ":lib::debug\ng:m");

    let stdout = bt(&[
        "--config",
        arg(&config),
        "filter",
        "--manifest",
        arg(&feature),
        "--exclude",
        arg(&deps),
    ])
    .unwrap();
    assert_eq!(stdout, "feature/p1.jar\n");
}

#[test]
fn test_filter_json_report() {
    let dir = TempDir::new().unwrap();
    let config = write(dir.path(), "bt.toml", "");
    let feature = write(dir.path(), "feature.toml", FEATURE_MANIFEST);
    let deps = write(dir.path(), "deps.txt", "g:m\n");

    let stdout = bt(&[
        "--config",
        arg(&config),
        "filter",
        "--manifest",
        arg(&feature),
        "--exclude",
        arg(&deps),
        "--json",
    ])
    .unwrap();

    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        report["retained"],
        serde_json::json!([
            { "identity": ":p1", "file": "feature/p1.jar" },
            { "identity": ":lib::debug", "file": "base/lib.aar" },
        ])
    );
    assert_eq!(report["failures"][0]["component"], "g:absent:1");
}

#[test]
fn test_filter_without_lists_prints_everything() {
    let dir = TempDir::new().unwrap();
    let config = write(dir.path(), "bt.toml", "");
    let feature = write(dir.path(), "feature.toml", FEATURE_MANIFEST);

    let stdout = bt(&["--config", arg(&config), "filter", "--manifest", arg(&feature)]).unwrap();

    assert_eq!(stdout, "feature/p1.jar\ncache/m-1.0.jar\nbase/lib.aar\n");
}
