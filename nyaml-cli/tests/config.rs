use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const NXDL: &str = r#"<definition category="base" name="NXtest" extends="NXobject" type="group">
    <doc>A test definition.</doc>
    <group type="NXentry">
        <field name="value"/>
    </group>
</definition>
"#;

#[test]
fn indent_comes_from_explicit_config() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("NXtest.nxdl.xml");
    fs::write(&input, NXDL).unwrap();
    let config_path = dir.path().join("custom.toml");
    fs::write(&config_path, "[output]\nnyaml_indent = 4\nstore_nxdl = false\n").unwrap();

    cargo_bin_cmd!("nyaml")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .arg("--config")
        .arg(config_path.as_os_str())
        .assert()
        .success();

    let yaml = fs::read_to_string(dir.path().join("NXtest_parsed.yaml")).unwrap();
    assert!(yaml.contains("\n    (NXentry):\n        value:\n"));
    assert!(!yaml.contains("SHA HASH"));
}

#[test]
fn working_directory_config_is_picked_up() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("NXtest.nxdl.xml");
    fs::write(&input, NXDL).unwrap();
    fs::write(dir.path().join("nyaml.toml"), "[output]\nstore_nxdl = false\n").unwrap();

    cargo_bin_cmd!("nyaml")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .assert()
        .success();

    let yaml = fs::read_to_string(dir.path().join("NXtest_parsed.yaml")).unwrap();
    assert!(!yaml.contains("SHA HASH"));
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("NXtest.nxdl.xml");
    fs::write(&input, NXDL).unwrap();

    cargo_bin_cmd!("nyaml")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .arg("--config")
        .arg("absent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
