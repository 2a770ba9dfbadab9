use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const NYAML: &str = "category: base
doc: A test definition.
type: group
NXtest(NXobject):
  # the value
  value(NX_CHAR):
    exists: required
";

const NXDL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<definition category="base" name="NXtest" extends="NXobject" type="group">
    <doc>A test definition.</doc>
    <field name="value" type="NX_CHAR" optional="false"/>
</definition>
"#;

#[test]
fn converts_nyaml_next_to_the_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("NXtest.yaml");
    fs::write(&input, NYAML).unwrap();

    cargo_bin_cmd!("nyaml")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .assert()
        .success();

    let nxdl = fs::read_to_string(dir.path().join("NXtest.nxdl.xml")).unwrap();
    assert!(nxdl.contains("<field name=\"value\" type=\"NX_CHAR\" optional=\"false\"/>"));
    assert!(nxdl.contains("<!-- the value -->"));
}

#[test]
fn converts_nxdl_with_embedded_source() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("NXtest.nxdl.xml");
    fs::write(&input, NXDL).unwrap();

    cargo_bin_cmd!("nyaml")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .assert()
        .success();

    let yaml = fs::read_to_string(dir.path().join("NXtest_parsed.yaml")).unwrap();
    assert!(yaml.contains("value(NX_CHAR):\n    exists: required\n"));
    assert!(yaml.contains("SHA HASH"));
}

#[test]
fn do_not_store_nxdl_drops_the_hash_block() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("NXtest.nxdl.xml");
    fs::write(&input, NXDL).unwrap();

    cargo_bin_cmd!("nyaml")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .arg("--do-not-store-nxdl")
        .assert()
        .success();

    let yaml = fs::read_to_string(dir.path().join("NXtest_parsed.yaml")).unwrap();
    assert!(!yaml.contains("SHA HASH"));
}

#[test]
fn output_file_overrides_the_default_name() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("NXtest.yaml");
    let output = dir.path().join("out.xml");
    fs::write(&input, NYAML).unwrap();

    cargo_bin_cmd!("nyaml")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .arg("--output-file")
        .arg(output.as_os_str())
        .assert()
        .success();

    assert!(output.exists());
    assert!(!dir.path().join("NXtest.nxdl.xml").exists());
}

#[test]
fn existing_copyright_notice_is_kept() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("NXtest.yaml");
    fs::write(&input, NYAML).unwrap();
    let existing = "<?xml version='1.0' encoding='UTF-8'?>\n<!--\n# NeXus - Neutron and X-ray Common Data Format\n#\n# Copyright (C) 2008-2022 NeXus International Advisory Committee (NIAC)\n-->\n<definition name=\"NXtest\"/>\n";
    fs::write(dir.path().join("NXtest.nxdl.xml"), existing).unwrap();

    cargo_bin_cmd!("nyaml")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .assert()
        .success();

    let nxdl = fs::read_to_string(dir.path().join("NXtest.nxdl.xml")).unwrap();
    assert!(nxdl.contains("Copyright (C) 2008-2022"));
    assert!(nxdl.contains("<field name=\"value\""));
}

#[test]
fn check_consistency_writes_the_round_trip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("NXtest.yaml");
    fs::write(&input, NYAML).unwrap();

    cargo_bin_cmd!("nyaml")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .arg("--check-consistency")
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning").not());

    assert!(dir.path().join("NXtest.nxdl.xml").exists());
    let round_trip = fs::read_to_string(dir.path().join("NXtest_consistency.yaml")).unwrap();
    assert!(round_trip.contains("  # the value\n  value(NX_CHAR):\n"));
}

#[test]
fn check_consistency_for_nxdl_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("NXtest.nxdl.xml");
    fs::write(&input, NXDL).unwrap();

    cargo_bin_cmd!("nyaml")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .arg("--check-consistency")
        .assert()
        .success();

    let round_trip =
        fs::read_to_string(dir.path().join("NXtest_consistency.nxdl.xml")).unwrap();
    assert!(round_trip.contains("optional=\"false\""));
}

#[test]
fn unknown_extension_is_an_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("NXtest.json");
    fs::write(&input, "{}").unwrap();

    cargo_bin_cmd!("nyaml")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: Could not detect format"));
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("nyaml")
        .current_dir(dir.path())
        .arg("NXmissing.yaml")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error reading file"));
}

#[test]
fn conversion_errors_write_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("NXtest.yaml");
    fs::write(&input, "category: base\ndoc: x\nNXtest:\n  value:\n    colour: red\n").unwrap();

    cargo_bin_cmd!("nyaml")
        .current_dir(dir.path())
        .arg(input.as_os_str())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error: ").and(predicate::str::contains("colour")));

    assert!(!dir.path().join("NXtest.nxdl.xml").exists());
}
