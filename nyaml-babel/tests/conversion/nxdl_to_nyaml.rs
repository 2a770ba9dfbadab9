//! NXDL → nyaml conversion tests

use crate::common::{fixture, options};
use insta::assert_snapshot;
use nyaml_babel::transforms::nxdl_to_nyaml;
use nyaml_babel::{ConversionError, FormatRegistry};

#[test]
fn test_tiny_definition_snapshot() {
    let yaml = nxdl_to_nyaml(&fixture("NXtiny.nxdl.xml"), &options()).unwrap();
    assert_snapshot!(yaml, @r"
category: base
doc: |
  A tiny base class.
# Tiny definition
type: group
NXtiny(NXobject):
  # the only field
  value(NX_NUMBER):
    unit: NX_ANY
    exists: [min, 0]
    doc: |
      A value.
");
}

#[test]
fn test_registry_detects_both_formats() {
    let registry = FormatRegistry::with_options(&options());
    assert_eq!(
        registry.detect_format_from_filename("NXtiny.nxdl.xml").as_deref(),
        Some("nxdl")
    );
    let yaml = registry
        .convert(&fixture("NXtiny.nxdl.xml"), "nxdl", "nyaml")
        .unwrap();
    assert!(yaml.starts_with("category: base\n"));
    assert!(yaml.contains("# Tiny definition\ntype: group\nNXtiny(NXobject):\n"));
}

#[test]
fn test_unwanted_attribute_is_reported() {
    let source = "<definition category=\"base\" name=\"NXbad\"><doc>x</doc><field name=\"a\" colour=\"red\"/></definition>";
    let err = nxdl_to_nyaml(source, &options()).unwrap_err();
    match err {
        ConversionError::UnwantedAttribute { node, attr, .. } => {
            assert_eq!(node, "field");
            assert_eq!(attr, "colour");
        }
        other => panic!("Expected UnwantedAttribute, got {other:?}"),
    }
}

#[test]
fn test_occurrence_conflict_is_reported() {
    let source = "<definition category=\"base\" name=\"NXbad\"><doc>x</doc><field name=\"a\" minOccurs=\"0\" optional=\"true\"/></definition>";
    let err = nxdl_to_nyaml(source, &options()).unwrap_err();
    assert!(matches!(err, ConversionError::OccurrenceConflict { .. }), "{err:?}");
}
