//! nyaml → NXDL conversion tests
//!
//! These tests build the element tree from the fixtures and check the
//! elements, attributes and comments that land in it.

use crate::common::{fixture, notice_options, options};
use insta::assert_snapshot;
use nyaml_babel::format::Format;
use nyaml_babel::formats::NyamlFormat;
use nyaml_babel::ir::{XmlElement, XmlNode};
use nyaml_babel::transforms::nyaml_to_nxdl;
use nyaml_babel::{ConversionError, FormatRegistry, NxdlDocument};

fn build(source: &str) -> NxdlDocument {
    NyamlFormat::default()
        .parse(source)
        .expect("Should build nyaml")
}

/// Child element `tag` whose name (or type) is `id`
fn find<'a>(parent: &'a XmlElement, tag: &str, id: &str) -> &'a XmlElement {
    parent
        .elements()
        .find(|e| e.name == tag && (e.get("name") == Some(id) || e.get("type") == Some(id)))
        .unwrap_or_else(|| panic!("no <{tag}> '{id}' in <{}>", parent.name))
}

fn comments(element: &XmlElement) -> Vec<String> {
    element
        .children
        .iter()
        .filter_map(|node| match node {
            XmlNode::Comment(lines) => Some(lines.join("\n")),
            XmlNode::Element(_) => None,
        })
        .collect()
}

#[test]
fn test_fixture_root() {
    let doc = build(&fixture("NXtest.yaml"));
    let root = &doc.root;

    assert_eq!(root.name, "definition");
    assert_eq!(root.get("category"), Some("application"));
    assert_eq!(root.get("type"), Some("group"));
    assert_eq!(root.get("name"), Some("NXtest"));
    assert_eq!(root.get("extends"), Some("NXobject"));

    let order: Vec<&str> = root.elements().map(|e| e.name.as_str()).collect();
    assert_eq!(order, vec!["symbols", "doc", "group"]);

    let symbols = root.child("symbols").unwrap();
    let symbol = symbols.child("symbol").unwrap();
    assert_eq!(symbol.get("name"), Some("n_points"));

    assert_eq!(
        doc.preamble,
        vec![XmlNode::Comment(vec![
            "Definition used by the integration tests.".to_string()
        ])]
    );
}

#[test]
fn test_fixture_entry_members() {
    let doc = build(&fixture("NXtest.yaml"));
    let entry = find(&doc.root, "group", "NXentry");

    assert_eq!(entry.get("minOccurs"), Some("1"));
    assert_eq!(entry.get("maxOccurs"), Some("unbounded"));

    let definition = find(entry, "field", "definition");
    let item = definition.child("enumeration").unwrap().child("item").unwrap();
    assert_eq!(item.get("value"), Some("NXtest"));

    let title = find(entry, "field", "title");
    assert_eq!(title.get("recommended"), Some("true"));
    assert!(title.children.is_empty());

    let data = find(entry, "field", "data");
    assert_eq!(data.get("type"), Some("NX_FLOAT"));
    assert_eq!(data.get("units"), Some("NX_ANY"));
    let dimensions = data.child("dimensions").unwrap();
    assert_eq!(dimensions.get("rank"), Some("1"));
    let dim = dimensions.child("dim").unwrap();
    assert_eq!(dim.get("index"), Some("1"));
    assert_eq!(dim.get("value"), Some("n_points"));
    let signal = find(data, "attribute", "signal");
    assert!(signal.child("enumeration").is_some());

    let mode = find(entry, "field", "mode");
    let items: Vec<&str> = mode
        .child("enumeration")
        .unwrap()
        .elements()
        .filter_map(|item| item.get("value"))
        .collect();
    assert_eq!(items, vec!["fast", "slow"]);

    let link = find(entry, "link", "data");
    assert_eq!(link.get("target"), Some("/entry/data"));
}

#[test]
fn test_fixture_comments_stay_with_their_element() {
    let doc = build(&fixture("NXtest.yaml"));
    assert_eq!(comments(&doc.root), vec!["The single entry"]);

    let entry = find(&doc.root, "group", "NXentry");
    let instrument = find(entry, "group", "instrument");
    assert_eq!(comments(instrument), vec!["Detector position"]);
    assert!(comments(entry).is_empty());
}

#[test]
fn test_registry_conversion_matches_transform() {
    let source = fixture("NXtest.yaml");
    let registry = FormatRegistry::with_options(&options());
    let converted = registry.convert(&source, "nyaml", "nxdl").unwrap();
    assert_eq!(converted, nyaml_to_nxdl(&source, &options()).unwrap());

    assert!(converted.contains("<!-- The single entry -->"));
    assert!(converted.contains("<group type=\"NXentry\" minOccurs=\"1\" maxOccurs=\"unbounded\">"));
    assert!(converted.contains("<field name=\"title\" recommended=\"true\"/>"));
}

#[test]
fn test_small_definition_snapshot() {
    let source = "category: base\ndoc: A test.\ntype: group\nNXtest(NXobject):\n  value(NX_CHAR):\n    exists: required\n";
    let nxdl = nyaml_to_nxdl(source, &notice_options()).unwrap();
    assert_snapshot!(nxdl, @r#"
<?xml version='1.0' encoding='UTF-8'?>
<?xml-stylesheet type="text/xsl" href="nxdlformat.xsl"?>
<!--
notice
-->
<definition xmlns="http://definition.nexusformat.org/nxdl/3.1" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" category="base" type="group" name="NXtest" extends="NXobject" xsi:schemaLocation="http://definition.nexusformat.org/nxdl/3.1 ../nxdl.xsd">
    <doc>
        A test.
    </doc>
    <field name="value" type="NX_CHAR" optional="false"/>
</definition>
"#);
}

#[test]
fn test_errors_point_at_the_line() {
    let source = "category: base\ndoc: A test.\nNXtest:\n  value:\n    colour: red\n";
    let err = NyamlFormat::default().parse(source).unwrap_err();
    match err {
        ConversionError::SkippedAttribute { attr, line, .. } => {
            assert_eq!(attr, "colour");
            assert_eq!(line, 5);
        }
        other => panic!("Expected SkippedAttribute, got {other:?}"),
    }
}

#[test]
fn test_second_schema_key_is_rejected() {
    let source = "category: base\ndoc: A test.\nNXone:\n  a:\n    doc: x\nNXtwo:\n  b:\n    doc: y\n";
    let err = NyamlFormat::default().parse(source).unwrap_err();
    assert!(matches!(err, ConversionError::ImproperRoot { .. }), "{err:?}");
}
