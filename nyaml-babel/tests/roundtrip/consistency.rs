//! Round-trip consistency of the fixtures

use crate::common::{fixture, options};
use nyaml_babel::consistency::{check_nxdl, check_nyaml, compare_documents};
use nyaml_babel::format::Format;
use nyaml_babel::formats::{NxdlFormat, NyamlFormat};
use nyaml_babel::transforms::{convert_nyaml, nxdl_to_nyaml};

#[test]
fn test_nyaml_fixture_is_consistent() {
    let report = check_nyaml(&fixture("NXtest.yaml"), &options()).unwrap();
    assert!(report.is_consistent(), "{:#?}", report.differences);
}

#[test]
fn test_nxdl_fixture_is_consistent() {
    let report = check_nxdl(&fixture("NXtiny.nxdl.xml"), &options()).unwrap();
    assert!(report.is_consistent(), "{:#?}", report.differences);
    assert!(report.round_trip.contains("<!-- the only field -->"));
}

#[test]
fn test_generated_nxdl_is_a_fixed_point() {
    // NXDL written by the tool converts to nyaml and back to the same text.
    let nxdl = convert_nyaml(&fixture("NXtest.yaml"), &options()).unwrap();
    let yaml = nxdl_to_nyaml(&nxdl, &options()).unwrap();
    let again = convert_nyaml(&yaml, &options()).unwrap();
    assert_eq!(nxdl, again);
}

#[test]
fn test_changed_doc_is_a_difference() {
    let nyaml = NyamlFormat::default();
    let source = fixture("NXtest.yaml");
    let edited = source.replace("Quick scan.", "Rapid scan.");
    let differences = compare_documents(
        &nyaml.parse(&source).unwrap(),
        &nyaml.parse(&edited).unwrap(),
    );
    assert_eq!(differences.len(), 1);
    assert!(differences[0].path.ends_with("item/doc"), "{}", differences[0]);
}

#[test]
fn test_dropped_comment_is_a_difference() {
    let nxdl = NxdlFormat::default();
    let source = fixture("NXtiny.nxdl.xml");
    let edited = source.replace("    <!-- the only field -->\n", "");
    let differences = compare_documents(
        &nxdl.parse(&source).unwrap(),
        &nxdl.parse(&edited).unwrap(),
    );
    assert_eq!(differences.len(), 1);
    assert!(differences[0].message.contains("comments differ"));
}
