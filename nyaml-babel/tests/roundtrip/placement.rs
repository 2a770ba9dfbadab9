//! Comments and values that must keep their place through a round trip

use crate::common::{fixture, options};
use nyaml_babel::consistency::{check_nxdl, check_nyaml};
use nyaml_babel::transforms::{convert_nyaml, nxdl_to_nyaml, nyaml_to_nxdl};
use nyaml_babel::ConversionError;

#[test]
fn test_root_comment_stays_above_the_body_key() {
    let report = check_nyaml(&fixture("NXplacement.yaml"), &options()).unwrap();
    assert!(report.is_consistent(), "{:#?}", report.differences);
    assert!(report.round_trip.starts_with("category: base\n"));
    assert!(report
        .round_trip
        .contains("# about the body\ntype: group\nNXplacement(NXobject):\n  # the detector\n  (NXdetector):\n"));
}

#[test]
fn test_full_dimensions_keep_values_and_comments() {
    let report = check_nyaml(&fixture("NXplacement.yaml"), &options()).unwrap();
    assert!(report.converted.contains("<dim index=\"1\" value=\"n_x\" ref=\"axis: x\"/>"));
    assert!(report
        .round_trip
        .contains("      # dims note\n      dimensions:\n        rank: 2\n        1:\n          value: n_x\n          ref: |\n            axis: x\n"));
}

#[test]
fn test_dimension_refs_with_colons_read_back() {
    let source = "<definition category=\"base\" name=\"NXdims\" extends=\"NXobject\" type=\"group\">\n    <doc>Dimension references.</doc>\n    <field name=\"data\" type=\"NX_NUMBER\">\n        <dimensions rank=\"1\">\n            <dim index=\"1\" value=\"n\" ref=\"a: b\"/>\n        </dimensions>\n    </field>\n</definition>\n";
    let yaml = nxdl_to_nyaml(source, &options()).unwrap();
    let nxdl = convert_nyaml(&yaml, &options()).unwrap();
    assert!(nxdl.contains("ref=\"a: b\""), "{nxdl}");

    let report = check_nxdl(source, &options()).unwrap();
    assert!(report.is_consistent(), "{:#?}", report.differences);
}

#[test]
fn test_exists_with_explicit_bounds_is_rejected() {
    let err = nyaml_to_nxdl(&fixture("NXconflict.yaml"), &options()).unwrap_err();
    assert_eq!(
        err,
        ConversionError::OccurrenceConflict {
            location: "Line 4: Field 'data': ".to_string()
        }
    );
}
