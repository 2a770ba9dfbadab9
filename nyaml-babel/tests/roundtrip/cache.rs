//! Embedded NXDL reuse

use crate::common::{fixture, options};
use nyaml_babel::embed::{split_embedded, HASH_DIVIDER};
use nyaml_babel::transforms::{nxdl_to_nyaml, nyaml_to_nxdl};
use nyaml_babel::ConversionOptions;

fn storing() -> ConversionOptions {
    ConversionOptions {
        store_nxdl: true,
        ..options()
    }
}

#[test]
fn test_unchanged_nyaml_returns_the_source_nxdl() {
    let source = fixture("NXtiny.nxdl.xml");
    let yaml = nxdl_to_nyaml(&source, &storing()).unwrap();
    assert!(yaml.contains(HASH_DIVIDER));
    assert_eq!(split_embedded(&yaml).nxdl.as_deref(), Some(source.as_str()));
    assert_eq!(nyaml_to_nxdl(&yaml, &storing()).unwrap(), source);
}

#[test]
fn test_edited_nyaml_is_converted_again() {
    let source = fixture("NXtiny.nxdl.xml");
    let yaml = nxdl_to_nyaml(&source, &storing()).unwrap();
    let edited = yaml.replace("A value.", "A measured value.");
    let nxdl = nyaml_to_nxdl(&edited, &storing()).unwrap();
    assert_ne!(nxdl, source);
    assert!(nxdl.contains("A measured value."));
    assert!(nxdl.contains("Copyright (C) 2024-2024"));
}

#[test]
fn test_storing_can_be_disabled() {
    let yaml = nxdl_to_nyaml(&fixture("NXtiny.nxdl.xml"), &options()).unwrap();
    assert!(!yaml.contains(HASH_DIVIDER));
}
