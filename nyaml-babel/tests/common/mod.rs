//! Shared helpers for the integration tests.

use nyaml_babel::ConversionOptions;
use std::path::PathBuf;

/// Read a file from `tests/fixtures`.
pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}

/// Options with a fixed copyright year so outputs do not depend on the clock.
pub fn options() -> ConversionOptions {
    ConversionOptions {
        copyright_year: Some(2024),
        store_nxdl: false,
        ..Default::default()
    }
}

/// Options with a short stand-in notice, for exact output comparisons.
pub fn notice_options() -> ConversionOptions {
    ConversionOptions {
        copyright: Some("notice\n".to_string()),
        ..options()
    }
}
