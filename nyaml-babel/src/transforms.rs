//! Transform-style interfaces for the two conversion directions
//!
//! The format implementations only know about their own text and the shared
//! tree. The functions here add what a conversion run needs on top: reusing
//! an embedded NXDL when the nyaml text is unchanged, and embedding the source
//! NXDL into generated nyaml.

use crate::embed::{append_nxdl, split_embedded};
use crate::error::Result;
use crate::format::Format;
use crate::formats::{NxdlFormat, NyamlFormat};
use crate::options::ConversionOptions;
use log::{debug, info};

/// Convert nyaml text to NXDL.
///
/// A trailing embedded NXDL block is returned unchanged when its recorded hash
/// still matches the nyaml text above it.
///
/// # Example
///
/// ```
/// use nyaml_babel::transforms::nyaml_to_nxdl;
/// use nyaml_babel::ConversionOptions;
///
/// let source = "category: base\ndoc: A test.\nNXtest:\n";
/// let nxdl = nyaml_to_nxdl(source, &ConversionOptions::default()).unwrap();
/// assert!(nxdl.contains("name=\"NXtest\""));
/// ```
pub fn nyaml_to_nxdl(source: &str, options: &ConversionOptions) -> Result<String> {
    let embedded = split_embedded(source);
    if let Some(nxdl) = embedded.cached() {
        info!("nyaml text is unchanged since it was generated, reusing the embedded NXDL");
        return Ok(nxdl.to_string());
    }
    if embedded.nxdl.is_some() {
        debug!("embedded NXDL is stale, converting the nyaml text");
    }
    convert_nyaml(embedded.yaml, options)
}

/// Convert nyaml text to NXDL, ignoring any embedded NXDL.
pub fn convert_nyaml(source: &str, options: &ConversionOptions) -> Result<String> {
    let doc = NyamlFormat::new(options.clone()).parse(source)?;
    NxdlFormat::new(options.clone()).serialize(&doc)
}

/// Convert NXDL text to nyaml, appending the source NXDL under a hash
/// divider when [`ConversionOptions::store_nxdl`] is set.
pub fn nxdl_to_nyaml(source: &str, options: &ConversionOptions) -> Result<String> {
    let doc = NxdlFormat::new(options.clone()).parse(source)?;
    let yaml = NyamlFormat::new(options.clone()).serialize(&doc)?;
    if options.store_nxdl {
        Ok(append_nxdl(&yaml, source))
    } else {
        Ok(yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NXDL: &str = "<definition category=\"base\" name=\"NXtest\" extends=\"NXobject\" type=\"group\"><doc>A test.</doc></definition>\n";

    fn options(store_nxdl: bool) -> ConversionOptions {
        ConversionOptions {
            store_nxdl,
            copyright_year: Some(2024),
            ..Default::default()
        }
    }

    #[test]
    fn stored_nxdl_is_reused_verbatim() {
        let yaml = nxdl_to_nyaml(NXDL, &options(true)).unwrap();
        assert!(yaml.contains(crate::embed::HASH_DIVIDER));
        assert_eq!(nyaml_to_nxdl(&yaml, &options(true)).unwrap(), NXDL);
    }

    #[test]
    fn edited_nyaml_is_converted() {
        let yaml = nxdl_to_nyaml(NXDL, &options(true))
            .unwrap()
            .replacen("A test.", "Edited.", 1);
        let nxdl = nyaml_to_nxdl(&yaml, &options(true)).unwrap();
        assert!(nxdl.contains("Edited."));
        assert!(nxdl.contains("Copyright (C) 2024-2024"));
    }

    #[test]
    fn store_nxdl_can_be_disabled() {
        let yaml = nxdl_to_nyaml(NXDL, &options(false)).unwrap();
        assert!(!yaml.contains("SHA HASH"));
        assert!(yaml.ends_with("NXtest(NXobject):\n"));
    }
}
