//! NXDL format implementation
//!
//! NXDL is the XML schema language of NeXus definitions. Parsing goes through
//! `roxmltree`, which keeps comments as nodes; serialization is hand-written so
//! that the output layout matches the files in the NeXus definitions
//! repository.

pub mod parser;
pub mod serializer;

use crate::error::Result;
use crate::format::Format;
use crate::ir::NxdlDocument;
use crate::options::ConversionOptions;

/// Format implementation for NXDL
#[derive(Default)]
pub struct NxdlFormat {
    options: ConversionOptions,
}

impl NxdlFormat {
    pub fn new(options: ConversionOptions) -> Self {
        Self { options }
    }
}

impl Format for NxdlFormat {
    fn name(&self) -> &str {
        "nxdl"
    }

    fn description(&self) -> &str {
        "NeXus definition language (XML)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["nxdl.xml"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<NxdlDocument> {
        parser::parse_nxdl(source)
    }

    fn serialize(&self, doc: &NxdlDocument) -> Result<String> {
        serializer::serialize_nxdl(doc, &self.options)
    }
}
