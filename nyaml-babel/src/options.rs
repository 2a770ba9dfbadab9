use serde::{Deserialize, Serialize};

/// Per-run settings threaded through the builder, writer and emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionOptions {
    /// Spaces per nesting level in generated NXDL
    pub nxdl_indent: usize,

    /// Spaces per nesting level in generated nyaml
    pub nyaml_indent: usize,

    /// Single-line docs longer than this are wrapped at word boundaries
    pub doc_wrap_width: usize,

    /// Wrap width of the doc of a symbols table
    pub symbols_doc_wrap_width: usize,

    /// href of the `xml-stylesheet` processing instruction
    pub stylesheet: String,

    /// Copyright notice to write verbatim, usually taken from an existing output file
    pub copyright: Option<String>,

    /// Year used when the notice is generated; the current year when unset
    pub copyright_year: Option<i32>,

    /// Append the source NXDL and its hash block to generated nyaml
    pub store_nxdl: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            nxdl_indent: 4,
            nyaml_indent: 2,
            doc_wrap_width: 80,
            symbols_doc_wrap_width: 70,
            stylesheet: "nxdlformat.xsl".to_string(),
            copyright: None,
            copyright_year: None,
            store_nxdl: true,
        }
    }
}

impl ConversionOptions {
    /// Keep the notice of an existing NXDL file, when it has one.
    pub fn with_existing_output(mut self, existing_nxdl: &str) -> Self {
        if let Some(notice) = crate::copyright::from_nxdl(existing_nxdl) {
            self.copyright = Some(notice);
        }
        self
    }

    /// Body of the copyright comment for this run.
    pub fn copyright_text(&self) -> String {
        match (&self.copyright, self.copyright_year) {
            (Some(text), _) => text.clone(),
            (None, Some(year)) => crate::copyright::for_year(year),
            (None, None) => crate::copyright::current(),
        }
    }
}
