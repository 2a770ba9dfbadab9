//! nyaml format implementation
//!
//! nyaml is the YAML dialect NeXus authors write definitions in. Keys spell out
//! the NXDL element they stand for:
//!
//! | nyaml key             | NXDL element                              |
//! |-----------------------|-------------------------------------------|
//! | `name(NX_FLOAT)`      | `<field name="name" type="NX_FLOAT">`     |
//! | `(NXentry)` / `e(NXentry)` | `<group type="NXentry">`             |
//! | `\@name(NX_CHAR)`     | `<attribute name="name" type="NX_CHAR">`  |
//! | `name(link)`          | `<link name="name">`                      |
//! | `name(choice)`        | `<choice name="name">`                    |
//! | `doc`, `enumeration`, `dimensions`, `exists`, `unit` | structure or attributes of the owner |
//!
//! Parsing runs in three steps: the [`loader`] builds an ordered tree and a
//! map from key paths to source lines, the [`comments`] collector binds `#`
//! blocks to the key that follows them, and the [`builder`] produces the
//! element tree. Serialization is the [`emitter`].

pub mod builder;
pub mod comments;
pub mod emitter;
pub mod loader;
pub mod value;

use crate::error::Result;
use crate::format::Format;
use crate::ir::NxdlDocument;
use crate::options::ConversionOptions;
use comments::CommentCollector;

/// Format implementation for nyaml
#[derive(Default)]
pub struct NyamlFormat {
    options: ConversionOptions,
}

impl NyamlFormat {
    pub fn new(options: ConversionOptions) -> Self {
        Self { options }
    }
}

impl Format for NyamlFormat {
    fn name(&self) -> &str {
        "nyaml"
    }

    fn description(&self) -> &str {
        "NeXus definitions written in YAML"
    }

    fn file_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<NxdlDocument> {
        let document = loader::load(source)?;
        let comments = CommentCollector::collect(source, &document.positions);
        builder::build(&document, &comments, &self.options)
    }

    fn serialize(&self, doc: &NxdlDocument) -> Result<String> {
        emitter::emit_nyaml(doc, &self.options)
    }
}
