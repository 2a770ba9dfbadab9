//! Format trait definition
//!
//! This module defines the core Format trait that both format implementations
//! implement. Every format converts between its text and the shared
//! [`NxdlDocument`] tree, so any parser can be paired with any serializer.

use crate::error::{ConversionError, Result};
use crate::ir::NxdlDocument;

/// Trait for definition formats
///
/// Implementors provide conversion between a string representation and the
/// [`NxdlDocument`] tree. Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_parsing(&self) -> bool {
///         true
///     }
///
///     fn parse(&self, source: &str) -> Result<NxdlDocument> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "nyaml", "nxdl")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format (e.g., ["yaml", "yml"])
    ///
    /// Returns a slice of file extensions without the leading dot. Compound
    /// extensions such as `nxdl.xml` are allowed.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → NxdlDocument)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (NxdlDocument → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a document
    ///
    /// Default implementation returns NotSupported error.
    fn parse(&self, _source: &str) -> Result<NxdlDocument> {
        Err(ConversionError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a document into source text
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(&self, _doc: &NxdlDocument) -> Result<String> {
        Err(ConversionError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
