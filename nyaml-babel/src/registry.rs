//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for the available formats.
//! Formats can be registered and retrieved by name, or detected from a file
//! name.

use crate::error::{ConversionError, Result};
use crate::format::Format;
use crate::formats::{NxdlFormat, NyamlFormat};
use crate::ir::NxdlDocument;
use crate::options::ConversionOptions;
use std::collections::HashMap;

/// Registry of definition formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::default();
/// let doc = registry.parse(source, "nyaml")?;
/// let nxdl = registry.serialize(&doc, "nxdl")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| ConversionError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Detect format from filename based on file extension
    ///
    /// Extensions are matched against the end of the file name so that
    /// compound extensions work; the longest matching extension wins, which
    /// keeps `a.nxdl.xml` from being taken for anything ending in `.xml`.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let registry = FormatRegistry::default();
    /// assert_eq!(registry.detect_format_from_filename("NXmx.yaml"), Some("nyaml".to_string()));
    /// assert_eq!(registry.detect_format_from_filename("NXmx.nxdl.xml"), Some("nxdl".to_string()));
    /// assert_eq!(registry.detect_format_from_filename("NXmx.xml"), None);
    /// ```
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let file_name = std::path::Path::new(filename)
            .file_name()
            .and_then(|name| name.to_str())?;

        self.formats
            .values()
            .flat_map(|format| {
                format
                    .file_extensions()
                    .iter()
                    .map(move |ext| (format.name(), *ext))
            })
            .filter(|(_, ext)| {
                file_name.len() > ext.len() + 1
                    && file_name.ends_with(ext)
                    && file_name[..file_name.len() - ext.len()].ends_with('.')
            })
            .max_by_key(|(_, ext)| ext.len())
            .map(|(name, _)| name.to_string())
    }

    /// Parse source text using the specified format
    pub fn parse(&self, source: &str, format: &str) -> Result<NxdlDocument> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(ConversionError::NotSupported(format!(
                "Format '{format}' does not support parsing"
            )));
        }
        fmt.parse(source)
    }

    /// Serialize a document using the specified format
    pub fn serialize(&self, doc: &NxdlDocument, format: &str) -> Result<String> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(ConversionError::NotSupported(format!(
                "Format '{format}' does not support serialization"
            )));
        }
        fmt.serialize(doc)
    }

    /// Parse with one format and serialize with another
    pub fn convert(&self, source: &str, from: &str, to: &str) -> Result<String> {
        let doc = self.parse(source, from)?;
        self.serialize(&doc, to)
    }

    /// Create a registry with the built-in formats, all sharing `options`
    pub fn with_options(options: &ConversionOptions) -> Self {
        let mut registry = Self::new();
        registry.register(NyamlFormat::new(options.clone()));
        registry.register(NxdlFormat::new(options.clone()));
        registry
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        Self::with_options(&ConversionOptions::default())
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
