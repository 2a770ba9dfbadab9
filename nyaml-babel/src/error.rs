//! Error types for conversion operations
//!
//! Every failure is fatal for the run. Variants raised while walking nyaml
//! carry the source line of the offending key so the message can point the
//! author at it.

use thiserror::Error;

/// Errors that can occur while converting between nyaml and NXDL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    /// The format cannot be used in the requested direction
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// The nyaml text is not well-formed YAML
    #[error("YAML parse error: {0}")]
    YamlSyntax(String),

    /// The NXDL text is not well-formed XML
    #[error("XML parse error: {0}")]
    XmlSyntax(String),

    /// A required root-level key is missing or malformed
    #[error("{0}")]
    Structure(String),

    /// More than one (or no) schema body key at the root
    #[error("Line {line}: improper root key '{key}'. Accepting only category, doc, symbols, root attributes and one NX... key at root level")]
    ImproperRoot { key: String, line: usize },

    /// A key that resolves to neither a name nor a type
    #[error("Line {line}: found an improper yaml key !")]
    ImproperKey { line: usize },

    /// A key that matches no node kind
    #[error("An unknown type of element {key} has been found which is not be able to be resolved. Check around line {line}")]
    UnknownElement { key: String, line: usize },

    /// A field declared with a type but no name
    #[error("No name for NeXus field has been found. Check around line:{line}")]
    MissingFieldName { line: usize },

    /// A scalar key left over after whitelist extraction
    #[error("An attribute '{attr}' in part '{component}' has been found. Please check around line '{line}. At this time, the allowed attributes are {allowed}.")]
    SkippedAttribute {
        attr: String,
        component: String,
        line: usize,
        allowed: String,
    },

    /// An XML attribute outside the whitelist of its element kind
    #[error("{node} has an unwanted attribute '{attr}'. NeXus {node} allows attributes from {allowed}")]
    UnwantedAttribute {
        node: String,
        attr: String,
        allowed: String,
    },

    /// An XML element without the name (and type) it needs
    #[error("{node} must have a {requirement}. Found attributes: {attributes}")]
    MissingName {
        node: String,
        requirement: String,
        attributes: String,
    },

    /// Explicit min/max mixed with optional/recommended/required
    #[error("{location}Optionality 'exists' can take only either from ['minOccurs', 'maxOccurs'] or from ['optional', 'recommended', 'required']. But not from both of the groups together")]
    OccurrenceConflict { location: String },

    /// An `exists` value that is none of the documented forms
    #[error("Line {line}: exists keyword needs to go either with optional, recommended, required, a list with two entries either [min, <uint>] or [max, <uint>], or a list of four entries [min, <uint>, max, <uint>] !")]
    InvalidExists { line: usize },

    /// Malformed cross-reference block inside a doc
    #[error("Line {line}: {message}")]
    InvalidXref { line: usize, message: String },

    /// Malformed dimensions block
    #[error("Line {line}: {message}")]
    InvalidDimensions { line: usize, message: String },

    /// Malformed enumeration block
    #[error("Line {line}: {message}")]
    InvalidEnumeration { line: usize, message: String },

    /// Malformed symbols table
    #[error("Line {line}: {message}")]
    InvalidSymbols { line: usize, message: String },

    /// Unsupported nameType hint
    #[error("Line {line}: nameType '{value}' for {key} is not in [specified, any, partial]")]
    InvalidNameType {
        key: String,
        value: String,
        line: usize,
    },

    /// An element key carrying a value that cannot hold children
    #[error("Line {line}: '{key}' must hold a mapping of its members, found {found}")]
    ExpectedMapping {
        key: String,
        line: usize,
        found: String,
    },

    /// A comment that cannot be written as an XML comment
    #[error("Line {line}: comment cannot be stored in XML, it contains '--' or ends with '-'")]
    InvalidComment { line: usize },

    /// An XML element the emitter does not know how to place
    #[error("Unexpected element <{tag}> inside <{parent}>")]
    UnexpectedElement { tag: String, parent: String },
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, ConversionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_attribute_names_key_and_line() {
        let err = ConversionError::SkippedAttribute {
            attr: "colour".to_string(),
            component: "field".to_string(),
            line: 12,
            allowed: "[name, type]".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("'colour'"));
        assert!(text.contains("line '12"));
    }

    #[test]
    fn improper_key_mentions_line() {
        assert_eq!(
            ConversionError::ImproperKey { line: 7 }.to_string(),
            "Line 7: found an improper yaml key !"
        );
    }
}
