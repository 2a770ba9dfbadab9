//! Shared configuration loader for the nyaml toolchain.
//!
//! `defaults/nyaml.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`NyamlConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use nyaml_babel::ConversionOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/nyaml.default.toml");

/// Top-level configuration consumed by nyaml applications.
#[derive(Debug, Clone, Deserialize)]
pub struct NyamlConfig {
    pub output: OutputConfig,
    pub doc: DocConfig,
    pub copyright: CopyrightConfig,
}

/// Layout of generated files.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub nxdl_indent: usize,
    pub nyaml_indent: usize,
    pub stylesheet: String,
    pub store_nxdl: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocConfig {
    pub wrap_width: usize,
    pub symbols_wrap_width: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CopyrightConfig {
    /// `0` selects the current year
    pub year: i32,
}

impl From<&NyamlConfig> for ConversionOptions {
    fn from(config: &NyamlConfig) -> Self {
        ConversionOptions {
            nxdl_indent: config.output.nxdl_indent,
            nyaml_indent: config.output.nyaml_indent,
            doc_wrap_width: config.doc.wrap_width,
            symbols_doc_wrap_width: config.doc.symbols_wrap_width,
            stylesheet: config.output.stylesheet.clone(),
            copyright: None,
            copyright_year: (config.copyright.year > 0).then_some(config.copyright.year),
            store_nxdl: config.output.store_nxdl,
        }
    }
}

impl From<NyamlConfig> for ConversionOptions {
    fn from(config: NyamlConfig) -> Self {
        ConversionOptions::from(&config)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<NyamlConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<NyamlConfig, ConfigError> {
    Loader::new().build()
}
