//! Lossless translation between nyaml and NXDL
//!
//!     NXDL is the XML dialect NeXus uses to define base classes, application definitions and
//!     contributed definitions. nyaml is a YAML rendition of the same definitions, meant to be
//!     read and edited by hand. This crate converts in both directions, keeping every comment in
//!     place, so that a definition can live in either notation.
//!
//!     This is a pure lib, that is, it powers nyaml-cli but is shell agnostic: no code here
//!     should suppose a shell environment, be it std printing, env vars or file paths.
//!
//! Architecture
//!
//!     Both notations parse into and serialize from one element tree (./ir/mod.rs), the tree of
//!     the NXDL document with comments kept as nodes. Each notation is a Format:
//!
//!     - nyaml parse: the loader reads YAML into tagged values that remember their source line,
//!       the comment collector binds every comment block to the key below it, and the builder
//!       walks the mapping to produce elements.
//!     - nyaml serialize: the emitter walks the elements and writes keys, docs and comments.
//!     - nxdl parse / serialize: plain XML reading and a writer for the canonical layout.
//!
//!     The pieces shared by both directions (doc reflow, occurrence constraints, dimensions and
//!     the key tables) live in ./common.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── options.rs              # Conversion options
//!     ├── transforms.rs           # Conversion entry points
//!     ├── consistency.rs          # Round-trip comparison
//!     ├── embed.rs                # Embedded NXDL and hash cache
//!     ├── copyright.rs
//!     ├── formats
//!     │   ├── nyaml               # loader, comments, builder, emitter
//!     │   └── nxdl                # parser, serializer
//!     ├── ir                      # Element tree
//!     └── common                  # Shared mapping code
//!
//! Testing
//!     tests
//!     └── <area>
//!         ├── <testname>.rs
//!         └── fixtures
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include
//!     these in the mod.
//!
//! Caching
//!
//!     nyaml generated from NXDL carries the source NXDL as a trailing comment block along with
//!     the hash of the nyaml text above it. Converting such a file back while the hash still
//!     matches returns the stored NXDL byte for byte. See ./embed.rs.
//!
pub mod common;
pub mod consistency;
pub mod copyright;
pub mod embed;
pub mod error;
pub mod format;
pub mod formats;
pub mod ir;
pub mod options;
pub mod registry;
pub mod transforms;

pub use error::{ConversionError, Result};
pub use format::Format;
pub use ir::NxdlDocument;
pub use options::ConversionOptions;
pub use registry::FormatRegistry;
