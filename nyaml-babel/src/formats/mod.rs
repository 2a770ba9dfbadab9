//! Format implementations
//!
//! Both notations convert to and from the shared element tree.

pub mod nxdl;
pub mod nyaml;

pub use nxdl::NxdlFormat;
pub use nyaml::NyamlFormat;
