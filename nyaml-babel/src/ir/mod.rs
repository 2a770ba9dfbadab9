//! Intermediate representation shared by both directions.
//!
//! The nyaml builder and the NXDL parser both produce an [`NxdlDocument`]; the
//! NXDL serializer and the nyaml emitter both consume one. Attribute order is
//! the order of insertion and is written out unchanged.

pub mod nodes;

pub use nodes::{NxdlDocument, XmlElement, XmlNode};
