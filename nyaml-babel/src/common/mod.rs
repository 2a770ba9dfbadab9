//! Logic shared by the builder and the emitter: static tables, doc text,
//! occurrence constraints and dimension notations.

pub mod dimensions;
pub mod doc;
pub mod exists;
pub mod tables;
