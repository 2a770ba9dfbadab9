//! Single-direction conversions of the fixtures.

mod nxdl_to_nyaml;
mod nyaml_to_nxdl;
