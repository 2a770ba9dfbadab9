//! Conversions there and back again.

mod cache;
mod consistency;
mod placement;
