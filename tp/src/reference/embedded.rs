//! Embedded reference data
//!
//! Compiled into the binary from `data/reference.yml` at build time.

/// Default reference tables
pub const REFERENCE_YAML: &str = include_str!("../../data/reference.yml");
