//! Configuration types
//!
//! Board-agnostic configuration structures. The firmware parses these from
//! TOML at build time and embeds the validated result as a constant.

pub mod types;

pub use types::*;
