//! Board configuration
//!
//! `conveyor.toml` is parsed and validated by build.rs; the result is
//! compiled in here as [`CONFIG`].

include!(concat!(env!("OUT_DIR"), "/conveyor_config.rs"));
