//! Library half of the `resp-inspect` binary: configuration and rendering
//! of decoded values.

pub mod config;
pub mod render;
