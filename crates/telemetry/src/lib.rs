//! Logging setup for the workspace binaries.
//!
//! Libraries only emit `tracing` events; a binary calls [`init`] once to
//! print them to stderr.

pub mod logger;

pub use logger::TelemetryError;
pub use logger::init;
