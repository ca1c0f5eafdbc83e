//! # resp-decode - RESP message decoder
//!
//! Decodes REdis Serialization Protocol (RESP2/RESP3) messages from a fully
//! buffered byte slice into a typed value tree.
//!
//! ## Features
//!
//! - **Offsets on every node**: each [`DecodedValue`] records where its
//!   encoding ends, so pipelined messages can be walked with [`Pipeline`]
//! - **Structural equality**: map keys and set members compare by content,
//!   never by position
//! - **Checked access**: malformed or truncated input is reported as a
//!   [`ProtocolError`], never as a panic
//! - **Bounded nesting**: composites are decoded with an explicit stack,
//!   limited by [`DecodeOptions::max_depth`] up to [`MAX_DEPTH_LIMIT`]
//!
//! ## Example
//!
//! ```rust
//! let value = resp_decode::decode(b"~2\r\n+Hello\r\n+World\r\n").unwrap();
//! assert_eq!(value.as_set().map(|s| s.len()), Some(2));
//! assert_eq!(value.end_offset(), 20);
//! ```

mod composite;
mod encode;
mod error;
mod parser;
mod pipeline;
mod scalar;
mod types;
mod utils;

pub use encode::RespEncoder;
pub use error::ProtocolError;
pub use parser::DEFAULT_MAX_DEPTH;
pub use parser::DecodeOptions;
pub use parser::MAX_DEPTH_LIMIT;
pub use parser::decode;
pub use parser::decode_at;
pub use parser::decode_at_with;
pub use parser::decode_with;
pub use pipeline::Pipeline;
pub use types::DecodedValue;
pub use types::ValueKind;
