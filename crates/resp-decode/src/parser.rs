//! Tag dispatcher and decode entry points.
//!
//! Nesting is driven by an explicit stack of open [`Frame`]s instead of call
//! recursion. The decoded tree is still dropped, compared, hashed and encoded
//! recursively, so depth is capped at [`MAX_DEPTH_LIMIT`] whatever
//! [`DecodeOptions`] asks for.

use tracing::debug;
use tracing::trace;

use crate::composite::CompositeKind;
use crate::composite::Frame;
use crate::error::ProtocolError;
use crate::scalar::read_boolean;
use crate::scalar::read_bulk_string;
use crate::scalar::read_double;
use crate::scalar::read_integer;
use crate::scalar::read_line;
use crate::scalar::read_null;
use crate::types::DecodedValue;
use crate::types::ValueKind;
use crate::utils::*;

/// Default maximum number of simultaneously open composites.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Hard ceiling on nesting depth, small enough for recursive traversal of
/// the result on a default-sized thread stack.
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// Limits applied while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
	/// Maximum nesting depth of arrays, maps and sets. Values above
	/// [`MAX_DEPTH_LIMIT`] are treated as the limit.
	pub max_depth: usize,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self::new()
	}
}

impl DecodeOptions {
	pub const fn new() -> Self {
		Self {
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}

	/// Set the maximum nesting depth, clamped to [`MAX_DEPTH_LIMIT`].
	pub const fn max_depth(mut self, depth: usize) -> Self {
		self.max_depth = if depth > MAX_DEPTH_LIMIT {
			MAX_DEPTH_LIMIT
		} else {
			depth
		};
		self
	}

	/// Depth limit actually enforced.
	pub const fn effective_max_depth(&self) -> usize {
		if self.max_depth > MAX_DEPTH_LIMIT {
			MAX_DEPTH_LIMIT
		} else {
			self.max_depth
		}
	}
}

// Outcome of reading one tag and its payload.
enum Step {
	Value(DecodedValue),
	Open {
		kind: CompositeKind,
		count: usize,
		children_start: usize,
	},
}

/// Decode the value at the start of `buf`.
///
/// Fails with [`ProtocolError::EmptyInput`] on a zero-length buffer.
///
/// # Example
///
/// ```rust
/// let value = resp_decode::decode(b"+OK\r\n").unwrap();
/// assert_eq!(value.as_str(), Some("OK"));
/// assert_eq!(value.end_offset(), 5);
/// ```
pub fn decode(buf: &[u8]) -> Result<DecodedValue, ProtocolError> {
	decode_with(buf, &DecodeOptions::default())
}

/// Like [`decode`], with explicit limits.
pub fn decode_with(buf: &[u8], options: &DecodeOptions) -> Result<DecodedValue, ProtocolError> {
	if buf.is_empty() {
		return Err(ProtocolError::EmptyInput);
	}
	decode_at_with(buf, 0, options)
}

/// Decode the value whose tag byte is at `offset`.
pub fn decode_at(buf: &[u8], offset: usize) -> Result<DecodedValue, ProtocolError> {
	decode_at_with(buf, offset, &DecodeOptions::default())
}

/// Like [`decode_at`], with explicit limits.
pub fn decode_at_with(
	buf: &[u8],
	offset: usize,
	options: &DecodeOptions,
) -> Result<DecodedValue, ProtocolError> {
	let result = decode_tree(buf, offset, options);
	if let Err(e) = &result {
		debug!(error = %e, start = offset, len = buf.len(), "RESP decode failed");
	}
	result
}

fn decode_tree(
	buf: &[u8],
	offset: usize,
	options: &DecodeOptions,
) -> Result<DecodedValue, ProtocolError> {
	let max_depth = options.effective_max_depth();
	let mut frames: Vec<Frame> = Vec::new();
	let mut pos = offset;

	loop {
		let mut done = match decode_one(buf, pos)? {
			Step::Value(value) => value,
			Step::Open {
				kind,
				count,
				children_start,
			} => {
				if frames.len() >= max_depth {
					return Err(ProtocolError::DepthLimitExceeded {
						depth: frames.len() + 1,
						offset: pos,
					});
				}
				trace!(?kind, count, offset = pos, depth = frames.len() + 1, "open composite");
				let bytes_left = buf.len().saturating_sub(children_start);
				frames.push(Frame::open(kind, count, bytes_left));
				pos = children_start;
				continue;
			}
		};

		// Hand the finished value to its parent, closing every frame it completes.
		loop {
			let Some(mut frame) = frames.pop() else {
				return Ok(done);
			};
			let end = done.end_offset();
			frame.push(done);
			if frame.is_complete() {
				done = frame.finish(end);
			} else {
				frames.push(frame);
				pos = end;
				break;
			}
		}
	}
}

fn decode_one(buf: &[u8], pos: usize) -> Result<Step, ProtocolError> {
	let tag = byte_at(buf, pos)?;
	let body = pos + 1;

	let value = match tag {
		SIMPLE_STRING => {
			let (text, end) = read_line(buf, body)?;
			DecodedValue::new(ValueKind::SimpleString(text), end)
		}
		ERROR => {
			let (text, end) = read_line(buf, body)?;
			DecodedValue::new(ValueKind::Error(text), end)
		}
		INTEGER => {
			let (num, end) = read_integer(buf, body)?;
			DecodedValue::new(ValueKind::Integer(num), end)
		}
		BULK_STRING => match read_bulk_string(buf, body)? {
			(Some(data), end) => DecodedValue::new(ValueKind::BulkString(data), end),
			(None, end) => DecodedValue::new(ValueKind::Null, end),
		},
		NULL => DecodedValue::new(ValueKind::Null, read_null(buf, body)?),
		BOOLEAN => {
			let (flag, end) = read_boolean(buf, body)?;
			DecodedValue::new(ValueKind::Boolean(flag), end)
		}
		DOUBLE => {
			let (num, end) = read_double(buf, body)?;
			DecodedValue::new(ValueKind::Double(num), end)
		}
		ARRAY => return read_composite(buf, body, CompositeKind::Array),
		MAP => return read_composite(buf, body, CompositeKind::Map),
		SET => return read_composite(buf, body, CompositeKind::Set),
		_ => return Err(ProtocolError::InvalidTypeTag { tag, offset: pos }),
	};

	Ok(Step::Value(value))
}

fn read_composite(buf: &[u8], pos: usize, kind: CompositeKind) -> Result<Step, ProtocolError> {
	match read_header(buf, pos)? {
		// Only arrays carry the RESP2 null form.
		(Length::Null, end) if kind == CompositeKind::Array => {
			Ok(Step::Value(DecodedValue::new(ValueKind::Null, end)))
		}
		(Length::Null, _) => Err(ProtocolError::MalformedLength { offset: pos }),
		(Length::Count(0), end) => Ok(Step::Value(kind.empty(end))),
		(Length::Count(count), end) => Ok(Step::Open {
			kind,
			count,
			children_start: end,
		}),
	}
}
