//! Iteration over back-to-back messages in one buffer.

use std::iter::FusedIterator;

use crate::error::ProtocolError;
use crate::parser::DecodeOptions;
use crate::parser::decode_at_with;
use crate::types::DecodedValue;

/// Decodes every message in a pipelined buffer, one at a time.
///
/// Each step starts where the previous value ended. Iteration stops at the
/// end of the buffer, or after yielding the first error.
///
/// # Example
///
/// ```rust
/// use resp_decode::Pipeline;
///
/// let values: Vec<_> = Pipeline::new(b"+OK\r\n:1\r\n")
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(values.len(), 2);
/// assert_eq!(values[1].end_offset(), 9);
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline<'a> {
	buf: &'a [u8],
	offset: usize,
	options: DecodeOptions,
	failed: bool,
}

impl<'a> Pipeline<'a> {
	pub fn new(buf: &'a [u8]) -> Self {
		Self::with_options(buf, DecodeOptions::default())
	}

	pub fn with_options(buf: &'a [u8], options: DecodeOptions) -> Self {
		Self {
			buf,
			offset: 0,
			options,
			failed: false,
		}
	}

	/// Offset where the next message starts.
	pub fn offset(&self) -> usize {
		self.offset
	}

	/// Bytes not yet consumed.
	pub fn remaining(&self) -> &'a [u8] {
		&self.buf[self.offset.min(self.buf.len())..]
	}
}

impl Iterator for Pipeline<'_> {
	type Item = Result<DecodedValue, ProtocolError>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.failed || self.offset >= self.buf.len() {
			return None;
		}

		match decode_at_with(self.buf, self.offset, &self.options) {
			Ok(value) => {
				self.offset = value.end_offset();
				Some(Ok(value))
			}
			Err(e) => {
				self.failed = true;
				Some(Err(e))
			}
		}
	}
}

impl FusedIterator for Pipeline<'_> {}
