//! Error types for RESP decoding.

use thiserror::Error;

/// Errors that can occur while decoding a RESP buffer.
///
/// Every variant except [`ProtocolError::EmptyInput`] carries the byte offset
/// in the source buffer where the problem was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
	/// A zero-length buffer was passed to `decode`
	#[error("Empty input")]
	EmptyInput,

	/// The byte at `offset` is not a known type tag
	#[error("Invalid type tag {:?} at offset {offset}", char::from(*.tag))]
	InvalidTypeTag { tag: u8, offset: usize },

	/// The buffer ended while more data was expected
	#[error("Unexpected end of input at offset {offset}")]
	TruncatedInput { offset: usize },

	/// A length or count header is not `digits CRLF`
	#[error("Malformed length at offset {offset}")]
	MalformedLength { offset: usize },

	/// Bytes are present but they are not the line terminator
	#[error("Expected CRLF at offset {offset}")]
	ExpectedCrlf { offset: usize },

	/// Integer payload is empty or contains a non-digit
	#[error("Invalid integer at offset {offset}")]
	InvalidInteger { offset: usize },

	/// Integer payload does not fit in an `i64`
	#[error("Integer overflow at offset {offset}")]
	IntegerOverflow { offset: usize },

	/// Double payload is not a valid floating point literal
	#[error("Invalid double at offset {offset}")]
	InvalidDouble { offset: usize },

	/// Composite nesting went deeper than the configured limit
	#[error("Nesting depth {depth} exceeds limit at offset {offset}")]
	DepthLimitExceeded { depth: usize, offset: usize },
}

impl ProtocolError {
	/// Byte offset the error refers to, if any.
	pub fn offset(&self) -> Option<usize> {
		match self {
			ProtocolError::EmptyInput => None,
			ProtocolError::InvalidTypeTag { offset, .. }
			| ProtocolError::TruncatedInput { offset }
			| ProtocolError::MalformedLength { offset }
			| ProtocolError::ExpectedCrlf { offset }
			| ProtocolError::InvalidInteger { offset }
			| ProtocolError::IntegerOverflow { offset }
			| ProtocolError::InvalidDouble { offset }
			| ProtocolError::DepthLimitExceeded { offset, .. } => Some(*offset),
		}
	}

	/// True when the error was caused by the buffer ending early.
	///
	/// Callers that reassemble frames from a socket can use this to decide
	/// whether to wait for more bytes instead of dropping the connection.
	pub fn is_truncated(&self) -> bool {
		matches!(self, ProtocolError::TruncatedInput { .. })
	}
}
