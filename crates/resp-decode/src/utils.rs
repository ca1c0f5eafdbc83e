//! Wire constants, checked byte access and the length scanner.

use crate::error::ProtocolError;

/// CRLF line ending
pub const CRLF: &[u8] = b"\r\n";

/// Type tags for RESP2
pub const SIMPLE_STRING: u8 = b'+';
pub const ERROR: u8 = b'-';
pub const INTEGER: u8 = b':';
pub const BULK_STRING: u8 = b'$';
pub const ARRAY: u8 = b'*';

/// Type tags for RESP3
pub const NULL: u8 = b'_';
pub const BOOLEAN: u8 = b'#';
pub const DOUBLE: u8 = b',';
pub const MAP: u8 = b'%';
pub const SET: u8 = b'~';

/// Smallest possible encoding of any value (`_\r\n`).
pub const MIN_VALUE_LEN: usize = 3;

/// Result of scanning a length or count header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
	/// `digits CRLF`
	Count(usize),
	/// RESP2 null marker `-1 CRLF`
	Null,
}

/// Read the byte at `pos`, failing with `TruncatedInput` past the end.
#[inline]
pub fn byte_at(buf: &[u8], pos: usize) -> Result<u8, ProtocolError> {
	buf.get(pos)
		.copied()
		.ok_or(ProtocolError::TruncatedInput { offset: pos })
}

/// Take `len` bytes starting at `pos`.
#[inline]
pub fn slice_at(buf: &[u8], pos: usize, len: usize) -> Result<&[u8], ProtocolError> {
	let end = pos
		.checked_add(len)
		.ok_or(ProtocolError::TruncatedInput { offset: pos })?;
	buf.get(pos..end).ok_or(ProtocolError::TruncatedInput {
		offset: buf.len().max(pos),
	})
}

/// Require CRLF at `pos` and return the position after it.
#[inline]
pub fn expect_crlf(buf: &[u8], pos: usize) -> Result<usize, ProtocolError> {
	if byte_at(buf, pos)? != b'\r' {
		return Err(ProtocolError::ExpectedCrlf { offset: pos });
	}
	if byte_at(buf, pos + 1)? != b'\n' {
		return Err(ProtocolError::ExpectedCrlf { offset: pos + 1 });
	}
	Ok(pos + 2)
}

/// Scan an unsigned decimal length terminated by CRLF.
///
/// Returns the value and the position right after the terminator. Digits are
/// accumulated as `value * 10 + digit`; the scan stops at the first non-digit,
/// which must be the start of CRLF.
pub fn read_length(buf: &[u8], pos: usize) -> Result<(usize, usize), ProtocolError> {
	let mut value: usize = 0;
	let mut cursor = pos;

	loop {
		let b = byte_at(buf, cursor)?;
		if !b.is_ascii_digit() {
			break;
		}
		value = value
			.checked_mul(10)
			.and_then(|v| v.checked_add((b - b'0') as usize))
			.ok_or(ProtocolError::MalformedLength { offset: pos })?;
		cursor += 1;
	}

	if cursor == pos {
		return Err(ProtocolError::MalformedLength { offset: pos });
	}

	match expect_crlf(buf, cursor) {
		Ok(next) => Ok((value, next)),
		Err(ProtocolError::ExpectedCrlf { offset }) => Err(ProtocolError::MalformedLength { offset }),
		Err(e) => Err(e),
	}
}

/// Scan a length header that may also be the RESP2 null marker `-1`.
pub fn read_header(buf: &[u8], pos: usize) -> Result<(Length, usize), ProtocolError> {
	if byte_at(buf, pos)? != b'-' {
		let (count, next) = read_length(buf, pos)?;
		return Ok((Length::Count(count), next));
	}

	if byte_at(buf, pos + 1)? != b'1' {
		return Err(ProtocolError::MalformedLength { offset: pos });
	}
	match expect_crlf(buf, pos + 2) {
		Ok(next) => Ok((Length::Null, next)),
		Err(ProtocolError::ExpectedCrlf { .. }) => Err(ProtocolError::MalformedLength { offset: pos }),
		Err(e) => Err(e),
	}
}
