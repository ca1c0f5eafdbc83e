//! Leaf decoders.
//!
//! Each reader starts at the position right after the type tag and returns
//! its payload together with the position following the terminating CRLF.

use bytes::Bytes;

use crate::error::ProtocolError;
use crate::utils::Length;
use crate::utils::byte_at;
use crate::utils::expect_crlf;
use crate::utils::read_header;
use crate::utils::slice_at;

/// Position of the next `\r` at or after `pos`.
#[inline]
fn find_cr(buf: &[u8], pos: usize) -> Result<usize, ProtocolError> {
	let rest = buf
		.get(pos..)
		.ok_or(ProtocolError::TruncatedInput { offset: pos })?;
	memchr::memchr(b'\r', rest)
		.map(|i| pos + i)
		.ok_or(ProtocolError::TruncatedInput { offset: buf.len() })
}

/// Split an optional leading sign off, returning `(negative, payload_start)`.
#[inline]
fn read_sign(buf: &[u8], pos: usize) -> Result<(bool, usize), ProtocolError> {
	Ok(match byte_at(buf, pos)? {
		b'-' => (true, pos + 1),
		b'+' => (false, pos + 1),
		_ => (false, pos),
	})
}

/// Simple string and error payload: everything up to CRLF.
pub fn read_line(buf: &[u8], pos: usize) -> Result<(Bytes, usize), ProtocolError> {
	let cr = find_cr(buf, pos)?;
	let next = expect_crlf(buf, cr)?;
	Ok((Bytes::copy_from_slice(&buf[pos..cr]), next))
}

/// Signed 64-bit integer.
///
/// Negative numbers accumulate downward so that `i64::MIN` is reachable. A
/// zero magnitude ignores the sign.
pub fn read_integer(buf: &[u8], pos: usize) -> Result<(i64, usize), ProtocolError> {
	let (negative, start) = read_sign(buf, pos)?;
	let mut value: i64 = 0;
	let mut cursor = start;

	loop {
		let b = byte_at(buf, cursor)?;
		if b == b'\r' {
			break;
		}
		if !b.is_ascii_digit() {
			return Err(ProtocolError::InvalidInteger { offset: cursor });
		}
		let digit = i64::from(b - b'0');
		value = value
			.checked_mul(10)
			.and_then(|v| {
				if negative {
					v.checked_sub(digit)
				} else {
					v.checked_add(digit)
				}
			})
			.ok_or(ProtocolError::IntegerOverflow { offset: pos })?;
		cursor += 1;
	}

	if cursor == start {
		return Err(ProtocolError::InvalidInteger { offset: start });
	}

	let next = expect_crlf(buf, cursor)?;
	Ok((value, next))
}

/// Length-prefixed bulk string. `None` is the RESP2 null bulk string `$-1`.
pub fn read_bulk_string(buf: &[u8], pos: usize) -> Result<(Option<Bytes>, usize), ProtocolError> {
	let (len, data_start) = match read_header(buf, pos)? {
		(Length::Null, next) => return Ok((None, next)),
		(Length::Count(len), next) => (len, next),
	};

	let data = slice_at(buf, data_start, len)?;
	let next = expect_crlf(buf, data_start + len)?;
	Ok((Some(Bytes::copy_from_slice(data)), next))
}

/// Boolean flag: `t` is true, any other byte is false.
pub fn read_boolean(buf: &[u8], pos: usize) -> Result<(bool, usize), ProtocolError> {
	let flag = byte_at(buf, pos)?;
	let next = expect_crlf(buf, pos + 1)?;
	Ok((flag == b't', next))
}

/// Null has no payload, only the terminator.
pub fn read_null(buf: &[u8], pos: usize) -> Result<usize, ProtocolError> {
	expect_crlf(buf, pos)
}

/// Double: `[sign] (inf | nan | digits[.digits][e[sign]digits])`.
///
/// Zero decodes as positive `0.0` whatever the sign byte says.
pub fn read_double(buf: &[u8], pos: usize) -> Result<(f64, usize), ProtocolError> {
	let (negative, start) = read_sign(buf, pos)?;

	if let (Ok(word), Some(b'\r')) = (slice_at(buf, start, 3), buf.get(start + 3)) {
		let special = match word {
			b"inf" if negative => Some(f64::NEG_INFINITY),
			b"inf" => Some(f64::INFINITY),
			b"nan" => Some(f64::NAN),
			_ => None,
		};
		if let Some(value) = special {
			let next = expect_crlf(buf, start + 3)?;
			return Ok((value, next));
		}
	}

	let cr = find_cr(buf, start)?;
	let literal = &buf[start..cr];
	if !is_decimal_literal(literal) {
		return Err(ProtocolError::InvalidDouble { offset: start });
	}
	let magnitude = std::str::from_utf8(literal)
		.ok()
		.and_then(|s| s.parse::<f64>().ok())
		.ok_or(ProtocolError::InvalidDouble { offset: start })?;
	let next = expect_crlf(buf, cr)?;

	let value = if magnitude == 0.0 {
		0.0
	} else if negative {
		-magnitude
	} else {
		magnitude
	};
	Ok((value, next))
}

/// `digits[.digits][(e|E)[+|-]digits]` with at least one mantissa digit.
fn is_decimal_literal(literal: &[u8]) -> bool {
	fn digits(s: &[u8]) -> usize {
		s.iter().take_while(|b| b.is_ascii_digit()).count()
	}

	let int_len = digits(literal);
	let mut rest = &literal[int_len..];
	let mut frac_len = 0;

	if let Some((b'.', tail)) = rest.split_first() {
		frac_len = digits(tail);
		rest = &tail[frac_len..];
	}
	if int_len + frac_len == 0 {
		return false;
	}

	match rest.split_first() {
		None => true,
		Some((b'e' | b'E', tail)) => {
			let tail = match tail.split_first() {
				Some((b'+' | b'-', t)) => t,
				_ => tail,
			};
			let exp_len = digits(tail);
			exp_len > 0 && exp_len == tail.len()
		}
		Some(_) => false,
	}
}
