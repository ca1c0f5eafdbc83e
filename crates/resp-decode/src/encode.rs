//! Wire encoder for decoded values.
//!
//! Used to check that decoding reproduces what was encoded. The end offset
//! carried by the input is ignored.

use bytes::BufMut;
use bytes::Bytes;
use bytes::BytesMut;

use crate::types::DecodedValue;
use crate::types::ValueKind;
use crate::utils::*;

/// Trait for encoding RESP values.
pub trait RespEncoder {
	fn encode_to(&self, buf: &mut BytesMut);

	fn encode(&self) -> Bytes {
		let mut buf = BytesMut::new();
		self.encode_to(&mut buf);
		buf.freeze()
	}
}

impl RespEncoder for DecodedValue {
	fn encode_to(&self, buf: &mut BytesMut) {
		self.kind().encode_to(buf);
	}
}

impl RespEncoder for ValueKind {
	fn encode_to(&self, buf: &mut BytesMut) {
		match self {
			ValueKind::SimpleString(s) => encode_line(buf, SIMPLE_STRING, s),
			ValueKind::Error(e) => encode_line(buf, ERROR, e),
			ValueKind::Integer(i) => encode_line(buf, INTEGER, i.to_string().as_bytes()),
			ValueKind::BulkString(s) => {
				encode_length(buf, BULK_STRING, s.len());
				buf.put_slice(s);
				buf.put_slice(CRLF);
			}
			ValueKind::Array(arr) => {
				encode_length(buf, ARRAY, arr.len());
				arr.iter().for_each(|v| v.encode_to(buf));
			}
			ValueKind::Null => {
				buf.put_u8(NULL);
				buf.put_slice(CRLF);
			}
			ValueKind::Boolean(b) => encode_line(buf, BOOLEAN, if *b { b"t" } else { b"f" }),
			ValueKind::Double(d) => encode_double(buf, *d),
			ValueKind::Map(map) => {
				encode_length(buf, MAP, map.len());
				for (key, value) in map {
					key.encode_to(buf);
					value.encode_to(buf);
				}
			}
			ValueKind::Set(set) => {
				encode_length(buf, SET, set.len());
				set.iter().for_each(|v| v.encode_to(buf));
			}
		}
	}
}

#[inline]
fn encode_line(buf: &mut BytesMut, tag: u8, payload: &[u8]) {
	buf.put_u8(tag);
	buf.put_slice(payload);
	buf.put_slice(CRLF);
}

#[inline]
fn encode_length(buf: &mut BytesMut, tag: u8, length: usize) {
	encode_line(buf, tag, length.to_string().as_bytes());
}

#[inline]
fn encode_double(buf: &mut BytesMut, d: f64) {
	if d.is_nan() {
		encode_line(buf, DOUBLE, b"nan");
	} else if d.is_infinite() {
		let text: &[u8] = if d > 0.0 { b"inf" } else { b"-inf" };
		encode_line(buf, DOUBLE, text);
	} else {
		let mut text = d.to_string();
		if !text.contains('.') {
			text.push_str(".0");
		}
		encode_line(buf, DOUBLE, text.as_bytes());
	}
}
