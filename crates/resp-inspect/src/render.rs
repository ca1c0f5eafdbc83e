//! Text renderings of decoded values.
//!
//! Map entries and set members have no wire order once decoded, so both
//! renderings sort them to keep output stable between runs.

use resp_decode::DecodedValue;
use resp_decode::ValueKind;
use serde_json::Value;
use serde_json::json;

use crate::config::OutputFormat;

/// One output line: `<end_offset>\t<rendering>`.
pub fn render_line(value: &DecodedValue, format: OutputFormat) -> String {
	let rendering = match format {
		OutputFormat::Debug => render_debug(value),
		OutputFormat::Json => render_json(value).to_string(),
	};
	format!("{}\t{}", value.end_offset(), rendering)
}

/// Type-annotated tree, e.g. `(set) {"Hello", "World"}`.
pub fn render_debug(value: &DecodedValue) -> String {
	format!("({}) {}", value.type_name(), render_plain(value.kind()))
}

fn render_plain(kind: &ValueKind) -> String {
	match kind {
		ValueKind::SimpleString(s) | ValueKind::BulkString(s) => quote(s),
		ValueKind::Error(e) => format!("error({})", quote(e)),
		ValueKind::Integer(i) => i.to_string(),
		ValueKind::Null => "nil".to_string(),
		ValueKind::Boolean(b) => b.to_string(),
		ValueKind::Double(d) => render_double(*d),
		ValueKind::Array(arr) => {
			let items: Vec<String> = arr.iter().map(|v| render_plain(v.kind())).collect();
			format!("[{}]", items.join(", "))
		}
		ValueKind::Map(map) => {
			let mut items: Vec<String> = map
				.iter()
				.map(|(k, v)| format!("{}: {}", render_plain(k.kind()), render_plain(v.kind())))
				.collect();
			items.sort();
			format!("{{{}}}", items.join(", "))
		}
		ValueKind::Set(set) => {
			let mut items: Vec<String> = set.iter().map(|v| render_plain(v.kind())).collect();
			items.sort();
			format!("{{{}}}", items.join(", "))
		}
	}
}

fn quote(bytes: &[u8]) -> String {
	format!("\"{}\"", bytes.escape_ascii())
}

fn render_double(d: f64) -> String {
	if d.is_nan() {
		"nan".to_string()
	} else if d.is_infinite() {
		let text = if d > 0.0 { "inf" } else { "-inf" };
		text.to_string()
	} else {
		format!("{:?}", d)
	}
}

/// JSON document for one value.
///
/// Strings are decoded lossily as UTF-8. Non-finite doubles become the
/// strings `"inf"`, `"-inf"` and `"nan"`. Maps become arrays of `[key, value]`
/// pairs since RESP keys need not be strings.
pub fn render_json(value: &DecodedValue) -> Value {
	match value.kind() {
		ValueKind::SimpleString(s) | ValueKind::BulkString(s) => {
			Value::String(String::from_utf8_lossy(s).into_owned())
		}
		ValueKind::Error(e) => json!({ "error": String::from_utf8_lossy(e) }),
		ValueKind::Integer(i) => json!(i),
		ValueKind::Null => Value::Null,
		ValueKind::Boolean(b) => Value::Bool(*b),
		ValueKind::Double(d) => serde_json::Number::from_f64(*d)
			.map(Value::Number)
			.unwrap_or_else(|| Value::String(render_double(*d))),
		ValueKind::Array(arr) => Value::Array(arr.iter().map(render_json).collect()),
		ValueKind::Map(map) => {
			let mut pairs: Vec<Value> = map
				.iter()
				.map(|(k, v)| Value::Array(vec![render_json(k), render_json(v)]))
				.collect();
			pairs.sort_by_cached_key(|pair| pair.to_string());
			Value::Array(pairs)
		}
		ValueKind::Set(set) => {
			let mut members: Vec<Value> = set.iter().map(render_json).collect();
			members.sort_by_cached_key(|member| member.to_string());
			Value::Array(members)
		}
	}
}
