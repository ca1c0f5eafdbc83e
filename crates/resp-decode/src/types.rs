//! Decoded value tree.
//!
//! Every node records the offset right after its own encoding. Equality and
//! hashing look only at the variant and payload, so two values decoded at
//! different positions compare equal when their contents match.

use std::collections::HashMap;
use std::collections::HashSet;
use std::hash::BuildHasher;
use std::hash::BuildHasherDefault;
use std::hash::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

use bytes::Bytes;

/// Payload of a decoded RESP value.
#[derive(Debug, Clone)]
pub enum ValueKind {
	// RESP2 types
	/// Simple string: `+OK\r\n`
	SimpleString(Bytes),

	/// Error: `-ERR message\r\n`
	Error(Bytes),

	/// Integer: `:1000\r\n`
	Integer(i64),

	/// Bulk string: `$6\r\nfoobar\r\n`
	BulkString(Bytes),

	/// Array: `*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n`
	Array(Vec<DecodedValue>),

	// RESP3 types
	/// Null: `_\r\n`, or the RESP2 forms `$-1\r\n` and `*-1\r\n`
	Null,

	/// Boolean: `#t\r\n` or `#f\r\n`
	Boolean(bool),

	/// Double: `,3.14\r\n`
	Double(f64),

	/// Map: `%2\r\n+first\r\n:1\r\n+second\r\n:2\r\n`
	Map(HashMap<DecodedValue, DecodedValue>),

	/// Set: `~2\r\n+orange\r\n+apple\r\n`
	Set(HashSet<DecodedValue>),
}

/// A RESP value together with the offset where its encoding ends.
#[derive(Debug, Clone)]
pub struct DecodedValue {
	kind: ValueKind,
	end_offset: usize,
}

impl DecodedValue {
	pub fn new(kind: ValueKind, end_offset: usize) -> Self {
		Self { kind, end_offset }
	}

	/// Offset in the source buffer immediately after this value.
	pub fn end_offset(&self) -> usize {
		self.end_offset
	}

	pub fn kind(&self) -> &ValueKind {
		&self.kind
	}

	pub fn into_kind(self) -> ValueKind {
		self.kind
	}

	/// Short lowercase name of the variant.
	pub fn type_name(&self) -> &'static str {
		match self.kind {
			ValueKind::SimpleString(_) => "simple-string",
			ValueKind::Error(_) => "error",
			ValueKind::Integer(_) => "integer",
			ValueKind::BulkString(_) => "bulk-string",
			ValueKind::Array(_) => "array",
			ValueKind::Null => "null",
			ValueKind::Boolean(_) => "boolean",
			ValueKind::Double(_) => "double",
			ValueKind::Map(_) => "map",
			ValueKind::Set(_) => "set",
		}
	}

	/// Check if the value is an error
	pub fn is_error(&self) -> bool {
		matches!(self.kind, ValueKind::Error(_))
	}

	/// Check if the value is null
	pub fn is_null(&self) -> bool {
		matches!(self.kind, ValueKind::Null)
	}

	/// Try to convert to a string slice
	pub fn as_str(&self) -> Option<&str> {
		match &self.kind {
			ValueKind::SimpleString(s) | ValueKind::Error(s) | ValueKind::BulkString(s) => {
				std::str::from_utf8(s).ok()
			}
			_ => None,
		}
	}

	/// Try to convert to bytes
	pub fn as_bytes(&self) -> Option<&Bytes> {
		match &self.kind {
			ValueKind::SimpleString(b) | ValueKind::Error(b) | ValueKind::BulkString(b) => Some(b),
			_ => None,
		}
	}

	pub fn as_integer(&self) -> Option<i64> {
		match self.kind {
			ValueKind::Integer(i) => Some(i),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self.kind {
			ValueKind::Boolean(b) => Some(b),
			_ => None,
		}
	}

	pub fn as_double(&self) -> Option<f64> {
		match self.kind {
			ValueKind::Double(d) => Some(d),
			_ => None,
		}
	}

	pub fn as_array(&self) -> Option<&[DecodedValue]> {
		match &self.kind {
			ValueKind::Array(a) => Some(a),
			_ => None,
		}
	}

	pub fn as_map(&self) -> Option<&HashMap<DecodedValue, DecodedValue>> {
		match &self.kind {
			ValueKind::Map(m) => Some(m),
			_ => None,
		}
	}

	pub fn as_set(&self) -> Option<&HashSet<DecodedValue>> {
		match &self.kind {
			ValueKind::Set(s) => Some(s),
			_ => None,
		}
	}
}

impl PartialEq for ValueKind {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(ValueKind::SimpleString(a), ValueKind::SimpleString(b))
			| (ValueKind::Error(a), ValueKind::Error(b))
			| (ValueKind::BulkString(a), ValueKind::BulkString(b)) => a == b,
			(ValueKind::Integer(a), ValueKind::Integer(b)) => a == b,
			(ValueKind::Null, ValueKind::Null) => true,
			(ValueKind::Boolean(a), ValueKind::Boolean(b)) => a == b,
			// Bitwise so that Eq stays reflexive for NaN and agrees with Hash.
			(ValueKind::Double(a), ValueKind::Double(b)) => a.to_bits() == b.to_bits(),
			(ValueKind::Array(a), ValueKind::Array(b)) => a == b,
			(ValueKind::Map(a), ValueKind::Map(b)) => a == b,
			(ValueKind::Set(a), ValueKind::Set(b)) => a == b,
			_ => false,
		}
	}
}

impl Eq for ValueKind {}

impl Hash for ValueKind {
	fn hash<H: Hasher>(&self, state: &mut H) {
		std::mem::discriminant(self).hash(state);
		match self {
			ValueKind::SimpleString(s) | ValueKind::Error(s) | ValueKind::BulkString(s) => {
				s.hash(state)
			}
			ValueKind::Integer(i) => i.hash(state),
			ValueKind::Null => {}
			ValueKind::Boolean(b) => b.hash(state),
			ValueKind::Double(d) => d.to_bits().hash(state),
			ValueKind::Array(items) => items.hash(state),
			ValueKind::Map(m) => {
				m.len().hash(state);
				unordered_hash(m.iter()).hash(state);
			}
			ValueKind::Set(s) => {
				s.len().hash(state);
				unordered_hash(s.iter()).hash(state);
			}
		}
	}
}

/// Sum of per-member hashes, independent of iteration order.
///
/// Members are hashed with a fixed-key hasher so equal collections agree
/// no matter which `HashMap` seeds built them.
fn unordered_hash<T: Hash>(members: impl Iterator<Item = T>) -> u64 {
	let build = BuildHasherDefault::<DefaultHasher>::default();
	members
		.map(|member| build.hash_one(member))
		.fold(0u64, u64::wrapping_add)
}

// The end offset is deliberately left out of equality and hashing.
impl PartialEq for DecodedValue {
	fn eq(&self, other: &Self) -> bool {
		self.kind == other.kind
	}
}

impl Eq for DecodedValue {}

impl Hash for DecodedValue {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.kind.hash(state);
	}
}

#[cfg(test)]
mod tests {
	use std::collections::hash_map::DefaultHasher;

	use super::*;

	fn hash_of(value: &DecodedValue) -> u64 {
		let mut hasher = DefaultHasher::new();
		value.hash(&mut hasher);
		hasher.finish()
	}

	fn simple(s: &'static str, end: usize) -> DecodedValue {
		DecodedValue::new(ValueKind::SimpleString(Bytes::from_static(s.as_bytes())), end)
	}

	#[test]
	fn test_equality_ignores_offset() {
		let a = simple("Hello", 8);
		let b = simple("Hello", 120);
		assert_eq!(a, b);
		assert_eq!(hash_of(&a), hash_of(&b));
	}

	#[test]
	fn test_variant_matters() {
		let s = simple("OK", 5);
		let b = DecodedValue::new(ValueKind::BulkString(Bytes::from_static(b"OK")), 8);
		let e = DecodedValue::new(ValueKind::Error(Bytes::from_static(b"OK")), 5);
		assert_ne!(s, b);
		assert_ne!(s, e);
		assert_ne!(hash_of(&s), hash_of(&b));
	}

	fn map_of(pairs: &[(i64, i64)]) -> DecodedValue {
		let map = pairs
			.iter()
			.map(|&(k, v)| {
				(
					DecodedValue::new(ValueKind::Integer(k), 0),
					DecodedValue::new(ValueKind::Integer(v), 0),
				)
			})
			.collect();
		DecodedValue::new(ValueKind::Map(map), 0)
	}

	#[test]
	fn test_map_hash_ignores_order_but_not_content() {
		let forward = map_of(&[(1, 10), (2, 20), (3, 30)]);
		let backward = map_of(&[(3, 30), (2, 20), (1, 10)]);
		assert_eq!(forward, backward);
		assert_eq!(hash_of(&forward), hash_of(&backward));

		// Same size, different entries.
		assert_ne!(hash_of(&map_of(&[(1, 0)])), hash_of(&map_of(&[(2, 0)])));
		assert_ne!(hash_of(&map_of(&[(1, 0)])), hash_of(&map_of(&[(1, 1)])));
	}

	#[test]
	fn test_set_hash_depends_on_members() {
		let set_of = |items: &[&'static str]| {
			let set = items.iter().map(|&s| simple(s, 0)).collect();
			DecodedValue::new(ValueKind::Set(set), 0)
		};
		assert_eq!(hash_of(&set_of(&["a", "b"])), hash_of(&set_of(&["b", "a"])));
		assert_ne!(hash_of(&set_of(&["a", "b"])), hash_of(&set_of(&["a", "c"])));
	}

	#[test]
	fn test_double_equality() {
		let nan1 = DecodedValue::new(ValueKind::Double(f64::NAN), 6);
		let nan2 = DecodedValue::new(ValueKind::Double(f64::NAN), 30);
		assert_eq!(nan1, nan2);

		let zero = DecodedValue::new(ValueKind::Double(0.0), 6);
		let neg_zero = DecodedValue::new(ValueKind::Double(-0.0), 7);
		assert_ne!(zero, neg_zero);
	}

	#[test]
	fn test_set_collapses_offset_duplicates() {
		let mut set = HashSet::new();
		set.insert(simple("a", 4));
		set.insert(simple("a", 8));
		set.insert(simple("b", 12));
		assert_eq!(set.len(), 2);
	}

	#[test]
	fn test_nested_collections_as_keys() {
		let inner_a: HashSet<_> = [simple("x", 4), simple("y", 8)].into_iter().collect();
		let inner_b: HashSet<_> = [simple("y", 30), simple("x", 40)].into_iter().collect();
		let a = DecodedValue::new(ValueKind::Set(inner_a), 8);
		let b = DecodedValue::new(ValueKind::Set(inner_b), 40);
		assert_eq!(a, b);
		assert_eq!(hash_of(&a), hash_of(&b));

		let mut map = HashMap::new();
		map.insert(a, DecodedValue::new(ValueKind::Integer(1), 50));
		map.insert(b, DecodedValue::new(ValueKind::Integer(2), 90));
		assert_eq!(map.len(), 1);
	}

	#[test]
	fn test_accessors() {
		let val = simple("hello", 8);
		assert_eq!(val.as_str(), Some("hello"));
		assert_eq!(val.as_integer(), None);
		assert_eq!(val.end_offset(), 8);
		assert_eq!(val.type_name(), "simple-string");

		let num = DecodedValue::new(ValueKind::Integer(42), 5);
		assert_eq!(num.as_integer(), Some(42));
		assert_eq!(num.as_str(), None);

		let err = DecodedValue::new(ValueKind::Error(Bytes::from_static(b"ERR")), 6);
		assert!(err.is_error());
		assert!(!val.is_error());

		let null = DecodedValue::new(ValueKind::Null, 3);
		assert!(null.is_null());
		assert!(matches!(null.into_kind(), ValueKind::Null));
	}
}
