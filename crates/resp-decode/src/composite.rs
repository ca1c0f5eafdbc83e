//! Open composites on the dispatcher's work stack.
//!
//! A frame is pushed when an array, map or set header with a non-zero count
//! is read. Children are absorbed in wire order until the count is reached,
//! then the frame is finished into a value ending where its last child ends.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::types::DecodedValue;
use crate::types::ValueKind;
use crate::utils::MIN_VALUE_LEN;

/// Which composite a header opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
	Array,
	Map,
	Set,
}

impl CompositeKind {
	/// Value for a header with a zero count.
	pub fn empty(self, end_offset: usize) -> DecodedValue {
		let kind = match self {
			CompositeKind::Array => ValueKind::Array(Vec::new()),
			CompositeKind::Map => ValueKind::Map(HashMap::new()),
			CompositeKind::Set => ValueKind::Set(HashSet::new()),
		};
		DecodedValue::new(kind, end_offset)
	}
}

#[derive(Debug)]
pub enum Frame {
	Array {
		remaining: usize,
		elements: Vec<DecodedValue>,
	},
	Map {
		remaining: usize,
		elements: HashMap<DecodedValue, DecodedValue>,
		key: Option<DecodedValue>,
	},
	Set {
		remaining: usize,
		elements: HashSet<DecodedValue>,
	},
}

impl Frame {
	/// Open a frame expecting `count` members (pairs for a map).
	///
	/// The preallocation is clamped by what the rest of the buffer could
	/// possibly hold, so a forged count cannot force a large allocation.
	pub fn open(kind: CompositeKind, count: usize, bytes_left: usize) -> Self {
		let per_member = match kind {
			CompositeKind::Map => MIN_VALUE_LEN * 2,
			CompositeKind::Array | CompositeKind::Set => MIN_VALUE_LEN,
		};
		let capacity = count.min(bytes_left / per_member);

		match kind {
			CompositeKind::Array => Frame::Array {
				remaining: count,
				elements: Vec::with_capacity(capacity),
			},
			CompositeKind::Map => Frame::Map {
				remaining: count,
				elements: HashMap::with_capacity(capacity),
				key: None,
			},
			CompositeKind::Set => Frame::Set {
				remaining: count,
				elements: HashSet::with_capacity(capacity),
			},
		}
	}

	/// Absorb the next decoded child.
	pub fn push(&mut self, value: DecodedValue) {
		match self {
			Frame::Array {
				remaining,
				elements,
			} => {
				elements.push(value);
				*remaining -= 1;
			}
			Frame::Map {
				remaining,
				elements,
				key,
			} => match key.take() {
				// Later pairs overwrite earlier ones with an equal key.
				Some(k) => {
					elements.insert(k, value);
					*remaining -= 1;
				}
				None => *key = Some(value),
			},
			Frame::Set {
				remaining,
				elements,
			} => {
				elements.insert(value);
				*remaining -= 1;
			}
		}
	}

	pub fn is_complete(&self) -> bool {
		match self {
			Frame::Array { remaining, .. } | Frame::Set { remaining, .. } => *remaining == 0,
			Frame::Map { remaining, key, .. } => *remaining == 0 && key.is_none(),
		}
	}

	/// Close the frame into a value ending at `end_offset`.
	pub fn finish(self, end_offset: usize) -> DecodedValue {
		let kind = match self {
			Frame::Array { elements, .. } => ValueKind::Array(elements),
			Frame::Map { elements, .. } => ValueKind::Map(elements),
			Frame::Set { elements, .. } => ValueKind::Set(elements),
		};
		DecodedValue::new(kind, end_offset)
	}
}

#[cfg(test)]
mod tests {
	use bytes::Bytes;

	use super::*;

	fn int(i: i64, end: usize) -> DecodedValue {
		DecodedValue::new(ValueKind::Integer(i), end)
	}

	#[test]
	fn test_array_frame() {
		let mut frame = Frame::open(CompositeKind::Array, 2, 100);
		assert!(!frame.is_complete());
		frame.push(int(1, 8));
		assert!(!frame.is_complete());
		frame.push(int(2, 12));
		assert!(frame.is_complete());

		let value = frame.finish(12);
		assert_eq!(value.end_offset(), 12);
		assert_eq!(value.as_array(), Some(&[int(1, 0), int(2, 0)][..]));
	}

	#[test]
	fn test_map_frame_overwrites_duplicate_keys() {
		let key = |end| DecodedValue::new(ValueKind::SimpleString(Bytes::from_static(b"k")), end);

		let mut frame = Frame::open(CompositeKind::Map, 2, 100);
		frame.push(key(7));
		assert!(!frame.is_complete());
		frame.push(int(1, 11));
		frame.push(key(15));
		assert!(!frame.is_complete());
		frame.push(int(2, 19));
		assert!(frame.is_complete());

		let value = frame.finish(19);
		let map = value.as_map().unwrap();
		assert_eq!(map.len(), 1);
		assert_eq!(map.get(&key(0)), Some(&int(2, 0)));
	}

	#[test]
	fn test_set_frame_collapses_duplicates() {
		let mut frame = Frame::open(CompositeKind::Set, 3, 100);
		frame.push(int(1, 8));
		frame.push(int(1, 12));
		frame.push(int(2, 16));
		assert!(frame.is_complete());
		assert_eq!(frame.finish(16).as_set().map(|s| s.len()), Some(2));
	}

	#[test]
	fn test_open_clamps_capacity() {
		match Frame::open(CompositeKind::Array, usize::MAX, 30) {
			Frame::Array { elements, remaining } => {
				assert_eq!(remaining, usize::MAX);
				assert!(elements.capacity() < 1024);
			}
			other => panic!("Expected array frame, got {:?}", other),
		}
	}

	#[test]
	fn test_empty() {
		assert_eq!(CompositeKind::Set.empty(4).as_set().map(|s| s.len()), Some(0));
		assert_eq!(CompositeKind::Map.empty(4).end_offset(), 4);
	}
}
