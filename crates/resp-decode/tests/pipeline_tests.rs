//! Decoding several messages laid back to back in one buffer

use resp_decode::DecodeOptions;
use resp_decode::Pipeline;
use resp_decode::ProtocolError;

#[test]
fn test_pipeline_two_values() {
	let values: Vec<_> = Pipeline::new(b"+OK\r\n:1\r\n")
		.collect::<Result<_, _>>()
		.unwrap();
	assert_eq!(values.len(), 2);
	assert_eq!(values[0].as_str(), Some("OK"));
	assert_eq!(values[0].end_offset(), 5);
	assert_eq!(values[1].as_integer(), Some(1));
	assert_eq!(values[1].end_offset(), 9);
}

#[test]
fn test_pipeline_commands() {
	let buf = b"*1\r\n$4\r\nPING\r\n*2\r\n$3\r\nGET\r\n$3\r\nkey\r\n*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n";
	let commands: Vec<Vec<String>> = Pipeline::new(buf)
		.map(|v| {
			v.unwrap()
				.as_array()
				.unwrap()
				.iter()
				.map(|arg| arg.as_str().unwrap().to_string())
				.collect()
		})
		.collect();

	assert_eq!(
		commands,
		vec![
			vec!["PING".to_string()],
			vec!["GET".to_string(), "key".to_string()],
			vec!["SET".to_string(), "k".to_string(), "v".to_string()],
		]
	);
}

#[test]
fn test_pipeline_matches_decode_at() {
	let buf = b"~2\r\n+a\r\n+b\r\n%1\r\n:1\r\n#t\r\n,2.5\r\n";
	let mut offset = 0;
	for value in Pipeline::new(buf) {
		let value = value.unwrap();
		assert_eq!(value, resp_decode::decode_at(buf, offset).unwrap());
		offset = value.end_offset();
	}
	assert_eq!(offset, buf.len());
}

#[test]
fn test_pipeline_incomplete_tail() {
	let mut pipeline = Pipeline::new(b"+OK\r\n$5\r\nhel");
	assert!(pipeline.next().unwrap().is_ok());

	let err = pipeline.next().unwrap().unwrap_err();
	assert!(err.is_truncated());
	// The caller can keep the partial message for the next read.
	assert_eq!(pipeline.remaining(), b"$5\r\nhel");
	assert!(pipeline.next().is_none());
}

#[test]
fn test_pipeline_respects_options() {
	let options = DecodeOptions::new().max_depth(1);
	let results: Vec<_> = Pipeline::with_options(b"*1\r\n:1\r\n*1\r\n*1\r\n:2\r\n", options).collect();
	assert_eq!(results.len(), 2);
	assert!(results[0].is_ok());
	assert_eq!(
		results[1],
		Err(ProtocolError::DepthLimitExceeded {
			depth: 2,
			offset: 12
		})
	);
}
