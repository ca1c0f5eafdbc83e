use resp_decode::Pipeline;

fn main() {
	println!("--- RESP Pipeline Decode Example ---");

	// One buffer holding several replies:
	// - A Simple String: "+OK\r\n"
	// - An Integer: ":1000\r\n"
	// - A Set: "~2\r\n+Hello\r\n+World\r\n"
	// - A truncated Bulk String at the tail
	let buffer = b"+OK\r\n:1000\r\n~2\r\n+Hello\r\n+World\r\n$5\r\nhel";

	let mut pipeline = Pipeline::new(buffer);
	for result in pipeline.by_ref() {
		match result {
			Ok(value) => {
				println!(
					"[Decoder] {} ending at {}: {:?}",
					value.type_name(),
					value.end_offset(),
					value.kind()
				);
			}
			Err(e) if e.is_truncated() => {
				println!("[Decoder] Incomplete tail, waiting for more data...");
			}
			Err(e) => {
				eprintln!("[Decoder] Error: {}", e);
			}
		}
	}

	println!(
		"[Decoder] {} bytes left unconsumed",
		pipeline.remaining().len()
	);
}
