use std::error::Error;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;

use resp_decode::Pipeline;
use resp_inspect::config::Cli;
use resp_inspect::config::Parser;
use resp_inspect::config::setup;
use resp_inspect::render::render_line;
use tracing::error;
use tracing::info;

fn main() -> Result<(), Box<dyn Error>> {
	let args = Cli::parse();
	let config = setup(&args)?;
	telemetry::logger::init(&config.log_level)?;

	let buf = read_input(args.input.as_deref())?;
	info!(len = buf.len(), max_depth = config.max_depth, "Decoding input");

	let mut out = BufWriter::new(std::io::stdout().lock());
	let mut pipeline = Pipeline::with_options(&buf, config.decode_options());
	let mut count = 0usize;
	for result in pipeline.by_ref() {
		match result {
			Ok(value) => {
				writeln!(out, "{}", render_line(&value, config.format))?;
				count += 1;
			}
			Err(e) => {
				out.flush()?;
				error!(error = %e, decoded = count, "Failed to decode input");
				return Err(e.into());
			}
		}
	}
	out.flush()?;

	info!(decoded = count, end = pipeline.offset(), "Input fully decoded");
	Ok(())
}

fn read_input(path: Option<&str>) -> std::io::Result<Vec<u8>> {
	match path {
		None | Some("-") => {
			let mut buf = Vec::new();
			std::io::stdin().lock().read_to_end(&mut buf)?;
			Ok(buf)
		}
		Some(p) => std::fs::read(p),
	}
}
