use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const VALID_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Errors raised while configuring logging.
#[derive(Error, Debug)]
pub enum TelemetryError {
	#[error("Invalid log level: {0}")]
	InvalidLogLevel(String),

	#[error("Logger is already initialized")]
	AlreadyInitialized,
}

/// Custom time formatter that displays time as "YYYY-MM-DD HH:MM:SS.micros"
struct CustomTimeFormat;

impl FormatTime for CustomTimeFormat {
	fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
		let now = std::time::SystemTime::now();
		let datetime: chrono::DateTime<chrono::Local> = now.into();
		write!(w, "{}", datetime.format("[%Y-%m-%d %H:%M:%S%.6f]"))
	}
}

/// Validate a level name and return it lowercased.
fn normalize_level(level: &str) -> Result<String, TelemetryError> {
	let level_lower = level.to_lowercase();
	if VALID_LEVELS.contains(&level_lower.as_str()) {
		Ok(level_lower)
	} else {
		Err(TelemetryError::InvalidLogLevel(level.to_string()))
	}
}

/// Initialize the logger with the provided log level
///
/// This sets up a logger on stderr with:
/// - The log level from the `level` parameter
/// - Structured output with timestamps in format: YYYY-MM-DD HH:MM:SS.micros
///
/// Stdout is left to the program's own output.
///
/// # Example
///
/// ```no_run
/// telemetry::logger::init("info")?;
/// tracing::info!("Inspector starting");
/// # Ok::<(), telemetry::TelemetryError>(())
/// ```
///
/// # Errors
///
/// Returns an error if the level is invalid or a global subscriber is
/// already installed.
pub fn init(level: &str) -> Result<(), TelemetryError> {
	let env_filter = EnvFilter::new(normalize_level(level)?);

	tracing_subscriber::registry()
		.with(env_filter)
		.with(
			fmt::layer()
				.with_writer(std::io::stderr)
				.with_timer(CustomTimeFormat)
				.with_target(false)
				.with_thread_ids(true)
				.with_line_number(false)
				.with_file(false),
		)
		.try_init()
		.map_err(|_| TelemetryError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("trace", "trace")]
	#[case("debug", "debug")]
	#[case("info", "info")]
	#[case("WARN", "warn")]
	#[case("Error", "error")]
	fn test_valid_log_levels(#[case] level: &str, #[case] expected: &str) {
		assert_eq!(normalize_level(level).unwrap(), expected);
	}

	#[rstest]
	#[case("invalid")]
	#[case("warning")] // should be "warn"
	#[case("critical")]
	#[case("")]
	fn test_invalid_log_levels(#[case] level: &str) {
		assert!(matches!(
			normalize_level(level),
			Err(TelemetryError::InvalidLogLevel(_))
		));
		// Rejected before any subscriber is installed.
		assert!(matches!(init(level), Err(TelemetryError::InvalidLogLevel(_))));
	}

	#[test]
	fn test_second_init_fails() {
		// Only test in this binary that installs a subscriber.
		assert!(init("warn").is_ok());
		assert!(matches!(init("warn"), Err(TelemetryError::AlreadyInitialized)));
	}
}
