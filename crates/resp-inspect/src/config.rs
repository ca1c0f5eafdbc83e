//! Configuration for the inspector.
//!
//! Values come from an optional file (TOML, JSON or YAML, picked by
//! extension), then explicitly given command-line flags override them.
//!
//! # Example
//!
//! ```no_run
//! use resp_inspect::config::{Cli, Parser, setup};
//!
//! let config = setup(&Cli::parse())?;
//! println!("max depth: {}", config.max_depth);
//! # Ok::<(), resp_inspect::config::ConfigError>(())
//! ```

use std::path::Path;

pub use clap::Parser;
use clap::ValueEnum;
use resp_decode::DEFAULT_MAX_DEPTH;
use resp_decode::DecodeOptions;
use resp_decode::MAX_DEPTH_LIMIT;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

const DEFAULT_CONFIG: &str = "conf/inspect.toml";

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("Failed to read configuration file '{path}': {source}")]
	Io {
		source: std::io::Error,
		path: String,
	},

	#[error("Failed to parse TOML configuration: {0}")]
	TomlParse(#[from] toml::de::Error),

	#[error("Failed to parse JSON configuration: {0}")]
	JsonParse(#[from] serde_json::Error),

	#[error("Failed to parse YAML configuration: {0}")]
	YamlParse(#[from] serde_yaml::Error),

	#[error("Unsupported configuration format: {0}")]
	UnsupportedFormat(String),

	#[error("Configuration file has no extension")]
	NoExtension,

	#[error("max_depth {depth} exceeds the supported limit of {limit}")]
	InvalidMaxDepth { depth: usize, limit: usize },
}

/// How each decoded value is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
	/// Type-annotated tree
	#[default]
	Debug,
	/// One JSON document per value
	Json,
}

/// Command-line arguments for the inspector
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Decode a stream of RESP values", long_about = None)]
pub struct Cli {
	/// Configuration file path (TOML, JSON, or YAML).
	/// Defaults to conf/inspect.toml if it exists.
	#[arg(short, long)]
	pub config: Option<String>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long)]
	pub log_level: Option<String>,

	/// Maximum nesting depth of arrays, maps and sets
	#[arg(long)]
	pub max_depth: Option<usize>,

	/// Output format
	#[arg(short, long, value_enum)]
	pub format: Option<OutputFormat>,

	/// Input file; reads stdin when absent or "-"
	pub input: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct InspectConfig {
	pub log_level: String,
	pub max_depth: usize,
	pub format: OutputFormat,
}

impl Default for InspectConfig {
	fn default() -> Self {
		Self {
			log_level: "warn".into(),
			max_depth: DEFAULT_MAX_DEPTH,
			format: OutputFormat::Debug,
		}
	}
}

impl InspectConfig {
	pub fn decode_options(&self) -> DecodeOptions {
		DecodeOptions::new().max_depth(self.max_depth)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.max_depth > MAX_DEPTH_LIMIT {
			return Err(ConfigError::InvalidMaxDepth {
				depth: self.max_depth,
				limit: MAX_DEPTH_LIMIT,
			});
		}
		Ok(())
	}

	/// Apply flags that were given explicitly on the command line.
	pub fn merge_cli(&mut self, args: &Cli) {
		if let Some(log_level) = &args.log_level {
			self.log_level = log_level.clone();
		}
		if let Some(depth) = args.max_depth {
			self.max_depth = depth;
		}
		if let Some(format) = args.format {
			self.format = format;
		}
	}
}

/// Build the effective configuration from a config file and the CLI flags.
pub fn setup(args: &Cli) -> Result<InspectConfig, ConfigError> {
	let mut config = match args.config.as_deref() {
		Some(p) => load_from_file(p)?,
		None if Path::new(DEFAULT_CONFIG).exists() => load_from_file(DEFAULT_CONFIG)?,
		None => InspectConfig::default(),
	};
	config.merge_cli(args);
	config.validate()?;
	Ok(config)
}

pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<InspectConfig, ConfigError> {
	let path_ref = path.as_ref();
	let content = std::fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
		path: path_ref.display().to_string(),
		source,
	})?;

	let extension = path_ref
		.extension()
		.and_then(|ext| ext.to_str())
		.ok_or(ConfigError::NoExtension)?;

	match extension.to_lowercase().as_str() {
		"toml" => Ok(toml::from_str(&content)?),
		"json" => Ok(serde_json::from_str(&content)?),
		"yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
		_ => Err(ConfigError::UnsupportedFormat(extension.to_string())),
	}
}
