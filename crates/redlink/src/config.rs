//! Connection configuration.
//!
//! A [`ClientConfig`] can be built in code, loaded from a TOML, JSON or YAML
//! file, or parsed from a `redis://host:port` URL. Nothing is read from the
//! environment.
//!
//! # Example
//!
//! ```
//! use redlink::ClientConfig;
//!
//! let config = ClientConfig::from_url("redis://10.0.0.5:6380").unwrap();
//! assert_eq!(config.addr(), "10.0.0.5:6380");
//! assert_eq!(config.input_buffer_size, 64 * 1024);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::transport::BufferSizes;

pub const DEFAULT_PORT: u16 = 6379;

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

	#[error("Invalid connection URL '{url}': {reason}")]
	InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
	pub host: String,
	pub port: u16,
	pub input_buffer_size: usize,
	pub output_buffer_size: usize,
	pub connect_timeout_ms: Option<u64>,
	/// Bounds every blocking read. A timeout poisons the connection.
	pub read_timeout_ms: Option<u64>,
	pub write_timeout_ms: Option<u64>,
	pub nodelay: bool,
	pub max_bulk_len: usize,
	pub max_depth: usize,
}

impl Default for ClientConfig {
	fn default() -> Self {
		let buffers = BufferSizes::default();
		Self {
			host: "127.0.0.1".into(),
			port: DEFAULT_PORT,
			input_buffer_size: buffers.input,
			output_buffer_size: buffers.output,
			connect_timeout_ms: None,
			read_timeout_ms: None,
			write_timeout_ms: None,
			nodelay: true,
			max_bulk_len: resp::DEFAULT_MAX_BULK_LEN,
			max_depth: resp::DEFAULT_MAX_DEPTH,
		}
	}
}

impl ClientConfig {
	pub fn new(host: impl Into<String>, port: u16) -> Self {
		Self {
			host: host.into(),
			port,
			..Self::default()
		}
	}

	/// Parse `redis://host[:port]` (or `tcp://`). A missing port means 6379.
	pub fn from_url(input: &str) -> Result<Self, ConfigError> {
		let invalid = |reason: String| ConfigError::InvalidUrl {
			url: input.to_string(),
			reason,
		};

		let url = Url::parse(input).map_err(|e| invalid(e.to_string()))?;
		if !matches!(url.scheme(), "redis" | "tcp") {
			return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
		}
		let host = url
			.host_str()
			.filter(|h| !h.is_empty())
			.ok_or_else(|| invalid("missing host".into()))?;
		// IPv6 hosts come back bracketed.
		let host = host.trim_start_matches('[').trim_end_matches(']');

		Ok(Self::new(host, url.port().unwrap_or(DEFAULT_PORT)))
	}

	/// Load from a file, choosing the format by extension.
	pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
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

	pub fn addr(&self) -> String {
		if self.host.contains(':') {
			format!("[{}]:{}", self.host, self.port)
		} else {
			format!("{}:{}", self.host, self.port)
		}
	}

	pub fn buffer_sizes(&self) -> BufferSizes {
		BufferSizes {
			input: self.input_buffer_size,
			output: self.output_buffer_size,
		}
	}

	pub fn connect_timeout(&self) -> Option<Duration> {
		self.connect_timeout_ms.map(Duration::from_millis)
	}

	pub fn read_timeout(&self) -> Option<Duration> {
		self.read_timeout_ms.map(Duration::from_millis)
	}

	pub fn write_timeout(&self) -> Option<Duration> {
		self.write_timeout_ms.map(Duration::from_millis)
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[test]
	fn test_defaults() {
		let config = ClientConfig::default();
		assert_eq!(config.addr(), "127.0.0.1:6379");
		assert_eq!(config.buffer_sizes(), BufferSizes::default());
		assert_eq!(config.max_bulk_len, i32::MAX as usize);
		assert_eq!(config.read_timeout(), None);
		assert!(config.nodelay);
	}

	#[rstest]
	#[case("redis://localhost", "localhost", 6379)]
	#[case("redis://10.1.2.3:7000", "10.1.2.3", 7000)]
	#[case("tcp://cache.internal:6380/", "cache.internal", 6380)]
	#[case("redis://[::1]:6379", "::1", 6379)]
	fn test_from_url(#[case] input: &str, #[case] host: &str, #[case] port: u16) {
		let config = ClientConfig::from_url(input).unwrap();
		assert_eq!(config.host, host);
		assert_eq!(config.port, port);
	}

	#[rstest]
	#[case("http://localhost:6379")]
	#[case("not a url")]
	#[case("redis://:6379")]
	fn test_from_url_rejects(#[case] input: &str) {
		assert!(matches!(
			ClientConfig::from_url(input),
			Err(ConfigError::InvalidUrl { .. })
		));
	}

	#[test]
	fn test_ipv6_addr() {
		assert_eq!(ClientConfig::new("::1", 6379).addr(), "[::1]:6379");
	}

	#[test]
	fn test_parse_toml() {
		let dir = tempfile::tempdir().unwrap();
		let file_path = dir.path().join("client.toml");
		let content = r#"
host = "10.0.0.1"
port = 1234
input_buffer_size = 4096
read_timeout_ms = 1500
"#;
		std::fs::write(&file_path, content).unwrap();

		let config = ClientConfig::load_from_file(&file_path).unwrap();
		assert_eq!(config.host, "10.0.0.1");
		assert_eq!(config.port, 1234);
		assert_eq!(config.input_buffer_size, 4096);
		assert_eq!(config.output_buffer_size, 64 * 1024);
		assert_eq!(config.read_timeout(), Some(Duration::from_millis(1500)));
	}

	#[test]
	fn test_parse_json() {
		let dir = tempfile::tempdir().unwrap();
		let file_path = dir.path().join("client.json");
		let content = r#"
{
  "host": "127.0.0.1",
  "port": 1234,
  "nodelay": false,
  "max_depth": 16
}
"#;
		std::fs::write(&file_path, content).unwrap();

		let config = ClientConfig::load_from_file(&file_path).unwrap();
		assert_eq!(config.port, 1234);
		assert!(!config.nodelay);
		assert_eq!(config.max_depth, 16);
	}

	#[test]
	fn test_parse_yaml() {
		let dir = tempfile::tempdir().unwrap();
		let file_path = dir.path().join("client.yml");
		let content = r#"
host: "127.0.0.1"
port: 1234
write_timeout_ms: 250
"#;
		std::fs::write(&file_path, content).unwrap();

		let config = ClientConfig::load_from_file(&file_path).unwrap();
		assert_eq!(config.port, 1234);
		assert_eq!(config.write_timeout(), Some(Duration::from_millis(250)));
	}

	#[test]
	fn test_unsupported_format() {
		let dir = tempfile::tempdir().unwrap();
		let file_path = dir.path().join("client.ini");
		std::fs::write(&file_path, "port=1").unwrap();
		assert!(matches!(
			ClientConfig::load_from_file(&file_path),
			Err(ConfigError::UnsupportedFormat(ext)) if ext == "ini"
		));

		let no_ext = dir.path().join("client");
		std::fs::write(&no_ext, "port=1").unwrap();
		assert!(matches!(
			ClientConfig::load_from_file(&no_ext),
			Err(ConfigError::NoExtension)
		));
	}

	#[test]
	fn test_missing_file() {
		assert!(matches!(
			ClientConfig::load_from_file("/nonexistent/client.toml"),
			Err(ConfigError::Io { .. })
		));
	}
}
