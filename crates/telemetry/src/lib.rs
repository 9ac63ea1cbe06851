//! Logger bootstrap for programs embedding the client.
//!
//! The library crates only emit records through the `log` facade. Host
//! programs, demos and tests call [`logger::init`] to get them printed.

pub mod logger;

use thiserror::Error;

// Re-export logger initialization for convenience
pub use logger::init;
pub use logger::reload_log_level;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
	#[error("Invalid log level: {0}")]
	InvalidLogLevel(String),

	#[error("Logger is not initialized")]
	NotInitialized,

	#[error("Failed to reload log level: {0}")]
	ReloadFailed(String),
}
