//! Error types for RESP parsing and encoding.

use bytes::Bytes;
use thiserror::Error;

/// Main error type for RESP operations.
#[derive(Error, Debug)]
pub enum RespError {
	/// The byte stream did not contain a well-formed frame
	#[error("Protocol error: {0}")]
	Protocol(#[from] ProtocolError),

	/// The server answered with an error reply (`-ERR ...`)
	#[error("Server error: {}", String::from_utf8_lossy(.0))]
	Server(Bytes),

	/// A value could not be turned into a request argument
	#[error("Encode error: {0}")]
	Encode(#[from] EncodeError),

	/// The underlying transport failed
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl RespError {
	/// Whether the stream this error came from is no longer aligned on a
	/// frame boundary. RESP has no resync marker, so a poisoned connection
	/// must be dropped.
	pub fn is_poisoning(&self) -> bool {
		matches!(self, RespError::Protocol(_) | RespError::Io(_))
	}

	/// The message of a server error reply, if this is one.
	pub fn server_message(&self) -> Option<&Bytes> {
		match self {
			RespError::Server(msg) => Some(msg),
			_ => None,
		}
	}
}

/// Framing errors raised by the parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
	/// Unknown tag byte, malformed length, stray LF or non-numeric number
	#[error("Bad frame: {0}")]
	BadFrame(String),

	/// The stream ended in the middle of a frame
	#[error("Stream ended mid-frame")]
	Truncated,

	/// Declared bulk length exceeds the configured ceiling
	#[error("Bulk string length {0} exceeds the maximum")]
	OversizedBulk(i64),
}

/// Errors that can occur while building request arguments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
	/// The value has no RESP request representation
	#[error("Unsupported argument type: {0}")]
	UnsupportedType(String),
}

pub type Result<T> = std::result::Result<T, RespError>;

#[cfg(test)]
mod tests {
	use std::io;

	use super::*;

	#[test]
	fn test_poisoning_classification() {
		assert!(RespError::from(ProtocolError::Truncated).is_poisoning());
		assert!(RespError::from(io::Error::other("boom")).is_poisoning());
		assert!(!RespError::Server(Bytes::from_static(b"ERR bad")).is_poisoning());
		assert!(!RespError::from(EncodeError::UnsupportedType("u64".into())).is_poisoning());
	}

	#[test]
	fn test_server_error_display() {
		let err = RespError::Server(Bytes::from_static(b"ERR unknown command"));
		assert_eq!(err.to_string(), "Server error: ERR unknown command");
		assert_eq!(err.server_message().map(|m| &m[..]), Some(&b"ERR unknown command"[..]));
	}
}
