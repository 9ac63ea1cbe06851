//! Wire constants and small helpers shared by the encoder and parser.

use crate::error::ProtocolError;

/// CRLF line ending
pub const CRLF: &[u8] = b"\r\n";
pub const CR: u8 = b'\r';
pub const LF: u8 = b'\n';

/// Type markers
pub const SIMPLE_STRING: u8 = b'+';
pub const ERROR: u8 = b'-';
pub const INTEGER: u8 = b':';
pub const BULK_STRING: u8 = b'$';
pub const ARRAY: u8 = b'*';

/// Length prefix that marks a null bulk string or null array.
pub const NULL_LENGTH: i64 = -1;

/// Initial capacity of the line buffer used while scanning for CR.
pub const LINE_BUFFER_SIZE: usize = 1024;

/// Largest bulk string (and line) accepted by default.
pub const DEFAULT_MAX_BULK_LEN: usize = i32::MAX as usize;

/// Deepest array nesting accepted by default. Parsing recurses once per
/// level, so this has to fit a 2 MiB thread stack in a debug build.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Parse a RESP number field: an optional `-` followed by ASCII digits.
///
/// `str::parse` alone would also accept a leading `+`, so the shape is
/// checked first.
#[inline]
pub fn parse_integer(line: &[u8]) -> Result<i64, ProtocolError> {
	let digits = line.strip_prefix(b"-").unwrap_or(line);
	if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
		return Err(ProtocolError::BadFrame(format!(
			"invalid number field: {:?}",
			String::from_utf8_lossy(line)
		)));
	}

	// Only ASCII bytes remain, so this cannot fail.
	let s = std::str::from_utf8(line).map_err(|e| ProtocolError::BadFrame(e.to_string()))?;
	s.parse::<i64>().map_err(|e| {
		ProtocolError::BadFrame(format!("number field out of range: {} ({})", s, e))
	})
}

/// Render a byte for error messages: printable ASCII as a char, anything
/// else as hex.
pub fn describe_byte(b: u8) -> String {
	if b.is_ascii_graphic() {
		format!("'{}'", b as char)
	} else {
		format!("0x{:02X}", b)
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case(b"0", 0)]
	#[case(b"123", 123)]
	#[case(b"-456", -456)]
	#[case(b"-1", -1)]
	#[case(b"9223372036854775807", i64::MAX)]
	#[case(b"-9223372036854775808", i64::MIN)]
	fn test_parse_integer(#[case] input: &[u8], #[case] expected: i64) {
		assert_eq!(parse_integer(input).unwrap(), expected);
	}

	#[rstest]
	#[case(b"")]
	#[case(b"-")]
	#[case(b"+5")]
	#[case(b"abc")]
	#[case(b"1 2")]
	#[case(b" 12")]
	#[case(b"--1")]
	#[case(b"9223372036854775808")]
	fn test_parse_integer_rejects(#[case] input: &[u8]) {
		assert!(matches!(
			parse_integer(input),
			Err(ProtocolError::BadFrame(_))
		));
	}

	#[test]
	fn test_describe_byte() {
		assert_eq!(describe_byte(b'?'), "'?'");
		assert_eq!(describe_byte(0x01), "0x01");
		assert_eq!(describe_byte(b' '), "0x20");
	}
}
