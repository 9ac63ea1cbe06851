//! Blocking RESP parser over a buffered byte source.
//!
//! The parser keeps no state between calls to [`Parser::parse`]; everything
//! it knows about framing lives in the stream itself. As a consequence a
//! parse that fails part-way through a frame leaves the stream at an
//! unknown position. RESP has no resync marker, so after any
//! [`ProtocolError`] or I/O error the source must be discarded.

use std::io::BufRead;
use std::io::ErrorKind;
use std::io::Read;

use bytes::Bytes;

use crate::error::ProtocolError;
use crate::error::RespError;
use crate::error::Result;
use crate::types::Reply;
use crate::utils::*;

/// Initial allocation for a bulk payload. Larger payloads grow as bytes
/// actually arrive, so a hostile length prefix cannot reserve gigabytes.
const BULK_PREALLOC_LIMIT: usize = 64 * 1024;

/// Decodes RESP replies from a byte source.
pub struct Parser<R> {
	reader: R,
	max_bulk_len: usize,
	max_depth: usize,
}

impl<R: BufRead> Parser<R> {
	pub fn new(reader: R) -> Self {
		Self::with_limits(reader, DEFAULT_MAX_BULK_LEN, DEFAULT_MAX_DEPTH)
	}

	/// Build a parser with explicit ceilings on bulk/line length and array
	/// nesting.
	pub fn with_limits(reader: R, max_bulk_len: usize, max_depth: usize) -> Self {
		Self {
			reader,
			max_bulk_len,
			max_depth,
		}
	}

	/// Parse the next complete reply.
	///
	/// Returns `Ok(None)` when the source is closed exactly at a frame
	/// boundary. An error reply is raised as [`RespError::Server`] and leaves
	/// the stream usable; every other error poisons it.
	///
	/// An error reply nested in an array fails the whole array: the rest of
	/// the array is still consumed, but its other elements are discarded.
	pub fn parse(&mut self) -> Result<Option<Reply>> {
		match self.read_tag()? {
			Some(tag) => self.parse_value(tag, 0).map(Some),
			None => Ok(None),
		}
	}

	pub fn get_ref(&self) -> &R {
		&self.reader
	}

	pub fn get_mut(&mut self) -> &mut R {
		&mut self.reader
	}

	pub fn into_inner(self) -> R {
		self.reader
	}

	fn parse_value(&mut self, tag: u8, depth: usize) -> Result<Reply> {
		match tag {
			SIMPLE_STRING => Ok(Reply::SimpleString(self.read_line()?)),
			ERROR => Err(RespError::Server(self.read_line()?)),
			INTEGER => Ok(Reply::Integer(self.read_number()?)),
			BULK_STRING => self.parse_bulk_string(),
			ARRAY => self.parse_array(depth),
			other => Err(ProtocolError::BadFrame(format!(
				"unexpected type marker {}",
				describe_byte(other)
			))
			.into()),
		}
	}

	fn parse_bulk_string(&mut self) -> Result<Reply> {
		let length = self.read_number()?;
		if length == NULL_LENGTH {
			return Ok(Reply::Null);
		}
		if length < NULL_LENGTH {
			return Err(ProtocolError::BadFrame(format!("invalid bulk length {}", length)).into());
		}
		if length as u64 > self.max_bulk_len as u64 {
			return Err(ProtocolError::OversizedBulk(length).into());
		}

		let length = length as usize;
		let mut data = Vec::with_capacity(length.min(BULK_PREALLOC_LIMIT));
		// `take` loops over short reads until the payload is complete or the
		// source ends.
		let read = (&mut self.reader)
			.take(length as u64)
			.read_to_end(&mut data)
			.map_err(io_error)?;
		if read < length {
			return Err(ProtocolError::Truncated.into());
		}

		self.expect_crlf()?;
		Ok(Reply::BulkString(Bytes::from(data)))
	}

	fn parse_array(&mut self, depth: usize) -> Result<Reply> {
		let length = self.read_number()?;
		if length == NULL_LENGTH {
			return Ok(Reply::NullArray);
		}
		if length < NULL_LENGTH {
			return Err(ProtocolError::BadFrame(format!("invalid array length {}", length)).into());
		}
		if depth >= self.max_depth {
			return Err(ProtocolError::BadFrame(format!(
				"array nesting exceeds {} levels",
				self.max_depth
			))
			.into());
		}
		if length > i32::MAX as i64 {
			return Err(ProtocolError::BadFrame(format!("array length {} too large", length)).into());
		}

		let length = length as usize;
		let mut elements = Vec::with_capacity(length.min(LINE_BUFFER_SIZE));
		// Error replies inside an array (e.g. from EXEC) are held back until
		// the whole array is consumed so the stream stays aligned.
		let mut server_error = None;
		for _ in 0..length {
			let tag = self.read_tag()?.ok_or(ProtocolError::Truncated)?;
			match self.parse_value(tag, depth + 1) {
				Ok(value) => elements.push(value),
				Err(RespError::Server(msg)) => {
					server_error.get_or_insert(msg);
					elements.push(Reply::Null);
				}
				Err(e) => return Err(e),
			}
		}

		match server_error {
			Some(msg) => Err(RespError::Server(msg)),
			None => Ok(Reply::Array(elements)),
		}
	}

	/// Read one tag byte. `None` means the source is closed.
	fn read_tag(&mut self) -> Result<Option<u8>> {
		loop {
			match self.reader.fill_buf() {
				Ok([]) => return Ok(None),
				Ok(buf) => {
					let tag = buf[0];
					self.reader.consume(1);
					return Ok(Some(tag));
				}
				Err(e) if e.kind() == ErrorKind::Interrupted => continue,
				Err(e) => return Err(e.into()),
			}
		}
	}

	fn read_number(&mut self) -> Result<i64> {
		let line = self.read_line()?;
		Ok(parse_integer(&line)?)
	}

	/// Read bytes up to CR and require the following LF. The terminator is
	/// consumed but not returned.
	fn read_line(&mut self) -> Result<Bytes> {
		let mut line = Vec::with_capacity(LINE_BUFFER_SIZE);
		loop {
			let (found, used) = {
				let available = match self.reader.fill_buf() {
					Ok([]) => return Err(ProtocolError::Truncated.into()),
					Ok(buf) => buf,
					Err(e) if e.kind() == ErrorKind::Interrupted => continue,
					Err(e) => return Err(io_error(e).into()),
				};
				match memchr::memchr2(CR, LF, available) {
					Some(pos) if available[pos] == LF => {
						return Err(ProtocolError::BadFrame("LF without preceding CR".into()).into());
					}
					Some(pos) => {
						line.extend_from_slice(&available[..pos]);
						(true, pos + 1)
					}
					None => {
						line.extend_from_slice(available);
						(false, available.len())
					}
				}
			};
			self.reader.consume(used);

			if line.len() > self.max_bulk_len {
				return Err(ProtocolError::BadFrame(format!(
					"line exceeds {} bytes",
					self.max_bulk_len
				))
				.into());
			}
			if found {
				break;
			}
		}

		match self.read_byte()? {
			LF => Ok(Bytes::from(line)),
			other => Err(ProtocolError::BadFrame(format!(
				"expected LF after CR, found {}",
				describe_byte(other)
			))
			.into()),
		}
	}

	fn expect_crlf(&mut self) -> Result<()> {
		let mut terminator = [0u8; 2];
		self.reader.read_exact(&mut terminator).map_err(io_error)?;
		if terminator != *CRLF {
			return Err(ProtocolError::BadFrame(format!(
				"missing CRLF after bulk string, found {} {}",
				describe_byte(terminator[0]),
				describe_byte(terminator[1])
			))
			.into());
		}
		Ok(())
	}

	fn read_byte(&mut self) -> Result<u8> {
		let mut byte = [0u8; 1];
		self.reader.read_exact(&mut byte).map_err(io_error)?;
		Ok(byte[0])
	}
}

/// Inside a frame, running out of input is a framing error rather than a
/// transport failure.
fn io_error(e: std::io::Error) -> RespError {
	if e.kind() == ErrorKind::UnexpectedEof {
		ProtocolError::Truncated.into()
	} else {
		e.into()
	}
}

/// Convenience function for one-off parsing of an in-memory buffer.
pub fn parse(buf: &[u8]) -> Result<Option<Reply>> {
	Parser::new(buf).parse()
}
