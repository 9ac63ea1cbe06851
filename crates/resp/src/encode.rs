//! RESP encoding: the `RespEncoder` trait for in-memory buffers and the
//! streaming [`Encoder`] that writes request frames to a byte sink.

use std::io::Write;

use bytes::BufMut;
use bytes::Bytes;
use bytes::BytesMut;

use crate::error::Result;
use crate::types::Arg;
use crate::types::Reply;
use crate::utils::*;

/// Trait for encoding RESP values.
pub trait RespEncoder {
	fn encode_to(&self, buf: &mut BytesMut);

	fn encode(&self) -> Bytes {
		let mut buf = BytesMut::new();
		self.encode_to(&mut buf);
		buf.freeze()
	}
}

impl RespEncoder for Arg {
	fn encode_to(&self, buf: &mut BytesMut) {
		match self {
			Arg::Bytes(b) => encode_bulk_string(buf, b),
			Arg::Text(s) => encode_bulk_string(buf, s.as_bytes()),
			Arg::Int(i) => encode_integer(buf, *i),
			Arg::List(items) => encode_array(buf, items),
		}
	}
}

impl RespEncoder for [Arg] {
	fn encode_to(&self, buf: &mut BytesMut) {
		encode_array(buf, self);
	}
}

/// Server-side encoding of replies. The client never sends these, but fake
/// servers in tests and tools do.
impl RespEncoder for Reply {
	fn encode_to(&self, buf: &mut BytesMut) {
		match self {
			Reply::SimpleString(s) => encode_simple_string(buf, s),
			Reply::Integer(i) => encode_integer(buf, *i),
			Reply::BulkString(s) => encode_bulk_string(buf, s),
			Reply::Null => encode_null(buf, BULK_STRING),
			Reply::Array(arr) => encode_array(buf, arr),
			Reply::NullArray => encode_null(buf, ARRAY),
		}
	}
}

/// Encode an error reply line (`-<msg>\r\n`).
pub fn encode_error(buf: &mut BytesMut, msg: &[u8]) {
	buf.put_u8(ERROR);
	buf.put_slice(msg);
	buf.put_slice(CRLF);
}

#[inline]
fn encode_simple_string(buf: &mut BytesMut, s: &[u8]) {
	buf.put_u8(SIMPLE_STRING);
	buf.put_slice(s);
	buf.put_slice(CRLF);
}

#[inline]
fn encode_integer(buf: &mut BytesMut, i: i64) {
	buf.put_u8(INTEGER);
	buf.put_slice(i.to_string().as_bytes());
	buf.put_slice(CRLF);
}

#[inline]
fn encode_length(buf: &mut BytesMut, marker: u8, length: usize) {
	buf.put_u8(marker);
	buf.put_slice(length.to_string().as_bytes());
	buf.put_slice(CRLF);
}

#[inline]
fn encode_bulk_string(buf: &mut BytesMut, s: &[u8]) {
	encode_length(buf, BULK_STRING, s.len());
	buf.put_slice(s);
	buf.put_slice(CRLF);
}

#[inline]
fn encode_null(buf: &mut BytesMut, marker: u8) {
	buf.put_u8(marker);
	buf.put_slice(b"-1");
	buf.put_slice(CRLF);
}

fn encode_array<T: RespEncoder>(buf: &mut BytesMut, arr: &[T]) {
	encode_length(buf, ARRAY, arr.len());
	for value in arr {
		value.encode_to(buf);
	}
}

/// Writes request frames to a byte sink.
///
/// Each request is rendered into a reusable scratch buffer and handed to
/// the sink with a single `write_all`, so a partially encoded frame is
/// never visible to the sink. Call [`flush`](Encoder::flush) to push
/// buffered bytes out.
pub struct Encoder<W> {
	writer: W,
	scratch: BytesMut,
}

impl<W: Write> Encoder<W> {
	pub fn new(writer: W) -> Self {
		Self {
			writer,
			scratch: BytesMut::with_capacity(LINE_BUFFER_SIZE),
		}
	}

	/// Write one request as a single RESP array frame.
	pub fn write(&mut self, args: &[Arg]) -> Result<()> {
		self.scratch.clear();
		args.encode_to(&mut self.scratch);
		self.writer.write_all(&self.scratch)?;
		Ok(())
	}

	/// Force buffered bytes to the sink.
	pub fn flush(&mut self) -> Result<()> {
		self.writer.flush()?;
		Ok(())
	}

	pub fn get_ref(&self) -> &W {
		&self.writer
	}

	pub fn get_mut(&mut self) -> &mut W {
		&mut self.writer
	}

	pub fn into_inner(self) -> W {
		self.writer
	}
}
