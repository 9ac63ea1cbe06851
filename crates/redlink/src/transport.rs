//! Buffered read/write halves over a byte-stream endpoint.

use std::io;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::net::Shutdown;
use std::net::TcpStream;
use std::net::ToSocketAddrs;

use crate::config::ClientConfig;

/// Default capacity of each buffer. Large enough that a typical small
/// command fits in one syscall each way.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSizes {
	pub input: usize,
	pub output: usize,
}

impl Default for BufferSizes {
	fn default() -> Self {
		Self {
			input: DEFAULT_BUFFER_SIZE,
			output: DEFAULT_BUFFER_SIZE,
		}
	}
}

/// A bidirectional byte stream that can hand out a second handle to
/// itself and be shut down.
pub trait Duplex: Read + Write + Sized {
	/// Return two handles to the same stream, one for each direction.
	fn try_split(self) -> io::Result<(Self, Self)>;

	/// Shut down both directions.
	fn shutdown(&self) -> io::Result<()>;
}

impl Duplex for TcpStream {
	fn try_split(self) -> io::Result<(Self, Self)> {
		let writer = self.try_clone()?;
		Ok((self, writer))
	}

	fn shutdown(&self) -> io::Result<()> {
		TcpStream::shutdown(self, Shutdown::Both)
	}
}

#[cfg(unix)]
impl Duplex for std::os::unix::net::UnixStream {
	fn try_split(self) -> io::Result<(Self, Self)> {
		let writer = self.try_clone()?;
		Ok((self, writer))
	}

	fn shutdown(&self) -> io::Result<()> {
		std::os::unix::net::UnixStream::shutdown(self, Shutdown::Both)
	}
}

pub type BufferedHalves<S> = (BufReader<S>, BufWriter<S>);

/// Wrap the two directions of `stream` in independent buffers.
///
/// Both sizes must be non-zero: a zero-capacity reader reports every read
/// as end-of-stream.
pub fn split_buffered<S: Duplex>(stream: S, sizes: BufferSizes) -> io::Result<BufferedHalves<S>> {
	if sizes.input == 0 || sizes.output == 0 {
		return Err(io::Error::new(
			io::ErrorKind::InvalidInput,
			format!(
				"buffer sizes must be non-zero (input {}, output {})",
				sizes.input, sizes.output
			),
		));
	}
	let (reader, writer) = stream.try_split()?;
	Ok((
		BufReader::with_capacity(sizes.input, reader),
		BufWriter::with_capacity(sizes.output, writer),
	))
}

/// Open a TCP stream to the configured endpoint and apply the socket
/// options from `config`.
pub fn open_tcp(config: &ClientConfig) -> io::Result<TcpStream> {
	let addr = config.addr();
	let stream = match config.connect_timeout() {
		Some(timeout) => connect_with_timeout(&addr, timeout)?,
		None => TcpStream::connect(&addr)?,
	};
	stream.set_nodelay(config.nodelay)?;
	stream.set_read_timeout(config.read_timeout())?;
	stream.set_write_timeout(config.write_timeout())?;
	Ok(stream)
}

/// Try each resolved address in turn, like `TcpStream::connect` does.
fn connect_with_timeout(addr: &str, timeout: std::time::Duration) -> io::Result<TcpStream> {
	let mut last_err = None;
	for socket_addr in addr.to_socket_addrs()? {
		match TcpStream::connect_timeout(&socket_addr, timeout) {
			Ok(stream) => return Ok(stream),
			Err(e) => last_err = Some(e),
		}
	}
	Err(last_err.unwrap_or_else(|| {
		io::Error::new(
			io::ErrorKind::InvalidInput,
			format!("could not resolve {}", addr),
		)
	}))
}
