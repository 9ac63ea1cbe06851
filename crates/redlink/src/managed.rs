//! Connections with a deterministic end of life.

use std::fmt;
use std::io;
use std::io::BufReader;
use std::io::BufWriter;
use std::net::TcpStream;
use std::ops::Deref;
use std::ops::DerefMut;

use log::debug;
use log::warn;
use resp::Result;

use crate::client::Client;
use crate::client::TcpClient;
use crate::config::ClientConfig;
use crate::transport;
use crate::transport::Duplex;

/// A client that owns its stream and shuts it down exactly once, either
/// through [`close`](Managed::close) or when dropped.
///
/// Dereferences to [`Client`], so requests are issued directly on the
/// guard.
pub struct Managed<S: Duplex = TcpStream> {
	client: Client<BufReader<S>, BufWriter<S>>,
	closed: bool,
}

impl<S: Duplex> Managed<S> {
	pub fn new(stream: S, config: &ClientConfig) -> Result<Self> {
		Ok(Self {
			client: Client::from_stream(stream, config)?,
			closed: false,
		})
	}

	/// Flush anything still buffered and shut the stream down.
	pub fn close(mut self) -> Result<()> {
		self.shutdown()
	}

	pub fn is_closed(&self) -> bool {
		self.closed
	}

	fn shutdown(&mut self) -> Result<()> {
		if self.closed {
			return Ok(());
		}
		self.closed = true;
		debug!("Closing managed connection");

		// On failure the bytes stay buffered, and `BufWriter` tries them once
		// more when dropped. That write hits the shut-down stream and its error
		// is discarded by `BufWriter` itself; the caller sees this one.
		let flushed = self.client.flush();
		match self.client.reader().get_ref().shutdown() {
			// The peer may have closed first.
			Err(e) if e.kind() != io::ErrorKind::NotConnected => return Err(e.into()),
			_ => {}
		}
		flushed
	}
}

impl<S: Duplex> fmt::Debug for Managed<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Managed")
			.field("closed", &self.closed)
			.finish_non_exhaustive()
	}
}

impl<S: Duplex> Deref for Managed<S> {
	type Target = Client<BufReader<S>, BufWriter<S>>;

	fn deref(&self) -> &Self::Target {
		&self.client
	}
}

impl<S: Duplex> DerefMut for Managed<S> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.client
	}
}

impl<S: Duplex> Drop for Managed<S> {
	fn drop(&mut self) {
		if let Err(e) = self.shutdown() {
			warn!("Failed to close connection cleanly: {}", e);
		}
	}
}

/// Open a managed TCP connection.
///
/// ```no_run
/// let config = redlink::ClientConfig::new("127.0.0.1", 6379);
/// let mut conn = redlink::connect(&config)?;
/// conn.call(["SET", "greeting", "hello"])?;
/// conn.close()?;
/// # Ok::<(), resp::RespError>(())
/// ```
pub fn connect(config: &ClientConfig) -> Result<Managed> {
	let stream = transport::open_tcp(config)?;
	debug!("Connected to {}", config.addr());
	Managed::new(stream, config)
}

/// Run `f` against a fresh connection and close it afterwards, whether
/// `f` succeeds or not. An error from `f` takes precedence over one from
/// closing.
pub fn run<T, F>(config: &ClientConfig, f: F) -> Result<T>
where
	F: FnOnce(&mut TcpClient) -> Result<T>,
{
	let mut conn = connect(config)?;
	let value = f(&mut *conn)?;
	conn.close()?;
	Ok(value)
}

#[cfg(all(test, unix))]
mod tests {
	use std::io::Read;
	use std::io::Write;
	use std::os::unix::net::UnixStream;

	use resp::Reply;
	use resp::RespError;

	use super::*;

	fn pair() -> (Managed<UnixStream>, UnixStream) {
		let (a, b) = UnixStream::pair().unwrap();
		(Managed::new(a, &ClientConfig::default()).unwrap(), b)
	}

	#[test]
	fn test_close_shuts_down_stream() {
		let (mut conn, mut peer) = pair();
		peer.write_all(b"+PONG\r\n").unwrap();
		assert_eq!(conn.call(["PING"]).unwrap(), Reply::simple_string("PONG"));
		conn.close().unwrap();

		let mut seen = Vec::new();
		peer.read_to_end(&mut seen).unwrap();
		assert_eq!(seen, b"*1\r\n$4\r\nPING\r\n");
	}

	#[test]
	fn test_drop_shuts_down_stream() {
		let (conn, mut peer) = pair();
		assert!(!conn.is_closed());
		drop(conn);

		let mut seen = Vec::new();
		assert_eq!(peer.read_to_end(&mut seen).unwrap(), 0);
	}

	#[test]
	fn test_shutdown_runs_once() {
		let (mut conn, _peer) = pair();
		conn.shutdown().unwrap();
		assert!(conn.is_closed());
		// Second shutdown is a no-op, including the one from drop.
		conn.shutdown().unwrap();
	}

	#[test]
	fn test_zero_input_buffer_is_rejected() {
		let (a, mut peer) = UnixStream::pair().unwrap();
		let config = ClientConfig {
			input_buffer_size: 0,
			..ClientConfig::default()
		};
		peer.write_all(b"+PONG\r\n").unwrap();
		let err = Managed::new(a, &config).unwrap_err();
		assert!(matches!(err, RespError::Io(ref e) if e.kind() == io::ErrorKind::InvalidInput));
	}

	#[test]
	fn test_close_reports_unflushed_output() {
		let (mut conn, peer) = pair();
		drop(peer);

		// The request stays in the write buffer once the write fails.
		let err = conn.call(["PING"]).unwrap_err();
		assert!(err.is_poisoning());

		let err = conn.close().unwrap_err();
		assert!(matches!(err, RespError::Io(_)));
	}

	#[test]
	fn test_close_after_peer_hangup() {
		let (conn, peer) = pair();
		drop(peer);
		assert!(conn.close().is_ok());
	}
}
