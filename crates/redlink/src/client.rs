use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::net::TcpStream;

use log::trace;
use log::warn;
use resp::Arg;
use resp::Encoder;
use resp::Parser;
use resp::Reply;
use resp::Result;

use crate::config::ClientConfig;
use crate::pipeline::Pipeline;
use crate::transport;
use crate::transport::Duplex;

/// A client over a plain TCP connection with buffered halves.
pub type TcpClient = Client<BufReader<TcpStream>, BufWriter<TcpStream>>;

/// Issues requests and reads replies over one byte stream.
///
/// Requests and replies are strictly FIFO. A client is not meant to be
/// shared between threads: give each caller its own connection, or guard
/// it with a mutex.
///
/// After an error for which [`RespError::is_poisoning`] is true the stream
/// position is unknown and the client must be dropped. Server errors leave
/// it usable.
///
/// [`RespError::is_poisoning`]: resp::RespError::is_poisoning
pub struct Client<R, W> {
	encoder: Encoder<W>,
	parser: Parser<R>,
}

impl<R: BufRead, W: Write> Client<R, W> {
	pub fn new(reader: R, writer: W) -> Self {
		Self {
			encoder: Encoder::new(writer),
			parser: Parser::new(reader),
		}
	}

	/// Build a client whose parser applies the limits from `config`.
	pub fn with_config(reader: R, writer: W, config: &ClientConfig) -> Self {
		Self {
			encoder: Encoder::new(writer),
			parser: Parser::with_limits(reader, config.max_bulk_len, config.max_depth),
		}
	}

	/// Send one request and wait for its reply.
	///
	/// If the server closes the connection instead of answering, the reply
	/// is [`Reply::Null`]; this is how a blocked `BLPOP` observes
	/// `CLIENT KILL`.
	pub fn call<I, A>(&mut self, args: I) -> Result<Reply>
	where
		I: IntoIterator<Item = A>,
		A: Into<Arg>,
	{
		let args: Vec<Arg> = args.into_iter().map(Into::into).collect();
		self.send(&args)?;
		Ok(self.receive()?.unwrap_or(Reply::Null))
	}

	/// Read one reply without sending anything, for pushed messages such as
	/// pub/sub deliveries. `None` means the server closed the connection.
	pub fn read(&mut self) -> Result<Option<Reply>> {
		self.receive()
	}

	/// Start a pipeline: requests are written immediately, replies are
	/// collected in one go by [`Pipeline::read`].
	pub fn pipeline(&mut self) -> Pipeline<'_, R, W> {
		Pipeline::new(self)
	}

	pub fn into_parts(self) -> (R, W) {
		(self.parser.into_inner(), self.encoder.into_inner())
	}

	pub fn reader(&self) -> &R {
		self.parser.get_ref()
	}

	pub fn writer(&self) -> &W {
		self.encoder.get_ref()
	}

	/// Write and flush one request.
	pub(crate) fn send(&mut self, args: &[Arg]) -> Result<()> {
		trace!("Sending request with {} arguments", args.len());
		self.encoder.write(args).inspect_err(log_poisoning)?;
		self.encoder.flush().inspect_err(log_poisoning)
	}

	pub(crate) fn flush(&mut self) -> Result<()> {
		self.encoder.flush()
	}

	pub(crate) fn receive(&mut self) -> Result<Option<Reply>> {
		self.parser.parse().inspect_err(log_poisoning)
	}
}

impl<S: Duplex> Client<BufReader<S>, BufWriter<S>> {
	/// Wrap an already connected stream using the buffer sizes and parser
	/// limits from `config`.
	pub fn from_stream(stream: S, config: &ClientConfig) -> Result<Self> {
		let (reader, writer) = transport::split_buffered(stream, config.buffer_sizes())?;
		Ok(Self::with_config(reader, writer, config))
	}
}

impl TcpClient {
	/// Open an unmanaged connection. The socket closes when the client is
	/// dropped; use [`crate::connect`] or [`crate::run`] when a deterministic
	/// shutdown is needed.
	pub fn connect(config: &ClientConfig) -> Result<Self> {
		let stream = transport::open_tcp(config)?;
		log::debug!("Connected to {}", config.addr());
		Self::from_stream(stream, config)
	}
}

fn log_poisoning(e: &resp::RespError) {
	if e.is_poisoning() {
		warn!("Connection is no longer usable: {}", e);
	}
}
