use std::io::BufRead;
use std::io::Write;

use log::trace;
use log::warn;
use resp::Arg;
use resp::Reply;
use resp::RespError;
use resp::Result;

use crate::client::Client;

/// A batch of requests whose replies are read together.
///
/// Each [`call`](Pipeline::call) is written and flushed right away, so the
/// server can start working before the batch is complete. Replies are only
/// consumed by [`read`](Pipeline::read), in the order the requests were
/// sent.
///
/// ```no_run
/// # fn demo(client: &mut redlink::TcpClient) -> resp::Result<()> {
/// let mut pipeline = client.pipeline();
/// pipeline.call(["MULTI"])?.call(["INCR", "hits"])?.call(["EXEC"])?;
/// let replies = pipeline.read()?;
/// assert_eq!(replies.len(), 3);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<'a, R: BufRead, W: Write> {
	client: &'a mut Client<R, W>,
	pending: usize,
}

impl<'a, R: BufRead, W: Write> Pipeline<'a, R, W> {
	pub(crate) fn new(client: &'a mut Client<R, W>) -> Self {
		Self { client, pending: 0 }
	}

	/// Send a request without waiting for its reply.
	pub fn call<I, A>(&mut self, args: I) -> Result<&mut Self>
	where
		I: IntoIterator<Item = A>,
		A: Into<Arg>,
	{
		let args: Vec<Arg> = args.into_iter().map(Into::into).collect();
		self.client.send(&args)?;
		self.pending += 1;
		Ok(self)
	}

	/// Number of requests sent whose replies have not been read yet.
	pub fn pending(&self) -> usize {
		self.pending
	}

	/// Read one reply per pending request, oldest first.
	///
	/// All pending replies are consumed even when some of them are server
	/// errors, so the connection stays aligned; the first such error is
	/// returned after the drain and the successful replies read alongside it
	/// are dropped. Use [`read_each`](Pipeline::read_each) to keep them. A
	/// closed connection stands in as [`Reply::Null`] for every reply it cut
	/// off.
	pub fn read(&mut self) -> Result<Vec<Reply>> {
		self.read_each()?.into_iter().collect()
	}

	/// Like [`read`](Pipeline::read), but each server error stays in the
	/// slot of the request that caused it. The outer error is reserved for
	/// failures that poison the connection.
	pub fn read_each(&mut self) -> Result<Vec<Result<Reply>>> {
		let count = std::mem::take(&mut self.pending);
		trace!("Draining {} pipelined replies", count);

		let mut replies = Vec::with_capacity(count);
		for _ in 0..count {
			match self.client.receive() {
				Ok(reply) => replies.push(Ok(reply.unwrap_or(Reply::Null))),
				Err(e @ RespError::Server(_)) => replies.push(Err(e)),
				Err(e) => return Err(e),
			}
		}
		Ok(replies)
	}
}

impl<R: BufRead, W: Write> Drop for Pipeline<'_, R, W> {
	fn drop(&mut self) {
		if self.pending > 0 {
			warn!(
				"Pipeline dropped with {} unread replies; the connection is out of step",
				self.pending
			);
		}
	}
}
