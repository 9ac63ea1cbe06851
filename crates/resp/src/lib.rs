//! # RESP - Redis Serialization Protocol codec
//!
//! A blocking RESP2 encoder and parser over `std::io` byte streams.
//!
//! - [`Encoder`] serializes a request (a list of [`Arg`]) as one RESP array
//!   frame on any `Write` sink.
//! - [`Parser`] decodes one [`Reply`] at a time from any `BufRead` source,
//!   looping over short reads. Bulk strings are length-exact and therefore
//!   8-bit clean.
//!
//! Error replies are raised as [`RespError::Server`] and leave the stream
//! usable. Any other error means the stream position is unknown and the
//! connection has to be dropped (see [`RespError::is_poisoning`]).
//!
//! ## Example
//!
//! ```rust
//! use resp::{Encoder, Parser, Reply, args};
//!
//! let mut encoder = Encoder::new(Vec::new());
//! encoder.write(&args!["SET", "key", "value"]).unwrap();
//! assert_eq!(
//!     encoder.into_inner(),
//!     b"*3\r\n$3\r\nSET\r\n$3\r\nkey\r\n$5\r\nvalue\r\n"
//! );
//!
//! let mut parser = Parser::new(&b"+OK\r\n"[..]);
//! assert_eq!(parser.parse().unwrap(), Some(Reply::simple_string("OK")));
//! assert_eq!(parser.parse().unwrap(), None);
//! ```

mod encode;
mod error;
mod parser;
mod types;
mod utils;

pub use encode::Encoder;
pub use encode::RespEncoder;
pub use encode::encode_error;
pub use error::EncodeError;
pub use error::ProtocolError;
pub use error::RespError;
pub use error::Result;
pub use parser::Parser;
pub use parser::parse;
pub use types::Arg;
pub use types::Reply;
pub use utils::DEFAULT_MAX_BULK_LEN;
pub use utils::DEFAULT_MAX_DEPTH;
