//! # redlink
//!
//! A small blocking client for servers that speak RESP.
//!
//! Requests are lists of [`Arg`]; replies are [`Reply`] values. A
//! [`Client`] works over any buffered reader and writer pair, so it can be
//! driven by a TCP socket, a unix socket or an in-memory buffer.
//!
//! ```no_run
//! use redlink::ClientConfig;
//! use redlink::Reply;
//!
//! let config = ClientConfig::from_url("redis://127.0.0.1:6379")?;
//! let value = redlink::run(&config, |client| {
//!     client.call(["SET", "greeting", "hello"])?;
//!     client.call(["GET", "greeting"])
//! })?;
//! assert_eq!(value, Reply::bulk_string("hello"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod client;
mod config;
mod managed;
mod pipeline;
pub mod transport;

pub use bytes::Bytes;
pub use client::Client;
pub use client::TcpClient;
pub use config::ClientConfig;
pub use config::ConfigError;
pub use config::DEFAULT_PORT;
pub use managed::Managed;
pub use managed::connect;
pub use managed::run;
pub use pipeline::Pipeline;
pub use resp::Arg;
pub use resp::Reply;
pub use resp::RespError;
pub use resp::Result;
pub use resp::args;
pub use transport::BufferSizes;
pub use transport::Duplex;
