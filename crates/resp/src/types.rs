//! Reply and request-argument value types.

use bytes::Bytes;

use crate::error::EncodeError;

/// A decoded server reply.
///
/// Error replies (`-ERR ...\r\n`) never appear here; the parser raises them
/// as [`RespError::Server`](crate::RespError::Server).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reply {
	/// Simple string: `+OK\r\n`
	SimpleString(Bytes),

	/// Integer: `:1000\r\n`
	Integer(i64),

	/// Bulk string: `$6\r\nfoobar\r\n`
	BulkString(Bytes),

	/// Null bulk string: `$-1\r\n`
	Null,

	/// Array: `*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n`
	Array(Vec<Reply>),

	/// Null array: `*-1\r\n`
	NullArray,
}

impl Reply {
	/// Check if the value is a null bulk string or a null array
	pub fn is_null(&self) -> bool {
		matches!(self, Reply::Null | Reply::NullArray)
	}

	/// Try to convert to a string slice
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Reply::SimpleString(s) | Reply::BulkString(s) => std::str::from_utf8(s).ok(),
			_ => None,
		}
	}

	/// Try to convert to bytes
	pub fn as_bytes(&self) -> Option<&Bytes> {
		match self {
			Reply::SimpleString(b) | Reply::BulkString(b) => Some(b),
			_ => None,
		}
	}

	/// Try to convert to integer
	pub fn as_integer(&self) -> Option<i64> {
		match self {
			Reply::Integer(i) => Some(*i),
			_ => None,
		}
	}

	/// Try to convert to array
	pub fn as_array(&self) -> Option<&[Reply]> {
		match self {
			Reply::Array(a) => Some(a),
			_ => None,
		}
	}

	/// Convert to String with lossy UTF-8 conversion
	pub fn to_string_lossy(&self) -> Option<String> {
		match self {
			Reply::SimpleString(s) | Reply::BulkString(s) => {
				Some(String::from_utf8_lossy(s).into_owned())
			}
			_ => None,
		}
	}

	/// Try to consume and convert to Vec<Reply>
	pub fn into_vec(self) -> Option<Vec<Reply>> {
		match self {
			Reply::Array(a) => Some(a),
			_ => None,
		}
	}

	/// Try to consume and convert to Bytes
	pub fn into_bytes(self) -> Option<Bytes> {
		match self {
			Reply::SimpleString(b) | Reply::BulkString(b) => Some(b),
			_ => None,
		}
	}

	// Convenience constructors

	/// Create a simple string value
	pub fn simple_string(s: impl Into<Bytes>) -> Self {
		Reply::SimpleString(s.into())
	}

	/// Create a bulk string value
	pub fn bulk_string(s: impl Into<Bytes>) -> Self {
		Reply::BulkString(s.into())
	}

	/// Create an array value from an iterator
	pub fn array(items: impl IntoIterator<Item = Reply>) -> Self {
		Reply::Array(items.into_iter().collect())
	}
}

/// One element of a request.
///
/// Requests are always sent as a top-level array. Servers expect the
/// members to be bulk strings, but integers and nested lists are encoded
/// as well for symmetry with [`Reply`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arg {
	/// Raw bytes, sent as a bulk string
	Bytes(Bytes),

	/// UTF-8 text, sent as a bulk string
	Text(String),

	/// Signed integer, sent as `:<n>\r\n`
	Int(i64),

	/// Nested list, sent as an array
	List(Vec<Arg>),
}

impl Arg {
	/// The bulk payload of a `Bytes` or `Text` argument.
	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			Arg::Bytes(b) => Some(b),
			Arg::Text(s) => Some(s.as_bytes()),
			_ => None,
		}
	}
}

impl From<&str> for Arg {
	fn from(s: &str) -> Self {
		Arg::Text(s.to_string())
	}
}

impl From<String> for Arg {
	fn from(s: String) -> Self {
		Arg::Text(s)
	}
}

impl From<&String> for Arg {
	fn from(s: &String) -> Self {
		Arg::Text(s.clone())
	}
}

impl From<&[u8]> for Arg {
	fn from(b: &[u8]) -> Self {
		Arg::Bytes(Bytes::copy_from_slice(b))
	}
}

impl<const N: usize> From<&[u8; N]> for Arg {
	fn from(b: &[u8; N]) -> Self {
		Arg::Bytes(Bytes::copy_from_slice(b))
	}
}

impl From<Vec<u8>> for Arg {
	fn from(v: Vec<u8>) -> Self {
		Arg::Bytes(Bytes::from(v))
	}
}

impl From<Bytes> for Arg {
	fn from(b: Bytes) -> Self {
		Arg::Bytes(b)
	}
}

impl From<i64> for Arg {
	fn from(i: i64) -> Self {
		Arg::Int(i)
	}
}

impl From<i32> for Arg {
	fn from(i: i32) -> Self {
		Arg::Int(i as i64)
	}
}

impl From<u32> for Arg {
	fn from(i: u32) -> Self {
		Arg::Int(i as i64)
	}
}

impl TryFrom<u64> for Arg {
	type Error = EncodeError;

	fn try_from(i: u64) -> Result<Self, Self::Error> {
		i64::try_from(i).map(Arg::Int).map_err(|_| {
			EncodeError::UnsupportedType(format!("u64 value {} does not fit in i64", i))
		})
	}
}

impl TryFrom<usize> for Arg {
	type Error = EncodeError;

	fn try_from(i: usize) -> Result<Self, Self::Error> {
		Arg::try_from(i as u64)
	}
}

impl<T: Into<Arg>> From<Vec<T>> for Arg {
	fn from(v: Vec<T>) -> Self {
		Arg::List(v.into_iter().map(Into::into).collect())
	}
}

/// Turn a reply back into a request argument, e.g. to forward a value read
/// from one key into another command. Nulls have no request form.
impl TryFrom<Reply> for Arg {
	type Error = EncodeError;

	fn try_from(reply: Reply) -> Result<Self, Self::Error> {
		match reply {
			Reply::SimpleString(b) | Reply::BulkString(b) => Ok(Arg::Bytes(b)),
			Reply::Integer(i) => Ok(Arg::Int(i)),
			Reply::Array(items) => items
				.into_iter()
				.map(Arg::try_from)
				.collect::<Result<Vec<_>, _>>()
				.map(Arg::List),
			Reply::Null => Err(EncodeError::UnsupportedType("null bulk string".into())),
			Reply::NullArray => Err(EncodeError::UnsupportedType("null array".into())),
		}
	}
}

/// The reply a request argument decodes to after a trip over the wire.
impl From<Arg> for Reply {
	fn from(arg: Arg) -> Self {
		match arg {
			Arg::Bytes(b) => Reply::BulkString(b),
			Arg::Text(s) => Reply::BulkString(Bytes::from(s)),
			Arg::Int(i) => Reply::Integer(i),
			Arg::List(items) => Reply::Array(items.into_iter().map(Reply::from).collect()),
		}
	}
}

/// Build a heterogeneous argument vector.
///
/// ```
/// use resp::{Arg, args};
///
/// let cmd = args!["INCRBY", "counter", 5];
/// assert_eq!(cmd[2], Arg::Int(5));
/// ```
#[macro_export]
macro_rules! args {
	($($arg:expr),* $(,)?) => {
		::std::vec![$($crate::Arg::from($arg)),*]
	};
}
