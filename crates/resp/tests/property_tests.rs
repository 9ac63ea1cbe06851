//! Property-based tests using proptest.

use bytes::Bytes;
use proptest::prelude::*;
use resp::Arg;
use resp::Encoder;
use resp::Reply;
use rstest::rstest;

fn encode_request(args: &[Arg]) -> Vec<u8> {
	let mut encoder = Encoder::new(Vec::new());
	encoder.write(args).unwrap();
	encoder.into_inner()
}

/// Flat request arguments: bulk strings (any bytes) and integers.
fn arb_flat_arg() -> impl Strategy<Value = Arg> {
	prop_oneof![
		prop::collection::vec(any::<u8>(), 0..512).prop_map(Arg::from),
		any::<String>().prop_map(Arg::from),
		any::<i64>().prop_map(Arg::from),
	]
}

/// Arbitrarily nested arguments.
fn arb_arg() -> impl Strategy<Value = Arg> {
	arb_flat_arg().prop_recursive(6, 64, 8, |inner| {
		prop::collection::vec(inner, 0..8).prop_map(Arg::List)
	})
}

fn nested(depth: usize) -> Arg {
	(0..depth).fold(Arg::from("leaf"), |acc, _| Arg::List(vec![acc]))
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(256))]

	/// Encoding a request and parsing the bytes gives back its structure.
	#[test]
	fn prop_request_roundtrip(args in prop::collection::vec(arb_flat_arg(), 0..16)) {
		let encoded = encode_request(&args);
		let expected = Reply::from(Arg::List(args));
		prop_assert_eq!(resp::parse(&encoded).unwrap(), Some(expected));
	}

	#[test]
	fn prop_nested_roundtrip(arg in arb_arg()) {
		let encoded = encode_request(std::slice::from_ref(&arg));
		let expected = Reply::array(vec![Reply::from(arg)]);
		prop_assert_eq!(resp::parse(&encoded).unwrap(), Some(expected));
	}

	/// Bulk strings are 8-bit clean, including embedded CR/LF and NUL.
	#[test]
	fn prop_bulk_is_8bit_clean(data in prop::collection::vec(any::<u8>(), 0..=65536)) {
		let encoded = encode_request(&[Arg::from(data.clone())]);
		let reply = resp::parse(&encoded).unwrap().unwrap();
		prop_assert_eq!(reply, Reply::array(vec![Reply::BulkString(Bytes::from(data))]));
	}
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
#[case(1024)]
#[case(65535)]
#[case(65536)]
fn test_bulk_boundary_lengths(#[case] len: usize) {
	let data: Vec<u8> = (0..len).map(|i| [b'\r', b'\n', 0, 0xff][i % 4]).collect();
	let encoded = encode_request(&[Arg::from(data.clone())]);
	let reply = resp::parse(&encoded).unwrap().unwrap();
	assert_eq!(reply, Reply::array(vec![Reply::BulkString(Bytes::from(data))]));
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(5)]
#[case(32)]
fn test_array_nesting_roundtrip(#[case] depth: usize) {
	let arg = nested(depth);
	let encoded = encode_request(std::slice::from_ref(&arg));
	assert_eq!(
		resp::parse(&encoded).unwrap(),
		Some(Reply::array(vec![Reply::from(arg)]))
	);
}

#[test]
fn test_null_distinct_from_empty() {
	let null = resp::parse(b"$-1\r\n").unwrap().unwrap();
	let empty = resp::parse(b"$0\r\n\r\n").unwrap().unwrap();
	assert_eq!(null, Reply::Null);
	assert_eq!(empty, Reply::BulkString(Bytes::new()));
	assert_ne!(null, empty);

	let null_array = resp::parse(b"*-1\r\n").unwrap().unwrap();
	let empty_array = resp::parse(b"*0\r\n").unwrap().unwrap();
	assert_ne!(null_array, empty_array);
}
