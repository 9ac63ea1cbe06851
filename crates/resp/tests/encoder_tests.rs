//! Integration tests for the request encoder

use bytes::Bytes;
use resp::Arg;
use resp::Encoder;
use resp::RespEncoder;
use resp::Reply;
use resp::args;
use rstest::rstest;

fn encode_request(args: &[Arg]) -> Vec<u8> {
	let mut encoder = Encoder::new(Vec::new());
	encoder.write(args).unwrap();
	encoder.flush().unwrap();
	encoder.into_inner()
}

#[test]
fn test_encode_redis_ping() {
	assert_eq!(encode_request(&args!["PING"]), b"*1\r\n$4\r\nPING\r\n");
}

#[test]
fn test_encode_redis_set() {
	assert_eq!(
		encode_request(&args!["SET", "k", "v"]),
		b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n"
	);
}

#[test]
fn test_encode_mixed_arguments() {
	let key = String::from("counter");
	assert_eq!(
		encode_request(&args!["INCRBY", &key, 5, Bytes::from_static(b"\x00\xff")]),
		b"*4\r\n$6\r\nINCRBY\r\n$7\r\ncounter\r\n:5\r\n$2\r\n\x00\xff\r\n"
	);
}

#[rstest]
#[case(args![], Reply::Array(vec![]))]
#[case(args!["GET", "key"], Reply::array(vec![Reply::bulk_string("GET"), Reply::bulk_string("key")]))]
#[case(args!["LPUSH", "list", -7], Reply::array(vec![Reply::bulk_string("LPUSH"), Reply::bulk_string("list"), Reply::Integer(-7)]))]
#[case(args![vec![vec![1i64]]], Reply::array(vec![Reply::array(vec![Reply::array(vec![Reply::Integer(1)])])]))]
fn test_request_parses_back(#[case] request: Vec<Arg>, #[case] expected: Reply) {
	let encoded = encode_request(&request);
	assert_eq!(resp::parse(&encoded).unwrap(), Some(expected));
}

#[test]
fn test_encode_binary_data() {
	let data: Vec<u8> = (0..=255).collect();
	let encoded = Arg::from(data.clone()).encode();
	let decoded = resp::parse(&encoded).unwrap().unwrap();
	assert_eq!(decoded.as_bytes().unwrap(), &Bytes::from(data));
}

#[test]
fn test_encode_large_bulk_string() {
	let data = "x".repeat(1024 * 1024);
	let encoded = encode_request(&args![data.as_str()]);
	let decoded = resp::parse(&encoded).unwrap().unwrap();
	assert_eq!(decoded, Reply::array(vec![Reply::bulk_string(data)]));
}
