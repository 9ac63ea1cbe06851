use std::io;
use std::io::BufReader;
use std::io::Read;

use resp::Parser;

/// Simulates a socket that delivers the reply stream in uneven pieces.
struct Fragmented {
	chunks: Vec<&'static [u8]>,
}

impl Read for Fragmented {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		let Some(&chunk) = self.chunks.first() else {
			return Ok(0);
		};
		let n = chunk.len().min(buf.len());
		buf[..n].copy_from_slice(&chunk[..n]);
		if n == chunk.len() {
			self.chunks.remove(0);
		} else {
			self.chunks[0] = &chunk[n..];
		}
		println!("[Stream] Delivered {} bytes", n);
		Ok(n)
	}
}

fn main() {
	println!("--- RESP Streaming Parse Example ---");

	// We are sending:
	// - A Simple String: "+OK\r\n"
	// - An Integer: ":1000\r\n"
	// - An Array: "*2\r\n$3\r\nSET\r\n$3\r\nkey\r\n"
	// - A bulk string with an embedded CRLF
	let source = Fragmented {
		chunks: vec![
			b"+O".as_slice(),
			b"K\r\n:1".as_slice(),
			b"00".as_slice(),
			b"0\r\n*2\r\n$3\r\nSE".as_slice(),
			b"T\r\n$3\r\nk".as_slice(),
			b"ey\r\n$4\r\na\r".as_slice(),
			b"\nb\r\n".as_slice(),
		],
	};

	let mut parser = Parser::new(BufReader::with_capacity(8, source));
	loop {
		match parser.parse() {
			Ok(Some(value)) => println!("[Parser] Complete: {:?}", value),
			Ok(None) => {
				println!("[Parser] End of stream");
				break;
			}
			Err(e) => {
				eprintln!("[Parser] Error: {}", e);
				break;
			}
		}
	}
}
