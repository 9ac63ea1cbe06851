//! Subscribe to a channel and print every message until the server hangs up.
//!
//! ```text
//! cargo run -p redlink --example pubsub -- --channel news
//! ```

use clap::Parser;
use redlink::ClientConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
	/// Connection URL, e.g. redis://127.0.0.1:6379
	#[arg(short, long)]
	url: Option<String>,

	/// Configuration file path (TOML, JSON, or YAML)
	#[arg(short, long, conflicts_with = "url")]
	config: Option<String>,

	/// Channel to subscribe to
	#[arg(long, default_value = "news")]
	channel: String,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Cli::parse();
	telemetry::init(&args.log_level);

	let config = match (&args.url, &args.config) {
		(Some(url), _) => ClientConfig::from_url(url)?,
		(None, Some(path)) => ClientConfig::load_from_file(path)?,
		(None, None) => ClientConfig::default(),
	};

	redlink::run(&config, |client| {
		let confirmation = client.call(["SUBSCRIBE", args.channel.as_str()])?;
		log::info!("Subscribed: {:?}", confirmation);

		while let Some(push) = client.read()? {
			match push.as_array() {
				Some([kind, channel, payload]) if kind.as_str() == Some("message") => {
					println!(
						"{}: {}",
						channel.to_string_lossy().unwrap_or_default(),
						payload.to_string_lossy().unwrap_or_default()
					);
				}
				_ => log::debug!("Ignoring push {:?}", push),
			}
		}
		log::info!("Server closed the connection");
		Ok(())
	})?;

	Ok(())
}
