//! Main entry point for the drive-thru order service.
//!
//! Loads the configuration, builds the order engine with the configured
//! interpreter and serves the HTTP API until interrupted.

use clap::Parser;
use drivethru_config::Config;
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod factory_registry;
mod server;

/// Command-line arguments for the drive-thru service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	// RUST_LOG wins over --log-level when set
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started drive-thru service");

	let config_path = args
		.config
		.to_str()
		.ok_or_else(|| format!("Config path is not valid UTF-8: {}", args.config.display()))?;
	let config = Config::from_file(config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let engine = factory_registry::build_engine_from_config(&config)?;
	tracing::info!(interpreter = engine.interpreter_name(), "Order engine ready");

	server::start_server(config.api.clone(), Arc::new(engine)).await?;

	tracing::info!("Stopped drive-thru service");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_args_default_values() {
		let args = Args::try_parse_from(["drivethru"]).unwrap();

		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn test_args_custom_values() {
		let args =
			Args::try_parse_from(["drivethru", "--config", "custom.toml", "-l", "debug"]).unwrap();

		assert_eq!(args.config, PathBuf::from("custom.toml"));
		assert_eq!(args.log_level, "debug");
	}

	#[tokio::test]
	async fn test_config_file_builds_engine() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(
			file,
			r#"
[service]
id = "lane-1"

[api]
port = 9001

[interpreter]
primary = "mock"
[interpreter.implementations.mock]
reply = "2 fries"
"#
		)
		.unwrap();

		let config = Config::from_file(file.path().to_str().unwrap())
			.await
			.unwrap();
		assert_eq!(config.api.port, 9001);
		assert_eq!(config.api.host, "127.0.0.1");

		let engine = factory_registry::build_engine_from_config(&config).unwrap();
		let snapshot = engine.process("fries please").await.unwrap();
		assert_eq!(snapshot.totals.fries, 2);
	}

	#[tokio::test]
	async fn test_demo_config_loads() {
		let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/demo.toml");
		let config = Config::from_file(path).await.unwrap();
		assert_eq!(config.interpreter.primary, "mock");

		let engine = factory_registry::build_engine_from_config(&config).unwrap();
		let snapshot = engine.process("2 burgers and 1 drink").await.unwrap();
		assert_eq!(snapshot.history[0].details, "2 burger, 1 drink");
	}
}
