//! Configuration module for the drive-thru order service.
//!
//! Configuration is read from TOML. `${VAR}` and `${VAR:-default}`
//! references are substituted from the environment before parsing, which is
//! how the completion API key reaches the service without living in the file.
//!
//! ## Modular Configuration Support
//!
//! - Use `include = ["interpreter.toml"]` to pull in other config files
//! - Each top-level section must be unique across all files (no duplicates allowed)

mod loader;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Identity of this service instance.
	pub service: ServiceConfig,
	/// HTTP API server settings.
	#[serde(default)]
	pub api: ApiConfig,
	/// Order interpreter implementations.
	pub interpreter: InterpreterConfig,
}

/// Configuration specific to the service instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
	/// Identifier used in logs.
	pub id: String,
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
	/// Maximum request body size in bytes.
	#[serde(default = "default_max_request_size")]
	pub max_request_size: usize,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			host: default_api_host(),
			port: default_api_port(),
			max_request_size: default_max_request_size(),
		}
	}
}

/// Configuration for the order interpreter.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InterpreterConfig {
	/// Which implementation handles requests.
	pub primary: String,
	/// Map of interpreter implementation names to their configurations.
	/// Each implementation validates its own table when it is built.
	pub implementations: HashMap<String, toml::Value>,
}

fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
	8000
}

/// 64KiB is far above any realistic order message.
fn default_max_request_size() -> usize {
	64 * 1024
}

/// `${NAME}` or `${NAME:-default}`, bounded to keep matching linear.
static ENV_VAR_PATTERN: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.expect("environment variable pattern is valid")
});

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in ENV_VAR_PATTERN.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				},
			},
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}
	result.push_str(&input[last_end..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, following `include` directives.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_dir = path_buf.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_dir);
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;
		loader.load_config(file_name).await
	}

	/// Parses and validates text whose environment variables are already
	/// substituted.
	pub(crate) fn from_resolved(resolved: &str) -> Result<Self, ConfigError> {
		let config: Config = toml::from_str(resolved)?;
		config.validate()?;
		Ok(config)
	}

	/// Returns the configuration table of the primary interpreter.
	pub fn primary_interpreter(&self) -> Option<&toml::Value> {
		self.interpreter
			.implementations
			.get(&self.interpreter.primary)
	}

	/// Validates cross-field constraints that serde cannot express.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.service.id.trim().is_empty() {
			return Err(ConfigError::Validation("Service ID cannot be empty".into()));
		}

		if self.api.host.trim().is_empty() {
			return Err(ConfigError::Validation("API host cannot be empty".into()));
		}
		if self.api.port == 0 {
			return Err(ConfigError::Validation(
				"API port must be greater than 0".into(),
			));
		}
		if self.api.max_request_size == 0 {
			return Err(ConfigError::Validation(
				"API max_request_size must be greater than 0".into(),
			));
		}

		if self.interpreter.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one interpreter implementation must be configured".into(),
			));
		}
		if self.interpreter.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Interpreter primary implementation cannot be empty".into(),
			));
		}
		if self.primary_interpreter().is_none() {
			return Err(ConfigError::Validation(format!(
				"Primary interpreter '{}' not found in implementations",
				self.interpreter.primary
			)));
		}
		for (name, implementation) in &self.interpreter.implementations {
			if !implementation.is_table() {
				return Err(ConfigError::Validation(format!(
					"Interpreter implementation '{}' must be a table",
					name
				)));
			}
		}

		Ok(())
	}
}

/// Parses configuration from a TOML string.
///
/// Environment variables are resolved and the configuration is validated
/// after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Config::from_resolved(&resolve_env_vars(s)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const MINIMAL: &str = r#"
[service]
id = "drive-thru"

[interpreter]
primary = "mock"
[interpreter.implementations.mock]
"#;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("DRIVETHRU_TEST_HOST", "localhost");
		std::env::set_var("DRIVETHRU_TEST_PORT", "8080");

		let input = "host = \"${DRIVETHRU_TEST_HOST}:${DRIVETHRU_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "host = \"localhost:8080\"");

		std::env::remove_var("DRIVETHRU_TEST_HOST");
		std::env::remove_var("DRIVETHRU_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${DRIVETHRU_MISSING_VAR:-default_value}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"default_value\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${DRIVETHRU_MISSING_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("DRIVETHRU_MISSING_VAR"));
	}

	#[test]
	fn test_minimal_config_uses_api_defaults() {
		let config: Config = MINIMAL.parse().unwrap();
		assert_eq!(config.service.id, "drive-thru");
		assert_eq!(config.api.host, "127.0.0.1");
		assert_eq!(config.api.port, 8000);
		assert_eq!(config.api.max_request_size, 64 * 1024);
		assert!(config.primary_interpreter().is_some());
	}

	#[test]
	fn test_config_with_api_key_from_env() {
		std::env::set_var("DRIVETHRU_TEST_API_KEY", "sk-test");

		let config_str = r#"
[service]
id = "drive-thru"

[api]
host = "0.0.0.0"
port = 9000

[interpreter]
primary = "openai"
[interpreter.implementations.openai]
api_key = "${DRIVETHRU_TEST_API_KEY}"
model = "${DRIVETHRU_TEST_MODEL:-gpt-3.5-turbo}"
"#;

		let config: Config = config_str.parse().unwrap();
		let openai = config.primary_interpreter().unwrap();
		assert_eq!(openai.get("api_key").unwrap().as_str(), Some("sk-test"));
		assert_eq!(openai.get("model").unwrap().as_str(), Some("gpt-3.5-turbo"));
		assert_eq!(config.api.port, 9000);

		std::env::remove_var("DRIVETHRU_TEST_API_KEY");
	}

	#[test]
	fn test_unknown_primary_rejected() {
		let config_str = r#"
[service]
id = "drive-thru"

[interpreter]
primary = "openai"
[interpreter.implementations.mock]
"#;

		let err = Config::from_str(config_str).unwrap_err();
		assert!(err
			.to_string()
			.contains("Primary interpreter 'openai' not found"));
	}

	#[test]
	fn test_empty_service_id_rejected() {
		let config_str = MINIMAL.replace("id = \"drive-thru\"", "id = \"\"");
		let err = Config::from_str(&config_str).unwrap_err();
		assert!(err.to_string().contains("Service ID cannot be empty"));
	}

	#[test]
	fn test_zero_port_rejected() {
		let config_str = format!("{}\n[api]\nport = 0\n", MINIMAL);
		let err = Config::from_str(&config_str).unwrap_err();
		assert!(err.to_string().contains("port must be greater than 0"));
	}

	#[test]
	fn test_no_implementations_rejected() {
		let config_str = r#"
[service]
id = "drive-thru"

[interpreter]
primary = "mock"
implementations = {}
"#;

		let err = Config::from_str(config_str).unwrap_err();
		assert!(err
			.to_string()
			.contains("At least one interpreter implementation"));
	}
}
