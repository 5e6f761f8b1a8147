//! Mock interpreter for local development and tests.
//!
//! No network traffic. Replies with a configured fixed text, or echoes the
//! customer's message when no reply is configured. Echoing is enough to
//! exercise the full pipeline since messages like "2 burgers and 1 fries"
//! already parse.

use crate::{InterpreterError, InterpreterFactory, InterpreterInterface, InterpreterRegistry};
use async_trait::async_trait;
use drivethru_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, ValidationError,
};
use serde::{Deserialize, Serialize};

/// Configuration for the mock interpreter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockInterpreterConfig {
	/// Fixed reply. When absent the customer message is echoed back.
	#[serde(default)]
	pub reply: Option<String>,
}

/// Configuration schema for MockInterpreter.
pub struct MockInterpreterSchema;

impl ConfigSchema for MockInterpreterSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(vec![], vec![Field::new("reply", FieldType::String)]);
		schema.validate(config)
	}
}

/// Interpreter that never leaves the process.
pub struct MockInterpreter {
	config: MockInterpreterConfig,
}

impl MockInterpreter {
	/// Creates a new mock interpreter with the given configuration.
	pub fn new(config: MockInterpreterConfig) -> Self {
		Self { config }
	}
}

#[async_trait]
impl InterpreterInterface for MockInterpreter {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MockInterpreterSchema)
	}

	async fn interpret(&self, message: &str) -> Result<String, InterpreterError> {
		let reply = self.config.reply.as_deref().unwrap_or(message);
		Ok(reply.trim().to_string())
	}
}

/// Registry for the mock interpreter implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "mock";
	type Factory = InterpreterFactory;

	fn factory() -> Self::Factory {
		create_interpreter
	}
}

impl InterpreterRegistry for Registry {}

/// Factory function to create a mock interpreter from configuration.
///
/// Configuration parameters:
/// - `reply` (optional): fixed reply text
pub fn create_interpreter(
	config: &toml::Value,
) -> Result<Box<dyn InterpreterInterface>, InterpreterError> {
	MockInterpreterSchema
		.validate(config)
		.map_err(|e| InterpreterError::Configuration(format!("Invalid mock config: {}", e)))?;

	let mock_config: MockInterpreterConfig = config
		.clone()
		.try_into()
		.map_err(|e| InterpreterError::Configuration(format!("Invalid mock config: {}", e)))?;

	Ok(Box::new(MockInterpreter::new(mock_config)))
}
