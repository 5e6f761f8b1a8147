//! Order interpreter module for the drive-thru service.
//!
//! An interpreter turns a customer's free-text message into a short reply
//! that lists items with signed quantities ("2 burger, 1 drink"). The reply
//! is produced by a text-completion backend; implementations are pluggable
//! and selected by name from configuration.

use async_trait::async_trait;
use drivethru_types::{ConfigSchema, ImplementationRegistry};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod mock;
	pub mod openai;
}

/// Instruction sent ahead of every customer message.
pub const SYSTEM_PROMPT: &str = "You are managing a fast-food drive-thru. Interpret the user's message and return:\n\
- Items ordered with quantities (e.g., '2 burgers', '1 drink')\n\
- If they want to cancel some items then return:\n\
- Items ordered with quantities (e.g., '-2 burgers', '-1 drink')\n\
\n\
- If they ask for totals, summarize all items.";

/// Errors that can occur while interpreting a message.
#[derive(Debug, Error)]
pub enum InterpreterError {
	/// The completion backend could not be reached.
	#[error("Network error: {0}")]
	Network(String),
	/// The completion backend answered with a non-success status.
	#[error("Upstream returned status {status}: {message}")]
	Upstream { status: u16, message: String },
	/// The completion backend answered with a body that has no usable reply.
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
	/// Error that occurs when configuration is invalid.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for interpreter implementations.
#[async_trait]
pub trait InterpreterInterface: Send + Sync {
	/// Returns the configuration schema for this implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Interprets a customer message and returns the trimmed reply text.
	async fn interpret(&self, message: &str) -> Result<String, InterpreterError>;
}

/// Type alias for interpreter factory functions.
pub type InterpreterFactory =
	fn(&toml::Value) -> Result<Box<dyn InterpreterInterface>, InterpreterError>;

/// Registry trait for interpreter implementations.
pub trait InterpreterRegistry: ImplementationRegistry<Factory = InterpreterFactory> {}

/// Get all registered interpreter implementations.
///
/// Returns a vector of (name, factory) tuples used by the service to build
/// the implementations named in configuration.
pub fn get_all_implementations() -> Vec<(&'static str, InterpreterFactory)> {
	use implementations::{mock, openai};

	vec![
		(openai::Registry::NAME, openai::Registry::factory()),
		(mock::Registry::NAME, mock::Registry::factory()),
	]
}

/// Service that dispatches interpretation to the primary implementation.
pub struct InterpreterService {
	/// Map of implementation names to their interfaces.
	implementations: HashMap<String, Arc<dyn InterpreterInterface>>,
	/// The implementation that handles requests.
	primary_implementation: String,
}

impl InterpreterService {
	/// Creates a new InterpreterService with the given implementations.
	pub fn new(
		implementations: HashMap<String, Arc<dyn InterpreterInterface>>,
		primary_implementation: String,
	) -> Result<Self, InterpreterError> {
		if !implementations.contains_key(&primary_implementation) {
			return Err(InterpreterError::Configuration(format!(
				"Primary implementation '{}' not found in available implementations",
				primary_implementation
			)));
		}

		Ok(Self {
			implementations,
			primary_implementation,
		})
	}

	/// Creates a service backed by a single implementation.
	pub fn single(name: impl Into<String>, implementation: Arc<dyn InterpreterInterface>) -> Self {
		let name = name.into();
		let mut implementations = HashMap::new();
		implementations.insert(name.clone(), implementation);
		Self {
			implementations,
			primary_implementation: name,
		}
	}

	/// Name of the implementation requests are sent to.
	pub fn primary(&self) -> &str {
		&self.primary_implementation
	}

	/// Interprets a message using the primary implementation.
	pub async fn interpret(&self, message: &str) -> Result<String, InterpreterError> {
		let implementation = self
			.implementations
			.get(&self.primary_implementation)
			.ok_or_else(|| {
				InterpreterError::Configuration(format!(
					"Primary implementation '{}' not available",
					self.primary_implementation
				))
			})?;

		tracing::debug!(
			implementation = %self.primary_implementation,
			"Interpreting order message"
		);
		implementation.interpret(message).await
	}
}
