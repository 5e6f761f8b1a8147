//! OpenAI-compatible chat completion interpreter.
//!
//! Sends the drive-thru system prompt and the customer message to a
//! `/chat/completions` endpoint and returns the trimmed content of the first
//! choice. There are no retries; any failure is reported to the caller.
//!
//! ## Configuration
//!
//! - `api_key` - bearer token for the endpoint (required)
//! - `endpoint` - completion URL (default: OpenAI's public endpoint)
//! - `model` - model name (default: "gpt-3.5-turbo")
//! - `max_tokens` - reply length bound (default: 100)
//! - `temperature` - sampling temperature (default: 0.7)
//! - `timeout_seconds` - whole-request timeout (default: 30)

use crate::{
	InterpreterError, InterpreterFactory, InterpreterInterface, InterpreterRegistry, SYSTEM_PROMPT,
};
use async_trait::async_trait;
use drivethru_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, SecretString, ValidationError,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Upper bound on how much of an error body ends up in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Configuration for the OpenAI interpreter.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
	pub api_key: SecretString,
	#[serde(default = "default_endpoint")]
	pub endpoint: String,
	#[serde(default = "default_model")]
	pub model: String,
	#[serde(default = "default_max_tokens")]
	pub max_tokens: u32,
	#[serde(default = "default_temperature")]
	pub temperature: f32,
	#[serde(default = "default_timeout_seconds")]
	pub timeout_seconds: u64,
}

fn default_endpoint() -> String {
	DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
	"gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
	100
}

fn default_temperature() -> f32 {
	0.7
}

fn default_timeout_seconds() -> u64 {
	30
}

/// A single message of a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
	role: String,
	#[serde(default)]
	content: Option<String>,
}

impl ChatMessage {
	fn new(role: &str, content: &str) -> Self {
		Self {
			role: role.to_string(),
			content: Some(content.to_string()),
		}
	}
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
	model: &'a str,
	messages: Vec<ChatMessage>,
	max_tokens: u32,
	temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
	#[serde(default)]
	choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
	message: ChatMessage,
}

/// Error envelope returned by OpenAI-compatible endpoints.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
	error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
	message: String,
}

/// Configuration schema for OpenAiInterpreter.
pub struct OpenAiSchema;

impl ConfigSchema for OpenAiSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("api_key", FieldType::String).with_validator(|value| {
				match value.as_str() {
					Some(key) if !key.trim().is_empty() => Ok(()),
					_ => Err("API key cannot be empty".to_string()),
				}
			})],
			vec![
				Field::new("endpoint", FieldType::String).with_validator(|value| {
					let url = value.as_str().unwrap_or_default();
					if url.starts_with("http://") || url.starts_with("https://") {
						Ok(())
					} else {
						Err("Endpoint must be an http(s) URL".to_string())
					}
				}),
				Field::new("model", FieldType::String),
				Field::new(
					"max_tokens",
					FieldType::Integer {
						min: Some(1),
						max: Some(4096),
					},
				),
				Field::new(
					"temperature",
					FieldType::Float {
						min: Some(0.0),
						max: Some(2.0),
					},
				),
				Field::new(
					"timeout_seconds",
					FieldType::Integer {
						min: Some(1),
						max: Some(600),
					},
				),
			],
		);

		schema.validate(config)
	}
}

/// Interpreter backed by an OpenAI-compatible chat completion endpoint.
pub struct OpenAiInterpreter {
	config: OpenAiConfig,
	client: reqwest::Client,
}

impl OpenAiInterpreter {
	/// Creates a new interpreter with a pooled HTTP client.
	pub fn new(config: OpenAiConfig) -> Result<Self, InterpreterError> {
		let client = reqwest::Client::builder()
			.pool_idle_timeout(Duration::from_secs(90))
			.pool_max_idle_per_host(10)
			.timeout(Duration::from_secs(config.timeout_seconds))
			.build()
			.map_err(|e| {
				InterpreterError::Configuration(format!("Failed to build HTTP client: {}", e))
			})?;

		Ok(Self { config, client })
	}

	fn build_request<'a>(&'a self, message: &str) -> ChatRequest<'a> {
		ChatRequest {
			model: &self.config.model,
			messages: vec![
				ChatMessage::new("system", SYSTEM_PROMPT),
				ChatMessage::new("user", message),
			],
			max_tokens: self.config.max_tokens,
			temperature: self.config.temperature,
		}
	}
}

/// Extracts a readable message from an error body, falling back to the raw text.
fn upstream_message(body: &str) -> String {
	if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
		return parsed.error.message;
	}

	let trimmed = body.trim();
	if trimmed.len() <= MAX_ERROR_BODY {
		return trimmed.to_string();
	}
	let mut end = MAX_ERROR_BODY;
	while !trimmed.is_char_boundary(end) {
		end -= 1;
	}
	format!("{}...", &trimmed[..end])
}

#[async_trait]
impl InterpreterInterface for OpenAiInterpreter {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(OpenAiSchema)
	}

	async fn interpret(&self, message: &str) -> Result<String, InterpreterError> {
		let request = self.build_request(message);

		let response = self
			.client
			.post(&self.config.endpoint)
			.bearer_auth(self.config.api_key.expose_secret())
			.json(&request)
			.send()
			.await
			.map_err(|e| InterpreterError::Network(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			tracing::warn!(status = status.as_u16(), "Completion request rejected");
			return Err(InterpreterError::Upstream {
				status: status.as_u16(),
				message: upstream_message(&body),
			});
		}

		let completion: ChatCompletionResponse = response
			.json()
			.await
			.map_err(|e| InterpreterError::InvalidResponse(e.to_string()))?;

		let content = completion
			.choices
			.into_iter()
			.next()
			.and_then(|choice| choice.message.content)
			.ok_or_else(|| {
				InterpreterError::InvalidResponse("Completion contained no choices".to_string())
			})?;

		Ok(content.trim().to_string())
	}
}

/// Registry for the OpenAI interpreter implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "openai";
	type Factory = InterpreterFactory;

	fn factory() -> Self::Factory {
		create_interpreter
	}
}

impl InterpreterRegistry for Registry {}

/// Factory function to create an OpenAI interpreter from configuration.
pub fn create_interpreter(
	config: &toml::Value,
) -> Result<Box<dyn InterpreterInterface>, InterpreterError> {
	OpenAiSchema
		.validate(config)
		.map_err(|e| InterpreterError::Configuration(format!("Invalid openai config: {}", e)))?;

	let openai_config: OpenAiConfig = config
		.clone()
		.try_into()
		.map_err(|e| InterpreterError::Configuration(format!("Invalid openai config: {}", e)))?;

	Ok(Box::new(OpenAiInterpreter::new(openai_config)?))
}
