//! Factory registry for interpreter implementations.
//!
//! Maps the implementation names used in configuration to the factories
//! that build them, and assembles the order engine from a loaded config.

use drivethru_config::Config;
use drivethru_core::OrderEngine;
use drivethru_interpreter::{InterpreterFactory, InterpreterInterface, InterpreterService};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Registry of every implementation compiled into the binary.
pub struct FactoryRegistry {
	pub interpreter: HashMap<String, InterpreterFactory>,
}

impl FactoryRegistry {
	/// Create a new empty registry
	pub fn new() -> Self {
		Self {
			interpreter: HashMap::new(),
		}
	}

	/// Register an interpreter implementation
	pub fn register_interpreter(&mut self, name: impl Into<String>, factory: InterpreterFactory) {
		self.interpreter.insert(name.into(), factory);
	}

	/// Names of the registered interpreters, sorted for stable messages.
	pub fn interpreter_names(&self) -> Vec<String> {
		let mut names: Vec<_> = self.interpreter.keys().cloned().collect();
		names.sort();
		names
	}
}

impl Default for FactoryRegistry {
	fn default() -> Self {
		Self::new()
	}
}

static REGISTRY: OnceLock<FactoryRegistry> = OnceLock::new();

/// Get the global factory registry, initializing it on first use.
pub fn get_registry() -> &'static FactoryRegistry {
	REGISTRY.get_or_init(|| {
		let mut registry = FactoryRegistry::new();

		for (name, factory) in drivethru_interpreter::get_all_implementations() {
			tracing::debug!("Registering interpreter implementation: {}", name);
			registry.register_interpreter(name, factory);
		}

		registry
	})
}

/// Builds the interpreter service for every configured implementation.
pub fn build_interpreter_service(
	registry: &FactoryRegistry,
	config: &Config,
) -> Result<InterpreterService, Box<dyn std::error::Error>> {
	let mut implementations: HashMap<String, Arc<dyn InterpreterInterface>> = HashMap::new();

	for (name, implementation_config) in &config.interpreter.implementations {
		let factory = registry.interpreter.get(name).ok_or_else(|| {
			format!(
				"Unknown interpreter implementation '{}'. Available: [{}]",
				name,
				registry.interpreter_names().join(", ")
			)
		})?;

		match factory(implementation_config) {
			Ok(implementation) => {
				// Validate the configuration using the implementation's schema
				if let Err(e) = implementation.config_schema().validate(implementation_config) {
					tracing::error!(
						component = "interpreter",
						implementation = %name,
						error = %e,
						"Invalid configuration for interpreter implementation"
					);
					return Err(format!(
						"Invalid configuration for interpreter implementation '{}': {}",
						name, e
					)
					.into());
				}

				let is_primary = &config.interpreter.primary == name;
				tracing::info!(component = "interpreter", implementation = %name, enabled = %is_primary, "Loaded");
				implementations.insert(name.clone(), Arc::from(implementation));
			},
			Err(e) => {
				tracing::error!(
					component = "interpreter",
					implementation = %name,
					error = %e,
					"Failed to create interpreter implementation"
				);
				return Err(format!(
					"Failed to create interpreter implementation '{}': {}",
					name, e
				)
				.into());
			},
		}
	}

	Ok(InterpreterService::new(
		implementations,
		config.interpreter.primary.clone(),
	)?)
}

/// Build the order engine using the global registry and config
pub fn build_engine_from_config(config: &Config) -> Result<OrderEngine, Box<dyn std::error::Error>> {
	let interpreter = build_interpreter_service(get_registry(), config)?;
	Ok(OrderEngine::new(interpreter))
}
