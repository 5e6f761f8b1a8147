//! Core order engine for the drive-thru service.
//!
//! The engine classifies each customer message, asks the interpreter to
//! itemize new orders, parses the reply into quantities and records the
//! result in the ledger. Every successful call returns the full current
//! state of the ledger.

use drivethru_interpreter::{InterpreterError, InterpreterService};
use drivethru_types::OrderSnapshot;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::instrument;

pub mod intent;
pub mod ledger;
pub mod parser;

pub use intent::{classify, Intent, IntentError};
pub use ledger::{Ledger, LedgerError};
pub use parser::parse_quantities;

/// Errors that can occur while processing a customer message.
#[derive(Debug, Error)]
pub enum EngineError {
	/// The message could not be turned into an actionable request.
	#[error("Invalid input: {0}")]
	InvalidInput(#[from] IntentError),
	/// A cancellation referenced an order that is not active.
	#[error("{0}")]
	NotFound(#[from] LedgerError),
	/// The interpreter failed to produce a reply.
	#[error("Error processing order: {0}")]
	UpstreamFailure(#[from] InterpreterError),
}

/// Processes customer messages against a single shared ledger.
///
/// The ledger lock is never held across the interpreter call, so a slow
/// completion does not block cancellations or other orders.
pub struct OrderEngine {
	interpreter: InterpreterService,
	ledger: Mutex<Ledger>,
}

impl OrderEngine {
	/// Creates an engine with an empty ledger.
	pub fn new(interpreter: InterpreterService) -> Self {
		Self {
			interpreter,
			ledger: Mutex::new(Ledger::new()),
		}
	}

	/// Name of the interpreter implementation in use.
	pub fn interpreter_name(&self) -> &str {
		self.interpreter.primary()
	}

	/// Current totals and order history.
	pub async fn snapshot(&self) -> OrderSnapshot {
		self.ledger.lock().await.snapshot()
	}

	/// Handles one customer message.
	///
	/// - blank: returns the current state, the interpreter is not called
	/// - cancellation: removes the referenced order
	/// - anything else: interprets, parses and records a new order
	#[instrument(skip_all)]
	pub async fn process(&self, message: &str) -> Result<OrderSnapshot, EngineError> {
		match classify(message)? {
			Intent::Empty => {
				tracing::debug!("Blank message, returning current state");
				Ok(self.snapshot().await)
			},
			Intent::CancelOrder(number) => {
				let mut ledger = self.ledger.lock().await;
				let order = ledger.cancel(number)?;
				tracing::info!(order_id = %order.id, details = %order.details, "Order canceled");
				Ok(ledger.snapshot())
			},
			Intent::NewOrder(text) => {
				let reply = self.interpreter.interpret(&text).await?;
				let quantities = parse_quantities(&reply);
				tracing::debug!(reply = %reply, ?quantities, "Interpreted order");

				let mut ledger = self.ledger.lock().await;
				let order = ledger.place(quantities);
				tracing::info!(order_id = %order.id, details = %order.details, "Order placed");
				Ok(ledger.snapshot())
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use drivethru_interpreter::InterpreterInterface;
	use drivethru_types::{ConfigSchema, Order, Totals, ValidationError};
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Arc;

	struct NoSchema;

	impl ConfigSchema for NoSchema {
		fn validate(&self, _config: &toml::Value) -> Result<(), ValidationError> {
			Ok(())
		}
	}

	/// Replies with a fixed text and counts calls.
	struct ScriptedInterpreter {
		reply: Result<String, String>,
		calls: AtomicUsize,
	}

	impl ScriptedInterpreter {
		fn replying(reply: &str) -> Arc<Self> {
			Arc::new(Self {
				reply: Ok(reply.to_string()),
				calls: AtomicUsize::new(0),
			})
		}

		fn failing(message: &str) -> Arc<Self> {
			Arc::new(Self {
				reply: Err(message.to_string()),
				calls: AtomicUsize::new(0),
			})
		}

		fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}
	}

	#[async_trait]
	impl InterpreterInterface for ScriptedInterpreter {
		fn config_schema(&self) -> Box<dyn ConfigSchema> {
			Box::new(NoSchema)
		}

		async fn interpret(&self, _message: &str) -> Result<String, InterpreterError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.reply.clone().map_err(InterpreterError::Network)
		}
	}

	fn engine_with(interpreter: Arc<ScriptedInterpreter>) -> OrderEngine {
		OrderEngine::new(InterpreterService::single("scripted", interpreter))
	}

	#[tokio::test]
	async fn test_new_order_uses_interpreted_reply() {
		let interpreter = ScriptedInterpreter::replying("2 burger, 1 drink");
		let engine = engine_with(interpreter.clone());

		let snapshot = engine.process("two burgers and a drink please").await.unwrap();

		assert_eq!(interpreter.calls(), 1);
		assert_eq!(
			snapshot.totals,
			Totals {
				burgers: 2,
				fries: 0,
				drinks: 1
			}
		);
		assert_eq!(snapshot.history, vec![Order::new(1, "2 burger, 1 drink")]);
	}

	#[tokio::test]
	async fn test_blank_message_skips_interpreter() {
		let interpreter = ScriptedInterpreter::replying("1 burger");
		let engine = engine_with(interpreter.clone());
		engine.process("order").await.unwrap();

		let before = engine.snapshot().await;
		let snapshot = engine.process("   ").await.unwrap();

		assert_eq!(snapshot, before);
		assert_eq!(interpreter.calls(), 1);
	}

	#[tokio::test]
	async fn test_end_to_end_place_then_cancel() {
		let interpreter = ScriptedInterpreter::replying("2 burger, 1 fries");
		let engine = engine_with(interpreter.clone());

		let placed = engine.process("2 burgers and 1 fries").await.unwrap();
		assert_eq!(
			placed.totals,
			Totals {
				burgers: 2,
				fries: 1,
				drinks: 0
			}
		);
		assert_eq!(placed.history, vec![Order::new(1, "2 burger, 1 fries")]);

		let canceled = engine.process("cancel order #1").await.unwrap();
		assert_eq!(canceled.totals, Totals::default());
		assert!(canceled.history.is_empty());

		// Cancellations are resolved locally.
		assert_eq!(interpreter.calls(), 1);
	}

	#[tokio::test]
	async fn test_cancel_unknown_order() {
		let engine = engine_with(ScriptedInterpreter::replying("1 drink"));
		engine.process("a drink").await.unwrap();
		let before = engine.snapshot().await;

		let err = engine.process("cancel order #5").await.unwrap_err();
		assert!(matches!(err, EngineError::NotFound(LedgerError::NotFound(5))));
		assert_eq!(engine.snapshot().await, before);
	}

	#[tokio::test]
	async fn test_cancel_without_number_is_invalid_input() {
		let interpreter = ScriptedInterpreter::replying("1 drink");
		let engine = engine_with(interpreter.clone());

		let err = engine.process("cancel my order").await.unwrap_err();
		assert!(matches!(
			err,
			EngineError::InvalidInput(IntentError::MissingOrderId)
		));
		assert_eq!(interpreter.calls(), 0);
	}

	#[tokio::test]
	async fn test_interpreter_failure_leaves_state() {
		let engine = engine_with(ScriptedInterpreter::failing("connection refused"));

		let err = engine.process("1 burger").await.unwrap_err();
		assert!(matches!(err, EngineError::UpstreamFailure(_)));
		assert_eq!(
			err.to_string(),
			"Error processing order: Network error: connection refused"
		);
		assert_eq!(engine.snapshot().await, OrderSnapshot::default());
	}

	#[tokio::test]
	async fn test_concurrent_orders_get_unique_ids() {
		let engine = Arc::new(engine_with(ScriptedInterpreter::replying("1 burger")));

		let handles: Vec<_> = (0..20)
			.map(|_| {
				let engine = Arc::clone(&engine);
				tokio::spawn(async move { engine.process("a burger").await })
			})
			.collect();
		for handle in handles {
			handle.await.unwrap().unwrap();
		}

		let snapshot = engine.snapshot().await;
		assert_eq!(snapshot.totals.burgers, 20);
		let ids: Vec<_> = snapshot.history.iter().map(|o| o.id.clone()).collect();
		let expected: Vec<_> = (1..=20).map(|n| format!("Order #{}", n)).collect();
		assert_eq!(ids, expected);
	}
}
