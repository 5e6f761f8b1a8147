//! Intent classification for raw customer messages.
//!
//! A message is a cancellation when it mentions both "cancel" and "order"
//! (case-insensitive). The target is the first `#<ASCII digits>` token. Every
//! other non-blank message is a new order.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static ORDER_REFERENCE: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"#([0-9]+)").expect("order reference pattern is valid"));

/// What a customer message asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
	/// Blank message; nothing to do.
	Empty,
	/// Place a new order described by the text.
	NewOrder(String),
	/// Cancel the order with the given number.
	CancelOrder(u64),
}

/// Errors for messages that ask for a cancellation without a usable target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
	#[error("Cancellation must reference an order number such as #1")]
	MissingOrderId,
	#[error("Invalid order number: #{0}")]
	InvalidOrderId(String),
}

/// Classifies a raw message.
pub fn classify(message: &str) -> Result<Intent, IntentError> {
	if message.trim().is_empty() {
		return Ok(Intent::Empty);
	}

	let lowered = message.to_lowercase();
	if !(lowered.contains("cancel") && lowered.contains("order")) {
		return Ok(Intent::NewOrder(message.to_string()));
	}

	let digits = ORDER_REFERENCE
		.captures(message)
		.and_then(|cap| cap.get(1))
		.ok_or(IntentError::MissingOrderId)?
		.as_str();

	digits
		.parse::<u64>()
		.map(Intent::CancelOrder)
		.map_err(|_| IntentError::InvalidOrderId(digits.to_string()))
}
