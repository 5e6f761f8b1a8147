//! In-memory order ledger.
//!
//! Each active order keeps its parsed quantities and its summary in one
//! entry, so the history and the per-order quantities cannot diverge. The
//! running totals always equal the sum of the active entries.

use drivethru_types::{ItemQuantities, Order, OrderSnapshot, Totals};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
	#[error("Order not found: #{0}")]
	NotFound(u64),
}

#[derive(Debug, Clone)]
struct LedgerEntry {
	quantities: ItemQuantities,
	details: String,
}

/// Process-lifetime record of active orders and running totals.
#[derive(Debug)]
pub struct Ledger {
	/// Keyed by order number; numbers only grow, so iteration order is placement order.
	entries: BTreeMap<u64, LedgerEntry>,
	totals: Totals,
	next_order: u64,
}

impl Default for Ledger {
	fn default() -> Self {
		Self::new()
	}
}

impl Ledger {
	/// Creates an empty ledger whose first order is "Order #1".
	pub fn new() -> Self {
		Self {
			entries: BTreeMap::new(),
			totals: Totals::default(),
			next_order: 1,
		}
	}

	/// Records a new order and returns its history record.
	pub fn place(&mut self, quantities: ItemQuantities) -> Order {
		let number = self.next_order;
		self.next_order += 1;

		let details = quantities.summary();
		self.totals.apply(&quantities);
		self.entries.insert(
			number,
			LedgerEntry {
				quantities,
				details: details.clone(),
			},
		);

		Order::new(number, details)
	}

	/// Removes an active order and subtracts its quantities from the totals.
	///
	/// Unknown numbers leave the ledger untouched.
	pub fn cancel(&mut self, number: u64) -> Result<Order, LedgerError> {
		let entry = self
			.entries
			.remove(&number)
			.ok_or(LedgerError::NotFound(number))?;

		self.totals.revert(&entry.quantities);
		Ok(Order::new(number, entry.details))
	}

	/// Quantities recorded for an active order.
	pub fn quantities(&self, number: u64) -> Option<ItemQuantities> {
		self.entries.get(&number).map(|entry| entry.quantities)
	}

	pub fn totals(&self) -> Totals {
		self.totals
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Current totals and the full history of active orders.
	pub fn snapshot(&self) -> OrderSnapshot {
		OrderSnapshot {
			totals: self.totals,
			history: self
				.entries
				.iter()
				.map(|(number, entry)| Order::new(*number, entry.details.clone()))
				.collect(),
		}
	}
}
