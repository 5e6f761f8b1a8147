//! Order types for the drive-thru ledger.
//!
//! The menu is fixed to three items. Quantities are signed so that an
//! interpreter reply such as "-1 drink" can be represented as-is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A menu item tracked by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Item {
	Burger,
	Fries,
	Drink,
}

impl Item {
	/// All items in display order.
	pub const ALL: [Item; 3] = [Item::Burger, Item::Fries, Item::Drink];

	/// The literal stem that identifies this item in interpreter replies
	/// and order summaries.
	pub fn stem(&self) -> &'static str {
		match self {
			Item::Burger => "burger",
			Item::Fries => "fries",
			Item::Drink => "drink",
		}
	}

	/// Looks up an item by its stem. Matching is exact and case-sensitive.
	pub fn from_stem(stem: &str) -> Option<Self> {
		match stem {
			"burger" => Some(Item::Burger),
			"fries" => Some(Item::Fries),
			"drink" => Some(Item::Drink),
			_ => None,
		}
	}
}

impl fmt::Display for Item {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.stem())
	}
}

/// Signed per-item quantities for a single order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemQuantities {
	pub burger: i64,
	pub fries: i64,
	pub drink: i64,
}

impl ItemQuantities {
	/// Creates quantities from explicit per-item values.
	pub fn new(burger: i64, fries: i64, drink: i64) -> Self {
		Self {
			burger,
			fries,
			drink,
		}
	}

	/// Returns the quantity recorded for `item`.
	pub fn get(&self, item: Item) -> i64 {
		match item {
			Item::Burger => self.burger,
			Item::Fries => self.fries,
			Item::Drink => self.drink,
		}
	}

	/// Adds `quantity` to `item`, saturating at the bounds of `i64`.
	pub fn add(&mut self, item: Item, quantity: i64) {
		let slot = match item {
			Item::Burger => &mut self.burger,
			Item::Fries => &mut self.fries,
			Item::Drink => &mut self.drink,
		};
		*slot = slot.saturating_add(quantity);
	}

	/// Returns true when every item is zero.
	pub fn is_zero(&self) -> bool {
		Item::ALL.iter().all(|item| self.get(*item) == 0)
	}

	/// Human-readable summary of the non-zero items, e.g. "2 burger, 1 drink".
	///
	/// Items appear in burger, fries, drink order. All-zero quantities
	/// produce an empty string.
	pub fn summary(&self) -> String {
		Item::ALL
			.iter()
			.filter(|item| self.get(**item) != 0)
			.map(|item| format!("{} {}", self.get(*item), item))
			.collect::<Vec<_>>()
			.join(", ")
	}
}

/// Running totals across every active order.
///
/// Each order contributes at most `i64::MAX` per item and there are fewer
/// than `u64::MAX` orders, so the sums always fit in `i128` and stay exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
	pub burgers: i128,
	pub fries: i128,
	pub drinks: i128,
}

impl Totals {
	/// Adds the quantities of an order to the totals.
	pub fn apply(&mut self, quantities: &ItemQuantities) {
		self.burgers += i128::from(quantities.burger);
		self.fries += i128::from(quantities.fries);
		self.drinks += i128::from(quantities.drink);
	}

	/// Removes the quantities of an order from the totals.
	pub fn revert(&mut self, quantities: &ItemQuantities) {
		self.burgers -= i128::from(quantities.burger);
		self.fries -= i128::from(quantities.fries);
		self.drinks -= i128::from(quantities.drink);
	}
}

/// Formats the public identifier of an order number, e.g. "Order #3".
pub fn format_order_id(number: u64) -> String {
	format!("Order #{}", number)
}

/// An order as it appears in the order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
	/// Public identifier, "Order #N".
	pub id: String,
	/// Summary of the parsed quantities.
	pub details: String,
}

impl Order {
	/// Creates the history record for order `number`.
	pub fn new(number: u64, details: impl Into<String>) -> Self {
		Self {
			id: format_order_id(number),
			details: details.into(),
		}
	}
}

/// Current state of the ledger returned after every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSnapshot {
	pub totals: Totals,
	/// Active orders in placement order.
	pub history: Vec<Order>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_summary_skips_zero_items() {
		let quantities = ItemQuantities::new(2, 0, 1);
		assert_eq!(quantities.summary(), "2 burger, 1 drink");
	}

	#[test]
	fn test_summary_keeps_negative_items() {
		let quantities = ItemQuantities::new(0, -3, 0);
		assert_eq!(quantities.summary(), "-3 fries");
	}

	#[test]
	fn test_summary_empty_when_zero() {
		let quantities = ItemQuantities::default();
		assert!(quantities.is_zero());
		assert_eq!(quantities.summary(), "");
	}

	#[test]
	fn test_add_saturates() {
		let mut quantities = ItemQuantities::new(i64::MAX, 0, 0);
		quantities.add(Item::Burger, 1);
		assert_eq!(quantities.burger, i64::MAX);
	}

	#[test]
	fn test_totals_apply_and_revert() {
		let mut totals = Totals::default();
		let first = ItemQuantities::new(2, 1, 0);
		let second = ItemQuantities::new(1, 0, 3);

		totals.apply(&first);
		totals.apply(&second);
		assert_eq!(
			totals,
			Totals {
				burgers: 3,
				fries: 1,
				drinks: 3
			}
		);

		totals.revert(&first);
		assert_eq!(
			totals,
			Totals {
				burgers: 1,
				fries: 0,
				drinks: 3
			}
		);
	}

	#[test]
	fn test_totals_do_not_saturate() {
		let mut totals = Totals::default();
		let big = ItemQuantities::new(i64::MAX, 0, i64::MIN);
		let one = ItemQuantities::new(1, 0, -1);

		totals.apply(&big);
		totals.apply(&one);
		assert_eq!(totals.burgers, i128::from(i64::MAX) + 1);
		assert_eq!(totals.drinks, i128::from(i64::MIN) - 1);

		totals.revert(&big);
		assert_eq!(
			totals,
			Totals {
				burgers: 1,
				fries: 0,
				drinks: -1
			}
		);
	}

	#[test]
	fn test_item_stems() {
		for item in Item::ALL {
			assert_eq!(Item::from_stem(item.stem()), Some(item));
		}
		assert_eq!(Item::from_stem("burgers"), None);
	}

	#[test]
	fn test_order_id_format() {
		let order = Order::new(12, "1 drink");
		assert_eq!(order.id, "Order #12");
		assert_eq!(order.details, "1 drink");
	}
}
