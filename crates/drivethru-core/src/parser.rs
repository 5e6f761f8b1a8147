//! Quantity parser for interpreter replies.

use drivethru_types::{Item, ItemQuantities};
use once_cell::sync::Lazy;
use regex::Regex;

/// `<signed integer><optional whitespace><item stem>`. No word boundary, so
/// "2 burgers" matches through its "burger" stem. Digits are ASCII only so
/// every match parses as an integer.
static QUANTITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"(-?[0-9]+)\s*(burger|fries|drink)").expect("quantity pattern is valid")
});

/// Sums every signed `<n> <item>` mention in `text`, case-insensitively.
///
/// Text that does not match is ignored. Quantities too large for `i64` are
/// skipped.
pub fn parse_quantities(text: &str) -> ItemQuantities {
	let mut quantities = ItemQuantities::default();
	let lowered = text.to_lowercase();

	for cap in QUANTITY_PATTERN.captures_iter(&lowered) {
		let (Some(number), Some(stem)) = (cap.get(1), cap.get(2)) else {
			continue;
		};
		let Some(item) = Item::from_stem(stem.as_str()) else {
			continue;
		};

		match number.as_str().parse::<i64>() {
			Ok(quantity) => quantities.add(item, quantity),
			Err(e) => {
				tracing::warn!(
					quantity = number.as_str(),
					item = %item,
					error = %e,
					"Skipping unparsable quantity"
				);
			},
		}
	}

	quantities
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_no_matches_is_zero() {
		assert_eq!(parse_quantities(""), ItemQuantities::default());
		assert_eq!(
			parse_quantities("Sorry, I didn't catch that."),
			ItemQuantities::default()
		);
	}

	#[test]
	fn test_basic_reply() {
		assert_eq!(
			parse_quantities("2 burger, 1 drink"),
			ItemQuantities::new(2, 0, 1)
		);
	}

	#[test]
	fn test_plural_stems_match() {
		assert_eq!(
			parse_quantities("2 burgers, 3 drinks and 1 fries"),
			ItemQuantities::new(2, 1, 3)
		);
	}

	#[test]
	fn test_case_insensitive_without_space() {
		assert_eq!(
			parse_quantities("3BURGERS and 2 Fries"),
			ItemQuantities::new(3, 2, 0)
		);
	}

	#[test]
	fn test_negative_quantities() {
		assert_eq!(
			parse_quantities("-2 burgers, -1 drink"),
			ItemQuantities::new(-2, 0, -1)
		);
	}

	#[test]
	fn test_repeated_mentions_are_summed() {
		assert_eq!(
			parse_quantities("1 burger, 2 burger, -1 burger, 4 fries"),
			ItemQuantities::new(2, 4, 0)
		);
	}

	#[test]
	fn test_word_numbers_are_ignored() {
		assert_eq!(
			parse_quantities("two burgers and 1 drink"),
			ItemQuantities::new(0, 0, 1)
		);
	}

	#[test]
	fn test_overflowing_quantity_is_skipped() {
		assert_eq!(
			parse_quantities("99999999999999999999 burger, 1 fries"),
			ItemQuantities::new(0, 1, 0)
		);
	}

	#[test]
	fn test_singular_fry_is_not_an_item() {
		assert_eq!(parse_quantities("1 fry"), ItemQuantities::default());
	}

	#[test]
	fn test_non_ascii_digits_do_not_match() {
		assert_eq!(
			parse_quantities("\u{0662} burger, 1 drink"),
			ItemQuantities::new(0, 0, 1)
		);
	}
}
