//! Ingredient ordering keys.
//!
//! One dataset stores the ingredient position as an integer column, the other
//! as free text. Both are funnelled through [`OrderKey`] so that sorting
//! behaves the same way for either source.

use serde::Serialize;

/// The position of an ingredient within its recipe.
///
/// Variant order matters for the derived `Ord`: every `Position` sorts before
/// `Unordered`, positions ascend numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum OrderKey {
  Position(i64),
  Unordered,
}

impl OrderKey {
  /// The value written to `cocktail_ingredient.ingredient_order`.
  pub fn position(self) -> Option<i64> {
    match self {
      Self::Position(p) => Some(p),
      Self::Unordered => None,
    }
  }
}

impl From<Option<i64>> for OrderKey {
  fn from(value: Option<i64>) -> Self { value.map_or(Self::Unordered, Self::Position) }
}

/// Parse a textual order column. Total over all inputs: surrounding
/// whitespace is ignored, a run of ASCII digits that fits in `i64` is a
/// position, anything else is [`OrderKey::Unordered`].
pub fn parse_order_key(raw: &str) -> OrderKey {
  let digits = raw.trim();
  if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
    return OrderKey::Unordered;
  }
  digits.parse().map_or(OrderKey::Unordered, OrderKey::Position)
}
