//! Decoding helpers between SQLite column values and domain types.
//!
//! Staging tables are unconstrained, so a column declared `INTEGER` may still
//! hold text or a float (pandas writes whole numbers as `REAL` once a column
//! has gaps). Everything that reads an order column goes through
//! [`decode_order_key`].

use barkeep_core::order::{OrderKey, parse_order_key};
use rusqlite::types::ValueRef;

/// Map any SQLite value to an [`OrderKey`].
///
/// Integers are positions; text goes through [`parse_order_key`]; a float is
/// a position only when it is a non-negative whole number. Everything else
/// is unordered.
pub fn decode_order_key(value: ValueRef<'_>) -> OrderKey {
  match value {
    ValueRef::Integer(i) => OrderKey::Position(i),
    ValueRef::Text(bytes) => {
      std::str::from_utf8(bytes).map_or(OrderKey::Unordered, parse_order_key)
    }
    ValueRef::Real(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= i64::MAX as f64 => {
      OrderKey::Position(f as i64)
    }
    _ => OrderKey::Unordered,
  }
}

/// SQLite counts come back as `i64`.
pub fn decode_count(n: i64) -> u64 { u64::try_from(n).unwrap_or_default() }

/// `LIMIT -1` means no limit in SQLite.
pub fn encode_limit(limit: Option<usize>) -> i64 {
  limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX))
}
