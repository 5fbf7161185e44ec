//! Field-level merge policies for upserts.
//!
//! When an incoming record collides with a stored one on its identity key,
//! every non-key column is resolved by one [`FieldPolicy`]. The tables below
//! are the single source of truth: the store renders them into its conflict
//! clause with [`conflict_assignments`], and the in-memory merges in this
//! module apply the very same entries.

use serde::Serialize;

use crate::catalog::{CocktailAttributes, RelationshipAttributes};

/// How a stored column reacts to an incoming value on conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPolicy {
  /// Take the incoming value, even when it is null or empty.
  Overwrite,
  /// Take the incoming value only when it is non-null.
  CoalesceNonNull,
}

impl FieldPolicy {
  pub fn apply<T>(self, stored: Option<T>, incoming: Option<T>) -> Option<T> {
    match self {
      Self::Overwrite => incoming,
      Self::CoalesceNonNull => incoming.or(stored),
    }
  }

  /// SQL `SET` fragment for `column` of `table` inside an
  /// `ON CONFLICT … DO UPDATE` clause.
  pub fn assignment(self, table: &str, column: &str) -> String {
    match self {
      Self::Overwrite => format!("{column} = excluded.{column}"),
      Self::CoalesceNonNull => {
        format!("{column} = COALESCE(excluded.{column}, {table}.{column})")
      }
    }
  }
}

/// One row of a merge decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
  pub column: &'static str,
  pub policy: FieldPolicy,
}

const fn rule(column: &'static str, policy: FieldPolicy) -> FieldRule {
  FieldRule { column, policy }
}

// ─── Decision tables ─────────────────────────────────────────────────────────

/// `cocktail`, keyed by `(name, source)`. Later imports enrich but never
/// erase detail.
pub const COCKTAIL_MERGE: &[FieldRule] = &[
  rule("category", FieldPolicy::Overwrite),
  rule("glass_type_id", FieldPolicy::CoalesceNonNull),
  rule("description", FieldPolicy::CoalesceNonNull),
  rule("instructions", FieldPolicy::CoalesceNonNull),
];

/// `cocktail_ingredient`, keyed by `(cocktail_id, ingredient_id)`. A pairing
/// has one current measurement; the newest import wins outright.
pub const COCKTAIL_INGREDIENT_MERGE: &[FieldRule] = &[
  rule("quantity", FieldPolicy::Overwrite),
  rule("ingredient_order", FieldPolicy::Overwrite),
  rule("source_dataset", FieldPolicy::Overwrite),
];

/// Look up the policy for `column`.
///
/// # Panics
///
/// If `column` is not listed in `rules`; the tables are constants, so this
/// only fires on a programming error.
pub fn policy_for(rules: &[FieldRule], column: &str) -> FieldPolicy {
  rules
    .iter()
    .find(|r| r.column == column)
    .map(|r| r.policy)
    .unwrap_or_else(|| panic!("no merge rule for column {column:?}"))
}

/// Render a decision table as the `SET` list of an upsert.
pub fn conflict_assignments(table: &str, rules: &[FieldRule]) -> String {
  rules
    .iter()
    .map(|r| r.policy.assignment(table, r.column))
    .collect::<Vec<_>>()
    .join(", ")
}

// ─── In-memory merges ────────────────────────────────────────────────────────

/// Resolve a stored cocktail against an incoming one using [`COCKTAIL_MERGE`].
pub fn merge_cocktail(
  stored: CocktailAttributes,
  incoming: CocktailAttributes,
) -> CocktailAttributes {
  let p = |column| policy_for(COCKTAIL_MERGE, column);
  CocktailAttributes {
    category:      p("category").apply(stored.category, incoming.category),
    glass_type_id: p("glass_type_id").apply(stored.glass_type_id, incoming.glass_type_id),
    description:   p("description").apply(stored.description, incoming.description),
    instructions:  p("instructions").apply(stored.instructions, incoming.instructions),
  }
}

/// Resolve a stored relationship against an incoming one using
/// [`COCKTAIL_INGREDIENT_MERGE`].
pub fn merge_relationship(
  stored: RelationshipAttributes,
  incoming: RelationshipAttributes,
) -> RelationshipAttributes {
  let p = |column| policy_for(COCKTAIL_INGREDIENT_MERGE, column);
  RelationshipAttributes {
    quantity:         p("quantity").apply(stored.quantity, incoming.quantity),
    ingredient_order: p("ingredient_order").apply(stored.ingredient_order, incoming.ingredient_order),
    source_dataset:   p("source_dataset").apply(stored.source_dataset, incoming.source_dataset),
  }
}
