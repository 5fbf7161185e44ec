//! Catalog records: staging rows, upsert inputs and run reports.

use std::fmt;

use serde::Serialize;

use crate::{
  name::{CocktailName, GlassName},
  order::OrderKey,
  source::SourceDataset,
};

// ─── Staging rows ────────────────────────────────────────────────────────────

/// A row of the `the_cocktail_db` staging table: one ingredient slot of a
/// recipe, with the recipe attributes repeated on every row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StagedDrinkRow {
  pub drink:            String,
  pub category:         Option<String>,
  pub glass:            Option<String>,
  pub instructions:     Option<String>,
  pub ingredient_order: Option<i64>,
  pub ingredient:       Option<String>,
  pub measure:          Option<String>,
}

/// A row of the `boston_cocktails` staging table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StagedBostonRow {
  pub name:              String,
  pub category:          Option<String>,
  pub ingredient_number: Option<String>,
  pub ingredient:        Option<String>,
  pub measure:           Option<String>,
}

/// A batch of rows destined for one staging table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagingBatch {
  TheCocktailDb(Vec<StagedDrinkRow>),
  BostonCocktails(Vec<StagedBostonRow>),
}

impl StagingBatch {
  pub fn source(&self) -> SourceDataset {
    match self {
      Self::TheCocktailDb(_) => SourceDataset::TheCocktailDb,
      Self::BostonCocktails(_) => SourceDataset::BostonCocktails,
    }
  }

  pub fn len(&self) -> usize {
    match self {
      Self::TheCocktailDb(rows) => rows.len(),
      Self::BostonCocktails(rows) => rows.len(),
    }
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

// ─── Staging views read by the normalizer ────────────────────────────────────

/// One distinct cocktail as projected out of a staging table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedCocktail {
  /// Raw staged name; validated into a [`CocktailName`] by the driver.
  pub name:         String,
  pub category:     Option<String>,
  pub glass:        Option<String>,
  pub instructions: Option<String>,
}

/// One staged ingredient line of a cocktail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedLine {
  pub order:      OrderKey,
  pub ingredient: String,
  pub measure:    Option<String>,
}

// ─── Upsert inputs ───────────────────────────────────────────────────────────

/// Input to the cocktail upsert. Identity is `(name, source)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCocktail {
  pub name:         CocktailName,
  pub source:       SourceDataset,
  pub category:     Option<String>,
  pub glass:        Option<GlassName>,
  pub description:  Option<String>,
  pub instructions: Option<String>,
}

/// Input to the relationship upsert. Identity is
/// `(cocktail_id, ingredient_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCocktailIngredient {
  pub cocktail_id:    i64,
  pub ingredient_id:  i64,
  pub quantity:       String,
  pub order:          OrderKey,
  pub source_dataset: SourceDataset,
}

// ─── Mergeable attributes ────────────────────────────────────────────────────

/// The non-identifying columns of a `cocktail` row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CocktailAttributes {
  pub category:      Option<String>,
  pub glass_type_id: Option<i64>,
  pub description:   Option<String>,
  pub instructions:  Option<String>,
}

/// The non-identifying columns of a `cocktail_ingredient` row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelationshipAttributes {
  pub quantity:         Option<String>,
  pub ingredient_order: Option<i64>,
  pub source_dataset:   Option<String>,
}

// ─── Runs ────────────────────────────────────────────────────────────────────

/// What a `migrate` invocation should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
  /// Sources to import, in order.
  pub sources: Vec<SourceDataset>,
  /// Cap on distinct cocktails processed per source.
  pub limit:   Option<usize>,
  /// Run everything, then roll back.
  pub dry_run: bool,
}

/// What a committed staging load did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StagingLoad {
  /// Rows removed by `replace` before loading.
  pub cleared: usize,
  /// Rows appended.
  pub written: usize,
  pub batches: usize,
}

/// Aggregate counters for one source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
  pub cocktails_upserted: u64,
  /// Staged cocktails whose name failed validation.
  pub cocktails_skipped:  u64,
  pub relations_upserted: u64,
  /// Staged ingredient lines whose name failed validation.
  pub relations_skipped:  u64,
  /// Cocktails whose name also exists under another source, either already
  /// imported or still staged. Both are kept; this only flags the overlap,
  /// and the count does not depend on the order sources are imported in.
  pub name_conflicts:     u64,
}

impl fmt::Display for ImportReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "cocktails_created_or_upserted={}, cocktails_skipped={}, relations_upserted={}, \
       relations_skipped={}, name_conflicts={}",
      self.cocktails_upserted,
      self.cocktails_skipped,
      self.relations_upserted,
      self.relations_skipped,
      self.name_conflicts,
    )
  }
}

/// The result of a `migrate` invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationOutcome {
  pub reports:   Vec<(SourceDataset, ImportReport)>,
  /// `false` when the run was a dry run and everything was rolled back.
  pub committed: bool,
}

// ─── Summary ─────────────────────────────────────────────────────────────────

/// Relationship counts attributed to one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRelationships {
  pub source_dataset: String,
  pub relationships:  u64,
  pub cocktails:      u64,
  pub ingredients:    u64,
}

/// Row counts across the canonical tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
  pub cocktails:         u64,
  pub with_instructions: u64,
  pub ingredients:       u64,
  pub glass_types:       u64,
  pub relationships:     u64,
  pub by_source:         Vec<SourceRelationships>,
}

impl CatalogSummary {
  pub fn without_instructions(&self) -> u64 { self.cocktails.saturating_sub(self.with_instructions) }
}
