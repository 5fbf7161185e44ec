//! The `CocktailStore` trait.
//!
//! Implemented by storage backends (e.g. `barkeep-store-sqlite`). The CLI
//! depends on this abstraction rather than on a concrete backend.

use std::future::Future;

use crate::{
  catalog::{CatalogSummary, MigrationOutcome, MigrationPlan, StagingBatch, StagingLoad},
  source::SourceDataset,
};

/// Abstraction over a catalog backend.
///
/// Staging tables are append-only; the canonical tables are only ever
/// inserted into or merged, never deleted from.
pub trait CocktailStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Staging ───────────────────────────────────────────────────────────

  /// Append a batch to its staging table. Returns the number of rows written.
  fn stage(
    &self,
    batch: StagingBatch,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Load a whole staging run for `source` as one unit of work.
  ///
  /// With `replace`, the staging table is cleared first. Batches are pulled
  /// one at a time and appended; nothing becomes visible unless every batch
  /// arrives. An `Err` from `batches`, or a batch for another source, rolls
  /// back the clear and every append made so far.
  fn load_staging<I, E>(
    &self,
    source: SourceDataset,
    replace: bool,
    batches: I,
  ) -> impl Future<Output = Result<StagingLoad, Self::Error>> + Send + '_
  where
    I: Iterator<Item = Result<StagingBatch, E>> + Send + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + Send + 'static;

  /// Remove every row from the staging table of `source`.
  fn clear_staging(
    &self,
    source: SourceDataset,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Normalization ─────────────────────────────────────────────────────

  /// Migrate the staging tables named by `plan` into the canonical schema.
  ///
  /// The whole run is a single transaction: any error rolls back everything,
  /// and a dry run rolls back after computing the same reports.
  fn migrate<'a>(
    &'a self,
    plan: &'a MigrationPlan,
  ) -> impl Future<Output = Result<MigrationOutcome, Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Row counts across the canonical tables.
  fn summary(
    &self,
  ) -> impl Future<Output = Result<CatalogSummary, Self::Error>> + Send + '_;
}
