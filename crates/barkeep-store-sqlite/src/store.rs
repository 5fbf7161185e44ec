//! [`SqliteStore`]: the SQLite implementation of [`CocktailStore`].

use std::path::Path;

use barkeep_core::{
  catalog::{
    CatalogSummary, MigrationOutcome, MigrationPlan, SourceRelationships, StagingBatch,
    StagingLoad,
  },
  source::SourceDataset,
  store::CocktailStore,
};

use tracing::debug;

use crate::{Error, Result, encode::decode_count, normalize, schema::SCHEMA, staging};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A cocktail catalog backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All clones
/// share one connection, so migrations never run concurrently.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CocktailStore impl ──────────────────────────────────────────────────────

impl CocktailStore for SqliteStore {
  type Error = Error;

  // ── Staging ───────────────────────────────────────────────────────────────

  async fn stage(&self, batch: StagingBatch) -> Result<usize> {
    if batch.is_empty() {
      return Ok(0);
    }

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let n = staging::insert_batch(&tx, &batch)?;
        tx.commit()?;
        Ok(n)
      })
      .await?;

    Ok(written)
  }

  async fn load_staging<I, E>(
    &self,
    source: SourceDataset,
    replace: bool,
    batches: I,
  ) -> Result<StagingLoad>
  where
    I: Iterator<Item = std::result::Result<StagingBatch, E>> + Send + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + Send + 'static,
  {
    // Returning early drops `tx`, which rolls the clear and appends back.
    let loaded = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut load = StagingLoad::default();
        if replace {
          load.cleared = staging::clear(&tx, source)?;
        }

        for batch in batches {
          let batch = match batch {
            Ok(batch) => batch,
            Err(e) => return Ok(Err(Error::Aborted(e.into()))),
          };
          if batch.source() != source {
            return Ok(Err(Error::SourceMismatch { expected: source, found: batch.source() }));
          }
          load.written += staging::insert_batch(&tx, &batch)?;
          load.batches += 1;
          debug!(%source, rows = load.written, "staged batch");
        }

        tx.commit()?;
        Ok(Ok(load))
      })
      .await??;

    Ok(loaded)
  }

  async fn clear_staging(&self, source: SourceDataset) -> Result<usize> {
    let removed = self
      .conn
      .call(move |conn| Ok(staging::clear(conn, source)?))
      .await?;
    Ok(removed)
  }

  // ── Normalization ─────────────────────────────────────────────────────────

  async fn migrate(&self, plan: &MigrationPlan) -> Result<MigrationOutcome> {
    if plan.sources.is_empty() {
      return Err(Error::EmptyPlan);
    }

    let plan = plan.clone();
    let outcome = self
      .conn
      .call(move |conn| Ok(normalize::run(conn, &plan)?))
      .await?;

    Ok(outcome)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn summary(&self) -> Result<CatalogSummary> {
    let summary = self
      .conn
      .call(|conn| {
        let (cocktails, with_instructions): (i64, i64) = conn.query_row(
          "SELECT COUNT(*), COUNT(instructions) FROM cocktail",
          [],
          |r| Ok((r.get(0)?, r.get(1)?)),
        )?;
        let count = |table: &str| -> rusqlite::Result<u64> {
          let n: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
          Ok(decode_count(n))
        };

        let mut stmt = conn.prepare(
          "SELECT COALESCE(source_dataset, ''),
                  COUNT(*),
                  COUNT(DISTINCT cocktail_id),
                  COUNT(DISTINCT ingredient_id)
           FROM cocktail_ingredient
           GROUP BY source_dataset
           ORDER BY source_dataset",
        )?;
        let by_source = stmt
          .query_map([], |row| {
            Ok(SourceRelationships {
              source_dataset: row.get(0)?,
              relationships:  decode_count(row.get(1)?),
              cocktails:      decode_count(row.get(2)?),
              ingredients:    decode_count(row.get(3)?),
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(CatalogSummary {
          cocktails:         decode_count(cocktails),
          with_instructions: decode_count(with_instructions),
          ingredients:       count("ingredient")?,
          glass_types:       count("glass_type")?,
          relationships:     count("cocktail_ingredient")?,
          by_source,
        })
      })
      .await?;

    Ok(summary)
  }
}
