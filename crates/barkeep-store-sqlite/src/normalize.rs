//! Staging → canonical schema migration.
//!
//! Every function here runs on the connection thread against whatever
//! transaction the caller opened; none of them commit. Identity conflicts are
//! resolved by the merge tables in [`barkeep_core::merge`], rendered straight
//! into the `ON CONFLICT` clauses below.

use std::sync::LazyLock;

use barkeep_core::{
  catalog::{
    ImportReport, MigrationOutcome, MigrationPlan, NewCocktail, NewCocktailIngredient,
    StagedCocktail, StagedLine,
  },
  merge::{COCKTAIL_INGREDIENT_MERGE, COCKTAIL_MERGE, conflict_assignments},
  name::{CocktailName, GlassName, IngredientName},
  source::SourceDataset,
};
use rusqlite::{Connection, OptionalExtension as _, params};
use tracing::{debug, info};

use crate::encode::{decode_count, decode_order_key, encode_limit};

// ─── Dimension resolution ────────────────────────────────────────────────────

/// Get-or-create an ingredient row and return its id.
///
/// Read-then-insert rather than insert-or-ignore: the id is needed right away
/// for the relationship row in the same transaction.
pub fn resolve_ingredient(conn: &Connection, name: &IngredientName) -> rusqlite::Result<i64> {
  get_or_create(conn, "ingredient", name.as_str())
}

/// Get-or-create a glass type row. No glass resolves to no id.
pub fn resolve_glass(conn: &Connection, name: Option<&GlassName>) -> rusqlite::Result<Option<i64>> {
  name.map(|g| get_or_create(conn, "glass_type", g.as_str())).transpose()
}

fn get_or_create(conn: &Connection, table: &'static str, key: &str) -> rusqlite::Result<i64> {
  let existing: Option<i64> = conn
    .prepare_cached(&format!("SELECT id FROM {table} WHERE name = ?1"))?
    .query_row(params![key], |r| r.get(0))
    .optional()?;

  if let Some(id) = existing {
    return Ok(id);
  }

  conn
    .prepare_cached(&format!("INSERT INTO {table} (name) VALUES (?1) RETURNING id"))?
    .query_row(params![key], |r| r.get(0))
}

// ─── Upserts ─────────────────────────────────────────────────────────────────

static UPSERT_COCKTAIL: LazyLock<String> = LazyLock::new(|| {
  format!(
    "INSERT INTO cocktail (name, source, category, glass_type_id, description, instructions)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
     ON CONFLICT (name, source) DO UPDATE SET {}
     RETURNING id",
    conflict_assignments("cocktail", COCKTAIL_MERGE),
  )
});

static UPSERT_COCKTAIL_INGREDIENT: LazyLock<String> = LazyLock::new(|| {
  format!(
    "INSERT INTO cocktail_ingredient (
       cocktail_id, ingredient_id, quantity, ingredient_order, source_dataset
     ) VALUES (?1, ?2, ?3, ?4, ?5)
     ON CONFLICT (cocktail_id, ingredient_id) DO UPDATE SET {}",
    conflict_assignments("cocktail_ingredient", COCKTAIL_INGREDIENT_MERGE),
  )
});

/// Insert or merge a cocktail keyed by `(name, source)`; returns its id on
/// both paths in a single statement.
pub fn upsert_cocktail(conn: &Connection, cocktail: &NewCocktail) -> rusqlite::Result<i64> {
  let glass_id = resolve_glass(conn, cocktail.glass.as_ref())?;

  conn.prepare_cached(&UPSERT_COCKTAIL)?.query_row(
    params![
      cocktail.name.as_str(),
      cocktail.source.as_str(),
      cocktail.category,
      glass_id,
      cocktail.description,
      cocktail.instructions,
    ],
    |r| r.get(0),
  )
}

/// Insert or overwrite a relationship keyed by `(cocktail_id, ingredient_id)`.
pub fn upsert_cocktail_ingredient(
  conn: &Connection,
  link: &NewCocktailIngredient,
) -> rusqlite::Result<()> {
  conn.prepare_cached(&UPSERT_COCKTAIL_INGREDIENT)?.execute(params![
    link.cocktail_id,
    link.ingredient_id,
    link.quantity,
    link.order.position(),
    link.source_dataset.as_str(),
  ])?;
  Ok(())
}

// ─── Staging reads ───────────────────────────────────────────────────────────

/// Per-source projections over the staging tables. The long-format source
/// carries no glass or instructions.
struct StagingQueries {
  count:     &'static str,
  cocktails: &'static str,
  lines:     &'static str,
  has_name:  &'static str,
}

fn queries(source: SourceDataset) -> StagingQueries {
  match source {
    SourceDataset::TheCocktailDb => StagingQueries {
      count:     "SELECT COUNT(DISTINCT drink) FROM the_cocktail_db",
      cocktails: "SELECT drink, MAX(category), MAX(glass), MAX(instructions)
                  FROM the_cocktail_db
                  GROUP BY drink ORDER BY drink LIMIT ?1",
      lines:     "SELECT ingredient_order, ingredient, measure
                  FROM the_cocktail_db
                  WHERE drink = ?1 AND ingredient IS NOT NULL
                  ORDER BY rowid",
      has_name:  "SELECT EXISTS (SELECT 1 FROM the_cocktail_db WHERE TRIM(drink) = ?1)",
    },
    SourceDataset::BostonCocktails => StagingQueries {
      count:     "SELECT COUNT(DISTINCT name) FROM boston_cocktails",
      cocktails: "SELECT name, MAX(category), NULL, NULL
                  FROM boston_cocktails
                  GROUP BY name ORDER BY name LIMIT ?1",
      lines:     "SELECT ingredient_number, ingredient, measure
                  FROM boston_cocktails
                  WHERE name = ?1 AND ingredient IS NOT NULL
                  ORDER BY rowid",
      has_name:  "SELECT EXISTS (SELECT 1 FROM boston_cocktails WHERE TRIM(name) = ?1)",
    },
  }
}

/// Number of distinct cocktails staged for `source`.
pub fn staged_cocktail_count(conn: &Connection, source: SourceDataset) -> rusqlite::Result<u64> {
  let n: i64 = conn.query_row(queries(source).count, [], |r| r.get(0))?;
  Ok(decode_count(n))
}

/// Distinct staged cocktails ordered by name, at most `limit` of them.
pub fn staged_cocktails(
  conn: &Connection,
  source: SourceDataset,
  limit: Option<usize>,
) -> rusqlite::Result<Vec<StagedCocktail>> {
  let mut stmt = conn.prepare_cached(queries(source).cocktails)?;
  let rows = stmt
    .query_map(params![encode_limit(limit)], |row| {
      Ok(StagedCocktail {
        name:         row.get::<_, Option<String>>(0)?.unwrap_or_default(),
        category:     row.get(1)?,
        glass:        row.get(2)?,
        instructions: row.get(3)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

/// Staged ingredient lines of one cocktail, sorted by order key with
/// unordered lines last and ties kept in staging order.
pub fn staged_lines(
  conn: &Connection,
  source: SourceDataset,
  cocktail: &str,
) -> rusqlite::Result<Vec<StagedLine>> {
  let mut stmt = conn.prepare_cached(queries(source).lines)?;
  let mut lines = stmt
    .query_map(params![cocktail], |row| {
      Ok(StagedLine {
        order:      decode_order_key(row.get_ref(0)?),
        ingredient: row.get(1)?,
        measure:    row.get(2)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  lines.sort_by_key(|l| l.order);
  Ok(lines)
}

/// Whether a cocktail of this name exists under another source, either
/// imported already or waiting in that source's staging table. Checking both
/// keeps the count independent of which source is imported first.
fn name_taken_elsewhere(
  conn: &Connection,
  name: &CocktailName,
  source: SourceDataset,
) -> rusqlite::Result<bool> {
  let imported: bool = conn
    .prepare_cached("SELECT EXISTS (SELECT 1 FROM cocktail WHERE name = ?1 AND source <> ?2)")?
    .query_row(params![name.as_str(), source.as_str()], |r| r.get(0))?;
  if imported {
    return Ok(true);
  }

  for other in source.others() {
    let staged: bool = conn
      .prepare_cached(queries(other).has_name)?
      .query_row(params![name.as_str()], |r| r.get(0))?;
    if staged {
      return Ok(true);
    }
  }
  Ok(false)
}

// ─── Drivers ─────────────────────────────────────────────────────────────────

/// Import one source from its staging table.
///
/// Validation failures are counted and skipped; any database error aborts
/// and is left for the caller's transaction to roll back.
pub fn import_source(
  conn: &Connection,
  source: SourceDataset,
  limit: Option<usize>,
) -> rusqlite::Result<ImportReport> {
  let mut report = ImportReport::default();

  for staged in staged_cocktails(conn, source, limit)? {
    let Ok(name) = CocktailName::parse(&staged.name) else {
      debug!(%source, "skipping staged cocktail with blank name");
      report.cocktails_skipped += 1;
      continue;
    };

    if name_taken_elsewhere(conn, &name, source)? {
      report.name_conflicts += 1;
    }

    let cocktail_id = upsert_cocktail(conn, &NewCocktail {
      name,
      source,
      category: staged.category,
      glass: GlassName::normalize(staged.glass.as_deref()),
      description: None,
      instructions: staged.instructions,
    })?;
    report.cocktails_upserted += 1;

    for line in staged_lines(conn, source, &staged.name)? {
      let Ok(ingredient) = IngredientName::parse(&line.ingredient) else {
        debug!(%source, cocktail = %staged.name, "skipping blank ingredient");
        report.relations_skipped += 1;
        continue;
      };

      let ingredient_id = resolve_ingredient(conn, &ingredient)?;
      upsert_cocktail_ingredient(conn, &NewCocktailIngredient {
        cocktail_id,
        ingredient_id,
        quantity: line.measure.unwrap_or_default(),
        order: line.order,
        source_dataset: source,
      })?;
      report.relations_upserted += 1;
    }
  }

  Ok(report)
}

/// Run a whole [`MigrationPlan`] inside one transaction.
///
/// Commits on success; a dry run rolls back after producing the same
/// reports. An error drops the transaction, which rolls it back.
pub fn run(conn: &mut Connection, plan: &MigrationPlan) -> rusqlite::Result<MigrationOutcome> {
  let tx = conn.transaction()?;
  let mut reports = Vec::with_capacity(plan.sources.len());

  for &source in &plan.sources {
    let staged = staged_cocktail_count(&tx, source)?;
    let to_process = plan.limit.map_or(staged, |l| staged.min(l as u64));
    info!(%source, staged, to_process, "importing");

    let report = import_source(&tx, source, plan.limit)?;
    info!(%source, %report, "imported");
    reports.push((source, report));
  }

  let committed = if plan.dry_run {
    tx.rollback()?;
    info!("dry run: rolled back");
    false
  } else {
    tx.commit()?;
    true
  };

  Ok(MigrationOutcome { reports, committed })
}
