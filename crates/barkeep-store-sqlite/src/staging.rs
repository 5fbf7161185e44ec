//! Appending to and clearing the staging tables.

use barkeep_core::{
  catalog::{StagedBostonRow, StagedDrinkRow, StagingBatch},
  source::SourceDataset,
};
use rusqlite::{Connection, params};

/// Append every row of `batch` to its staging table.
pub fn insert_batch(conn: &Connection, batch: &StagingBatch) -> rusqlite::Result<usize> {
  match batch {
    StagingBatch::TheCocktailDb(rows) => insert_drinks(conn, rows),
    StagingBatch::BostonCocktails(rows) => insert_boston(conn, rows),
  }
}

fn insert_drinks(conn: &Connection, rows: &[StagedDrinkRow]) -> rusqlite::Result<usize> {
  let mut stmt = conn.prepare_cached(
    "INSERT INTO the_cocktail_db (
       drink, category, glass, instructions, ingredient_order, ingredient, measure
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
  )?;
  for r in rows {
    stmt.execute(params![
      r.drink,
      r.category,
      r.glass,
      r.instructions,
      r.ingredient_order,
      r.ingredient,
      r.measure,
    ])?;
  }
  Ok(rows.len())
}

fn insert_boston(conn: &Connection, rows: &[StagedBostonRow]) -> rusqlite::Result<usize> {
  let mut stmt = conn.prepare_cached(
    "INSERT INTO boston_cocktails (
       name, category, ingredient_number, ingredient, measure
     ) VALUES (?1, ?2, ?3, ?4, ?5)",
  )?;
  for r in rows {
    stmt.execute(params![
      r.name,
      r.category,
      r.ingredient_number,
      r.ingredient,
      r.measure,
    ])?;
  }
  Ok(rows.len())
}

/// Delete every row from the staging table of `source`.
pub fn clear(conn: &Connection, source: SourceDataset) -> rusqlite::Result<usize> {
  conn.execute(&format!("DELETE FROM {}", source.staging_table()), [])
}
