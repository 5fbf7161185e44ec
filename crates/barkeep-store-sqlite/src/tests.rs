//! Integration tests for `SqliteStore` against an in-memory database.

use barkeep_core::{
  catalog::{
    CatalogSummary, ImportReport, MigrationPlan, StagedBostonRow, StagedDrinkRow, StagingBatch,
    StagingLoad,
  },
  reshape::{LongRow, WideRow, stage_long, stage_wide},
  source::SourceDataset,
  store::CocktailStore,
};

use rusqlite::types::Value;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn plan(sources: &[SourceDataset]) -> MigrationPlan {
  MigrationPlan { sources: sources.to_vec(), limit: None, dry_run: false }
}

const BOTH: &[SourceDataset] = &[SourceDataset::TheCocktailDb, SourceDataset::BostonCocktails];

fn martini() -> WideRow {
  let mut row = WideRow {
    drink:        "Martini".into(),
    category:     Some("Cocktail".into()),
    glass:        Some("cocktail glass".into()),
    instructions: Some("Stir with ice.".into()),
    ..Default::default()
  };
  row.ingredients[0] = Some("Gin".into());
  row.measures[0] = Some("2 oz".into());
  row.ingredients[2] = Some("Dry Vermouth".into());
  row.measures[2] = Some("1 oz".into());
  row
}

fn boston(name: &str, number: &str, ingredient: &str, measure: &str) -> StagedBostonRow {
  stage_long(LongRow {
    name:              name.into(),
    category:          Some("Cocktail Classics".into()),
    ingredient:        Some(ingredient.into()),
    measure:           Some(measure.into()),
    ingredient_number: Some(number.into()),
  })
}

async fn seed(s: &SqliteStore) {
  s.stage(StagingBatch::TheCocktailDb(stage_wide(&martini())))
    .await
    .unwrap();
  s.stage(StagingBatch::BostonCocktails(vec![
    boston("Martini", "1", "Gin", "2 1/2 oz"),
    boston("Martini", "2", "Dry Vermouth", "1/2 oz"),
    boston("Daiquiri", "1", "Light Rum", "2 oz"),
    boston("Daiquiri", "2", "Lime Juice", "3/4 oz"),
  ]))
  .await
  .unwrap();
}

/// Every cocktail joined with its glass and relationships, in a stable order.
async fn snapshot(s: &SqliteStore) -> Vec<Vec<Value>> {
  s.conn
    .call(|conn| {
      let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.source, c.category, g.name, c.description, c.instructions,
                i.name, ci.quantity, ci.ingredient_order, ci.source_dataset
         FROM cocktail c
         LEFT JOIN glass_type g ON g.id = c.glass_type_id
         LEFT JOIN cocktail_ingredient ci ON ci.cocktail_id = c.id
         LEFT JOIN ingredient i ON i.id = ci.ingredient_id
         ORDER BY c.name, c.source, i.name",
      )?;
      let rows = stmt
        .query_map([], |row| {
          (0..11).map(|i| row.get::<_, Value>(i)).collect::<rusqlite::Result<Vec<_>>>()
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
      Ok(rows)
    })
    .await
    .unwrap()
}

fn boston_batch(rows: Vec<StagedBostonRow>) -> Result<StagingBatch, std::io::Error> {
  Ok(StagingBatch::BostonCocktails(rows))
}

// ─── Staging ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stage_appends_and_clear_empties() {
  let s = store().await;
  let n = s
    .stage(StagingBatch::TheCocktailDb(stage_wide(&martini())))
    .await
    .unwrap();
  assert_eq!(n, 2);

  assert_eq!(s.stage(StagingBatch::BostonCocktails(vec![])).await.unwrap(), 0);
  assert_eq!(s.clear_staging(SourceDataset::TheCocktailDb).await.unwrap(), 2);
  assert_eq!(s.clear_staging(SourceDataset::TheCocktailDb).await.unwrap(), 0);
}

#[tokio::test]
async fn load_staging_replaces_in_one_commit() {
  let s = store().await;
  seed(&s).await;

  let load = s
    .load_staging(
      SourceDataset::BostonCocktails,
      true,
      vec![
        boston_batch(vec![boston("Sour", "1", "Lemon", "1 oz")]),
        boston_batch(vec![boston("Sour", "2", "Sugar", "1 tsp")]),
      ]
      .into_iter(),
    )
    .await
    .unwrap();
  assert_eq!(load, StagingLoad { cleared: 4, written: 2, batches: 2 });
  assert_eq!(s.clear_staging(SourceDataset::BostonCocktails).await.unwrap(), 2);
}

#[tokio::test]
async fn failed_load_leaves_previous_staging_untouched() {
  let s = store().await;
  seed(&s).await;
  let before = s
    .migrate(&MigrationPlan { dry_run: true, ..plan(BOTH) })
    .await
    .unwrap();

  let err = s
    .load_staging(
      SourceDataset::BostonCocktails,
      true,
      vec![
        boston_batch(vec![boston("Sour", "1", "Lemon", "1 oz")]),
        Err(std::io::Error::other("record 3: found 3 fields, expected 4")),
        boston_batch(vec![boston("Sour", "2", "Sugar", "1 tsp")]),
      ]
      .into_iter(),
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Aborted(_)));

  let after = s
    .migrate(&MigrationPlan { dry_run: true, ..plan(BOTH) })
    .await
    .unwrap();
  assert_eq!(before.reports, after.reports);
  assert_eq!(s.clear_staging(SourceDataset::BostonCocktails).await.unwrap(), 4);
}

#[tokio::test]
async fn load_rejects_batches_for_another_source() {
  let s = store().await;
  let err = s
    .load_staging(
      SourceDataset::BostonCocktails,
      false,
      vec![
        boston_batch(vec![boston("Sour", "1", "Lemon", "1 oz")]),
        Ok(StagingBatch::TheCocktailDb(stage_wide(&martini()))),
      ]
      .into_iter(),
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SourceMismatch {
    expected: SourceDataset::BostonCocktails,
    found:    SourceDataset::TheCocktailDb,
  }));
  assert_eq!(s.clear_staging(SourceDataset::BostonCocktails).await.unwrap(), 0);
}

// ─── Migration ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn migrate_both_sources() {
  let s = store().await;
  seed(&s).await;

  let outcome = s.migrate(&plan(BOTH)).await.unwrap();
  assert!(outcome.committed);
  assert_eq!(outcome.reports, vec![
    (SourceDataset::TheCocktailDb, ImportReport {
      cocktails_upserted: 1,
      relations_upserted: 2,
      name_conflicts: 1,
      ..Default::default()
    }),
    (SourceDataset::BostonCocktails, ImportReport {
      cocktails_upserted: 2,
      relations_upserted: 4,
      name_conflicts: 1,
      ..Default::default()
    }),
  ]);

  let summary = s.summary().await.unwrap();
  assert_eq!(summary.cocktails, 3);
  assert_eq!(summary.with_instructions, 1);
  assert_eq!(summary.without_instructions(), 2);
  // Gin and Dry Vermouth are shared across sources.
  assert_eq!(summary.ingredients, 4);
  assert_eq!(summary.glass_types, 1);
  assert_eq!(summary.relationships, 6);
  assert_eq!(summary.by_source.len(), 2);
  assert_eq!(summary.by_source[0].source_dataset, "boston_cocktails");
  assert_eq!(summary.by_source[0].cocktails, 2);
  assert_eq!(summary.by_source[1].relationships, 2);
}

#[tokio::test]
async fn migrate_is_idempotent() {
  let s = store().await;
  seed(&s).await;

  s.migrate(&plan(BOTH)).await.unwrap();
  let first: CatalogSummary = s.summary().await.unwrap();
  let first_rows = snapshot(&s).await;
  s.migrate(&plan(BOTH)).await.unwrap();
  let second = s.summary().await.unwrap();

  assert_eq!(first, second);
  assert_eq!(first_rows.len(), 6);
  assert_eq!(first_rows, snapshot(&s).await);
}

#[tokio::test]
async fn restaging_converges_instead_of_duplicating() {
  let s = store().await;
  seed(&s).await;
  s.migrate(&plan(BOTH)).await.unwrap();

  seed(&s).await;
  s.migrate(&plan(BOTH)).await.unwrap();

  let summary = s.summary().await.unwrap();
  assert_eq!(summary.cocktails, 3);
  assert_eq!(summary.relationships, 6);
}

#[tokio::test]
async fn dry_run_reports_counts_but_writes_nothing() {
  let s = store().await;
  seed(&s).await;

  let dry = s
    .migrate(&MigrationPlan { dry_run: true, ..plan(BOTH) })
    .await
    .unwrap();
  assert!(!dry.committed);
  assert_eq!(s.summary().await.unwrap(), CatalogSummary::default());

  let real = s.migrate(&plan(BOTH)).await.unwrap();
  assert_eq!(dry.reports, real.reports);
}

#[tokio::test]
async fn later_quantity_wins_within_a_source() {
  let s = store().await;
  s.stage(StagingBatch::BostonCocktails(vec![
    boston("Daiquiri", "1", "Rum", "2 oz"),
    boston("Daiquiri", "1", "Rum", "1.5 oz"),
  ]))
  .await
  .unwrap();

  let outcome = s
    .migrate(&plan(&[SourceDataset::BostonCocktails]))
    .await
    .unwrap();
  assert_eq!(outcome.reports[0].1.relations_upserted, 2);

  let summary = s.summary().await.unwrap();
  assert_eq!(summary.relationships, 1);

  let quantity = s
    .conn
    .call(|conn| {
      Ok(conn.query_row("SELECT quantity FROM cocktail_ingredient", [], |r| {
        r.get::<_, String>(0)
      })?)
    })
    .await
    .unwrap();
  assert_eq!(quantity, "1.5 oz");
}

#[tokio::test]
async fn sparse_restage_keeps_known_instructions() {
  let s = store().await;
  s.stage(StagingBatch::TheCocktailDb(stage_wide(&martini())))
    .await
    .unwrap();
  s.migrate(&plan(&[SourceDataset::TheCocktailDb])).await.unwrap();

  s.clear_staging(SourceDataset::TheCocktailDb).await.unwrap();
  s.stage(StagingBatch::TheCocktailDb(vec![StagedDrinkRow {
    drink: "Martini".into(),
    ingredient_order: Some(1),
    ingredient: Some("Gin".into()),
    measure: Some("3 oz".into()),
    ..Default::default()
  }]))
  .await
  .unwrap();
  s.migrate(&plan(&[SourceDataset::TheCocktailDb])).await.unwrap();

  let (instructions, glass) = s
    .conn
    .call(|conn| {
      Ok(conn.query_row(
        "SELECT c.instructions, g.name FROM cocktail c
         JOIN glass_type g ON g.id = c.glass_type_id",
        [],
        |r| Ok((r.get::<_, Option<String>>(0)?, r.get::<_, String>(1)?)),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(instructions.as_deref(), Some("Stir with ice."));
  assert_eq!(glass, "Cocktail Glass");
}

#[tokio::test]
async fn limit_applies_per_source() {
  let s = store().await;
  seed(&s).await;

  let outcome = s
    .migrate(&MigrationPlan { limit: Some(1), ..plan(BOTH) })
    .await
    .unwrap();
  let upserted: Vec<_> = outcome.reports.iter().map(|(_, r)| r.cocktails_upserted).collect();
  assert_eq!(upserted, vec![1, 1]);
}

#[tokio::test]
async fn empty_plan_is_rejected() {
  let s = store().await;
  let err = s.migrate(&plan(&[])).await.unwrap_err();
  assert!(matches!(err, Error::EmptyPlan));
}
