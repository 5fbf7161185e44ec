//! `barkeep`: stage cocktail CSV exports and normalize them into the
//! catalog.
//!
//! # Usage
//!
//! ```text
//! barkeep stage --format wide --file all_drinks.csv
//! barkeep stage --format long --file boston_cocktails.csv --replace
//! barkeep migrate --source both --limit 50 --dry-run
//! barkeep summary
//! ```

mod load;
mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use barkeep_core::{
  catalog::{CatalogSummary, MigrationOutcome, MigrationPlan},
  source::SourceDataset,
  store::CocktailStore,
};
use barkeep_store_sqlite::SqliteStore;
use clap::{Parser, Subcommand, ValueEnum};
use load::Format;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "barkeep", version, about = "Stage and normalize cocktail datasets")]
struct Cli {
  /// Path to the TOML configuration file (optional).
  #[arg(short, long, value_name = "FILE", default_value = "barkeep.toml")]
  config: PathBuf,

  /// SQLite database path; overrides `db_path` / `BF_DB_PATH`.
  #[arg(long, value_name = "PATH")]
  db: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Append a CSV export to its staging table.
  Stage {
    #[arg(long, value_enum)]
    format:  Format,
    #[arg(long, value_name = "FILE")]
    file:    PathBuf,
    /// Clear the staging table first, in the same transaction as the load.
    #[arg(long)]
    replace: bool,
  },

  /// Migrate staging tables into the normalized schema.
  Migrate {
    /// Which source to import.
    #[arg(long, value_enum, default_value_t = SourceArg::Both)]
    source:  SourceArg,
    /// Limit cocktails per source (at least 1).
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    limit:   Option<usize>,
    /// Run inside a transaction and roll back.
    #[arg(long)]
    dry_run: bool,
  },

  /// Print row counts of the normalized schema.
  Summary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SourceArg {
  #[value(name = "the_cocktail_db")]
  TheCocktailDb,
  #[value(name = "boston_cocktails")]
  BostonCocktails,
  Both,
}

impl SourceArg {
  fn sources(self) -> Vec<SourceDataset> {
    match self {
      Self::TheCocktailDb => vec![SourceDataset::TheCocktailDb],
      Self::BostonCocktails => vec![SourceDataset::BostonCocktails],
      Self::Both => vec![SourceDataset::TheCocktailDb, SourceDataset::BostonCocktails],
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(db) = cli.db {
    settings.db_path = db;
  }

  let store = SqliteStore::open(&settings.db_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.db_path))?;

  match cli.command {
    Command::Stage { format, file, replace } => {
      let stats = load::stage_file(&store, format, &file, settings.batch_size, replace)
        .await
        .with_context(|| format!("failed to stage {}, staging left unchanged", file.display()))?;
      if replace {
        println!("[{}] cleared {} rows", format.source(), stats.cleared);
      }
      println!(
        "[{}] staged {} rows from {} records",
        format.source(),
        stats.rows,
        stats.records
      );
    }

    Command::Migrate { source, limit, dry_run } => {
      let plan = MigrationPlan { sources: source.sources(), limit, dry_run };
      let outcome = store.migrate(&plan).await.context("migration rolled back")?;
      print_outcome(&outcome);
    }

    Command::Summary => {
      let summary = store.summary().await?;
      print_summary(&summary);
    }
  }

  Ok(())
}

// ─── Output ───────────────────────────────────────────────────────────────────

fn print_outcome(outcome: &MigrationOutcome) {
  if outcome.committed {
    println!("Committed changes");
  } else {
    println!("DRY RUN: rolled back changes");
  }

  println!("\nSummary:");
  for (source, report) in &outcome.reports {
    println!("  [{source}] {report}");
  }
}

fn print_summary(summary: &CatalogSummary) {
  println!("=== Data Summary ===");
  println!(
    "Cocktails: {} total ({} with instructions, {} without)",
    summary.cocktails,
    summary.with_instructions,
    summary.without_instructions()
  );
  println!("Unique ingredients: {}", summary.ingredients);
  println!("Glass types: {}", summary.glass_types);

  println!("\nIngredient relationships by source:");
  for s in &summary.by_source {
    println!(
      "  {}: {} relationships ({} cocktails, {} ingredients)",
      s.source_dataset, s.relationships, s.cocktails, s.ingredients
    );
  }
}
