//! The staging loader: CSV file → reshaped rows → batched staging writes.

use std::{
  fs::File,
  io::BufReader,
  path::Path,
  sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
  },
};

use anyhow::Context as _;
use barkeep_core::{
  catalog::StagingBatch,
  reshape::{LongRow, WideRow, stage_long, stage_wide},
  source::SourceDataset,
  store::CocktailStore,
};
use clap::ValueEnum;
use tracing::info;

/// Layout of the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
  /// One row per recipe, `strIngredient1..15` / `strMeasure1..15`.
  Wide,
  /// One row per cocktail/ingredient pair.
  Long,
}

impl Format {
  pub fn source(self) -> SourceDataset {
    match self {
      Self::Wide => SourceDataset::TheCocktailDb,
      Self::Long => SourceDataset::BostonCocktails,
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageStats {
  /// CSV records read.
  pub records: u64,
  /// Staging rows written.
  pub rows:    u64,
  /// Staging rows removed by `--replace`.
  pub cleared: u64,
}

/// Groups the staging rows produced per record into batches of `cap` rows.
///
/// Records are pulled lazily, so at most one batch is held in memory. The
/// first record error is passed through and ends the stream.
struct Batches<I, T> {
  records: I,
  pending: Vec<T>,
  cap:     usize,
  wrap:    fn(Vec<T>) -> StagingBatch,
  done:    bool,
}

impl<I, T> Batches<I, T> {
  fn new(records: I, cap: usize, wrap: fn(Vec<T>) -> StagingBatch) -> Self {
    Self { records, pending: Vec::with_capacity(cap), cap, wrap, done: false }
  }
}

impl<I, R, T> Iterator for Batches<I, T>
where
  I: Iterator<Item = anyhow::Result<R>>,
  R: IntoIterator<Item = T>,
{
  type Item = anyhow::Result<StagingBatch>;

  fn next(&mut self) -> Option<Self::Item> {
    while !self.done && self.pending.len() < self.cap {
      match self.records.next() {
        Some(Ok(rows)) => self.pending.extend(rows),
        Some(Err(e)) => {
          self.done = true;
          self.pending.clear();
          return Some(Err(e));
        }
        None => self.done = true,
      }
    }

    if self.pending.is_empty() {
      return None;
    }
    let rest = self.pending.split_off(self.cap.min(self.pending.len()));
    Some(Ok((self.wrap)(std::mem::replace(&mut self.pending, rest))))
  }
}

/// Load `path` into the staging table for `format` as a single unit of work,
/// appending every `batch_size` rows. With `replace` the table is cleared
/// first; a bad record anywhere in the file leaves the table as it was.
pub async fn stage_file<S: CocktailStore>(
  store: &S,
  format: Format,
  path: &Path,
  batch_size: usize,
  replace: bool,
) -> anyhow::Result<StageStats> {
  let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
  let reader = BufReader::new(file);
  let records = Arc::new(AtomicU64::new(0));
  let source = format.source();

  let load = match format {
    Format::Wide => {
      let rows = barkeep_csv::read_wide(reader)?
        .map(record_rows(path, &records, |row: WideRow| stage_wide(&row)));
      let batches = Batches::new(rows, batch_size, StagingBatch::TheCocktailDb);
      store.load_staging(source, replace, batches).await?
    }
    Format::Long => {
      let rows = barkeep_csv::read_long(reader)
        .map(record_rows(path, &records, |row: LongRow| [stage_long(row)]));
      let batches = Batches::new(rows, batch_size, StagingBatch::BostonCocktails);
      store.load_staging(source, replace, batches).await?
    }
  };

  let stats = StageStats {
    records: records.load(Ordering::Relaxed),
    rows:    load.written as u64,
    cleared: load.cleared as u64,
  };
  info!(%source, records = stats.records, rows = stats.rows, batches = load.batches, "staged file");
  Ok(stats)
}

/// Per-record step: count it, attach its position to any CSV error, and
/// reshape it into staging rows.
fn record_rows<Row: 'static, R: 'static>(
  path: &Path,
  records: &Arc<AtomicU64>,
  reshape: fn(Row) -> R,
) -> impl FnMut(barkeep_csv::Result<Row>) -> anyhow::Result<R> + Send + use<Row, R> {
  let path = path.to_path_buf();
  let records = Arc::clone(records);
  move |row| {
    let n = records.load(Ordering::Relaxed) + 1;
    let row = row.with_context(|| format!("record {n} of {}", path.display()))?;
    records.store(n, Ordering::Relaxed);
    Ok(reshape(row))
  }
}
