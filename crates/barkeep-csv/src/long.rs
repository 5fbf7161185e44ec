//! Reader for the long, one-row-per-ingredient export.

use std::io;

use barkeep_core::reshape::LongRow;
use csv::ReaderBuilder;
use serde::Deserialize;

use crate::Result;

/// Header-driven record shape. `drink` and `ingredient_order` are accepted
/// as aliases so the long export of either dataset reads the same way.
#[derive(Debug, Deserialize)]
struct LongRecord {
  #[serde(alias = "drink")]
  name:              String,
  #[serde(default)]
  category:          Option<String>,
  #[serde(default)]
  ingredient:        Option<String>,
  #[serde(default)]
  measure:           Option<String>,
  #[serde(default, alias = "ingredient_order")]
  ingredient_number: Option<String>,
}

impl From<LongRecord> for LongRow {
  fn from(r: LongRecord) -> Self {
    LongRow {
      name:              r.name,
      category:          r.category,
      ingredient:        r.ingredient,
      measure:           r.measure,
      ingredient_number: r.ingredient_number,
    }
  }
}

/// Read long-format rows from `reader`.
pub fn read_long<R: io::Read>(reader: R) -> impl Iterator<Item = Result<LongRow>> {
  ReaderBuilder::new()
    .has_headers(true)
    .from_reader(reader)
    .into_deserialize::<LongRecord>()
    .map(|record| Ok(record?.into()))
}
