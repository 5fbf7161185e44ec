//! Source datasets and their staging tables.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::Error;

/// A dataset the catalog can be migrated from.
///
/// The string form doubles as the staging table name, the `cocktail.source`
/// value and the `cocktail_ingredient.source_dataset` attribution.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
pub enum SourceDataset {
  /// Wide-format export, reshaped into one staging row per ingredient slot.
  #[strum(serialize = "the_cocktail_db")]
  TheCocktailDb,
  /// Long-format export, one row per cocktail/ingredient pair.
  #[strum(serialize = "boston_cocktails")]
  BostonCocktails,
}

impl SourceDataset {
  pub fn as_str(self) -> &'static str { self.into() }

  /// Name of the unconstrained staging table fed by this dataset.
  pub fn staging_table(self) -> &'static str { self.as_str() }

  /// Every other dataset.
  pub fn others(self) -> impl Iterator<Item = Self> { Self::iter().filter(move |s| *s != self) }

  pub fn parse(s: &str) -> Result<Self, Error> {
    s.parse().map_err(|_| Error::UnknownSource(s.to_owned()))
  }
}
