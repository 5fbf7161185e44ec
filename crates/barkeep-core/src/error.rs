//! Error types for `barkeep-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("ingredient name cannot be empty")]
  EmptyIngredientName,

  #[error("cocktail name cannot be empty")]
  EmptyCocktailName,

  #[error("unknown source dataset: {0:?}")]
  UnknownSource(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
