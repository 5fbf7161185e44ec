//! Error types for the barkeep-csv readers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing required column {0:?}")]
  MissingColumn(&'static str),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
