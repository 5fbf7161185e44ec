//! Error type for `barkeep-store-sqlite`.

use barkeep_core::source::SourceDataset;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// The batch source failed mid-load; the load was rolled back.
  #[error("staging load aborted")]
  Aborted(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// A staging load received a batch meant for another source.
  #[error("batch for {found} in a {expected} staging load")]
  SourceMismatch { expected: SourceDataset, found: SourceDataset },

  /// A migration was requested without naming any source.
  #[error("migration plan names no sources")]
  EmptyPlan,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
