//! Error type for `inkwell-store-sqlite`.

use inkwell_core::store::Classify;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain rule rejected the operation (missing row, taken email, …).
  #[error(transparent)]
  Core(#[from] inkwell_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Classify for Error {
  fn domain(&self) -> Option<&inkwell_core::Error> {
    match self {
      Error::Core(e) => e.domain(),
      Error::Database(_) | Error::DateParse(_) => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
