//! Error types for `cohort-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown role: {0:?}")]
  UnknownRole(String),

  #[error("unknown application kind: {0:?}")]
  UnknownApplicationKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
