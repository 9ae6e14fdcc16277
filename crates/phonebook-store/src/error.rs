//! Error type for `phonebook-store`.

use phonebook_core::RecordId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] phonebook_core::Error),

  /// The store file was rejected as a whole.
  #[error("store file error: {0}")]
  Codec(#[from] phonebook_codec::Error),

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  /// The record has no field with this name.
  #[error("no such field: {0}")]
  NoSuchField(String),

  #[error("record not found: {0}")]
  RecordNotFound(RecordId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
