//! Error types for `phonebook-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A field name that is not part of the record's `fields()` list.
  #[error("{class} has no field named {field:?}")]
  UnknownField {
    class: &'static str,
    field: String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
