//! Error types for the store-format codec.
//!
//! Every variant means the same thing to the caller: the store text was
//! rejected as a whole and nothing was loaded.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Structural violation. `remainder` is the input from the offending
  /// position to the end.
  #[error("malformed store: {reason} at {}", preview(.remainder))]
  Malformed { reason: String, remainder: String },

  #[error("record {index}: expected key {expected:?}, found {found:?}")]
  UnexpectedKey {
    index:    usize,
    expected: &'static str,
    found:    String,
  },

  #[error("record {index}: {reason}")]
  InvalidRecord { index: usize, reason: String },

  #[error("record {index}: {class} is missing property {key:?}")]
  MissingProperty {
    index: usize,
    class: &'static str,
    key:   &'static str,
  },

  #[error("record {index}: invalid instant in {key:?}: {value:?}")]
  InvalidInstant {
    index: usize,
    key:   &'static str,
    value: String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

const PREVIEW_CHARS: usize = 40;

/// First few characters of `remainder`, quoted, for error messages.
fn preview(remainder: &str) -> String {
  if remainder.is_empty() {
    return "end of input".to_owned();
  }
  let mut shown: String = remainder.chars().take(PREVIEW_CHARS).collect();
  if shown.len() < remainder.len() {
    shown.push('…');
  }
  format!("{shown:?}")
}
