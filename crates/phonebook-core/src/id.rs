//! Opaque record handles.

use std::fmt;

use uuid::Uuid;

/// Identifies one record for the lifetime of the process.
///
/// Ids are assigned when a record is constructed (interactively or while
/// loading a store) and are never written to disk. Two records with identical
/// field values still have distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(Uuid);

impl RecordId {
  pub fn new() -> Self { Self(Uuid::new_v4()) }
}

impl Default for RecordId {
  fn default() -> Self { Self::new() }
}

impl fmt::Display for RecordId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.hyphenated().fmt(f)
  }
}
