//! Name-indexed field access.
//!
//! Every record variant publishes a static table of [`Accessor`]s, one entry
//! per name in its `fields()` list and in the same order. The editor, the
//! detail view and the serializer walk these tables instead of branching on
//! the variant.

/// Getter/setter pair for one named field of a record type `R`.
pub struct Accessor<R> {
  /// Field name as used by the editor prompt and the store format.
  pub name:               &'static str,
  /// Human-readable label for the detail view.
  pub label:              &'static str,
  pub(crate) get:         fn(&R) -> &str,
  pub(crate) set:         fn(&mut R, &str),
  /// Shown instead of an empty stored value.
  pub(crate) placeholder: Option<&'static str>,
}

impl<R> Accessor<R> {
  /// The stored value, exactly as it will be persisted.
  pub fn stored<'a>(&self, record: &'a R) -> &'a str { (self.get)(record) }

  /// The value as presented to the user, with the placeholder substituted
  /// for an empty stored value.
  pub fn display<'a>(&self, record: &'a R) -> &'a str {
    match (self.get)(record) {
      "" => self.placeholder.unwrap_or_default(),
      value => value,
    }
  }

  /// Write `value`, running the field's own normalisation.
  pub fn set(&self, record: &mut R, value: &str) { (self.set)(record, value) }
}

/// Look up the accessor for `name` in `table`.
pub fn find<'t, R>(table: &'t [Accessor<R>], name: &str) -> Option<&'t Accessor<R>> {
  table.iter().find(|a| a.name == name)
}
