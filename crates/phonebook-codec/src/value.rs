//! The value tree produced by the structural pass.

/// A node of the store grammar. Objects keep their members in encounter
/// order; duplicate keys are preserved here and resolved during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
  String(String),
  Object(Vec<(String, Value)>),
  Array(Vec<Value>),
}

impl Value {
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::String(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_object(&self) -> Option<&[(String, Value)]> {
    match self {
      Self::Object(members) => Some(members),
      _ => None,
    }
  }

  /// Short name of the node type, for error messages.
  pub(crate) fn type_name(&self) -> &'static str {
    match self {
      Self::String(_) => "string",
      Self::Object(_) => "object",
      Self::Array(_) => "array",
    }
  }
}
