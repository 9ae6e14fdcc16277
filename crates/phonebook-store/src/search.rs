//! Record matching for [`PhoneBook::search`](crate::PhoneBook::search).

use phonebook_core::Contact;
use regex::Regex;
use tracing::debug;

/// A compiled search query.
///
/// A stored field value matches when the whole value matches the query as a
/// regular expression, or when it contains the query ignoring case. Queries
/// that are not valid patterns still match by substring.
pub(crate) struct Query {
  pattern:     Option<Regex>,
  query_lower: String,
}

impl Query {
  pub(crate) fn new(query: &str) -> Self {
    // The query must be a pattern on its own; otherwise text like `a)|(b`
    // would break out of the anchoring group.
    let anchored = Regex::new(query).and_then(|_| Regex::new(&format!("^(?:{query})$")));
    let pattern = match anchored {
      Ok(re) => Some(re),
      Err(e) => {
        debug!(query, error = %e, "search query is not a valid pattern");
        None
      }
    };
    Self {
      pattern,
      query_lower: query.to_lowercase(),
    }
  }

  fn matches_value(&self, value: &str) -> bool {
    self.pattern.as_ref().is_some_and(|re| re.is_match(value))
      || value.to_lowercase().contains(&self.query_lower)
  }

  /// Whether any stored field of `contact` matches.
  pub(crate) fn matches(&self, contact: &Contact) -> bool {
    contact
      .stored_values()
      .into_iter()
      .any(|(_, value)| self.matches_value(value))
  }
}

#[cfg(test)]
mod tests {
  use phonebook_core::{Organization, Person};

  use super::*;

  #[test]
  fn substring_ignores_case() {
    let q = Query::new("smith");
    assert!(q.matches_value("John Smith"));
    assert!(q.matches_value("SMITHERS"));
    assert!(!q.matches_value("Smyth"));
  }

  #[test]
  fn pattern_must_match_whole_value() {
    let q = Query::new("J.hn");
    assert!(q.matches_value("John"));
    assert!(!q.matches_value("Johnny"));

    let q = Query::new(r"\+1.*");
    assert!(q.matches_value("+1 234 567"));
  }

  #[test]
  fn invalid_pattern_falls_back_to_substring() {
    let q = Query::new("(12");
    assert!(q.pattern.is_none());
    assert!(q.matches_value("call (123) now"));
    assert!(!q.matches_value("123"));
  }

  #[test]
  fn query_cannot_escape_anchoring() {
    let q = Query::new("Z)|(.*");
    assert!(q.pattern.is_none());
    assert!(!q.matches_value("John Smith"));
    assert!(!q.matches_value("Smith"));
    assert!(q.matches_value("z)|(.*"));

    let person: Contact = Person::new("John", "Smith", "", "", "").into();
    assert!(!Query::new("Z)|(.*").matches(&person));
  }

  #[test]
  fn matches_any_stored_field() {
    let org: Contact = Organization::new("Pizza Shop", "Wall St. 1", "").into();
    assert!(Query::new("wall").matches(&org));
    assert!(!Query::new("pasta").matches(&org));
  }

  #[test]
  fn placeholders_are_not_searched() {
    let person: Contact = Person::new("Ann", "Lee", "", "", "").into();
    assert!(!Query::new("no data").matches(&person));
    assert!(!Query::new("no number").matches(&person));
  }

  #[test]
  fn empty_query_matches_everything() {
    let person: Contact = Person::new("Ann", "Lee", "", "", "").into();
    assert!(Query::new("").matches(&person));
  }
}
