//! Validation rules applied when a field is written.
//!
//! A failed check never surfaces as an error: the setter stores an empty
//! value instead and the read side substitutes the field's placeholder.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

// ─── Phone numbers ───────────────────────────────────────────────────────────

/// Three accepted shapes, each with an optional leading `+`:
///
/// 1. a parenthesised group, then 2+ character groups;
/// 2. a group, a separator, a parenthesised 2+ character group, then more
///    groups;
/// 3. a group, then 2+ character groups.
///
/// Groups are ASCII letters or digits; separators are runs of spaces and
/// hyphens.
static NUMBER: Lazy<Regex> = Lazy::new(|| {
  Regex::new(concat!(
    r"^(?:",
    r"\+?\([a-zA-Z0-9]+\)(?:[ -]+[a-zA-Z0-9]{2,})*",
    r"|\+?[a-zA-Z0-9]+[ -]\([a-zA-Z0-9]{2,}\)(?:[ -]+[a-zA-Z0-9]{2,})*",
    r"|\+?[a-zA-Z0-9]+(?:[ -]+[a-zA-Z0-9]{2,})*",
    r")$",
  ))
  .expect("phone number pattern compiles")
});

pub fn valid_number(text: &str) -> bool { NUMBER.is_match(text) }

// ─── Birth dates ─────────────────────────────────────────────────────────────

/// Accepts an ISO-8601 date with an optional time and offset: an RFC 3339
/// instant, a minute-precision instant with an offset or `Z`, a local
/// date-time, or a bare calendar date.
pub fn valid_birth_date(text: &str) -> bool {
  let local = text.strip_suffix('Z').unwrap_or(text);
  DateTime::parse_from_rfc3339(text).is_ok()
    || DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M%:z").is_ok()
    || NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
    || NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M").is_ok()
    || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

// ─── Gender ──────────────────────────────────────────────────────────────────

pub fn valid_gender(text: &str) -> bool { matches!(text, "M" | "F") }

// ─── Normalisers used by the field setters ───────────────────────────────────

/// Free-text fields: trimmed, with any `"` removed. The store format has no
/// escapes, so a quote could never be read back.
pub(crate) fn clean_text(raw: &str) -> String { raw.trim().replace('"', "") }

pub(crate) fn normalize_number(raw: &str) -> String {
  keep_if(raw.trim(), valid_number)
}

pub(crate) fn normalize_birth_date(raw: &str) -> String {
  keep_if(raw.trim(), valid_birth_date)
}

pub(crate) fn normalize_gender(raw: &str) -> String {
  keep_if(raw.trim(), valid_gender)
}

fn keep_if(value: &str, check: fn(&str) -> bool) -> String {
  if check(value) { value.to_owned() } else { String::new() }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn plain_numbers() {
    assert!(valid_number("123456"));
    assert!(valid_number("+0 123 456 789"));
    assert!(valid_number("+1 234 567"));
    assert!(valid_number("1-800-FLOWERS"));
    assert!(valid_number("a1 b2-c3"));
  }

  #[test]
  fn parenthesised_first_group() {
    assert!(valid_number("(123) 234 345-456"));
    assert!(valid_number("+(phone)"));
    assert!(valid_number("(1) 23"));
  }

  #[test]
  fn parenthesised_second_group() {
    assert!(valid_number("+0 (123) 456-789-ABcd"));
    assert!(valid_number("1 (23) 45"));
  }

  #[test]
  fn rejected_numbers() {
    assert!(!valid_number(""));
    assert!(!valid_number("[no number]"));
    // Later groups need at least two characters.
    assert!(!valid_number("123 4"));
    // Only one parenthesised group is allowed.
    assert!(!valid_number("(123) (456)"));
    // The second-position group needs two characters.
    assert!(!valid_number("1 (2) 34"));
    assert!(!valid_number("++123"));
    assert!(!valid_number("123 456 ?"));
    assert!(!valid_number("12_34"));
    assert!(!valid_number("((12)) 34"));
  }

  /// One sample head per grammar shape, each valid on its own.
  const HEADS: [&str; 6] = [
    // parenthesised first group
    "(1)",
    "+(ab1)",
    // group, one separator, parenthesised group
    "1 (23)",
    "+a-(bc)",
    // plain group
    "1",
    "+abc",
  ];
  const SEPARATORS: [&str; 5] = [" ", "-", "  ", " - ", "-- -"];
  const LONG_GROUPS: [&str; 3] = ["12", "ab", "Z9x"];
  const SHORT_GROUPS: [&str; 2] = ["1", "a"];

  #[test]
  fn number_grammar_table() {
    for head in HEADS {
      assert!(valid_number(head), "{head:?}");
      assert!(!valid_number(&format!("++{}", head.trim_start_matches('+'))), "{head:?}");

      for sep in SEPARATORS {
        assert!(!valid_number(&format!("{head}{sep}")), "trailing {sep:?} after {head:?}");
        assert!(!valid_number(&format!("{sep}{head}")), "leading {sep:?} before {head:?}");

        for group in LONG_GROUPS {
          let one = format!("{head}{sep}{group}");
          assert!(valid_number(&one), "{one:?}");
          let two = format!("{one}{sep}{group}");
          assert!(valid_number(&two), "{two:?}");
          assert_eq!(normalize_number(&format!(" {two}\t")), two);
        }
        for group in SHORT_GROUPS {
          let short = format!("{head}{sep}{group}");
          assert!(!valid_number(&short), "{short:?}");
          assert_eq!(normalize_number(&short), "");
        }
      }
    }
  }

  #[test]
  fn second_position_group_takes_exactly_one_separator() {
    for sep in SEPARATORS.into_iter().filter(|s| s.len() > 1) {
      let n = format!("1{sep}(23)");
      assert!(!valid_number(&n), "{n:?}");
    }
    assert!(!valid_number("1(23)"));
  }

  #[test]
  fn number_normalization_is_idempotent() {
    for raw in ["  +1 234 567  ", "(123) 456", "bad number !", "", "  "] {
      let once = normalize_number(raw);
      assert_eq!(normalize_number(&once), once, "input {raw:?}");
    }
    assert_eq!(normalize_number("  +1 234 567 "), "+1 234 567");
    assert_eq!(normalize_number("12 3"), "");
  }

  #[test]
  fn birth_dates() {
    assert!(valid_birth_date("1990-01-01T00:00:00Z"));
    assert!(valid_birth_date("1990-01-01T10:15:30.5+02:00"));
    assert!(valid_birth_date("1990-01-01T10:15:30"));
    assert!(valid_birth_date("1990-01-01T10:15"));
    assert!(valid_birth_date("1990-01-01"));
    assert!(valid_birth_date("1990-01-01T00:00Z"));
    assert!(valid_birth_date("1990-01-01T00:00+02:00"));
    assert!(valid_birth_date("1990-01-01T00:00:00.25Z"));
    assert!(!valid_birth_date("1990-01-01Z"));
    assert!(!valid_birth_date("1990-01-01T00:00ZZ"));
    assert!(!valid_birth_date(""));
    assert!(!valid_birth_date("yesterday"));
    assert!(!valid_birth_date("1990-13-01"));
    assert!(!valid_birth_date("[no data]"));
  }

  #[test]
  fn free_text_drops_quotes() {
    assert_eq!(clean_text("  John \"Jr\" "), "John Jr");
    assert_eq!(clean_text(r"C:\dir\"), r"C:\dir\");
    assert_eq!(clean_text("\""), "");
  }

  #[test]
  fn genders() {
    assert!(valid_gender("M"));
    assert!(valid_gender("F"));
    assert!(!valid_gender("m"));
    assert!(!valid_gender("X"));
    assert!(!valid_gender(""));
    assert_eq!(normalize_gender(" F "), "F");
    assert_eq!(normalize_gender("female"), "");
  }
}
