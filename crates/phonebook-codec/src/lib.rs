//! Text codec for the phone book store file.
//!
//! The format is a small JSON-like dialect: double-quoted strings, objects
//! and arrays, nothing else. The whole store is one array of records, each
//! `{"class": <tag>, "properties": {<name>: <value>, …}}`.
//!
//! # Quick start
//!
//! ```no_run
//! use phonebook_codec::{parse, serialize};
//!
//! let text = std::fs::read_to_string("phonebook.db").unwrap();
//! let parsed = parse(&text).unwrap();
//! println!("{} records, {} skipped", parsed.contacts.len(), parsed.skipped.len());
//! let back = serialize(&parsed.contacts);
//! ```

pub mod error;
mod instant;
mod lex;
mod parse;
mod serialize;
pub mod value;

pub use error::{Error, Result};
pub use parse::parse_tree;
use phonebook_core::Contact;
pub use value::Value;

// ─── Public types ────────────────────────────────────────────────────────────

/// The result of parsing a whole store.
#[derive(Debug, Default)]
pub struct ParsedStore {
  /// Records in file order, with their persisted timestamps restored.
  pub contacts: Vec<Contact>,
  /// Class tags that matched no known record type. Those records were left
  /// out of `contacts`.
  pub skipped:  Vec<String>,
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse a complete store file.
///
/// Empty or whitespace-only input is an empty store. Any structural or
/// record-level problem rejects the input as a whole.
pub fn parse(input: &str) -> Result<ParsedStore> { parse::parse_store(input) }

/// Serialize `contacts` in order. An empty slice yields `[]`.
pub fn serialize(contacts: &[Contact]) -> String { serialize::serialize_all(contacts) }

// ─── Round-trip tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod roundtrip_tests {
  use chrono::{TimeZone, Utc};
  use phonebook_core::{Organization, Person};

  use super::*;

  fn sample() -> Vec<Contact> {
    let mut person: Contact = Person::new(
      "John",
      "Smith Jr",
      "1990-01-01",
      "M",
      "+0 (123) 456-789-ABcd",
    )
    .into();
    person.restore_timestamps(
      Utc.with_ymd_and_hms(2020, 5, 1, 8, 0, 0).unwrap(),
      Utc.with_ymd_and_hms(2021, 6, 2, 9, 30, 15).unwrap(),
    );

    let mut org: Contact = Organization::new("Back\\slash Ltd", r"C:\", "bad number !").into();
    org.restore_timestamps(
      Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap(),
      Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap(),
    );

    vec![person, org]
  }

  #[test]
  fn full_round_trip() {
    let contacts = sample();
    let text = serialize(&contacts);
    let parsed = parse(&text).unwrap();

    assert!(parsed.skipped.is_empty());
    assert_eq!(parsed.contacts.len(), contacts.len());
    for (before, after) in contacts.iter().zip(&parsed.contacts) {
      assert_eq!(before.kind(), after.kind());
      assert_eq!(before.stored_values(), after.stored_values());
      assert_eq!(before.created(), after.created());
      assert_eq!(before.edited(), after.edited());
      // Identity is per session.
      assert_ne!(before.id(), after.id());
    }

    // Serializing the reloaded records reproduces the same text.
    assert_eq!(serialize(&parsed.contacts), text);
  }

  #[test]
  fn empty_round_trip() {
    assert!(parse(&serialize(&[])).unwrap().contacts.is_empty());
    assert!(parse("").unwrap().contacts.is_empty());
  }

  #[test]
  fn tree_view_of_serialized_store() {
    let text = serialize(&sample());
    let Some(Value::Array(records)) = parse_tree(&text).unwrap() else {
      panic!("expected an array")
    };
    assert_eq!(records.len(), 2);
    let first = records[0].as_object().unwrap();
    assert_eq!(first[0].0, "class");
    assert_eq!(first[0].1.as_str(), Some("Person"));
  }
}
