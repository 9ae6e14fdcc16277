//! Store-format parser.
//!
//! Pipeline:
//!   raw &str
//!     └─ tokenize()            → Vec<Token>
//!          └─ Parser::document() → Option<Value>     (structural pass)
//!               └─ extract_records() → Vec<RawRecord>
//!                    └─ rebuild()       → ParsedStore

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use phonebook_core::{Contact, ContactKind, Organization, Person};

use crate::{
  ParsedStore,
  error::{Error, Result},
  instant::decode_instant,
  lex::{Token, TokenKind, tokenize},
  value::Value,
};

// ─── Structural pass ─────────────────────────────────────────────────────────

/// Deepest container nesting accepted. Real stores nest three levels.
const MAX_DEPTH: usize = 128;

struct Parser<'a> {
  input:  &'a str,
  tokens: Vec<Token>,
  pos:    usize,
}

impl<'a> Parser<'a> {
  fn new(input: &'a str) -> Result<Self> {
    Ok(Self {
      input,
      tokens: tokenize(input)?,
      pos: 0,
    })
  }

  fn peek(&self) -> Option<&TokenKind> { self.tokens.get(self.pos).map(|t| &t.kind) }

  /// After a container item: consume `,` (more items follow, returns
  /// `false`) or `close` (returns `true`).
  fn separator(&mut self, close: TokenKind) -> Result<bool> {
    match self.peek() {
      Some(TokenKind::Comma) => {
        self.pos += 1;
        Ok(false)
      }
      Some(kind) if *kind == close => {
        self.pos += 1;
        Ok(true)
      }
      _ => self.fail(format!(
        "expected ',' or {}, found {}",
        close.describe(),
        self.found()
      )),
    }
  }

  /// Input from the current token to the end.
  fn remainder(&self) -> &'a str {
    self
      .tokens
      .get(self.pos)
      .map_or("", |t| &self.input[t.offset..])
  }

  fn fail<T>(&self, reason: impl Into<String>) -> Result<T> {
    Err(Error::Malformed {
      reason:    reason.into(),
      remainder: self.remainder().to_owned(),
    })
  }

  fn found(&self) -> String {
    self
      .peek()
      .map_or_else(|| "end of input".to_owned(), TokenKind::describe)
  }

  fn expect(&mut self, want: TokenKind) -> Result<()> {
    if self.peek() == Some(&want) {
      self.pos += 1;
      Ok(())
    } else {
      self.fail(format!("expected {}, found {}", want.describe(), self.found()))
    }
  }

  fn check_depth(&self, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
      return self.fail(format!("nesting deeper than {MAX_DEPTH} levels"));
    }
    Ok(())
  }

  /// A whole store: nothing at all, or exactly one object or array.
  fn document(&mut self) -> Result<Option<Value>> {
    let value = match self.peek() {
      None => return Ok(None),
      Some(TokenKind::LBracket) => self.array(1)?,
      Some(TokenKind::LBrace) => self.object(1)?,
      Some(_) => return self.fail(format!("expected '[' or '{{', found {}", self.found())),
    };
    if self.pos < self.tokens.len() {
      return self.fail("unexpected content after the top-level value");
    }
    Ok(Some(value))
  }

  /// `[` (item (`,` item)*)? `]`. Items are arrays or objects.
  fn array(&mut self, depth: usize) -> Result<Value> {
    self.check_depth(depth)?;
    self.expect(TokenKind::LBracket)?;
    let mut items = Vec::new();
    if self.peek() == Some(&TokenKind::RBracket) {
      self.pos += 1;
      return Ok(Value::Array(items));
    }
    loop {
      let item = match self.peek() {
        Some(TokenKind::LBracket) => self.array(depth + 1)?,
        Some(TokenKind::LBrace) => self.object(depth + 1)?,
        _ => {
          return self.fail(format!(
            "array items must be arrays or objects, found {}",
            self.found()
          ));
        }
      };
      items.push(item);
      if self.separator(TokenKind::RBracket)? {
        return Ok(Value::Array(items));
      }
    }
  }

  /// `{` (key `:` value (`,` key `:` value)*)? `}`. Values are strings or
  /// objects.
  fn object(&mut self, depth: usize) -> Result<Value> {
    self.check_depth(depth)?;
    self.expect(TokenKind::LBrace)?;
    let mut members = Vec::new();
    if self.peek() == Some(&TokenKind::RBrace) {
      self.pos += 1;
      return Ok(Value::Object(members));
    }
    loop {
      let key = match self.peek() {
        Some(TokenKind::Str(key)) => key.clone(),
        _ => return self.fail(format!("expected a quoted key, found {}", self.found())),
      };
      self.pos += 1;
      self.expect(TokenKind::Colon)?;
      let value = match self.peek() {
        Some(TokenKind::Str(s)) => {
          let s = Value::String(s.clone());
          self.pos += 1;
          s
        }
        Some(TokenKind::LBrace) => self.object(depth + 1)?,
        _ => {
          return self.fail(format!(
            "expected a string or object value for {key:?}, found {}",
            self.found()
          ));
        }
      };
      members.push((key, value));
      if self.separator(TokenKind::RBrace)? {
        return Ok(Value::Object(members));
      }
    }
  }
}

/// Run the structural pass over `input` and return its value tree.
///
/// Empty or whitespace-only input yields `None`.
pub fn parse_tree(input: &str) -> Result<Option<Value>> {
  Parser::new(input)?.document()
}

// ─── Record extraction ───────────────────────────────────────────────────────

/// One record object, before any class dispatch.
#[derive(Debug)]
pub(crate) struct RawRecord<'v> {
  pub class:      &'v str,
  pub properties: Vec<(&'v str, &'v str)>,
}

fn extract_records(tree: &Value) -> Result<Vec<RawRecord<'_>>> {
  match tree {
    Value::Array(items) => items
      .iter()
      .enumerate()
      .map(|(index, item)| extract_record(index, item))
      .collect(),
    // A lone record object.
    Value::Object(_) => Ok(vec![extract_record(0, tree)?]),
    Value::String(_) => Err(Error::InvalidRecord {
      index:  0,
      reason: "the store must be an array of records".to_owned(),
    }),
  }
}

fn extract_record(index: usize, item: &Value) -> Result<RawRecord<'_>> {
  let members = item.as_object().ok_or_else(|| Error::InvalidRecord {
    index,
    reason: format!("expected a record object, found {}", item.type_name()),
  })?;

  let class = required_member(index, members, 0, "class")?;
  let class = class.as_str().ok_or_else(|| Error::InvalidRecord {
    index,
    reason: format!("\"class\" must be a string, found {}", class.type_name()),
  })?;

  let properties = required_member(index, members, 1, "properties")?;
  let properties = properties.as_object().ok_or_else(|| Error::InvalidRecord {
    index,
    reason: format!(
      "\"properties\" must be an object, found {}",
      properties.type_name()
    ),
  })?;

  let properties = properties
    .iter()
    .map(|(key, value)| {
      value
        .as_str()
        .map(|v| (key.as_str(), v))
        .ok_or_else(|| Error::InvalidRecord {
          index,
          reason: format!("property {key:?} must be a string, found {}", value.type_name()),
        })
    })
    .collect::<Result<_>>()?;

  Ok(RawRecord { class, properties })
}

/// The member at `position`, which must be named `key`.
fn required_member<'v>(
  index: usize,
  members: &'v [(String, Value)],
  position: usize,
  key: &'static str,
) -> Result<&'v Value> {
  match members.get(position) {
    Some((name, value)) if name == key => Ok(value),
    Some((name, _)) => Err(Error::UnexpectedKey {
      index,
      expected: key,
      found: name.clone(),
    }),
    None => Err(Error::UnexpectedKey {
      index,
      expected: key,
      found: String::new(),
    }),
  }
}

// ─── Reconstruction ──────────────────────────────────────────────────────────

/// Property lookup for one record. Later duplicates win.
struct Properties<'v> {
  index: usize,
  class: &'static str,
  map:   HashMap<&'v str, &'v str>,
}

impl<'v> Properties<'v> {
  fn require(&self, key: &'static str) -> Result<&'v str> {
    self
      .map
      .get(key)
      .copied()
      .ok_or(Error::MissingProperty {
        index: self.index,
        class: self.class,
        key,
      })
  }

  fn instant(&self, key: &'static str) -> Result<DateTime<Utc>> {
    let raw = self.require(key)?;
    decode_instant(raw).ok_or_else(|| Error::InvalidInstant {
      index: self.index,
      key,
      value: raw.to_owned(),
    })
  }
}

type Build = fn(&Properties<'_>) -> Result<Contact>;

fn build_person(p: &Properties<'_>) -> Result<Contact> {
  Ok(
    Person::restore(
      p.require("name")?,
      p.require("surname")?,
      p.require("birthDate")?,
      p.require("gender")?,
      p.require("number")?,
    )
    .into(),
  )
}

fn build_organization(p: &Properties<'_>) -> Result<Contact> {
  Ok(Organization::new(p.require("name")?, p.require("address")?, p.require("number")?).into())
}

/// Class tag → constructor.
const BUILDERS: [(ContactKind, Build); 2] = [
  (ContactKind::Person, build_person),
  (ContactKind::Organization, build_organization),
];

/// Drop a namespace qualifier: `contacts.Person` → `Person`.
fn bare_class_name(class: &str) -> &str {
  class.rsplit_once('.').map_or(class, |(_, bare)| bare)
}

fn rebuild(records: Vec<RawRecord<'_>>) -> Result<ParsedStore> {
  let mut parsed = ParsedStore::default();

  for (index, record) in records.into_iter().enumerate() {
    let bare = bare_class_name(record.class);
    let Some((kind, build)) = BUILDERS.iter().find(|(k, _)| k.class_name() == bare) else {
      parsed.skipped.push(record.class.to_owned());
      continue;
    };

    let props = Properties {
      index,
      class: kind.class_name(),
      map: record.properties.into_iter().collect(),
    };
    let mut contact = build(&props)?;
    contact.restore_timestamps(props.instant("created")?, props.instant("edited")?);
    parsed.contacts.push(contact);
  }

  Ok(parsed)
}

/// Parse a complete store. Either every record is returned or nothing is.
pub fn parse_store(input: &str) -> Result<ParsedStore> {
  match parse_tree(input)? {
    None => Ok(ParsedStore::default()),
    Some(tree) => rebuild(extract_records(&tree)?),
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
