//! [`PhoneBook`]: the record collection and its backing file.

use std::{
  fmt, fs,
  path::{Path, PathBuf},
};

use phonebook_core::{Contact, RecordId};
use tracing::{debug, info, warn};

use crate::{Error, Result, search::Query};

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Result of [`PhoneBook::add`]. Displays as the user-facing confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Added {
  /// Whether the record's number passed validation.
  pub number_ok: bool,
}

impl fmt::Display for Added {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if !self.number_ok {
      writeln!(f, "Wrong number format!")?;
    }
    f.write_str("The record added.")
  }
}

/// Result of [`PhoneBook::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deleted;

impl fmt::Display for Deleted {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("The record deleted!") }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An ordered collection of contacts.
///
/// A bound phone book rewrites its whole file after every `add`, `delete` and
/// `edit`. An unbound one (a fresh book, or a search result) never touches
/// storage.
#[derive(Debug, Default, Clone)]
pub struct PhoneBook {
  records: Vec<Contact>,
  file:    Option<PathBuf>,
}

impl PhoneBook {
  /// An empty, unbound phone book.
  pub fn new() -> Self { Self::default() }

  /// The backing file, if bound.
  pub fn file(&self) -> Option<&Path> { self.file.as_deref() }

  /// Bind to `path` and replace the contents with what it holds.
  ///
  /// A missing file is created empty. If the file cannot be created or read
  /// the book stays unbound. If its contents are rejected the book is bound
  /// but empty, and the file is left as it was until the next change.
  pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    self.records.clear();
    self.file = None;

    if !path.exists() {
      debug!(path = %path.display(), "creating empty store file");
      fs::File::create(path)?;
    }
    let text = fs::read_to_string(path)?;
    self.file = Some(path.to_owned());

    let parsed = phonebook_codec::parse(&text).inspect_err(|e| {
      warn!(path = %path.display(), error = %e, "store file rejected; starting empty");
    })?;

    for class in &parsed.skipped {
      warn!(path = %path.display(), %class, "skipping record of unknown class");
    }
    self.records = parsed.contacts;
    debug!(path = %path.display(), count = self.records.len(), "store loaded");
    Ok(())
  }

  /// Rewrite the backing file with the current contents. No-op when unbound.
  fn persist(&self) -> Result<()> {
    let Some(path) = &self.file else {
      return Ok(());
    };
    fs::write(path, phonebook_codec::serialize(&self.records))?;
    debug!(path = %path.display(), count = self.records.len(), "store saved");
    Ok(())
  }

  fn position(&self, id: RecordId) -> Result<usize> {
    self
      .records
      .iter()
      .position(|r| r.id() == id)
      .ok_or(Error::RecordNotFound(id))
  }

  // ── Mutations ──────────────────────────────────────────────────────────

  /// Append `record` and persist.
  pub fn add(&mut self, record: impl Into<Contact>) -> Result<Added> {
    let record = record.into();
    let added = Added {
      number_ok: record.has_number(),
    };
    info!(id = %record.id(), kind = %record.kind(), "adding record");
    self.records.push(record);
    self.persist()?;
    Ok(added)
  }

  /// Remove the record with identity `id` and persist.
  pub fn delete(&mut self, id: RecordId) -> Result<Deleted> {
    let index = self.position(id)?;
    self.records.remove(index);
    info!(%id, "deleted record");
    self.persist()?;
    Ok(Deleted)
  }

  /// Set `field` of the record `id` to `value`, mark it edited and persist.
  pub fn edit(&mut self, id: RecordId, field: &str, value: &str) -> Result<()> {
    let index = self.position(id)?;
    let record = &mut self.records[index];
    if !record.fields().iter().any(|f| *f == field) {
      return Err(Error::NoSuchField(field.to_owned()));
    }
    record.set_field(field, value)?;
    record.touch();
    info!(%id, field, "edited record");
    self.persist()
  }

  // ── Queries ────────────────────────────────────────────────────────────

  /// Records with at least one stored field matching `query`, as a new
  /// unbound phone book. Ids are preserved, so a hit can be edited or
  /// deleted through the book that owns it.
  pub fn search(&self, query: &str) -> PhoneBook {
    let query = Query::new(query);
    let records: Vec<Contact> = self
      .records
      .iter()
      .filter(|r| query.matches(r))
      .cloned()
      .collect();
    debug!(hits = records.len(), "search finished");
    PhoneBook {
      records,
      file: None,
    }
  }

  pub fn count(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  /// The record at 1-based `index`.
  pub fn get(&self, index: usize) -> Option<&Contact> {
    index.checked_sub(1).and_then(|i| self.records.get(i))
  }

  pub fn find(&self, id: RecordId) -> Option<&Contact> {
    self.records.iter().find(|r| r.id() == id)
  }

  pub fn records(&self) -> &[Contact] { &self.records }

  /// Detail view of the record at 1-based `index`.
  pub fn show_info(&self, index: usize) -> String {
    match self.get(index) {
      Some(record) => record.to_string(),
      None => format!("Record {index} does not exist!"),
    }
  }
}

/// Numbered list view: `1. <name>` per line.
impl fmt::Display for PhoneBook {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, record) in self.records.iter().enumerate() {
      if i > 0 {
        writeln!(f)?;
      }
      write!(f, "{}. {}", i + 1, record.show_name())?;
    }
    Ok(())
  }
}
