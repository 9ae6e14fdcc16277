//! Contact records: the shared [`Header`] and the two variants.
//!
//! Both variants implement [`Record`], which ties each type to its static
//! accessor table. [`Contact`] is the tagged union the store holds; it
//! dispatches to the variant tables so callers never branch on the kind.

use std::fmt;

use chrono::{DateTime, Local, Utc};

use crate::{
  Error, Result,
  field::{self, Accessor},
  id::RecordId,
  validate,
};

/// Read placeholder for an empty phone number.
pub const NO_NUMBER: &str = "[no number]";
/// Read placeholder for an empty birth date or gender.
pub const NO_DATA: &str = "[no data]";

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The variant of a contact; doubles as the `class` tag in the store format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
  Person,
  Organization,
}

impl ContactKind {
  pub const ALL: [ContactKind; 2] = [Self::Person, Self::Organization];

  /// The bare type name, without any namespace qualifier.
  pub fn class_name(self) -> &'static str {
    match self {
      Self::Person => "Person",
      Self::Organization => "Organization",
    }
  }

  /// Inverse of [`ContactKind::class_name`]. Exact, case-sensitive match.
  pub fn from_class_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|k| k.class_name() == name)
  }
}

impl fmt::Display for ContactKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.class_name())
  }
}

// ─── Header ──────────────────────────────────────────────────────────────────

/// Fields every contact carries regardless of its variant.
#[derive(Debug, Clone)]
pub struct Header {
  id:      RecordId,
  name:    String,
  /// Empty when the last written number failed validation.
  number:  String,
  created: DateTime<Utc>,
  edited:  DateTime<Utc>,
}

impl Header {
  fn new(name: &str, number: &str) -> Self {
    let now = Utc::now();
    Self {
      id:      RecordId::new(),
      name:    validate::clean_text(name),
      number:  validate::normalize_number(number),
      created: now,
      edited:  now,
    }
  }

  pub fn id(&self) -> RecordId { self.id }

  pub fn created(&self) -> DateTime<Utc> { self.created }

  pub fn edited(&self) -> DateTime<Utc> { self.edited }
}

// ─── Record trait ────────────────────────────────────────────────────────────

/// A concrete contact variant with a static accessor table.
pub trait Record: Sized + 'static {
  const KIND: ContactKind;

  /// One accessor per field, in `fields()` order.
  fn accessors() -> &'static [Accessor<Self>];

  fn header(&self) -> &Header;

  fn header_mut(&mut self) -> &mut Header;

  /// Name as shown in list views.
  fn show_name(&self) -> String;
}

fn get_name<R: Record>(record: &R) -> &str { &record.header().name }

fn set_name<R: Record>(record: &mut R, value: &str) {
  record.header_mut().name = validate::clean_text(value);
}

fn get_number<R: Record>(record: &R) -> &str { &record.header().number }

fn set_number<R: Record>(record: &mut R, value: &str) {
  record.header_mut().number = validate::normalize_number(value);
}

// ─── Person ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Person {
  header:     Header,
  surname:    String,
  birth_date: String,
  gender:     String,
}

fn get_surname(p: &Person) -> &str { &p.surname }
fn set_surname(p: &mut Person, value: &str) { p.surname = validate::clean_text(value); }
fn get_birth_date(p: &Person) -> &str { &p.birth_date }
fn set_birth_date(p: &mut Person, value: &str) {
  p.birth_date = validate::normalize_birth_date(value);
}
fn get_gender(p: &Person) -> &str { &p.gender }
fn set_gender(p: &mut Person, value: &str) { p.gender = validate::normalize_gender(value); }

static PERSON_FIELDS: [Accessor<Person>; 5] = [
  Accessor {
    name:        "name",
    label:       "Name",
    get:         get_name::<Person>,
    set:         set_name::<Person>,
    placeholder: None,
  },
  Accessor {
    name:        "surname",
    label:       "Surname",
    get:         get_surname,
    set:         set_surname,
    placeholder: None,
  },
  Accessor {
    name:        "birthDate",
    label:       "Birth date",
    get:         get_birth_date,
    set:         set_birth_date,
    placeholder: Some(NO_DATA),
  },
  Accessor {
    name:        "gender",
    label:       "Gender",
    get:         get_gender,
    set:         set_gender,
    placeholder: Some(NO_DATA),
  },
  Accessor {
    name:        "number",
    label:       "Number",
    get:         get_number::<Person>,
    set:         set_number::<Person>,
    placeholder: Some(NO_NUMBER),
  },
];

impl Person {
  /// Build a person stamped with the current time. Every value goes through
  /// its field's normalisation, so invalid input is stored as empty.
  pub fn new(
    name: &str,
    surname: &str,
    birth_date: &str,
    gender: &str,
    number: &str,
  ) -> Self {
    let mut person = Self {
      header:     Header::new(name, number),
      surname:    String::new(),
      birth_date: String::new(),
      gender:     String::new(),
    };
    set_surname(&mut person, surname);
    set_birth_date(&mut person, birth_date);
    set_gender(&mut person, gender);
    person
  }

  /// Rebuild a person from persisted values. The birth date and gender were
  /// checked when first written, so they are cleaned but not re-validated.
  pub fn restore(
    name: &str,
    surname: &str,
    birth_date: &str,
    gender: &str,
    number: &str,
  ) -> Self {
    let mut person = Self::new(name, surname, "", "", number);
    person.birth_date = validate::clean_text(birth_date);
    person.gender = validate::clean_text(gender);
    person
  }

  pub fn surname(&self) -> &str { &self.surname }

  pub fn birth_date(&self) -> &str { PERSON_FIELDS[2].display(self) }

  pub fn gender(&self) -> &str { PERSON_FIELDS[3].display(self) }
}

impl Record for Person {
  const KIND: ContactKind = ContactKind::Person;

  fn accessors() -> &'static [Accessor<Self>] { &PERSON_FIELDS }

  fn header(&self) -> &Header { &self.header }

  fn header_mut(&mut self) -> &mut Header { &mut self.header }

  fn show_name(&self) -> String { format!("{} {}", self.header.name, self.surname) }
}

// ─── Organization ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Organization {
  header:  Header,
  address: String,
}

fn get_address(o: &Organization) -> &str { &o.address }
fn set_address(o: &mut Organization, value: &str) { o.address = validate::clean_text(value); }

static ORGANIZATION_FIELDS: [Accessor<Organization>; 3] = [
  Accessor {
    name:        "name",
    label:       "Organization name",
    get:         get_name::<Organization>,
    set:         set_name::<Organization>,
    placeholder: None,
  },
  Accessor {
    name:        "address",
    label:       "Address",
    get:         get_address,
    set:         set_address,
    placeholder: None,
  },
  Accessor {
    name:        "number",
    label:       "Number",
    get:         get_number::<Organization>,
    set:         set_number::<Organization>,
    placeholder: Some(NO_NUMBER),
  },
];

impl Organization {
  pub fn new(name: &str, address: &str, number: &str) -> Self {
    let mut org = Self {
      header:  Header::new(name, number),
      address: String::new(),
    };
    set_address(&mut org, address);
    org
  }

  pub fn address(&self) -> &str { &self.address }
}

impl Record for Organization {
  const KIND: ContactKind = ContactKind::Organization;

  fn accessors() -> &'static [Accessor<Self>] { &ORGANIZATION_FIELDS }

  fn header(&self) -> &Header { &self.header }

  fn header_mut(&mut self) -> &mut Header { &mut self.header }

  fn show_name(&self) -> String { self.header.name.clone() }
}

// ─── Generic helpers over a record table ─────────────────────────────────────

fn display_values<R: Record>(record: &R) -> Vec<(&'static str, &str)> {
  R::accessors().iter().map(|a| (a.name, a.display(record))).collect()
}

fn stored_values<R: Record>(record: &R) -> Vec<(&'static str, &str)> {
  R::accessors().iter().map(|a| (a.name, a.stored(record))).collect()
}

fn set_by_name<R: Record>(record: &mut R, name: &str, value: &str) -> Result<()> {
  let accessor = field::find(R::accessors(), name).ok_or_else(|| Error::UnknownField {
    class: R::KIND.class_name(),
    field: name.to_owned(),
  })?;
  accessor.set(record, value);
  Ok(())
}

fn write_fields<R: Record>(f: &mut fmt::Formatter<'_>, record: &R) -> fmt::Result {
  for accessor in R::accessors() {
    writeln!(f, "{}: {}", accessor.label, accessor.display(record))?;
  }
  Ok(())
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// Any record the phone book can hold.
#[derive(Debug, Clone)]
pub enum Contact {
  Person(Person),
  Organization(Organization),
}

/// Evaluate `$body` with `$r` bound to the inner variant.
macro_rules! with_record {
  ($contact:expr, $r:ident => $body:expr) => {
    match $contact {
      Contact::Person($r) => $body,
      Contact::Organization($r) => $body,
    }
  };
}

impl Contact {
  pub fn kind(&self) -> ContactKind {
    match self {
      Self::Person(_) => ContactKind::Person,
      Self::Organization(_) => ContactKind::Organization,
    }
  }

  pub fn header(&self) -> &Header { with_record!(self, r => r.header()) }

  fn header_mut(&mut self) -> &mut Header { with_record!(self, r => r.header_mut()) }

  pub fn id(&self) -> RecordId { self.header().id }

  pub fn name(&self) -> &str { &self.header().name }

  /// The phone number, or [`NO_NUMBER`] when none is stored.
  pub fn number(&self) -> &str {
    match self.header().number.as_str() {
      "" => NO_NUMBER,
      number => number,
    }
  }

  /// Whether a number passed validation when it was last written.
  pub fn has_number(&self) -> bool { !self.header().number.is_empty() }

  pub fn created(&self) -> DateTime<Utc> { self.header().created }

  pub fn edited(&self) -> DateTime<Utc> { self.header().edited }

  /// Field names in display and serialization order.
  pub fn fields(&self) -> Vec<&'static str> {
    with_record!(self, r => accessor_names(r))
  }

  /// `(name, value)` pairs in `fields()` order, placeholders substituted.
  pub fn values_of(&self) -> Vec<(&'static str, &str)> {
    with_record!(self, r => display_values(r))
  }

  /// `(name, value)` pairs in `fields()` order, exactly as stored.
  pub fn stored_values(&self) -> Vec<(&'static str, &str)> {
    with_record!(self, r => stored_values(r))
  }

  /// Display value of a single field, or `None` for an unknown name.
  pub fn value_of(&self, name: &str) -> Option<&str> {
    self
      .values_of()
      .into_iter()
      .find_map(|(n, v)| (n == name).then_some(v))
  }

  /// Write a field through the accessor table.
  ///
  /// Does not touch `edited`; the store bumps it as part of an edit.
  pub fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
    with_record!(self, r => set_by_name(r, name, value))
  }

  /// Mark the record as edited now. Never moves `edited` before `created`.
  pub fn touch(&mut self) {
    let header = self.header_mut();
    header.edited = Utc::now().max(header.created);
  }

  /// Overwrite both timestamps with previously persisted values.
  pub fn restore_timestamps(&mut self, created: DateTime<Utc>, edited: DateTime<Utc>) {
    let header = self.header_mut();
    header.created = created;
    header.edited = edited;
  }

  pub fn show_name(&self) -> String { with_record!(self, r => r.show_name()) }
}

fn accessor_names<R: Record>(_: &R) -> Vec<&'static str> {
  R::accessors().iter().map(|a| a.name).collect()
}

impl From<Person> for Contact {
  fn from(p: Person) -> Self { Self::Person(p) }
}

impl From<Organization> for Contact {
  fn from(o: Organization) -> Self { Self::Organization(o) }
}

/// Detail view: one labelled line per field, then both timestamps in local
/// time at minute precision.
impl fmt::Display for Contact {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    with_record!(self, r => write_fields(f, r))?;
    writeln!(f, "Time created: {}", local_minutes(self.created()))?;
    write!(f, "Time last edit: {}", local_minutes(self.edited()))
  }
}

fn local_minutes(at: DateTime<Utc>) -> String {
  at.with_timezone(&Local).format("%Y-%m-%dT%H:%M").to_string()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn john() -> Contact {
    Person::new("John", "Smith", "1990-01-01T00:00:00Z", "M", "+1 234 567").into()
  }

  #[test]
  fn values_are_trimmed_on_construction() {
    let c: Contact =
      Person::new("  John ", "\tSmith ", " 1990-01-01 ", " F ", "  123 456 ").into();
    assert_eq!(
      c.stored_values(),
      vec![
        ("name", "John"),
        ("surname", "Smith"),
        ("birthDate", "1990-01-01"),
        ("gender", "F"),
        ("number", "123 456"),
      ]
    );
  }

  #[test]
  fn person_placeholders() {
    let p = Person::new("Ann", "Lee", "", "X", "");
    assert_eq!(p.birth_date(), NO_DATA);
    assert_eq!(p.gender(), NO_DATA);

    let c = Contact::from(p);
    assert_eq!(c.number(), NO_NUMBER);
    assert!(!c.has_number());
    assert_eq!(c.value_of("birthDate"), Some(NO_DATA));
    assert_eq!(c.value_of("gender"), Some(NO_DATA));
    assert_eq!(c.value_of("number"), Some(NO_NUMBER));
    // Underlying storage stays empty.
    let stored = c.stored_values();
    assert_eq!(stored[2], ("birthDate", ""));
    assert_eq!(stored[3], ("gender", ""));
    assert_eq!(stored[4], ("number", ""));
  }

  #[test]
  fn restore_keeps_persisted_birth_date_and_gender() {
    let p = Person::restore("Ann", "Lee", " 1990-01-01T00:00Z ", "F", "12 3");
    let c = Contact::from(p);
    let stored = c.stored_values();
    assert_eq!(stored[2], ("birthDate", "1990-01-01T00:00Z"));
    assert_eq!(stored[3], ("gender", "F"));
    // The number is still checked.
    assert_eq!(stored[4], ("number", ""));
  }

  #[test]
  fn quotes_never_reach_free_text_fields() {
    let mut c: Contact = Person::new("\"Ann\"", "O\"Lee", "", "", "").into();
    assert_eq!(c.name(), "Ann");
    assert_eq!(c.value_of("surname"), Some("OLee"));
    c.set_field("name", "A \"B\"").unwrap();
    assert_eq!(c.name(), "A B");

    let org: Contact = Organization::new("Acme", "\"Main\" St", "").into();
    assert_eq!(org.value_of("address"), Some("Main St"));
  }

  #[test]
  fn invalid_number_is_stored_empty() {
    let c: Contact = Organization::new("Acme", "Main St 1", "12 3 ??").into();
    assert_eq!(c.number(), NO_NUMBER);
    assert_eq!(c.stored_values()[2], ("number", ""));
  }

  #[test]
  fn fields_per_variant() {
    assert_eq!(
      john().fields(),
      vec!["name", "surname", "birthDate", "gender", "number"]
    );
    let org: Contact = Organization::new("Acme", "Main St 1", "").into();
    assert_eq!(org.fields(), vec!["name", "address", "number"]);
  }

  #[test]
  fn show_name_per_variant() {
    assert_eq!(john().show_name(), "John Smith");
    let org: Contact = Organization::new("Acme", "Main St 1", "").into();
    assert_eq!(org.show_name(), "Acme");
  }

  #[test]
  fn set_field_normalises() {
    let mut c = john();
    c.set_field("gender", "female").unwrap();
    assert_eq!(c.value_of("gender"), Some(NO_DATA));
    c.set_field("number", "  (555) 12-34 ").unwrap();
    assert_eq!(c.number(), "(555) 12-34");
    c.set_field("name", "  Johnny  ").unwrap();
    assert_eq!(c.name(), "Johnny");
  }

  #[test]
  fn set_field_rejects_unknown_name() {
    let mut org: Contact = Organization::new("Acme", "Main St 1", "").into();
    let err = org.set_field("surname", "x").unwrap_err();
    assert!(matches!(
      err,
      Error::UnknownField { class: "Organization", ref field } if field == "surname"
    ));
  }

  #[test]
  fn set_field_leaves_timestamps_alone() {
    let mut c = john();
    let before = c.edited();
    c.set_field("surname", "Doe").unwrap();
    assert_eq!(c.edited(), before);
    assert_eq!(c.created(), c.edited());
  }

  #[test]
  fn touch_advances_edited() {
    let mut c = john();
    let then = Utc.with_ymd_and_hms(2020, 5, 1, 8, 0, 0).unwrap();
    c.restore_timestamps(then, then);
    c.touch();
    assert_eq!(c.created(), then);
    assert!(c.edited() > then);
  }

  #[test]
  fn ids_are_distinct_for_equal_content() {
    let a = john();
    let b = john();
    assert_ne!(a.id(), b.id());
    assert_eq!(a.clone().id(), a.id());
  }

  #[test]
  fn detail_view_uses_labels() {
    let shown = john().to_string();
    assert!(shown.starts_with("Name: John\nSurname: Smith\n"), "{shown}");
    assert!(shown.contains("Gender: M\nNumber: +1 234 567\n"), "{shown}");
    assert!(shown.contains("Time created: "));
    assert!(shown.contains("\nTime last edit: "));

    let org: Contact = Organization::new("Acme", "Main St 1", "").into();
    let shown = org.to_string();
    assert!(shown.starts_with("Organization name: Acme\nAddress: Main St 1\nNumber: [no number]\n"));
  }

  #[test]
  fn class_names_round_trip() {
    for kind in ContactKind::ALL {
      assert_eq!(ContactKind::from_class_name(kind.class_name()), Some(kind));
    }
    assert_eq!(ContactKind::from_class_name("person"), None);
  }
}
