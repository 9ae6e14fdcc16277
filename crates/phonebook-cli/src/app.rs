//! Menu state machine and action dispatcher.

use std::io::{self, BufRead, Write};

use phonebook_core::{Contact, ContactKind, Organization, Person, RecordId, validate};
use phonebook_store::{Error as StoreError, PhoneBook};
use tracing::{debug, warn};

const MENU_PROMPT: &str = "[menu] Enter action (add, list, search, count, exit): ";
const LIST_PROMPT: &str = "[list] Enter action ([number], back): ";
const SEARCH_PROMPT: &str = "[search] Enter action ([number], back, again): ";
const RECORD_PROMPT: &str = "[record] Enter action (edit, delete, menu): ";

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum Screen {
  Menu,
  /// The full list was printed; waiting for a selection.
  List,
  /// Results of the last query, held unbound.
  Search(PhoneBook),
  /// A single record, by identity in the owning book.
  Record(RecordId),
  Stop,
}

/// Read a line via [`App::prompt`], or return `Ok($eof)` from the enclosing
/// function at end of input.
macro_rules! ask {
  ($app:expr, $text:expr, $eof:expr) => {
    match $app.prompt($text)? {
      Some(line) => line,
      None => return Ok($eof),
    }
  };
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Interactive session over a line-oriented input and an output sink.
pub struct App<R, W> {
  book:   PhoneBook,
  screen: Screen,
  input:  R,
  out:    W,
}

impl<R: BufRead, W: Write> App<R, W> {
  pub fn new(book: PhoneBook, input: R, out: W) -> Self {
    Self {
      book,
      screen: Screen::Menu,
      input,
      out,
    }
  }

  /// Run until `exit` or end of input. A blank line follows every action.
  pub fn run(&mut self) -> io::Result<()> {
    while !matches!(self.screen, Screen::Stop) {
      self.step()?;
      writeln!(self.out)?;
    }
    self.out.flush()
  }

  fn step(&mut self) -> io::Result<()> {
    let screen = std::mem::replace(&mut self.screen, Screen::Stop);
    self.screen = match screen {
      Screen::Menu => self.menu()?,
      Screen::List => self.list_action()?,
      Screen::Search(results) => self.search_action(results)?,
      Screen::Record(id) => self.record_action(id)?,
      Screen::Stop => Screen::Stop,
    };
    Ok(())
  }

  /// Print `text` and read one line without its terminator. `None` at end of
  /// input.
  fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
    write!(self.out, "{text}")?;
    self.out.flush()?;
    let mut line = String::new();
    if self.input.read_line(&mut line)? == 0 {
      debug!("end of input");
      return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_owned()))
  }

  fn report(&mut self, error: &StoreError) -> io::Result<()> {
    warn!(%error, "phone book operation failed");
    writeln!(self.out, "Error: {error}")
  }

  // ── Menu ──────────────────────────────────────────────────────────────────

  fn menu(&mut self) -> io::Result<Screen> {
    let action = ask!(self, MENU_PROMPT, Screen::Stop);
    match action.trim() {
      "add" => self.add(),
      "list" => self.list(),
      "search" => self.search(),
      "count" => {
        let n = self.book.count();
        writeln!(self.out, "The Phone Book has {n} {}.", plural(n, "record"))?;
        Ok(Screen::Menu)
      }
      "exit" => Ok(Screen::Stop),
      _ => Ok(Screen::Menu),
    }
  }

  fn add(&mut self) -> io::Result<Screen> {
    let kind = ask!(self, "Enter the type (person, organization): ", Screen::Stop);
    let kind = match kind.trim() {
      "person" => Some(ContactKind::Person),
      "organization" => Some(ContactKind::Organization),
      _ => None,
    };

    let record: Contact = match kind {
      Some(ContactKind::Person) => match self.enter_person()? {
        Some(person) => person.into(),
        None => return Ok(Screen::Stop),
      },
      Some(ContactKind::Organization) => match self.enter_organization()? {
        Some(org) => org.into(),
        None => return Ok(Screen::Stop),
      },
      None => return Ok(Screen::Menu),
    };

    match self.book.add(record) {
      Ok(added) => writeln!(self.out, "{added}")?,
      Err(e) => self.report(&e)?,
    }
    Ok(Screen::Menu)
  }

  fn enter_person(&mut self) -> io::Result<Option<Person>> {
    let name = ask!(self, "Enter the name: ", None);
    let surname = ask!(self, "Enter the surname: ", None);

    let birth_date = ask!(self, "Enter the birth date: ", None);
    if !validate::valid_birth_date(birth_date.trim()) {
      writeln!(self.out, "Bad birth date!")?;
    }

    let gender = ask!(self, "Enter the gender (M, F): ", None);
    if !validate::valid_gender(gender.trim()) {
      writeln!(self.out, "Bad gender!")?;
    }

    let number = ask!(self, "Enter the number: ", None);
    Ok(Some(Person::new(&name, &surname, &birth_date, &gender, &number)))
  }

  fn enter_organization(&mut self) -> io::Result<Option<Organization>> {
    let name = ask!(self, "Enter the organization name: ", None);
    let address = ask!(self, "Enter the address: ", None);
    let number = ask!(self, "Enter the number: ", None);
    Ok(Some(Organization::new(&name, &address, &number)))
  }

  // ── List ──────────────────────────────────────────────────────────────────

  fn list(&mut self) -> io::Result<Screen> {
    if self.book.is_empty() {
      writeln!(self.out, "No records to show!")?;
      return Ok(Screen::Menu);
    }
    writeln!(self.out, "{}", self.book)?;
    Ok(Screen::List)
  }

  fn list_action(&mut self) -> io::Result<Screen> {
    let action = ask!(self, LIST_PROMPT, Screen::Stop);
    let action = action.trim();
    if action == "back" {
      return Ok(Screen::Menu);
    }
    if is_record_number(action)
      && let Some(id) = show_record(&mut self.out, &self.book, action)?
    {
      return Ok(Screen::Record(id));
    }
    Ok(Screen::List)
  }

  // ── Search ────────────────────────────────────────────────────────────────

  fn search(&mut self) -> io::Result<Screen> {
    if self.book.is_empty() {
      writeln!(self.out, "No records to search!")?;
      return Ok(Screen::Menu);
    }
    let query = ask!(self, "Enter search query: ", Screen::Stop);
    let results = self.book.search(&query);
    let n = results.count();
    writeln!(self.out, "Found {n} {}:", plural(n, "result"))?;
    if !results.is_empty() {
      writeln!(self.out, "{results}")?;
    }
    Ok(Screen::Search(results))
  }

  fn search_action(&mut self, results: PhoneBook) -> io::Result<Screen> {
    let action = ask!(self, SEARCH_PROMPT, Screen::Stop);
    let action = action.trim();
    match action {
      "back" => Ok(Screen::Menu),
      "again" => self.search(),
      _ if is_record_number(action) => Ok(match show_record(&mut self.out, &results, action)? {
        Some(id) => Screen::Record(id),
        None => Screen::Search(results),
      }),
      _ => Ok(Screen::Search(results)),
    }
  }

  // ── Record ────────────────────────────────────────────────────────────────

  fn record_action(&mut self, id: RecordId) -> io::Result<Screen> {
    let action = ask!(self, RECORD_PROMPT, Screen::Stop);
    match action.trim() {
      "edit" => self.edit(id),
      "delete" => {
        match self.book.delete(id) {
          Ok(deleted) => writeln!(self.out, "{deleted}")?,
          Err(e) => self.report(&e)?,
        }
        Ok(Screen::Menu)
      }
      "menu" => Ok(Screen::Menu),
      _ => Ok(Screen::Record(id)),
    }
  }

  fn edit(&mut self, id: RecordId) -> io::Result<Screen> {
    let Some(fields) = self.book.find(id).map(Contact::fields) else {
      self.report(&StoreError::RecordNotFound(id))?;
      return Ok(Screen::Menu);
    };

    let field = ask!(self, &format!("Select a field ({}): ", fields.join(", ")), Screen::Stop);
    let field = field.trim();
    if !fields.iter().any(|f| *f == field) {
      writeln!(self.out, "No such field")?;
      return Ok(Screen::Record(id));
    }

    let value = ask!(self, &format!("Enter {field}: "), Screen::Stop);
    match self.book.edit(id, field, &value) {
      Ok(()) => {
        writeln!(self.out, "Saved")?;
        if let Some(record) = self.book.find(id) {
          writeln!(self.out, "{record}")?;
        }
      }
      Err(StoreError::NoSuchField(_)) => writeln!(self.out, "No such field")?,
      Err(e) => self.report(&e)?,
    }
    Ok(Screen::Record(id))
  }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn is_record_number(action: &str) -> bool {
  !action.is_empty() && action.bytes().all(|b| b.is_ascii_digit())
}

/// Print the detail view of record `number` (1-based, as typed) in `from`,
/// returning its id when it exists.
fn show_record(
  out: &mut impl Write,
  from: &PhoneBook,
  number: &str,
) -> io::Result<Option<RecordId>> {
  let Ok(index) = number.parse::<usize>() else {
    writeln!(out, "Record {number} does not exist!")?;
    return Ok(None);
  };
  writeln!(out, "{}", from.show_info(index))?;
  Ok(from.get(index).map(Contact::id))
}

fn plural(n: usize, word: &str) -> String {
  if n == 1 { word.to_owned() } else { format!("{word}s") }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
