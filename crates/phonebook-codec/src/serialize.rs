//! Store-format serializer.
//!
//! Output shape, one object per record:
//!
//! ```text
//! [{"class": "Person", "properties": {"name": "…", …, "created": "…", "edited": "…"}}, …]
//! ```

use phonebook_core::Contact;

use crate::instant::encode_instant;

/// Quote `s` as is. Field values never hold `"`, so nothing needs escaping.
fn quote(s: &str) -> String { format!("\"{s}\"") }

fn member(key: &str, value: &str) -> String { format!("{}: {}", quote(key), quote(value)) }

pub(crate) fn serialize_record(contact: &Contact) -> String {
  let created = encode_instant(contact.created());
  let edited = encode_instant(contact.edited());

  let properties = contact
    .stored_values()
    .into_iter()
    .chain([("created", created.as_str()), ("edited", edited.as_str())])
    .map(|(key, value)| member(key, value))
    .collect::<Vec<_>>()
    .join(", ");

  format!(
    "{{{}, {}: {{{properties}}}}}",
    member("class", contact.kind().class_name()),
    quote("properties"),
  )
}

pub(crate) fn serialize_all(contacts: &[Contact]) -> String {
  let records = contacts
    .iter()
    .map(serialize_record)
    .collect::<Vec<_>>()
    .join(", ");
  format!("[{records}]")
}
