//! Record model and validation rules for the phone book.
//!
//! This crate knows nothing about files or the store format. The codec and
//! the store build on the [`Contact`] type and its accessor tables.

pub mod contact;
pub mod error;
pub mod field;
pub mod id;
pub mod validate;

pub use contact::{Contact, ContactKind, Header, NO_DATA, NO_NUMBER, Organization, Person, Record};
pub use error::{Error, Result};
pub use field::Accessor;
pub use id::RecordId;
