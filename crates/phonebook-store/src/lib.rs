//! The phone book: an ordered collection of contacts, optionally backed by a
//! store file that is rewritten after every change.

mod search;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{Added, Deleted, PhoneBook};
