//! ISO-8601 instants for the `created` / `edited` properties.
//!
//! Written in UTC with a `Z` suffix and only as many fractional digits as
//! needed; read back from any RFC 3339 offset.

use chrono::{DateTime, SecondsFormat, Utc};

pub(crate) fn encode_instant(at: DateTime<Utc>) -> String {
  at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub(crate) fn decode_instant(raw: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(raw)
    .ok()
    .map(|at| at.with_timezone(&Utc))
}
