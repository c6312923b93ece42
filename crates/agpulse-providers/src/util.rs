use chrono::{DateTime, Utc};

/// Parse a transcript timestamp into an absolute instant.
///
/// Sources write RFC 3339 with a zone designator; anything else (naive
/// datetimes, epoch strings, garbage) is unrecoverable and the caller drops
/// the record as malformed rather than fabricating a time.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
