use time::{OffsetDateTime, UtcOffset};
use time::format_description::well_known::Rfc3339;

/// A persisted board entry. `id` and `created_at` never change after insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub text: String,
    pub created_at: OffsetDateTime,
}

/// Message body that has passed validation: trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    /// Returns `None` when the input is absent or only whitespace.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() { None } else { Some(Self(trimmed.to_string())) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A creation time as submitted by a client, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTimestamp {
    Text(String),
    EpochMillis(i64),
}

impl RawTimestamp {
    /// Interprets the value as a point in time, normalized to UTC.
    ///
    /// Accepts RFC 3339 strings, and integer Unix epoch milliseconds either as
    /// a number or as a string of digits. Years outside 0..=9999 have no
    /// RFC 3339 form and are rejected.
    #[must_use]
    pub fn to_datetime(&self) -> Option<OffsetDateTime> {
        let parsed = match self {
            Self::Text(s) => {
                let s = s.trim();
                OffsetDateTime::parse(s, &Rfc3339)
                    .ok()
                    .or_else(|| s.parse::<i64>().ok().and_then(from_epoch_millis))
                    .and_then(|dt| dt.checked_to_offset(UtcOffset::UTC))
            }
            Self::EpochMillis(ms) => from_epoch_millis(*ms),
        };
        parsed.filter(|dt| (0..=9999).contains(&dt.year()))
    }
}

fn from_epoch_millis(ms: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000).ok()
}
