use crate::domain::message::Message;
use crate::error::AppError;
use time::OffsetDateTime;

/// Row shape of the `messages` table. `created_at` is Unix epoch milliseconds.
#[derive(Debug, sqlx::FromRow)]
pub struct MessageRecord {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) created_at: i64,
}

impl TryFrom<MessageRecord> for Message {
    type Error = AppError;

    fn try_from(record: MessageRecord) -> Result<Self, Self::Error> {
        let created_at = OffsetDateTime::from_unix_timestamp_nanos(i128::from(record.created_at) * 1_000_000)
            .map_err(|e| {
                tracing::error!(error = %e, id = record.id, "Stored created_at is out of range");
                AppError::Internal
            })?;
        Ok(Self { id: record.id, text: record.text, created_at })
    }
}

/// Converts a timestamp to the millisecond precision the table stores.
pub(crate) fn to_epoch_millis(at: OffsetDateTime) -> Result<i64, AppError> {
    i64::try_from(at.unix_timestamp_nanos().div_euclid(1_000_000)).map_err(|_| AppError::Internal)
}
