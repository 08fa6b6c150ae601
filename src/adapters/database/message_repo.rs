use crate::adapters::database::DbPool;
use crate::adapters::database::records::MessageRecord;
use crate::adapters::database::records::message::to_epoch_millis;
use crate::domain::message::Message;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use time::OffsetDateTime;

/// Durable home of the message board.
///
/// `update_text` and `delete_by_id` report a missing id as a normal outcome
/// (`None` / `false`); only faults of the store itself are errors.
///
/// A write that fails with `AppError::StorageTimeout` may still have committed.
#[async_trait]
pub trait MessageStore: Send + Sync + std::fmt::Debug + 'static {
    /// Stores a new message, assigning the next id. `created_at` defaults to now.
    async fn insert(&self, text: &str, created_at: Option<OffsetDateTime>) -> Result<Message>;

    /// Every message, newest first.
    async fn list_all(&self) -> Result<Vec<Message>>;

    async fn update_text(&self, id: i64, text: &str) -> Result<Option<Message>>;

    async fn delete_by_id(&self, id: i64) -> Result<bool>;
}

#[derive(Clone, Debug)]
pub struct SqliteMessageRepository {
    pool: DbPool,
    operation_timeout: Duration,
}

impl SqliteMessageRepository {
    #[must_use]
    pub const fn new(pool: DbPool, operation_timeout: Duration) -> Self {
        Self { pool, operation_timeout }
    }

    /// Dropping the future on expiry does not roll back a statement SQLite has already run.
    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        T: Send,
        F: Future<Output = std::result::Result<T, sqlx::Error>> + Send,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(res) => Ok(res?),
            Err(_) => {
                tracing::warn!(operation, timeout_ms = %self.operation_timeout.as_millis(), "Storage operation timed out");
                Err(AppError::StorageTimeout)
            }
        }
    }
}

#[async_trait]
impl MessageStore for SqliteMessageRepository {
    #[tracing::instrument(level = "debug", skip(self, text))]
    async fn insert(&self, text: &str, created_at: Option<OffsetDateTime>) -> Result<Message> {
        let created_at = to_epoch_millis(created_at.unwrap_or_else(OffsetDateTime::now_utc))?;

        let record = self
            .bounded(
                "insert",
                sqlx::query_as::<_, MessageRecord>(
                    r"
                    INSERT INTO messages (text, created_at)
                    VALUES (?1, ?2)
                    RETURNING id, text, created_at
                    ",
                )
                .bind(text)
                .bind(created_at)
                .fetch_one(&self.pool),
            )
            .await?;

        record.try_into()
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn list_all(&self) -> Result<Vec<Message>> {
        let records = self
            .bounded(
                "list_all",
                sqlx::query_as::<_, MessageRecord>(
                    r"
                    SELECT id, text, created_at
                    FROM messages
                    ORDER BY created_at DESC, id DESC
                    ",
                )
                .fetch_all(&self.pool),
            )
            .await?;

        records.into_iter().map(Message::try_from).collect()
    }

    #[tracing::instrument(level = "debug", skip(self, text))]
    async fn update_text(&self, id: i64, text: &str) -> Result<Option<Message>> {
        let record = self
            .bounded(
                "update_text",
                sqlx::query_as::<_, MessageRecord>(
                    r"
                    UPDATE messages
                    SET text = ?1
                    WHERE id = ?2
                    RETURNING id, text, created_at
                    ",
                )
                .bind(text)
                .bind(id)
                .fetch_optional(&self.pool),
            )
            .await?;

        record.map(Message::try_from).transpose()
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let result = self
            .bounded("delete_by_id", sqlx::query("DELETE FROM messages WHERE id = ?1").bind(id).execute(&self.pool))
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
