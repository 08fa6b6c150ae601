use crate::adapters::database::MessageStore;
use crate::domain::message::{Message, MessageText, RawTimestamp};
use crate::error::{AppError, Result};
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;

const TEXT_REQUIRED: &str = "Message content is required";

#[derive(Clone, Debug)]
pub(crate) struct Metrics {
    pub(crate) operations_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("msgboard-server");
        Self {
            operations_total: meter
                .u64_counter("msgboard_messages_operations_total")
                .with_description("Message operations by kind and outcome")
                .build(),
        }
    }

    fn record<T>(&self, operation: &'static str, res: &Result<T>) {
        let outcome = match res {
            Ok(_) => "success",
            Err(AppError::Validation(_)) => "invalid",
            Err(AppError::NotFound) => "not_found",
            Err(_) => "failure",
        };
        self.operations_total
            .add(1, &[KeyValue::new("operation", operation), KeyValue::new("outcome", outcome)]);
    }
}

/// Validates board input and drives the message store.
#[derive(Clone, Debug)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
    metrics: Metrics,
}

impl MessageService {
    #[must_use]
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store, metrics: Metrics::new() }
    }

    /// Posts a new message.
    ///
    /// An unparseable `timestamp` is ignored and the store's clock is used.
    ///
    /// # Errors
    /// Returns `AppError::Validation` if the text is absent or blank.
    /// Returns a storage fault if the message cannot be stored.
    #[tracing::instrument(err(level = "warn"), skip(self, text, timestamp))]
    pub async fn create(&self, text: Option<&str>, timestamp: Option<&RawTimestamp>) -> Result<Message> {
        let res = async {
            let text = validate(text)?;
            let created_at = timestamp.and_then(|raw| {
                let parsed = raw.to_datetime();
                if parsed.is_none() {
                    tracing::debug!(timestamp = ?raw, "Ignoring unparseable timestamp");
                }
                parsed
            });
            self.store.insert(text.as_str(), created_at).await
        }
        .await;

        if let Ok(msg) = &res {
            tracing::debug!(message_id = msg.id, "Message created");
        }
        self.metrics.record("create", &res);
        res
    }

    /// Lists every message, newest first.
    ///
    /// # Errors
    /// Returns a storage fault if the store cannot be read.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn list(&self) -> Result<Vec<Message>> {
        let res = self.store.list_all().await;
        self.metrics.record("list", &res);
        res
    }

    /// Replaces the text of an existing message.
    ///
    /// # Errors
    /// Returns `AppError::Validation` if the text is absent or blank.
    /// Returns `AppError::NotFound` if no message has this id.
    #[tracing::instrument(err(level = "warn"), skip(self, text))]
    pub async fn update(&self, id: i64, text: Option<&str>) -> Result<Message> {
        let res = async {
            let text = validate(text)?;
            self.store.update_text(id, text.as_str()).await?.ok_or(AppError::NotFound)
        }
        .await;

        self.metrics.record("update", &res);
        res
    }

    /// Permanently deletes a message.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if no message has this id.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn remove(&self, id: i64) -> Result<()> {
        let res = match self.store.delete_by_id(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::NotFound),
            Err(e) => Err(e),
        };

        self.metrics.record("remove", &res);
        res
    }
}

fn validate(text: Option<&str>) -> Result<MessageText> {
    MessageText::parse(text).ok_or_else(|| AppError::Validation(TEXT_REQUIRED.to_string()))
}
