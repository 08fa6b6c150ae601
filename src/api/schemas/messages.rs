use crate::domain::message::{Message, RawTimestamp};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Body of `POST /api/messages`. `message` is accepted for older clients;
/// when both are sent, `text` wins.
#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
}

impl CreateMessageRequest {
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().or(self.message.as_deref())
    }

    /// Strings and integers are candidates; any other JSON type is ignored.
    #[must_use]
    pub fn raw_timestamp(&self) -> Option<RawTimestamp> {
        match self.timestamp.as_ref()? {
            serde_json::Value::String(s) => Some(RawTimestamp::Text(s.clone())),
            serde_json::Value::Number(n) => n.as_i64().map(RawTimestamp::EpochMillis),
            _ => None,
        }
    }
}

/// Body of `PUT /api/messages/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateMessageRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl UpdateMessageRequest {
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().or(self.message.as_deref())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: i64,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Message> for MessageResponse {
    fn from(msg: Message) -> Self {
        Self { id: msg.id, text: msg.text, created_at: msg.created_at }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn test_create_request_accepts_message_alias() {
        let req: CreateMessageRequest = serde_json::from_value(json!({ "message": "legacy" })).unwrap();
        assert_eq!(req.text(), Some("legacy"));
        assert!(req.raw_timestamp().is_none());
    }

    #[test]
    fn test_create_request_missing_text_is_none() {
        let req: CreateMessageRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.text().is_none());
    }

    #[test]
    fn test_text_and_message_together_prefer_text() {
        let req: CreateMessageRequest =
            serde_json::from_value(json!({ "text": "current", "message": "legacy" })).unwrap();
        assert_eq!(req.text(), Some("current"));

        let req: UpdateMessageRequest = serde_json::from_value(json!({ "text": "hi", "message": "hi" })).unwrap();
        assert_eq!(req.text(), Some("hi"));

        let req: UpdateMessageRequest = serde_json::from_value(json!({ "message": "old" })).unwrap();
        assert_eq!(req.text(), Some("old"));
    }

    #[test]
    fn test_raw_timestamp_variants() {
        let req: CreateMessageRequest =
            serde_json::from_value(json!({ "text": "a", "timestamp": "2024-01-01T00:00:00Z" })).unwrap();
        assert_eq!(req.raw_timestamp(), Some(RawTimestamp::Text("2024-01-01T00:00:00Z".into())));

        let req: CreateMessageRequest = serde_json::from_value(json!({ "text": "a", "timestamp": 1000 })).unwrap();
        assert_eq!(req.raw_timestamp(), Some(RawTimestamp::EpochMillis(1000)));

        let req: CreateMessageRequest = serde_json::from_value(json!({ "text": "a", "timestamp": true })).unwrap();
        assert!(req.raw_timestamp().is_none());
    }

    #[test]
    fn test_response_shape() {
        let resp = MessageResponse::from(Message {
            id: 7,
            text: "hi".into(),
            created_at: datetime!(2024-06-01 08:30:00 UTC),
        });
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value, json!({ "id": 7, "text": "hi", "createdAt": "2024-06-01T08:30:00Z" }));
    }
}
