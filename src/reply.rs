// src/reply.rs

use chrono::Utc;
use serde::Serialize;

/// What the target collection holds after a failed run: `Unchanged` when no
/// mutation happened, `Emptied` when the delete went through but the new
/// documents are not confirmed in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionState {
    Unchanged,
    Emptied,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookReply {
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CollectionState>,
}

impl WebhookReply {
    pub fn success() -> Self {
        Self {
            timestamp: Utc::now().timestamp_millis(),
            error_message: None,
            status: None,
        }
    }

    pub fn failure(message: impl Into<String>, state: CollectionState) -> Self {
        Self {
            timestamp: Utc::now().timestamp_millis(),
            error_message: Some(message.into()),
            status: Some(state),
        }
    }
}
