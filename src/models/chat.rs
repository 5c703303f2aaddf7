// src/models/chat.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One user/assistant round trip, as returned by the history endpoints.
///
/// `session_id` and `user_id` are present on admin transcript listings but
/// omitted from the end-user history shape; both variants parse into this
/// type. The `user`/`assistant` aliases cover the older wire names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatExchange {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(alias = "user")]
    pub message: String,
    #[serde(alias = "assistant")]
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatExchange {
    /// Locally-echoed exchange for a message the backend has just answered;
    /// replaced by the server copy on the next history refresh.
    pub fn local(message: String, response: String) -> Self {
        ChatExchange {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: None,
            user_id: None,
            message,
            response,
            timestamp: Utc::now(),
        }
    }
}

/// A chat session as listed by the admin console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Reply to `POST /chat/`; the assistant's text rides in `data`.
#[derive(Debug, Deserialize)]
pub struct SendMessageResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub data: String,
}
