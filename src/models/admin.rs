// src/models/admin.rs
use serde::{Deserialize, Serialize};

use crate::models::auth::Role;

/// Uniform envelope for every paginated listing. The backend names the
/// total after the resource (`total_users`, `total_sessions`,
/// `total_chats`); the aliases fold all of them into one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default)]
    pub message: Option<String>,
    pub page: u32,
    pub page_size: u32,
    #[serde(
        alias = "total_users",
        alias = "total_sessions",
        alias = "total_chats"
    )]
    pub total: u64,
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        ((self.total as f64) / (self.page_size as f64)).ceil() as u32
    }

    /// Empty listings are an empty state, not a failure.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A user row as projected by the admin listing (no credential fields).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCount {
    pub total_users: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCount {
    pub total_sessions: u64,
}
