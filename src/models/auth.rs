// src/models/auth.rs
use serde::{Deserialize, Deserializer, Serialize};

/// Account role carried in the token's `role` claim and in admin listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

// The backend has shipped role strings outside the documented pair before;
// anything unrecognized degrades to the unprivileged role.
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "admin" => Role::Admin,
            _ => Role::User,
        })
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Everything the auth endpoints may put in a response body. The backend
/// reports credential rejection as an HTTP 200 with an `error` field, so
/// success and failure share one envelope.
#[derive(Debug, Deserialize)]
pub struct AuthEnvelope {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub data: Option<AuthData>,
}

#[derive(Debug, Deserialize)]
pub struct AuthData {
    pub id: String,
    pub email: String,
}

/// Decoded payload of the bearer token. Decoding is unverified on the
/// client, since the signing secret never leaves the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub exp: i64,
    #[serde(default)]
    pub role: Option<Role>,
}
