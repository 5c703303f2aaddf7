// src/error.rs
use thiserror::Error;

/// Failure taxonomy for every backend interaction.
///
/// Token and authorization failures are handled centrally by the request
/// interceptor (the session is already cleared by the time the caller sees
/// them); authentication and registration failures surface to the form that
/// initiated them. Nothing here is fatal to the process.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid credentials")]
    Authentication,
    #[error("{0}")]
    Registration(String),
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid token")]
    TokenInvalid,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Resource not found")]
    NotFound,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl ApiError {
    /// True when the failure must send the console back to the login prompt.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ApiError::TokenExpired | ApiError::TokenInvalid | ApiError::Unauthorized
        )
    }
}
