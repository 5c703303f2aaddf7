// src/auth.rs
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::api_client::ApiClient;
use crate::error::ApiError;
use crate::models::auth::{AuthEnvelope, LoginRequest, RegisterRequest};
use crate::session::{Session, SessionStore};
use crate::token;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Login and registration against the backend. On success the returned
/// token is decoded for its expiry and role, and the resulting session is
/// written to the store. No retries; a single failed attempt is surfaced
/// to the caller for display.
pub struct AuthGateway {
    client: ApiClient,
    store: Arc<SessionStore>,
}

impl AuthGateway {
    pub fn new(client: ApiClient, store: Arc<SessionStore>) -> Self {
        AuthGateway { client, store }
    }

    /// Post credentials and establish a session.
    ///
    /// Backend rejection (whether via status or an `error` body on a 200),
    /// a missing token, and an undecodable token all collapse into the same
    /// generic `AuthenticationError` so the prompt never leaks which part
    /// failed.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::Authentication);
        }

        let (status, body) = self
            .client
            .post_public(
                "/auth/login",
                &LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        let envelope: AuthEnvelope =
            serde_json::from_value(body).map_err(|_| ApiError::Authentication)?;

        if !(200..300).contains(&status) || envelope.error.is_some() {
            tracing::warn!("Login rejected for {}", email);
            return Err(ApiError::Authentication);
        }

        let token = envelope.token.ok_or(ApiError::Authentication)?;
        let claims = token::decode_claims(&token).map_err(|_| ApiError::Authentication)?;

        // Role comes from the token claim, defaulting to the unprivileged
        // role when absent. The identity fields prefer the response body
        // over the claims.
        let (user_id, account_email) = match envelope.data {
            Some(data) => (data.id, data.email),
            None => (claims.user_id.clone(), email.to_string()),
        };

        let session = Session {
            user_id,
            email: account_email,
            role: claims.role.unwrap_or_default(),
            token,
            expires_at: claims.exp,
        };
        self.store.set(&session)?;
        tracing::info!("Logged in as {} ({})", session.email, session.role);
        Ok(session)
    }

    /// Register a new account, then log straight in with the same
    /// credentials. Backend rejection (duplicate email, etc.) surfaces as a
    /// `RegistrationError` carrying the backend's reason.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ApiError> {
        validate_registration(username, email, password)?;

        let (status, body) = self
            .client
            .post_public(
                "/auth/register",
                &RegisterRequest {
                    username: username.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        let envelope: AuthEnvelope = serde_json::from_value(body)
            .map_err(|_| ApiError::Registration("Registration failed".to_string()))?;

        if let Some(error) = envelope.error {
            tracing::warn!("Registration rejected for {}: {}", email, error);
            return Err(ApiError::Registration(error));
        }
        if !(200..300).contains(&status) {
            return Err(ApiError::Registration("Registration failed".to_string()));
        }

        self.login(email, password).await
    }
}

fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), ApiError> {
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ApiError::Registration(
            "Username, email, and password are required".to_string(),
        ));
    }
    if !is_valid_email(email) {
        return Err(ApiError::Registration("Invalid email address".to_string()));
    }
    if password.len() < 6 {
        return Err(ApiError::Registration(
            "Password must be at least 6 characters long".to_string(),
        ));
    }
    Ok(())
}
