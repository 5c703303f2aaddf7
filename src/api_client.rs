// src/api_client.rs
use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::session::SessionStore;
use crate::token;

/// HTTP client wrapping every backend call with the session interceptor.
///
/// Before each authenticated request the persisted session is consulted:
/// an expired or undecodable token clears the store and rejects the call
/// without transmitting it. A 401 from the server clears the store as well,
/// covering revocation between client-side checks. The expiry check is
/// point-in-time: a token is trusted right up to the instant it lapses,
/// and the first call after lapse performs the clear.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(base_url: String, store: Arc<SessionStore>) -> Self {
        ApiClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The pre-send half of the interceptor. `Ok(None)` means "no session":
    /// the request proceeds without credentials and the server's 401 drives
    /// the same clear-and-relogin path as a local rejection.
    fn bearer(&self) -> Result<Option<String>, ApiError> {
        let Some(session) = self.store.get() else {
            return Ok(None);
        };

        let claims = match token::decode_claims(&session.token) {
            Ok(claims) => claims,
            Err(e) => {
                self.store.clear();
                return Err(e);
            }
        };

        if token::is_expired(&claims) {
            tracing::info!("Bearer token expired, clearing session");
            self.store.clear();
            return Err(ApiError::TokenExpired);
        }

        Ok(Some(session.token))
    }

    /// Authenticated GET returning the raw JSON body.
    pub async fn get_json(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value, ApiError> {
        let token = self.bearer()?;
        let mut request = self.client.get(self.url(path)).query(params);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        self.dispatch(request).await
    }

    /// Authenticated POST; the backend's send-message endpoint takes its
    /// input as a query parameter, so the body is optional.
    pub async fn post_json(
        &self,
        path: &str,
        params: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let token = self.bearer()?;
        let mut request = self.client.post(self.url(path)).query(params);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        self.dispatch(request).await
    }

    /// Unauthenticated POST for the login/registration endpoints. Returns
    /// the status alongside the body because the backend reports credential
    /// rejection inside an HTTP 200.
    pub async fn post_public<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(u16, Value), ApiError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let value = serde_json::from_str(&text).unwrap_or(Value::Null);
        Ok((status, value))
    }

    /// The response half of the interceptor: 401 clears the session, 404
    /// maps to the empty-state error, anything else non-2xx passes through
    /// with the backend's message.
    async fn dispatch(&self, request: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status.as_u16() == 401 {
            tracing::warn!("Backend rejected credentials (401), clearing session");
            self.store.clear();
            return Err(ApiError::Unauthorized);
        }
        if status.as_u16() == 404 {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| {
                    v.get("message")
                        .or_else(|| v.get("detail"))
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                })
                .unwrap_or(body);
            tracing::error!("API error {}: {}", status, message);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}
