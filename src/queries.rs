// src/queries.rs
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::api_client::ApiClient;
use crate::error::ApiError;
use crate::models::admin::{Paginated, SessionCount, UserCount, UserRecord};
use crate::models::chat::{ChatExchange, SendMessageResponse, SessionRecord};

pub const USERS: &str = "users";
pub const SESSIONS: &str = "sessions";
pub const ADMIN_CHAT: &str = "adminChat";
pub const CHAT_HISTORY: &str = "chatHistory";
pub const USER_COUNT: &str = "userCount";
pub const SESSION_COUNT: &str = "sessionCount";

/// Where listing data comes from. Selected once at startup: the HTTP source
/// in normal operation, the fixture source in offline/demo mode.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value, ApiError>;
    async fn send(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value, ApiError>;
}

/// Live backend source; every call rides through the request interceptor.
pub struct HttpSource {
    client: ApiClient,
}

impl HttpSource {
    pub fn new(client: ApiClient) -> Self {
        HttpSource { client }
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value, ApiError> {
        self.client.get_json(endpoint, params).await
    }

    async fn send(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value, ApiError> {
        self.client.post_json(endpoint, params, None).await
    }
}

/// Cache key: resource name plus the exact query parameters. Different
/// pages of the same resource are distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QueryKey {
    resource: &'static str,
    params: Vec<(String, String)>,
}

#[derive(Default)]
struct QueryCache {
    entries: Mutex<HashMap<QueryKey, Value>>,
}

impl QueryCache {
    fn get(&self, key: &QueryKey) -> Option<Value> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn insert(&self, key: QueryKey, value: Value) {
        self.entries.lock().unwrap().insert(key, value);
    }

    /// Drop every cached page of one resource, leaving the rest untouched.
    fn invalidate_resource(&self, resource: &'static str) {
        self.entries
            .lock()
            .unwrap()
            .retain(|key, _| key.resource != resource);
    }

    fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

/// Typed, cached queries, one per backend resource. The analog of the
/// original client's per-resource query hooks.
pub struct Queries {
    source: Arc<dyn DataSource>,
    cache: QueryCache,
}

impl Queries {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Queries {
            source,
            cache: QueryCache::default(),
        }
    }

    fn page_params(page: u32, page_size: u32) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), page.to_string()),
            ("page_size".to_string(), page_size.to_string()),
        ]
    }

    /// Cache-or-fetch for one (resource, key) pair. `key_params` identifies
    /// the cache entry; only `params` goes on the wire (the transcript query
    /// keys by session id, which already rides in the path).
    async fn cached(
        &self,
        resource: &'static str,
        endpoint: &str,
        key_params: Vec<(String, String)>,
        params: &[(String, String)],
    ) -> Result<Value, ApiError> {
        let key = QueryKey {
            resource,
            params: key_params,
        };
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!("Cache hit for {} {:?}", resource, key.params);
            return Ok(hit);
        }
        let value = self.source.fetch(endpoint, params).await?;
        self.cache.insert(key, value.clone());
        Ok(value)
    }

    pub async fn users(&self, page: u32, page_size: u32) -> Result<Paginated<UserRecord>, ApiError> {
        let params = Self::page_params(page, page_size);
        let value = self
            .cached(USERS, "/admin/all-users", params.clone(), &params)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn sessions(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Paginated<SessionRecord>, ApiError> {
        let params = Self::page_params(page, page_size);
        let value = self
            .cached(SESSIONS, "/admin/all-sessions", params.clone(), &params)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Transcript of one session, admin view.
    pub async fn session_messages(
        &self,
        session_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Paginated<ChatExchange>, ApiError> {
        let endpoint = format!("/admin/chat/{}", urlencoding::encode(session_id));
        let params = Self::page_params(page, page_size);
        let mut key_params = params.clone();
        key_params.push(("session_id".to_string(), session_id.to_string()));
        let value = self.cached(ADMIN_CHAT, &endpoint, key_params, &params).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn user_count(&self) -> Result<UserCount, ApiError> {
        let value = self
            .cached(USER_COUNT, "/admin/count/users", Vec::new(), &[])
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn session_count(&self) -> Result<SessionCount, ApiError> {
        let value = self
            .cached(SESSION_COUNT, "/admin/count/sessions", Vec::new(), &[])
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// The current user's own exchanges.
    pub async fn chat_history(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Paginated<ChatExchange>, ApiError> {
        let params = Self::page_params(page, page_size);
        let value = self
            .cached(CHAT_HISTORY, "/chat/", params.clone(), &params)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Submit user input, receive the assistant's reply. Invalidates the
    /// chat-history cache only; cached pages of unrelated resources are
    /// not refetched.
    pub async fn send_message(&self, input: &str) -> Result<SendMessageResponse, ApiError> {
        let params = vec![("input".to_string(), input.to_string())];
        let value = self.source.send("/chat/", &params).await?;
        self.cache.invalidate_resource(CHAT_HISTORY);
        Ok(serde_json::from_value(value)?)
    }

    /// Forget everything cached, e.g. on logout.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
