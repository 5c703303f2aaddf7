// src/offline.rs
//
// Development-only fixture data, substituted for live backend calls when
// offline/demo mode is on. Selected once at startup as a data source,
// never a conditional inside the fetch paths, and compiled out of the
// decision in release builds.
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::api_client::ApiClient;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::queries::{DataSource, HttpSource};

/// Pick the data source for this run. Offline mode is honored only in
/// debug builds; a release binary always talks to the backend.
pub fn select_source(config: &AppConfig, client: ApiClient) -> Arc<dyn DataSource> {
    if cfg!(debug_assertions) && config.offline_mode {
        tracing::warn!("🔌 OFFLINE_MODE enabled, serving fixture data (no backend calls)");
        Arc::new(FixtureSource)
    } else {
        Arc::new(HttpSource::new(client))
    }
}

/// Serves canned records matched on endpoint pattern, with real page
/// slicing so the console's pagination behaves as it would against the
/// backend.
pub struct FixtureSource;

#[async_trait]
impl DataSource for FixtureSource {
    async fn fetch(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value, ApiError> {
        let page = param(params, "page").unwrap_or(1);
        let page_size = param(params, "page_size").unwrap_or(10);

        if endpoint.starts_with("/admin/all-users") {
            return Ok(paginate("total_users", fixture_users(), page, page_size));
        }
        if endpoint.starts_with("/admin/all-sessions") {
            return Ok(paginate("total_sessions", fixture_sessions(), page, page_size));
        }
        if endpoint.starts_with("/admin/chat/") {
            return Ok(paginate("total_chats", fixture_exchanges(), page, page_size));
        }
        if endpoint == "/admin/count/users" {
            return Ok(json!({ "total_users": fixture_users().len() }));
        }
        if endpoint == "/admin/count/sessions" {
            return Ok(json!({ "total_sessions": fixture_sessions().len() }));
        }
        if endpoint.starts_with("/chat/") || endpoint == "/chat" {
            return Ok(paginate("total_chats", fixture_exchanges(), page, page_size));
        }
        Err(ApiError::NotFound)
    }

    async fn send(&self, _endpoint: &str, params: &[(String, String)]) -> Result<Value, ApiError> {
        let input = params
            .iter()
            .find(|(k, _)| k == "input")
            .map(|(_, v)| v.as_str())
            .unwrap_or("");
        Ok(json!({
            "message": "Chatbot response generated successfully!",
            "data": format!(
                "[demo] I received \"{}\". A support agent will follow up shortly.",
                input
            )
        }))
    }
}

fn param(params: &[(String, String)], name: &str) -> Option<u32> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .and_then(|(_, v)| v.parse().ok())
}

fn paginate(total_field: &str, items: Vec<Value>, page: u32, page_size: u32) -> Value {
    let total = items.len();
    let start = ((page.max(1) - 1) as usize).saturating_mul(page_size as usize);
    let slice: Vec<Value> = items
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();
    json!({
        "message": "Fixture data retrieved successfully!",
        "page": page,
        "page_size": page_size,
        total_field: total,
        "data": slice
    })
}

fn fixture_users() -> Vec<Value> {
    let seed = [
        ("ada", "ada@example.com", "admin"),
        ("grace", "grace@example.com", "user"),
        ("linus", "linus@example.com", "user"),
        ("margaret", "margaret@example.com", "user"),
        ("dennis", "dennis@example.com", "user"),
        ("barbara", "barbara@example.com", "user"),
        ("ken", "ken@example.com", "user"),
        ("radia", "radia@example.com", "user"),
        ("edsger", "edsger@example.com", "user"),
        ("frances", "frances@example.com", "user"),
        ("donald", "donald@example.com", "user"),
        ("hedy", "hedy@example.com", "admin"),
    ];
    seed.iter()
        .enumerate()
        .map(|(i, (username, email, role))| {
            json!({
                "_id": format!("user-{:03}", i + 1),
                "username": username,
                "email": email,
                "role": role
            })
        })
        .collect()
}

fn fixture_sessions() -> Vec<Value> {
    (1..=7)
        .map(|i| {
            json!({
                "_id": format!("session-{:03}", i),
                "user_id": format!("user-{:03}", i),
                "created_at": format!("2025-03-{:02}T09:00:00Z", i + 10)
            })
        })
        .collect()
}

fn fixture_exchanges() -> Vec<Value> {
    let seed = [
        ("Where is my order?", "Your order shipped yesterday and should arrive within 3 business days."),
        ("Can I change my delivery address?", "Yes, as long as the order hasn't shipped you can update it from your account page."),
        ("How do I reset my password?", "Use the reset link on the login page and check your inbox for the confirmation email."),
        ("Do you ship internationally?", "We currently ship to 42 countries; enter your address at checkout to confirm availability."),
        ("I was charged twice", "Sorry about that. I've flagged the duplicate charge for a refund, which takes 3-5 business days."),
    ];
    seed.iter()
        .enumerate()
        .map(|(i, (message, response))| {
            json!({
                "_id": format!("chat-{:03}", i + 1),
                "session_id": "session-001",
                "user_id": "user-001",
                "message": message,
                "response": response,
                "timestamp": format!("2025-03-20T12:{:02}:00Z", i)
            })
        })
        .collect()
}
