#![allow(dead_code)]
// Shared stub backend for the integration suites: a minimal axum server
// speaking the chat bot backend's wire contract on an ephemeral port, with
// per-endpoint hit counting so tests can assert which requests were
// actually transmitted.
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{json, Value};

use chatbot_console::models::auth::{Claims, Role};
use chatbot_console::session::SessionStore;

pub const SECRET: &[u8] = b"stub-backend-secret";

#[derive(Clone)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

pub struct StubState {
    pub hits: Mutex<Vec<String>>,
    pub accounts: Mutex<Vec<Account>>,
    pub exchanges: Mutex<Vec<Value>>,
}

impl StubState {
    pub fn hits_for(&self, prefix: &str) -> usize {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.starts_with(prefix))
            .count()
    }
}

pub struct StubBackend {
    pub base_url: String,
    pub state: Arc<StubState>,
}

/// Mint a token the stub backend will accept.
pub fn mint_token(user_id: &str, role: &str, exp: i64) -> String {
    let claims = json!({ "user_id": user_id, "role": role, "exp": exp });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

/// Mint a token with a valid shape but a signature the backend rejects.
pub fn mint_foreign_token(user_id: &str, exp: i64) -> String {
    let claims = json!({ "user_id": user_id, "role": "user", "exp": exp });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap()
}

/// A session store rooted at a unique temp path.
pub fn temp_store(prefix: &str) -> Arc<SessionStore> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be monotonic")
        .as_nanos();
    let path = std::env::temp_dir().join(format!(
        "chatbot_console_test_{prefix}_{}_{}.json",
        std::process::id(),
        nanos
    ));
    Arc::new(SessionStore::new(path))
}

pub async fn spawn_backend() -> StubBackend {
    let state = Arc::new(StubState {
        hits: Mutex::new(Vec::new()),
        accounts: Mutex::new(vec![
            Account {
                id: "user-001".to_string(),
                username: "ada".to_string(),
                email: "admin@example.com".to_string(),
                password: "adminpass".to_string(),
                role: "admin".to_string(),
            },
            Account {
                id: "user-002".to_string(),
                username: "grace".to_string(),
                email: "user@example.com".to_string(),
                password: "userpass".to_string(),
                role: "user".to_string(),
            },
        ]),
        exchanges: Mutex::new(
            (1..=12)
                .map(|i| {
                    json!({
                        "_id": format!("chat-{:03}", i),
                        "session_id": "session-001",
                        "user_id": "user-002",
                        "message": format!("question {}", i),
                        "response": format!("answer {}", i),
                        "timestamp": format!("2025-03-20T12:{:02}:00Z", i)
                    })
                })
                .collect(),
        ),
    });

    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/chat/", get(chat_history).post(chat_send))
        .route("/admin/all-users", get(all_users))
        .route("/admin/all-sessions", get(all_sessions))
        .route("/admin/chat/:session_id", get(session_messages))
        .route("/admin/count/users", get(count_users))
        .route("/admin/count/sessions", get(count_sessions))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubBackend {
        base_url: format!("http://{}", addr),
        state,
    }
}

fn record(state: &StubState, endpoint: &str) {
    state.hits.lock().unwrap().push(endpoint.to_string());
}

fn authorize(headers: &HeaderMap) -> Result<Claims, StatusCode> {
    let header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(SECRET),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;
    Ok(data.claims)
}

fn admin_required(headers: &HeaderMap) -> Result<Claims, StatusCode> {
    let claims = authorize(headers)?;
    match claims.role {
        Some(Role::Admin) => Ok(claims),
        _ => Err(StatusCode::FORBIDDEN),
    }
}

fn page_params(params: &HashMap<String, String>) -> (usize, usize) {
    let page = params
        .get("page")
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(1)
        .max(1);
    let page_size = params
        .get("page_size")
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(10)
        .clamp(1, 100);
    (page, page_size)
}

fn paginate(total_field: &str, items: Vec<Value>, page: usize, page_size: usize) -> Value {
    let total = items.len();
    let slice: Vec<Value> = items
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();
    json!({
        "message": "retrieved successfully!",
        "page": page,
        "page_size": page_size,
        total_field: total,
        "data": slice
    })
}

async fn login(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Json<Value> {
    record(&state, "/auth/login");
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let accounts = state.accounts.lock().unwrap();
    match accounts
        .iter()
        .find(|a| a.email == email && a.password == password)
    {
        Some(account) => {
            let token = mint_token(&account.id, &account.role, Utc::now().timestamp() + 3600);
            Json(json!({
                "message": "Login successful",
                "token": token,
                "data": { "id": account.id, "email": account.email }
            }))
        }
        // Credential rejection rides in a 200 body, as the real backend does.
        None => Json(json!({ "error": "Invalid credentials" })),
    }
}

async fn register(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Json<Value> {
    record(&state, "/auth/register");
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();

    let mut accounts = state.accounts.lock().unwrap();
    if accounts.iter().any(|a| a.email == email) {
        return Json(json!({ "error": "Email already registered" }));
    }
    let id = format!("user-{:03}", accounts.len() + 1);
    accounts.push(Account {
        id,
        username,
        email,
        password,
        role: "user".to_string(),
    });
    Json(json!({ "message": "User registered successfully" }))
}

async fn chat_history(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    record(&state, "/chat/ GET");
    let claims = authorize(&headers)?;
    let (page, page_size) = page_params(&params);
    let items: Vec<Value> = state
        .exchanges
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e["user_id"] == json!(claims.user_id))
        .cloned()
        .collect();
    Ok(Json(paginate("total_chats", items, page, page_size)))
}

async fn chat_send(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    record(&state, "/chat/ POST");
    let claims = authorize(&headers)?;
    let input = params.get("input").cloned().unwrap_or_default();
    let reply = format!("echo: {}", input);

    let mut exchanges = state.exchanges.lock().unwrap();
    let id = format!("chat-{:03}", exchanges.len() + 1);
    exchanges.push(json!({
        "_id": id,
        "session_id": "session-001",
        "user_id": claims.user_id,
        "message": input,
        "response": reply,
        "timestamp": Utc::now().to_rfc3339()
    }));

    Ok(Json(json!({
        "message": "Chatbot response generated successfully!",
        "data": reply
    })))
}

async fn all_users(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    record(&state, "/admin/all-users");
    admin_required(&headers)?;
    let (page, page_size) = page_params(&params);
    let items: Vec<Value> = state
        .accounts
        .lock()
        .unwrap()
        .iter()
        .map(|a| {
            json!({
                "_id": a.id,
                "username": a.username,
                "email": a.email,
                "role": a.role
            })
        })
        .collect();
    Ok(Json(paginate("total_users", items, page, page_size)))
}

async fn all_sessions(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    record(&state, "/admin/all-sessions");
    admin_required(&headers)?;
    let (page, page_size) = page_params(&params);
    let items: Vec<Value> = (1..=7)
        .map(|i| {
            json!({
                "_id": format!("session-{:03}", i),
                "user_id": format!("user-{:03}", i),
                "created_at": format!("2025-03-{:02}T09:00:00Z", i + 10)
            })
        })
        .collect();
    Ok(Json(paginate("total_sessions", items, page, page_size)))
}

async fn session_messages(
    State(state): State<Arc<StubState>>,
    Path(session_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    record(&state, "/admin/chat/");
    admin_required(&headers)?;
    let (page, page_size) = page_params(&params);
    let items: Vec<Value> = state
        .exchanges
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e["session_id"] == json!(session_id))
        .cloned()
        .collect();
    Ok(Json(paginate("total_chats", items, page, page_size)))
}

async fn count_users(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    record(&state, "/admin/count/users");
    admin_required(&headers)?;
    let total = state.accounts.lock().unwrap().len();
    Ok(Json(json!({ "total_users": total })))
}

async fn count_sessions(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    record(&state, "/admin/count/sessions");
    admin_required(&headers)?;
    Ok(Json(json!({ "total_sessions": 7 })))
}
