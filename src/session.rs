// src/session.rs
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::auth::Role;

/// The client's record of the currently authenticated identity.
///
/// Created on login (or register-then-login), replaced wholesale by a new
/// login, cleared by logout or expiry detection. `expires_at` is the
/// token's `exp` claim in epoch seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub token: String,
    pub expires_at: i64,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now().timestamp()
    }
}

/// File-backed session persistence, the terminal analog of the browser's
/// local storage. One file, one session; all operations are synchronous.
///
/// No validation happens here. The store only answers "what is persisted",
/// the auth gateway and the request interceptor decide what it means.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        SessionStore { path }
    }

    /// Current session, or `None`. An unreadable or unparseable file is
    /// dropped on sight, matching how the original client discards corrupt
    /// local-storage state.
    pub fn get(&self) -> Option<Session> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(_) => return None,
        };
        match serde_json::from_slice::<Session>(&data) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Discarding unparseable session file: {}", e);
                let _ = fs::remove_file(&self.path);
                None
            }
        }
    }

    /// Overwrite and persist. Written via temp file + rename so a crash
    /// mid-write cannot leave a torn session on disk.
    pub fn set(&self, session: &Session) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(session)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, bytes)?;
        fs::rename(&tmp_path, &self.path)?;
        tracing::debug!("Session persisted for {}", session.email);
        Ok(())
    }

    /// Remove persisted state. Idempotent: clearing an empty store is a
    /// no-op.
    pub fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Session cleared"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove session file: {}", e),
        }
    }
}

/// Proactive counterpart to the interceptor's lazy per-call expiry check:
/// sleeps until the stored session's expiry instant and clears it then.
/// Restarted by the console on every login; a replaced session with a later
/// expiry simply reschedules the sleep.
pub fn spawn_expiry_watch(store: Arc<SessionStore>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let Some(session) = store.get() else { break };
            let remaining = session.expires_at - Utc::now().timestamp();
            if remaining <= 0 {
                tracing::info!("Session for {} reached its expiry, clearing", session.email);
                store.clear();
                break;
            }
            tokio::time::sleep(std::time::Duration::from_secs(remaining as u64)).await;
        }
    })
}
