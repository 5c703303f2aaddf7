// src/config.rs
use std::path::PathBuf;

/// Runtime configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the chat bot backend.
    pub api_url: String,
    /// Serve canned fixture data instead of calling the backend.
    /// Only honored in debug builds.
    pub offline_mode: bool,
    /// Where the session record is persisted.
    pub session_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let api_url = std::env::var("API_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());

        let offline_mode = std::env::var("OFFLINE_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let session_file = std::env::var("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file());

        AppConfig {
            api_url,
            offline_mode,
            session_file,
        }
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("USERPROFILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_session_file() -> PathBuf {
    home_dir().join(".chatbot_console").join("session.json")
}
