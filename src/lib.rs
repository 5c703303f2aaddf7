// lib.rs - Main library file that exports all modules
pub mod api_client;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod offline;
pub mod queries;
pub mod session;
pub mod token;
pub mod ui;

// Re-export the types most callers need
pub use api_client::ApiClient;
pub use auth::AuthGateway;
pub use config::AppConfig;
pub use error::ApiError;
pub use queries::Queries;
pub use session::{Session, SessionStore};
