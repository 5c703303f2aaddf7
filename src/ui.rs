// src/ui.rs
//
// Terminal rendering only: tables, pagination footers, chat transcripts.
// No business logic lives here.
use chrono::{DateTime, Utc};

use crate::models::admin::{Paginated, UserRecord};
use crate::models::chat::{ChatExchange, SessionRecord};

// Helper function to format timestamps in a human-readable relative format
pub fn format_relative_time(timestamp: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*timestamp);

    if duration.num_seconds() < 60 {
        "just now".to_string()
    } else if duration.num_minutes() < 60 {
        let mins = duration.num_minutes();
        if mins == 1 { "1 minute ago".to_string() } else { format!("{} minutes ago", mins) }
    } else if duration.num_hours() < 24 {
        let hours = duration.num_hours();
        if hours == 1 { "1 hour ago".to_string() } else { format!("{} hours ago", hours) }
    } else if duration.num_days() < 30 {
        let days = duration.num_days();
        if days == 1 { "1 day ago".to_string() } else { format!("{} days ago", days) }
    } else {
        timestamp.format("%B %d, %Y").to_string()
    }
}

pub fn pagination_footer(page: u32, total_pages: u32, total: u64) -> String {
    format!("page {} of {} - {} total", page, total_pages.max(1), total)
}

pub fn render_users(listing: &Paginated<UserRecord>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<22} {:<32} {:<8}\n",
        "USERNAME", "EMAIL", "ROLE"
    ));
    if listing.is_empty() {
        out.push_str("(no users)\n");
    }
    for user in &listing.data {
        out.push_str(&format!(
            "{:<22} {:<32} {:<8}\n",
            user.username, user.email, user.role
        ));
    }
    out.push_str(&pagination_footer(
        listing.page,
        listing.total_pages(),
        listing.total,
    ));
    out
}

pub fn render_sessions(listing: &Paginated<SessionRecord>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<16} {:<16} {:<20}\n",
        "SESSION", "USER", "STARTED"
    ));
    if listing.is_empty() {
        out.push_str("(no sessions)\n");
    }
    for session in &listing.data {
        out.push_str(&format!(
            "{:<16} {:<16} {:<20}\n",
            session.id,
            session.user_id,
            format_relative_time(&session.created_at)
        ));
    }
    out.push_str(&pagination_footer(
        listing.page,
        listing.total_pages(),
        listing.total,
    ));
    out
}

/// One exchange as a pair of chat bubbles.
pub fn render_exchange(exchange: &ChatExchange) -> String {
    format!(
        "  you ({}):\n    {}\n  assistant:\n    {}\n",
        format_relative_time(&exchange.timestamp),
        exchange.message,
        exchange.response
    )
}

pub fn render_transcript(listing: &Paginated<ChatExchange>) -> String {
    let mut out = String::new();
    if listing.is_empty() {
        out.push_str("(no messages yet)\n");
    }
    for exchange in &listing.data {
        out.push_str(&render_exchange(exchange));
    }
    out.push_str(&pagination_footer(
        listing.page,
        listing.total_pages(),
        listing.total,
    ));
    out
}

pub fn render_stats(total_users: u64, total_sessions: u64) -> String {
    format!(
        "📊 Dashboard\n   users:    {}\n   sessions: {}",
        total_users, total_sessions
    )
}
