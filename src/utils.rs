// utils.rs
use super::models::{AppState, SessionEntry};
use chrono::Utc;
use std::sync::atomic::Ordering;
use tracing::info;
use uuid::Uuid;

/// Registers a new simulator session, or returns `None` when the session
/// limit is reached.
pub fn register_session(state: &AppState) -> Option<Uuid> {
    state
        .open_sessions
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |open| {
            (open < state.max_sessions).then_some(open + 1)
        })
        .ok()?;

    let session_id = Uuid::new_v4();
    state.sessions.insert(
        session_id,
        SessionEntry {
            connected_at: Utc::now(),
        },
    );
    metrics::gauge!("simulator_sessions").set(state.sessions.len() as f64);
    info!(%session_id, "Simulator session opened");
    Some(session_id)
}

pub fn cleanup_session(session_id: Uuid, state: &AppState) {
    if let Some((_, entry)) = state.sessions.remove(&session_id) {
        state.open_sessions.fetch_sub(1, Ordering::AcqRel);
        let seconds = (Utc::now() - entry.connected_at).num_seconds();
        info!(%session_id, seconds, "Simulator session closed");
    }
    metrics::gauge!("simulator_sessions").set(state.sessions.len() as f64);
}

/// Escapes text for use inside HTML element content and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
