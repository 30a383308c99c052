//! Per-session chat history kept for display.
//!
//! Entries are only written after a pipeline run succeeds, and the request and
//! the itinerary are written together, so a failed run leaves history as it was.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::pipeline::Role;

/// Sessions untouched for this long are dropped on the next write
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub role: Role,
    pub content: String,
}

struct Session {
    entries: Vec<ChatEntry>,
    touched: Instant,
}

#[derive(Clone)]
pub struct HistoryStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn entries(&self, session_id: Uuid) -> Vec<ChatEntry> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .map(|s| s.entries.clone())
            .unwrap_or_default()
    }

    /// Append one request and its itinerary, evicting idle sessions first
    pub async fn record_exchange(&self, session_id: Uuid, request: String, itinerary: String) {
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        let ttl = self.ttl;
        sessions.retain(|id, session| *id == session_id || session.touched.elapsed() < ttl);
        if sessions.len() < before {
            debug!(evicted = before - sessions.len(), "Evicted idle history sessions");
        }

        let session = sessions.entry(session_id).or_insert_with(|| Session {
            entries: Vec::new(),
            touched: Instant::now(),
        });
        session.touched = Instant::now();
        session.entries.push(ChatEntry {
            role: Role::User,
            content: request,
        });
        session.entries.push(ChatEntry {
            role: Role::Assistant,
            content: itinerary,
        });
    }

    /// Forget a session; returns whether it existed
    pub async fn clear(&self, session_id: Uuid) -> bool {
        self.sessions.write().await.remove(&session_id).is_some()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_and_clear() {
        let store = HistoryStore::new();
        let session = Uuid::new_v4();
        let other = Uuid::new_v4();

        store.record_exchange(session, "trip 1".into(), "plan 1".into()).await;
        store.record_exchange(session, "trip 2".into(), "plan 2".into()).await;

        let entries = store.entries(session).await;
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].role, Role::User);
        assert_eq!(entries[3].content, "plan 2");
        assert!(store.entries(other).await.is_empty());

        assert!(store.clear(session).await);
        assert!(!store.clear(session).await);
        assert!(store.entries(session).await.is_empty());
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted_on_write() {
        let store = HistoryStore::with_ttl(Duration::ZERO);
        let idle = Uuid::new_v4();
        let active = Uuid::new_v4();

        store.record_exchange(idle, "trip 1".into(), "plan 1".into()).await;
        store.record_exchange(active, "trip 2".into(), "plan 2".into()).await;

        assert!(store.entries(idle).await.is_empty());
        assert_eq!(store.entries(active).await.len(), 2);
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_recent_sessions_survive() {
        let store = HistoryStore::new();
        let first = Uuid::new_v4();
        store.record_exchange(first, "trip 1".into(), "plan 1".into()).await;
        store.record_exchange(Uuid::new_v4(), "trip 2".into(), "plan 2".into()).await;

        assert_eq!(store.entries(first).await.len(), 2);
        assert_eq!(store.session_count().await, 2);
    }
}
