//! Per-conversation session state and its persistence backends.
//!
//! A session is the aggregate root for one conversation: full message
//! history, accumulated intel, sticky scam/activation flags, the selected
//! persona, and the set of artifact categories already asked for. Sessions
//! are created on first reference and never explicitly destroyed (the Redis
//! backend may expire them).

pub mod memory;
pub mod rate_limit;
pub mod redis;

pub use memory::InMemorySessionStore;
pub use rate_limit::RateLimiter;
pub use self::redis::RedisSessionStore;

use crate::agent::{Persona, PersonaProfile};
use crate::ai::ChatMessage;
use crate::config::Config;
use crate::intel::IntelSet;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(default)]
    pub intel: IntelSet,
    /// Sticky: once true, never reset.
    #[serde(default)]
    pub scam_detected: bool,
    /// Sticky: once true, never reset.
    #[serde(default)]
    pub agent_active: bool,
    #[serde(default)]
    pub persona: Persona,
    #[serde(default)]
    pub persona_profile: Option<PersonaProfile>,
    /// Monotonically growing set of field-category tokens already solicited.
    #[serde(default)]
    pub asked_fields: BTreeSet<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(persona: Persona) -> Self {
        let now = Utc::now();
        Session {
            history: Vec::new(),
            intel: IntelSet::default(),
            scam_detected: false,
            agent_active: false,
            persona,
            persona_profile: None,
            asked_fields: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a session, `None` when the id is unknown (or the stored value
    /// is unreadable — a fresh session beats a failed turn).
    async fn load(&self, session_id: &str) -> Option<Session>;

    async fn save(&self, session_id: &str, session: &Session) -> Result<(), String>;
}

/// Per-session exclusive locks guarding the read-modify-write of one turn.
/// Different sessions proceed independently; two turns for the same session
/// serialize within this process. Cross-process ordering through an external
/// store stays last-write-wins.
#[derive(Default)]
pub struct SessionLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        SessionLocks { locks: DashMap::new() }
    }

    pub async fn acquire(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}

/// Select the configured store, falling back to in-memory when the Redis
/// client cannot be set up.
pub fn store_from_config(config: &Config) -> Arc<dyn SessionStore> {
    if config.use_redis && !config.redis_url.is_empty() {
        match RedisSessionStore::new(&config.redis_url) {
            Ok(store) => {
                log::info!("[SESSION] Using Redis session store at {}", config.redis_url);
                return Arc::new(store);
            }
            Err(e) => {
                log::warn!("[SESSION] Redis unavailable, using in-memory store: {}", e);
            }
        }
    }
    Arc::new(InMemorySessionStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_dormant() {
        let session = Session::new(Persona::Elderly);
        assert!(!session.scam_detected);
        assert!(!session.agent_active);
        assert!(session.history.is_empty());
        assert!(session.intel.is_empty());
        assert!(session.asked_fields.is_empty());
    }

    #[test]
    fn test_session_round_trips_through_json() {
        let mut session = Session::new(Persona::Gamer);
        session.scam_detected = true;
        session.asked_fields.insert("upi".to_string());
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back.persona, Persona::Gamer);
        assert!(back.scam_detected);
        assert!(back.asked_fields.contains("upi"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        // A value written by an older build must still deserialize.
        let back: Session = serde_json::from_str(r#"{"history":[]}"#).unwrap();
        assert_eq!(back.persona, Persona::Elderly);
        assert!(!back.agent_active);
    }

    #[tokio::test]
    async fn test_session_locks_are_reentrant_per_key() {
        let locks = SessionLocks::new();
        let guard_a = locks.acquire("a").await;
        // A different session must not block behind "a"
        let _guard_b = locks.acquire("b").await;
        drop(guard_a);
        let _guard_a2 = locks.acquire("a").await;
    }
}
