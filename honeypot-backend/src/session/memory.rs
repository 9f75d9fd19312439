//! In-process session store backed by a concurrent map.

use crate::session::{Session, SessionStore};
use dashmap::DashMap;

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        InMemorySessionStore { sessions: DashMap::new() }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, session_id: &str) -> Option<Session> {
        self.sessions.get(session_id).map(|entry| entry.value().clone())
    }

    async fn save(&self, session_id: &str, session: &Session) -> Result<(), String> {
        self.sessions.insert(session_id.to_string(), session.clone());
        Ok(())
    }
}
