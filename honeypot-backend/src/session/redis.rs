//! Redis-backed session store.
//!
//! Sessions are stored as JSON blobs under `session:<id>`. An unreadable or
//! corrupt value is treated as an unknown session rather than an error, so a
//! bad record can never wedge a conversation.

use crate::session::{Session, SessionStore};
use redis::AsyncCommands;

pub struct RedisSessionStore {
    client: redis::Client,
}

impl RedisSessionStore {
    pub fn new(url: &str) -> Result<Self, String> {
        let client = redis::Client::open(url)
            .map_err(|e| format!("Failed to create Redis client: {}", e))?;
        Ok(RedisSessionStore { client })
    }

    fn key(session_id: &str) -> String {
        format!("session:{}", session_id)
    }

    async fn conn(&self) -> Result<redis::aio::MultiplexedConnection, String> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| format!("Redis connection error: {}", e))
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, session_id: &str) -> Option<Session> {
        let mut conn = match self.conn().await {
            Ok(conn) => conn,
            Err(e) => {
                log::warn!("[SESSION] Redis load failed for {}: {}", session_id, e);
                return None;
            }
        };

        let raw: Option<String> = match conn.get(Self::key(session_id)).await {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("[SESSION] Redis GET failed for {}: {}", session_id, e);
                return None;
            }
        };

        raw.and_then(|data| match serde_json::from_str(&data) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("[SESSION] Corrupt session record for {}: {}", session_id, e);
                None
            }
        })
    }

    async fn save(&self, session_id: &str, session: &Session) -> Result<(), String> {
        let data = serde_json::to_string(session)
            .map_err(|e| format!("Failed to serialize session: {}", e))?;
        let mut conn = self.conn().await?;
        conn.set::<_, _, ()>(Self::key(session_id), data)
            .await
            .map_err(|e| format!("Redis SET error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(RedisSessionStore::key("abc"), "session:abc");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(RedisSessionStore::new("not-a-url").is_err());
    }
}
