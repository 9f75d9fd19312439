//! Wire types for the message endpoint.

use crate::agent::PersonaProfile;
use crate::intel::IntelSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct MessageRequest {
    pub session_id: String,
    pub message: String,
    pub api_key: String,
    #[serde(default)]
    pub persona: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub session_id: String,
    pub scam_detected: bool,
    pub agent_active: bool,
    pub extracted_intel: IntelSet,
    pub agent_reply: String,
    pub risk_score: i32,
    pub persona: String,
    pub persona_profile: PersonaProfile,
    pub asked_fields: Vec<String>,
    pub scam_intent: String,
    pub scam_reasons: Vec<String>,
    pub scam_score: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_persona_is_optional() {
        let req: MessageRequest = serde_json::from_str(
            r#"{"session_id":"s1","message":"hello","api_key":"changeme"}"#,
        )
        .unwrap();
        assert!(req.persona.is_none());

        let req: MessageRequest = serde_json::from_str(
            r#"{"session_id":"s1","message":"hello","api_key":"changeme","persona":"gamer"}"#,
        )
        .unwrap();
        assert_eq!(req.persona.as_deref(), Some("gamer"));
    }
}
