//! The honeypot agent: persona-conditioned reply generation.
//!
//! Replies come from the deterministic rule-based composer, or from a
//! delegated LLM backend primed with the persona system prompt, a profile
//! card, an intel summary, and a strategy directive. Delegation failures
//! fall back to the composer silently — a turn is never left unanswered.

pub mod composer;
pub mod personas;
pub mod planner;

pub use personas::{Persona, PersonaProfile};

use crate::ai::{ChatMessage, LlmClient};
use crate::intel::IntelSet;
use std::collections::BTreeSet;
use std::sync::Arc;

pub struct HoneypotAgent {
    /// Delegated generation backend; `None` means the rule-based composer
    /// handles every reply (the `mock` provider).
    llm: Option<Arc<dyn LlmClient>>,
}

impl HoneypotAgent {
    pub fn new(llm: Option<Arc<dyn LlmClient>>) -> Self {
        HoneypotAgent { llm }
    }

    /// Generate the engaged-mode reply for the current turn.
    pub async fn reply(
        &self,
        history: &[ChatMessage],
        persona: Persona,
        intel: &IntelSet,
        asked: &BTreeSet<String>,
        profile: &PersonaProfile,
    ) -> String {
        let llm = match &self.llm {
            Some(llm) => llm,
            None => return composer::rule_based_reply(history, persona, intel, asked),
        };

        let messages = Self::delegation_messages(history, persona, intel, asked, profile);
        match llm.generate(messages).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("[AGENT] Delegated generation failed, using rule-based reply: {}", e);
                composer::rule_based_reply(history, persona, intel, asked)
            }
        }
    }

    /// Generate the non-scam reply.
    pub fn normal_reply(&self, persona: Persona, last_user: &str) -> String {
        composer::normal_reply(persona, last_user)
    }

    /// Build the delegated-backend prompt: persona system prompt, profile
    /// card, intel counts, strategy directive, then the full history.
    fn delegation_messages(
        history: &[ChatMessage],
        persona: Persona,
        intel: &IntelSet,
        asked: &BTreeSet<String>,
        profile: &PersonaProfile,
    ) -> Vec<ChatMessage> {
        let last_user = history
            .iter()
            .rev()
            .find(|m| m.role == crate::ai::MessageRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or("");

        let topic = planner::infer_context(last_user);
        let needs = planner::next_requests(intel, asked, topic, last_user);
        let needs_text = if needs.is_empty() {
            "confirm steps".to_string()
        } else {
            needs
                .iter()
                .map(|f| f.as_ref())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let memory_card = format!(
            "Persona Profile: age={}, device={}, tech={}, experience={}.",
            profile.age, profile.device, profile.tech, profile.experience
        );
        let intel_summary = format!(
            "Known Intel: upi={}, bank={}, links={}.",
            intel.upi_ids.len(),
            intel.bank_accounts.len(),
            intel.phishing_links.len()
        );
        let strategy = format!("Next requests: {}. Ask naturally and keep persona.", needs_text);

        let mut messages = vec![
            ChatMessage::system(personas::system_prompt(persona)),
            ChatMessage::system(memory_card),
            ChatMessage::system(intel_summary),
            ChatMessage::system(strategy),
        ];
        messages.extend_from_slice(history);
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{LlmError, MessageRole};

    struct FailingClient;

    #[async_trait::async_trait]
    impl LlmClient for FailingClient {
        async fn generate(&self, _messages: Vec<ChatMessage>) -> Result<String, LlmError> {
            Err(LlmError::new("connection reset by peer"))
        }
    }

    struct CannedClient(&'static str);

    #[async_trait::async_trait]
    impl LlmClient for CannedClient {
        async fn generate(&self, _messages: Vec<ChatMessage>) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    fn scam_history() -> Vec<ChatMessage> {
        vec![ChatMessage::user(
            "Your KYC is pending, verify now at www.fakebank.com/verify",
        )]
    }

    #[tokio::test]
    async fn test_failed_delegation_matches_rule_based_output() {
        let history = scam_history();
        let intel = IntelSet::default();
        let asked = BTreeSet::new();
        let profile = personas::profile(Persona::Elderly);

        let agent = HoneypotAgent::new(Some(Arc::new(FailingClient)));
        let delegated = agent
            .reply(&history, Persona::Elderly, &intel, &asked, &profile)
            .await;
        let rule_based =
            composer::rule_based_reply(&history, Persona::Elderly, &intel, &asked);

        assert!(!delegated.is_empty());
        assert_eq!(delegated, rule_based);
    }

    #[tokio::test]
    async fn test_successful_delegation_returns_backend_text() {
        let agent = HoneypotAgent::new(Some(Arc::new(CannedClient("oh dear, which link?"))));
        let reply = agent
            .reply(
                &scam_history(),
                Persona::Elderly,
                &IntelSet::default(),
                &BTreeSet::new(),
                &personas::profile(Persona::Elderly),
            )
            .await;
        assert_eq!(reply, "oh dear, which link?");
    }

    #[tokio::test]
    async fn test_no_backend_uses_rule_based_composer() {
        let history = scam_history();
        let agent = HoneypotAgent::new(None);
        let reply = agent
            .reply(
                &history,
                Persona::Gamer,
                &IntelSet::default(),
                &BTreeSet::new(),
                &personas::profile(Persona::Gamer),
            )
            .await;
        assert_eq!(
            reply,
            composer::rule_based_reply(&history, Persona::Gamer, &IntelSet::default(), &BTreeSet::new())
        );
    }

    #[test]
    fn test_delegation_messages_shape() {
        let history = scam_history();
        let intel = crate::intel::extract("scammer123@upi");
        let messages = HoneypotAgent::delegation_messages(
            &history,
            Persona::Hr,
            &intel,
            &BTreeSet::new(),
            &personas::profile(Persona::Hr),
        );

        // 4 system context messages followed by the conversation
        assert_eq!(messages.len(), 4 + history.len());
        assert!(messages[..4].iter().all(|m| m.role == MessageRole::System));
        assert!(messages[0].content.contains("never reveal"));
        assert!(messages[1].content.starts_with("Persona Profile:"));
        assert_eq!(messages[2].content, "Known Intel: upi=1, bank=0, links=0.");
        assert!(messages[3].content.starts_with("Next requests: link"));
    }
}
