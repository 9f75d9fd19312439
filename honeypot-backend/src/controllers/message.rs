//! The message endpoint: one full honeypot turn per request.
//!
//! Flow per inbound message, under the per-session lock: load-or-create the
//! session, score the message, update the sticky flags, generate the reply
//! (engaged or normal mode), re-mine both sides of the exchange for intel,
//! record which fields the reply asked for, derive the risk score, persist,
//! respond.

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;

use crate::agent::{personas, HoneypotAgent, Persona};
use crate::ai::ChatMessage;
use crate::detector::{self, ScamIntent};
use crate::intel;
use crate::models::{MessageRequest, MessageResponse};
use crate::session::{Session, SessionStore};
use crate::AppState;
use std::collections::BTreeSet;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/message").route(web::post().to(handle_message)));
}

async fn handle_message(
    data: web::Data<AppState>,
    body: web::Json<MessageRequest>,
) -> impl Responder {
    let payload = body.into_inner();

    if payload.api_key.is_empty() || payload.api_key != data.config.api_key {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Invalid API key"
        }));
    }
    if payload.session_id.is_empty() || payload.message.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "session_id and message must not be empty"
        }));
    }
    if !data.rate_limiter.allow(&payload.session_id) {
        return HttpResponse::TooManyRequests().json(serde_json::json!({
            "error": "Rate limit exceeded"
        }));
    }

    // Exclusive per-session turn; other sessions proceed in parallel.
    let _guard = data.session_locks.acquire(&payload.session_id).await;

    let response = process_turn(
        data.store.as_ref(),
        &data.agent,
        data.default_persona,
        &payload.session_id,
        &payload.message,
        payload.persona.as_deref(),
    )
    .await;

    log::info!(
        "[MESSAGE] session={} scam_detected={} agent_active={} risk={}",
        response.session_id,
        response.scam_detected,
        response.agent_active,
        response.risk_score
    );

    HttpResponse::Ok().json(response)
}

/// Run one conversational turn against the given store and agent.
pub async fn process_turn(
    store: &dyn SessionStore,
    agent: &HoneypotAgent,
    default_persona: Persona,
    session_id: &str,
    message: &str,
    persona_override: Option<&str>,
) -> MessageResponse {
    let mut session = store
        .load(session_id)
        .await
        .unwrap_or_else(|| Session::new(default_persona));

    session.history.push(ChatMessage::user(message));

    let verdict = detector::detect_scam_details(message);

    // Resolve persona early so callers always see the selection; a non-empty
    // request value overrides and then sticks.
    let persona = match persona_override.filter(|p| !p.trim().is_empty()) {
        Some(value) => Persona::parse_or(value, default_persona),
        None => session.persona,
    };
    session.persona = persona;
    let profile = session
        .persona_profile
        .clone()
        .unwrap_or_else(|| personas::profile(persona));
    session.persona_profile = Some(profile.clone());

    let scam_detected = session.scam_detected || verdict.scam_detected;
    session.scam_detected = scam_detected;
    // Engage on a confirmed verdict, or on a moderate score with unknown
    // intent — ambiguous-but-suspicious is worth the honeypot's time.
    if scam_detected || (verdict.score >= 25 && verdict.intent == ScamIntent::Unknown) {
        session.agent_active = true;
    }
    let agent_active = session.agent_active;

    let agent_reply = if agent_active {
        let intel_seed = intel::extract_and_merge(message, &session.intel);
        agent
            .reply(&session.history, persona, &intel_seed, &session.asked_fields, &profile)
            .await
    } else {
        agent.normal_reply(persona, message)
    };
    session.history.push(ChatMessage::assistant(agent_reply.clone()));

    // Re-mine both sides of the exchange into the session intel
    let mut updated = intel::extract_and_merge(message, &session.intel);
    if !agent_reply.is_empty() {
        updated = intel::extract_and_merge(&agent_reply, &updated);
    }
    session.intel = updated;

    record_asked_fields(&agent_reply, &mut session.asked_fields);

    let combined = format!("{} {}", message, agent_reply);
    let risk_score = detector::risk_score(combined.trim(), scam_detected, &session.intel);

    session.updated_at = Utc::now();
    if let Err(e) = store.save(session_id, &session).await {
        // A lost write degrades the next turn, never this one
        log::error!("[SESSION] Failed to persist session {}: {}", session_id, e);
    }

    MessageResponse {
        session_id: session_id.to_string(),
        scam_detected,
        agent_active,
        extracted_intel: session.intel.clone(),
        agent_reply,
        risk_score,
        persona: persona.to_string(),
        persona_profile: profile,
        asked_fields: session.asked_fields.iter().cloned().collect(),
        scam_intent: verdict.intent.to_string(),
        scam_reasons: verdict.reasons,
        scam_score: verdict.score,
    }
}

/// Infer which field categories the reply asked for by scanning its text.
/// This deliberately mirrors what was said rather than what the planner
/// decided; if the phrasing ever drops these keywords the record drifts.
fn record_asked_fields(reply: &str, asked: &mut BTreeSet<String>) {
    let reply = reply.to_lowercase();
    if reply.contains("upi") {
        asked.insert("upi".to_string());
    }
    if reply.contains("account") || reply.contains("ifsc") {
        asked.insert("bank_ifsc".to_string());
    }
    if reply.contains("link") || reply.contains("url") {
        asked.insert("link".to_string());
    }
    if reply.contains("wallet") || reply.contains("crypto") || reply.contains("bitcoin") {
        asked.insert("crypto_wallet".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::InMemorySessionStore;

    fn agent() -> HoneypotAgent {
        HoneypotAgent::new(None)
    }

    #[tokio::test]
    async fn test_scam_message_activates_and_extracts_upi() {
        let store = InMemorySessionStore::new();
        let response = process_turn(
            &store,
            &agent(),
            Persona::Elderly,
            "s1",
            "Please send 1200 to UPI id scammer123@upi immediately or your account will be suspended",
            None,
        )
        .await;

        assert!(response.scam_detected);
        assert!(response.agent_active);
        assert_eq!(response.extracted_intel.upi_ids, vec!["scammer123@upi"]);
        assert!(!response.agent_reply.is_empty());
        assert!(response.scam_reasons.iter().any(|r| r == "urgency"));
        // detected (40) + known UPI artifact (20); reply adds no links or contacts
        assert_eq!(response.risk_score, 60);
        // The elderly ask lines name link, account/IFSC, and UPI
        for field in ["link", "bank_ifsc", "upi"] {
            assert!(response.asked_fields.iter().any(|f| f == field), "missing {field}");
        }
    }

    #[tokio::test]
    async fn test_casual_message_stays_in_normal_mode() {
        let store = InMemorySessionStore::new();
        let response = process_turn(
            &store,
            &agent(),
            Persona::Elderly,
            "s2",
            "hi how are you, meet for coffee tomorrow",
            None,
        )
        .await;

        assert!(!response.scam_detected);
        assert!(!response.agent_active);
        assert_eq!(response.scam_intent, "normal");
        assert!(response.extracted_intel.is_empty());
        assert!(response.asked_fields.is_empty());
        assert_eq!(response.risk_score, 0);
        assert!(!response.agent_reply.is_empty());
    }

    #[tokio::test]
    async fn test_bank_details_and_url_extracted() {
        let store = InMemorySessionStore::new();
        let response = process_turn(
            &store,
            &agent(),
            Persona::Elderly,
            "s3",
            "Your account 123456789012 IFSC HDFC0001234 needs KYC verification, click www.fakebank.com/verify",
            None,
        )
        .await;

        assert!(response.scam_detected);
        assert_eq!(
            response.extracted_intel.bank_accounts,
            vec!["123456789012", "IFSC:HDFC0001234"]
        );
        assert_eq!(
            response.extracted_intel.phishing_links,
            vec!["http://www.fakebank.com/verify"]
        );
        assert!(response.scam_reasons.iter().any(|r| r == "verification"));
        assert!(response.scam_reasons.iter().any(|r| r == "url"));
    }

    #[tokio::test]
    async fn test_flags_are_sticky_across_turns() {
        let store = InMemorySessionStore::new();
        let agent = agent();

        let first = process_turn(
            &store,
            &agent,
            Persona::Elderly,
            "s4",
            "verify your kyc at www.fakebank.com/verify",
            None,
        )
        .await;
        assert!(first.scam_detected && first.agent_active);

        let second = process_turn(&store, &agent, Persona::Elderly, "s4", "ok thanks", None).await;
        // The follow-up is harmless on its own, but the session never de-escalates
        assert!(second.scam_detected);
        assert!(second.agent_active);
        assert_eq!(second.scam_intent, "normal");

        let session = store.load("s4").await.unwrap();
        assert_eq!(session.history.len(), 4);
    }

    #[tokio::test]
    async fn test_persona_override_sticks_until_changed() {
        let store = InMemorySessionStore::new();
        let agent = agent();

        let first = process_turn(
            &store,
            &agent,
            Persona::Elderly,
            "s5",
            "send otp now",
            Some("gamer"),
        )
        .await;
        assert_eq!(first.persona, "gamer");
        assert_eq!(first.persona_profile.age, "20");

        let second = process_turn(&store, &agent, Persona::Elderly, "s5", "did you send it", None).await;
        assert_eq!(second.persona, "gamer");
        // Profile materialized on the first turn wins thereafter
        assert_eq!(second.persona_profile.age, "20");

        let third = process_turn(
            &store,
            &agent,
            Persona::Elderly,
            "s5",
            "hello, do the needful",
            Some("hr"),
        )
        .await;
        assert_eq!(third.persona, "hr");
    }

    #[tokio::test]
    async fn test_unknown_persona_falls_back_to_default() {
        let store = InMemorySessionStore::new();
        let response = process_turn(
            &store,
            &agent(),
            Persona::Elderly,
            "s6",
            "share your otp",
            Some("astronaut"),
        )
        .await;
        assert_eq!(response.persona, "elderly");
    }

    #[tokio::test]
    async fn test_asked_fields_grow_monotonically() {
        let store = InMemorySessionStore::new();
        let agent = agent();

        let first = process_turn(
            &store,
            &agent,
            Persona::Elderly,
            "s7",
            "complete kyc verification today",
            None,
        )
        .await;
        let after_first: BTreeSet<String> = first.asked_fields.iter().cloned().collect();
        assert!(!after_first.is_empty());

        let second = process_turn(
            &store,
            &agent,
            Persona::Elderly,
            "s7",
            "just pay the processing fee for the refund",
            None,
        )
        .await;
        let after_second: BTreeSet<String> = second.asked_fields.iter().cloned().collect();
        assert!(after_first.is_subset(&after_second));
    }

    #[test]
    fn test_record_asked_fields_keyword_mapping() {
        let mut asked = BTreeSet::new();
        record_asked_fields("Please share the full verification link and your UPI ID.", &mut asked);
        assert!(asked.contains("link"));
        assert!(asked.contains("upi"));
        assert!(!asked.contains("bank_ifsc"));

        record_asked_fields("If crypto is required, share the wallet address.", &mut asked);
        assert!(asked.contains("crypto_wallet"));
    }
}
