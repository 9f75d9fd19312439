//! Deterministic rule-based reply composition.
//!
//! Variety comes from a PRNG seeded off the triggering message text, so the
//! same inbound text always produces the same reply. This keeps the fallback
//! path fully reproducible without touching the wall clock.

use crate::agent::personas::{self, Persona};
use crate::agent::planner::{self, FieldKind, Topic};
use crate::ai::{ChatMessage, MessageRole};
use crate::intel::IntelSet;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

/// djb2 hash of the seed text. Stable across runs and platforms, unlike the
/// stdlib hasher.
fn seed_from_text(text: &str) -> u64 {
    let mut hash: u64 = 5381;
    for b in text.bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(b as u64);
    }
    hash
}

fn last_user_content(history: &[ChatMessage]) -> &str {
    history
        .iter()
        .rev()
        .find(|m| m.role == MessageRole::User)
        .map(|m| m.content.as_str())
        .unwrap_or("")
}

fn context_line(topic: Topic) -> &'static str {
    match topic {
        Topic::Refund => "You mentioned a refund. Please show me the exact steps to get it.",
        Topic::Kyc => "You said verification is pending. What exactly should I do first?",
        Topic::Job => "Is this for a job process? Please share the formal steps.",
        Topic::Crypto => "I am not familiar with crypto. Please guide me slowly.",
        Topic::Lottery => "You said I won something. Please explain how to claim it.",
        Topic::Other => "Please explain the situation clearly so I can follow.",
    }
}

fn ask_line(bank: &personas::PersonaLines, field: FieldKind) -> &'static str {
    match field {
        FieldKind::Link => bank.link,
        FieldKind::Upi => bank.upi,
        FieldKind::BankIfsc => bank.bank_ifsc,
        FieldKind::CryptoWallet => bank.crypto_wallet,
    }
}

/// Compose an engaged-mode reply: opener + clarifier + memory line + topic
/// line, an occasional trust-building line, then one ask per planned field
/// (or the confirm line when nothing is left to ask).
pub fn rule_based_reply(
    history: &[ChatMessage],
    persona: Persona,
    intel: &IntelSet,
    asked: &BTreeSet<String>,
) -> String {
    let seed_text = history
        .last()
        .map(|m| m.content.as_str())
        .filter(|c| !c.is_empty())
        .unwrap_or("seed");
    let mut rng = StdRng::seed_from_u64(seed_from_text(seed_text));

    let last_user = last_user_content(history);
    let topic = planner::infer_context(last_user);
    let needs = planner::next_requests(intel, asked, topic, last_user);
    let bank = personas::lines(persona);

    let mut lines: Vec<&str> = vec![
        bank.openers.choose(&mut rng).copied().unwrap_or_default(),
        bank.clarifiers.choose(&mut rng).copied().unwrap_or_default(),
        bank.memory,
        context_line(topic),
    ];

    if rng.gen::<f64>() < 0.4 {
        if let Some(line) = bank.trust_lines.choose(&mut rng) {
            lines.push(line);
        }
    }

    for field in &needs {
        lines.push(ask_line(bank, *field));
    }
    if needs.is_empty() {
        lines.push(bank.confirm);
    }

    lines.join(" ")
}

/// Compose a non-scam reply: brief, persona-flavored, no solicitation.
pub fn normal_reply(persona: Persona, last_user: &str) -> String {
    let text = last_user.trim();
    let seed_text = if text.is_empty() { "seed" } else { text };
    let mut rng = StdRng::seed_from_u64(seed_from_text(seed_text));

    let bank = personas::normal_lines(persona);
    let mut parts: Vec<&str> = vec![
        bank.openers.choose(&mut rng).copied().unwrap_or_default(),
        bank.followups.choose(&mut rng).copied().unwrap_or_default(),
    ];
    if let Some(closer) = bank.closers.choose(&mut rng) {
        parts.push(closer);
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(msgs: &[(&str, &str)]) -> Vec<ChatMessage> {
        msgs.iter()
            .map(|(role, content)| ChatMessage {
                role: match *role {
                    "user" => MessageRole::User,
                    "assistant" => MessageRole::Assistant,
                    _ => MessageRole::System,
                },
                content: content.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_rule_based_reply_is_deterministic() {
        let h = history(&[("user", "Your KYC is pending, verify at www.fakebank.com/verify")]);
        let a = rule_based_reply(&h, Persona::Elderly, &IntelSet::default(), &BTreeSet::new());
        let b = rule_based_reply(&h, Persona::Elderly, &IntelSet::default(), &BTreeSet::new());
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn test_different_seeds_can_differ() {
        let a = rule_based_reply(
            &history(&[("user", "refund pending, pay processing fee")]),
            Persona::Gamer,
            &IntelSet::default(),
            &BTreeSet::new(),
        );
        let b = rule_based_reply(
            &history(&[("user", "you won the lottery, claim your prize")]),
            Persona::Gamer,
            &IntelSet::default(),
            &BTreeSet::new(),
        );
        // Different topics guarantee different context lines even if the
        // seeded picks collide.
        assert_ne!(a, b);
    }

    #[test]
    fn test_reply_contains_memory_and_asks() {
        let h = history(&[("user", "complete kyc verification now")]);
        let reply = rule_based_reply(&h, Persona::Elderly, &IntelSet::default(), &BTreeSet::new());
        assert!(reply.contains("I'm 68 and use a basic Android phone"));
        // kyc topic with nothing known asks for link, upi, and bank details
        assert!(reply.contains("full link"));
        assert!(reply.contains("UPI ID"));
        assert!(reply.contains("IFSC"));
    }

    #[test]
    fn test_everything_asked_falls_back_to_confirm() {
        let h = history(&[("user", "just do the kyc verification steps")]);
        let asked: BTreeSet<String> =
            ["link", "upi", "bank_ifsc"].iter().map(|s| s.to_string()).collect();
        let reply = rule_based_reply(&h, Persona::Hr, &IntelSet::default(), &asked);
        assert!(reply.contains("Please confirm the steps again to avoid errors."));
    }

    #[test]
    fn test_empty_history_uses_fixed_seed() {
        let a = rule_based_reply(&[], Persona::Elderly, &IntelSet::default(), &BTreeSet::new());
        let b = rule_based_reply(&[], Persona::Elderly, &IntelSet::default(), &BTreeSet::new());
        assert_eq!(a, b);
    }

    #[test]
    fn test_normal_reply_is_deterministic_and_brief() {
        let a = normal_reply(Persona::Gamer, "hi how are you");
        let b = normal_reply(Persona::Gamer, "hi how are you");
        assert_eq!(a, b);
        assert!(!a.contains("UPI"));
        assert!(!a.contains("IFSC"));
    }

    #[test]
    fn test_normal_reply_hr_includes_closer() {
        let reply = normal_reply(Persona::Hr, "good morning");
        // HR normal replies end with one of the cautious closers
        let has_closer = personas::normal_lines(Persona::Hr)
            .closers
            .iter()
            .any(|c| reply.contains(c));
        assert!(has_closer);
    }

    #[test]
    fn test_seed_hash_is_stable() {
        assert_eq!(seed_from_text("abc"), seed_from_text("abc"));
        assert_ne!(seed_from_text("abc"), seed_from_text("abd"));
    }
}
