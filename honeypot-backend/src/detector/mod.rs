//! Scam-likelihood scoring over a single inbound message.
//!
//! Every signal is an explicit, inspectable heuristic: weighted keyword
//! families, urgency phrasing, credential requests, too-good-to-be-true
//! offers, fee requests, and contact-info presence. Each signal contributes
//! at most once per evaluation and the final score is clamped to 95. The
//! verdict layers fast-path triggers on top of the score, then applies a
//! single false-positive suppression for casual/family chat.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::intel::IntelSet;

/// Cap applied to the summed signal score and to the derived risk score.
pub const SCORE_CAP: i32 = 95;

const SCAM_KEYWORDS: &[&str] = &[
    "upi",
    "otp",
    "bank",
    "account",
    "refund",
    "lottery",
    "prize",
    "kyc",
    "verification",
    "verify",
    "click",
    "link",
    "payment",
    "deposit",
    "transfer",
    "wire",
    "password",
    "login",
    "customer care",
    "support",
    "suspend",
    "blocked",
    "urgent",
    "penalty",
    "fine",
    "limited time",
    "gift card",
    "bitcoin",
    "crypto",
    "wallet",
    "zelle",
    "processing fee",
    "fee",
];

const URGENCY: &[&str] = &[
    "urgent",
    "immediately",
    "within",
    "expire",
    "suspend",
    "limited time",
    "last chance",
    "final notice",
    "action required",
];

const FAMILY_HINTS: &[&str] = &[
    "mom", "dad", "mother", "father", "bro", "brother", "sis", "sister", "aunt", "uncle",
    "son", "daughter", "cousin", "grandma", "grandpa", "grandmother", "grandfather", "family",
];

const NORMAL_HINTS: &[&str] = &[
    "hello",
    "hi",
    "how are you",
    "good morning",
    "good afternoon",
    "good evening",
    "thanks",
    "thank you",
    "ok",
    "okay",
    "see you",
    "meet",
    "call me",
];

/// Keywords that flag a message as a scam on their own.
const STRONG_TRIGGERS: &[&str] =
    &["upi", "otp", "ifsc", "bank account", "bitcoin", "crypto", "wallet"];

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\b(?i:https?://|www\.)[^\s<>"]+\b"#).unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?\d[\d\s().-]{7,}\d").unwrap());
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}").unwrap());
static CRYPTO_WALLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(bc1|[13])[a-zA-HJ-NP-Z0-9]{25,39}\b").unwrap());

/// Coarse classification of who the message sounds like it is from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ScamIntent {
    Family,
    Normal,
    Unknown,
}

/// Per-message verdict. Derived fresh each turn; carries no session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScamVerdict {
    pub scam_detected: bool,
    pub score: i32,
    pub intent: ScamIntent,
    pub reasons: Vec<String>,
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

/// Sum the independent signal contributions for one message.
/// Returns the raw (unclamped) score plus human-readable reason tags.
pub fn score_message(message: &str) -> (i32, Vec<String>) {
    let mut reasons = Vec::new();
    if message.is_empty() {
        return (0, reasons);
    }

    let text = message.to_lowercase();
    let mut score = 0;

    let keyword_hits: Vec<&str> = SCAM_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| text.contains(kw))
        .collect();
    if !keyword_hits.is_empty() {
        score += (5 * keyword_hits.len() as i32).min(30);
        let shown: Vec<&str> = keyword_hits.iter().copied().take(5).collect();
        reasons.push(format!("keywords:{}", shown.join(",")));
    }

    if contains_any(&text, URGENCY) {
        score += 15;
        reasons.push("urgency".to_string());
    }

    if URL_RE.is_match(&text) {
        score += 20;
        reasons.push("url".to_string());
    }

    if contains_any(&text, &["otp", "password", "login"]) {
        score += 20;
        reasons.push("credential_request".to_string());
    }

    if contains_any(&text, &["kyc", "verify", "verification"]) {
        score += 15;
        reasons.push("verification".to_string());
    }

    if contains_any(&text, &["refund", "prize", "lottery"]) {
        score += 15;
        reasons.push("too_good".to_string());
    }

    if contains_any(&text, &["bitcoin", "crypto", "wallet"]) {
        score += 20;
        reasons.push("crypto".to_string());
    }

    if text.contains("processing fee") || (text.contains("fee") && text.contains("refund")) {
        score += 15;
        reasons.push("fee_request".to_string());
    }

    if PHONE_RE.is_match(&text) || EMAIL_RE.is_match(&text) {
        score += 5;
        reasons.push("contact_info".to_string());
    }

    (score, reasons)
}

/// Classify intent from lowered text. Family hints win over casual hints.
pub fn classify_intent(text: &str) -> ScamIntent {
    if contains_any(text, FAMILY_HINTS) {
        return ScamIntent::Family;
    }
    if contains_any(text, NORMAL_HINTS) {
        return ScamIntent::Normal;
    }
    ScamIntent::Unknown
}

/// Full verdict for one message: score, intent, trigger rules, suppression.
pub fn detect_scam_details(message: &str) -> ScamVerdict {
    let text = message.to_lowercase();
    let (score, reasons) = score_message(message);
    let intent = classify_intent(&text);

    // Fast-path triggers
    let strong_trigger = contains_any(&text, STRONG_TRIGGERS);
    let url_trigger =
        URL_RE.is_match(&text) && contains_any(&text, &["verify", "login", "update", "kyc"]);
    let refund_fee_trigger =
        text.contains("refund") && (text.contains("fee") || text.contains("processing fee"));

    let has = |tag: &str| reasons.iter().any(|r| r == tag);
    let mut scam_detected = score >= 35
        || (has("url") && has("verification"))
        || strong_trigger
        || url_trigger
        || refund_fee_trigger;

    // Reduce false positives for casual/family chat with no scam signals.
    // This is the sole override and is applied last.
    if matches!(intent, ScamIntent::Family | ScamIntent::Normal) && score < 25 {
        scam_detected = false;
    }

    ScamVerdict {
        scam_detected,
        score: score.min(SCORE_CAP),
        intent,
        reasons,
    }
}

pub fn detect_scam(message: &str) -> bool {
    detect_scam_details(message).scam_detected
}

/// Session-level risk score, derived post-hoc from the turn's combined
/// inbound+outbound text and everything learned so far. Separate from the
/// per-message scam score.
pub fn risk_score(combined_text: &str, scam_detected: bool, intel: &IntelSet) -> i32 {
    let mut risk = 0;
    if scam_detected {
        risk += 40;
    }
    if intel.has_link() {
        risk += 25;
    }
    if intel.has_upi() || intel.has_bank() {
        risk += 20;
    }
    if PHONE_RE.is_match(combined_text) {
        risk += 5;
    }
    if EMAIL_RE.is_match(combined_text) {
        risk += 5;
    }
    if CRYPTO_WALLET_RE.is_match(combined_text) {
        risk += 10;
    }
    risk.min(SCORE_CAP)
}
