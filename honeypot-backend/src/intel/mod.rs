//! Payment/contact artifact extraction from raw message text.
//!
//! Mines UPI handles, bank account numbers (with IFSC codes), and URLs out of
//! unstructured text. All functions are pure; merging accumulated intel is a
//! per-category set union, so it is commutative, associative, and idempotent.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

static UPI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z0-9._-]{2,256}@[a-zA-Z]{2,64}\b").unwrap());
static BANK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{9,18}\b").unwrap());
static IFSC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b[A-Z]{4}0[A-Z0-9]{6}\b").unwrap());
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\b(?i:https?://|www\.)[^\s<>"]+\b"#).unwrap());

/// Keywords that mark a digit run as banking-related rather than a phone number.
const BANK_CONTEXT: &[&str] = &["account", "bank", "a/c", "acc", "ifsc"];

/// Accumulated artifacts for one session. Each category is kept sorted and
/// deduplicated so merges are order-independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelSet {
    #[serde(default)]
    pub upi_ids: Vec<String>,
    #[serde(default)]
    pub bank_accounts: Vec<String>,
    #[serde(default)]
    pub phishing_links: Vec<String>,
}

impl IntelSet {
    pub fn is_empty(&self) -> bool {
        self.upi_ids.is_empty() && self.bank_accounts.is_empty() && self.phishing_links.is_empty()
    }

    pub fn has_upi(&self) -> bool {
        !self.upi_ids.is_empty()
    }

    pub fn has_bank(&self) -> bool {
        !self.bank_accounts.is_empty()
    }

    pub fn has_link(&self) -> bool {
        !self.phishing_links.is_empty()
    }
}

fn normalize_url(url: &str) -> String {
    if url.to_lowercase().starts_with("www.") {
        format!("http://{}", url)
    } else {
        url.to_string()
    }
}

/// A bare 10-digit Indian mobile number (leading 6-9) with no banking keyword
/// anywhere in the message is treated as a phone number, not an account.
fn looks_like_phone(number: &str, text: &str) -> bool {
    if number.len() == 10 && matches!(number.as_bytes()[0], b'6' | b'7' | b'8' | b'9') {
        let lower = text.to_lowercase();
        return !BANK_CONTEXT.iter().any(|k| lower.contains(k));
    }
    false
}

/// A digit run only counts as an account number when a banking keyword appears
/// within 24 characters on either side of the match.
fn has_bank_context(text: &str, start: usize, end: usize) -> bool {
    let before: String = text[..start]
        .chars()
        .rev()
        .take(24)
        .collect::<String>()
        .chars()
        .rev()
        .collect();
    let after: String = text[end..].chars().take(24).collect();
    let window = format!("{}{}{}", before, &text[start..end], after).to_lowercase();
    BANK_CONTEXT.iter().any(|k| window.contains(k))
}

fn normalize_account(num: &str) -> String {
    num.chars().filter(|c| !c.is_whitespace() && *c != '-').collect()
}

/// Extract all artifacts from a single piece of text.
pub fn extract(text: &str) -> IntelSet {
    if text.is_empty() {
        return IntelSet::default();
    }

    let upi_ids: BTreeSet<String> = UPI_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    let mut bank_accounts = BTreeSet::new();
    for m in BANK_RE.find_iter(text) {
        let raw = m.as_str();
        if looks_like_phone(raw, text) {
            continue;
        }
        if !has_bank_context(text, m.start(), m.end()) {
            continue;
        }
        bank_accounts.insert(normalize_account(raw));
    }

    // IFSC codes ride along in the bank category as labeled entries
    for m in IFSC_RE.find_iter(text) {
        bank_accounts.insert(format!("IFSC:{}", m.as_str().to_uppercase()));
    }

    let phishing_links: BTreeSet<String> = URL_RE
        .find_iter(text)
        .map(|m| normalize_url(m.as_str()))
        .collect();

    IntelSet {
        upi_ids: upi_ids.into_iter().collect(),
        bank_accounts: bank_accounts.into_iter().collect(),
        phishing_links: phishing_links.into_iter().collect(),
    }
}

/// Set-union merge of two intel sets, per category.
pub fn merge(existing: &IntelSet, found: &IntelSet) -> IntelSet {
    fn union(a: &[String], b: &[String]) -> Vec<String> {
        let set: BTreeSet<String> = a.iter().chain(b.iter()).cloned().collect();
        set.into_iter().collect()
    }

    IntelSet {
        upi_ids: union(&existing.upi_ids, &found.upi_ids),
        bank_accounts: union(&existing.bank_accounts, &found.bank_accounts),
        phishing_links: union(&existing.phishing_links, &found.phishing_links),
    }
}

/// Extract from `text` and fold the results into `existing`.
pub fn extract_and_merge(text: &str, existing: &IntelSet) -> IntelSet {
    merge(existing, &extract(text))
}
