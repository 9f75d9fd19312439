//! Next-move planning: which artifact categories to solicit this turn.
//!
//! Stateless given its inputs. The session never records planner output
//! directly; the `asked_fields` set it reads is maintained by a post-hoc scan
//! of the generated reply text (see the message controller).

use crate::intel::IntelSet;
use std::collections::BTreeSet;
use strum::{AsRefStr, Display};

/// Coarse classification of the scam narrative, used to phrase the reply
/// naturally. First matching family wins, in fixed priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Topic {
    Refund,
    Kyc,
    Job,
    Crypto,
    Lottery,
    Other,
}

/// An artifact category the honeypot is trying to solicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum FieldKind {
    #[strum(serialize = "link")]
    Link,
    #[strum(serialize = "upi")]
    Upi,
    #[strum(serialize = "bank_ifsc")]
    BankIfsc,
    #[strum(serialize = "crypto_wallet")]
    CryptoWallet,
}

pub fn infer_context(last_user: &str) -> Topic {
    let text = last_user.to_lowercase();
    let any = |keys: &[&str]| keys.iter().any(|k| text.contains(k));

    if any(&["refund", "chargeback", "processing fee"]) {
        Topic::Refund
    } else if any(&["kyc", "verify", "verification", "suspended"]) {
        Topic::Kyc
    } else if any(&["job", "interview", "offer", "hr"]) {
        Topic::Job
    } else if any(&["crypto", "bitcoin", "wallet"]) {
        Topic::Crypto
    } else if any(&["lottery", "prize", "won", "gift"]) {
        Topic::Lottery
    } else {
        Topic::Other
    }
}

/// Decide which fields to ask for next, in the order the reply should ask.
///
/// When the scammer's own wording names a category we still lack, that
/// category jumps the queue.
pub fn next_requests(
    intel: &IntelSet,
    asked: &BTreeSet<String>,
    topic: Topic,
    last_user: &str,
) -> Vec<FieldKind> {
    let is_asked = |field: FieldKind| asked.contains(field.as_ref());
    let mut needs = Vec::new();

    if topic != Topic::Crypto && !intel.has_link() && !is_asked(FieldKind::Link) {
        needs.push(FieldKind::Link);
    }

    if topic == Topic::Crypto {
        if !is_asked(FieldKind::CryptoWallet) {
            needs.push(FieldKind::CryptoWallet);
        }
    } else {
        if !intel.has_upi() && !is_asked(FieldKind::Upi) {
            needs.push(FieldKind::Upi);
        }
        if !intel.has_bank() && !is_asked(FieldKind::BankIfsc) {
            needs.push(FieldKind::BankIfsc);
        }
    }

    // Priority overrides: the scammer mentioned a channel we still lack
    let lower = last_user.to_lowercase();
    if lower.contains("upi")
        && !needs.contains(&FieldKind::Upi)
        && !is_asked(FieldKind::Upi)
        && !intel.has_upi()
    {
        needs.insert(0, FieldKind::Upi);
    }
    if lower.contains("account")
        && !needs.contains(&FieldKind::BankIfsc)
        && !is_asked(FieldKind::BankIfsc)
        && !intel.has_bank()
    {
        needs.insert(0, FieldKind::BankIfsc);
    }

    needs
}
