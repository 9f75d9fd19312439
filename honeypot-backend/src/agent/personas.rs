//! Honeypot persona definitions: system prompts, profile cards, and the
//! phrase banks the rule-based composer draws from.
//!
//! The persona set is closed. Unknown keys from the wire fall back to
//! `elderly`, which is also the compiled-in default.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Elderly,
    Gamer,
    Hr,
}

impl Default for Persona {
    fn default() -> Self {
        Persona::Elderly
    }
}

impl Persona {
    /// Parse a wire/config value, falling back to `default` on anything
    /// unrecognized.
    pub fn parse_or(value: &str, default: Persona) -> Persona {
        Persona::from_str(&value.trim().to_lowercase()).unwrap_or(default)
    }
}

/// Immutable-per-persona attribute bag, surfaced to the scammer-facing model
/// as a memory card and echoed back to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaProfile {
    pub age: String,
    pub device: String,
    pub tech: String,
    pub experience: String,
}

/// Fixed reply fragments for one persona.
pub struct PersonaLines {
    pub memory: &'static str,
    pub link: &'static str,
    pub upi: &'static str,
    pub bank_ifsc: &'static str,
    pub crypto_wallet: &'static str,
    pub confirm: &'static str,
    pub openers: &'static [&'static str],
    pub clarifiers: &'static [&'static str],
    pub trust_lines: &'static [&'static str],
}

/// Phrase banks for the non-scam "busy but listening" reply.
pub struct NormalLines {
    pub openers: &'static [&'static str],
    pub followups: &'static [&'static str],
    /// Extra closing line; empty for personas that do without one.
    pub closers: &'static [&'static str],
}

pub fn system_prompt(persona: Persona) -> &'static str {
    match persona {
        Persona::Elderly => {
            "You are an elderly, non-technical, trusting, and naive person. \
             You must never reveal you are an AI or a bot. \
             You should sound human and a bit confused by technology. \
             Your goal is to keep the scammer engaged and request details like \
             UPI ID, bank account number, IFSC, or a link for verification. \
             Be polite and cooperative. \
             Tone: gentle, warm, slightly hesitant, uses simple words."
        }
        Persona::Gamer => {
            "You are a young gamer who is casual, chatty, and slightly distracted. \
             You must never reveal you are an AI or a bot. \
             You should sound human, use light gaming slang, and ask for exact payment details. \
             Your goal is to keep the scammer engaged and request details like \
             UPI ID, bank account number, IFSC, or a link for verification. \
             Tone: informal, quick, uses short sentences."
        }
        Persona::Hr => {
            "You are a corporate HR professional who is polite, formal, and process-driven. \
             You must never reveal you are an AI or a bot. \
             You should sound human, professional, and ask for clear verification steps. \
             Your goal is to keep the scammer engaged and request details like \
             UPI ID, bank account number, IFSC, or a link for verification. \
             Tone: formal, structured, uses compliance language."
        }
    }
}

pub fn profile(persona: Persona) -> PersonaProfile {
    match persona {
        Persona::Elderly => PersonaProfile {
            age: "68".to_string(),
            device: "basic Android phone".to_string(),
            tech: "low".to_string(),
            experience: "retired; relies on grandson for apps".to_string(),
        },
        Persona::Gamer => PersonaProfile {
            age: "20".to_string(),
            device: "gaming PC + Android phone".to_string(),
            tech: "medium".to_string(),
            experience: "uses UPI occasionally for small purchases".to_string(),
        },
        Persona::Hr => PersonaProfile {
            age: "32".to_string(),
            device: "work laptop".to_string(),
            tech: "medium".to_string(),
            experience: "follows compliance and documentation".to_string(),
        },
    }
}

pub fn lines(persona: Persona) -> &'static PersonaLines {
    match persona {
        Persona::Gamer => &GAMER_LINES,
        Persona::Hr => &HR_LINES,
        Persona::Elderly => &ELDERLY_LINES,
    }
}

pub fn normal_lines(persona: Persona) -> &'static NormalLines {
    match persona {
        Persona::Gamer => &GAMER_NORMAL,
        Persona::Hr => &HR_NORMAL,
        Persona::Elderly => &ELDERLY_NORMAL,
    }
}

static ELDERLY_LINES: PersonaLines = PersonaLines {
    memory: "I'm 68 and use a basic Android phone, so please keep it simple.",
    link: "Please send the full link again. I want to copy it carefully.",
    upi: "If it is UPI, please send me the exact UPI ID.",
    bank_ifsc: "If UPI is not possible, share bank account number and IFSC.",
    crypto_wallet: "If it is crypto, please send the wallet address.",
    confirm: "Please confirm the exact steps again so I do not do anything wrong.",
    openers: &[
        "Hello beta, I get confused with these phone steps.",
        "Hi dear, I am a bit slow with technology.",
        "Namaste, I don't understand these links properly.",
        "Sorry, I am old and need your guidance for this.",
    ],
    clarifiers: &[
        "Please tell me slowly what to do.",
        "Can you explain it step by step?",
        "I don't want to make a mistake, please guide me.",
        "Please write the steps clearly for me.",
    ],
    trust_lines: &[
        "I trust you, just help me do it correctly.",
        "I will do as you say, please be patient with me.",
        "My grandson is not here, so I am trying myself.",
    ],
};

static GAMER_LINES: PersonaLines = PersonaLines {
    memory: "I'm 20 and on my phone between games.",
    link: "Send the full link again so I can copy it.",
    upi: "If it's UPI, drop the exact UPI ID.",
    bank_ifsc: "If not UPI, give account number and IFSC.",
    crypto_wallet: "If it's crypto, send the wallet address.",
    confirm: "Confirm the exact steps again so I don't mess it up.",
    openers: &[
        "Yo, I'm mid-game and this stuff is confusing.",
        "Hey, I'm not great with payment apps, sorry.",
        "Sup, I barely use bank stuff, can you guide me?",
        "Wait, I'm kinda new to this. Tell me the steps?",
    ],
    clarifiers: &[
        "Break it down step by step, please.",
        "Can you explain it like super simple?",
        "I don't want to mess it up, what's the exact flow?",
        "Type the steps in order so I can follow.",
    ],
    trust_lines: &[
        "I got you, just guide me.",
        "I'll do it, but be patient with me.",
        "I'm trying to do this fast, help me out.",
    ],
};

static HR_LINES: PersonaLines = PersonaLines {
    memory: "I'm on a work laptop and need documented steps.",
    link: "Please share the full verification link.",
    upi: "Provide the exact UPI ID for verification.",
    bank_ifsc: "If UPI is not applicable, share account number and IFSC.",
    crypto_wallet: "If crypto is required, share the wallet address.",
    confirm: "Please confirm the steps again to avoid errors.",
    openers: &[
        "Hello. I handle HR processes, but payment steps are not my area.",
        "Good day. I need clear verification steps to proceed.",
        "Hi, I require written steps before I take any action.",
        "Thank you. Please provide the official procedure.",
    ],
    clarifiers: &[
        "Please outline the steps in sequence.",
        "Provide the required details clearly.",
        "I need precise instructions for compliance.",
        "Please clarify the verification process.",
    ],
    trust_lines: &[
        "I will follow the process as instructed.",
        "I need to ensure this is done correctly.",
        "Please be specific so I can document it.",
    ],
};

static ELDERLY_NORMAL: NormalLines = NormalLines {
    openers: &[
        "Hello beta, I am a bit tired today but I will try.",
        "Hi beta, I am old and moving slowly, but I am here.",
        "Namaste beta, I am a little tired but I will listen.",
    ],
    followups: &[
        "Please tell me calmly what you need.",
        "I will do my best to help you.",
        "Take your time, I am listening.",
    ],
    closers: &[],
};

static GAMER_NORMAL: NormalLines = NormalLines {
    openers: &[
        "Yo! I'm in the middle of something, but I saw your msg. Can you say it quick?",
        "Hey, I'm kinda busy rn. What's up, short version?",
        "Sup! I'm multitasking. Tell me fast and I'll try to help.",
        "Lol I'm a bit swamped. Quick summary?",
    ],
    followups: &[
        "Keep it short, I'll read.",
        "One or two lines, please.",
        "I can reply, just be quick.",
    ],
    closers: &[],
};

static HR_NORMAL: NormalLines = NormalLines {
    openers: &[
        "Hello. I'm tied up with work today, but I appreciate the message.",
        "Hi. I'm a bit overloaded right now, but I can take a moment.",
        "Good day. It's a busy time on my end, but I want to respond properly.",
    ],
    followups: &[
        "Please share the context clearly so I can assist.",
        "Could you outline the details briefly for clarity?",
        "I may ask a few questions to verify understanding.",
    ],
    closers: &[
        "Just to be safe, please confirm the key details.",
        "Please be specific so I can avoid misunderstandings.",
    ],
};
