//! responder.rs — Rule-based intent responder for the assistant widget.
//!
//! Stateless and total: an ordered rule list is evaluated against the
//! lowercased utterance and the FIRST matching rule wins. Rule order is the
//! tie-break — an utterance mentioning both "github" and "job" resolves to
//! whichever rule is listed first. The list is a plain inspectable slice so
//! tests can enumerate precedence directly instead of poking at branches.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// One classification rule: any keyword present (whole word, case
/// insensitive) selects the canned reply.
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub id: &'static str,
    pub keywords: &'static [&'static str],
    pub reply: &'static str,
}

/// Ordered rule list. Position is precedence; first match wins.
pub const RULES: &[IntentRule] = &[
    IntentRule {
        id: "greeting",
        keywords: &["hello", "hi", "hey"],
        reply: "Hello! I can help analyze your skills and find opportunities. \
                Have you submitted your profiles yet?",
    },
    IntentRule {
        id: "code_host",
        keywords: &["github", "repository", "repositories", "repo", "repos"],
        reply: "Code repositories are a great way to showcase your coding skills. \
                I can analyze them to identify your tech stack and expertise level.",
    },
    IntentRule {
        id: "microblog",
        keywords: &["twitter", "x", "tweet", "tweets"],
        reply: "Microblog activity can reveal your interests and networking in the \
                tech community. I'll look for tech keywords and mentions in your posts.",
    },
    IntentRule {
        id: "professional_network",
        keywords: &["linkedin"],
        reply: "Professional-network profiles contain valuable information about \
                your experience and skills. Make sure your profile is public or \
                you've provided the correct URL.",
    },
    IntentRule {
        id: "opportunities",
        keywords: &["job", "jobs", "opportunity", "opportunities"],
        reply: "I can help find opportunities that match your skill set. Once I \
                analyze your profiles, I'll recommend relevant positions.",
    },
    IntentRule {
        id: "skill_analysis",
        keywords: &["skill", "skills", "analysis", "analyze"],
        reply: "Skill analysis examines your code repositories, microblog activity, \
                and professional profile to identify your technical expertise and \
                experience level.",
    },
];

/// Returned when nothing matches. Never an error.
pub const FALLBACK_REPLY: &str =
    "I'm still learning how to respond to that. Try asking about your code \
     repositories, social profiles, skill analysis, or job opportunities.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RespondError {
    /// Blank utterance; callers should treat the submission as a no-op.
    #[error("utterance is empty")]
    EmptyInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One message in an ephemeral chat session. Lives only for the duration of
/// a conversation on the caller's side; this core never stores it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChatTurn {
    pub text: String,
    pub sender: Sender,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Assistant,
        }
    }
}

/// Classify a user turn and produce the assistant's turn.
pub fn respond_turn(turn: &ChatTurn) -> Result<ChatTurn, RespondError> {
    Ok(ChatTurn::assistant(respond(&turn.text)?))
}

// One alternation regex per rule, compiled once. Word boundaries keep short
// keywords like "hi" or "x" from firing inside other words.
static RULE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    RULES
        .iter()
        .map(|rule| {
            let alternation = rule
                .keywords
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("rule regex")
        })
        .collect()
});

/// Classify `utterance` and return the canned reply. The only error is an
/// empty input; every non-blank utterance gets an answer.
pub fn respond(utterance: &str) -> Result<&'static str, RespondError> {
    let trimmed = utterance.trim();
    if trimmed.is_empty() {
        return Err(RespondError::EmptyInput);
    }

    for (rule, re) in RULES.iter().zip(RULE_PATTERNS.iter()) {
        if re.is_match(trimmed) {
            debug!(target: "responder", id = %anon_hash(trimmed), rule = rule.id, "intent matched");
            return Ok(rule.reply);
        }
    }

    debug!(target: "responder", id = %anon_hash(trimmed), rule = "fallback", "no intent matched");
    Ok(FALLBACK_REPLY)
}

/// Short anonymized id for logging. Raw utterances are never logged.
fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
