//! # ContentPolicy
//!
//! Pure, deterministic screening of candidate gossip content. The policy is
//! an ordered chain of [`PolicyRule`]s evaluated with short-circuit on the
//! first violation; [`ContentPolicy::standard`] carries the production rule
//! content (Korean-market term lists), but deployments can assemble their
//! own chain.
//!
//! No rule has side effects and none consults state — the same input always
//! yields the same verdict.

use gb_core::{AppError, Result};

/// One content screen. Returns the rejection reason when the rule fires.
pub trait PolicyRule: Send + Sync {
    fn check(&self, content: &str) -> Option<String>;
}

/// Ordered rule chain; first firing rule wins.
pub struct ContentPolicy {
    rules: Vec<Box<dyn PolicyRule>>,
}

impl ContentPolicy {
    pub fn new(rules: Vec<Box<dyn PolicyRule>>) -> Self {
        Self { rules }
    }

    /// The production chain, in its fixed evaluation order: profanity,
    /// contact information, repetition, numeric-only.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(BannedTerms { terms: BANNED_TERMS }),
            Box::new(ContactInfo),
            Box::new(Repetition { min_run: 4 }),
            Box::new(NumericOnly),
        ])
    }

    pub fn evaluate(&self, content: &str) -> Result<()> {
        for rule in &self.rules {
            if let Some(reason) = rule.check(content) {
                return Err(AppError::PolicyViolation(reason));
            }
        }
        Ok(())
    }
}

/// Profanity list, matched case-insensitively as substrings.
const BANNED_TERMS: &[&str] = &[
    "시발", "씨발", "병신", "개새끼", "지랄", "썅", "미친놈", "미친년", "꺼져",
];

struct BannedTerms {
    terms: &'static [&'static str],
}

impl PolicyRule for BannedTerms {
    fn check(&self, content: &str) -> Option<String> {
        let lowered = content.to_lowercase();
        self.terms
            .iter()
            .any(|t| lowered.contains(t))
            .then(|| "contains inappropriate language".to_string())
    }
}

/// Messenger / social keywords that signal an attempt to move contact
/// off-platform. Matched case-insensitively.
const CONTACT_KEYWORDS: &[&str] = &[
    "카톡", "카카오톡", "카카오", "텔레그램", "오픈채팅", "인스타", "디엠",
    "연락처", "전화번호", "kakao", "telegram", "insta",
];

/// URL fragments; any one of these marks the content as link-like.
const URL_FRAGMENTS: &[&str] = &["http://", "https://", "www.", ".com", ".net", ".kr"];

struct ContactInfo;

impl PolicyRule for ContactInfo {
    fn check(&self, content: &str) -> Option<String> {
        let suspicious = looks_like_phone_number(content)
            || contains_handle(content)
            || {
                let lowered = content.to_lowercase();
                CONTACT_KEYWORDS.iter().any(|k| lowered.contains(k))
                    || URL_FRAGMENTS.iter().any(|f| lowered.contains(f))
            };
        suspicious.then(|| "may contain contact information".to_string())
    }
}

/// Phone-number heuristic: a chain of digit groups joined by single `-`, `.`
/// or space separators carrying 9+ digits total (e.g. `010-1234-5678`,
/// `01012345678`). Short figures like prices or dates stay under the bar.
fn looks_like_phone_number(content: &str) -> bool {
    let mut digits_in_chain = 0u32;
    let mut pending_separator = false;

    for c in content.chars() {
        if c.is_ascii_digit() {
            digits_in_chain += 1;
            pending_separator = false;
            if digits_in_chain >= 9 {
                return true;
            }
        } else if matches!(c, '-' | '.' | ' ') && digits_in_chain > 0 && !pending_separator {
            // one separator may sit between groups; a second breaks the chain
            pending_separator = true;
        } else {
            digits_in_chain = 0;
            pending_separator = false;
        }
    }
    false
}

/// `@handle` detection: an `@` immediately followed by an identifier char.
fn contains_handle(content: &str) -> bool {
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '@' {
            if let Some(next) = chars.peek() {
                if next.is_alphanumeric() || *next == '_' {
                    return true;
                }
            }
        }
    }
    false
}

struct Repetition {
    min_run: usize,
}

impl PolicyRule for Repetition {
    fn check(&self, content: &str) -> Option<String> {
        let mut prev: Option<char> = None;
        let mut run = 0usize;
        for c in content.chars() {
            if Some(c) == prev {
                run += 1;
            } else {
                prev = Some(c);
                run = 1;
            }
            if run >= self.min_run {
                return Some("meaningless repetition".to_string());
            }
        }
        None
    }
}

struct NumericOnly;

impl PolicyRule for NumericOnly {
    fn check(&self, content: &str) -> Option<String> {
        let mut saw_digit = false;
        for c in content.chars() {
            if c.is_ascii_digit() {
                saw_digit = true;
            } else if !matches!(c, '-' | '.' | ' ' | ',' | '(' | ')') {
                return None;
            }
        }
        saw_digit.then(|| "numeric-only content not allowed".to_string())
    }
}
