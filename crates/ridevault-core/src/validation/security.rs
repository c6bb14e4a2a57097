//! Payload security screening.
//!
//! Scans the raw request payload for injection signatures before it reaches
//! deserialization, and flags known crawler/bot user agents. Matches are
//! reported by rule name for internal logging; the client only ever sees a
//! generic rejection.

use regex::Regex;
use std::sync::OnceLock;

/// Named injection signatures checked against the raw payload.
fn injection_signatures() -> &'static [(&'static str, Regex)] {
    static SIGNATURES: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    SIGNATURES.get_or_init(|| {
        vec![
            (
                "sql-keyword-combination",
                Regex::new(
                    r"(?i)(\bunion\s+select\b|\bdrop\s+table\b|\binsert\s+into\b|\bdelete\s+from\b|\bselect\b.+\bfrom\b.+(--|#|/\*))",
                )
                .expect("valid regex"),
            ),
            (
                "sql-statement-injection",
                Regex::new(r#"(?i)(['";]|%27)\s*(drop|delete|insert|update|union|select)\b"#)
                    .expect("valid regex"),
            ),
            (
                "script-tag",
                Regex::new(r"(?i)<\s*script\b").expect("valid regex"),
            ),
            (
                "javascript-uri",
                Regex::new(r"(?i)javascript\s*:").expect("valid regex"),
            ),
            (
                "event-handler-attribute",
                Regex::new(r#"(?i)\bon(load|error|click|mouseover)\s*="#).expect("valid regex"),
            ),
        ]
    })
}

fn bot_user_agent_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(bot|crawler|spider|scraper|curl/|wget/|python-requests|scrapy|go-http-client)")
            .expect("valid regex")
    })
}

/// Scan a raw payload for injection signatures. Returns the name of the first
/// matching rule, for internal logging only.
pub fn find_injection_signature(payload: &str) -> Option<&'static str> {
    injection_signatures()
        .iter()
        .find(|(_, pattern)| pattern.is_match(payload))
        .map(|(name, _)| *name)
}

/// Whether a User-Agent header value matches a known crawler/bot pattern.
pub fn is_suspicious_user_agent(user_agent: &str) -> bool {
    bot_user_agent_pattern().is_match(user_agent)
}
