//! Canned conversational replies
//!
//! A small ordered table of regex patterns with reply templates. Templates may
//! reference capture groups as `$1`, `$name`, etc. The first matching pattern
//! wins; anything else gets the default reply.

use std::sync::LazyLock;

use regex::Regex;

use super::Responder;

/// Reply used when no canned pattern matches
pub const DEFAULT_REPLY: &str = "I'm not sure I understand. Could you say that another way?";

static CANNED_REPLIES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)^\s*my name is (?P<name>\w+)", "Nice to meet you, $name."),
        (r"(?i)^\s*what(?:'s| is) your name", "My name is Emma."),
        (r"(?i)^\s*who are you", "I'm Emma, your assistant."),
        (r"(?i)^\s*how are you", "I'm doing well, thank you for asking."),
        (r"(?i)^\s*(?:thanks|thank you)\b", "You're welcome."),
        (r"(?i)^\s*i (?:like|love) (?P<thing>.+?)[.!]*$", "What do you like most about $thing?"),
        (r"(?i)^\s*(?:bye|goodbye|see you)\b", "Goodbye! Talk to you soon."),
    ]
    .into_iter()
    .map(|(pattern, reply)| (Regex::new(pattern).unwrap(), reply))
    .collect()
});

/// Pattern-table responder
#[derive(Debug, Default)]
pub struct CannedResponder;

impl CannedResponder {
    pub fn new() -> Self {
        Self
    }
}

impl Responder for CannedResponder {
    fn reply(&mut self, text: &str) -> String {
        CANNED_REPLIES
            .iter()
            .find_map(|(pattern, template)| {
                pattern.captures(text).map(|caps| {
                    let mut reply = String::new();
                    caps.expand(template, &mut reply);
                    reply
                })
            })
            .unwrap_or_else(|| DEFAULT_REPLY.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_reply() {
        let mut responder = CannedResponder::new();
        assert_eq!(responder.reply("who are you"), "I'm Emma, your assistant.");
    }

    #[test]
    fn test_capture_substitution() {
        let mut responder = CannedResponder::new();
        assert_eq!(responder.reply("My name is Sam"), "Nice to meet you, Sam.");
        assert_eq!(
            responder.reply("I love rust!"),
            "What do you like most about rust?"
        );
    }

    #[test]
    fn test_default_reply() {
        let mut responder = CannedResponder::new();
        assert_eq!(responder.reply("qwerty"), DEFAULT_REPLY);
        assert_eq!(responder.reply(""), DEFAULT_REPLY);
    }
}
