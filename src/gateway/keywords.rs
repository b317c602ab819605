//! Keyword classifier: whole-message matching against fixed word lists.
//!
//! A message matches only when its entire trimmed, lowercased text equals a
//! list entry. A keyword embedded in a longer sentence is not a match.

use super::keywords_data::*;

/// What a short message asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Profanity,
    NameMention,
    Greeting,
    PollTrigger,
    StatusCommand,
    SpeedtestCommand,
    None,
}

/// Classify a message body. First matching list wins, in the order
/// profanity, name, greeting, poll trigger, diagnostics.
pub fn classify(body: &str) -> Intent {
    let normalized = body.trim().to_lowercase();
    let text = normalized.as_str();

    if PROFANITY_KW.contains(&text) {
        Intent::Profanity
    } else if NAME_KW.contains(&text) {
        Intent::NameMention
    } else if GREETING_KW.contains(&text) {
        Intent::Greeting
    } else if text == POLL_TRIGGER {
        Intent::PollTrigger
    } else if text == STATUS_COMMAND {
        Intent::StatusCommand
    } else if text == SPEEDTEST_COMMAND {
        Intent::SpeedtestCommand
    } else {
        Intent::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matches() {
        assert_eq!(classify("halo"), Intent::Greeting);
        assert_eq!(classify("HALO"), Intent::Greeting);
        assert_eq!(classify("  Ping "), Intent::Greeting);
        assert_eq!(classify("ozi saputra"), Intent::NameMention);
        assert_eq!(classify("bangsat"), Intent::Profanity);
        assert_eq!(classify("Meow"), Intent::PollTrigger);
        assert_eq!(classify("!STATUS"), Intent::StatusCommand);
        assert_eq!(classify("!speedtest"), Intent::SpeedtestCommand);
    }

    #[test]
    fn test_substring_never_matches() {
        assert_eq!(classify("dasar bangsat kamu"), Intent::None);
        assert_eq!(classify("halo apa kabar"), Intent::None);
        assert_eq!(classify("meow meow"), Intent::None);
        assert_eq!(classify("!status please"), Intent::None);
        assert_eq!(classify(""), Intent::None);
    }

    #[test]
    fn test_every_profanity_term_matches() {
        for term in PROFANITY_KW {
            assert_eq!(classify(term), Intent::Profanity, "{term}");
            assert_eq!(classify(&term.to_uppercase()), Intent::Profanity, "{term}");
        }
    }

    #[test]
    fn test_lists_do_not_overlap() {
        for term in NAME_KW.iter().chain(GREETING_KW) {
            assert!(!PROFANITY_KW.contains(term), "{term}");
        }
        for term in GREETING_KW {
            assert!(!NAME_KW.contains(term), "{term}");
        }
    }

    #[test]
    fn test_classify_is_pure() {
        for input in ["halo", "kenapa langit biru?", "tai", "meow", "bang"] {
            assert_eq!(classify(input), classify(input));
        }
    }
}
