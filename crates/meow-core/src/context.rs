//! Completion requests: the dialogue prompt template and fixed sampling.
//!
//! The completion model is steered as a two-party dialogue between "You"
//! (the chat partner) and "Friend" (the relay). A quoted parent supplies one
//! earlier turn; nothing else is remembered between messages.

use crate::event::TextMessage;
use serde::Serialize;

/// Speaker label for the person writing to the relay.
pub const USER_LABEL: &str = "You";

/// Speaker label the model completes.
pub const RELAY_LABEL: &str = "Friend";

/// Sampling parameters sent with every completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub max_tokens: u32,
    pub stop: &'static [&'static str],
}

impl SamplingParams {
    /// The only parameter set the relay uses; not configurable per call.
    pub const FIXED: SamplingParams = SamplingParams {
        temperature: 0.9,
        top_p: 0.3,
        frequency_penalty: 0.8,
        presence_penalty: 0.0,
        max_tokens: 512,
        stop: &["You:"],
    };
}

/// A prompt plus its sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub params: SamplingParams,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            params: SamplingParams::FIXED,
        }
    }

    /// Request for a message, threading its quoted parent if present.
    pub fn for_message(message: &TextMessage) -> Self {
        Self::new(build_prompt(message))
    }
}

/// Build the dialogue prompt for `current`.
///
/// A parent with no text counts as no parent.
pub fn build_prompt(current: &TextMessage) -> String {
    build_dialogue_prompt(current.quoted_body(), &current.body)
}

/// Template behind [`build_prompt`], usable without a full message.
pub fn build_dialogue_prompt(parent: &str, body: &str) -> String {
    if parent.is_empty() {
        format!("{USER_LABEL}: {body}\n{RELAY_LABEL}: ")
    } else {
        format!("{RELAY_LABEL}: {parent}\n{USER_LABEL}: {body}\n{RELAY_LABEL}: ")
    }
}

/// Strip the separator the model emits before its turn.
///
/// Completions usually start with whitespace after the trailing `Friend: `.
/// Surrounding whitespace is removed, so a completion without it is kept
/// intact. Returns `None` when nothing printable is left.
pub fn clean_completion(text: &str) -> Option<String> {
    let cleaned = text.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
