//! OpenAI-compatible text completion provider.
//!
//! Talks to the legacy `/completions` endpoint: a raw prompt in, one or more
//! text choices out. Any server exposing the same shape works.

use async_trait::async_trait;
use meow_core::{context::CompletionRequest, error::MeowError, traits::Provider};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// OpenAI-compatible completion provider.
pub struct OpenAiCompletionProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompletionProvider {
    /// Create from config values.
    pub fn from_config(base_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
pub(crate) struct TextCompletionRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub stop: &'a [&'a str],
}

impl<'a> TextCompletionRequest<'a> {
    pub(crate) fn new(model: &'a str, request: &'a CompletionRequest) -> Self {
        let p = &request.params;
        Self {
            model,
            prompt: &request.prompt,
            temperature: p.temperature,
            max_tokens: p.max_tokens,
            top_p: p.top_p,
            frequency_penalty: p.frequency_penalty,
            presence_penalty: p.presence_penalty,
            stop: p.stop,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct TextCompletionResponse {
    pub choices: Option<Vec<TextChoice>>,
    pub usage: Option<CompletionUsage>,
}

#[derive(Deserialize)]
pub(crate) struct TextChoice {
    pub text: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct CompletionUsage {
    pub total_tokens: Option<u64>,
}

/// Pull the choice texts out of a response, in order.
///
/// A response with no choices is an error: the caller cannot tell an empty
/// completion from a failed one otherwise.
pub(crate) fn choice_texts(resp: TextCompletionResponse) -> Result<Vec<String>, MeowError> {
    let choices = resp.choices.unwrap_or_default();
    if choices.is_empty() {
        return Err(MeowError::Provider("openai: response had no choices".into()));
    }
    Ok(choices
        .into_iter()
        .map(|c| c.text.unwrap_or_default())
        .collect())
}

#[async_trait]
impl Provider for OpenAiCompletionProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Vec<String>, MeowError> {
        let start = Instant::now();
        let body = TextCompletionRequest::new(&self.model, request);

        let url = self.endpoint("completions");
        debug!("openai: POST {url} model={}", self.model);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| MeowError::Provider(format!("openai request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(MeowError::Provider(format!(
                "openai returned {status}: {text}"
            )));
        }

        let parsed: TextCompletionResponse = resp
            .json()
            .await
            .map_err(|e| MeowError::Provider(format!("openai: failed to parse response: {e}")))?;

        let tokens = parsed.usage.as_ref().and_then(|u| u.total_tokens);
        debug!(
            "openai: completion took {}ms, tokens={tokens:?}",
            start.elapsed().as_millis()
        );

        choice_texts(parsed)
    }

    async fn is_available(&self) -> bool {
        if self.api_key.is_empty() {
            warn!("openai: no API key configured");
            return false;
        }
        let url = self.endpoint("models");
        match self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!("openai not available: {e}");
                false
            }
        }
    }
}
