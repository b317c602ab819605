//! Message routing: decide the single action for a text message, then run it.

use super::diagnostics::run_diagnostic;
use super::keywords::{classify, Intent};
use super::Gateway;
use meow_core::{
    context::{clean_completion, CompletionRequest},
    event::TextMessage,
    message::{format_reply, PollSpec, ReplyBody},
    network::{ChatPresence, ChatPresenceMedia},
};
use tracing::{debug, error, info, warn};

/// The one action a text message leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    Ignore,
    /// Owner-only diagnostic (`!status`, `!speedtest`).
    Diagnostic(Intent),
    /// Canned reply or poll.
    Keyword(Intent),
    /// Ask the completion provider.
    Complete,
    UnsupportedMedia,
}

/// Decide what to do with `msg`. First matching rule wins:
///
/// 1. own text: diagnostics, nothing else
/// 2. direct text without a quoted parent: classify the body
/// 3. direct reply to a quoted text: classify the quoted text
/// 4. direct media: unsupported-media notice
/// 5. everything else, groups included: ignore
pub(crate) fn route(msg: &TextMessage) -> Route {
    if msg.from_self {
        if !msg.has_media() && !msg.body.is_empty() {
            let intent = classify(&msg.body);
            if matches!(intent, Intent::StatusCommand | Intent::SpeedtestCommand) {
                return Route::Diagnostic(intent);
            }
        }
        return Route::Ignore;
    }
    if msg.is_group {
        return Route::Ignore;
    }
    if msg.has_media() {
        return Route::UnsupportedMedia;
    }

    let subject = match msg.quoted_body() {
        "" if msg.body.is_empty() => return Route::Ignore,
        "" => msg.body.as_str(),
        quoted => quoted,
    };
    match classify(subject) {
        intent @ (Intent::Profanity | Intent::NameMention | Intent::Greeting | Intent::PollTrigger) => {
            Route::Keyword(intent)
        }
        _ => Route::Complete,
    }
}

impl Gateway {
    /// Route one message and carry out the result. Failures are logged and
    /// the message is dropped.
    pub(crate) async fn handle_message(&self, msg: &TextMessage) {
        let route = route(msg);
        debug!("message {} from {} -> {route:?}", msg.id, msg.sender);

        let body = match route {
            Route::Ignore => return,
            Route::Diagnostic(intent) => self.run_self_command(intent).await,
            Route::Keyword(intent) => self.canned_reply(intent),
            Route::Complete => self.completion_reply(msg).await,
            Route::UnsupportedMedia => Some(ReplyBody::Text(self.replies.unsupported_media.clone())),
        };

        if let Some(body) = body {
            self.send_reply(msg, body).await;
        }
    }

    async fn run_self_command(&self, intent: Intent) -> Option<ReplyBody> {
        let argv = match intent {
            Intent::SpeedtestCommand => &self.diagnostics.speedtest_command,
            _ => &self.diagnostics.status_command,
        };
        match run_diagnostic(argv).await {
            Ok(output) if output.trim().is_empty() => {
                warn!("diagnostic produced no output");
                None
            }
            Ok(output) => Some(ReplyBody::Text(output)),
            Err(e) => {
                error!("{e}");
                None
            }
        }
    }

    fn canned_reply(&self, intent: Intent) -> Option<ReplyBody> {
        let text = match intent {
            Intent::Profanity => &self.replies.profanity,
            Intent::NameMention => &self.replies.name_mention,
            Intent::Greeting => &self.replies.greeting,
            Intent::PollTrigger => {
                return match PollSpec::new(
                    self.replies.poll_question.clone(),
                    self.replies.poll_options.clone(),
                    self.replies.poll_max_answers,
                ) {
                    Ok(poll) => Some(ReplyBody::Poll(poll)),
                    Err(e) => {
                        error!("configured poll is invalid: {e}");
                        None
                    }
                };
            }
            _ => return None,
        };
        Some(ReplyBody::Text(text.clone()))
    }

    async fn completion_reply(&self, msg: &TextMessage) -> Option<ReplyBody> {
        if let Err(e) = self
            .transport
            .send_chat_presence(&msg.chat, ChatPresence::Composing, ChatPresenceMedia::Text)
            .await
        {
            debug!("typing indicator for {} not sent: {e}", msg.chat);
        }

        let request = CompletionRequest::for_message(msg);
        match self.provider.complete(&request).await {
            Ok(choices) => {
                let text = choices.first().and_then(|c| clean_completion(c));
                if text.is_none() {
                    warn!("{} returned an empty completion", self.provider.name());
                }
                text.map(ReplyBody::Text)
            }
            Err(e) => {
                error!("completion failed: {e}");
                None
            }
        }
    }

    async fn send_reply(&self, trigger: &TextMessage, body: ReplyBody) {
        let reply = format_reply(trigger, body);
        let chat = reply.chat.clone();
        match self
            .transport
            .send_message(&chat, reply.into_payload())
            .await
        {
            Ok(receipt) => info!(
                "Message sent to {chat} (server timestamp: {})",
                receipt.timestamp
            ),
            Err(e) => error!("Error sending reply to {chat}: {e}"),
        }
    }
}
