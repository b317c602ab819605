//! Outbound payloads and the reply formatter.

use crate::error::MeowError;
use crate::event::TextMessage;
use crate::jid::Jid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference rendered by clients as "in reply to".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRef {
    /// Id of the quoted message.
    pub stanza_id: String,
    /// Author of the quoted message.
    pub participant: Jid,
    /// Text of the quoted message, for the client-side preview bubble.
    pub quoted_text: String,
}

/// A poll definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSpec {
    pub question: String,
    pub options: Vec<String>,
    /// How many options one voter may select. `0` means any number.
    pub selectable_count: u32,
}

impl PollSpec {
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        selectable_count: u32,
    ) -> Result<Self, MeowError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(MeowError::Usage("poll question must not be empty".into()));
        }
        if options.len() < 2 || options.iter().any(|o| o.is_empty()) {
            return Err(MeowError::Usage(
                "poll needs at least two non-empty options".into(),
            ));
        }
        if selectable_count as usize > options.len() {
            return Err(MeowError::Usage(format!(
                "max answers ({selectable_count}) exceeds option count ({})",
                options.len()
            )));
        }
        Ok(Self {
            question,
            options,
            selectable_count,
        })
    }
}

/// Body of a reply produced by the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplyBody {
    Text(String),
    Poll(PollSpec),
}

/// A reply addressed to a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundReply {
    pub chat: Jid,
    pub body: ReplyBody,
    pub quote: Option<QuoteRef>,
}

impl OutboundReply {
    pub fn into_payload(self) -> OutboundPayload {
        match self.body {
            ReplyBody::Text(body) => OutboundPayload::Text {
                body,
                quote: self.quote,
            },
            ReplyBody::Poll(poll) => OutboundPayload::Poll(poll),
        }
    }
}

/// Build the reply to `trigger`.
///
/// Text replies always quote the trigger; polls are top-level.
pub fn format_reply(trigger: &TextMessage, body: ReplyBody) -> OutboundReply {
    let quote = match body {
        ReplyBody::Text(_) => Some(QuoteRef {
            stanza_id: trigger.id.clone(),
            participant: trigger.sender.clone(),
            quoted_text: trigger.body.clone(),
        }),
        ReplyBody::Poll(_) => None,
    };
    OutboundReply {
        chat: trigger.chat.clone(),
        body,
        quote,
    }
}

/// Result of a media upload, as needed to reference the blob in a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedMedia {
    pub url: String,
    pub direct_path: String,
    pub media_key: Vec<u8>,
    pub file_enc_sha256: Vec<u8>,
    pub file_sha256: Vec<u8>,
    pub file_length: u64,
}

/// Anything the transport can put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundPayload {
    Text {
        body: String,
        quote: Option<QuoteRef>,
    },
    Poll(PollSpec),
    /// An empty `emoji` removes an earlier reaction.
    Reaction {
        target_chat: Jid,
        message_id: String,
        from_me: bool,
        emoji: String,
    },
    Revoke {
        message_id: String,
    },
    Image {
        media: UploadedMedia,
        mime_type: String,
        caption: String,
    },
}

/// Server acknowledgement of a sent message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub message_id: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::QuotedMessage;

    fn trigger() -> TextMessage {
        TextMessage {
            id: "3EB0ABC".into(),
            sender: Jid::user("628111"),
            chat: Jid::user("628111"),
            from_self: false,
            is_group: false,
            media: None,
            body: "halo".into(),
            quoted: Some(QuotedMessage {
                id: Some("OTHER".into()),
                sender: Some(Jid::user("628222")),
                body: "earlier".into(),
            }),
        }
    }

    #[test]
    fn test_text_reply_quotes_trigger() {
        let reply = format_reply(&trigger(), ReplyBody::Text("hi".into()));
        let quote = reply.quote.expect("text replies quote");
        assert_eq!(quote.stanza_id, "3EB0ABC");
        assert_ne!(quote.stanza_id, "OTHER");
        assert_eq!(quote.participant, Jid::user("628111"));
        assert_eq!(reply.chat, Jid::user("628111"));
    }

    #[test]
    fn test_poll_reply_is_top_level() {
        let poll = PollSpec::new("q?", vec!["a".into(), "b".into()], 1).unwrap();
        let reply = format_reply(&trigger(), ReplyBody::Poll(poll.clone()));
        assert!(reply.quote.is_none());
        assert_eq!(reply.into_payload(), OutboundPayload::Poll(poll));
    }

    #[test]
    fn test_poll_spec_validation() {
        assert!(PollSpec::new("q", vec!["only".into()], 1).is_err());
        assert!(PollSpec::new("q", vec!["a".into(), "".into()], 1).is_err());
        assert!(PollSpec::new("q", vec!["a".into(), "b".into()], 3).is_err());
        assert!(PollSpec::new(" ", vec!["a".into(), "b".into()], 1).is_err());
        assert!(PollSpec::new("q", vec!["a".into(), "b".into()], 0).is_ok());
    }
}
