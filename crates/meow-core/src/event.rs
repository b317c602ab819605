//! Inbound events emitted by a transport.

use crate::jid::Jid;
use crate::network::PatchName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything a transport can report to the gateway.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    TextMessage(TextMessage),
    /// Raw history-sync payload, persisted as-is.
    HistorySync(serde_json::Value),
    AppStateSyncComplete {
        name: PatchName,
    },
    ConnectionEstablished,
    PushNameChanged {
        push_name: String,
    },
    /// Another session took over this account.
    StreamReplaced,
    /// A keepalive ping failed. `error_count` is the transport's own count,
    /// informational only.
    KeepAliveTimeout {
        error_count: u32,
    },
    KeepAliveRestored,
    Disconnected,
    LoggedOut {
        reason: String,
    },
}

impl InboundEvent {
    /// Short variant name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TextMessage(_) => "message",
            Self::HistorySync(_) => "history_sync",
            Self::AppStateSyncComplete { .. } => "app_state_sync_complete",
            Self::ConnectionEstablished => "connected",
            Self::PushNameChanged { .. } => "push_name_changed",
            Self::StreamReplaced => "stream_replaced",
            Self::KeepAliveTimeout { .. } => "keepalive_timeout",
            Self::KeepAliveRestored => "keepalive_restored",
            Self::Disconnected => "disconnected",
            Self::LoggedOut { .. } => "logged_out",
        }
    }
}

/// Kind of media attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Document,
    Sticker,
    Other(String),
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => f.write_str("image"),
            Self::Video => f.write_str("video"),
            Self::Audio => f.write_str("audio"),
            Self::Document => f.write_str("document"),
            Self::Sticker => f.write_str("sticker"),
            Self::Other(kind) => f.write_str(kind),
        }
    }
}

/// A chat message as received. Never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextMessage {
    pub id: String,
    pub sender: Jid,
    pub chat: Jid,
    pub from_self: bool,
    pub is_group: bool,
    pub media: Option<MediaKind>,
    /// The message's own text. Empty for media without caption.
    pub body: String,
    /// The message this one replies to, if any.
    pub quoted: Option<QuotedMessage>,
}

/// The parent of a reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotedMessage {
    pub id: Option<String>,
    pub sender: Option<Jid>,
    /// Parent text. Empty when the parent carried no text.
    pub body: String,
}

impl TextMessage {
    pub fn has_media(&self) -> bool {
        self.media.is_some()
    }

    /// Text of the quoted parent, empty when there is none.
    pub fn quoted_body(&self) -> &str {
        self.quoted.as_ref().map(|q| q.body.as_str()).unwrap_or("")
    }
}
