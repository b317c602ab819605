//! Incoming WhatsApp message translation: unwrapping, text, quotes, media.

use meow_core::event::{MediaKind, QuotedMessage, TextMessage};
use meow_core::jid::Jid;
use tracing::debug;
use waproto::whatsapp::Message;

/// Convert a library JID into the domain JID, dropping the device part.
pub(super) fn to_jid(jid: &wacore_binary::jid::Jid) -> Jid {
    Jid::new(jid.user.clone(), jid.server.to_string())
}

/// Translate a received message. Returns `None` for messages that carry
/// neither text nor media (receipts, reactions, protocol messages).
pub(super) fn translate_message(
    msg: &Message,
    info: &wacore::types::message::MessageInfo,
) -> Option<TextMessage> {
    let inner = unwrap_message(msg);
    let body = text_of(inner).unwrap_or("").to_string();
    let media = media_kind(inner);

    if body.is_empty() && media.is_none() {
        debug!("WA msg {} has no text or media, skipping", info.id);
        return None;
    }

    debug!(
        "WA msg: is_group={}, is_from_me={}, sender={}, chat={}",
        info.source.is_group, info.source.is_from_me, info.source.sender.user, info.source.chat.user,
    );

    Some(TextMessage {
        id: info.id.clone(),
        sender: to_jid(&info.source.sender),
        chat: to_jid(&info.source.chat),
        from_self: info.source.is_from_me,
        is_group: info.source.is_group,
        media,
        body,
        quoted: quoted_of(inner),
    })
}

/// Unwrap nested wrappers (device_sent, ephemeral, view_once).
pub(super) fn unwrap_message(msg: &Message) -> &Message {
    msg.device_sent_message
        .as_ref()
        .and_then(|d| d.message.as_deref())
        .or_else(|| {
            msg.ephemeral_message
                .as_ref()
                .and_then(|e| e.message.as_deref())
        })
        .or_else(|| {
            msg.view_once_message
                .as_ref()
                .and_then(|v| v.message.as_deref())
        })
        .unwrap_or(msg)
}

/// Plain or extended text of a message.
pub(super) fn text_of(msg: &Message) -> Option<&str> {
    msg.conversation
        .as_deref()
        .or_else(|| {
            msg.extended_text_message
                .as_ref()
                .and_then(|e| e.text.as_deref())
        })
        .filter(|t| !t.is_empty())
}

pub(super) fn media_kind(msg: &Message) -> Option<MediaKind> {
    if msg.image_message.is_some() {
        Some(MediaKind::Image)
    } else if msg.video_message.is_some() {
        Some(MediaKind::Video)
    } else if msg.audio_message.is_some() {
        Some(MediaKind::Audio)
    } else if msg.document_message.is_some() {
        Some(MediaKind::Document)
    } else if msg.sticker_message.is_some() {
        Some(MediaKind::Sticker)
    } else {
        None
    }
}

/// The parent this message replies to, from its extended-text context.
pub(super) fn quoted_of(msg: &Message) -> Option<QuotedMessage> {
    let ctx = msg
        .extended_text_message
        .as_ref()
        .and_then(|e| e.context_info.as_ref())?;
    let parent = ctx.quoted_message.as_deref()?;

    Some(QuotedMessage {
        id: ctx.stanza_id.clone(),
        sender: ctx
            .participant
            .as_deref()
            .and_then(|p| p.parse::<Jid>().ok()),
        body: text_of(unwrap_message(parent)).unwrap_or("").to_string(),
    })
}
