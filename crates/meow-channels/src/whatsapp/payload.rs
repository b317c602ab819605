//! Outbound payload to protobuf conversion.

use chrono::Utc;
use meow_core::message::{OutboundPayload, PollSpec, QuoteRef};
use waproto::whatsapp::Message;

/// `ProtocolMessage.Type.REVOKE`.
const PROTOCOL_REVOKE: i32 = 0;

/// Length of the per-poll message secret used to encrypt votes.
const POLL_SECRET_LEN: usize = 32;

/// Build the wire message for `payload` sent into `chat`.
pub(super) fn build_message(chat: &str, payload: OutboundPayload) -> Message {
    match payload {
        OutboundPayload::Text { body, quote: None } => Message {
            conversation: Some(body),
            ..Default::default()
        },
        OutboundPayload::Text {
            body,
            quote: Some(quote),
        } => quoted_text(body, quote),
        OutboundPayload::Poll(poll) => poll_creation(poll),
        OutboundPayload::Reaction {
            target_chat,
            message_id,
            from_me,
            emoji,
        } => {
            let mut msg = Message::default();
            let reaction = msg.reaction_message.get_or_insert_with(Default::default);
            let key = reaction.key.get_or_insert_with(Default::default);
            key.remote_jid = Some(target_chat.to_string());
            key.from_me = Some(from_me);
            key.id = Some(message_id);
            reaction.text = Some(emoji);
            reaction.sender_timestamp_ms = Some(Utc::now().timestamp_millis());
            msg
        }
        OutboundPayload::Revoke { message_id } => {
            let mut msg = Message::default();
            let protocol = msg.protocol_message.get_or_insert_with(Default::default);
            let key = protocol.key.get_or_insert_with(Default::default);
            key.remote_jid = Some(chat.to_string());
            key.from_me = Some(true);
            key.id = Some(message_id);
            protocol.r#type = Some(PROTOCOL_REVOKE);
            msg
        }
        OutboundPayload::Image {
            media,
            mime_type,
            caption,
        } => Message {
            image_message: Some(Box::new(waproto::whatsapp::message::ImageMessage {
                mimetype: Some(mime_type),
                caption: (!caption.is_empty()).then_some(caption),
                url: Some(media.url),
                direct_path: Some(media.direct_path),
                media_key: Some(media.media_key),
                file_enc_sha256: Some(media.file_enc_sha256),
                file_sha256: Some(media.file_sha256),
                file_length: Some(media.file_length),
                ..Default::default()
            })),
            ..Default::default()
        },
    }
}

fn quoted_text(body: String, quote: QuoteRef) -> Message {
    let mut msg = Message::default();
    let ext = msg
        .extended_text_message
        .get_or_insert_with(Default::default);
    ext.text = Some(body);

    let ctx = ext.context_info.get_or_insert_with(Default::default);
    ctx.stanza_id = Some(quote.stanza_id);
    ctx.participant = Some(quote.participant.to_string());
    ctx.quoted_message
        .get_or_insert_with(Default::default)
        .conversation = Some(quote.quoted_text);
    msg
}

fn poll_creation(poll: PollSpec) -> Message {
    let mut msg = Message::default();

    let creation = msg.poll_creation_message.get_or_insert_with(Default::default);
    creation.name = Some(poll.question);
    creation.selectable_options_count = Some(poll.selectable_count);
    creation
        .options
        .resize_with(poll.options.len(), Default::default);
    for (slot, name) in creation.options.iter_mut().zip(poll.options) {
        slot.option_name = Some(name);
    }

    let secret: [u8; POLL_SECRET_LEN] = rand::random();
    msg.message_context_info
        .get_or_insert_with(Default::default)
        .message_secret = Some(secret.to_vec());
    msg
}
