use super::events::{media_kind, quoted_of, text_of, unwrap_message};
use super::payload::build_message;
use super::qr::{generate_qr_image, generate_qr_terminal};
use super::queries::{changed_avatar, network_checks, phone_digits};
use super::sent::SentIds;
use super::WhatsAppTransport;
use meow_core::config::WhatsAppConfig;
use meow_core::event::MediaKind;
use meow_core::jid::Jid;
use meow_core::message::{OutboundPayload, PollSpec, QuoteRef, UploadedMedia};
use meow_core::traits::Transport;
use waproto::whatsapp::Message;

fn text(body: &str) -> Message {
    Message {
        conversation: Some(body.to_string()),
        ..Default::default()
    }
}

#[test]
fn test_generate_qr_terminal() {
    let qr = generate_qr_terminal("2@abc,def,ghi").unwrap();
    assert!(!qr.is_empty());
    assert!(qr.ends_with('\n'));
    assert!(qr.chars().any(|c| c == '█' || c == '▀' || c == '▄'));
}

#[test]
fn test_generate_qr_image_is_png() {
    let png = generate_qr_image("2@abc,def,ghi").unwrap();
    assert_eq!(&png[..4], &[0x89, 0x50, 0x4E, 0x47]);
    assert_eq!(crate::mime::sniff_image_mime(&png), "image/png");
}

#[test]
fn test_plain_text_is_conversation() {
    let msg = build_message(
        "628111@s.whatsapp.net",
        OutboundPayload::Text {
            body: "hai".into(),
            quote: None,
        },
    );
    assert_eq!(msg.conversation.as_deref(), Some("hai"));
    assert!(msg.extended_text_message.is_none());
}

#[test]
fn test_quoted_text_carries_context() {
    let msg = build_message(
        "628111@s.whatsapp.net",
        OutboundPayload::Text {
            body: "Halo juga".into(),
            quote: Some(QuoteRef {
                stanza_id: "3EB0ABC".into(),
                participant: Jid::user("628111"),
                quoted_text: "halo".into(),
            }),
        },
    );
    assert!(msg.conversation.is_none());
    let ext = msg.extended_text_message.as_ref().unwrap();
    assert_eq!(ext.text.as_deref(), Some("Halo juga"));
    let ctx = ext.context_info.as_ref().unwrap();
    assert_eq!(ctx.stanza_id.as_deref(), Some("3EB0ABC"));
    assert_eq!(ctx.participant.as_deref(), Some("628111@s.whatsapp.net"));
    assert_eq!(
        ctx.quoted_message
            .as_ref()
            .and_then(|q| q.conversation.as_deref()),
        Some("halo")
    );

    // What we send is what we read back.
    let quoted = quoted_of(&msg).unwrap();
    assert_eq!(quoted.id.as_deref(), Some("3EB0ABC"));
    assert_eq!(quoted.sender, Some(Jid::user("628111")));
    assert_eq!(quoted.body, "halo");
}

#[test]
fn test_poll_creation_has_secret_and_options() {
    let poll = PollSpec::new(
        "Apakah kalian suka meow?",
        vec!["Suka".into(), "Tidak Suka".into()],
        1,
    )
    .unwrap();
    let msg = build_message("628111@s.whatsapp.net", OutboundPayload::Poll(poll));
    let creation = msg.poll_creation_message.as_ref().unwrap();
    assert_eq!(creation.name.as_deref(), Some("Apakah kalian suka meow?"));
    assert_eq!(creation.selectable_options_count, Some(1));
    let names: Vec<_> = creation
        .options
        .iter()
        .map(|o| o.option_name.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["Suka", "Tidak Suka"]);
    let secret = msg
        .message_context_info
        .as_ref()
        .and_then(|c| c.message_secret.as_ref())
        .unwrap();
    assert_eq!(secret.len(), 32);
}

#[test]
fn test_reaction_and_revoke() {
    let msg = build_message(
        "628111@s.whatsapp.net",
        OutboundPayload::Reaction {
            target_chat: Jid::user("628111"),
            message_id: "ABC".into(),
            from_me: true,
            emoji: String::new(),
        },
    );
    let reaction = msg.reaction_message.as_ref().unwrap();
    assert_eq!(reaction.text.as_deref(), Some(""));
    let key = reaction.key.as_ref().unwrap();
    assert_eq!(key.id.as_deref(), Some("ABC"));
    assert_eq!(key.from_me, Some(true));

    let msg = build_message(
        "628111@s.whatsapp.net",
        OutboundPayload::Revoke {
            message_id: "XYZ".into(),
        },
    );
    let protocol = msg.protocol_message.as_ref().unwrap();
    assert_eq!(protocol.r#type, Some(0));
    assert_eq!(
        protocol.key.as_ref().and_then(|k| k.remote_jid.as_deref()),
        Some("628111@s.whatsapp.net")
    );
}

#[test]
fn test_image_payload() {
    let msg = build_message(
        "628111@s.whatsapp.net",
        OutboundPayload::Image {
            media: UploadedMedia {
                url: "https://mmg.whatsapp.net/x".into(),
                file_length: 42,
                ..Default::default()
            },
            mime_type: "image/jpeg".into(),
            caption: String::new(),
        },
    );
    let image = msg.image_message.as_ref().unwrap();
    assert_eq!(image.mimetype.as_deref(), Some("image/jpeg"));
    assert_eq!(image.file_length, Some(42));
    assert!(image.caption.is_none());
}

#[test]
fn test_unwrap_and_read_text() {
    let mut wrapped = Message::default();
    wrapped
        .ephemeral_message
        .get_or_insert_with(Default::default)
        .message = Some(Box::new(text("halo")));
    assert_eq!(text_of(unwrap_message(&wrapped)), Some("halo"));

    assert_eq!(text_of(&Message::default()), None);
    assert_eq!(text_of(&text("")), None);
}

#[test]
fn test_media_kind_detection() {
    let mut msg = Message::default();
    assert_eq!(media_kind(&msg), None);
    msg.sticker_message = Some(Default::default());
    assert_eq!(media_kind(&msg), Some(MediaKind::Sticker));
    msg.image_message = Some(Default::default());
    assert_eq!(media_kind(&msg), Some(MediaKind::Image));
}

#[tokio::test]
async fn test_send_without_connection_fails() {
    let dir = std::env::temp_dir().join("meow-wa-test");
    let transport = WhatsAppTransport::new(WhatsAppConfig::default(), dir.join("wa.db"));
    assert!(!transport.is_connected().await);
    let err = transport
        .send_message(
            &Jid::user("628111"),
            OutboundPayload::Text {
                body: "x".into(),
                quote: None,
            },
        )
        .await;
    assert!(err.is_err());
}

#[tokio::test]
async fn test_subscribe_only_once() {
    let transport =
        WhatsAppTransport::new(WhatsAppConfig::default(), std::env::temp_dir().join("wa.db"));
    assert!(transport.subscribe().await.is_ok());
    assert!(transport.subscribe().await.is_err());
}

#[tokio::test]
async fn test_pairing_channels_replay_last_qr() {
    let transport =
        WhatsAppTransport::new(WhatsAppConfig::default(), std::env::temp_dir().join("wa.db"));
    *transport.last_qr.lock().await = Some("2@qr".into());
    let (mut qr_rx, _done) = transport.pairing_channels().await;
    assert_eq!(qr_rx.recv().await.as_deref(), Some("2@qr"));
}

#[test]
fn test_sent_ids_forget_oldest_when_full() {
    let mut ids = SentIds::with_capacity(3);
    for n in 0..5 {
        ids.insert(format!("3EB0{n}"));
    }
    assert_eq!(ids.len(), 3);
    assert!(!ids.remove("3EB00"));
    assert!(!ids.remove("3EB01"));
    assert!(ids.remove("3EB04"));
    assert!(!ids.remove("3EB04"));
    assert_eq!(ids.len(), 2);
}

#[test]
fn test_sent_ids_stay_bounded_under_load() {
    let mut ids = SentIds::default();
    for n in 0..10_000 {
        ids.insert(format!("ID{n}"));
    }
    assert_eq!(ids.len(), super::sent::SENT_ID_CAPACITY);
    assert!(ids.remove("ID9999"));

    ids.insert("ID9998".into());
    assert_eq!(ids.len(), super::sent::SENT_ID_CAPACITY - 1);
}

#[test]
fn test_network_checks_keep_query_order() {
    let phones = vec!["+62 811-1".to_string(), "+15550000".to_string()];
    let found = vec![(Jid::user("628111"), true)];
    assert_eq!(phone_digits(&phones[0]), "628111");

    let checks = network_checks(&phones, &found);
    assert_eq!(checks.len(), 2);
    assert_eq!(checks[0].query, "+62 811-1");
    assert!(checks[0].is_in);
    assert_eq!(checks[0].jid, Some(Jid::user("628111")));
    assert!(!checks[1].is_in);
    assert_eq!(checks[1].jid, None);
}

#[test]
fn test_unregistered_number_keeps_jid() {
    let phones = vec!["15550000".to_string()];
    let checks = network_checks(&phones, &[(Jid::user("15550000"), false)]);
    assert!(!checks[0].is_in);
    assert!(checks[0].jid.is_some());
}

#[test]
fn test_unchanged_avatar_is_skipped() {
    assert!(changed_avatar("111".into(), "https://pps/1".into(), Some("111")).is_none());
    let fresh = changed_avatar("222".into(), "https://pps/2".into(), Some("111")).unwrap();
    assert_eq!(fresh.id, "222");
    assert_eq!(fresh.url, "https://pps/2");
    assert!(changed_avatar("333".into(), "u".into(), None).is_some());
}

#[tokio::test]
async fn test_disconnect_without_session_is_ok() {
    let transport =
        WhatsAppTransport::new(WhatsAppConfig::default(), std::env::temp_dir().join("wa.db"));
    transport.disconnect().await.unwrap();
    transport.disconnect().await.unwrap();
    assert!(!transport.is_connected().await);
    assert!(transport.own_push_name().await.is_none());
}

#[tokio::test]
async fn test_queries_need_a_session() {
    let transport =
        WhatsAppTransport::new(WhatsAppConfig::default(), std::env::temp_dir().join("wa.db"));
    assert!(transport.is_on_whatsapp(&["628111".into()]).await.is_err());
    assert!(transport.joined_groups().await.is_err());
    assert!(matches!(
        transport
            .send_chat_presence(
                &Jid::user("628111"),
                meow_core::network::ChatPresence::Composing,
                meow_core::network::ChatPresenceMedia::Audio,
            )
            .await,
        Err(meow_core::error::MeowError::Unsupported(_))
    ));
}
