//! Sending commands: text, polls, fan-out, reactions, revokes, images.

use super::require_args;
use meow_channels::mime::sniff_image_mime;
use meow_core::{
    error::MeowError,
    event::MediaKind,
    jid::Jid,
    message::{OutboundPayload, PollSpec, SendReceipt},
    traits::Transport,
};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Separates recipients/question from the text/options.
const SEPARATOR: &str = "--";

fn log_sent(receipt: &SendReceipt) {
    info!(
        "Message sent (server timestamp: {}, id: {})",
        receipt.timestamp, receipt.message_id
    );
}

fn text(body: String) -> OutboundPayload {
    OutboundPayload::Text { body, quote: None }
}

/// `send <jid> <text...>`
pub(super) async fn send(transport: &dyn Transport, args: &[String]) -> Result<(), MeowError> {
    require_args(args, 2, "send <jid> <text>")?;
    let jid = Jid::parse_operator_arg(&args[0])?;
    let receipt = transport
        .send_message(&jid, text(args[1..].join(" ")))
        .await?;
    log_sent(&receipt);
    Ok(())
}

/// Parse `<jid> <max answers> <question> -- <opt> / <opt> / ...`.
pub(super) fn parse_poll_args(args: &[String]) -> Result<(Jid, PollSpec), MeowError> {
    const USAGE: &str = "sendpoll <jid> <max answers> <question> -- <option 1> / <option 2> / ...";
    require_args(args, 7, USAGE)?;
    let jid = Jid::parse_operator_arg(&args[0])?;
    let max_answers: u32 = args[1]
        .parse()
        .map_err(|_| MeowError::Usage("Number of max answers must be an integer".into()))?;

    let rest = args[2..].join(" ");
    let (question, options) = rest
        .split_once(SEPARATOR)
        .ok_or_else(|| MeowError::Usage(format!("Usage: {USAGE}")))?;
    let options = options
        .split('/')
        .map(|o| o.trim().to_string())
        .collect::<Vec<_>>();

    Ok((jid, PollSpec::new(question.trim(), options, max_answers)?))
}

pub(super) async fn send_poll(transport: &dyn Transport, args: &[String]) -> Result<(), MeowError> {
    let (jid, poll) = parse_poll_args(args)?;
    let receipt = transport
        .send_message(&jid, OutboundPayload::Poll(poll))
        .await?;
    log_sent(&receipt);
    Ok(())
}

/// Parse `<jids...> -- <text>`.
pub(super) fn parse_multisend_args(args: &[String]) -> Result<(Vec<Jid>, String), MeowError> {
    const USAGE: &str = "multisend <jids...> -- <text>";
    require_args(args, 3, USAGE)?;
    let split = args
        .iter()
        .position(|a| a == SEPARATOR)
        .ok_or_else(|| MeowError::Usage(format!("Usage: {USAGE}")))?;

    let recipients = args[..split]
        .iter()
        .map(|a| Jid::parse_operator_arg(a))
        .collect::<Result<Vec<_>, _>>()?;
    let body = args[split + 1..].join(" ");
    if recipients.is_empty() || body.is_empty() {
        return Err(MeowError::Usage(format!("Usage: {USAGE}")));
    }
    Ok((recipients, body))
}

/// `multisend <jids...> -- <text>`
///
/// One concurrent send per recipient; each outcome is logged on its own and
/// a failure never stops the others.
pub(super) async fn multisend(
    transport: &Arc<dyn Transport>,
    args: &[String],
) -> Result<(), MeowError> {
    let (recipients, body) = parse_multisend_args(args)?;
    info!("Sending message to {} recipients", recipients.len());

    let mut sends = JoinSet::new();
    for jid in recipients {
        let transport = transport.clone();
        let body = body.clone();
        sends.spawn(async move {
            let result = transport.send_message(&jid, text(body)).await;
            (jid, result)
        });
    }

    while let Some(joined) = sends.join_next().await {
        match joined {
            Ok((jid, Ok(receipt))) => info!(
                "Message sent to {jid} (server timestamp: {})",
                receipt.timestamp
            ),
            Ok((jid, Err(e))) => error!("Error sending message to {jid}: {e}"),
            Err(e) => error!("send task failed: {e}"),
        }
    }
    Ok(())
}

/// Parsed `react` arguments.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct Reaction {
    pub chat: Jid,
    pub message_id: String,
    pub from_me: bool,
    pub emoji: String,
}

/// Parse `<jid> <[me:]message id> <reaction|remove>`.
pub(super) fn parse_react_args(args: &[String]) -> Result<Reaction, MeowError> {
    require_args(args, 3, "react <jid> <message ID> <reaction>")?;
    let chat = Jid::parse_operator_arg(&args[0])?;
    let (message_id, from_me) = match args[1].strip_prefix("me:") {
        Some(id) => (id.to_string(), true),
        None => (args[1].clone(), false),
    };
    let emoji = if args[2] == "remove" {
        String::new()
    } else {
        args[2].clone()
    };
    Ok(Reaction {
        chat,
        message_id,
        from_me,
        emoji,
    })
}

pub(super) async fn react(transport: &dyn Transport, args: &[String]) -> Result<(), MeowError> {
    let reaction = parse_react_args(args)?;
    let receipt = transport
        .send_message(
            &reaction.chat,
            OutboundPayload::Reaction {
                target_chat: reaction.chat.clone(),
                message_id: reaction.message_id,
                from_me: reaction.from_me,
                emoji: reaction.emoji,
            },
        )
        .await?;
    log_sent(&receipt);
    Ok(())
}

/// `revoke <jid> <message id>`
pub(super) async fn revoke(transport: &dyn Transport, args: &[String]) -> Result<(), MeowError> {
    require_args(args, 2, "revoke <jid> <message ID>")?;
    let jid = Jid::parse_operator_arg(&args[0])?;
    let receipt = transport
        .send_message(
            &jid,
            OutboundPayload::Revoke {
                message_id: args[1].clone(),
            },
        )
        .await?;
    log_sent(&receipt);
    Ok(())
}

/// `sendimg <jid> <path> [caption...]`
pub(super) async fn send_image(transport: &dyn Transport, args: &[String]) -> Result<(), MeowError> {
    require_args(args, 2, "sendimg <jid> <image path> [caption]")?;
    let jid = Jid::parse_operator_arg(&args[0])?;
    let data = tokio::fs::read(&args[1]).await?;
    let mime_type = sniff_image_mime(&data).to_string();

    let media = transport.upload(data, MediaKind::Image).await?;
    let receipt = transport
        .send_message(
            &jid,
            OutboundPayload::Image {
                media,
                mime_type,
                caption: args[2..].join(" "),
            },
        )
        .await?;
    log_sent(&receipt);
    Ok(())
}
