//! Operator commands typed on stdin.
//!
//! One line is one command: a case-insensitive verb followed by
//! whitespace-separated arguments. Results and errors go to the log.

mod account;
mod groups;
mod messaging;


use crate::gateway::Supervisor;
use meow_core::{error::MeowError, traits::Transport};
use std::sync::Arc;
use tracing::warn;

/// What a command can reach.
#[derive(Clone)]
pub struct CommandContext {
    pub transport: Arc<dyn Transport>,
    pub supervisor: Arc<Supervisor>,
}

/// A parsed operator line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorCommand {
    /// Lowercased verb.
    pub verb: String,
    pub args: Vec<String>,
}

impl OperatorCommand {
    /// Parse one line. Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next()?.to_lowercase();
        Some(Self {
            verb,
            args: tokens.map(str::to_string).collect(),
        })
    }
}

/// Fail with a usage message unless at least `min` arguments were given.
pub(crate) fn require_args(args: &[String], min: usize, usage: &str) -> Result<(), MeowError> {
    if args.len() < min {
        Err(MeowError::Usage(format!("Usage: {usage}")))
    } else {
        Ok(())
    }
}

/// Run one command to completion.
pub async fn dispatch(cmd: &OperatorCommand, ctx: &CommandContext) -> Result<(), MeowError> {
    let args = cmd.args.as_slice();
    let transport = ctx.transport.as_ref();
    match cmd.verb.as_str() {
        "reconnect" => ctx.supervisor.reconnect().await,
        "logout" => account::logout(transport).await,
        "appstate" => account::app_state(transport, args).await,
        "request-appstate-key" => account::request_app_state_keys(transport, args).await,
        "checkuser" => account::check_user(transport, args).await,
        "checkupdate" => account::check_update(transport).await,
        "subscribepresence" => account::subscribe_presence(transport, args).await,
        "presence" => account::presence(transport, args).await,
        "chatpresence" => account::chat_presence(transport, args).await,
        "privacysettings" => account::privacy_settings(transport).await,
        "getuser" => account::get_user(transport, args).await,
        "getavatar" => account::get_avatar(transport, args).await,
        "getstatusprivacy" => account::status_privacy(transport).await,
        "setstatus" => account::set_status(transport, args).await,
        "getgroup" => groups::get_group(transport, args).await,
        "subgroups" => groups::sub_groups(transport, args).await,
        "communityparticipants" => groups::community_participants(transport, args).await,
        "listgroups" => groups::list_groups(transport).await,
        "getinvitelink" => groups::invite_link(transport, args).await,
        "queryinvitelink" => groups::query_invite_link(transport, args).await,
        "querybusinesslink" => groups::query_business_link(transport, args).await,
        "joininvitelink" => groups::join_invite_link(transport, args).await,
        "setdisappeartimer" => groups::set_disappearing_timer(transport, args).await,
        "send" => messaging::send(transport, args).await,
        "sendpoll" => messaging::send_poll(transport, args).await,
        "multisend" => messaging::multisend(&ctx.transport, args).await,
        "react" => messaging::react(transport, args).await,
        "revoke" => messaging::revoke(transport, args).await,
        "sendimg" => messaging::send_image(transport, args).await,
        other => {
            warn!("Unknown command: {other}");
            Ok(())
        }
    }
}
