//! Session, presence and profile commands.

use super::require_args;
use meow_core::{
    error::MeowError,
    jid::Jid,
    network::{AvatarParams, PatchName, UpdateStatus},
    traits::Transport,
};
use tracing::{error, info};

pub(super) async fn logout(transport: &dyn Transport) -> Result<(), MeowError> {
    transport.logout().await?;
    info!("Successfully logged out");
    Ok(())
}

/// `appstate <name|all> [resync]`
pub(super) async fn app_state(transport: &dyn Transport, args: &[String]) -> Result<(), MeowError> {
    require_args(args, 1, "appstate <types...>")?;
    let names = if args[0] == "all" {
        PatchName::ALL.to_vec()
    } else {
        vec![args[0].parse::<PatchName>()?]
    };
    let resync = args.get(1).is_some_and(|a| a == "resync");

    for name in names {
        match transport.fetch_app_state(name, resync).await {
            Ok(()) => info!("Fetched app state {name}"),
            Err(e) => error!("Failed to sync app state {name}: {e}"),
        }
    }
    Ok(())
}

/// `request-appstate-key <hex ids...>`
pub(super) async fn request_app_state_keys(
    transport: &dyn Transport,
    args: &[String],
) -> Result<(), MeowError> {
    require_args(args, 1, "request-appstate-key <ids...>")?;
    let key_ids = decode_key_ids(args)?;
    transport.request_app_state_keys(key_ids).await?;
    info!("Requested {} app state key(s)", args.len());
    Ok(())
}

pub(super) fn decode_key_ids(args: &[String]) -> Result<Vec<Vec<u8>>, MeowError> {
    args.iter()
        .map(|id| {
            hex::decode(id).map_err(|e| MeowError::Usage(format!("Invalid key id {id}: {e}")))
        })
        .collect()
}

/// `checkuser <phones...>`
pub(super) async fn check_user(transport: &dyn Transport, args: &[String]) -> Result<(), MeowError> {
    require_args(args, 1, "checkuser <phone numbers...>")?;
    for check in transport.is_on_whatsapp(args).await? {
        let jid = check.jid.map(|j| j.to_string()).unwrap_or_default();
        info!(
            "{}: on whatsapp: {}, JID: {jid}, business name: {}",
            check.query,
            check.is_in,
            check.business_name.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

pub(super) async fn check_update(transport: &dyn Transport) -> Result<(), MeowError> {
    let check = transport.check_update().await?;
    match check.status() {
        UpdateStatus::UpToDate => info!("Client is up to date ({})", check.current),
        UpdateStatus::Outdated => info!(
            "Client is outdated: {} < latest {}",
            check.current, check.latest
        ),
        UpdateStatus::Newer => info!(
            "Client is newer than latest: {} > {}",
            check.current, check.latest
        ),
    }
    Ok(())
}

/// `subscribepresence <jid>`
pub(super) async fn subscribe_presence(
    transport: &dyn Transport,
    args: &[String],
) -> Result<(), MeowError> {
    require_args(args, 1, "subscribepresence <jid>")?;
    let jid = Jid::parse_operator_arg(&args[0])?;
    transport.subscribe_presence(&jid).await?;
    info!("Subscribed to presence of {jid}");
    Ok(())
}

/// `presence <available|unavailable>`
pub(super) async fn presence(transport: &dyn Transport, args: &[String]) -> Result<(), MeowError> {
    require_args(args, 1, "presence <available/unavailable>")?;
    let presence = args[0].parse()?;
    transport.send_presence(presence).await?;
    info!("Presence set to {}", args[0]);
    Ok(())
}

/// `chatpresence <jid> <composing|paused> [audio]`
pub(super) async fn chat_presence(
    transport: &dyn Transport,
    args: &[String],
) -> Result<(), MeowError> {
    require_args(args, 2, "chatpresence <jid> <composing/paused> [audio]")?;
    let jid = Jid::parse_operator_arg(&args[0])?;
    let state = args[1].parse()?;
    let media = args.get(2).map(String::as_str).unwrap_or("").parse()?;
    transport.send_chat_presence(&jid, state, media).await?;
    info!("Chat presence {} sent to {jid}", args[1]);
    Ok(())
}

pub(super) async fn privacy_settings(transport: &dyn Transport) -> Result<(), MeowError> {
    let settings = transport.privacy_settings().await?;
    for (category, value) in &settings.0 {
        info!("{category}: {value}");
    }
    Ok(())
}

/// `getuser <jids...>`
pub(super) async fn get_user(transport: &dyn Transport, args: &[String]) -> Result<(), MeowError> {
    require_args(args, 1, "getuser <jids...>")?;
    let jids = args
        .iter()
        .map(|a| Jid::parse_operator_arg(a))
        .collect::<Result<Vec<_>, _>>()?;
    for user in transport.user_info(&jids).await? {
        info!(
            "{}: status: {}, picture id: {}, verified name: {}, devices: {}",
            user.jid,
            user.status.as_deref().unwrap_or(""),
            user.picture_id.as_deref().unwrap_or(""),
            user.verified_name.as_deref().unwrap_or(""),
            user.devices
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}

/// Parse `<jid> [existing id] [--preview] [--community]`.
///
/// The existing picture id is the third token, after the JID and one
/// positional slot.
pub(super) fn parse_avatar_args(args: &[String]) -> Result<(Jid, AvatarParams), MeowError> {
    require_args(args, 1, "getavatar <jid> [existing ID] [--preview] [--community]")?;
    let jid = Jid::parse_operator_arg(&args[0])?;
    let params = AvatarParams {
        preview: args.iter().any(|a| a == "--preview"),
        is_community: args.iter().any(|a| a == "--community"),
        existing_id: args
            .get(2)
            .filter(|a| !a.starts_with("--"))
            .cloned(),
    };
    Ok((jid, params))
}

/// `getavatar <jid> [existing id] [--preview] [--community]`
pub(super) async fn get_avatar(transport: &dyn Transport, args: &[String]) -> Result<(), MeowError> {
    let (jid, params) = parse_avatar_args(args)?;
    match transport.profile_picture(&jid, params).await? {
        Some(pic) => info!("Got avatar {}: {}", pic.id, pic.url),
        None => info!("No avatar found (or unchanged) for {jid}"),
    }
    Ok(())
}

pub(super) async fn status_privacy(transport: &dyn Transport) -> Result<(), MeowError> {
    for entry in transport.status_privacy().await? {
        info!(
            "{} (default: {}): {}",
            entry.kind,
            entry.is_default,
            entry
                .list
                .iter()
                .map(|j| j.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}

/// `setstatus <message...>`
pub(super) async fn set_status(transport: &dyn Transport, args: &[String]) -> Result<(), MeowError> {
    require_args(args, 1, "setstatus <message>")?;
    transport.set_status_message(&args.join(" ")).await?;
    info!("Status updated");
    Ok(())
}
