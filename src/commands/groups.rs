//! Group, community and invite-link commands.

use super::require_args;
use meow_core::{error::MeowError, jid::Jid, network::GroupInfo, traits::Transport};
use std::time::Duration;
use tracing::info;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

fn log_group(group: &GroupInfo) {
    info!(
        "{} ({}): topic: {}, owner: {}, participants: {}{}",
        group.name,
        group.jid,
        group.topic.as_deref().unwrap_or(""),
        group
            .owner
            .as_ref()
            .map(|o| o.to_string())
            .unwrap_or_default(),
        group.participants.len(),
        if group.is_community { ", community" } else { "" }
    );
}

/// `getgroup <group jid>`
pub(super) async fn get_group(transport: &dyn Transport, args: &[String]) -> Result<(), MeowError> {
    require_args(args, 1, "getgroup <jid>")?;
    let group = Jid::parse_group_arg(&args[0])?;
    log_group(&transport.group_info(&group).await?);
    Ok(())
}

/// `subgroups <community jid>`
pub(super) async fn sub_groups(transport: &dyn Transport, args: &[String]) -> Result<(), MeowError> {
    require_args(args, 1, "subgroups <jid>")?;
    let community = Jid::parse_group_arg(&args[0])?;
    for sub in transport.sub_groups(&community).await? {
        info!(
            "{} ({}){}",
            sub.name,
            sub.jid,
            if sub.is_default_sub_group {
                " [default]"
            } else {
                ""
            }
        );
    }
    Ok(())
}

/// `communityparticipants <community jid>`
pub(super) async fn community_participants(
    transport: &dyn Transport,
    args: &[String],
) -> Result<(), MeowError> {
    require_args(args, 1, "communityparticipants <jid>")?;
    let community = Jid::parse_group_arg(&args[0])?;
    let participants = transport.community_participants(&community).await?;
    info!("{} participants in {community}", participants.len());
    for jid in participants {
        info!("  {jid}");
    }
    Ok(())
}

pub(super) async fn list_groups(transport: &dyn Transport) -> Result<(), MeowError> {
    let groups = transport.joined_groups().await?;
    info!("Joined {} groups", groups.len());
    for group in &groups {
        log_group(group);
    }
    Ok(())
}

/// `getinvitelink <group jid> [--reset]`
pub(super) async fn invite_link(transport: &dyn Transport, args: &[String]) -> Result<(), MeowError> {
    require_args(args, 1, "getinvitelink <jid> [--reset]")?;
    let group = Jid::parse_group_arg(&args[0])?;
    let reset = args.get(1).is_some_and(|a| a == "--reset");
    let link = transport.group_invite_link(&group, reset).await?;
    info!("Group invite link: {link}");
    Ok(())
}

/// `queryinvitelink <link>`
pub(super) async fn query_invite_link(
    transport: &dyn Transport,
    args: &[String],
) -> Result<(), MeowError> {
    require_args(args, 1, "queryinvitelink <link>")?;
    log_group(&transport.group_info_from_link(&args[0]).await?);
    Ok(())
}

/// `querybusinesslink <link>`
pub(super) async fn query_business_link(
    transport: &dyn Transport,
    args: &[String],
) -> Result<(), MeowError> {
    require_args(args, 1, "querybusinesslink <link>")?;
    let business = transport.resolve_business_link(&args[0]).await?;
    info!(
        "{} ({}), verified name: {}, message: {}",
        business.push_name,
        business.jid,
        business.verified_name.as_deref().unwrap_or(""),
        business.message.as_deref().unwrap_or("")
    );
    Ok(())
}

/// `joininvitelink <link>`
pub(super) async fn join_invite_link(
    transport: &dyn Transport,
    args: &[String],
) -> Result<(), MeowError> {
    require_args(args, 1, "joininvitelink <link>")?;
    let group = transport.join_group_with_link(&args[0]).await?;
    info!("Joined {group}");
    Ok(())
}

/// Parse `<jid> <days>` into a chat and a timer.
pub(super) fn parse_timer_args(args: &[String]) -> Result<(Jid, Duration), MeowError> {
    require_args(args, 2, "setdisappeartimer <jid> <days>")?;
    let jid = Jid::parse_operator_arg(&args[0])?;
    let days: u64 = args[1]
        .parse()
        .map_err(|e| MeowError::Usage(format!("Invalid duration {}: {e}", args[1])))?;
    Ok((jid, Duration::from_secs(days * SECS_PER_DAY)))
}

/// `setdisappeartimer <jid> <days>`
pub(super) async fn set_disappearing_timer(
    transport: &dyn Transport,
    args: &[String],
) -> Result<(), MeowError> {
    let (jid, timer) = parse_timer_args(args)?;
    transport.set_disappearing_timer(&jid, timer).await?;
    info!("Disappearing timer for {jid} set to {} day(s)", args[1]);
    Ok(())
}
