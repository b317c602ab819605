//! Shaping of administrative query results into domain types.

use meow_core::jid::Jid;
use meow_core::network::{AvatarInfo, NetworkCheck};

/// Digits of a phone number as the server reports them in a JID user part.
pub(super) fn phone_digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// One check per queried phone, in query order. Phones the server did not
/// answer for count as not on the network.
pub(super) fn network_checks(phones: &[String], found: &[(Jid, bool)]) -> Vec<NetworkCheck> {
    phones
        .iter()
        .map(|phone| {
            let digits = phone_digits(phone);
            let hit = found.iter().find(|(jid, _)| jid.user == digits);
            NetworkCheck {
                query: phone.clone(),
                is_in: hit.is_some_and(|(_, registered)| *registered),
                jid: hit.map(|(jid, _)| jid.clone()),
                business_name: None,
            }
        })
        .collect()
}

/// The picture, unless it is the one the caller already has.
pub(super) fn changed_avatar(
    id: String,
    url: String,
    existing_id: Option<&str>,
) -> Option<AvatarInfo> {
    if existing_id == Some(id.as_str()) {
        return None;
    }
    Some(AvatarInfo { id, url })
}
