//! Typed inputs and results for the transport's administrative queries.

use crate::error::MeowError;
use crate::jid::Jid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// App-state patch categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchName {
    Regular,
    RegularHigh,
    RegularLow,
    CriticalUnblockLow,
    /// Highest-priority critical category; its completion triggers presence.
    CriticalBlock,
}

impl PatchName {
    /// Every known category, in resync order.
    pub const ALL: [PatchName; 5] = [
        PatchName::Regular,
        PatchName::RegularHigh,
        PatchName::RegularLow,
        PatchName::CriticalUnblockLow,
        PatchName::CriticalBlock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::RegularHigh => "regular_high",
            Self::RegularLow => "regular_low",
            Self::CriticalUnblockLow => "critical_unblock_low",
            Self::CriticalBlock => "critical_block",
        }
    }
}

impl FromStr for PatchName {
    type Err = MeowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| MeowError::Usage(format!("Unknown app state type: {s}")))
    }
}

impl fmt::Display for PatchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Global presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Available,
    Unavailable,
}

impl FromStr for Presence {
    type Err = MeowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            other => Err(MeowError::Usage(format!("Unknown presence: {other}"))),
        }
    }
}

/// Per-chat typing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPresence {
    Composing,
    Paused,
}

impl FromStr for ChatPresence {
    type Err = MeowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "composing" => Ok(Self::Composing),
            "paused" => Ok(Self::Paused),
            other => Err(MeowError::Usage(format!("Unknown chat presence: {other}"))),
        }
    }
}

/// What kind of input a composing state refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatPresenceMedia {
    #[default]
    Text,
    Audio,
}

impl FromStr for ChatPresenceMedia {
    type Err = MeowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Self::Text),
            "audio" => Ok(Self::Audio),
            other => Err(MeowError::Usage(format!("Unknown chat presence media: {other}"))),
        }
    }
}

/// Result of an on-network check for one phone number.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkCheck {
    pub query: String,
    pub is_in: bool,
    pub jid: Option<Jid>,
    pub business_name: Option<String>,
}

/// Client protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Version(pub u32, pub u32, pub u32);

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0, self.1, self.2)
    }
}

/// Local vs. latest published client version.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpdateCheck {
    pub current: Version,
    pub latest: Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    UpToDate,
    Outdated,
    Newer,
}

impl UpdateCheck {
    pub fn status(&self) -> UpdateStatus {
        match self.current.cmp(&self.latest) {
            std::cmp::Ordering::Equal => UpdateStatus::UpToDate,
            std::cmp::Ordering::Less => UpdateStatus::Outdated,
            std::cmp::Ordering::Greater => UpdateStatus::Newer,
        }
    }
}

/// Privacy settings as category → visibility.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PrivacySettings(pub BTreeMap<String, String>);

#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub jid: Jid,
    pub status: Option<String>,
    pub picture_id: Option<String>,
    pub verified_name: Option<String>,
    pub devices: Vec<Jid>,
}

/// Options for a profile picture lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvatarParams {
    pub preview: bool,
    pub is_community: bool,
    /// Picture id the caller already has; unchanged pictures return nothing.
    pub existing_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvatarInfo {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupInfo {
    pub jid: Jid,
    pub name: String,
    pub topic: Option<String>,
    pub owner: Option<Jid>,
    pub participants: Vec<Jid>,
    pub is_community: bool,
}

/// A group linked under a community.
#[derive(Debug, Clone, Serialize)]
pub struct GroupLink {
    pub jid: Jid,
    pub name: String,
    pub is_default_sub_group: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BusinessLink {
    pub jid: Jid,
    pub push_name: String,
    pub verified_name: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusPrivacy {
    pub kind: String,
    pub list: Vec<Jid>,
    pub is_default: bool,
}
