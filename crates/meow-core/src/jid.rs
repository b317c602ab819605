//! WhatsApp-style chat identifiers (`user@server`).

use crate::error::MeowError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server for personal accounts.
pub const DEFAULT_USER_SERVER: &str = "s.whatsapp.net";

/// Server for group chats.
pub const GROUP_SERVER: &str = "g.us";

/// A chat or participant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Jid {
    pub user: String,
    pub server: String,
}

impl Jid {
    pub fn new(user: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            server: server.into(),
        }
    }

    /// A personal account on the default user server.
    pub fn user(phone: impl Into<String>) -> Self {
        Self::new(phone, DEFAULT_USER_SERVER)
    }

    pub fn is_group(&self) -> bool {
        self.server == GROUP_SERVER
    }

    /// Parse a JID typed by the operator.
    ///
    /// A leading `+` is dropped and a bare phone number is placed on the
    /// default user server. Full JIDs must name a user.
    pub fn parse_operator_arg(arg: &str) -> Result<Self, MeowError> {
        let arg = arg.strip_prefix('+').unwrap_or(arg);
        if arg.is_empty() {
            return Err(MeowError::Usage("Invalid JID: empty".into()));
        }
        if !arg.contains('@') {
            return Ok(Self::user(arg));
        }
        let jid: Jid = arg
            .parse()
            .map_err(|e| MeowError::Usage(format!("Invalid JID {arg}: {e}")))?;
        if jid.user.is_empty() {
            return Err(MeowError::Usage(format!(
                "Invalid JID {arg}: no user specified"
            )));
        }
        Ok(jid)
    }

    /// Parse an operator JID that must point at a group.
    pub fn parse_group_arg(arg: &str) -> Result<Self, MeowError> {
        let jid = Self::parse_operator_arg(arg)?;
        if !jid.is_group() {
            return Err(MeowError::Usage(format!(
                "Input must be a group JID (@{GROUP_SERVER})"
            )));
        }
        Ok(jid)
    }
}

impl FromStr for Jid {
    type Err = MeowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('@') {
            Some((_, "")) => Err(MeowError::Usage(format!("missing server in '{s}'"))),
            Some((user, server)) => Ok(Self::new(user, server)),
            None if s.is_empty() => Err(MeowError::Usage("empty JID".into())),
            // A bare server, e.g. "s.whatsapp.net" or "status@broadcast" without user.
            None => Ok(Self::new("", s)),
        }
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.user.is_empty() {
            write!(f, "{}", self.server)
        } else {
            write!(f, "{}@{}", self.user, self.server)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_phone_goes_to_user_server() {
        let jid = Jid::parse_operator_arg("+6281234567890").unwrap();
        assert_eq!(jid.user, "6281234567890");
        assert_eq!(jid.server, DEFAULT_USER_SERVER);
        assert_eq!(jid.to_string(), "6281234567890@s.whatsapp.net");
    }

    #[test]
    fn test_full_jid_is_parsed() {
        let jid = Jid::parse_operator_arg("120363001234567890@g.us").unwrap();
        assert!(jid.is_group());
        assert_eq!(jid.user, "120363001234567890");
    }

    #[test]
    fn test_jid_without_user_is_rejected() {
        assert!(matches!(
            Jid::parse_operator_arg("@s.whatsapp.net"),
            Err(MeowError::Usage(_))
        ));
        assert!(Jid::parse_operator_arg("+").is_err());
        assert!(Jid::parse_operator_arg("123@").is_err());
    }

    #[test]
    fn test_group_arg_requires_group_server() {
        assert!(Jid::parse_group_arg("120363001234567890@g.us").is_ok());
        let err = Jid::parse_group_arg("5511999887766").unwrap_err();
        assert!(err.to_string().contains("@g.us"));
    }

    #[test]
    fn test_display_round_trips_server_only() {
        let jid: Jid = "s.whatsapp.net".parse().unwrap();
        assert_eq!(jid.to_string(), "s.whatsapp.net");
    }
}
