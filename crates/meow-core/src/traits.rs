use crate::{
    context::CompletionRequest,
    error::MeowError,
    event::{InboundEvent, MediaKind},
    jid::Jid,
    message::{OutboundPayload, SendReceipt, UploadedMedia},
    network::{
        AvatarInfo, AvatarParams, BusinessLink, ChatPresence, ChatPresenceMedia, GroupInfo,
        GroupLink, NetworkCheck, PatchName, Presence, PrivacySettings, StatusPrivacy, UpdateCheck,
        UserInfo,
    },
};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;

/// Completion provider trait.
///
/// Any prompt-in/text-out service implements this to produce replies.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Complete a prompt. Returns the text of every choice, in order.
    async fn complete(&self, request: &CompletionRequest) -> Result<Vec<String>, MeowError>;

    /// Check if the provider is reachable with the configured credentials.
    async fn is_available(&self) -> bool;
}

/// Messaging transport trait.
///
/// Owns the session with the messaging network. Connection management,
/// sending and the event stream are required; the administrative queries
/// default to [`MeowError::Unsupported`] so a transport only overrides what
/// its protocol library offers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Human-readable transport name.
    fn name(&self) -> &str;

    /// Open (or reopen) the session. Events flow to the subscribed receiver.
    async fn connect(&self) -> Result<(), MeowError>;

    /// Close the session. Safe to call when already disconnected.
    async fn disconnect(&self) -> Result<(), MeowError>;

    /// Take the inbound event stream. Only one subscriber exists.
    async fn subscribe(&self) -> Result<mpsc::Receiver<InboundEvent>, MeowError>;

    /// Send a payload to a chat.
    async fn send_message(
        &self,
        chat: &Jid,
        payload: OutboundPayload,
    ) -> Result<SendReceipt, MeowError>;

    /// Upload a media blob for later reference in a message.
    async fn upload(&self, _data: Vec<u8>, _kind: MediaKind) -> Result<UploadedMedia, MeowError> {
        Err(MeowError::Unsupported("upload"))
    }

    /// Display name configured for the local identity, if any.
    async fn own_push_name(&self) -> Option<String> {
        None
    }

    async fn logout(&self) -> Result<(), MeowError> {
        Err(MeowError::Unsupported("logout"))
    }

    async fn fetch_app_state(&self, _name: PatchName, _full_resync: bool) -> Result<(), MeowError> {
        Err(MeowError::Unsupported("app state sync"))
    }

    async fn request_app_state_keys(&self, _key_ids: Vec<Vec<u8>>) -> Result<(), MeowError> {
        Err(MeowError::Unsupported("app state key request"))
    }

    async fn is_on_whatsapp(&self, _phones: &[String]) -> Result<Vec<NetworkCheck>, MeowError> {
        Err(MeowError::Unsupported("on-network check"))
    }

    async fn check_update(&self) -> Result<UpdateCheck, MeowError> {
        Err(MeowError::Unsupported("update check"))
    }

    async fn subscribe_presence(&self, _jid: &Jid) -> Result<(), MeowError> {
        Err(MeowError::Unsupported("presence subscription"))
    }

    async fn send_presence(&self, _presence: Presence) -> Result<(), MeowError> {
        Err(MeowError::Unsupported("presence"))
    }

    async fn send_chat_presence(
        &self,
        _chat: &Jid,
        _state: ChatPresence,
        _media: ChatPresenceMedia,
    ) -> Result<(), MeowError> {
        Err(MeowError::Unsupported("chat presence"))
    }

    async fn privacy_settings(&self) -> Result<PrivacySettings, MeowError> {
        Err(MeowError::Unsupported("privacy settings"))
    }

    async fn user_info(&self, _jids: &[Jid]) -> Result<Vec<UserInfo>, MeowError> {
        Err(MeowError::Unsupported("user info"))
    }

    async fn profile_picture(
        &self,
        _jid: &Jid,
        _params: AvatarParams,
    ) -> Result<Option<AvatarInfo>, MeowError> {
        Err(MeowError::Unsupported("profile picture"))
    }

    async fn group_info(&self, _group: &Jid) -> Result<GroupInfo, MeowError> {
        Err(MeowError::Unsupported("group info"))
    }

    async fn sub_groups(&self, _community: &Jid) -> Result<Vec<GroupLink>, MeowError> {
        Err(MeowError::Unsupported("sub-groups"))
    }

    async fn community_participants(&self, _community: &Jid) -> Result<Vec<Jid>, MeowError> {
        Err(MeowError::Unsupported("community participants"))
    }

    async fn joined_groups(&self) -> Result<Vec<GroupInfo>, MeowError> {
        Err(MeowError::Unsupported("joined groups"))
    }

    async fn group_invite_link(&self, _group: &Jid, _reset: bool) -> Result<String, MeowError> {
        Err(MeowError::Unsupported("invite link"))
    }

    async fn group_info_from_link(&self, _link: &str) -> Result<GroupInfo, MeowError> {
        Err(MeowError::Unsupported("invite link resolution"))
    }

    async fn resolve_business_link(&self, _link: &str) -> Result<BusinessLink, MeowError> {
        Err(MeowError::Unsupported("business link resolution"))
    }

    async fn join_group_with_link(&self, _link: &str) -> Result<Jid, MeowError> {
        Err(MeowError::Unsupported("invite link join"))
    }

    async fn status_privacy(&self) -> Result<Vec<StatusPrivacy>, MeowError> {
        Err(MeowError::Unsupported("status privacy"))
    }

    async fn set_disappearing_timer(&self, _chat: &Jid, _timer: Duration) -> Result<(), MeowError> {
        Err(MeowError::Unsupported("disappearing timer"))
    }

    async fn set_status_message(&self, _text: &str) -> Result<(), MeowError> {
        Err(MeowError::Unsupported("status message"))
    }
}
