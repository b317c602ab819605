//! Transport trait implementation for WhatsApp.

use super::events::to_jid;
use super::payload::build_message;
use super::queries::{changed_avatar, network_checks, phone_digits};
use super::WhatsAppTransport;
use async_trait::async_trait;
use chrono::Utc;
use meow_core::{
    error::MeowError,
    event::{InboundEvent, MediaKind},
    jid::Jid,
    message::{OutboundPayload, SendReceipt, UploadedMedia},
    network::{
        AvatarInfo, AvatarParams, ChatPresence, ChatPresenceMedia, GroupInfo, NetworkCheck,
        Presence, UserInfo,
    },
    traits::Transport,
};
use tokio::sync::mpsc;
use tracing::info;

fn query_err(what: &str, e: impl std::fmt::Display) -> MeowError {
    MeowError::Transport(format!("whatsapp {what} failed: {e}"))
}

fn group_info(meta: whatsapp_rust::features::GroupMetadata) -> GroupInfo {
    GroupInfo {
        jid: to_jid(&meta.id),
        name: meta.subject,
        topic: None,
        owner: None,
        participants: meta.participants.iter().map(|p| to_jid(&p.jid)).collect(),
        is_community: false,
    }
}

fn wire_jid(jid: &Jid) -> Result<wacore_binary::jid::Jid, MeowError> {
    let raw = jid.to_string();
    raw.parse()
        .map_err(|e| MeowError::Transport(format!("invalid whatsapp JID '{raw}': {e}")))
}

#[async_trait]
impl Transport for WhatsAppTransport {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn connect(&self) -> Result<(), MeowError> {
        self.shutdown_session().await;
        self.build_and_run_bot().await?;
        info!("WhatsApp transport started");
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), MeowError> {
        self.shutdown_session().await;
        info!("WhatsApp transport stopped");
        Ok(())
    }

    async fn subscribe(&self) -> Result<mpsc::Receiver<InboundEvent>, MeowError> {
        self.events_rx
            .lock()
            .await
            .take()
            .ok_or_else(|| MeowError::Transport("whatsapp events already subscribed".into()))
    }

    async fn send_message(
        &self,
        chat: &Jid,
        payload: OutboundPayload,
    ) -> Result<SendReceipt, MeowError> {
        let client = self.connected_client().await?;
        let jid = wire_jid(chat)?;
        let msg = build_message(&chat.to_string(), payload);

        let message_id = client
            .send_message(jid, msg)
            .await
            .map_err(|e| MeowError::Transport(format!("whatsapp send failed: {e}")))?;
        self.sent_ids.lock().await.insert(message_id.clone());

        Ok(SendReceipt {
            message_id,
            timestamp: Utc::now(),
        })
    }

    async fn upload(&self, data: Vec<u8>, kind: MediaKind) -> Result<UploadedMedia, MeowError> {
        if kind != MediaKind::Image {
            return Err(MeowError::Unsupported("non-image upload"));
        }
        let client = self.connected_client().await?;
        let upload = client
            .upload(data, whatsapp_rust::download::MediaType::Image)
            .await
            .map_err(|e| MeowError::Transport(format!("whatsapp image upload failed: {e}")))?;

        Ok(UploadedMedia {
            url: upload.url,
            direct_path: upload.direct_path,
            media_key: upload.media_key,
            file_enc_sha256: upload.file_enc_sha256,
            file_sha256: upload.file_sha256,
            file_length: upload.file_length,
        })
    }

    async fn own_push_name(&self) -> Option<String> {
        let client = self.client.lock().await.clone()?;
        let name = client.get_push_name().await;
        (!name.is_empty()).then_some(name)
    }

    async fn is_on_whatsapp(&self, phones: &[String]) -> Result<Vec<NetworkCheck>, MeowError> {
        let client = self.connected_client().await?;
        let digits: Vec<String> = phones.iter().map(|p| phone_digits(p)).collect();
        let query: Vec<&str> = digits.iter().map(String::as_str).collect();
        let results = client
            .contacts()
            .is_on_whatsapp(&query)
            .await
            .map_err(|e| query_err("on-network check", e))?;
        let found: Vec<(Jid, bool)> = results
            .iter()
            .map(|r| (to_jid(&r.jid), r.is_registered))
            .collect();
        Ok(network_checks(phones, &found))
    }

    async fn send_presence(&self, presence: Presence) -> Result<(), MeowError> {
        let client = self.connected_client().await?;
        let sent = match presence {
            Presence::Available => client.presence().set_available().await,
            Presence::Unavailable => client.presence().set_unavailable().await,
        };
        sent.map_err(|e| query_err("presence", e))
    }

    async fn send_chat_presence(
        &self,
        chat: &Jid,
        state: ChatPresence,
        media: ChatPresenceMedia,
    ) -> Result<(), MeowError> {
        if media != ChatPresenceMedia::Text {
            return Err(MeowError::Unsupported("audio chat presence"));
        }
        let client = self.connected_client().await?;
        let jid = wire_jid(chat)?;
        let chatstate = client.chatstate();
        let sent = match state {
            ChatPresence::Composing => chatstate.send_composing(&jid).await,
            ChatPresence::Paused => chatstate.send_paused(&jid).await,
        };
        sent.map_err(|e| query_err("chat presence", e))
    }

    async fn user_info(&self, jids: &[Jid]) -> Result<Vec<UserInfo>, MeowError> {
        let client = self.connected_client().await?;
        let wire = jids.iter().map(wire_jid).collect::<Result<Vec<_>, _>>()?;
        let infos = client
            .contacts()
            .get_user_info(&wire)
            .await
            .map_err(|e| query_err("user info", e))?;
        Ok(infos
            .into_values()
            .map(|info| UserInfo {
                jid: to_jid(&info.jid),
                status: info.status,
                picture_id: info.picture_id,
                verified_name: None,
                devices: Vec::new(),
            })
            .collect())
    }

    async fn profile_picture(
        &self,
        jid: &Jid,
        params: AvatarParams,
    ) -> Result<Option<AvatarInfo>, MeowError> {
        let client = self.connected_client().await?;
        let wire = wire_jid(jid)?;
        let picture = client
            .contacts()
            .get_profile_picture(&wire, params.preview)
            .await
            .map_err(|e| query_err("profile picture", e))?;
        Ok(picture.and_then(|p| changed_avatar(p.id, p.url, params.existing_id.as_deref())))
    }

    async fn group_info(&self, group: &Jid) -> Result<GroupInfo, MeowError> {
        let client = self.connected_client().await?;
        let wire = wire_jid(group)?;
        let meta = client
            .groups()
            .get_metadata(&wire)
            .await
            .map_err(|e| query_err("group info", e))?;
        Ok(group_info(meta))
    }

    async fn joined_groups(&self) -> Result<Vec<GroupInfo>, MeowError> {
        let client = self.connected_client().await?;
        let groups = client
            .groups()
            .get_participating()
            .await
            .map_err(|e| query_err("joined groups", e))?;
        Ok(groups.into_values().map(group_info).collect())
    }
}
