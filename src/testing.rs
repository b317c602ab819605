//! In-crate test doubles for the transport and the completion provider.

use async_trait::async_trait;
use chrono::Utc;
use meow_core::{
    context::CompletionRequest,
    error::MeowError,
    event::{InboundEvent, MediaKind, TextMessage},
    jid::Jid,
    message::{OutboundPayload, SendReceipt, UploadedMedia},
    network::{ChatPresence, ChatPresenceMedia, NetworkCheck, Presence},
    traits::{Provider, Transport},
};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

/// Records everything sent through it.
#[derive(Default)]
pub struct MockTransport {
    pub sent: Mutex<Vec<(Jid, OutboundPayload)>>,
    pub uploads: Mutex<Vec<Vec<u8>>>,
    pub presences: Mutex<Vec<Presence>>,
    pub chat_presences: Mutex<Vec<(Jid, ChatPresence)>>,
    pub timers: Mutex<Vec<(Jid, Duration)>>,
    pub connects: AtomicU32,
    pub disconnects: AtomicU32,
    /// Sends to these chats fail.
    pub failing_chats: HashSet<Jid>,
    pub push_name: Option<String>,
    /// `disconnect` fails (the count still goes up).
    pub failing_disconnect: bool,
    /// `send_chat_presence` fails (nothing is recorded).
    pub failing_chat_presence: bool,
    seq: AtomicU32,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(chats: &[Jid]) -> Self {
        Self {
            failing_chats: chats.iter().cloned().collect(),
            ..Self::default()
        }
    }

    pub fn with_push_name(name: &str) -> Self {
        Self {
            push_name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_disconnect() -> Self {
        Self {
            failing_disconnect: true,
            ..Self::default()
        }
    }

    pub fn failing_chat_presence() -> Self {
        Self {
            failing_chat_presence: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(Jid, OutboundPayload)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn connects(&self) -> u32 {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> u32 {
        self.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn connect(&self) -> Result<(), MeowError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), MeowError> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        if self.failing_disconnect {
            return Err(MeowError::Transport("socket already gone".into()));
        }
        Ok(())
    }

    async fn subscribe(&self) -> Result<mpsc::Receiver<InboundEvent>, MeowError> {
        let (_tx, rx) = mpsc::channel(1);
        Ok(rx)
    }

    async fn send_message(
        &self,
        chat: &Jid,
        payload: OutboundPayload,
    ) -> Result<SendReceipt, MeowError> {
        if self.failing_chats.contains(chat) {
            return Err(MeowError::Transport(format!("send to {chat} refused")));
        }
        self.sent.lock().unwrap().push((chat.clone(), payload));
        let n = self.seq.fetch_add(1, Ordering::SeqCst);
        Ok(SendReceipt {
            message_id: format!("MOCK{n}"),
            timestamp: Utc::now(),
        })
    }

    async fn upload(&self, data: Vec<u8>, _kind: MediaKind) -> Result<UploadedMedia, MeowError> {
        let file_length = data.len() as u64;
        self.uploads.lock().unwrap().push(data);
        Ok(UploadedMedia {
            url: "https://media.example/blob".into(),
            direct_path: "/blob".into(),
            file_length,
            ..Default::default()
        })
    }

    async fn own_push_name(&self) -> Option<String> {
        self.push_name.clone()
    }

    async fn send_presence(&self, presence: Presence) -> Result<(), MeowError> {
        self.presences.lock().unwrap().push(presence);
        Ok(())
    }

    async fn send_chat_presence(
        &self,
        chat: &Jid,
        state: ChatPresence,
        _media: ChatPresenceMedia,
    ) -> Result<(), MeowError> {
        if self.failing_chat_presence {
            return Err(MeowError::Unsupported("chat presence"));
        }
        self.chat_presences.lock().unwrap().push((chat.clone(), state));
        Ok(())
    }

    async fn is_on_whatsapp(&self, phones: &[String]) -> Result<Vec<NetworkCheck>, MeowError> {
        Ok(phones
            .iter()
            .map(|p| NetworkCheck {
                query: p.clone(),
                is_in: true,
                jid: Some(Jid::user(p.trim_start_matches('+'))),
                business_name: None,
            })
            .collect())
    }

    async fn set_disappearing_timer(&self, chat: &Jid, timer: Duration) -> Result<(), MeowError> {
        self.timers.lock().unwrap().push((chat.clone(), timer));
        Ok(())
    }
}

/// Replays scripted completions and records the prompts it saw.
#[derive(Default)]
pub struct MockProvider {
    responses: Mutex<VecDeque<Result<Vec<String>, MeowError>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn replying(choices: &[&str]) -> Self {
        let provider = Self::default();
        provider.push(Ok(choices.iter().map(|c| c.to_string()).collect()));
        provider
    }

    pub fn failing(message: &str) -> Self {
        let provider = Self::default();
        provider.push(Err(MeowError::Provider(message.to_string())));
        provider
    }

    pub fn push(&self, response: Result<Vec<String>, MeowError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Vec<String>, MeowError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(MeowError::Provider("no scripted response".into())))
    }

    async fn is_available(&self) -> bool {
        true
    }
}

/// A direct text message from `628111`.
pub fn direct_text(body: &str) -> TextMessage {
    TextMessage {
        id: "3EB0TRIGGER".into(),
        sender: Jid::user("628111"),
        chat: Jid::user("628111"),
        from_self: false,
        is_group: false,
        media: None,
        body: body.into(),
        quoted: None,
    }
}
