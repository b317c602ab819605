//! WhatsApp transport, pure Rust via `whatsapp-rust`.
//!
//! Uses the WhatsApp Web protocol (Noise handshake + Signal encryption).
//! Pairing is done by scanning a QR code, like WhatsApp Web. The session
//! lives in a SQLite database so restarts do not require re-pairing.

mod bot;
mod events;
mod payload;
mod qr;
mod queries;
mod sent;
mod transport;

#[cfg(test)]
mod tests;

pub use qr::{generate_qr_image, generate_qr_terminal};

use meow_core::config::WhatsAppConfig;
use meow_core::error::MeowError;
use meow_core::event::InboundEvent;
use sent::SentIds;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::debug;
use whatsapp_rust::client::Client;

/// Capacity of the inbound event queue.
const EVENT_QUEUE: usize = 256;

/// WhatsApp transport using the WhatsApp Web protocol.
pub struct WhatsAppTransport {
    pub(super) config: WhatsAppConfig,
    pub(super) session_db: PathBuf,
    /// Client handle for sending. Set once the bot is built.
    pub(super) client: Arc<Mutex<Option<Arc<Client>>>>,
    /// Background task driving the bot.
    pub(super) run_handle: Mutex<Option<JoinHandle<()>>>,
    /// Recent message IDs we sent, used to drop our own echo.
    pub(super) sent_ids: Arc<Mutex<SentIds>>,
    pub(super) events_tx: mpsc::Sender<InboundEvent>,
    pub(super) events_rx: Mutex<Option<mpsc::Receiver<InboundEvent>>>,
    /// Sender for QR code events from the running bot.
    pub(super) qr_tx: Arc<Mutex<Option<mpsc::Sender<String>>>>,
    /// Sender for pairing-done events from the running bot.
    pub(super) pair_done_tx: Arc<Mutex<Option<mpsc::Sender<bool>>>>,
    /// Last QR code, replayed to late `pairing_channels()` callers.
    pub(super) last_qr: Arc<Mutex<Option<String>>>,
}

impl WhatsAppTransport {
    /// Create a transport that stores its session at `session_db`.
    pub fn new(config: WhatsAppConfig, session_db: PathBuf) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE);
        Self {
            config,
            session_db,
            client: Arc::new(Mutex::new(None)),
            run_handle: Mutex::new(None),
            sent_ids: Arc::new(Mutex::new(SentIds::default())),
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
            qr_tx: Arc::new(Mutex::new(None)),
            pair_done_tx: Arc::new(Mutex::new(None)),
            last_qr: Arc::new(Mutex::new(None)),
        }
    }

    /// Check if the WhatsApp client is currently connected.
    pub async fn is_connected(&self) -> bool {
        self.client.lock().await.is_some()
    }

    /// Create fresh pairing channels. Returns `(qr_rx, done_rx)` receivers
    /// that forward QR code and pairing-done events from the running bot.
    ///
    /// A QR code generated before this call is replayed immediately.
    /// Calling this replaces any previous senders.
    pub async fn pairing_channels(&self) -> (mpsc::Receiver<String>, mpsc::Receiver<bool>) {
        let (qr_tx, qr_rx) = mpsc::channel::<String>(4);
        let (done_tx, done_rx) = mpsc::channel::<bool>(1);

        if let Some(ref qr) = *self.last_qr.lock().await {
            let _ = qr_tx.send(qr.clone()).await;
        }

        *self.qr_tx.lock().await = Some(qr_tx);
        *self.pair_done_tx.lock().await = Some(done_tx);
        (qr_rx, done_rx)
    }

    /// Current client, or a transport error when not connected.
    pub(super) async fn connected_client(&self) -> Result<Arc<Client>, MeowError> {
        self.client
            .lock()
            .await
            .clone()
            .ok_or_else(|| MeowError::Transport("whatsapp client not connected".into()))
    }

    /// Close the current session, if any: the client disconnects its socket
    /// and keepalive first, then the bot task is aborted. Safe to call when
    /// nothing is running.
    pub(super) async fn shutdown_session(&self) {
        let client = self.client.lock().await.take();
        if let Some(client) = client {
            debug!("closing whatsapp socket");
            client.disconnect().await;
        }
        if let Some(handle) = self.run_handle.lock().await.take() {
            handle.abort();
        }
    }

    /// Ensure the session directory exists.
    pub(super) fn prepare_session_dir(&self) -> Result<(), MeowError> {
        if let Some(parent) = self.session_db.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
