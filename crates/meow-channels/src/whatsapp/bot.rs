//! Bot construction and library event translation.

use super::events::translate_message;
use super::WhatsAppTransport;
use meow_core::error::MeowError;
use meow_core::event::InboundEvent;
use std::sync::Arc;
use tracing::{debug, info, warn};
use wacore::types::events::Event;
use whatsapp_rust::bot::Bot;
use whatsapp_rust_sqlite_storage::SqliteStore;
use whatsapp_rust_tokio_transport::TokioWebSocketTransportFactory;
use whatsapp_rust_ureq_http_client::UreqHttpClient;

impl WhatsAppTransport {
    /// Build the bot, wire its event callback into the inbound queue, and
    /// start it in the background.
    pub(super) async fn build_and_run_bot(&self) -> Result<(), MeowError> {
        self.prepare_session_dir()?;
        let db_path = self.session_db.to_string_lossy().to_string();
        info!("WhatsApp transport starting (session: {db_path})...");
        if self.config.request_full_sync {
            debug!("full history sync requested for new pairings");
        }

        let backend = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .map_err(|e| MeowError::Transport(format!("whatsapp store init failed: {e}")))?,
        );

        let tx = self.events_tx.clone();
        let client_store = self.client.clone();
        let sent_ids = self.sent_ids.clone();
        let qr_tx = self.qr_tx.clone();
        let pair_done_tx = self.pair_done_tx.clone();
        let last_qr = self.last_qr.clone();

        let mut bot = Bot::builder()
            .with_backend(backend)
            .with_transport_factory(TokioWebSocketTransportFactory::new())
            .with_http_client(UreqHttpClient::new())
            .with_device_props(
                Some(self.config.device_name.clone()),
                None,
                Some(waproto::whatsapp::device_props::PlatformType::Desktop),
            )
            .on_event(move |event, client| {
                let tx = tx.clone();
                let client_store = client_store.clone();
                let sent_ids = sent_ids.clone();
                let qr_tx = qr_tx.clone();
                let pair_done_tx = pair_done_tx.clone();
                let last_qr = last_qr.clone();
                async move {
                    let inbound = match event {
                        Event::PairingQrCode { code, .. } => {
                            info!("WhatsApp QR code generated (scan to pair)");
                            *last_qr.lock().await = Some(code.clone());
                            if let Some(ref qr) = *qr_tx.lock().await {
                                let _ = qr.send(code).await;
                            }
                            None
                        }
                        Event::PairSuccess(_) => {
                            info!("WhatsApp pairing successful");
                            *last_qr.lock().await = None;
                            if let Some(ref done) = *pair_done_tx.lock().await {
                                let _ = done.send(true).await;
                            }
                            None
                        }
                        Event::Connected(_) => {
                            *client_store.lock().await = Some(client);
                            *last_qr.lock().await = None;
                            if let Some(ref done) = *pair_done_tx.lock().await {
                                let _ = done.send(true).await;
                            }
                            Some(InboundEvent::ConnectionEstablished)
                        }
                        Event::Disconnected(_) => Some(InboundEvent::Disconnected),
                        Event::LoggedOut(_) => {
                            *client_store.lock().await = None;
                            Some(InboundEvent::LoggedOut {
                                reason: "session invalidated by the server".into(),
                            })
                        }
                        Event::StreamReplaced(_) => Some(InboundEvent::StreamReplaced),
                        Event::SelfPushNameUpdated(update) => {
                            Some(InboundEvent::PushNameChanged {
                                push_name: update.new_name,
                            })
                        }
                        Event::Message(msg, info) => {
                            if sent_ids.lock().await.remove(&info.id) {
                                debug!("skipping own echo: {}", info.id);
                                None
                            } else {
                                translate_message(&msg, &info).map(InboundEvent::TextMessage)
                            }
                        }
                        _ => None,
                    };

                    if let Some(event) = inbound {
                        if tx.send(event).await.is_err() {
                            warn!("whatsapp event receiver dropped");
                        }
                    }
                }
            })
            .build()
            .await
            .map_err(|e| MeowError::Transport(format!("whatsapp bot build failed: {e}")))?;

        *self.client.lock().await = Some(bot.client());

        let handle = bot
            .run()
            .await
            .map_err(|e| MeowError::Transport(format!("whatsapp bot run failed: {e}")))?;
        *self.run_handle.lock().await = Some(handle);

        Ok(())
    }
}
