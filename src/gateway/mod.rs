//! Gateway: the event loop connecting the transport, the completion
//! provider and the operator console.
//!
//! Every inbound event and every operator command runs on its own task, so
//! a slow completion or subprocess never holds up intake.

mod diagnostics;
mod history;
mod keywords;
mod keywords_data;
mod lifecycle;
mod routing;


pub use lifecycle::{LifecycleState, Supervisor, TerminationCause};

use crate::commands::{self, CommandContext, OperatorCommand};
use history::HistorySyncWriter;
use meow_core::{
    config::{DiagnosticsConfig, Replies},
    event::InboundEvent,
    network::{PatchName, Presence},
    traits::{Provider, Transport},
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

/// The central gateway that routes events between the transport and the
/// provider.
pub struct Gateway {
    pub(super) transport: Arc<dyn Transport>,
    pub(super) provider: Arc<dyn Provider>,
    pub(super) supervisor: Arc<Supervisor>,
    pub(super) history: HistorySyncWriter,
    pub(super) replies: Replies,
    pub(super) diagnostics: DiagnosticsConfig,
}

impl Gateway {
    /// Create a new gateway. History-sync files go to `data_dir`.
    pub fn new(
        transport: Arc<dyn Transport>,
        provider: Arc<dyn Provider>,
        replies: Replies,
        diagnostics: DiagnosticsConfig,
        data_dir: PathBuf,
    ) -> Self {
        let supervisor = Arc::new(Supervisor::new(transport.clone()));
        Self {
            transport,
            provider,
            supervisor,
            history: HistorySyncWriter::new(data_dir, chrono::Utc::now().timestamp()),
            replies,
            diagnostics,
        }
    }

    fn command_context(&self) -> CommandContext {
        CommandContext {
            transport: self.transport.clone(),
            supervisor: self.supervisor.clone(),
        }
    }

    /// Run until interrupted, until stdin closes, or until the session is
    /// taken over elsewhere. Returns why it stopped.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<TerminationCause> {
        let mut events = self.transport.subscribe().await?;
        self.supervisor.connect().await?;
        info!(
            "meow gateway running | transport: {} | provider: {}",
            self.transport.name(),
            self.provider.name()
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut state = self.supervisor.watch();
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        while self.supervisor.state() != LifecycleState::Terminating {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        let gw = self.clone();
                        tokio::spawn(async move { gw.handle_event(event).await });
                    }
                    None => {
                        warn!("transport event stream closed");
                        self.supervisor.terminate(TerminationCause::EndOfInput);
                    }
                },
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        self.spawn_command(&line);
                    }
                    Ok(None) => {
                        info!("operator input closed");
                        self.supervisor.terminate(TerminationCause::EndOfInput);
                    }
                    Err(e) => {
                        error!("failed to read operator input: {e}");
                        self.supervisor.terminate(TerminationCause::EndOfInput);
                    }
                },
                _ = &mut ctrl_c => {
                    info!("interrupt received");
                    self.supervisor.terminate(TerminationCause::Interrupt);
                }
                changed = state.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        let cause = self
            .supervisor
            .cause()
            .unwrap_or(TerminationCause::EndOfInput);
        if cause != TerminationCause::StreamReplaced {
            if let Err(e) = self.transport.disconnect().await {
                error!("disconnect failed: {e}");
            }
        }
        Ok(cause)
    }

    /// Parse one operator line and dispatch it on its own task.
    pub(crate) fn spawn_command(&self, line: &str) -> Option<tokio::task::JoinHandle<()>> {
        let command = OperatorCommand::parse(line)?;
        let ctx = self.command_context();
        Some(tokio::spawn(async move {
            if let Err(e) = commands::dispatch(&command, &ctx).await {
                error!("{}: {e}", command.verb);
            }
        }))
    }

    /// Handle one inbound event to completion.
    pub(crate) async fn handle_event(&self, event: InboundEvent) {
        debug!("event: {}", event.kind());
        match event {
            InboundEvent::TextMessage(msg) => self.handle_message(&msg).await,
            InboundEvent::HistorySync(blob) => match self.history.write(&blob) {
                Ok(path) => info!("Wrote history sync to {}", path.display()),
                Err(e) => error!("Failed to write history sync: {e}"),
            },
            InboundEvent::AppStateSyncComplete { name } => {
                if name == PatchName::CriticalBlock {
                    let push_name = self.transport.own_push_name().await;
                    self.announce_presence(push_name.as_deref()).await;
                }
            }
            InboundEvent::ConnectionEstablished => {
                self.supervisor.on_connected();
                let push_name = self.transport.own_push_name().await;
                self.announce_presence(push_name.as_deref()).await;
            }
            InboundEvent::PushNameChanged { push_name } => {
                self.announce_presence(Some(&push_name)).await;
            }
            InboundEvent::StreamReplaced => {
                warn!("session replaced by another client, exiting");
                self.supervisor.terminate(TerminationCause::StreamReplaced);
            }
            InboundEvent::KeepAliveTimeout { error_count } => {
                debug!("transport reports {error_count} keepalive errors");
                self.supervisor.on_keepalive_timeout().await;
            }
            InboundEvent::KeepAliveRestored => self.supervisor.on_keepalive_restored(),
            InboundEvent::Disconnected => self.supervisor.on_disconnected(),
            InboundEvent::LoggedOut { reason } => {
                warn!("logged out: {reason}");
                self.supervisor.on_disconnected();
            }
        }
    }

    /// Mark ourselves available, if we have a display name to show.
    async fn announce_presence(&self, push_name: Option<&str>) {
        match push_name {
            Some(name) if !name.is_empty() => {
                match self.transport.send_presence(Presence::Available).await {
                    Ok(()) => info!("Marked self as available ({name})"),
                    Err(e) => warn!("Failed to send available presence: {e}"),
                }
            }
            _ => debug!("no push name set, skipping presence"),
        }
    }
}
