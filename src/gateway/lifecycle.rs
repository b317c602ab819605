//! Lifecycle supervisor: connection state, keepalive failures, termination.

use meow_core::{error::MeowError, traits::Transport};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Consecutive keepalive timeouts tolerated before a forced reconnect.
pub const KEEPALIVE_TOLERANCE: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Disconnected,
    Connecting,
    Connected,
    /// Absorbing: no transition leaves it.
    Terminating,
}

/// Why the process is shutting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationCause {
    Interrupt,
    EndOfInput,
    /// Another session took over; exit without touching the session.
    StreamReplaced,
}

/// Owns the process-wide connect/reconnect/shutdown state.
pub struct Supervisor {
    transport: Arc<dyn Transport>,
    state: watch::Sender<LifecycleState>,
    keepalive_failures: AtomicU32,
    cause: Mutex<Option<TerminationCause>>,
}

impl Supervisor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (state, _) = watch::channel(LifecycleState::Disconnected);
        Self {
            transport,
            state,
            keepalive_failures: AtomicU32::new(0),
            cause: Mutex::new(None),
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Receiver that observes every state change.
    pub fn watch(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    pub fn cause(&self) -> Option<TerminationCause> {
        *self.cause.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn keepalive_failures(&self) -> u32 {
        self.keepalive_failures.load(Ordering::SeqCst)
    }

    /// Move to `next` unless terminating. Returns whether the state changed.
    fn transition(&self, next: LifecycleState) -> bool {
        self.state.send_if_modified(|current| {
            if *current == LifecycleState::Terminating || *current == next {
                false
            } else {
                *current = next;
                true
            }
        })
    }

    /// Open the session.
    pub async fn connect(&self) -> Result<(), MeowError> {
        if self.state() == LifecycleState::Terminating {
            return Ok(());
        }
        self.transition(LifecycleState::Connecting);
        match self.transport.connect().await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.transition(LifecycleState::Disconnected);
                Err(e)
            }
        }
    }

    /// Close and reopen the session once.
    pub async fn reconnect(&self) -> Result<(), MeowError> {
        if self.state() == LifecycleState::Terminating {
            return Ok(());
        }
        info!("reconnecting to {}", self.transport.name());
        if let Err(e) = self.transport.disconnect().await {
            warn!("disconnect before reconnect failed: {e}");
        }
        self.transition(LifecycleState::Disconnected);
        self.connect().await
    }

    /// The transport reported an established session.
    pub fn on_connected(&self) {
        if self.transition(LifecycleState::Connected) {
            info!("connected to {}", self.transport.name());
        }
    }

    /// The transport dropped the session on its own.
    pub fn on_disconnected(&self) {
        if self.transition(LifecycleState::Disconnected) {
            warn!("disconnected from {}", self.transport.name());
        }
    }

    /// Count a keepalive timeout. The fourth consecutive one forces a single
    /// reconnect and starts the count over. Returns whether it reconnected.
    pub async fn on_keepalive_timeout(&self) -> bool {
        let previous = self
            .keepalive_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                Some(if count + 1 > KEEPALIVE_TOLERANCE {
                    0
                } else {
                    count + 1
                })
            })
            .unwrap_or_default();

        if previous < KEEPALIVE_TOLERANCE {
            warn!("keepalive timeout ({} in a row)", previous + 1);
            return false;
        }

        warn!("keepalive failed {} times in a row, forcing reconnect", previous + 1);
        if let Err(e) = self.reconnect().await {
            error!("forced reconnect failed: {e}");
        }
        true
    }

    /// A keepalive succeeded again; the failure streak is over.
    pub fn on_keepalive_restored(&self) {
        let previous = self.keepalive_failures.swap(0, Ordering::SeqCst);
        if previous > 0 {
            info!("keepalive restored after {previous} timeouts");
        }
    }

    /// Enter `Terminating`. Only the first call records its cause; later
    /// calls return `false`.
    pub fn terminate(&self, cause: TerminationCause) -> bool {
        // Hold the cause slot so watchers never see Terminating without it.
        let mut slot = self.cause.lock().unwrap_or_else(|e| e.into_inner());
        let first = self.state.send_if_modified(|current| {
            if *current == LifecycleState::Terminating {
                false
            } else {
                *current = LifecycleState::Terminating;
                true
            }
        });
        if first {
            *slot = Some(cause);
            info!("terminating: {cause:?}");
        }
        first
    }
}
