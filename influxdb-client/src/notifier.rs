//! Connection-state tracking and de-duplicated callback notification
//!
//! Transmission outcomes are folded into a single connection status; a
//! registered callback fires only when that status *changes*, so a run of
//! identical failures produces exactly one notification. Bad-request
//! outcomes are the exception: they indicate a caller-side defect and are
//! reported on every occurrence.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::transmit::WriteResult;

/// Externally observable connection status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No transmission has completed yet.
    Unknown,
    /// The last transmission reached the server.
    Connected,
    /// The last transmission could not reach the server.
    Disconnected,
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

type Callback = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct NotifierState {
    status: ConnectionStatus,
    on_connected: Option<Callback>,
    on_disconnected: Option<Callback>,
    on_bad_request: Option<Callback>,
}

/// Tracks the last observed connection status and dispatches callbacks.
///
/// Each event has a single slot: registering a callback replaces the
/// previous one. Before registration every slot is a no-op.
pub struct StatusNotifier {
    state: Mutex<NotifierState>,
}

impl StatusNotifier {
    /// Create a notifier with no registered callbacks
    pub fn new() -> Self {
        Self {
            state: Mutex::new(NotifierState::default()),
        }
    }

    /// Get the last observed connection status
    pub fn status(&self) -> ConnectionStatus {
        self.state.lock().status
    }

    /// Register the callback fired when the connection becomes healthy.
    ///
    /// If the status is already `Connected` the callback is invoked once,
    /// synchronously, before this method returns.
    pub fn on_connected<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.register(ConnectionStatus::Connected, Arc::new(callback));
    }

    /// Register the callback fired when the connection is lost.
    ///
    /// If the status is already `Disconnected` the callback is invoked once,
    /// synchronously, before this method returns.
    pub fn on_disconnected<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.register(ConnectionStatus::Disconnected, Arc::new(callback));
    }

    /// Register the callback fired on every rejected (malformed) payload.
    pub fn on_bad_request<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.state.lock().on_bad_request = Some(Arc::new(callback));
    }

    fn register(&self, wants: ConnectionStatus, callback: Callback) {
        let replay = {
            let mut state = self.state.lock();
            match wants {
                ConnectionStatus::Connected => state.on_connected = Some(callback.clone()),
                ConnectionStatus::Disconnected => state.on_disconnected = Some(callback.clone()),
                ConnectionStatus::Unknown => unreachable!("no callback slot for Unknown"),
            }
            state.status == wants
        };
        // Replay outside the lock so the callback may inspect the notifier.
        if replay {
            callback();
        }
    }

    /// Fold one transmission outcome into the connection status, firing
    /// callbacks as needed. `Batched` outcomes carry no connectivity
    /// information and are ignored.
    pub fn observe(&self, result: WriteResult) {
        if result == WriteResult::Batched {
            return;
        }

        let mut fire: Vec<Callback> = Vec::new();
        {
            let mut state = self.state.lock();

            if result == WriteResult::BadRequest {
                // Not de-duplicated: each malformed payload is a distinct bug
                // report for the caller.
                if let Some(cb) = &state.on_bad_request {
                    fire.push(cb.clone());
                }
            }

            let derived = if result.server_reached() {
                ConnectionStatus::Connected
            } else {
                ConnectionStatus::Disconnected
            };

            if derived != state.status {
                debug!(from = ?state.status, to = ?derived, "connection status changed");
                state.status = derived;
                let slot = match derived {
                    ConnectionStatus::Connected => &state.on_connected,
                    ConnectionStatus::Disconnected => &state.on_disconnected,
                    ConnectionStatus::Unknown => &None,
                };
                if let Some(cb) = slot {
                    fire.push(cb.clone());
                }
            }
        }
        for cb in fire {
            cb();
        }
    }
}

impl Default for StatusNotifier {
    fn default() -> Self {
        Self::new()
    }
}
