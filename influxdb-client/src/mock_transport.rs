//! Mock transport for unit testing
//!
//! Records every payload it is handed and can be scripted to fail with any
//! of the declared failure kinds, so tests can exercise batching, retry
//! retention, and callback behavior without a running database.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::trace;

use crate::transport::{Transport, TransportError};

/// Failure the mock reports on the next sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Reject every payload as malformed
    BadRequest,
    /// Fail every payload server-side
    ServerError,
    /// Refuse the connection entirely
    ConnectionFailed,
}

#[derive(Debug, Default)]
struct MockState {
    /// Payloads handed to `send`, in order, including failed attempts
    payloads: Vec<String>,
    /// Operation log for assertions
    operations: Vec<String>,
    /// Scripted failure, `None` for success
    failure: Option<FailureMode>,
    /// Canned body returned by `query`
    query_response: Option<String>,
}

/// Statistics tracking for the mock transport
#[derive(Debug, Default)]
struct MockTransportStats {
    total_sends: AtomicU64,
    failed_sends: AtomicU64,
    total_queries: AtomicU64,
}

/// In-memory transport double for tests.
pub struct MockTransport {
    state: Mutex<MockState>,
    stats: MockTransportStats,
}

impl MockTransport {
    /// Create a new mock transport that accepts everything
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            stats: MockTransportStats::default(),
        }
    }

    /// Create a mock transport that fails every send with the given mode
    pub fn failing(mode: FailureMode) -> Self {
        let mock = Self::new();
        mock.set_failure(Some(mode));
        mock
    }

    /// Script the failure returned by subsequent sends; `None` restores
    /// success
    pub fn set_failure(&self, mode: Option<FailureMode>) {
        self.state.lock().failure = mode;
    }

    /// Set the body returned by `query`
    pub fn set_query_response<S: Into<String>>(&self, body: S) {
        self.state.lock().query_response = Some(body.into());
    }

    /// All payloads handed to `send`, in order, including failed attempts
    pub fn sent_payloads(&self) -> Vec<String> {
        self.state.lock().payloads.clone()
    }

    /// All individual lines across every sent payload, in order
    pub fn sent_lines(&self) -> Vec<String> {
        self.state
            .lock()
            .payloads
            .iter()
            .flat_map(|p| p.lines().map(str::to_string))
            .collect()
    }

    /// Number of send attempts so far
    pub fn send_count(&self) -> u64 {
        self.stats.total_sends.load(Ordering::Relaxed)
    }

    /// Number of failed send attempts so far
    pub fn failed_send_count(&self) -> u64 {
        self.stats.failed_sends.load(Ordering::Relaxed)
    }

    /// Number of queries so far
    pub fn query_count(&self) -> u64 {
        self.stats.total_queries.load(Ordering::Relaxed)
    }

    /// The operation log (for assertions)
    pub fn operations(&self) -> Vec<String> {
        self.state.lock().operations.clone()
    }

    /// Check whether a specific operation was recorded
    pub fn has_operation(&self, operation: &str) -> bool {
        self.state
            .lock()
            .operations
            .iter()
            .any(|op| op.contains(operation))
    }

    /// Clear recorded payloads and operations
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.payloads.clear();
        state.operations.clear();
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn send(&self, payload: &str) -> Result<(), TransportError> {
        self.stats.total_sends.fetch_add(1, Ordering::Relaxed);

        let mut state = self.state.lock();
        state.payloads.push(payload.to_string());
        state
            .operations
            .push(format!("send({} lines)", payload.lines().count()));

        trace!(lines = payload.lines().count(), "mock transport send");

        match state.failure {
            None => Ok(()),
            Some(mode) => {
                self.stats.failed_sends.fetch_add(1, Ordering::Relaxed);
                Err(match mode {
                    FailureMode::BadRequest => {
                        TransportError::BadRequest("scripted bad request".into())
                    }
                    FailureMode::ServerError => {
                        TransportError::ServerError("scripted server error".into())
                    }
                    FailureMode::ConnectionFailed => {
                        TransportError::ConnectionFailed("scripted connection failure".into())
                    }
                })
            }
        }
    }

    fn query(&self, text: &str) -> Result<String, TransportError> {
        self.stats.total_queries.fetch_add(1, Ordering::Relaxed);

        let mut state = self.state.lock();
        state.operations.push(format!("query({})", text));

        match &state.query_response {
            Some(body) => Ok(body.clone()),
            None => Err(TransportError::QueryUnsupported),
        }
    }
}
