//! Transport interface and implementations
//!
//! A transport delivers one serialized line-protocol payload to the remote
//! store and optionally executes a read-only query. The engine consumes this
//! capability; it never retries or buffers inside the transport itself.

use std::sync::Arc;

use influxdb_core::InfluxError;
use thiserror::Error;

/// Failure kinds a transport can report.
///
/// The three send failures are deliberately coarse: they are exactly the
/// distinctions the batching engine needs to decide whether a batch is
/// resolved (clear it) or transient (keep it for retry).
#[derive(Error, Debug)]
pub enum TransportError {
    /// The server received the payload and rejected it as malformed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The server received the payload but failed internally.
    #[error("server error: {0}")]
    ServerError(String),

    /// The payload never reached the server.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The transport has no query capability.
    #[error("queries are not supported by the selected transport")]
    QueryUnsupported,
}

impl From<TransportError> for InfluxError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::BadRequest(msg) => InfluxError::BadRequest(msg),
            TransportError::ServerError(msg) => InfluxError::ServerError(msg),
            TransportError::ConnectionFailed(msg) => InfluxError::Connection(msg),
            TransportError::QueryUnsupported => InfluxError::QueryUnsupported,
        }
    }
}

/// Trait defining the wire delivery capability consumed by the client.
///
/// Implementations must be usable from the caller's thread and the background
/// flush worker concurrently.
pub trait Transport: Send + Sync {
    /// Send one payload (a newline-joined group of line-protocol lines).
    fn send(&self, payload: &str) -> Result<(), TransportError>;

    /// Execute a read-only query, returning the raw response body.
    fn query(&self, text: &str) -> Result<String, TransportError> {
        let _ = text;
        Err(TransportError::QueryUnsupported)
    }
}

/// Type alias for a shared transport trait object
pub type BoxedTransport = Arc<dyn Transport>;
