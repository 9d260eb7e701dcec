//! Classification of transmission outcomes

use crate::transport::TransportError;

/// Outcome of submitting points to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// The payload reached the server and was accepted.
    Succeeded,

    /// The point was appended to the batch; nothing was sent yet.
    Batched,

    /// The server rejected the payload as malformed.
    BadRequest,

    /// The server was reached but failed internally.
    ServerError,

    /// The server could not be reached.
    ConnectionFailed,
}

impl WriteResult {
    /// Whether this outcome resolves the in-flight batch.
    ///
    /// A resolved batch is cleared: either it was accepted, or it is
    /// permanently malformed and retrying it would fail forever.
    pub fn resolves_batch(&self) -> bool {
        matches!(self, WriteResult::Succeeded | WriteResult::BadRequest)
    }

    /// Whether the request reached the server at all.
    ///
    /// A rejected or failed request still proves the connection is alive;
    /// only `ConnectionFailed` does not.
    pub fn server_reached(&self) -> bool {
        !matches!(self, WriteResult::ConnectionFailed)
    }
}

/// Classify the outcome of a single transport send.
///
/// The mapping is 1:1 with the transport's declared failure kinds. A
/// transport that cannot serve the request at all is treated like a
/// caller-side defect, the same as a malformed payload.
pub fn classify(outcome: Result<(), TransportError>) -> WriteResult {
    match outcome {
        Ok(()) => WriteResult::Succeeded,
        Err(TransportError::BadRequest(_)) | Err(TransportError::QueryUnsupported) => {
            WriteResult::BadRequest
        }
        Err(TransportError::ServerError(_)) => WriteResult::ServerError,
        Err(TransportError::ConnectionFailed(_)) => WriteResult::ConnectionFailed,
    }
}
