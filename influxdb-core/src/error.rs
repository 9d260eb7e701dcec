//! Error types for influxdb-rs operations

use thiserror::Error;

/// Result type for influxdb-rs operations
pub type InfluxResult<T> = Result<T, InfluxError>;

/// Error types for influxdb-rs operations
#[derive(Error, Debug)]
pub enum InfluxError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Queries are not supported by the selected transport")]
    QueryUnsupported,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl InfluxError {
    /// Create a new connection error
    pub fn connection<S: Into<String>>(message: S) -> Self {
        Self::Connection(message.into())
    }

    /// Create a new query error
    pub fn query<S: Into<String>>(message: S) -> Self {
        Self::Query(message.into())
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Check if this is a retriable error
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            InfluxError::Connection(_) | InfluxError::ServerError(_) | InfluxError::Io(_)
        )
    }

    /// Get the error category for logging/monitoring
    pub fn category(&self) -> &'static str {
        match self {
            InfluxError::BadRequest(_) => "bad_request",
            InfluxError::ServerError(_) => "server_error",
            InfluxError::Connection(_) => "connection",
            InfluxError::Query(_) => "query",
            InfluxError::QueryUnsupported => "query_unsupported",
            InfluxError::Configuration(_) => "configuration",
            InfluxError::Parse(_) => "parse",
            InfluxError::Json(_) => "json",
            InfluxError::Io(_) => "io",
        }
    }
}
