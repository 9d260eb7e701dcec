//! # InfluxDB Client Library
//!
//! Batching write client for InfluxDB-compatible time-series stores.
//!
//! The engine accumulates encoded points in a mutex-guarded buffer and
//! flushes them on a size trigger, on a periodic timer, on an explicit
//! `flush`, or on drop. Transmission outcomes are classified into a small
//! result taxonomy; connection-state changes are reported through
//! de-duplicated callbacks.
//!
//! ```no_run
//! use std::time::Duration;
//! use influxdb_client::{InfluxClient, Point};
//!
//! let client = InfluxClient::from_url("http://localhost:8086?db=test").unwrap();
//! client.batch_of(32, Duration::from_millis(500));
//! client.on_connection_error(|| eprintln!("influxdb unreachable"));
//!
//! client.write(Point::new("cpu").add_tag("host", "web1").add_field("load", 0.72));
//! ```

// Core modules
pub mod buffer;
pub mod client;
pub mod config;
pub mod http;
pub mod mock_transport;
pub mod notifier;
pub mod query;
pub mod scheduler;
pub mod transmit;
pub mod transport;
pub mod udp;

// Re-export commonly used types
pub use client::{ClientStatsSnapshot, InfluxClient};
pub use config::BatchConfig;
pub use http::HttpTransport;
pub use mock_transport::{FailureMode, MockTransport};
pub use notifier::ConnectionStatus;
pub use transmit::WriteResult;
pub use transport::{BoxedTransport, Transport, TransportError};
pub use udp::UdpTransport;

// Re-export the value types so callers only need one crate
pub use influxdb_core::{FieldValue, InfluxError, InfluxResult, Point, Timestamp};
