//! # InfluxDB Core Library
//!
//! Shared library providing the value types and wire encoding used by the
//! influxdb-rs client:
//!
//! - **Data Types**: measurement points, field values, and timestamps
//! - **Line Protocol**: encoding of points into the InfluxDB text wire format
//! - **Errors**: the common error type shared across the workspace
//!
//! The types here are plain values with no concurrency or I/O; everything
//! stateful lives in the `influxdb-client` crate.

pub mod error;
pub mod line_protocol;
pub mod point;
pub mod time;

// Re-export commonly used types
pub use error::{InfluxError, InfluxResult};
pub use point::{FieldValue, Point};
pub use time::Timestamp;

/// Version information for influxdb-rs
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
