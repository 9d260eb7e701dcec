//! UDP transport
//!
//! Fire-and-forget datagram delivery. The only failure a sender can observe
//! is a local socket error, so every error maps to a connection failure;
//! there is no server feedback and no query capability.

use std::net::{ToSocketAddrs, UdpSocket};

use influxdb_core::{InfluxError, InfluxResult};
use tracing::debug;

use crate::transport::{Transport, TransportError};

/// Datagram transport for an InfluxDB UDP listener.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Create a transport sending to `host:port`.
    pub fn new<A: ToSocketAddrs>(addr: A) -> InfluxResult<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect(addr).map_err(|e| {
            InfluxError::connection(format!("cannot resolve UDP endpoint: {}", e))
        })?;
        debug!(peer = ?socket.peer_addr().ok(), "udp transport ready");
        Ok(Self { socket })
    }
}

impl Transport for UdpTransport {
    fn send(&self, payload: &str) -> Result<(), TransportError> {
        // One payload, one datagram. Oversized batches exceed the datagram
        // limit and surface as an OS-level error here.
        self.socket
            .send(payload.as_bytes())
            .map(|_| ())
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))
    }
}
