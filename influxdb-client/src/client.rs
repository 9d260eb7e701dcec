//! Batching write client façade
//!
//! `InfluxClient` composes the encoder, the batch buffer, the periodic
//! flush worker, and the connection-state notifier behind the write/query
//! surface. With batching disabled every write is transmitted immediately
//! and its classification returned to the caller; with batching enabled
//! writes are enqueued and outcomes surface through the registered
//! callbacks or an explicit `flush`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use influxdb_core::{line_protocol, InfluxError, InfluxResult, Point};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::buffer::BatchBuffer;
use crate::config::BatchConfig;
use crate::http::HttpTransport;
use crate::notifier::{ConnectionStatus, StatusNotifier};
use crate::query;
use crate::scheduler::FlushScheduler;
use crate::transmit::{classify, WriteResult};
use crate::transport::BoxedTransport;
use crate::udp::UdpTransport;

/// Counters for client activity
#[derive(Debug, Default)]
struct ClientStats {
    points_written: AtomicU64,
    batches_flushed: AtomicU64,
    transmissions: AtomicU64,
    transmission_failures: AtomicU64,
}

/// Snapshot of client counters
#[derive(Debug, Clone, serde::Serialize)]
pub struct ClientStatsSnapshot {
    pub points_written: u64,
    pub batches_flushed: u64,
    pub transmissions: u64,
    pub transmission_failures: u64,
    pub buffered_points: usize,
}

struct ClientInner {
    transport: BoxedTransport,
    notifier: StatusNotifier,
    buffer: BatchBuffer,
    global_tags: Mutex<String>,
    buffering: AtomicBool,
    batch_size: AtomicUsize,
    stats: ClientStats,
}

impl ClientInner {
    fn encode(&self, point: &Point) -> String {
        let tags = self.global_tags.lock();
        line_protocol::encode_with_tags(point, &tags)
    }

    /// Perform one transmission attempt and route the outcome through the
    /// notifier. Never retries.
    fn transmit(&self, payload: &str) -> WriteResult {
        self.stats.transmissions.fetch_add(1, Ordering::Relaxed);
        let result = classify(self.transport.send(payload));
        if result != WriteResult::Succeeded {
            self.stats.transmission_failures.fetch_add(1, Ordering::Relaxed);
            warn!(?result, bytes = payload.len(), "transmission failed");
        }
        self.notifier.observe(result);
        result
    }

    /// Flush the locked buffer contents: join, transmit, and clear when the
    /// outcome resolves the batch. Runs entirely within the caller's
    /// critical section on the buffer.
    fn flush_locked(&self, lines: &mut VecDeque<String>) -> WriteResult {
        let points = lines.len();
        let payload = BatchBuffer::join(lines);
        let result = self.transmit(&payload);
        if result.resolves_batch() {
            lines.clear();
            self.stats.batches_flushed.fetch_add(1, Ordering::Relaxed);
            debug!(points, ?result, "batch flushed");
        } else {
            debug!(points, ?result, "batch retained for retry");
        }
        result
    }

    fn flush_buffer(&self) -> Option<WriteResult> {
        if !self.buffering.load(Ordering::SeqCst) {
            return None;
        }
        self.buffer.flush_with(|lines| self.flush_locked(lines))
    }
}

/// Batching client for an InfluxDB-compatible time-series store.
pub struct InfluxClient {
    inner: Arc<ClientInner>,
    scheduler: FlushScheduler,
}

impl InfluxClient {
    /// Create a client over the given transport. Batching starts disabled;
    /// every write is transmitted immediately until `batch_of` is called.
    pub fn new(transport: BoxedTransport) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                notifier: StatusNotifier::new(),
                buffer: BatchBuffer::new(),
                global_tags: Mutex::new(String::new()),
                buffering: AtomicBool::new(false),
                batch_size: AtomicUsize::new(0),
                stats: ClientStats::default(),
            }),
            scheduler: FlushScheduler::new(),
        }
    }

    /// Create a client from a connection URL.
    ///
    /// Supported forms: `http://host:port?db=name` (also `https`) and
    /// `udp://host:port`.
    pub fn from_url(url: &str) -> InfluxResult<Self> {
        let (scheme, rest) = url
            .split_once("://")
            .ok_or_else(|| InfluxError::configuration(format!("invalid URL: {}", url)))?;
        let transport: BoxedTransport = match scheme {
            "http" | "https" => Arc::new(HttpTransport::from_url(url)?),
            "udp" => {
                let authority = rest.split('?').next().unwrap_or(rest);
                Arc::new(UdpTransport::new(authority)?)
            }
            other => {
                return Err(InfluxError::configuration(format!(
                    "unsupported scheme: {}",
                    other
                )))
            }
        };
        Ok(Self::new(transport))
    }

    /// Write one point.
    ///
    /// With batching enabled the point is enqueued and `Batched` returned;
    /// reaching the configured batch size flushes inline before returning.
    /// With batching disabled the point is transmitted immediately and the
    /// classified outcome returned.
    pub fn write(&self, point: Point) -> WriteResult {
        let line = self.inner.encode(&point);
        self.inner.stats.points_written.fetch_add(1, Ordering::Relaxed);

        if self.inner.buffering.load(Ordering::SeqCst) {
            let capacity = self.inner.batch_size.load(Ordering::SeqCst);
            let inner = &self.inner;
            self.inner.buffer.enqueue_with(line, capacity, |lines| {
                inner.flush_locked(lines);
            });
            WriteResult::Batched
        } else {
            self.inner.transmit(&line)
        }
    }

    /// Write a group of points.
    ///
    /// With batching enabled each point is enqueued individually. With
    /// batching disabled all encodings are joined into one payload and
    /// transmitted once, yielding a single classification for the whole
    /// group. An empty group is a no-op reported as `Succeeded`.
    pub fn write_points(&self, points: Vec<Point>) -> WriteResult {
        if self.inner.buffering.load(Ordering::SeqCst) {
            for point in points {
                self.write(point);
            }
            return WriteResult::Batched;
        }

        if points.is_empty() {
            return WriteResult::Succeeded;
        }

        let lines: Vec<String> = points.iter().map(|p| self.inner.encode(p)).collect();
        self.inner
            .stats
            .points_written
            .fetch_add(points.len() as u64, Ordering::Relaxed);
        self.inner.transmit(&lines.join("\n"))
    }

    /// Flush whatever is currently buffered, synchronously.
    ///
    /// Returns the transmission's classification, or `None` when batching is
    /// inactive or the buffer is empty.
    pub fn flush(&self) -> Option<WriteResult> {
        self.inner.flush_buffer()
    }

    /// Run a query through the transport and decode the response into
    /// points.
    pub fn query(&self, text: &str) -> InfluxResult<Vec<Point>> {
        let body = self.inner.transport.query(text)?;
        query::parse_response(&body)
    }

    /// Add a global tag included in every subsequently encoded point.
    ///
    /// Global tags are append-only: once added they cannot be removed.
    /// Empty keys and values are silently dropped.
    pub fn add_global_tag<K, V>(&self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let key = key.into();
        let value = value.into();
        if key.is_empty() || value.is_empty() {
            return;
        }
        let mut tags = self.inner.global_tags.lock();
        if !tags.is_empty() {
            tags.push(',');
        }
        tags.push_str(&line_protocol::escape_tag(&key));
        tags.push('=');
        tags.push_str(&line_protocol::escape_tag(&value));
    }

    /// Enable batching: accumulate up to `size` points and flush every
    /// `timeout`. A zero `timeout` disables the periodic worker; flushing
    /// then happens only on the size trigger or an explicit `flush`.
    ///
    /// Reconfiguring while points are pending never flushes by itself, even
    /// when the new size is smaller than the pending count; the new size is
    /// observed by the next write's size check.
    pub fn batch_of(&self, size: usize, timeout: Duration) {
        self.inner.batch_size.store(size, Ordering::SeqCst);
        self.inner.buffering.store(true, Ordering::SeqCst);
        info!(batch_size = size, ?timeout, "batching configured");

        if timeout.is_zero() {
            self.scheduler.stop();
        } else {
            let inner = Arc::clone(&self.inner);
            self.scheduler.start(timeout, move || {
                let _ = inner.flush_buffer();
            });
        }
    }

    /// Enable batching from a `BatchConfig`
    pub fn batch_with(&self, config: &BatchConfig) {
        self.batch_of(config.batch_size, config.flush_interval());
    }

    /// Register the callback fired when a transmission first succeeds after
    /// the connection was unknown or down. Replaces any previous callback;
    /// replayed immediately if the connection is already known healthy.
    ///
    /// Callbacks run on whichever thread performed the transmission, while
    /// the batch is still locked; they must be quick and must not call back
    /// into the client.
    pub fn on_transmission_succeeded<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.notifier.on_connected(callback);
    }

    /// Register the callback fired when the connection is first observed
    /// down. Replaces any previous callback; replayed immediately if the
    /// connection is already known down.
    pub fn on_connection_error<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.notifier.on_disconnected(callback);
    }

    /// Register the callback fired on every payload the server rejects as
    /// malformed. Replaces any previous callback; never replayed.
    pub fn on_bad_request<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.notifier.on_bad_request(callback);
    }

    /// The last observed connection status
    pub fn status(&self) -> ConnectionStatus {
        self.inner.notifier.status()
    }

    /// Snapshot of the client's activity counters
    pub fn stats(&self) -> ClientStatsSnapshot {
        ClientStatsSnapshot {
            points_written: self.inner.stats.points_written.load(Ordering::Relaxed),
            batches_flushed: self.inner.stats.batches_flushed.load(Ordering::Relaxed),
            transmissions: self.inner.stats.transmissions.load(Ordering::Relaxed),
            transmission_failures: self
                .inner
                .stats
                .transmission_failures
                .load(Ordering::Relaxed),
            buffered_points: self.inner.buffer.len(),
        }
    }
}

impl Drop for InfluxClient {
    /// Stop the periodic worker, then drain the buffer with one final flush
    /// attempt so shutdown never silently discards accepted points.
    fn drop(&mut self) {
        self.scheduler.stop();
        if self.inner.flush_buffer().is_some() {
            debug!("drained buffered points on shutdown");
        }
    }
}
