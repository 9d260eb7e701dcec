//! Mutex-guarded batch buffer for encoded line-protocol lines
//!
//! The buffer is the only state shared between the caller's thread and the
//! background flush worker. Every read and mutation happens under one
//! exclusive lock, and a flush (join, transmit, conditional clear) runs as a
//! single critical section: a concurrent `enqueue` either lands in the batch
//! being flushed or waits and starts a fresh one, never both.

use std::collections::VecDeque;

use parking_lot::Mutex;

/// Ordered queue of already-encoded line-protocol strings.
pub struct BatchBuffer {
    lines: Mutex<VecDeque<String>>,
}

impl BatchBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(VecDeque::new()),
        }
    }

    /// Append a line. If the buffer then holds at least `capacity` lines,
    /// `flush` is invoked on the locked contents within the same critical
    /// section, so the size check and the flush are atomic with respect to
    /// other writers.
    pub fn enqueue_with<F>(&self, line: String, capacity: usize, flush: F)
    where
        F: FnOnce(&mut VecDeque<String>),
    {
        let mut lines = self.lines.lock();
        lines.push_back(line);
        if lines.len() >= capacity {
            flush(&mut lines);
        }
    }

    /// Run `flush` on the locked contents, unless the buffer is empty.
    ///
    /// Returns the closure's result, or `None` when there was nothing to
    /// flush. The closure decides whether to clear the queue.
    pub fn flush_with<F, R>(&self, flush: F) -> Option<R>
    where
        F: FnOnce(&mut VecDeque<String>) -> R,
    {
        let mut lines = self.lines.lock();
        if lines.is_empty() {
            return None;
        }
        Some(flush(&mut lines))
    }

    /// Join queued lines into one newline-separated payload without
    /// mutating the queue.
    pub fn join(lines: &VecDeque<String>) -> String {
        let mut payload = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                payload.push('\n');
            }
            payload.push_str(line);
        }
        payload
    }

    /// Get the current number of buffered lines
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl Default for BatchBuffer {
    fn default() -> Self {
        Self::new()
    }
}
