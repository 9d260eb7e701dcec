//! Background periodic flush worker
//!
//! Owns at most one background thread that forces a flush every configured
//! period. The wait is computed from the absolute time of the last flush, so
//! scheduler jitter and spurious wakeups never cause an early flush; the
//! worker simply re-checks and sleeps the remaining time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::debug;

struct SchedulerState {
    period: Duration,
    stop: bool,
}

struct SchedulerShared {
    state: Mutex<SchedulerState>,
    wakeup: Condvar,
}

/// Owns the single background thread that performs periodic flushes.
///
/// `start` while a worker is already active only updates the period in
/// place; `stop` is idempotent and joins the worker before returning, so no
/// flush can be in flight once it completes.
pub struct FlushScheduler {
    shared: Arc<SchedulerShared>,
    running: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl FlushScheduler {
    /// Create a scheduler with no worker running
    pub fn new() -> Self {
        Self {
            shared: Arc::new(SchedulerShared {
                state: Mutex::new(SchedulerState {
                    period: Duration::ZERO,
                    stop: false,
                }),
                wakeup: Condvar::new(),
            }),
            running: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }

    /// Whether a worker thread is currently active
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start the worker with the given period, or update the period of an
    /// already-running worker in place (the thread is not restarted).
    ///
    /// A zero period means "no periodic flushing" and stops any active
    /// worker instead. `flush` is invoked from the worker thread; it must
    /// take whatever locks it needs itself.
    pub fn start<F>(&self, period: Duration, flush: F)
    where
        F: Fn() + Send + 'static,
    {
        if period.is_zero() {
            self.stop();
            return;
        }
        {
            let mut state = self.shared.state.lock();
            state.period = period;
            state.stop = false;
        }
        // Wake an active worker so it re-evaluates with the new period.
        self.shared.wakeup.notify_all();

        let mut worker = self.worker.lock();
        if worker.is_some() {
            return;
        }

        debug!(?period, "starting periodic flush worker");
        self.running.store(true, Ordering::SeqCst);
        let shared = Arc::clone(&self.shared);
        let running = Arc::clone(&self.running);
        *worker = Some(std::thread::spawn(move || {
            run_worker(shared, flush);
            running.store(false, Ordering::SeqCst);
        }));
    }

    /// Stop the worker and block until it has exited. No-op when no worker
    /// is active.
    pub fn stop(&self) {
        let handle = self.worker.lock().take();
        let Some(handle) = handle else {
            return;
        };

        {
            let mut state = self.shared.state.lock();
            state.stop = true;
        }
        self.shared.wakeup.notify_all();

        debug!("stopping periodic flush worker");
        let _ = handle.join();
    }
}

impl Default for FlushScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FlushScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker<F: Fn()>(shared: Arc<SchedulerShared>, flush: F) {
    let mut last_flush = Instant::now();
    let mut state = shared.state.lock();
    loop {
        if state.stop {
            break;
        }

        let elapsed = last_flush.elapsed();
        if elapsed < state.period {
            // Wait out the remainder; a timeout, a reconfiguration, or a
            // spurious wakeup all land back here for a fresh check.
            let remaining = state.period - elapsed;
            shared.wakeup.wait_for(&mut state, remaining);
            continue;
        }

        // Flush without holding the scheduler lock; the buffer has its own.
        drop(state);
        flush();
        last_flush = Instant::now();
        state = shared.state.lock();
    }
    debug!("periodic flush worker exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn flush_counter() -> (Arc<AtomicUsize>, impl Fn() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let clone = count.clone();
        (count, move || {
            clone.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_worker_fires_periodically() {
        let scheduler = FlushScheduler::new();
        let (count, flush) = flush_counter();

        scheduler.start(Duration::from_millis(20), flush);
        std::thread::sleep(Duration::from_millis(130));
        scheduler.stop();

        let fired = count.load(Ordering::SeqCst);
        assert!(fired >= 2, "expected at least 2 flushes, got {}", fired);
        assert!(fired <= 8, "expected at most 8 flushes, got {}", fired);
    }

    #[test]
    fn test_stop_joins_and_silences_worker() {
        let scheduler = FlushScheduler::new();
        let (count, flush) = flush_counter();

        scheduler.start(Duration::from_millis(10), flush);
        std::thread::sleep(Duration::from_millis(35));
        scheduler.stop();
        assert!(!scheduler.is_running());

        let after_stop = count.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn test_zero_period_stops_worker() {
        let scheduler = FlushScheduler::new();
        let (count, flush) = flush_counter();

        scheduler.start(Duration::from_millis(10), flush);
        std::thread::sleep(Duration::from_millis(25));
        scheduler.start(Duration::ZERO, || {});
        assert!(!scheduler.is_running());

        let after_stop = count.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let scheduler = FlushScheduler::new();
        scheduler.stop();
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_start_while_running_keeps_single_worker() {
        let scheduler = FlushScheduler::new();
        let (count, flush) = flush_counter();
        let (second_count, second_flush) = flush_counter();

        scheduler.start(Duration::from_millis(10), flush);
        // Second start only retunes the period; the new closure is dropped.
        scheduler.start(Duration::from_millis(10), second_flush);

        std::thread::sleep(Duration::from_millis(45));
        scheduler.stop();

        assert!(count.load(Ordering::SeqCst) >= 1);
        assert_eq!(second_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_period_update_takes_effect_in_place() {
        let scheduler = FlushScheduler::new();
        let (count, flush) = flush_counter();

        // Far too slow to fire during the test on its own.
        scheduler.start(Duration::from_secs(3600), flush);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::SeqCst), 0);

        scheduler.start(Duration::from_millis(10), || {});
        std::thread::sleep(Duration::from_millis(60));
        scheduler.stop();

        assert!(count.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn test_restart_after_stop() {
        let scheduler = FlushScheduler::new();
        let (count, flush) = flush_counter();

        scheduler.start(Duration::from_millis(10), flush);
        std::thread::sleep(Duration::from_millis(25));
        scheduler.stop();
        let first_run = count.load(Ordering::SeqCst);
        assert!(first_run >= 1);

        let (second, second_flush) = flush_counter();
        scheduler.start(Duration::from_millis(10), second_flush);
        std::thread::sleep(Duration::from_millis(35));
        scheduler.stop();
        assert!(second.load(Ordering::SeqCst) >= 1);
    }
}
