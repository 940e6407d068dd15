//! # Progress — Hunt Counters and Status Reporter
//!
//! Shared state between the block search loop and the background status
//! reporter. Counters are atomics so rayon workers and the driver can bump
//! them lock-free; only the human-readable current-window string sits behind
//! a Mutex, written once per block.
//!
//! `found` counts counterexamples, so it is expected to stay at zero for the
//! lifetime of the program. The reporter prints it anyway: a nonzero value
//! in a status line is the headline, not the report at the end.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

pub struct Progress {
    /// Candidates fully evaluated so far.
    pub tested: AtomicU64,
    /// Composites that passed both conjecture conditions.
    pub found: AtomicU64,
    /// Current block window, e.g. "p=[1000001..2000000]".
    pub current: Mutex<String>,
    start: Instant,
    shutdown: AtomicBool,
}

impl Progress {
    pub fn new() -> Arc<Self> {
        Arc::new(Progress {
            tested: AtomicU64::new(0),
            found: AtomicU64::new(0),
            current: Mutex::new(String::new()),
            start: Instant::now(),
            shutdown: AtomicBool::new(false),
        })
    }

    /// Spawn the status thread, waking every `interval` until
    /// [`Progress::stop`] is called.
    pub fn start_reporter(self: &Arc<Self>, interval: Duration) -> thread::JoinHandle<()> {
        let progress = Arc::clone(self);
        thread::spawn(move || loop {
            thread::sleep(interval);
            if progress.shutdown.load(Ordering::Relaxed) {
                break;
            }
            progress.print_status();
        })
    }

    pub fn print_status(&self) {
        let elapsed = self.start.elapsed();
        let tested = self.tested.load(Ordering::Relaxed);
        let found = self.found.load(Ordering::Relaxed);
        let current = self.current.lock().unwrap().clone();
        let rate = if elapsed.as_secs() > 0 {
            tested as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        let h = elapsed.as_secs() / 3600;
        let m = (elapsed.as_secs() % 3600) / 60;
        let s = elapsed.as_secs() % 60;
        info!(
            current = %current,
            tested,
            rate = format_args!("{:.2}", rate),
            counterexamples = found,
            elapsed = format_args!("{:02}:{:02}:{:02}", h, m, s),
            "search progress"
        );
    }

    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
