//! Time sources for response timing.
//!
//! Widgets record when a choice was made as milliseconds elapsed since the
//! start of the current experiment step. The time source is injected so that
//! hosts can share one step clock between widgets and tests can drive time
//! by hand.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// A monotonic source of "milliseconds since step start".
pub trait Clock: Send + Sync + fmt::Debug {
    /// Milliseconds elapsed since the clock's origin.
    fn elapsed_ms(&self) -> u64;
}

/// Wall-clock time measured from a resettable [`Instant`].
#[derive(Debug)]
pub struct SystemClock {
    origin: Mutex<Instant>,
}

impl SystemClock {
    /// Create a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Mutex::new(Instant::now()),
        }
    }

    /// Move the origin to now, e.g. when a new step begins.
    pub fn restart(&self) {
        *self.origin.lock() = Instant::now();
    }

    /// Time elapsed since the origin.
    pub fn elapsed(&self) -> Duration {
        self.origin.lock().elapsed()
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Create a manual clock reading `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    /// Set the current reading.
    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }

    /// Advance the reading by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn elapsed_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.elapsed_ms(), 100);
        clock.advance(50);
        assert_eq!(clock.elapsed_ms(), 150);
        clock.set(10);
        assert_eq!(clock.elapsed_ms(), 10);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.elapsed_ms();
        std::thread::sleep(Duration::from_millis(2));
        assert!(clock.elapsed_ms() >= first);
        clock.restart();
        assert!(clock.elapsed() < Duration::from_secs(5));
    }
}
