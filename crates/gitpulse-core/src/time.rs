//! Time abstractions for testable timestamp stamping.
//!
//! The storage layer stamps `created_at` from an injected clock so tests
//! can control insertion time deterministically. Production code uses
//! `RealClock`.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

/// Clock abstraction for time operations.
///
/// Enables dependency injection of time sources instead of ambient
/// `SystemTime::now()` calls inside the storage layer.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Returns the current instant for duration measurements.
    fn now(&self) -> Instant;

    /// Returns the current system time for timestamps.
    fn now_system(&self) -> SystemTime;
}

/// Real clock implementation using system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealClock;

impl RealClock {
    /// Creates a new real clock instance.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for RealClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn now_system(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Test clock for deterministic time control.
///
/// System time starts at the real current time and only moves when
/// advanced, so insertion-order tests can place timestamps exactly.
#[derive(Debug, Clone)]
pub struct TestClock {
    /// System time as nanoseconds since `UNIX_EPOCH`.
    system_ns: Arc<AtomicU64>,
    /// Base instant for monotonic time calculations.
    base_instant: Instant,
    /// Monotonic offset in nanoseconds since `base_instant`.
    monotonic_ns: Arc<AtomicU64>,
}

impl TestClock {
    /// Creates a new test clock pinned at the current time.
    pub fn new() -> Self {
        let now_ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or(0);

        Self {
            system_ns: Arc::new(AtomicU64::new(now_ns)),
            base_instant: Instant::now(),
            monotonic_ns: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Advances both system and monotonic time by `duration`.
    pub fn advance(&self, duration: Duration) {
        let ns = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.system_ns.fetch_add(ns, Ordering::SeqCst);
        self.monotonic_ns.fetch_add(ns, Ordering::SeqCst);
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.base_instant + Duration::from_nanos(self.monotonic_ns.load(Ordering::SeqCst))
    }

    fn now_system(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_nanos(self.system_ns.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_frozen_until_advanced() {
        let clock = TestClock::new();
        let first = clock.now_system();
        let second = clock.now_system();
        assert_eq!(first, second);
    }

    #[test]
    fn advancing_moves_system_time_exactly() {
        let clock = TestClock::new();
        let before = clock.now_system();
        clock.advance(Duration::from_secs(90));
        let after = clock.now_system();
        assert_eq!(after.duration_since(before).unwrap(), Duration::from_secs(90));
    }

    #[test]
    fn clones_share_the_same_timeline() {
        let clock = TestClock::new();
        let other = clock.clone();
        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.now_system(), other.now_system());
    }
}
