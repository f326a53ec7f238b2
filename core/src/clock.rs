//! Cooperative timers driven by the host loop.
//!
//! Nothing here sleeps or spawns. The host passes the current [`Instant`] into
//! every update, and timers only report whether they are due at that moment.

use core::{ops::Add, time::Duration};

/// Milliseconds since the application started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Instant(u64);

impl Instant {
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    pub fn duration_since(self, earlier: Instant) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Self::Output {
        let millis = u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX);
        Instant(self.0.saturating_add(millis))
    }
}

/// Periodic timer. Missed periods collapse into a single firing.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    period: Duration,
    next: Instant,
}

impl Interval {
    /// First firing happens one full period after `now`.
    pub fn new(period: Duration, now: Instant) -> Self {
        Self { period, next: now + period }
    }

    pub fn due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next = now + self.period;
        true
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

/// One-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn after(now: Instant, delay: Duration) -> Self {
        Self { at: now + delay }
    }

    pub fn at(&self) -> Instant {
        self.at
    }

    pub fn expired(&self, now: Instant) -> bool {
        now >= self.at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_fires_once_per_period() {
        let mut interval = Interval::new(Duration::from_millis(2000), Instant::from_millis(0));
        assert!(!interval.due(Instant::from_millis(1999)));
        assert!(interval.due(Instant::from_millis(2000)));
        assert!(!interval.due(Instant::from_millis(2000)));
        assert!(!interval.due(Instant::from_millis(3999)));
        assert!(interval.due(Instant::from_millis(4000)));
    }

    #[test]
    fn interval_collapses_missed_periods() {
        let mut interval = Interval::new(Duration::from_millis(100), Instant::from_millis(0));
        assert!(interval.due(Instant::from_millis(1050)));
        assert!(!interval.due(Instant::from_millis(1100)));
        assert!(interval.due(Instant::from_millis(1150)));
    }

    #[test]
    fn deadline_expires_at_its_instant() {
        let deadline = Deadline::after(Instant::from_millis(500), Duration::from_secs(1));
        assert_eq!(deadline.at(), Instant::from_millis(1500));
        assert!(!deadline.expired(Instant::from_millis(1499)));
        assert!(deadline.expired(Instant::from_millis(1500)));
    }
}
