//! Cancellable repeating timers driven by an external poll loop.
//!
//! Nothing here sleeps or spawns. The owner asks a timer whether it is due at a
//! given wall time, does its work, and re-arms it explicitly.

use std::time::Duration;

/// A repeating timer with an explicit deadline.
///
/// A timer is either armed (it has a deadline) or cancelled. Firing disarms it;
/// the owner then re-arms it either relative to "now" with [`arm`](Self::arm),
/// which lets late polls stretch the period, or relative to the deadline that
/// just fired with [`arm_at`](Self::arm_at), which keeps a fixed cadence.
///
/// # Examples
///
/// ```
/// use clave::RepeatingTimer;
/// use std::time::Duration;
///
/// let mut timer = RepeatingTimer::new(Duration::from_millis(25));
/// timer.arm(Duration::ZERO);
///
/// assert_eq!(timer.fire(Duration::from_millis(10)), None);
/// assert_eq!(
///     timer.fire(Duration::from_millis(30)),
///     Some(Duration::from_millis(25))
/// );
/// assert!(!timer.is_armed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatingTimer {
    interval: Duration,
    deadline: Option<Duration>,
}

impl RepeatingTimer {
    /// Creates a cancelled timer with the given period.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// Returns the period `arm` schedules with.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arms the timer to fire one interval after `now`.
    pub fn arm(&mut self, now: Duration) {
        self.deadline = Some(now + self.interval);
    }

    /// Arms the timer to fire at exactly `deadline`.
    pub fn arm_at(&mut self, deadline: Duration) {
        self.deadline = Some(deadline);
    }

    /// Disarms the timer. A cancelled timer never fires.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` while a deadline is set.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline, if armed.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// If the timer is armed and its deadline has been reached, disarms it and
    /// returns the deadline that fired.
    pub fn fire(&mut self, now: Duration) -> Option<Duration> {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                Some(deadline)
            }
            _ => None,
        }
    }
}
