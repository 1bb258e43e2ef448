//! Clock sources.
//!
//! The scheduler needs two notions of "now":
//!
//! - **Audio time**: a monotonic, sub-millisecond clock in seconds. Notes are
//!   scheduled against it and sounds start exactly at the audio time they were
//!   given.
//! - **Wall time**: a monotonic duration since the clock was created. Timers,
//!   tap tempo and training sessions run on it.
//!
//! [`ManualClock`] is advanced explicitly, which makes simulated sessions fully
//! deterministic. [`SampleClock`] derives audio time from the number of frames an
//! audio renderer has produced.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A source of audio time and wall time.
pub trait Clock {
    /// Current audio time in seconds.
    fn audio_time(&self) -> f64;

    /// Time elapsed since the clock's epoch.
    fn wall_time(&self) -> Duration;
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying time, so a test can keep one handle and
/// give another to a [`Metronome`](crate::Metronome).
///
/// # Examples
///
/// ```
/// use clave::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
///
/// handle.advance(Duration::from_millis(250));
/// assert_eq!(clock.audio_time(), 0.25);
/// assert_eq!(clock.wall_time(), Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    /// Audio time as `f64` bits
    audio: Arc<AtomicU64>,
    /// Wall time in nanoseconds
    wall: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock with both audio and wall time at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances audio time and wall time together.
    pub fn advance(&self, by: Duration) {
        self.advance_audio(by.as_secs_f64());
        self.advance_wall(by);
    }

    /// Advances only the audio time, by `seconds`.
    pub fn advance_audio(&self, seconds: f64) {
        let now = self.audio_time();
        self.audio
            .store((now + seconds).to_bits(), Ordering::Relaxed);
    }

    /// Advances only the wall time.
    pub fn advance_wall(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.wall.fetch_add(nanos, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn audio_time(&self) -> f64 {
        f64::from_bits(self.audio.load(Ordering::Relaxed))
    }

    fn wall_time(&self) -> Duration {
        Duration::from_nanos(self.wall.load(Ordering::Relaxed))
    }
}

/// Audio time derived from a frame counter.
///
/// The renderer that owns the frame counter (see
/// [`ToneMixer`](crate::sound::ToneMixer)) increments it once per rendered
/// frame, so audio time is exactly `frames / sample_rate`. Wall time comes from
/// [`Instant`].
///
/// # Examples
///
/// ```
/// use clave::{Clock, SampleClock};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// let frames = Arc::new(AtomicU64::new(0));
/// let clock = SampleClock::new(frames.clone(), 48000);
///
/// frames.store(24000, Ordering::Relaxed);
/// assert_eq!(clock.audio_time(), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct SampleClock {
    frames: Arc<AtomicU64>,
    sample_rate: u32,
    epoch: Instant,
}

impl SampleClock {
    /// Creates a clock reading `frames` at `sample_rate` Hz.
    pub fn new(frames: Arc<AtomicU64>, sample_rate: u32) -> Self {
        Self {
            frames,
            sample_rate,
            epoch: Instant::now(),
        }
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Clock for SampleClock {
    fn audio_time(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    fn wall_time(&self) -> Duration {
        self.epoch.elapsed()
    }
}
