//! Practice sessions: a countdown timer and a gradual tempo ramp.
//!
//! A [`TrainingConfig`] is owned by the caller and outlives sessions. Each time
//! the metronome starts, a [`TrainingSession`] is created from it; the session
//! is dropped when the metronome stops.
//!
//! Two independent features can be enabled:
//!
//! - **Session timer**: counts down `session_minutes` one second at a time and
//!   ends the session at zero.
//! - **BPM progression**: starts at `start_bpm` and raises the tempo by
//!   `bpm_increment` every `interval_secs`, never past `end_bpm`.

use crate::tempo::{MAX_BPM, MIN_BPM, TempoState};
use std::time::Duration;

/// Training settings.
///
/// Bpm values are clamped to the supported tempo range and the duration and
/// step values to at least 1 by the `with_*` builders and by [`clamped`].
///
/// [`clamped`]: TrainingConfig::clamped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrainingConfig {
    pub session_enabled: bool,
    /// Session length in minutes
    pub session_minutes: u32,
    pub progression_enabled: bool,
    pub start_bpm: u16,
    pub end_bpm: u16,
    /// Seconds between tempo increases
    pub interval_secs: u32,
    pub bpm_increment: u16,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            session_enabled: false,
            session_minutes: 5,
            progression_enabled: false,
            start_bpm: 60,
            end_bpm: 120,
            interval_secs: 60,
            bpm_increment: 5,
        }
    }
}

impl TrainingConfig {
    /// Enables the session timer with the given length.
    pub fn with_session(mut self, minutes: u32) -> Self {
        self.session_enabled = true;
        self.session_minutes = minutes.max(1);
        self
    }

    /// Enables BPM progression from `start_bpm` to `end_bpm`.
    pub fn with_progression(mut self, start_bpm: u16, end_bpm: u16) -> Self {
        self.progression_enabled = true;
        self.start_bpm = start_bpm.clamp(MIN_BPM, MAX_BPM);
        self.end_bpm = end_bpm.clamp(MIN_BPM, MAX_BPM);
        self
    }

    /// Sets the time between tempo increases, at least 1 s.
    pub fn with_interval_secs(mut self, secs: u32) -> Self {
        self.interval_secs = secs.max(1);
        self
    }

    /// Sets how many BPM each increase adds, at least 1.
    pub fn with_bpm_increment(mut self, increment: u16) -> Self {
        self.bpm_increment = increment.max(1);
        self
    }

    /// The same settings with every value brought into range.
    pub fn clamped(self) -> Self {
        Self {
            session_minutes: self.session_minutes.max(1),
            start_bpm: self.start_bpm.clamp(MIN_BPM, MAX_BPM),
            end_bpm: self.end_bpm.clamp(MIN_BPM, MAX_BPM),
            interval_secs: self.interval_secs.max(1),
            bpm_increment: self.bpm_increment.max(1),
            ..self
        }
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_secs))
    }
}

/// Result of one second of the session countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTick {
    Running { remaining_secs: u32 },
    Finished,
}

/// Runtime state of one training session.
///
/// # Examples
///
/// ```
/// use clave::{TempoState, TrainingConfig, TrainingSession};
/// use std::time::Duration;
///
/// let config = TrainingConfig::default()
///     .with_progression(60, 120)
///     .with_interval_secs(10);
/// let mut tempo = TempoState::default();
///
/// let mut session = TrainingSession::start(config, &mut tempo, Duration::ZERO);
/// assert_eq!(tempo.bpm(), 60);
///
/// assert_eq!(session.on_scheduler_tick(&mut tempo, Duration::from_secs(9)), None);
/// assert_eq!(session.on_scheduler_tick(&mut tempo, Duration::from_secs(10)), Some(65));
/// assert_eq!(tempo.bpm(), 65);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSession {
    config: TrainingConfig,
    session_remaining_secs: Option<u32>,
    last_increase_at: Duration,
    bar_count: u64,
    started_at: Duration,
}

impl TrainingSession {
    /// Starts a session at wall time `now`.
    ///
    /// With progression enabled the tempo is forced to `start_bpm`.
    pub fn start(config: TrainingConfig, tempo: &mut TempoState, now: Duration) -> Self {
        let config = config.clamped();

        let session_remaining_secs = config
            .session_enabled
            .then(|| config.session_minutes.saturating_mul(60));

        if config.progression_enabled {
            tempo.set_bpm(config.start_bpm);
        }

        log::debug!(
            "training session started: timer {:?}s, progression {}",
            session_remaining_secs,
            if config.progression_enabled {
                format!("{} -> {} bpm", config.start_bpm, config.end_bpm)
            } else {
                "off".to_string()
            }
        );

        Self {
            config,
            session_remaining_secs,
            last_increase_at: now,
            bar_count: 0,
            started_at: now,
        }
    }

    /// Returns the clamped settings this session runs with.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Applies BPM progression. Called once per scheduler tick.
    ///
    /// Returns the new tempo when it was raised. An increase that would pass
    /// `end_bpm` is skipped, and the interval keeps running from the last
    /// successful increase.
    pub fn on_scheduler_tick(&mut self, tempo: &mut TempoState, now: Duration) -> Option<u16> {
        if !self.config.progression_enabled {
            return None;
        }
        if now.saturating_sub(self.last_increase_at) < self.config.interval() {
            return None;
        }

        let next = tempo.bpm().saturating_add(self.config.bpm_increment);
        if next > self.config.end_bpm {
            return None;
        }

        tempo.set_bpm(next);
        self.last_increase_at = now;
        log::info!("training progression: tempo raised to {} bpm", tempo.bpm());
        Some(tempo.bpm())
    }

    /// Counts down one second.
    ///
    /// Returns `None` when the session timer is disabled.
    pub fn on_second(&mut self) -> Option<SessionTick> {
        let remaining = self.session_remaining_secs.as_mut()?;
        *remaining = remaining.saturating_sub(1);

        if *remaining == 0 {
            Some(SessionTick::Finished)
        } else {
            Some(SessionTick::Running {
                remaining_secs: *remaining,
            })
        }
    }

    /// Seconds left on the session timer, if enabled.
    pub fn remaining_secs(&self) -> Option<u32> {
        self.session_remaining_secs
    }

    /// How far `bpm` is along the progression, from 0.0 to 1.0.
    pub fn progress(&self, bpm: u16) -> f64 {
        let (start, end) = (self.config.start_bpm as f64, self.config.end_bpm as f64);
        if start == end {
            return if bpm as f64 >= end { 1.0 } else { 0.0 };
        }
        ((bpm as f64 - start) / (end - start)).clamp(0.0, 1.0)
    }

    /// Counts a completed bar. Called when a bar's first beat is scheduled.
    pub fn count_bar(&mut self) {
        self.bar_count += 1;
    }

    /// Number of bars started since the session began.
    pub fn bar_count(&self) -> u64 {
        self.bar_count
    }

    /// Wall time since the session started.
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }
}

/// Formats whole seconds as `mm:ss`.
///
/// ```
/// assert_eq!(clave::format_clock(65), "01:05");
/// assert_eq!(clave::format_clock(300), "05:00");
/// ```
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    fn progression(start: u16, end: u16, interval: u32, increment: u16) -> TrainingConfig {
        TrainingConfig::default()
            .with_progression(start, end)
            .with_interval_secs(interval)
            .with_bpm_increment(increment)
    }

    #[test]
    fn test_default_config() {
        let config = TrainingConfig::default();
        assert!(!config.session_enabled);
        assert!(!config.progression_enabled);
        assert_eq!(config.session_minutes, 5);
        assert_eq!((config.start_bpm, config.end_bpm), (60, 120));
        assert_eq!(config.interval_secs, 60);
        assert_eq!(config.bpm_increment, 5);
    }

    #[test]
    fn test_config_clamping() {
        let config = TrainingConfig {
            session_minutes: 0,
            start_bpm: 10,
            end_bpm: 1000,
            interval_secs: 0,
            bpm_increment: 0,
            ..TrainingConfig::default()
        }
        .clamped();
        assert_eq!(config.session_minutes, 1);
        assert_eq!((config.start_bpm, config.end_bpm), (MIN_BPM, MAX_BPM));
        assert_eq!(config.interval_secs, 1);
        assert_eq!(config.bpm_increment, 1);
    }

    #[test]
    fn test_start_without_features() {
        let mut tempo = TempoState::new(100, 4);
        let session = TrainingSession::start(TrainingConfig::default(), &mut tempo, 3 * SEC);
        assert_eq!(tempo.bpm(), 100);
        assert_eq!(session.remaining_secs(), None);
        assert_eq!(session.bar_count(), 0);
        assert_eq!(session.elapsed(5 * SEC), 2 * SEC);
    }

    #[test]
    fn test_progression_steps() {
        let mut tempo = TempoState::default();
        let mut session =
            TrainingSession::start(progression(60, 120, 10, 5), &mut tempo, Duration::ZERO);
        assert_eq!(tempo.bpm(), 60);

        assert_eq!(session.on_scheduler_tick(&mut tempo, 10 * SEC), Some(65));
        // The next interval runs from the increase.
        assert_eq!(session.on_scheduler_tick(&mut tempo, 15 * SEC), None);
        assert_eq!(session.on_scheduler_tick(&mut tempo, 20 * SEC), Some(70));
    }

    #[test]
    fn test_progression_stops_at_end() {
        let mut tempo = TempoState::default();
        let mut session =
            TrainingSession::start(progression(60, 120, 10, 5), &mut tempo, Duration::ZERO);

        // Twelve increases of 5 bpm, one every 10 s.
        let mut now = Duration::ZERO;
        for _ in 0..200 {
            now += SEC;
            session.on_scheduler_tick(&mut tempo, now);
        }
        assert_eq!(tempo.bpm(), 120);
        assert_eq!(session.on_scheduler_tick(&mut tempo, 1000 * SEC), None);
        assert_eq!(tempo.bpm(), 120);
    }

    #[test]
    fn test_increase_past_end_is_skipped() {
        let mut tempo = TempoState::default();
        let mut session =
            TrainingSession::start(progression(60, 62, 1, 5), &mut tempo, Duration::ZERO);
        assert_eq!(session.on_scheduler_tick(&mut tempo, 5 * SEC), None);
        assert_eq!(tempo.bpm(), 60);
    }

    #[test]
    fn test_progression_disabled_leaves_tempo() {
        let mut tempo = TempoState::new(90, 4);
        let mut session =
            TrainingSession::start(TrainingConfig::default(), &mut tempo, Duration::ZERO);
        assert_eq!(session.on_scheduler_tick(&mut tempo, 3600 * SEC), None);
        assert_eq!(tempo.bpm(), 90);
    }

    #[test]
    fn test_countdown() {
        let mut tempo = TempoState::default();
        let config = TrainingConfig::default().with_session(1);
        let mut session = TrainingSession::start(config, &mut tempo, Duration::ZERO);
        assert_eq!(session.remaining_secs(), Some(60));

        for expected in (1..60).rev() {
            assert_eq!(
                session.on_second(),
                Some(SessionTick::Running {
                    remaining_secs: expected
                })
            );
        }
        assert_eq!(session.on_second(), Some(SessionTick::Finished));
    }

    #[test]
    fn test_no_countdown_when_disabled() {
        let mut tempo = TempoState::default();
        let mut session =
            TrainingSession::start(TrainingConfig::default(), &mut tempo, Duration::ZERO);
        assert_eq!(session.on_second(), None);
    }

    #[test]
    fn test_progress() {
        let mut tempo = TempoState::default();
        let session =
            TrainingSession::start(progression(60, 120, 10, 5), &mut tempo, Duration::ZERO);
        assert_eq!(session.progress(60), 0.0);
        assert_eq!(session.progress(90), 0.5);
        assert_eq!(session.progress(120), 1.0);
        assert_eq!(session.progress(40), 0.0);
        assert_eq!(session.progress(200), 1.0);
    }

    #[test]
    fn test_progress_with_equal_bounds() {
        let mut tempo = TempoState::default();
        let session =
            TrainingSession::start(progression(100, 100, 10, 5), &mut tempo, Duration::ZERO);
        assert_eq!(session.progress(100), 1.0);
        assert_eq!(session.progress(99), 0.0);
    }

    #[test]
    fn test_bar_count() {
        let mut tempo = TempoState::default();
        let mut session =
            TrainingSession::start(TrainingConfig::default(), &mut tempo, Duration::ZERO);
        session.count_bar();
        session.count_bar();
        assert_eq!(session.bar_count(), 2);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(3600), "60:00");
    }
}
