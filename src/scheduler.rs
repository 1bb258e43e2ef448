//! Look-ahead beat scheduler.
//!
//! The scheduler is driven by a coarse timer (nominally every 25 ms, with no
//! guarantee) but hands out beats with exact audio-clock times. Each tick it
//! schedules every beat that falls within a short horizon ahead of the audio
//! clock, so a late or jittery tick never produces a late beat; it only means
//! more beats get scheduled on the next one.
//!
//! ```text
//!  audio time ─────────────────────────────────────────────────────►
//!        now            now + schedule_ahead
//!         │◄── horizon ───►│
//!         │   ●       ●    │   ●        ● = next_note_time for each beat
//!         └ scheduled this tick ┘
//! ```

use crate::error::Result;
use crate::queue::ScheduledNote;
use crate::tempo::TempoState;
use std::time::Duration;

/// Timing parameters of the look-ahead scheduler.
///
/// # Examples
///
/// ```
/// use clave::SchedulerConfig;
/// use std::time::Duration;
///
/// let config = SchedulerConfig::default().with_schedule_ahead(0.2);
/// assert_eq!(config.lookahead, Duration::from_millis(25));
/// assert_eq!(config.schedule_ahead, 0.2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerConfig {
    /// How often the scheduler timer fires
    pub lookahead: Duration,
    /// How far ahead of the audio clock beats are scheduled, in seconds
    pub schedule_ahead: f64,
    /// Delay between starting and the first beat, in seconds
    pub start_offset: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lookahead: Duration::from_millis(25),
            schedule_ahead: 0.1,
            start_offset: 0.05,
        }
    }
}

impl SchedulerConfig {
    /// Sets how often the scheduler timer fires.
    pub fn with_lookahead(mut self, lookahead: Duration) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Sets how far past the current audio time beats are scheduled.
    pub fn with_schedule_ahead(mut self, seconds: f64) -> Self {
        self.schedule_ahead = seconds.max(0.0);
        self
    }

    /// Sets the delay between `start` and the first beat.
    pub fn with_start_offset(mut self, seconds: f64) -> Self {
        self.start_offset = seconds.max(0.0);
        self
    }
}

/// Position of the scheduler: the next beat to schedule and when it sounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerCursor {
    /// Zero-based position of the next beat in its bar
    pub beat_in_bar: u32,
    /// Audio time of the next beat, in seconds
    pub next_note_time: f64,
    /// Bar length in effect for the current bar
    bar_length: u32,
}

impl SchedulerCursor {
    fn at(time: f64, bar_length: u32) -> Self {
        Self {
            beat_in_bar: 0,
            next_note_time: time,
            bar_length: bar_length.max(1),
        }
    }

    /// Moves to the next beat, `beat_duration` seconds later.
    fn advance(&mut self, beat_duration: f64) {
        self.next_note_time += beat_duration;
        self.beat_in_bar += 1;
        if self.beat_in_bar >= self.bar_length {
            self.beat_in_bar = 0;
        }
    }
}

/// Schedules beats ahead of the audio clock.
///
/// # Examples
///
/// ```
/// use clave::{LookAheadScheduler, SchedulerConfig, TempoState};
///
/// let tempo = TempoState::new(120, 4);
/// let mut scheduler = LookAheadScheduler::new(SchedulerConfig::default());
/// scheduler.reset(0.0, &tempo);
///
/// // First beat at 0.05 s is inside the 0.1 s horizon; the next (0.55 s) is not.
/// let mut notes = Vec::new();
/// let count = scheduler
///     .schedule_due(0.0, &tempo, |note| {
///         notes.push(note);
///         Ok(())
///     })
///     .unwrap();
///
/// assert_eq!(count, 1);
/// assert_eq!(notes[0].beat_in_bar, 0);
/// assert!((notes[0].time - 0.05).abs() < 1e-12);
/// assert!((scheduler.cursor().next_note_time - 0.55).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LookAheadScheduler {
    config: SchedulerConfig,
    cursor: SchedulerCursor,
}

impl LookAheadScheduler {
    /// Creates a scheduler whose cursor sits at audio time 0.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            cursor: SchedulerCursor::at(0.0, 1),
        }
    }

    /// Returns the timing configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Returns the next beat to be scheduled.
    pub fn cursor(&self) -> &SchedulerCursor {
        &self.cursor
    }

    /// Rewinds to the first beat of a bar, `start_offset` after `now`.
    pub fn reset(&mut self, now: f64, tempo: &TempoState) {
        let first_beat = now + self.config.start_offset;
        self.cursor = SchedulerCursor::at(first_beat, tempo.beats_per_bar());
    }

    /// Schedules every beat due before `now + schedule_ahead`.
    ///
    /// Each beat is handed to `schedule` before the cursor moves past it. The
    /// beat length is read from `tempo` per beat, so a tempo change only affects
    /// beats not yet scheduled. The bar length is read when a bar starts, so a
    /// meter change takes effect at the next bar boundary.
    ///
    /// Returns the number of beats scheduled, or the first error from
    /// `schedule`; the beat that failed is not consumed.
    pub fn schedule_due<F>(
        &mut self,
        now: f64,
        tempo: &TempoState,
        mut schedule: F,
    ) -> Result<usize>
    where
        F: FnMut(ScheduledNote) -> Result<()>,
    {
        let horizon = now + self.config.schedule_ahead;
        let mut scheduled = 0;

        while self.cursor.next_note_time < horizon {
            if self.cursor.beat_in_bar == 0 {
                self.cursor.bar_length = tempo.beats_per_bar();
            }

            let note = ScheduledNote::new(self.cursor.beat_in_bar, self.cursor.next_note_time);
            log::trace!("scheduling beat {} at {:.4}s", note.beat_in_bar, note.time);
            schedule(note)?;
            scheduled += 1;

            self.cursor.advance(tempo.beat_duration());
        }

        Ok(scheduled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tempo::{MAX_BEATS_PER_BAR, MAX_BPM, MIN_BEATS_PER_BAR, MIN_BPM};

    fn collect(
        scheduler: &mut LookAheadScheduler,
        now: f64,
        tempo: &TempoState,
    ) -> Vec<ScheduledNote> {
        let mut notes = Vec::new();
        scheduler
            .schedule_due(now, tempo, |note| {
                notes.push(note);
                Ok(())
            })
            .unwrap();
        notes
    }

    fn times(notes: &[ScheduledNote]) -> Vec<f64> {
        notes.iter().map(|n| n.time).collect()
    }

    fn assert_times(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} vs {expected:?}");
        }
    }

    /// Drives the scheduler with 25 ms ticks for `seconds` of audio time.
    fn run(
        scheduler: &mut LookAheadScheduler,
        tempo: &TempoState,
        seconds: f64,
    ) -> Vec<ScheduledNote> {
        let mut notes = Vec::new();
        let mut now = 0.0;
        while now < seconds {
            notes.extend(collect(scheduler, now, tempo));
            now += 0.025;
        }
        notes
    }

    #[test]
    fn test_reset_positions_first_beat() {
        let tempo = TempoState::default();
        let mut scheduler = LookAheadScheduler::new(SchedulerConfig::default());
        scheduler.reset(3.0, &tempo);
        assert_eq!(scheduler.cursor().beat_in_bar, 0);
        assert_times(&[scheduler.cursor().next_note_time], &[3.05]);
    }

    #[test]
    fn test_nothing_outside_horizon() {
        let tempo = TempoState::default();
        let config = SchedulerConfig::default().with_start_offset(0.5);
        let mut scheduler = LookAheadScheduler::new(config);
        scheduler.reset(0.0, &tempo);
        assert!(collect(&mut scheduler, 0.0, &tempo).is_empty());
        assert!(collect(&mut scheduler, 0.39, &tempo).is_empty());
        assert_eq!(collect(&mut scheduler, 0.41, &tempo).len(), 1);
    }

    #[test]
    fn test_catches_up_after_late_tick() {
        let tempo = TempoState::new(120, 4);
        let mut scheduler = LookAheadScheduler::new(SchedulerConfig::default());
        scheduler.reset(0.0, &tempo);

        // A tick 2 s late schedules every missed beat in one go.
        let notes = collect(&mut scheduler, 2.0, &tempo);
        assert_times(&times(&notes), &[0.05, 0.55, 1.05, 1.55, 2.05]);
        let beats: Vec<u32> = notes.iter().map(|n| n.beat_in_bar).collect();
        assert_eq!(beats, vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_spacing_and_monotonic_for_all_tempos_and_meters() {
        for bpm in (MIN_BPM..=MAX_BPM).step_by(13).chain([MAX_BPM]) {
            for beats in MIN_BEATS_PER_BAR..=MAX_BEATS_PER_BAR {
                let tempo = TempoState::new(bpm, beats);
                let mut scheduler = LookAheadScheduler::new(SchedulerConfig::default());
                scheduler.reset(0.0, &tempo);

                let notes = run(&mut scheduler, &tempo, 4.0);
                assert!(notes.len() >= 2);
                let expected = 60.0 / bpm as f64;
                for pair in notes.windows(2) {
                    let gap = pair[1].time - pair[0].time;
                    assert!(gap > 0.0, "time regressed at {bpm} bpm");
                    assert!(
                        (gap - expected).abs() < 1e-9,
                        "gap {gap} != {expected} at {bpm} bpm"
                    );
                    assert_eq!(pair[1].beat_in_bar, (pair[0].beat_in_bar + 1) % beats);
                }
            }
        }
    }

    #[test]
    fn test_every_beat_scheduled_before_due() {
        let tempo = TempoState::new(300, 4);
        let mut scheduler = LookAheadScheduler::new(SchedulerConfig::default());
        scheduler.reset(0.0, &tempo);

        let mut now = 0.0;
        while now < 3.0 {
            for note in collect(&mut scheduler, now, &tempo) {
                assert!(
                    note.time >= now,
                    "beat at {} scheduled late at {now}",
                    note.time
                );
            }
            now += 0.025;
        }
    }

    #[test]
    fn test_tempo_change_only_affects_unscheduled_beats() {
        let mut tempo = TempoState::new(120, 4);
        let mut scheduler = LookAheadScheduler::new(SchedulerConfig::default());
        scheduler.reset(0.0, &tempo);

        let before = collect(&mut scheduler, 1.0, &tempo);
        assert_times(&times(&before), &[0.05, 0.55, 1.05]);

        tempo.set_bpm(60);
        let after = collect(&mut scheduler, 3.0, &tempo);

        // 1.55 was computed with the old tempo when 1.05 was scheduled.
        assert_times(&times(&after), &[1.55, 2.55]);
        assert_times(&[scheduler.cursor().next_note_time], &[3.55]);
    }

    #[test]
    fn test_meter_change_waits_for_next_bar() {
        let mut tempo = TempoState::new(120, 4);
        let mut scheduler = LookAheadScheduler::new(SchedulerConfig::default());
        scheduler.reset(0.0, &tempo);

        // Beats 0 and 1 of a 4/4 bar.
        let first = collect(&mut scheduler, 0.5, &tempo);
        let beats: Vec<u32> = first.iter().map(|n| n.beat_in_bar).collect();
        assert_eq!(beats, vec![0, 1]);

        tempo.set_beats_per_bar(2);
        let rest = collect(&mut scheduler, 4.0, &tempo);
        let beats: Vec<u32> = rest.iter().map(|n| n.beat_in_bar).collect();

        // The current bar finishes with four beats, then bars have two.
        assert_eq!(beats, vec![2, 3, 0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_error_leaves_beat_pending() {
        let tempo = TempoState::new(120, 4);
        let mut scheduler = LookAheadScheduler::new(SchedulerConfig::default());
        scheduler.reset(0.0, &tempo);

        let result = scheduler.schedule_due(0.0, &tempo, |_| {
            Err(Error::OutputUnavailable("gone".into()))
        });

        assert!(matches!(result, Err(Error::OutputUnavailable(_))));
        assert_times(&[scheduler.cursor().next_note_time], &[0.05]);
        assert_eq!(scheduler.cursor().beat_in_bar, 0);
    }
}
