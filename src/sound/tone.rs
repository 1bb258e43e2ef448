//! Beat tone parameters for each sound profile.

use crate::envelopes::ExponentialRamp;
use crate::tempo::SoundProfile;

/// Level every tone's gain envelope decays to.
pub const DECAY_TARGET: f64 = 0.001;

/// The periodic waveform a tone is synthesized with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    /// 50% duty cycle square wave
    Square,
    /// Pure sine wave
    Sine,
}

/// A synthesized beat sound, relative to its own start.
///
/// | profile   | waveform | accent / normal       | gain        | duration |
/// |-----------|----------|-----------------------|-------------|----------|
/// | digital   | square   | 880 / 440 Hz          | 0.1 → 0.001 | 50 ms    |
/// | click     | square   | 1500 / 1000 Hz        | 1 → 0.001   | 10 ms    |
/// | woodblock | sine     | 1000→800 / 800→600 Hz | 1 → 0.001   | 100 ms   |
///
/// The woodblock's pitch sweep lasts 50 ms and then holds.
///
/// # Examples
///
/// ```
/// use clave::SoundProfile;
/// use clave::sound::{Tone, Waveform};
///
/// let tone = Tone::for_beat(SoundProfile::Digital, true);
/// assert_eq!(tone.waveform, Waveform::Square);
/// assert_eq!(tone.start_frequency(), 880.0);
/// assert_eq!(tone.duration, 0.05);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    /// Frequency automation in Hz
    pub frequency: ExponentialRamp,
    /// Gain automation
    pub gain: ExponentialRamp,
    /// Time from start to stop, in seconds
    pub duration: f64,
}

impl Tone {
    /// The tone for a beat played with `profile`, accented or not.
    pub fn for_beat(profile: SoundProfile, accent: bool) -> Self {
        let pick = |accented: f64, normal: f64| if accent { accented } else { normal };

        match profile {
            SoundProfile::Digital => Self::square(pick(880.0, 440.0), 0.1, 0.05),
            SoundProfile::Click => Self::square(pick(1500.0, 1000.0), 1.0, 0.01),
            SoundProfile::Woodblock => Self {
                waveform: Waveform::Sine,
                frequency: ExponentialRamp::new(pick(1000.0, 800.0), pick(800.0, 600.0), 0.05),
                gain: ExponentialRamp::new(1.0, DECAY_TARGET, 0.1),
                duration: 0.1,
            },
        }
    }

    fn square(frequency: f64, level: f64, duration: f64) -> Self {
        Self {
            waveform: Waveform::Square,
            frequency: ExponentialRamp::constant(frequency),
            gain: ExponentialRamp::new(level, DECAY_TARGET, duration),
            duration,
        }
    }

    /// Frequency at the moment the tone starts, in Hz.
    pub fn start_frequency(&self) -> f64 {
        self.frequency.from()
    }
}

/// A tone pinned to an absolute audio time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTone {
    /// Audio time the tone starts, in seconds
    pub start: f64,
    pub tone: Tone,
}

impl ScheduledTone {
    /// Pins `tone` to start at audio time `start`.
    pub fn new(start: f64, tone: Tone) -> Self {
        Self { start, tone }
    }

    /// Audio time the tone stops, in seconds.
    pub fn stop(&self) -> f64 {
        self.start + self.tone.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digital() {
        let accent = Tone::for_beat(SoundProfile::Digital, true);
        let normal = Tone::for_beat(SoundProfile::Digital, false);

        assert_eq!(accent.waveform, Waveform::Square);
        assert_eq!(accent.start_frequency(), 880.0);
        assert_eq!(normal.start_frequency(), 440.0);
        assert_eq!(normal.frequency.to(), 440.0);
        assert_eq!(accent.gain.from(), 0.1);
        assert_eq!(accent.gain.to(), DECAY_TARGET);
        assert_eq!(accent.gain.duration(), 0.05);
        assert_eq!(accent.duration, 0.05);
    }

    #[test]
    fn test_click() {
        let accent = Tone::for_beat(SoundProfile::Click, true);
        let normal = Tone::for_beat(SoundProfile::Click, false);

        assert_eq!(accent.waveform, Waveform::Square);
        assert_eq!(accent.start_frequency(), 1500.0);
        assert_eq!(normal.start_frequency(), 1000.0);
        assert_eq!(accent.gain.from(), 1.0);
        assert_eq!(accent.gain.to(), DECAY_TARGET);
        assert_eq!(accent.duration, 0.01);
    }

    #[test]
    fn test_woodblock_sweeps_down() {
        let accent = Tone::for_beat(SoundProfile::Woodblock, true);
        let normal = Tone::for_beat(SoundProfile::Woodblock, false);

        assert_eq!(accent.waveform, Waveform::Sine);
        assert_eq!(
            (accent.frequency.from(), accent.frequency.to()),
            (1000.0, 800.0)
        );
        assert_eq!(
            (normal.frequency.from(), normal.frequency.to()),
            (800.0, 600.0)
        );
        assert_eq!(accent.frequency.duration(), 0.05);
        assert_eq!(accent.gain.from(), 1.0);
        assert_eq!(accent.gain.duration(), 0.1);
        assert_eq!(accent.duration, 0.1);
    }

    #[test]
    fn test_gain_reaches_target_at_stop() {
        for profile in SoundProfile::ALL {
            let tone = Tone::for_beat(profile, false);
            assert_eq!(tone.gain.value_at(tone.duration), DECAY_TARGET);
        }
    }

    #[test]
    fn test_scheduled_stop() {
        let scheduled = ScheduledTone::new(2.0, Tone::for_beat(SoundProfile::Woodblock, false));
        assert!((scheduled.stop() - 2.1).abs() < 1e-12);
    }
}
