//! A single sounding beat tone.

use super::tone::{ScheduledTone, Waveform};
use crate::core::{AudioSignal, Signal, seconds_to_frames};
use crate::oscillators::{Oscillator, SineOscillator, SquareOscillator};

/// Either oscillator a tone may use.
#[derive(Debug, Clone)]
enum ToneOscillator<const SAMPLE_RATE: u32> {
    Square(SquareOscillator<SAMPLE_RATE>),
    Sine(SineOscillator<SAMPLE_RATE>),
}

impl<const SAMPLE_RATE: u32> ToneOscillator<SAMPLE_RATE> {
    fn new(waveform: Waveform, frequency: f64) -> Self {
        match waveform {
            Waveform::Square => Self::Square(SquareOscillator::new(frequency)),
            Waveform::Sine => Self::Sine(SineOscillator::new(frequency)),
        }
    }

    fn as_oscillator(&mut self) -> &mut dyn Oscillator {
        match self {
            Self::Square(osc) => osc,
            Self::Sine(osc) => osc,
        }
    }
}

/// A tone being rendered sample by sample.
///
/// The voice is silent until its start frame, follows the tone's frequency and
/// gain ramps while sounding, and finishes at its stop frame. A voice created
/// after its start frame has passed begins mid-envelope, so the tail of the
/// sound still lines up with the audio clock.
///
/// # Examples
///
/// ```
/// use clave::{Signal, SoundProfile};
/// use clave::sound::{ScheduledTone, Tone, Voice};
///
/// // A 10 ms click starting 1 ms in: 44 silent frames, then 441 sounding ones.
/// let tone = ScheduledTone::new(0.001, Tone::for_beat(SoundProfile::Click, true));
/// let mut voice = Voice::<44100>::new(tone, 0);
///
/// for _ in 0..44 {
///     assert_eq!(voice.next_sample(), 0.0);
/// }
/// assert!(voice.next_sample() != 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Voice<const SAMPLE_RATE: u32> {
    tone: ScheduledTone,
    oscillator: ToneOscillator<SAMPLE_RATE>,
    start_frame: u64,
    stop_frame: u64,
    /// Frame the next sample belongs to
    frame: u64,
}

impl<const SAMPLE_RATE: u32> Voice<SAMPLE_RATE> {
    /// Creates a voice for `tone`, positioned at `frame`.
    pub fn new(tone: ScheduledTone, frame: u64) -> Self {
        let start_frame = seconds_to_frames(tone.start, SAMPLE_RATE);
        let stop_frame = seconds_to_frames(tone.stop(), SAMPLE_RATE);
        Self {
            oscillator: ToneOscillator::new(tone.tone.waveform, tone.tone.start_frequency()),
            tone,
            start_frame,
            stop_frame,
            frame,
        }
    }

    /// The tone this voice renders.
    pub fn tone(&self) -> &ScheduledTone {
        &self.tone
    }

    /// Whether the voice has reached its stop frame.
    pub fn is_finished(&self) -> bool {
        self.frame >= self.stop_frame
    }

    /// Whether the voice is past its start frame and not yet finished.
    pub fn is_sounding(&self) -> bool {
        self.frame >= self.start_frame && !self.is_finished()
    }
}

impl<const SAMPLE_RATE: u32> Signal for Voice<SAMPLE_RATE> {
    fn next_sample(&mut self) -> f64 {
        let sample = if self.is_sounding() {
            let elapsed = (self.frame - self.start_frame) as f64 / SAMPLE_RATE as f64;
            let frequency = self.tone.tone.frequency.value_at(elapsed);
            let gain = self.tone.tone.gain.value_at(elapsed);

            let oscillator = self.oscillator.as_oscillator();
            oscillator.set_frequency(frequency);
            oscillator.next_sample() * gain
        } else {
            0.0
        };

        self.frame += 1;
        sample
    }
}

impl<const SAMPLE_RATE: u32> AudioSignal<SAMPLE_RATE> for Voice<SAMPLE_RATE> {}
