//! Sine wave oscillator implementation.

use super::Oscillator;
use crate::core::{AudioSignal, Pitched, Signal};
use std::f64::consts::TAU;

/// A sine oscillator with phase continuity across frequency changes.
///
/// Changing the frequency mid-note only changes the phase increment, so pitch
/// sweeps are click-free.
///
/// # Type Parameters
///
/// * `SAMPLE_RATE` - Sample rate in Hz (e.g., 44100 for CD quality)
///
/// # Examples
///
/// ```
/// use clave::{Signal, SineOscillator};
///
/// let mut osc = SineOscillator::<44100>::new(800.0);
/// assert_eq!(osc.next_sample(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct SineOscillator<const SAMPLE_RATE: u32> {
    /// Current phase (0.0 to 1.0)
    phase: f64,
    frequency: f64,
}

impl<const SAMPLE_RATE: u32> SineOscillator<SAMPLE_RATE> {
    /// Creates a sine oscillator at `frequency` Hz, starting at phase 0.
    pub fn new(frequency: f64) -> Self {
        Self {
            phase: 0.0,
            frequency,
        }
    }
}

impl<const SAMPLE_RATE: u32> Signal for SineOscillator<SAMPLE_RATE> {
    fn next_sample(&mut self) -> f64 {
        let sample = (self.phase * TAU).sin();

        self.phase += self.frequency / SAMPLE_RATE as f64;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        sample
    }
}

impl<const SAMPLE_RATE: u32> AudioSignal<SAMPLE_RATE> for SineOscillator<SAMPLE_RATE> {}

impl<const SAMPLE_RATE: u32> Pitched for SineOscillator<SAMPLE_RATE> {
    fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    fn frequency(&self) -> f64 {
        self.frequency
    }
}

impl<const SAMPLE_RATE: u32> Oscillator for SineOscillator<SAMPLE_RATE> {
    fn reset(&mut self) {
        self.phase = 0.0;
    }
}
