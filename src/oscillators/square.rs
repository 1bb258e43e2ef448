//! Square wave oscillator implementation.

use super::Oscillator;
use crate::core::{AudioSignal, Pitched, Signal};

/// A 50% duty cycle square wave, alternating between 1.0 and -1.0.
///
/// # Examples
///
/// ```
/// use clave::{Signal, SquareOscillator};
///
/// let mut osc = SquareOscillator::<44100>::new(440.0);
/// assert_eq!(osc.next_sample(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct SquareOscillator<const SAMPLE_RATE: u32> {
    /// Current phase (0.0 to 1.0)
    phase: f64,
    frequency: f64,
}

impl<const SAMPLE_RATE: u32> SquareOscillator<SAMPLE_RATE> {
    /// Creates a square oscillator at `frequency` Hz, starting high.
    pub fn new(frequency: f64) -> Self {
        Self {
            phase: 0.0,
            frequency,
        }
    }
}

impl<const SAMPLE_RATE: u32> Signal for SquareOscillator<SAMPLE_RATE> {
    fn next_sample(&mut self) -> f64 {
        let sample = if self.phase < 0.5 { 1.0 } else { -1.0 };
        self.phase += self.frequency / SAMPLE_RATE as f64;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        sample
    }
}

impl<const SAMPLE_RATE: u32> AudioSignal<SAMPLE_RATE> for SquareOscillator<SAMPLE_RATE> {}

impl<const SAMPLE_RATE: u32> Pitched for SquareOscillator<SAMPLE_RATE> {
    fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    fn frequency(&self) -> f64 {
        self.frequency
    }
}

impl<const SAMPLE_RATE: u32> Oscillator for SquareOscillator<SAMPLE_RATE> {
    fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oscillator_creation() {
        let osc = SquareOscillator::<44100>::new(440.0);
        assert_eq!(osc.frequency(), 440.0);
    }

    #[test]
    fn test_frequency_change() {
        let mut osc = SquareOscillator::<44100>::new(440.0);
        osc.set_frequency(880.0);
        assert_eq!(osc.frequency(), 880.0);
    }

    #[test]
    fn test_reset() {
        let mut osc = SquareOscillator::<44100>::new(440.0);
        for _ in 0..100 {
            osc.next_sample();
        }
        osc.reset();
        assert_eq!(osc.next_sample(), 1.0);
    }

    #[test]
    fn test_symmetric_duty_cycle() {
        let mut osc = SquareOscillator::<44100>::new(100.0);
        let mut high_count: u32 = 0;
        let mut low_count: u32 = 0;
        for _ in 0..441 {
            if osc.next_sample() == 1.0 {
                high_count += 1;
            } else {
                low_count += 1;
            }
        }
        assert!(high_count.abs_diff(low_count) <= 1);
    }

    #[test]
    fn test_period_matches_frequency() {
        // 1000 Hz at 48 kHz: 24 samples high, 24 low.
        let mut osc = SquareOscillator::<48000>::new(1000.0);
        let mut buffer = [0.0; 48];
        osc.process(&mut buffer);
        let transitions = buffer.windows(2).filter(|w| w[0] != w[1]).count();
        let high = buffer.iter().filter(|&&s| s == 1.0).count();
        assert_eq!(transitions, 1);
        assert!(high.abs_diff(24) <= 1);
    }

    #[test]
    fn test_sample_range() {
        let mut osc = SquareOscillator::<44100>::new(1500.0);
        for _ in 0..1000 {
            let sample = osc.next_sample();
            assert!(sample == 1.0 || sample == -1.0);
        }
    }
}
