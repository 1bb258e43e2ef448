//! Audio signal trait for sample-rate-aware signals.

use super::Signal;

/// A signal rendered at a fixed sample rate.
///
/// The sample rate is a const generic parameter, so a voice rendered at 44.1 kHz
/// cannot be fed to a mixer running at 48 kHz by accident.
///
/// # Type Parameters
///
/// * `SAMPLE_RATE` - Sample rate in Hz (e.g., 44100 or 48000)
///
/// # Examples
///
/// ```
/// use clave::{AudioSignal, SineOscillator};
///
/// let osc: SineOscillator<48000> = SineOscillator::new(800.0);
/// assert_eq!(osc.sample_rate(), 48000.0);
/// ```
pub trait AudioSignal<const SAMPLE_RATE: u32>: Signal {
    /// Sample rate in Hz.
    fn sample_rate(&self) -> f64 {
        SAMPLE_RATE as f64
    }

    /// Converts a time in seconds to the nearest frame index.
    fn frames_at(&self, seconds: f64) -> u64 {
        seconds_to_frames(seconds, SAMPLE_RATE)
    }
}

/// Nearest frame index for `seconds` at `sample_rate`. Negative times map to 0.
pub(crate) fn seconds_to_frames(seconds: f64, sample_rate: u32) -> u64 {
    (seconds * sample_rate as f64).round().max(0.0) as u64
}
