//! Core signal processing traits.

/// Common interface for all sample generators.
///
/// Oscillators, voices and the tone mixer all produce one sample per call to
/// `next_sample()`.
pub trait Signal {
    /// Generates the next sample, typically between -1.0 and 1.0.
    fn next_sample(&mut self) -> f64;

    /// Fills `buffer` with consecutive samples.
    ///
    /// Default implementation calls `next_sample()` for each element.
    fn process(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

/// Anything with a controllable pitch.
///
/// # Examples
///
/// ```
/// use clave::{Pitched, SquareOscillator};
///
/// let mut osc = SquareOscillator::<44100>::new(440.0);
/// assert_eq!(osc.frequency(), 440.0);
///
/// osc.set_frequency(880.0);
/// assert_eq!(osc.frequency(), 880.0);
/// ```
pub trait Pitched {
    /// Sets the frequency in Hz.
    fn set_frequency(&mut self, freq: f64);

    /// Current frequency in Hz.
    fn frequency(&self) -> f64;
}
