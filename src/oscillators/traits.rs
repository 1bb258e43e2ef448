//! Core trait definitions for oscillators.

use crate::core::{Pitched, Signal};

/// Oscillators are pitched signals with resettable phase.
pub trait Oscillator: Signal + Pitched {
    /// Resets the phase to zero.
    fn reset(&mut self);
}
