//! Tempo estimation from tapped beats.

use crate::tempo::{MAX_BPM, MIN_BPM};
use std::collections::VecDeque;

/// Number of taps the estimate is averaged over.
pub const TAP_HISTORY: usize = 4;

/// A pause longer than this, in milliseconds, starts a new tap sequence.
pub const TAP_RESET_MS: u64 = 2000;

/// Estimates a tempo from the intervals between taps.
///
/// Only the last [`TAP_HISTORY`] taps count. Taps are timestamped in
/// milliseconds on any monotonic clock.
///
/// # Examples
///
/// ```
/// use clave::TapTempo;
///
/// let mut taps = TapTempo::new();
/// assert_eq!(taps.tap(0), None);
/// assert_eq!(taps.tap(500), Some(120));
/// assert_eq!(taps.tap(1000), Some(120));
///
/// // After a long pause the history starts over.
/// assert_eq!(taps.tap(5000), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TapTempo {
    taps: VecDeque<u64>,
}

impl TapTempo {
    /// Creates an estimator with no taps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a tap at `at_ms` and returns the new estimate.
    ///
    /// Returns `None` until at least two taps are in the history. The estimate
    /// is `round(60000 / mean interval)`, clamped to the supported tempo range.
    pub fn tap(&mut self, at_ms: u64) -> Option<u16> {
        if let Some(&last) = self.taps.back()
            && at_ms.saturating_sub(last) > TAP_RESET_MS
        {
            self.taps.clear();
        }

        self.taps.push_back(at_ms);
        if self.taps.len() > TAP_HISTORY {
            self.taps.pop_front();
        }

        self.estimate()
    }

    /// The estimate from the current history, without tapping.
    pub fn estimate(&self) -> Option<u16> {
        let (&first, &last) = (self.taps.front()?, self.taps.back()?);
        let intervals = self.taps.len() - 1;
        if intervals == 0 {
            return None;
        }

        // The mean of consecutive intervals telescopes to the overall span.
        let mean = last.saturating_sub(first) as f64 / intervals as f64;
        if mean <= 0.0 {
            return Some(MAX_BPM);
        }

        let bpm = (60_000.0 / mean).round();
        Some(bpm.clamp(MIN_BPM as f64, MAX_BPM as f64) as u16)
    }

    /// Tap timestamps currently in the history, oldest first.
    pub fn history(&self) -> impl Iterator<Item = u64> + '_ {
        self.taps.iter().copied()
    }

    /// Forgets every tap.
    pub fn reset(&mut self) {
        self.taps.clear();
    }
}
