//! Audio outputs that accept tones scheduled for exact future times.

use super::tone::ScheduledTone;
use crate::error::{Error, Result};

/// Destination for scheduled tones.
///
/// Implementations must start each tone at its scheduled audio time, not when
/// `schedule` is called.
pub trait AudioOutput {
    /// Creates or resumes the output. Called on every session start.
    ///
    /// An error means the audio clock is unavailable and the session cannot start.
    fn resume(&mut self) -> Result<()>;

    /// Queues a tone for playback at `tone.start`.
    fn schedule(&mut self, tone: ScheduledTone) -> Result<()>;
}

/// An output that records every tone it is given instead of playing it.
///
/// Useful for headless runs, offline rendering and tests. An output built with
/// [`RecordingOutput::unavailable`] fails to resume, like a device that cannot
/// be opened.
///
/// # Examples
///
/// ```
/// use clave::SoundProfile;
/// use clave::sound::{AudioOutput, RecordingOutput, ScheduledTone, Tone};
///
/// let mut output = RecordingOutput::new();
/// output.resume().unwrap();
/// output
///     .schedule(ScheduledTone::new(0.5, Tone::for_beat(SoundProfile::Click, true)))
///     .unwrap();
///
/// assert_eq!(output.tones().len(), 1);
/// assert_eq!(output.tones()[0].start, 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    tones: Vec<ScheduledTone>,
    available: bool,
    resumed: bool,
}

impl RecordingOutput {
    /// Creates an output that accepts tones once resumed.
    pub fn new() -> Self {
        Self {
            tones: Vec::new(),
            available: true,
            resumed: false,
        }
    }

    /// An output whose device cannot be opened.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Makes the simulated device available or unavailable.
    ///
    /// Going unavailable also drops the resumed state, so scheduling fails until
    /// the next successful `resume`.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
        if !available {
            self.resumed = false;
        }
    }

    /// Returns `true` once `resume` has succeeded.
    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    /// Every tone scheduled so far, in scheduling order.
    pub fn tones(&self) -> &[ScheduledTone] {
        &self.tones
    }

    /// Takes the recorded tones, leaving the record empty.
    pub fn take_tones(&mut self) -> Vec<ScheduledTone> {
        std::mem::take(&mut self.tones)
    }
}

impl AudioOutput for RecordingOutput {
    fn resume(&mut self) -> Result<()> {
        if !self.available {
            return Err(Error::OutputUnavailable(
                "recording output is unavailable".to_string(),
            ));
        }
        self.resumed = true;
        Ok(())
    }

    fn schedule(&mut self, tone: ScheduledTone) -> Result<()> {
        if !self.resumed {
            return Err(Error::OutputUnavailable(
                "recording output has not been resumed".to_string(),
            ));
        }
        self.tones.push(tone);
        Ok(())
    }
}
