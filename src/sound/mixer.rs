//! Sample-accurate mixing of scheduled tones.

use super::output::AudioOutput;
use super::tone::ScheduledTone;
use super::voice::Voice;
use crate::clock::SampleClock;
use crate::core::{AudioSignal, Signal, seconds_to_frames};
use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Renders scheduled tones into a mono sample stream.
///
/// The mixer keeps its own frame counter, which is the audio clock: every call to
/// `next_sample()` renders one frame and advances it. Tones wait in a pending
/// list sorted by start time and become voices on the exact frame they are due.
///
/// # Examples
///
/// ```
/// use clave::{Clock, Signal, SoundProfile};
/// use clave::sound::{ScheduledTone, Tone, ToneMixer};
///
/// let mut mixer = ToneMixer::<44100>::new();
/// let clock = mixer.clock();
/// mixer.schedule(ScheduledTone::new(0.5, Tone::for_beat(SoundProfile::Click, true)));
///
/// let mut buffer = vec![0.0; 22050];
/// mixer.process(&mut buffer);
/// assert!(buffer.iter().all(|&s| s == 0.0));
/// assert_eq!(clock.audio_time(), 0.5);
///
/// assert_eq!(mixer.next_sample(), 1.0);
/// ```
#[derive(Debug)]
pub struct ToneMixer<const SAMPLE_RATE: u32> {
    pending: VecDeque<ScheduledTone>,
    voices: Vec<Voice<SAMPLE_RATE>>,
    frames: Arc<AtomicU64>,
}

impl<const SAMPLE_RATE: u32> Default for ToneMixer<SAMPLE_RATE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SAMPLE_RATE: u32> ToneMixer<SAMPLE_RATE> {
    /// Creates an empty mixer at frame 0.
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            voices: Vec::new(),
            frames: Arc::new(AtomicU64::new(0)),
        }
    }

    /// A clock that reads this mixer's frame counter.
    pub fn clock(&self) -> SampleClock {
        SampleClock::new(self.frames.clone(), SAMPLE_RATE)
    }

    /// The next frame to be rendered.
    pub fn frame(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Queues a tone. Tones may arrive in any order.
    pub fn schedule(&mut self, tone: ScheduledTone) {
        let index = self
            .pending
            .partition_point(|queued| queued.start <= tone.start);
        self.pending.insert(index, tone);
    }

    /// Number of tones waiting for their start frame.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Number of tones currently sounding.
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Whether nothing is sounding or waiting to sound.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.voices.is_empty()
    }

    /// Turns every pending tone due at `frame` into a voice.
    fn activate_due(&mut self, frame: u64) {
        while let Some(tone) = self.pending.front().copied() {
            if seconds_to_frames(tone.start, SAMPLE_RATE) > frame {
                break;
            }
            self.pending.pop_front();

            if seconds_to_frames(tone.stop(), SAMPLE_RATE) <= frame {
                log::warn!(
                    "dropping tone at {:.4}s: it ended before frame {frame} was rendered",
                    tone.start
                );
                continue;
            }
            self.voices.push(Voice::new(tone, frame));
        }
    }
}

impl<const SAMPLE_RATE: u32> Signal for ToneMixer<SAMPLE_RATE> {
    fn next_sample(&mut self) -> f64 {
        let frame = self.frame();
        self.activate_due(frame);

        let mix: f64 = self
            .voices
            .iter_mut()
            .map(|voice| voice.next_sample())
            .sum();
        self.voices.retain(|voice| !voice.is_finished());

        self.frames.store(frame + 1, Ordering::Relaxed);
        mix.clamp(-1.0, 1.0)
    }
}

impl<const SAMPLE_RATE: u32> AudioSignal<SAMPLE_RATE> for ToneMixer<SAMPLE_RATE> {}

/// A shared handle to a [`ToneMixer`], usable as an [`AudioOutput`].
///
/// The scheduler side schedules tones through the handle while the audio side
/// renders through another clone of it.
///
/// # Examples
///
/// ```
/// use clave::Metronome;
/// use clave::sound::{MixerHandle, ToneMixer};
///
/// let mixer = MixerHandle::new(ToneMixer::<48000>::new());
/// let mut metronome = Metronome::new(mixer.clock(), mixer.clone());
/// metronome.start().unwrap();
///
/// // The first beat is scheduled 50 ms after start.
/// let mut buffer = vec![0.0; 4800];
/// mixer.render(&mut buffer).unwrap();
/// assert!(buffer[..2400].iter().all(|&s| s == 0.0));
/// assert!(buffer[2400..].iter().any(|&s| s != 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct MixerHandle<const SAMPLE_RATE: u32> {
    mixer: Arc<Mutex<ToneMixer<SAMPLE_RATE>>>,
}

impl<const SAMPLE_RATE: u32> MixerHandle<SAMPLE_RATE> {
    /// Wraps `mixer` for sharing with an audio callback.
    pub fn new(mixer: ToneMixer<SAMPLE_RATE>) -> Self {
        Self {
            mixer: Arc::new(Mutex::new(mixer)),
        }
    }

    /// Locks the mixer.
    pub fn lock(&self) -> Result<MutexGuard<'_, ToneMixer<SAMPLE_RATE>>> {
        self.mixer
            .lock()
            .map_err(|_| Error::OutputUnavailable("tone mixer lock poisoned".to_string()))
    }

    /// A clock that reads the mixer's frame counter.
    pub fn clock(&self) -> SampleClock {
        // The frame counter is shared, so a poisoned lock still yields a valid clock.
        match self.mixer.lock() {
            Ok(mixer) => mixer.clock(),
            Err(poisoned) => poisoned.into_inner().clock(),
        }
    }

    /// Renders the next `buffer.len()` frames.
    pub fn render(&self, buffer: &mut [f64]) -> Result<()> {
        self.lock()?.process(buffer);
        Ok(())
    }
}

impl<const SAMPLE_RATE: u32> AudioOutput for MixerHandle<SAMPLE_RATE> {
    fn resume(&mut self) -> Result<()> {
        self.lock().map(|_| ())
    }

    fn schedule(&mut self, tone: ScheduledTone) -> Result<()> {
        self.lock()?.schedule(tone);
        Ok(())
    }
}
