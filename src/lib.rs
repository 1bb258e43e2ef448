//! Clave - A look-ahead metronome for Rust
//!
//! This library schedules metronome beats against an audio clock a little ahead
//! of time, so they sound exactly on the beat no matter how coarse or late the
//! timer driving it is. It also synthesizes the beat sounds, estimates tempo
//! from taps and runs timed practice sessions with a gradual tempo ramp.
//!
//! The entry point is [`Metronome`], driven by a [`Clock`] and an
//! [`AudioOutput`](sound::AudioOutput).
//!
//! # Features
//!
//! - `synth` (default): sample-level rendering of beat sounds
//! - `cpal-output`: real-time playback on the default audio device
//! - `wav-export`: offline rendering to WAV files
//! - `serde`: (de)serialization of [`MetronomeSettings`]

pub mod clock;
pub mod envelopes;
pub mod error;
pub mod metronome;
pub mod queue;
pub mod scheduler;
pub mod sound;
pub mod tap;
pub mod tempo;
pub mod timer;
pub mod training;

#[cfg(feature = "synth")]
pub mod core;
#[cfg(feature = "synth")]
pub mod oscillators;

// Re-export commonly used types at the crate root
pub use clock::{Clock, ManualClock, SampleClock};
pub use envelopes::ExponentialRamp;
pub use error::{Error, Result};
pub use metronome::{
    BeatStrength, Metronome, MetronomeEvent, MetronomeSettings, Status, VisualBeat,
};
pub use queue::{NoteQueue, ScheduledNote};
pub use scheduler::{LookAheadScheduler, SchedulerConfig, SchedulerCursor};
pub use tap::TapTempo;
pub use tempo::{MAX_BEATS_PER_BAR, MAX_BPM, MIN_BEATS_PER_BAR, MIN_BPM, SoundProfile, TempoState};
pub use timer::RepeatingTimer;
pub use training::{SessionTick, TrainingConfig, TrainingSession, format_clock};

#[cfg(feature = "synth")]
pub use self::core::{AudioSignal, Pitched, Signal};
#[cfg(feature = "synth")]
pub use oscillators::{Oscillator, SineOscillator, SquareOscillator};
