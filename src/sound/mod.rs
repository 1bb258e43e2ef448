//! Beat sounds and the outputs that play them.
//!
//! The scheduler decides when a beat sounds; this module decides what it sounds
//! like ([`Tone`]) and hands it to an [`AudioOutput`] pinned to its exact start
//! time. With the `synth` feature, [`ToneMixer`] renders those tones sample by
//! sample, which is what the device and WAV backends are built on.

mod output;
mod render;
mod tone;

#[cfg(feature = "synth")]
mod mixer;
#[cfg(feature = "synth")]
mod voice;

#[cfg(feature = "cpal-output")]
mod device;

#[cfg(feature = "wav-export")]
mod wav;

pub use output::{AudioOutput, RecordingOutput};
pub use render::render_note;
pub use tone::{DECAY_TARGET, ScheduledTone, Tone, Waveform};

#[cfg(feature = "synth")]
pub use mixer::{MixerHandle, ToneMixer};
#[cfg(feature = "synth")]
pub use voice::Voice;

#[cfg(feature = "cpal-output")]
pub use device::DeviceOutput;

#[cfg(feature = "wav-export")]
pub use wav::render_wav;
