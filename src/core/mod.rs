//! Core signal traits shared by the synthesis components.
//!
//! - `Signal` for anything that produces samples
//! - `AudioSignal` for signals tied to a sample rate
//! - `Pitched` for signals with a controllable frequency

mod audio;
mod signal;

pub use audio::AudioSignal;
pub(crate) use audio::seconds_to_frames;
pub use signal::{Pitched, Signal};
