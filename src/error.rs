//! Error types for clave.

use thiserror::Error;

/// Result type alias for clave operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the metronome.
///
/// Out-of-range tempo or meter input is never an error: setters clamp.
#[derive(Debug, Error)]
pub enum Error {
    /// The audio output could not be created, resumed or fed.
    ///
    /// Starting a session with an unavailable output aborts the start; hitting it
    /// while playing stops the session.
    #[error("audio output unavailable: {0}")]
    OutputUnavailable(String),

    /// An asynchronous error reported by the audio stream.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// A sound profile name that is not `digital`, `click` or `woodblock`.
    #[error("unknown sound profile: {0}")]
    UnknownSoundProfile(String),

    /// WAV encoding error
    #[cfg(feature = "wav-export")]
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}
