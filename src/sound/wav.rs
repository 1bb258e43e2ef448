//! Offline rendering of scheduled tones to a WAV file.

use super::mixer::ToneMixer;
use super::tone::ScheduledTone;
use crate::core::{Signal, seconds_to_frames};
use crate::error::Result;
use std::path::Path;

/// Renders `seconds` of audio containing `tones` into a mono 16-bit WAV file.
///
/// Time 0.0 is the first frame of the file. Returns the number of frames
/// written.
///
/// ```no_run
/// use clave::SoundProfile;
/// use clave::sound::{ScheduledTone, Tone, render_wav};
///
/// let tones = (0..4).map(|beat| {
///     ScheduledTone::new(beat as f64 * 0.5, Tone::for_beat(SoundProfile::Click, beat == 0))
/// });
/// render_wav::<44100>("bar.wav", tones, 2.0)?;
/// # Ok::<(), clave::Error>(())
/// ```
pub fn render_wav<const SAMPLE_RATE: u32>(
    path: impl AsRef<Path>,
    tones: impl IntoIterator<Item = ScheduledTone>,
    seconds: f64,
) -> Result<u64> {
    let mut mixer = ToneMixer::<SAMPLE_RATE>::new();
    for tone in tones {
        mixer.schedule(tone);
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path.as_ref(), spec)?;

    let frames = seconds_to_frames(seconds, SAMPLE_RATE);
    for _ in 0..frames {
        let sample = (mixer.next_sample() * i16::MAX as f64) as i16;
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    if mixer.pending() > 0 {
        log::warn!(
            "{} tone(s) start after the end of {}",
            mixer.pending(),
            path.as_ref().display()
        );
    }
    log::debug!("wrote {frames} frames to {}", path.as_ref().display());
    Ok(frames)
}
