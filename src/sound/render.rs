//! Turns scheduled notes into tones.

use super::output::AudioOutput;
use super::tone::{ScheduledTone, Tone};
use crate::error::Result;
use crate::queue::{NoteQueue, ScheduledNote};
use crate::tempo::TempoState;

/// Renders one scheduled beat.
///
/// The note is appended to `queue` first, whether or not the output accepts the
/// tone, so the visual side sees every beat the scheduler decided on. The tone is
/// then handed to `output` pinned to `note.time`.
///
/// # Examples
///
/// ```
/// use clave::{NoteQueue, ScheduledNote, TempoState};
/// use clave::sound::{AudioOutput, RecordingOutput, render_note};
///
/// let tempo = TempoState::new(120, 4);
/// let mut queue = NoteQueue::new();
/// let mut output = RecordingOutput::new();
/// output.resume().unwrap();
///
/// render_note(&tempo, ScheduledNote::new(0, 1.0), &mut queue, &mut output).unwrap();
///
/// assert_eq!(queue.len(), 1);
/// assert_eq!(output.tones()[0].start, 1.0);
/// assert_eq!(output.tones()[0].tone.start_frequency(), 880.0);
/// ```
pub fn render_note<O>(
    tempo: &TempoState,
    note: ScheduledNote,
    queue: &mut NoteQueue,
    output: &mut O,
) -> Result<ScheduledTone>
where
    O: AudioOutput + ?Sized,
{
    queue.push(note);

    let accent = tempo.accent_enabled() && note.is_downbeat();
    let tone = ScheduledTone::new(note.time, Tone::for_beat(tempo.sound_profile(), accent));
    output.schedule(tone)?;

    Ok(tone)
}
