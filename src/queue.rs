//! The queue of notes that have been scheduled but may not have sounded yet.

use std::collections::VecDeque;

/// A beat that has been handed to the audio output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledNote {
    /// Zero-based position of the beat in its bar
    pub beat_in_bar: u32,
    /// Audio time at which the beat sounds, in seconds
    pub time: f64,
}

impl ScheduledNote {
    /// Creates a note for beat `beat_in_bar` sounding at audio time `time`.
    pub fn new(beat_in_bar: u32, time: f64) -> Self {
        Self { beat_in_bar, time }
    }

    /// Whether this is the first beat of its bar.
    ///
    /// `beat_in_bar` is already reduced modulo the bar length in force when the
    /// bar started, so this stays correct across a meter change.
    pub fn is_downbeat(&self) -> bool {
        self.beat_in_bar == 0
    }
}

/// FIFO of scheduled notes, ordered by time.
///
/// The scheduler appends at the tail in time order; consumers only ever look at
/// and remove the head. This is the single record of what has been scheduled
/// but not yet acknowledged by the visual side.
///
/// # Examples
///
/// ```
/// use clave::{NoteQueue, ScheduledNote};
///
/// let mut queue = NoteQueue::new();
/// queue.push(ScheduledNote::new(0, 1.0));
/// queue.push(ScheduledNote::new(1, 1.5));
///
/// let mut fired = Vec::new();
/// queue.drain_due(1.2, |note| fired.push(note.beat_in_bar));
///
/// assert_eq!(fired, vec![0]);
/// assert_eq!(queue.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NoteQueue {
    notes: VecDeque<ScheduledNote>,
}

impl NoteQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a note at the tail.
    ///
    /// Notes must arrive in non-decreasing time order.
    pub fn push(&mut self, note: ScheduledNote) {
        if let Some(tail) = self.notes.back()
            && note.time < tail.time
        {
            log::warn!(
                "note for beat {} at {:.6}s queued behind later note at {:.6}s",
                note.beat_in_bar,
                note.time,
                tail.time
            );
            debug_assert!(false, "notes must be queued in time order");
        }
        self.notes.push_back(note);
    }

    /// Removes every note at the head whose time is `<= now`, in order, passing
    /// each to `on_due`. Stops at the first note still in the future.
    ///
    /// Returns the number of notes removed.
    pub fn drain_due<F>(&mut self, now: f64, mut on_due: F) -> usize
    where
        F: FnMut(ScheduledNote),
    {
        let mut drained = 0;
        while let Some(head) = self.notes.front().copied() {
            if head.time > now {
                break;
            }
            self.notes.pop_front();
            on_due(head);
            drained += 1;
        }
        drained
    }

    /// The next note to become due, if any.
    pub fn peek(&self) -> Option<&ScheduledNote> {
        self.notes.front()
    }

    /// Number of notes not yet drained.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Discards every queued note.
    pub fn clear(&mut self) {
        self.notes.clear();
    }

    /// Iterates over the queued notes, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledNote> {
        self.notes.iter()
    }
}
