//! The metronome: tempo, scheduling, sound output and training in one context.
//!
//! [`Metronome`] owns every piece of playback state and is driven by its
//! caller. The caller's event loop calls [`Metronome::poll`] whenever
//! [`Metronome::next_deadline`] is reached, and its frame loop calls
//! [`Metronome::poll_visuals`] to learn which beats have become audible.
//!
//! Two timers run while playing:
//!
//! - the **scheduler timer** fires every `lookahead` (25 ms by default) and
//!   schedules every beat that falls inside the look-ahead window;
//! - the **session timer** fires once per second while a timed training
//!   session is running.
//!
//! Both are re-armed by `poll` and cancelled by [`Metronome::stop`].

use crate::clock::Clock;
use crate::error::Result;
use crate::queue::{NoteQueue, ScheduledNote};
use crate::scheduler::{LookAheadScheduler, SchedulerConfig};
use crate::sound::{AudioOutput, render_note};
use crate::tap::TapTempo;
use crate::tempo::{SoundProfile, TempoState};
use crate::timer::RepeatingTimer;
use crate::training::{SessionTick, TrainingConfig, TrainingSession, format_clock};
use std::time::Duration;

/// Period of the training session countdown.
const SESSION_TICK: Duration = Duration::from_secs(1);

/// Something the caller may want to react to, reported by [`Metronome::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetronomeEvent {
    /// Training progression raised the tempo
    BpmChanged { bpm: u16 },
    /// One second of the session countdown elapsed
    SessionTick { remaining_secs: u32 },
    /// The session countdown reached zero and the metronome stopped
    SessionCompleted,
}

/// How a beat should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatStrength {
    /// First beat of the bar
    Strong,
    Weak,
}

/// A beat whose scheduled time has been reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualBeat {
    pub beat_in_bar: u32,
    /// Audio time the beat sounded at
    pub time: f64,
    pub strength: BeatStrength,
}

impl From<ScheduledNote> for VisualBeat {
    fn from(note: ScheduledNote) -> Self {
        let strength = if note.is_downbeat() {
            BeatStrength::Strong
        } else {
            BeatStrength::Weak
        };
        Self {
            beat_in_bar: note.beat_in_bar,
            time: note.time,
            strength,
        }
    }
}

/// Every user-facing setting, for applying or saving in one go.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MetronomeSettings {
    pub bpm: u16,
    pub beats_per_bar: u32,
    pub accent_enabled: bool,
    pub sound_profile: SoundProfile,
    pub training: TrainingConfig,
}

impl Default for MetronomeSettings {
    fn default() -> Self {
        let tempo = TempoState::default();
        Self {
            bpm: tempo.bpm(),
            beats_per_bar: tempo.beats_per_bar(),
            accent_enabled: tempo.accent_enabled(),
            sound_profile: tempo.sound_profile(),
            training: TrainingConfig::default(),
        }
    }
}

/// A snapshot of the metronome for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub playing: bool,
    pub bpm: u16,
    pub beats_per_bar: u32,
    /// The next beat the scheduler will produce
    pub beat_in_bar: u32,
    pub sound_profile: SoundProfile,
    pub accent_enabled: bool,
    /// Countdown as `mm:ss`, when a timed session is running
    pub session_remaining: Option<String>,
    /// Progression from start to end tempo, when progression is running
    pub progress: Option<f64>,
    /// Bars started in the current session
    pub bar_count: u64,
    /// Time since the session started, as `mm:ss`
    pub elapsed: String,
}

/// A look-ahead metronome.
///
/// Audio is scheduled against the clock's audio time, slightly ahead of when it
/// must sound, so the beat stays exact even when `poll` runs late. Timers,
/// tap tempo and training sessions run on the clock's wall time.
///
/// # Examples
///
/// ```
/// use clave::{ManualClock, Metronome, MetronomeEvent, TrainingConfig};
/// use clave::sound::RecordingOutput;
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let mut metronome = Metronome::new(clock.clone(), RecordingOutput::new());
/// metronome.set_training_config(TrainingConfig::default().with_session(1));
/// metronome.start()?;
///
/// let mut events = Vec::new();
/// while metronome.is_playing() {
///     clock.advance(Duration::from_millis(25));
///     events.extend(metronome.poll()?);
/// }
///
/// assert_eq!(events.last(), Some(&MetronomeEvent::SessionCompleted));
/// // One minute at 120 bpm.
/// assert_eq!(metronome.output().tones().len(), 121);
/// # Ok::<(), clave::Error>(())
/// ```
#[derive(Debug)]
pub struct Metronome<C, O> {
    clock: C,
    output: O,
    tempo: TempoState,
    queue: NoteQueue,
    scheduler: LookAheadScheduler,
    scheduler_timer: RepeatingTimer,
    session_timer: RepeatingTimer,
    taps: TapTempo,
    training: TrainingConfig,
    session: Option<TrainingSession>,
    playing: bool,
}

impl<C: Clock, O: AudioOutput> Metronome<C, O> {
    /// Creates a stopped metronome with the default scheduler timing.
    pub fn new(clock: C, output: O) -> Self {
        Self::with_config(clock, output, SchedulerConfig::default())
    }

    /// Creates a stopped metronome with custom scheduler timing.
    pub fn with_config(clock: C, output: O, config: SchedulerConfig) -> Self {
        Self {
            clock,
            output,
            tempo: TempoState::default(),
            queue: NoteQueue::new(),
            scheduler_timer: RepeatingTimer::new(config.lookahead),
            scheduler: LookAheadScheduler::new(config),
            session_timer: RepeatingTimer::new(SESSION_TICK),
            taps: TapTempo::new(),
            training: TrainingConfig::default(),
            session: None,
            playing: false,
        }
    }

    /// Returns `true` between a successful `start` and the next `stop`.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Starts playback. Does nothing if already playing.
    ///
    /// The output is resumed first; if that fails, the error is returned and
    /// the metronome stays stopped. Otherwise the first beat is placed
    /// `start_offset` after the current audio time, the training session
    /// starts and the first scheduling pass runs immediately.
    pub fn start(&mut self) -> Result<()> {
        if self.playing {
            return Ok(());
        }

        if let Err(e) = self.output.resume() {
            log::error!("cannot start: {e}");
            return Err(e);
        }

        let now = self.clock.wall_time();
        let tempo_before = self.tempo.clone();
        self.queue.clear();
        self.scheduler.reset(self.clock.audio_time(), &self.tempo);
        let session = TrainingSession::start(self.training, &mut self.tempo, now);
        let timed = session.remaining_secs().is_some();
        self.session = Some(session);
        self.playing = true;

        log::debug!(
            "metronome started at {} bpm, {}/bar, first beat at {:.4}s",
            self.tempo.bpm(),
            self.tempo.beats_per_bar(),
            self.scheduler.cursor().next_note_time
        );

        // Progression cannot fire on the first pass, so there are no events.
        let mut events = Vec::new();
        if let Err(e) = self.scheduler_tick(now, &mut events) {
            self.tempo = tempo_before;
            return Err(e);
        }

        self.scheduler_timer.arm(now);
        if timed {
            self.session_timer.arm(now);
        }
        Ok(())
    }

    /// Stops playback, cancelling both timers and discarding unplayed visuals
    /// and the training session. Tones already handed to the output still
    /// sound.
    pub fn stop(&mut self) {
        self.scheduler_timer.cancel();
        self.session_timer.cancel();
        self.queue.clear();
        self.session = None;

        if self.playing {
            self.playing = false;
            log::debug!("metronome stopped");
        }
    }

    /// Starts if stopped, stops if playing. Returns whether it is now playing.
    pub fn toggle(&mut self) -> Result<bool> {
        if self.playing {
            self.stop();
        } else {
            self.start()?;
        }
        Ok(self.playing)
    }

    /// Runs every timer that is due.
    ///
    /// An output error while scheduling stops the metronome and is returned.
    pub fn poll(&mut self) -> Result<Vec<MetronomeEvent>> {
        let mut events = Vec::new();
        if !self.playing {
            return Ok(events);
        }

        let now = self.clock.wall_time();
        if self.scheduler_timer.fire(now).is_some() {
            self.scheduler_tick(now, &mut events)?;
            self.scheduler_timer.arm(now);
        }

        while let Some(deadline) = self.session_timer.fire(now) {
            match self.session.as_mut().and_then(TrainingSession::on_second) {
                Some(SessionTick::Running { remaining_secs }) => {
                    events.push(MetronomeEvent::SessionTick { remaining_secs });
                    self.session_timer.arm_at(deadline + SESSION_TICK);
                }
                Some(SessionTick::Finished) => {
                    log::info!("training session completed");
                    events.push(MetronomeEvent::SessionTick { remaining_secs: 0 });
                    events.push(MetronomeEvent::SessionCompleted);
                    self.stop();
                }
                None => {}
            }
        }

        Ok(events)
    }

    /// Schedules due beats, then applies training progression.
    fn scheduler_tick(&mut self, now: Duration, events: &mut Vec<MetronomeEvent>) -> Result<()> {
        let Self {
            clock,
            output,
            tempo,
            queue,
            scheduler,
            session,
            ..
        } = self;

        let scheduled = scheduler.schedule_due(clock.audio_time(), tempo, |note| {
            render_note(tempo, note, queue, output)?;
            if note.beat_in_bar == 0
                && let Some(session) = session.as_mut()
            {
                session.count_bar();
            }
            Ok(())
        });

        if let Err(e) = scheduled {
            log::error!("audio output failed, stopping: {e}");
            self.stop();
            return Err(e);
        }

        if let Some(session) = self.session.as_mut()
            && let Some(bpm) = session.on_scheduler_tick(&mut self.tempo, now)
        {
            events.push(MetronomeEvent::BpmChanged { bpm });
        }
        Ok(())
    }

    /// The earliest armed timer deadline, in wall time.
    ///
    /// `None` when stopped.
    pub fn next_deadline(&self) -> Option<Duration> {
        [
            self.scheduler_timer.deadline(),
            self.session_timer.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Takes every scheduled beat whose time has been reached, oldest first.
    ///
    /// Returns nothing while stopped. Each beat is reported exactly once.
    pub fn poll_visuals(&mut self) -> Vec<VisualBeat> {
        let mut beats = Vec::new();
        if !self.playing {
            return beats;
        }

        self.queue
            .drain_due(self.clock.audio_time(), |note| beats.push(note.into()));
        beats
    }

    /// Registers a tap and, once there are enough taps, sets the tempo from
    /// them.
    pub fn tap(&mut self) -> Option<u16> {
        let at_ms = u64::try_from(self.clock.wall_time().as_millis()).unwrap_or(u64::MAX);
        let bpm = self.taps.tap(at_ms)?;
        self.tempo.set_bpm(bpm);
        Some(bpm)
    }

    /// Returns the current tempo, meter, accent and sound settings.
    pub fn tempo(&self) -> &TempoState {
        &self.tempo
    }

    /// Sets the tempo, clamped to 40..=300 BPM.
    ///
    /// While playing, beats not yet scheduled use the new tempo.
    pub fn set_bpm(&mut self, bpm: u16) {
        self.tempo.set_bpm(bpm);
    }

    /// Raises the tempo by 1 BPM.
    pub fn increase_bpm(&mut self) {
        self.tempo.increase_bpm();
    }

    /// Lowers the tempo by 1 BPM.
    pub fn decrease_bpm(&mut self) {
        self.tempo.decrease_bpm();
    }

    /// Sets the bar length. While playing, it applies from the next bar.
    pub fn set_beats_per_bar(&mut self, beats: u32) {
        self.tempo.set_beats_per_bar(beats);
    }

    /// Adds a beat to the bar, up to 12.
    pub fn increase_beats_per_bar(&mut self) {
        self.tempo.increase_beats_per_bar();
    }

    /// Removes a beat from the bar, down to 1.
    pub fn decrease_beats_per_bar(&mut self) {
        self.tempo.decrease_beats_per_bar();
    }

    /// Turns the accented first-beat sound on or off.
    pub fn set_accent_enabled(&mut self, enabled: bool) {
        self.tempo.set_accent_enabled(enabled);
    }

    /// Selects the sound used for beats not yet scheduled.
    pub fn set_sound_profile(&mut self, profile: SoundProfile) {
        self.tempo.set_sound_profile(profile);
    }

    /// Returns the training settings used by the next start.
    pub fn training_config(&self) -> &TrainingConfig {
        &self.training
    }

    /// Replaces the training settings. They apply from the next start.
    pub fn set_training_config(&mut self, config: TrainingConfig) {
        self.training = config.clamped();
    }

    /// The running training session, if playing.
    pub fn session(&self) -> Option<&TrainingSession> {
        self.session.as_ref()
    }

    /// Applies every setting through the clamping setters.
    pub fn apply_settings(&mut self, settings: MetronomeSettings) {
        self.tempo.set_bpm(settings.bpm);
        self.tempo.set_beats_per_bar(settings.beats_per_bar);
        self.tempo.set_accent_enabled(settings.accent_enabled);
        self.tempo.set_sound_profile(settings.sound_profile);
        self.set_training_config(settings.training);
    }

    /// Returns every user-facing setting, ready to save.
    ///
    /// # Examples
    ///
    /// ```
    /// use clave::{ManualClock, Metronome, MetronomeSettings};
    /// use clave::sound::RecordingOutput;
    ///
    /// let mut metronome = Metronome::new(ManualClock::new(), RecordingOutput::new());
    /// metronome.apply_settings(MetronomeSettings {
    ///     bpm: 500,
    ///     ..MetronomeSettings::default()
    /// });
    /// assert_eq!(metronome.settings().bpm, 300);
    /// ```
    pub fn settings(&self) -> MetronomeSettings {
        MetronomeSettings {
            bpm: self.tempo.bpm(),
            beats_per_bar: self.tempo.beats_per_bar(),
            accent_enabled: self.tempo.accent_enabled(),
            sound_profile: self.tempo.sound_profile(),
            training: self.training,
        }
    }

    /// Returns a snapshot for display.
    ///
    /// # Examples
    ///
    /// ```
    /// use clave::{ManualClock, Metronome, TrainingConfig};
    /// use clave::sound::RecordingOutput;
    ///
    /// let mut metronome = Metronome::new(ManualClock::new(), RecordingOutput::new());
    /// metronome.set_training_config(TrainingConfig::default().with_session(5));
    /// metronome.start()?;
    ///
    /// let status = metronome.status();
    /// assert!(status.playing);
    /// assert_eq!(status.session_remaining.as_deref(), Some("05:00"));
    /// # Ok::<(), clave::Error>(())
    /// ```
    pub fn status(&self) -> Status {
        let session = self.session.as_ref();
        let elapsed = session
            .map(|s| s.elapsed(self.clock.wall_time()).as_secs())
            .unwrap_or(0);

        Status {
            playing: self.playing,
            bpm: self.tempo.bpm(),
            beats_per_bar: self.tempo.beats_per_bar(),
            beat_in_bar: self.scheduler.cursor().beat_in_bar,
            sound_profile: self.tempo.sound_profile(),
            accent_enabled: self.tempo.accent_enabled(),
            session_remaining: session
                .and_then(TrainingSession::remaining_secs)
                .map(|secs| format_clock(u64::from(secs))),
            progress: session
                .filter(|s| s.config().progression_enabled)
                .map(|s| s.progress(self.tempo.bpm())),
            bar_count: session.map(TrainingSession::bar_count).unwrap_or(0),
            elapsed: format_clock(elapsed),
        }
    }

    /// Returns the scheduler, whose cursor points at the next beat.
    pub fn scheduler(&self) -> &LookAheadScheduler {
        &self.scheduler
    }

    /// Notes scheduled but not yet taken by [`poll_visuals`](Self::poll_visuals).
    pub fn queue(&self) -> &NoteQueue {
        &self.queue
    }

    /// Returns the clock driving this metronome.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns the audio output.
    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}
