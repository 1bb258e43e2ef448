//! Tempo, meter and sound selection.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Slowest supported tempo in BPM.
pub const MIN_BPM: u16 = 40;
/// Fastest supported tempo in BPM.
pub const MAX_BPM: u16 = 300;
/// Fewest beats in a bar.
pub const MIN_BEATS_PER_BAR: u32 = 1;
/// Most beats in a bar.
pub const MAX_BEATS_PER_BAR: u32 = 12;

/// The synthesized sound used for each beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SoundProfile {
    /// Short square-wave beep
    #[default]
    Digital,
    /// Very short, bright square-wave tick
    Click,
    /// Sine tone with a falling pitch sweep
    Woodblock,
}

impl SoundProfile {
    /// All profiles, in display order.
    pub const ALL: [SoundProfile; 3] = [
        SoundProfile::Digital,
        SoundProfile::Click,
        SoundProfile::Woodblock,
    ];

    /// Lower-case name of the profile.
    pub fn name(&self) -> &'static str {
        match self {
            SoundProfile::Digital => "digital",
            SoundProfile::Click => "click",
            SoundProfile::Woodblock => "woodblock",
        }
    }
}

impl fmt::Display for SoundProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SoundProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoundProfile::ALL
            .into_iter()
            .find(|profile| profile.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownSoundProfile(s.to_string()))
    }
}

/// Tempo, meter, accent policy and sound profile.
///
/// Every setter clamps its input, so `bpm` is always within
/// [`MIN_BPM`]..=[`MAX_BPM`] and `beats_per_bar` within
/// [`MIN_BEATS_PER_BAR`]..=[`MAX_BEATS_PER_BAR`].
///
/// # Examples
///
/// ```
/// use clave::TempoState;
///
/// let mut tempo = TempoState::default();
/// assert_eq!(tempo.bpm(), 120);
/// assert_eq!(tempo.beats_per_bar(), 4);
///
/// tempo.set_bpm(1000);
/// assert_eq!(tempo.bpm(), 300);
///
/// tempo.set_bpm(90);
/// assert_eq!(tempo.beat_duration(), 60.0 / 90.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TempoState {
    bpm: u16,
    beats_per_bar: u32,
    accent_enabled: bool,
    sound_profile: SoundProfile,
}

impl Default for TempoState {
    fn default() -> Self {
        Self {
            bpm: 120,
            beats_per_bar: 4,
            accent_enabled: true,
            sound_profile: SoundProfile::Digital,
        }
    }
}

impl TempoState {
    /// Creates a tempo state, clamping `bpm` and `beats_per_bar` into range.
    pub fn new(bpm: u16, beats_per_bar: u32) -> Self {
        let mut tempo = Self::default();
        tempo.set_bpm(bpm);
        tempo.set_beats_per_bar(beats_per_bar);
        tempo
    }

    /// Current tempo in BPM.
    pub fn bpm(&self) -> u16 {
        self.bpm
    }

    /// Sets the tempo, clamped to [`MIN_BPM`]..=[`MAX_BPM`].
    pub fn set_bpm(&mut self, bpm: u16) {
        self.bpm = bpm.clamp(MIN_BPM, MAX_BPM);
    }

    /// Raises the tempo by one BPM, saturating at [`MAX_BPM`].
    pub fn increase_bpm(&mut self) {
        self.set_bpm(self.bpm.saturating_add(1));
    }

    /// Lowers the tempo by one BPM, saturating at [`MIN_BPM`].
    pub fn decrease_bpm(&mut self) {
        self.set_bpm(self.bpm.saturating_sub(1));
    }

    /// Number of beats in a bar.
    pub fn beats_per_bar(&self) -> u32 {
        self.beats_per_bar
    }

    /// Sets the number of beats per bar, clamped to
    /// [`MIN_BEATS_PER_BAR`]..=[`MAX_BEATS_PER_BAR`].
    pub fn set_beats_per_bar(&mut self, beats: u32) {
        self.beats_per_bar = beats.clamp(MIN_BEATS_PER_BAR, MAX_BEATS_PER_BAR);
    }

    /// Adds one beat to the bar, saturating at [`MAX_BEATS_PER_BAR`].
    pub fn increase_beats_per_bar(&mut self) {
        self.set_beats_per_bar(self.beats_per_bar.saturating_add(1));
    }

    /// Removes one beat from the bar, saturating at [`MIN_BEATS_PER_BAR`].
    pub fn decrease_beats_per_bar(&mut self) {
        self.set_beats_per_bar(self.beats_per_bar.saturating_sub(1));
    }

    /// Whether the first beat of each bar is accented.
    pub fn accent_enabled(&self) -> bool {
        self.accent_enabled
    }

    /// Turns the first-beat accent on or off.
    pub fn set_accent_enabled(&mut self, enabled: bool) {
        self.accent_enabled = enabled;
    }

    /// Returns the selected sound.
    pub fn sound_profile(&self) -> SoundProfile {
        self.sound_profile
    }

    /// Selects the sound.
    pub fn set_sound_profile(&mut self, profile: SoundProfile) {
        self.sound_profile = profile;
    }

    /// Length of one beat in seconds (`60 / bpm`).
    pub fn beat_duration(&self) -> f64 {
        60.0 / self.bpm as f64
    }

    /// Whether the beat at `beat_index` gets the accented sound.
    ///
    /// # Examples
    ///
    /// ```
    /// use clave::TempoState;
    ///
    /// let mut tempo = TempoState::new(120, 4);
    /// assert!(tempo.is_accent(0));
    /// assert!(tempo.is_accent(4));
    /// assert!(!tempo.is_accent(3));
    ///
    /// tempo.set_accent_enabled(false);
    /// assert!(!tempo.is_accent(0));
    /// ```
    pub fn is_accent(&self, beat_index: u32) -> bool {
        self.accent_enabled && beat_index % self.beats_per_bar == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let tempo = TempoState::default();
        assert_eq!(tempo.bpm(), 120);
        assert_eq!(tempo.beats_per_bar(), 4);
        assert!(tempo.accent_enabled());
        assert_eq!(tempo.sound_profile(), SoundProfile::Digital);
    }

    #[test]
    fn test_new_clamps() {
        let tempo = TempoState::new(10, 40);
        assert_eq!(tempo.bpm(), MIN_BPM);
        assert_eq!(tempo.beats_per_bar(), MAX_BEATS_PER_BAR);

        let tempo = TempoState::new(u16::MAX, 0);
        assert_eq!(tempo.bpm(), MAX_BPM);
        assert_eq!(tempo.beats_per_bar(), MIN_BEATS_PER_BAR);
    }

    #[test]
    fn test_step_buttons_saturate() {
        let mut tempo = TempoState::new(MAX_BPM, MAX_BEATS_PER_BAR);
        tempo.increase_bpm();
        tempo.increase_beats_per_bar();
        assert_eq!(tempo.bpm(), MAX_BPM);
        assert_eq!(tempo.beats_per_bar(), MAX_BEATS_PER_BAR);

        let mut tempo = TempoState::new(MIN_BPM, MIN_BEATS_PER_BAR);
        tempo.decrease_bpm();
        tempo.decrease_beats_per_bar();
        assert_eq!(tempo.bpm(), MIN_BPM);
        assert_eq!(tempo.beats_per_bar(), MIN_BEATS_PER_BAR);

        tempo.increase_bpm();
        tempo.increase_beats_per_bar();
        assert_eq!(tempo.bpm(), MIN_BPM + 1);
        assert_eq!(tempo.beats_per_bar(), 2);
    }

    #[test]
    fn test_beat_duration() {
        assert_eq!(TempoState::new(60, 4).beat_duration(), 1.0);
        assert_eq!(TempoState::new(120, 4).beat_duration(), 0.5);
        assert_eq!(TempoState::new(240, 4).beat_duration(), 0.25);
    }

    #[test]
    fn test_accent_every_bar() {
        let tempo = TempoState::new(120, 4);
        for beat in [0, 4, 8, 12] {
            assert!(tempo.is_accent(beat), "beat {beat} should be accented");
        }
        for beat in [1, 2, 3, 5, 6, 7] {
            assert!(!tempo.is_accent(beat), "beat {beat} should not be accented");
        }
    }

    #[test]
    fn test_single_beat_bar_accents_everything() {
        let tempo = TempoState::new(120, 1);
        assert!((0..8).all(|beat| tempo.is_accent(beat)));
    }

    #[test]
    fn test_sound_profile_parse() {
        assert_eq!("digital".parse::<SoundProfile>().unwrap(), SoundProfile::Digital);
        assert_eq!("Click".parse::<SoundProfile>().unwrap(), SoundProfile::Click);
        assert_eq!(
            " WOODBLOCK ".parse::<SoundProfile>().unwrap(),
            SoundProfile::Woodblock
        );
        assert!(matches!(
            "cowbell".parse::<SoundProfile>(),
            Err(Error::UnknownSoundProfile(name)) if name == "cowbell"
        ));
    }

    #[test]
    fn test_sound_profile_display_round_trips() {
        for profile in SoundProfile::ALL {
            assert_eq!(profile.to_string().parse::<SoundProfile>().unwrap(), profile);
        }
    }
}
