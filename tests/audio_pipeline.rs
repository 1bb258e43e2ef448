#![cfg(feature = "synth")]

//! Rendering a running metronome through the tone mixer.

use clave::sound::{MixerHandle, ToneMixer};
use clave::{Clock, ManualClock, Metronome, SampleClock, SoundProfile};
use std::time::Duration;

const SAMPLE_RATE: u32 = 48000;
/// 25 ms of audio
const BLOCK: usize = 1200;

/// Audio time from the mixer, wall time under test control.
#[derive(Clone)]
struct SimulatedClock {
    audio: SampleClock,
    wall: ManualClock,
}

impl Clock for SimulatedClock {
    fn audio_time(&self) -> f64 {
        self.audio.audio_time()
    }

    fn wall_time(&self) -> Duration {
        self.wall.wall_time()
    }
}

/// Renders `blocks` blocks, polling the metronome between them the way an
/// event loop would.
fn render(
    mixer: &MixerHandle<SAMPLE_RATE>,
    clock: &SimulatedClock,
    metronome: &mut Metronome<SimulatedClock, MixerHandle<SAMPLE_RATE>>,
    blocks: usize,
) -> Vec<f64> {
    let mut samples = Vec::with_capacity(blocks * BLOCK);
    let mut buffer = vec![0.0; BLOCK];
    for _ in 0..blocks {
        mixer.render(&mut buffer).unwrap();
        samples.extend_from_slice(&buffer);
        clock.wall.advance_wall(Duration::from_millis(25));
        metronome.poll().unwrap();
    }
    samples
}

fn setup() -> (
    MixerHandle<SAMPLE_RATE>,
    SimulatedClock,
    Metronome<SimulatedClock, MixerHandle<SAMPLE_RATE>>,
) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mixer = MixerHandle::new(ToneMixer::<SAMPLE_RATE>::new());
    let clock = SimulatedClock {
        audio: mixer.clock(),
        wall: ManualClock::new(),
    };
    let metronome = Metronome::new(clock.clone(), mixer.clone());
    (mixer, clock, metronome)
}

#[test]
fn test_beats_land_on_exact_frames() {
    let (mixer, clock, mut metronome) = setup();
    metronome.start().unwrap();

    let samples = render(&mixer, &clock, &mut metronome, 40);

    // 0.05 s and 0.55 s at 48 kHz.
    assert_eq!(samples[2399], 0.0);
    assert!((samples[2400] - 0.1).abs() < 1e-12);
    assert_eq!(samples[26399], 0.0);
    assert!((samples[26400] - 0.1).abs() < 1e-12);

    // Silence between the end of one beat and the start of the next.
    assert!(samples[4800..26400].iter().all(|&s| s == 0.0));
}

#[test]
fn test_stop_lets_scheduled_tones_finish() {
    let (mixer, clock, mut metronome) = setup();
    metronome.set_sound_profile(SoundProfile::Woodblock);
    metronome.start().unwrap();
    metronome.stop();

    // The first beat was already handed to the mixer and still sounds.
    let samples = render(&mixer, &clock, &mut metronome, 10);
    assert!(samples[2400..7200].iter().any(|&s| s != 0.0));
    assert!(samples[7200..].iter().all(|&s| s == 0.0));
    assert!(mixer.lock().unwrap().is_idle());
}
