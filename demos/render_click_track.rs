//! Renders a practice click track to a WAV file.
//!
//! The metronome runs against a simulated clock, so the whole session is
//! scheduled instantly; the recorded tones are then rendered offline.
//!
//! Usage: `cargo run --example render_click_track --features wav-export -- [out.wav]`

use anyhow::Result;
use clave::sound::{RecordingOutput, render_wav};
use clave::{ManualClock, Metronome, MetronomeEvent, SoundProfile, TrainingConfig};
use std::time::Duration;

const SAMPLE_RATE: u32 = 44100;

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "click_track.wav".to_string());

    let clock = ManualClock::new();
    let mut metronome = Metronome::new(clock.clone(), RecordingOutput::new());
    metronome.set_sound_profile(SoundProfile::Woodblock);
    metronome.set_beats_per_bar(3);
    metronome.set_training_config(
        TrainingConfig::default()
            .with_session(1)
            .with_progression(90, 120)
            .with_interval_secs(10)
            .with_bpm_increment(10),
    );

    println!("Scheduling a 1 minute session, 90 to 120 BPM in 3/4...");
    metronome.start()?;
    while metronome.is_playing() {
        clock.advance(Duration::from_millis(25));
        for event in metronome.poll()? {
            if let MetronomeEvent::BpmChanged { bpm } = event {
                println!("  {:>5.1}s  tempo -> {bpm} BPM", clock_seconds(&clock));
            }
        }
    }

    let tones = metronome.output_mut().take_tones();
    let length = tones.last().map_or(0.0, |tone| tone.stop());
    println!("Rendering {} beats to {path}...", tones.len());

    let frames = render_wav::<SAMPLE_RATE>(&path, tones, length)?;
    println!(
        "✓ Wrote {:.1}s of audio",
        frames as f64 / SAMPLE_RATE as f64
    );

    Ok(())
}

fn clock_seconds(clock: &ManualClock) -> f64 {
    use clave::Clock;
    clock.wall_time().as_secs_f64()
}
