//! Interactive terminal metronome playing through the default audio device.
//!
//! ## Controls
//!
//! - Space: start / stop
//! - Up / Down: tempo +1 / -1 BPM
//! - Right / Left: beats per bar +1 / -1
//! - T: tap tempo
//! - A: toggle accent
//! - S: cycle sound (digital, click, woodblock)
//! - P: toggle a 5 minute practice session ramping 60 to 120 BPM
//! - Q or ESC: Quit
//!
//! Run with `RUST_LOG=clave=debug` to see scheduling logs on stderr.

use anyhow::Result;
use clave::sound::DeviceOutput;
use clave::{
    BeatStrength, Clock, Metronome, MetronomeEvent, SampleClock, SoundProfile, Status,
    TrainingConfig,
};
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{Write, stdout};
use std::panic;
use std::time::Duration;

const SAMPLE_RATE: u32 = 48000;

/// Upper bound on how long the loop sleeps, so visuals stay responsive.
const FRAME: Duration = Duration::from_millis(16);

type DeviceMetronome = Metronome<SampleClock, DeviceOutput<SAMPLE_RATE>>;

fn main() -> Result<()> {
    env_logger::init();

    let output = DeviceOutput::<SAMPLE_RATE>::new();
    let mut metronome = Metronome::new(output.clock(), output);

    terminal::enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(crossterm::cursor::Hide)?;

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        cleanup_terminal();
        original_hook(panic_info);
    }));

    let result = run(&mut metronome);
    cleanup_terminal();
    result
}

fn run(metronome: &mut DeviceMetronome) -> Result<()> {
    let mut current_beat: Option<(u32, BeatStrength)> = None;
    let mut message = String::from("Press space to start");
    draw(&metronome.status(), current_beat, &message)?;

    loop {
        let timeout = metronome
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(metronome.clock().wall_time()))
            .map_or(FRAME, |wait| wait.min(FRAME));

        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => break,
                KeyCode::Char(' ') => {
                    message = match metronome.toggle() {
                        Ok(true) => "Playing".to_string(),
                        Ok(false) => "Stopped".to_string(),
                        Err(e) => format!("Cannot start: {e}"),
                    };
                    current_beat = None;
                }
                KeyCode::Up => metronome.increase_bpm(),
                KeyCode::Down => metronome.decrease_bpm(),
                KeyCode::Right => metronome.increase_beats_per_bar(),
                KeyCode::Left => metronome.decrease_beats_per_bar(),
                KeyCode::Char('t') | KeyCode::Char('T') => {
                    if let Some(bpm) = metronome.tap() {
                        message = format!("Tapped {bpm} BPM");
                    }
                }
                KeyCode::Char('a') | KeyCode::Char('A') => {
                    let enabled = !metronome.tempo().accent_enabled();
                    metronome.set_accent_enabled(enabled);
                }
                KeyCode::Char('s') | KeyCode::Char('S') => {
                    metronome.set_sound_profile(next_profile(metronome.tempo().sound_profile()));
                }
                KeyCode::Char('p') | KeyCode::Char('P') => {
                    let practice = !metronome.training_config().session_enabled;
                    let config = if practice {
                        TrainingConfig::default()
                            .with_session(5)
                            .with_progression(60, 120)
                            .with_interval_secs(30)
                    } else {
                        TrainingConfig::default()
                    };
                    metronome.set_training_config(config);
                    message = format!(
                        "Practice mode {} (applies on next start)",
                        if practice { "on" } else { "off" }
                    );
                }
                _ => {}
            }
        }

        match metronome.poll() {
            Ok(events) => {
                for event in events {
                    match event {
                        MetronomeEvent::BpmChanged { bpm } => {
                            message = format!("Tempo up: {bpm} BPM")
                        }
                        MetronomeEvent::SessionCompleted => {
                            message = "Practice session finished!".to_string();
                            current_beat = None;
                        }
                        MetronomeEvent::SessionTick { .. } => {}
                    }
                }
            }
            Err(e) => {
                message = format!("Audio error: {e}");
                current_beat = None;
            }
        }

        if let Some(beat) = metronome.poll_visuals().last() {
            current_beat = Some((beat.beat_in_bar, beat.strength));
        }

        draw(&metronome.status(), current_beat, &message)?;
    }

    metronome.stop();
    Ok(())
}

fn next_profile(profile: SoundProfile) -> SoundProfile {
    let index = SoundProfile::ALL
        .iter()
        .position(|&p| p == profile)
        .unwrap_or(0);
    SoundProfile::ALL[(index + 1) % SoundProfile::ALL.len()]
}

fn draw(status: &Status, current_beat: Option<(u32, BeatStrength)>, message: &str) -> Result<()> {
    let mut out = stdout();
    out.execute(crossterm::cursor::MoveTo(0, 0))?;
    out.execute(terminal::Clear(terminal::ClearType::All))?;

    write!(out, "Clave Metronome\r\n\r\n")?;
    write!(
        out,
        "  {} BPM   {}/bar   sound: {}   accent: {}\r\n\r\n",
        status.bpm,
        status.beats_per_bar,
        status.sound_profile,
        if status.accent_enabled { "on" } else { "off" }
    )?;

    write!(out, "  ")?;
    for beat in 0..status.beats_per_bar {
        let dot = match current_beat {
            Some((b, BeatStrength::Strong)) if b == beat => "(O)",
            Some((b, BeatStrength::Weak)) if b == beat => "(o)",
            _ => " . ",
        };
        write!(out, "{dot} ")?;
    }
    write!(out, "\r\n\r\n")?;

    if let Some(remaining) = &status.session_remaining {
        write!(out, "  Session remaining: {remaining}\r\n")?;
    }
    if let Some(progress) = status.progress {
        let filled = (progress * 20.0).round() as usize;
        write!(
            out,
            "  Progress: [{}{}] {:.0}%\r\n",
            "#".repeat(filled),
            "-".repeat(20 - filled),
            progress * 100.0
        )?;
    }
    if status.playing {
        write!(
            out,
            "  Bars: {}   Elapsed: {}\r\n",
            status.bar_count, status.elapsed
        )?;
    }

    write!(out, "\r\n  {message}\r\n\r\n")?;
    write!(out, "  Space start/stop | Up/Down tempo | Left/Right meter | T tap\r\n")?;
    write!(out, "  A accent | S sound | P practice | Q quit\r\n")?;
    out.flush()?;
    Ok(())
}

fn cleanup_terminal() {
    let _ = stdout().execute(crossterm::cursor::Show);
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}
