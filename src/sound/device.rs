//! Real-time output through the default cpal audio device.

use super::mixer::{MixerHandle, ToneMixer};
use super::output::AudioOutput;
use super::tone::ScheduledTone;
use crate::clock::SampleClock;
use crate::core::Signal;
use crate::error::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, StreamConfig};
use std::sync::{Arc, Mutex};

/// Plays scheduled tones on the system's default output device.
///
/// The device is opened on the first [`resume`](AudioOutput::resume), and the
/// stream is created at `SAMPLE_RATE` Hz. Audio time is the number of frames the
/// stream has pulled from the mixer, so [`clock`](Self::clock) is the clock to
/// give the metronome.
///
/// ```no_run
/// use clave::Metronome;
/// use clave::sound::DeviceOutput;
///
/// let output = DeviceOutput::<48000>::new();
/// let mut metronome = Metronome::new(output.clock(), output);
/// metronome.start()?;
/// # Ok::<(), clave::Error>(())
/// ```
pub struct DeviceOutput<const SAMPLE_RATE: u32> {
    mixer: MixerHandle<SAMPLE_RATE>,
    stream: Option<cpal::Stream>,
    stream_error: Arc<Mutex<Option<String>>>,
}

impl<const SAMPLE_RATE: u32> Default for DeviceOutput<SAMPLE_RATE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SAMPLE_RATE: u32> DeviceOutput<SAMPLE_RATE> {
    /// Creates an output. No device is opened until `resume`.
    pub fn new() -> Self {
        Self {
            mixer: MixerHandle::new(ToneMixer::new()),
            stream: None,
            stream_error: Arc::new(Mutex::new(None)),
        }
    }

    /// The audio clock driven by this output's stream.
    pub fn clock(&self) -> SampleClock {
        self.mixer.clock()
    }

    /// Returns the mixer the stream pulls samples from.
    pub fn mixer(&self) -> &MixerHandle<SAMPLE_RATE> {
        &self.mixer
    }

    /// Whether the device stream has been opened.
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn open_stream(&self) -> Result<cpal::Stream> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::OutputUnavailable("no output device available".to_string()))?;
        let supported = device
            .default_output_config()
            .map_err(|e| Error::OutputUnavailable(e.to_string()))?;

        let config = StreamConfig {
            channels: supported.channels(),
            sample_rate: cpal::SampleRate(SAMPLE_RATE),
            buffer_size: cpal::BufferSize::Default,
        };
        log::debug!(
            "opening {} output at {} Hz, {} channel(s)",
            device
                .name()
                .unwrap_or_else(|_| "unnamed device".to_string()),
            SAMPLE_RATE,
            config.channels
        );

        match supported.sample_format() {
            SampleFormat::F32 => self.build_stream::<f32>(&device, &config),
            SampleFormat::I16 => self.build_stream::<i16>(&device, &config),
            SampleFormat::U16 => self.build_stream::<u16>(&device, &config),
            sample_format => Err(Error::OutputUnavailable(format!(
                "unsupported sample format: {sample_format}"
            ))),
        }
    }

    /// Builds a stream that pulls mono samples from the mixer into every channel.
    fn build_stream<T>(&self, device: &cpal::Device, config: &StreamConfig) -> Result<cpal::Stream>
    where
        T: Sample + FromSample<f64> + cpal::SizedSample,
    {
        let channels = config.channels as usize;
        let mixer = self.mixer.clone();
        let stream_error = self.stream_error.clone();

        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let Ok(mut mixer) = mixer.lock() else {
                        data.fill(T::EQUILIBRIUM);
                        return;
                    };
                    for frame in data.chunks_mut(channels) {
                        let value = T::from_sample(mixer.next_sample());
                        frame.fill(value);
                    }
                },
                move |err| {
                    log::error!("audio stream error: {err}");
                    if let Ok(mut slot) = stream_error.lock() {
                        *slot = Some(err.to_string());
                    }
                },
                None,
            )
            .map_err(|e| Error::OutputUnavailable(e.to_string()))
    }

    fn take_stream_error(&self) -> Option<String> {
        self.stream_error
            .lock()
            .ok()
            .and_then(|mut slot| slot.take())
    }
}

impl<const SAMPLE_RATE: u32> AudioOutput for DeviceOutput<SAMPLE_RATE> {
    fn resume(&mut self) -> Result<()> {
        if self.stream.is_none() {
            self.stream = Some(self.open_stream()?);
        }
        if let Some(stream) = &self.stream {
            stream
                .play()
                .map_err(|e| Error::OutputUnavailable(e.to_string()))?;
        }
        // A stale error from a previous session must not kill this one.
        self.take_stream_error();
        Ok(())
    }

    fn schedule(&mut self, tone: ScheduledTone) -> Result<()> {
        if let Some(message) = self.take_stream_error() {
            return Err(Error::Stream(message));
        }
        self.mixer.schedule(tone)
    }
}
