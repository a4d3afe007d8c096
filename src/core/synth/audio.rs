//! Audio device output for the synth graph

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat, Stream};
use log::{error, info};
use std::sync::{Arc, RwLock};

use super::Synth;
use crate::core::error::PianoError;

/// Sample rate used when no device could be opened
pub const FALLBACK_SAMPLE_RATE: f32 = 44_100.0;

/// Owns the running output stream. Dropping it stops playback.
pub struct AudioEngine {
    _stream: Stream,
    pub device_name: String,
    pub sample_rate: f32,
    pub channels: u16,
}

impl AudioEngine {
    /// Open the default output device and start pulling samples from a new synth.
    ///
    /// Called once at startup; an error here means no playback for the
    /// lifetime of the process.
    pub fn open() -> Result<(Self, Arc<RwLock<Synth>>), PianoError> {
        let host = cpal::default_host();
        info!("Using audio host: {}", host.id().name());

        let device = host
            .default_output_device()
            .ok_or_else(|| PianoError::UnsupportedEnvironment("no output device available".into()))?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".into());
        info!("Using output device: {}", device_name);

        let supported = device
            .default_output_config()
            .map_err(|e| PianoError::UnsupportedEnvironment(e.to_string()))?;
        let sample_format = supported.sample_format();
        let config = cpal::StreamConfig::from(supported);
        let sample_rate = config.sample_rate.0 as f32;
        info!("Device config: {:?} at {} Hz", sample_format, sample_rate);

        let synth = Arc::new(RwLock::new(Synth::new(sample_rate)));

        let stream = match sample_format {
            SampleFormat::F32 => create_stream::<f32>(&device, &config, Arc::clone(&synth)),
            SampleFormat::I16 => create_stream::<i16>(&device, &config, Arc::clone(&synth)),
            SampleFormat::U16 => create_stream::<u16>(&device, &config, Arc::clone(&synth)),
            other => Err(PianoError::UnsupportedEnvironment(format!(
                "unsupported sample format {:?}",
                other
            ))),
        }?;

        stream
            .play()
            .map_err(|e| PianoError::UnsupportedEnvironment(e.to_string()))?;
        info!("Audio stream started");

        let engine = AudioEngine {
            _stream: stream,
            device_name,
            sample_rate,
            channels: config.channels,
        };
        Ok((engine, synth))
    }
}

fn create_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    synth: Arc<RwLock<Synth>>,
) -> Result<Stream, PianoError>
where
    T: Sample + Send + 'static + cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let err_fn = |err| error!("an error occurred on the audio stream: {}", err);

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // One lock per buffer; a poisoned graph plays silence
                let mut guard = match synth.write() {
                    Ok(guard) => guard,
                    Err(_) => {
                        data.fill(T::EQUILIBRIUM);
                        return;
                    }
                };

                for frame in data.chunks_mut(channels) {
                    let value = T::from_sample(guard.next_sample());
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                }
            },
            err_fn,
            None,
        )
        .map_err(|e| PianoError::UnsupportedEnvironment(e.to_string()))
}
