use crate::audio::tone_player::ToneEmitter;
use crate::Midi2DatError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const AMPLITUDE: f32 = 0.2;

/// Square wave tones on the default output device.
pub struct SpeakerEmitter {
    stream: cpal::Stream,      // kept alive while playing
    frequency: Arc<AtomicU32>, // 0 = silence, read by the audio callback
}

impl SpeakerEmitter {
    pub fn new() -> Result<Self, Midi2DatError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Midi2DatError::AudioError("No output device available".to_string()))?;
        let config = device
            .default_output_config()
            .map_err(|err| Midi2DatError::AudioError(err.to_string()))?;
        if config.sample_format() != cpal::SampleFormat::F32 {
            return Err(Midi2DatError::AudioError(format!(
                "Unsupported sample format {}",
                config.sample_format()
            )));
        }
        let stream_config: cpal::StreamConfig = config.into();
        let channels_count = usize::from(stream_config.channels);
        let sample_rate = stream_config.sample_rate.0 as f32;
        log::debug!("Speaker output: {channels_count} channels at {sample_rate}Hz");

        let frequency = Arc::new(AtomicU32::new(0));
        let callback_frequency = frequency.clone();
        let mut phase: f32 = 0.0;

        let err_fn = |err| log::error!("an error occurred on stream: {err}");

        let stream = device
            .build_output_stream(
                &stream_config,
                move |output: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let frequency = callback_frequency.load(Ordering::Relaxed);
                    for frame in output.chunks_mut(channels_count) {
                        let value = if frequency == 0 {
                            phase = 0.0;
                            0.0
                        } else {
                            phase = (phase + frequency as f32 / sample_rate) % 1.0;
                            square_wave(phase)
                        };
                        frame.fill(value);
                    }
                },
                err_fn,
                None, // blocking stream
            )
            .map_err(|err| Midi2DatError::AudioError(err.to_string()))?;
        stream
            .play()
            .map_err(|err| Midi2DatError::AudioError(err.to_string()))?;
        Ok(Self { stream, frequency })
    }
}

fn square_wave(phase: f32) -> f32 {
    if phase < 0.5 {
        AMPLITUDE
    } else {
        -AMPLITUDE
    }
}

impl ToneEmitter for SpeakerEmitter {
    fn emit(&mut self, frequency_hz: u32, duration_ms: u64) -> Result<(), Midi2DatError> {
        self.frequency.store(frequency_hz, Ordering::Relaxed);
        thread::sleep(Duration::from_millis(duration_ms));
        self.frequency.store(0, Ordering::Relaxed);
        Ok(())
    }
}

impl Drop for SpeakerEmitter {
    fn drop(&mut self) {
        if let Err(err) = self.stream.pause() {
            log::debug!("Could not pause speaker stream: {err}");
        }
    }
}
