use crate::audio::tone::ToneSegment;
use crate::Midi2DatError;
use std::process::Command;
use std::thread;
use std::time::Duration;

/// Default external tone utility, driving the PC speaker.
pub const DEFAULT_BEEP_PROGRAM: &str = "beep";

/// Something able to sound a tone and block until it is done.
pub trait ToneEmitter {
    /// Sound `frequency_hz` for `duration_ms`, returning once the tone is finished.
    fn emit(&mut self, frequency_hz: u32, duration_ms: u64) -> Result<(), Midi2DatError>;

    /// Stay silent for `duration_ms`.
    fn rest(&mut self, duration_ms: u64) {
        thread::sleep(Duration::from_millis(duration_ms));
    }
}

/// Realize each segment in order, rests are slept and tones are emitted.
/// Stops at the first emitter failure.
pub fn play<E: ToneEmitter + ?Sized>(
    segments: &[ToneSegment],
    emitter: &mut E,
) -> Result<(), Midi2DatError> {
    log::info!("Playing {} segments", segments.len());
    for segment in segments {
        if segment.is_silence() {
            emitter.rest(segment.duration_ms);
        } else {
            log::debug!(
                "Tone {}Hz for {}ms",
                segment.frequency_hz,
                segment.duration_ms
            );
            emitter.emit(segment.frequency_hz, segment.duration_ms)?;
        }
    }
    Ok(())
}

/// Runs `<program> -f <frequency> -l <duration>` for every tone.
#[derive(Debug, Clone)]
pub struct BeepEmitter {
    program: String,
}

impl BeepEmitter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, frequency_hz: u32, duration_ms: u64) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("-f")
            .arg(frequency_hz.to_string())
            .arg("-l")
            .arg(duration_ms.to_string());
        command
    }
}

impl Default for BeepEmitter {
    fn default() -> Self {
        Self::new(DEFAULT_BEEP_PROGRAM)
    }
}

impl ToneEmitter for BeepEmitter {
    fn emit(&mut self, frequency_hz: u32, duration_ms: u64) -> Result<(), Midi2DatError> {
        let status = self
            .command(frequency_hz, duration_ms)
            .status()
            .map_err(|err| {
                Midi2DatError::AudioError(format!("Could not run {}: {err}", self.program))
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(Midi2DatError::AudioError(format!(
                "{} exited with {status}",
                self.program
            )))
        }
    }
}
