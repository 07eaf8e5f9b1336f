use crate::Midi2DatError;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Emit `frequency_hz` for `duration_ms`; a zero frequency is a rest.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ToneSegment {
    pub frequency_hz: u32,
    pub duration_ms: u64,
}

impl ToneSegment {
    pub const fn new(frequency_hz: u32, duration_ms: u64) -> Self {
        Self {
            frequency_hz,
            duration_ms,
        }
    }

    pub const fn silence(duration_ms: u64) -> Self {
        Self::new(0, duration_ms)
    }

    pub const fn is_silence(&self) -> bool {
        self.frequency_hz == 0
    }
}

impl fmt::Display for ToneSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.frequency_hz, self.duration_ms)
    }
}

/// Total duration of a sequence in milliseconds.
pub fn total_duration_ms(segments: &[ToneSegment]) -> u64 {
    segments.iter().map(|s| s.duration_ms).sum()
}

/// Render segments as `[frequency, duration]` lines joined by `,\n`.
pub fn format_segments(segments: &[ToneSegment]) -> String {
    segments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",\n")
}

pub fn write_segments(path: &Path, segments: &[ToneSegment]) -> Result<(), Midi2DatError> {
    let content = format_segments(segments);
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    log::debug!("Wrote {} segments to {path:?}", segments.len());
    Ok(())
}
