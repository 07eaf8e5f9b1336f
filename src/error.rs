//! Error types for the midi2dat library

use std::io;

/// Library error type for midi2dat operations
#[derive(Debug, thiserror::Error)]
pub enum Midi2DatError {
    /// Parsing error when reading Standard MIDI Files
    #[error("parsing error: {0}")]
    ParsingError(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Invalid tick/tempo conversion parameters
    #[error("conversion error: {0}")]
    ConversionError(String),

    /// Tone playback error
    #[error("audio error: {0}")]
    AudioError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<io::Error> for Midi2DatError {
    fn from(error: io::Error) -> Self {
        Self::IoError(error.to_string())
    }
}
