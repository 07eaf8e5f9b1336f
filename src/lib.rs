//! midi2dat - MIDI to PWM tone data converter
//!
//! This library provides:
//! - Parsing of Standard MIDI Files (.mid)
//! - Conversion of note events into `(frequency, duration)` tone segments
//! - Output of tone segments as `.dat` text and sequential playback
//!
//! # Example
//!
//! ```no_run
//! use midi2dat::{format_segments, MidiFileParser, SmfParser, ToneSequencer, DEFAULT_TEMPO};
//!
//! let file_data = std::fs::read("song.mid").unwrap();
//! let midi_file = SmfParser.parse(&file_data).unwrap();
//! let sequencer = ToneSequencer::for_file(&midi_file, DEFAULT_TEMPO).unwrap();
//! let segments = sequencer.sequence_file(&midi_file);
//! println!("{}", format_segments(&segments));
//! ```

pub mod audio;
pub mod error;
pub mod parser;

// Re-export main types for convenience
pub use audio::{
    midi_event::{MetaEvent, MidiEvent, MidiEventType},
    speaker::SpeakerEmitter,
    tone::{format_segments, total_duration_ms, write_segments, ToneSegment},
    tone_player::{play, BeepEmitter, ToneEmitter, DEFAULT_BEEP_PROGRAM},
    tone_sequencer::{note_to_frequency, ToneSequencer, DEFAULT_TEMPO},
};
pub use error::Midi2DatError;
pub use parser::midi_parser::{parse_midi_data, MidiFile, MidiFileParser, MidiTrack, SmfParser};
