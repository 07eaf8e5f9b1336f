//! Integration tests for midi2dat library usage.
//!
//! These tests verify that the library can be used as a dependency
//! from external projects.

use midi2dat::{
    format_segments, note_to_frequency, parse_midi_data, play, total_duration_ms, write_segments,
    Midi2DatError, MidiFile, MidiFileParser, SmfParser, ToneEmitter, ToneSegment, ToneSequencer,
    DEFAULT_TEMPO,
};

/// Two track SMF: a conductor track and a short melody with a leading rest.
fn sample_smf() -> Vec<u8> {
    let conductor: &[u8] = &[
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // tempo 500000
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let melody: &[u8] = &[
        0x00, 0xFF, 0x03, 0x04, b'T', b'u', b'n', b'e', // track name
        0x81, 0x70, 0x90, 0x48, 0x64, // note_on C5 after 240 ticks
        0x83, 0x60, 0x80, 0x48, 0x40, // note_off after 480 ticks
        0x00, 0x90, 0x45, 0x64, // note_on A4
        0x87, 0x40, 0x90, 0x45, 0x00, // note_on velocity 0 after 960 ticks
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let mut data = Vec::new();
    data.extend_from_slice(b"MThd");
    data.extend_from_slice(&6u32.to_be_bytes());
    data.extend_from_slice(&[0x00, 0x01, 0x00, 0x02, 0x01, 0xE0]);
    for track in [conductor, melody] {
        data.extend_from_slice(b"MTrk");
        data.extend_from_slice(&(track.len() as u32).to_be_bytes());
        data.extend_from_slice(track);
    }
    data
}

fn convert(file_data: &[u8]) -> Result<Vec<ToneSegment>, Midi2DatError> {
    let midi_file = SmfParser.parse(file_data)?;
    let sequencer = ToneSequencer::for_file(&midi_file, DEFAULT_TEMPO)?;
    Ok(sequencer.sequence_file(&midi_file))
}

/// Test that all major types are accessible from the library.
#[test]
fn test_types_accessible() {
    // This test verifies that the public API types compile and are usable.
    // If any re-export is missing, this test will fail to compile.

    fn _assert_types() {
        let _: fn(&[u8]) -> Result<MidiFile, Midi2DatError> = parse_midi_data;
        let _: fn(i32) -> u32 = note_to_frequency;
        let _: u32 = DEFAULT_TEMPO;
    }
}

#[test]
fn test_convert_sample() {
    let segments = convert(&sample_smf()).expect("Failed to convert sample");
    assert_eq!(
        segments,
        vec![
            ToneSegment::silence(250),
            ToneSegment::new(523, 500),
            ToneSegment::silence(0),
            ToneSegment::new(440, 1000),
        ]
    );
    assert_eq!(total_duration_ms(&segments), 1750);
    assert_eq!(
        format_segments(&segments),
        "[0, 250],\n[523, 500],\n[0, 0],\n[440, 1000]"
    );
}

#[test]
fn test_output_file_is_idempotent() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let midi_path = dir.path().join("sample.mid");
    std::fs::write(&midi_path, sample_smf()).expect("Failed to write sample");

    let first = dir.path().join("first.dat");
    let second = dir.path().join("second.dat");
    for output in [&first, &second] {
        let file_data = std::fs::read(&midi_path).expect("Failed to read sample");
        let segments = convert(&file_data).expect("Failed to convert sample");
        write_segments(output, &segments).expect("Failed to write output");
    }

    let first = std::fs::read(first).unwrap();
    let second = std::fs::read(second).unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, second);
    assert_eq!(
        String::from_utf8(first).unwrap(),
        "[0, 250],\n[523, 500],\n[0, 0],\n[440, 1000]"
    );
}

#[test]
fn test_tempo_parameter() {
    let midi_file = SmfParser.parse(&sample_smf()).unwrap();
    // twice as slow
    let sequencer = ToneSequencer::for_file(&midi_file, 2 * DEFAULT_TEMPO).unwrap();
    let segments = sequencer.sequence_file(&midi_file);
    assert_eq!(total_duration_ms(&segments), 3500);
}

#[test]
fn test_play_with_custom_emitter() {
    struct Collect(Vec<ToneSegment>);

    impl ToneEmitter for Collect {
        fn emit(&mut self, frequency_hz: u32, duration_ms: u64) -> Result<(), Midi2DatError> {
            self.0.push(ToneSegment::new(frequency_hz, duration_ms));
            Ok(())
        }

        fn rest(&mut self, duration_ms: u64) {
            self.0.push(ToneSegment::silence(duration_ms));
        }
    }

    let segments = convert(&sample_smf()).unwrap();
    let mut emitter = Collect(Vec::new());
    play(&segments, &mut emitter).unwrap();
    assert_eq!(emitter.0, segments);
}

/// Test error handling for invalid data.
#[test]
fn test_parse_error() {
    let invalid_data = vec![0u8; 10]; // Not a valid MIDI file
    let result = parse_midi_data(&invalid_data);

    assert!(result.is_err(), "Should return error for invalid data");
    let err = result.unwrap_err();
    assert!(
        matches!(err, Midi2DatError::ParsingError(_)),
        "Should be a ParsingError"
    );
}
