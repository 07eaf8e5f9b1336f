use crate::audio::midi_event::MidiEvent;
use crate::audio::tone::ToneSegment;
use crate::parser::midi_parser::{MidiFile, MidiTrack};
use crate::Midi2DatError;

/// Default tempo in microseconds per beat (120 BPM)
pub const DEFAULT_TEMPO: u32 = 500_000;

const A4_KEY: i32 = 69;
const A4_FREQUENCY: f64 = 440.0;
const SEMITONES_PER_OCTAVE: f64 = 12.0;

/// Equal temperament frequency of a MIDI note, rounded half to even.
///
/// Any integer is accepted, only 0..=127 are meaningful MIDI notes.
pub fn note_to_frequency(note: i32) -> u32 {
    let exponent = f64::from(note - A4_KEY) / SEMITONES_PER_OCTAVE;
    let frequency = A4_FREQUENCY * 2_f64.powf(exponent);
    // saturating float to int cast
    frequency.round_ties_even() as u32
}

/// Per track state, discarded once the track is exhausted.
#[derive(Debug)]
struct TrackState {
    current_frequency: u32, // last started tone, 0 if none
    elapsed_ticks: u64,     // ticks consumed by note events
    pending_ticks: u64,     // ticks of skipped events not yet accounted
    is_track_start: bool,   // true until the first note start
}

impl TrackState {
    const fn new() -> Self {
        Self {
            current_frequency: 0,
            elapsed_ticks: 0,
            pending_ticks: 0,
            is_track_start: true,
        }
    }

    /// Delta of a note event including the ticks of the events skipped before it.
    fn take_delta(&mut self, event: &MidiEvent) -> u64 {
        let delta = self.pending_ticks + u64::from(event.delta);
        self.pending_ticks = 0;
        delta
    }
}

/// Converts the note events of MIDI tracks into tone segments.
///
/// Tracks are treated as monophonic: a note start while another tone is
/// active does not close the previous tone, it only inserts a rest sized to
/// the new note's delta. Existing `.dat` files depend on that layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneSequencer {
    ticks_per_beat: u16,
    tempo: u32, // microseconds per beat
}

impl ToneSequencer {
    pub fn new(ticks_per_beat: u16, tempo: u32) -> Result<Self, Midi2DatError> {
        if ticks_per_beat == 0 {
            return Err(Midi2DatError::ConversionError(
                "ticks per beat must be greater than zero".to_string(),
            ));
        }
        if tempo == 0 {
            return Err(Midi2DatError::ConversionError(
                "tempo must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            ticks_per_beat,
            tempo,
        })
    }

    /// Sequencer using the resolution found in the file header.
    pub fn for_file(midi_file: &MidiFile, tempo: u32) -> Result<Self, Midi2DatError> {
        Self::new(midi_file.ticks_per_beat, tempo)
    }

    pub const fn ticks_per_beat(&self) -> u16 {
        self.ticks_per_beat
    }

    pub const fn tempo(&self) -> u32 {
        self.tempo
    }

    /// `ticks * tempo / ticks_per_beat / 1000`, rounded half to even.
    pub fn ticks_to_millis(&self, ticks: u64) -> u64 {
        let micros = ticks as f64 * f64::from(self.tempo);
        let millis = micros / f64::from(self.ticks_per_beat) / 1000.0;
        millis.round_ties_even() as u64
    }

    /// Segments of all tracks, appended in track order.
    pub fn sequence_file(&self, midi_file: &MidiFile) -> Vec<ToneSegment> {
        let mut segments = Vec::new();
        for (track_id, track) in midi_file.tracks.iter().enumerate() {
            let track_segments = self.sequence_track(track);
            log::debug!(
                "track {track_id} produced {} segments",
                track_segments.len()
            );
            segments.extend(track_segments);
        }
        segments
    }

    pub fn sequence_track(&self, track: &MidiTrack) -> Vec<ToneSegment> {
        let mut state = TrackState::new();
        let mut segments = Vec::new();
        for event in &track.events {
            if event.is_note_start() {
                let delta = state.take_delta(event);
                if state.is_track_start {
                    state.is_track_start = false;
                    if delta > 0 {
                        // gap between the track start and the first note
                        segments.push(ToneSegment::silence(self.ticks_to_millis(delta)));
                    }
                }
                if state.current_frequency != 0 {
                    segments.push(ToneSegment::silence(self.ticks_to_millis(delta)));
                }
                let key = event.key().map_or(0, i32::from);
                state.current_frequency = note_to_frequency(key);
                state.elapsed_ticks += delta;
            } else if event.is_note_end() {
                let delta = state.take_delta(event);
                segments.push(ToneSegment::new(
                    state.current_frequency,
                    self.ticks_to_millis(delta),
                ));
                state.elapsed_ticks += delta;
            } else {
                state.pending_ticks += u64::from(event.delta);
            }
        }
        log::debug!(
            "sequenced {} note ticks into {} segments",
            state.elapsed_ticks,
            segments.len()
        );
        segments
    }
}
