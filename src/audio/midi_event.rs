use std::fmt;

/// A single event of a MIDI track.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MidiEvent {
    /// Ticks elapsed since the previous event of the same track.
    pub delta: u32,
    /// The type of the event.
    pub event: MidiEventType,
}

impl MidiEvent {
    pub const fn new(delta: u32, event: MidiEventType) -> Self {
        Self { delta, event }
    }

    pub const fn new_note_on(delta: u32, channel: u8, key: u8, velocity: u8) -> Self {
        Self::new(delta, MidiEventType::NoteOn(channel, key, velocity))
    }

    pub const fn new_note_off(delta: u32, channel: u8, key: u8, velocity: u8) -> Self {
        Self::new(delta, MidiEventType::NoteOff(channel, key, velocity))
    }

    pub const fn new_midi_message(
        delta: u32,
        channel: u8,
        command: u8,
        data1: u8,
        data2: u8,
    ) -> Self {
        Self::new(
            delta,
            MidiEventType::MidiMessage(channel, command, data1, data2),
        )
    }

    pub const fn new_meta(delta: u32, meta: MetaEvent) -> Self {
        Self::new(delta, MidiEventType::Meta(meta))
    }

    /// A note-on with a positive velocity.
    pub const fn is_note_start(&self) -> bool {
        matches!(self.event, MidiEventType::NoteOn(_, _, velocity) if velocity > 0)
    }

    /// A note-off, or a note-on with zero velocity.
    pub const fn is_note_end(&self) -> bool {
        matches!(
            self.event,
            MidiEventType::NoteOff(_, _, _) | MidiEventType::NoteOn(_, _, 0)
        )
    }

    pub const fn is_note_event(&self) -> bool {
        matches!(
            self.event,
            MidiEventType::NoteOn(_, _, _) | MidiEventType::NoteOff(_, _, _)
        )
    }

    pub const fn key(&self) -> Option<u8> {
        match self.event {
            MidiEventType::NoteOn(_, key, _) | MidiEventType::NoteOff(_, key, _) => Some(key),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum MidiEventType {
    NoteOn(u8, u8, u8),          // channel, note, velocity
    NoteOff(u8, u8, u8),         // channel, note, velocity
    MidiMessage(u8, u8, u8, u8), // channel, command, data1, data2
    SysEx(Vec<u8>),              // payload without the length prefix
    Meta(MetaEvent),
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum MetaEvent {
    TrackName(String),
    Tempo(u32), // microseconds per beat
    EndOfTrack,
    Other(u8, Vec<u8>), // meta type, raw data
}

impl fmt::Display for MidiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = self.delta;
        match &self.event {
            MidiEventType::NoteOn(channel, note, velocity) => write!(
                f,
                "note_on channel={channel} note={note} velocity={velocity} time={time}"
            ),
            MidiEventType::NoteOff(channel, note, velocity) => write!(
                f,
                "note_off channel={channel} note={note} velocity={velocity} time={time}"
            ),
            MidiEventType::MidiMessage(channel, command, data1, data2) => match *command {
                0xA0 => write!(
                    f,
                    "polytouch channel={channel} note={data1} value={data2} time={time}"
                ),
                0xB0 => write!(
                    f,
                    "control_change channel={channel} control={data1} value={data2} time={time}"
                ),
                0xC0 => write!(
                    f,
                    "program_change channel={channel} program={data1} time={time}"
                ),
                0xD0 => write!(f, "aftertouch channel={channel} value={data1} time={time}"),
                0xE0 => {
                    // 14 bit value centered on 0
                    let pitch = ((i32::from(*data2) << 7) | i32::from(*data1)) - 8192;
                    write!(f, "pitchwheel channel={channel} pitch={pitch} time={time}")
                }
                _ => write!(
                    f,
                    "midi_message channel={channel} command=0x{command:02X} data1={data1} data2={data2} time={time}"
                ),
            },
            MidiEventType::SysEx(data) => {
                write!(f, "sysex length={} time={time}", data.len())
            }
            MidiEventType::Meta(MetaEvent::TrackName(name)) => {
                write!(f, "MetaMessage('track_name', name='{name}', time={time})")
            }
            MidiEventType::Meta(MetaEvent::Tempo(tempo)) => {
                write!(f, "MetaMessage('set_tempo', tempo={tempo}, time={time})")
            }
            MidiEventType::Meta(MetaEvent::EndOfTrack) => {
                write!(f, "MetaMessage('end_of_track', time={time})")
            }
            MidiEventType::Meta(MetaEvent::Other(kind, data)) => write!(
                f,
                "MetaMessage(type=0x{kind:02X}, length={}, time={time})",
                data.len()
            ),
        }
    }
}
