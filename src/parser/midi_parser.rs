use crate::audio::midi_event::{MetaEvent, MidiEvent, MidiEventType};
use crate::parser::primitive_parser::{
    make_string, parse_u16, parse_u32, parse_u8, parse_vlq, parse_vlq_sized_bytes,
};
use crate::Midi2DatError;
use nom::bytes::complete::take;
use nom::error::{Error, ErrorKind};
use nom::{IResult, Parser};

// SMF reference at <https://midi.org/standard-midi-files-specification>

const HEADER_TAG: &[u8; 4] = b"MThd";
const TRACK_TAG: &[u8; 4] = b"MTrk";
const HEADER_MIN_LENGTH: u32 = 6;

const META_STATUS: u8 = 0xFF;
const SYSEX_STATUS: u8 = 0xF0;
const SYSEX_ESCAPE_STATUS: u8 = 0xF7;

const META_TRACK_NAME: u8 = 0x03;
const META_END_OF_TRACK: u8 = 0x2F;
const META_TEMPO: u8 = 0x51;

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const PROGRAM_CHANGE: u8 = 0xC0;
const CHANNEL_PRESSURE: u8 = 0xD0;

/// A parsed Standard MIDI File.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MidiFile {
    /// 0 single track, 1 simultaneous tracks, 2 independent tracks
    pub format: u16,
    /// Resolution of delta times, in ticks per quarter note
    pub ticks_per_beat: u16,
    pub tracks: Vec<MidiTrack>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MidiTrack {
    pub events: Vec<MidiEvent>,
}

impl MidiTrack {
    /// First track name meta event, if any.
    pub fn name(&self) -> Option<&str> {
        self.events.iter().find_map(|event| match &event.event {
            MidiEventType::Meta(MetaEvent::TrackName(name)) => Some(name.as_str()),
            _ => None,
        })
    }
}

/// Decodes raw MIDI file bytes into tracks of events.
pub trait MidiFileParser {
    fn parse(&self, file_data: &[u8]) -> Result<MidiFile, Midi2DatError>;
}

/// Standard MIDI File parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmfParser;

impl MidiFileParser for SmfParser {
    fn parse(&self, file_data: &[u8]) -> Result<MidiFile, Midi2DatError> {
        parse_midi_data(file_data)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    format: u16,
    track_count: u16,
    division: u16,
}

pub fn parse_midi_data(file_data: &[u8]) -> Result<MidiFile, Midi2DatError> {
    let (rest, header) = parse_header(file_data).map_err(|err| {
        log::debug!("Failed to parse MIDI header: {err:?}");
        Midi2DatError::ParsingError("Failed to parse MIDI header".to_string())
    })?;

    if header.division & 0x8000 != 0 {
        return Err(Midi2DatError::ParsingError(
            "SMPTE time division is not supported".to_string(),
        ));
    }

    let (_rest, tracks) = parse_tracks(header.track_count)(rest).map_err(|err| {
        log::debug!("Failed to parse MIDI tracks: {err:?}");
        Midi2DatError::ParsingError("Failed to parse MIDI tracks".to_string())
    })?;

    Ok(MidiFile {
        format: header.format,
        ticks_per_beat: header.division,
        tracks,
    })
}

/// Parse chunk tag and length.
fn parse_chunk_header(i: &[u8]) -> IResult<&[u8], (&[u8], u32)> {
    (take(4usize), parse_u32).parse(i)
}

fn parse_header(i: &[u8]) -> IResult<&[u8], Header> {
    let (i, (tag, length)) = parse_chunk_header(i)?;
    if tag != HEADER_TAG || length < HEADER_MIN_LENGTH {
        return Err(nom::Err::Error(Error::new(i, ErrorKind::Tag)));
    }
    let (i, body) = take(length as usize).parse(i)?;
    let (_extra, (format, track_count, division)) =
        (parse_u16, parse_u16, parse_u16).parse(body)?;
    log::debug!(
        "MIDI header -> format:{format} track_count:{track_count} division:{division}"
    );
    Ok((
        i,
        Header {
            format,
            track_count,
            division,
        },
    ))
}

/// Parse `track_count` track chunks, skipping chunks of unknown type.
fn parse_tracks(track_count: u16) -> impl FnMut(&[u8]) -> IResult<&[u8], Vec<MidiTrack>> {
    move |i| {
        let mut i = i;
        let mut tracks = Vec::with_capacity(usize::from(track_count));
        while tracks.len() < usize::from(track_count) {
            let (inner, (tag, length)) = parse_chunk_header(i)?;
            let (inner, body) = take(length as usize).parse(inner)?;
            i = inner;
            if tag != TRACK_TAG {
                log::debug!("Skipping unknown chunk {tag:02X?} of {length} bytes");
                continue;
            }
            log::debug!("Parsing track {} of {length} bytes", tracks.len());
            let (_rest, events) = parse_track_events(body)?;
            tracks.push(MidiTrack { events });
        }
        Ok((i, tracks))
    }
}

/// Parse all events of a track chunk body.
pub fn parse_track_events(i: &[u8]) -> IResult<&[u8], Vec<MidiEvent>> {
    let mut i = i;
    let mut events = Vec::new();
    let mut running_status: Option<u8> = None;
    while !i.is_empty() {
        let (inner, delta) = parse_vlq(i)?;
        let (inner, event) = parse_event(&mut running_status)(inner)?;
        i = inner;
        events.push(MidiEvent::new(delta, event));
    }
    Ok((i, events))
}

fn parse_event(
    running_status: &mut Option<u8>,
) -> impl FnMut(&[u8]) -> IResult<&[u8], MidiEventType> + '_ {
    move |i| {
        let (after_status, first) = parse_u8(i)?;
        match first {
            META_STATUS => parse_meta_event(after_status),
            SYSEX_STATUS | SYSEX_ESCAPE_STATUS => {
                *running_status = None;
                let (i, data) = parse_vlq_sized_bytes(after_status)?;
                Ok((i, MidiEventType::SysEx(data.to_vec())))
            }
            status @ 0x80..=0xEF => {
                *running_status = Some(status);
                parse_channel_message(status)(after_status)
            }
            0x00..=0x7F => match *running_status {
                // data byte, reuse previous status
                Some(status) => parse_channel_message(status)(i),
                None => {
                    log::debug!("Running status without previous status");
                    Err(nom::Err::Error(Error::new(i, ErrorKind::Verify)))
                }
            },
            other => {
                log::debug!("Unexpected status byte 0x{other:02X} in track");
                Err(nom::Err::Error(Error::new(i, ErrorKind::Char)))
            }
        }
    }
}

fn parse_channel_message(status: u8) -> impl FnMut(&[u8]) -> IResult<&[u8], MidiEventType> {
    move |i| {
        let command = status & 0xF0;
        let channel = status & 0x0F;
        let (i, data1) = parse_u8(i)?;
        let (i, data2) = match command {
            PROGRAM_CHANGE | CHANNEL_PRESSURE => (i, 0),
            _ => parse_u8(i)?,
        };
        let event = match command {
            NOTE_OFF => MidiEventType::NoteOff(channel, data1, data2),
            NOTE_ON => MidiEventType::NoteOn(channel, data1, data2),
            _ => MidiEventType::MidiMessage(channel, command, data1, data2),
        };
        Ok((i, event))
    }
}

fn parse_meta_event(i: &[u8]) -> IResult<&[u8], MidiEventType> {
    let (i, kind) = parse_u8(i)?;
    let (i, data) = parse_vlq_sized_bytes(i)?;
    let meta = match kind {
        META_TRACK_NAME => MetaEvent::TrackName(make_string(data)),
        META_END_OF_TRACK => MetaEvent::EndOfTrack,
        META_TEMPO if data.len() == 3 => {
            let tempo = data
                .iter()
                .fold(0u32, |acc, byte| (acc << 8) | u32::from(*byte));
            MetaEvent::Tempo(tempo)
        }
        _ => MetaEvent::Other(kind, data.to_vec()),
    };
    Ok((i, MidiEventType::Meta(meta)))
}
