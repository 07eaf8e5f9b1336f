use crate::AppError::ConfigError;
use clap::Parser;
use config::Config;
use midi2dat::{
    play, write_segments, BeepEmitter, Midi2DatError as LibError, MidiFileParser, SmfParser,
    SpeakerEmitter, ToneSequencer,
};
use std::io;
use std::path::{Path, PathBuf};

mod config;

fn main() {
    let result = main_result();
    std::process::exit(match result {
        Ok(()) => 0,
        Err(err) => {
            // use Display instead of Debug for user friendly error messages
            log::error!("{err}");
            1
        }
    });
}

pub fn main_result() -> Result<(), AppError> {
    // setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("midi2dat=info"))
        .init();

    // args
    let args = CliArgs::parse();

    // read local config
    let local_config = Config::read_config()?;

    // go!
    run(&args, &local_config)
}

/// Convert the input file, write the output and optionally play it.
fn run(args: &CliArgs, local_config: &Config) -> Result<(), AppError> {
    let midi_file_path = PathBuf::from(&args.midi_file);

    // missing input is reported without aborting the process
    if !midi_file_path.is_file() {
        log::error!("{} does not exist.", midi_file_path.display());
        return Ok(());
    }

    let output_path = args
        .output
        .as_ref()
        .map_or_else(|| default_output_path(&midi_file_path), PathBuf::from);
    let tempo = args.tempo.unwrap_or_else(|| local_config.tempo());

    if args.verbose {
        println!(
            "Converting {} to {}",
            midi_file_path.display(),
            output_path.display()
        );
    }

    let file_data = std::fs::read(&midi_file_path)?;
    let midi_file = SmfParser.parse(&file_data)?;
    let sequencer = ToneSequencer::for_file(&midi_file, tempo)?;
    log::debug!(
        "Sequencing {} tracks at {} ticks per beat and tempo {}",
        midi_file.tracks.len(),
        sequencer.ticks_per_beat(),
        sequencer.tempo()
    );

    if args.verbose {
        for (track_id, track) in midi_file.tracks.iter().enumerate() {
            println!("Track {track_id}: {}", track.name().unwrap_or_default());
            for event in &track.events {
                println!("{event}");
            }
        }
    }
    let segments = sequencer.sequence_file(&midi_file);

    write_segments(&output_path, &segments)?;
    log::info!(
        "Wrote {} tone segments to {}",
        segments.len(),
        output_path.display()
    );

    if args.play {
        if args.speaker {
            let mut emitter = SpeakerEmitter::new()?;
            play(&segments, &mut emitter)?;
        } else {
            let mut emitter = BeepEmitter::new(local_config.beep_program());
            play(&segments, &mut emitter)?;
        }
    }
    Ok(())
}

/// `<input-stem>.dat` in the working directory.
fn default_output_path(midi_file_path: &Path) -> PathBuf {
    let stem = midi_file_path.file_stem().unwrap_or_default();
    let mut file_name = stem.to_os_string();
    file_name.push(".dat");
    PathBuf::from(file_name)
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Convert MIDI files to frequency and duration data for a PWM library.",
    long_about = None
)]
pub struct CliArgs {
    /// MIDI file to convert.
    midi_file: String,
    /// Output file name, defaults to the MIDI file name with a `.dat` extension.
    #[arg(short, long)]
    output: Option<String>,
    /// Print tracks and events while converting.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
    /// Play the output once written.
    #[arg(short, long, default_value_t = false)]
    play: bool,
    /// Tempo in microseconds per beat, overrides the local configuration.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    tempo: Option<u32>,
    /// Play through the default audio device instead of the beep utility.
    #[arg(long, default_value_t = false, requires = "play")]
    speaker: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("parsing error: {0}")]
    ParsingError(String),
    #[error("audio error: {0}")]
    AudioError(String),
    #[error("other error: {0}")]
    OtherError(String),
}

impl From<LibError> for AppError {
    fn from(error: LibError) -> Self {
        match error {
            LibError::ParsingError(s) => Self::ParsingError(s),
            LibError::ConfigError(s) | LibError::ConversionError(s) => ConfigError(s),
            LibError::AudioError(s) => Self::AudioError(s),
            LibError::IoError(s) => Self::OtherError(s),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::OtherError(error.to_string())
    }
}
