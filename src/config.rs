use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use home::home_dir;
use midi2dat::{Midi2DatError, DEFAULT_BEEP_PROGRAM, DEFAULT_TEMPO};
use serde::Deserialize;

/// Local defaults, overridden by command line flags.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Tempo in microseconds per beat
    tempo: Option<u32>,
    /// External tone utility used for playback
    beep_program: Option<String>,
}

impl Config {
    // folder placed in $HOME directory
    const FOLDER: &'static str = ".midi2dat";

    pub fn tempo(&self) -> u32 {
        self.tempo.unwrap_or(DEFAULT_TEMPO)
    }

    pub fn beep_program(&self) -> &str {
        self.beep_program.as_deref().unwrap_or(DEFAULT_BEEP_PROGRAM)
    }

    fn get_base_path() -> Result<PathBuf, Midi2DatError> {
        let home = home_dir().ok_or_else(|| {
            Midi2DatError::ConfigError("Could not find home directory".to_string())
        })?;
        let path = home.join(Self::FOLDER);
        Ok(path)
    }

    fn get_path() -> Result<PathBuf, Midi2DatError> {
        let base = Self::get_base_path()?;
        Ok(base.join("config.json"))
    }

    /// Defaults if no local config exists
    pub fn read_config() -> Result<Self, Midi2DatError> {
        let config_path = Self::get_path()?;
        Self::read_config_from(&config_path)
    }

    pub fn read_config_from(config_path: &Path) -> Result<Self, Midi2DatError> {
        if !config_path.exists() {
            log::debug!("No local configuration at {config_path:?}");
            return Ok(Self::default());
        }
        let file = File::open(config_path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_json::from_reader(reader).map_err(|err| {
            Midi2DatError::ConfigError(format!("Could not read local configuration {err:}"))
        })?;
        log::debug!("Loaded local configuration {config:?}");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::read_config_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tempo(), DEFAULT_TEMPO);
        assert_eq!(config.beep_program(), "beep");
    }

    #[test]
    fn test_read_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(br#"{ "tempo": 400000, "beep_program": "/usr/bin/beep" }"#)
            .unwrap();
        let config = Config::read_config_from(&path).unwrap();
        assert_eq!(config.tempo(), 400_000);
        assert_eq!(config.beep_program(), "/usr/bin/beep");
    }

    #[test]
    fn test_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "tempo": 250000 }"#).unwrap();
        let config = Config::read_config_from(&path).unwrap();
        assert_eq!(config.tempo(), 250_000);
        assert_eq!(config.beep_program(), DEFAULT_BEEP_PROGRAM);
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ tempo = 3 }").unwrap();
        let result = Config::read_config_from(&path);
        assert!(matches!(result, Err(Midi2DatError::ConfigError(_))));
    }
}
