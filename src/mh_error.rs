// Error type for the fallible edges of the game: terminal I/O, config files and logging
// Game rules themselves never fail; bad input is clamped or ignored

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MhError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("Could not serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
    #[error("No config directory available")]
    NoConfigDir,
    #[error("Unknown log level {0:?}")]
    LogLevel(String),
    #[error("Could not install log subscriber: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, MhError>;
