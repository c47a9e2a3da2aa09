// File-backed tracing setup
// The terminal belongs to the UI, so log output only ever goes to a file

use chrono::Local;
use std::env;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

use crate::mh_config::config_dir;
use crate::mh_error::{MhError, Result};

/// Environment variable holding the log level (e.g. "debug"); logging is off when unset
pub const LOG_ENV: &str = "MINEHUNT_LOG";

/// Local wall-clock timestamps for log lines
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Parse a level name such as "info" or "TRACE"
pub fn parse_level(s: &str) -> Result<Level> {
    Level::from_str(s.trim()).map_err(|_| MhError::LogLevel(s.to_string()))
}

pub fn log_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("minehunt.log"))
}

/// Install the subscriber if MINEHUNT_LOG is set
/// Returns the log file path when logging was enabled
pub fn init_from_env() -> Result<Option<PathBuf>> {
    let Ok(value) = env::var(LOG_ENV) else {
        return Ok(None);
    };
    let level = parse_level(&value)?;
    let path = log_path().ok_or(MhError::NoConfigDir)?;
    init_file_logging(&path, level)?;
    Ok(Some(path))
}

pub fn init_file_logging(path: &Path, level: Level) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_timer(LocalTime)
        .try_init()
        .map_err(|e| MhError::Logging(e.to_string()))
}
