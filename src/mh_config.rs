// Configuration management
// User preferences persisted as TOML; game progress is never written

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::mh_campaign::{DEFAULT_MINES, MINE_RANGE};
use crate::mh_error::{MhError, Result};
use crate::mh_level::LevelSettings;
use crate::mh_timer::TIME_LIMIT;

/// User preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_mines: usize,      // Initial value of the mine selector (1-9)
    pub language: String,          // Language code ("en" or "zh")
    pub ascii_icons: bool,         // Use ASCII fallback glyphs
    pub pause_freezes_timer: bool, // Exclude paused time from the level countdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,         // Fixed RNG seed for reproducible grids
}

impl Default for Config {
    fn default() -> Self {
        // Auto-detect system language on first run
        let system_lang = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
        let lang = if system_lang.to_lowercase().starts_with("zh") {
            "zh".to_string()
        } else {
            "en".to_string()
        };

        Config {
            default_mines: DEFAULT_MINES,
            language: lang,
            ascii_icons: false,
            pause_freezes_timer: true,
            seed: None,
        }
    }
}

impl Config {
    /// Parse a config file body, clamping out-of-range values
    pub fn from_toml_str(s: &str) -> Result<Config> {
        let mut cfg: Config = toml::from_str(s)?;
        let clamped = cfg.default_mines.clamp(*MINE_RANGE.start(), *MINE_RANGE.end());
        if clamped != cfg.default_mines {
            warn!(requested = cfg.default_mines, clamped, "default_mines out of range");
            cfg.default_mines = clamped;
        }
        Ok(cfg)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn level_settings(&self) -> LevelSettings {
        LevelSettings {
            time_limit: TIME_LIMIT,
            pause_freezes_timer: self.pause_freezes_timer,
        }
    }
}

/// Platform config directory (e.g. ~/.config/minehunt on Linux)
/// Falls back to the current directory if ProjectDirs is unavailable
pub fn config_dir() -> Option<PathBuf> {
    match ProjectDirs::from("com", "xhbl", "minehunt") {
        Some(proj) => Some(proj.config_dir().to_path_buf()),
        None => env::current_dir().ok(),
    }
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("minehunt.toml"))
}

pub fn load_config(path: &Path) -> Result<Config> {
    let s = fs::read_to_string(path)?;
    Config::from_toml_str(&s)
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = cfg.to_toml_string()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, s)?;
    Ok(())
}

/// Load configuration from disk, or create the default file if none exists
/// Any failure falls back to defaults so the game still starts
pub fn load_or_create_config() -> Config {
    let Some(path) = config_path() else {
        warn!("{}", MhError::NoConfigDir);
        return Config::default();
    };
    if path.exists() {
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), "{e}; using defaults");
                return Config::default();
            }
        }
    }
    let cfg = Config::default();
    if let Err(e) = save_config(&path, &cfg) {
        warn!(path = %path.display(), "could not write default config: {e}");
    }
    cfg
}
