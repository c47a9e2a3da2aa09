// Mine Hunter core library
// Grid generation, reveal resolution, level timer, level/campaign state machines and the
// frontend-agnostic session loop. The terminal frontend lives in the binary.

pub mod mh_campaign; // Campaign progression and pre-game mine selection
pub mod mh_config;   // Configuration loading and persistence
pub mod mh_error;    // Error type for I/O, config and logging failures
pub mod mh_grid;     // Minefield generation and reveal resolution
pub mod mh_lang;     // Multi-language string resources
pub mod mh_level;    // Per-level state machine and input mapping
pub mod mh_log;      // File-backed tracing setup
pub mod mh_session;  // Frontend trait and the cooperative control loops
pub mod mh_timer;    // Level countdown timer

pub use mh_campaign::{Campaign, CampaignOutcome, CampaignState, MineSelector, level_size};
pub use mh_config::Config;
pub use mh_error::MhError;
pub use mh_grid::{Cell, Grid, Pos, RevealOutcome, Revealed, reveal};
pub use mh_level::{
    Action, BoardGeometry, CellView, Control, InputEvent, Level, LevelEnd, LevelReport,
    LevelSettings, LevelState, LossReason,
};
pub use mh_session::{Banner, Frontend, Replay, Screen, run_session};
pub use mh_timer::{LevelTimer, TIME_LIMIT};
