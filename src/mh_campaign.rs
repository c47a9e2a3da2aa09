// Campaign progression and pre-game mine selection
// Levels grow by one row and column each; any loss ends the campaign

use rand::Rng;
use std::ops::RangeInclusive;
use tracing::info;

use crate::mh_grid::Grid;
use crate::mh_level::{
    Action, BoardGeometry, Level, LevelEnd, LevelReport, LevelSettings, LossReason,
};

/// Number of levels in a campaign
pub const MAX_LEVELS: u32 = 7;

/// Grid side length before the level number is added
pub const BASE_SIZE: usize = 5;

/// Mine counts offered by the selector
pub const MINE_RANGE: RangeInclusive<usize> = 1..=9;

/// Default selector value
pub const DEFAULT_MINES: usize = 5;

/// Side length of the grid for a level (level 1 -> 6x6)
pub fn level_size(level: u32) -> usize {
    BASE_SIZE + level as usize
}

/// Pre-game mine count chooser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MineSelector {
    num_mines: usize,
}

impl MineSelector {
    pub fn new(initial: usize) -> Self {
        MineSelector {
            num_mines: initial.clamp(*MINE_RANGE.start(), *MINE_RANGE.end()),
        }
    }

    pub fn num_mines(&self) -> usize {
        self.num_mines
    }

    /// Apply an action; returns true once the selection is confirmed
    pub fn handle(&mut self, action: Action) -> bool {
        match action {
            Action::Up if self.num_mines < *MINE_RANGE.end() => self.num_mines += 1,
            Action::Down if self.num_mines > *MINE_RANGE.start() => self.num_mines -= 1,
            Action::Confirm => return true,
            _ => {}
        }
        false
    }
}

impl Default for MineSelector {
    fn default() -> Self {
        MineSelector::new(DEFAULT_MINES)
    }
}

/// Progress carried across the levels of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignState {
    pub coins: u64,
    pub current_level: u32,
    pub max_levels: u32,
}

impl Default for CampaignState {
    fn default() -> Self {
        CampaignState {
            coins: 0,
            current_level: 1,
            max_levels: MAX_LEVELS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignOutcome {
    Victory { coins: u64 },
    Defeat { level: u32, reason: LossReason, coins: u64 },
    Quit { coins: u64 },
}

impl CampaignOutcome {
    pub const fn coins(self) -> u64 {
        match self {
            Self::Victory { coins } | Self::Defeat { coins, .. } | Self::Quit { coins } => coins,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    state: CampaignState,
    num_mines: usize, // Chosen once per session, clamped per level
    settings: LevelSettings,
}

impl Campaign {
    pub fn new(num_mines: usize, settings: LevelSettings) -> Self {
        Campaign {
            state: CampaignState::default(),
            num_mines,
            settings,
        }
    }

    pub fn state(&self) -> CampaignState {
        self.state
    }

    pub fn num_mines(&self) -> usize {
        self.num_mines
    }

    /// Build the grid and controller for the current level
    pub fn start_level<R: Rng + ?Sized>(&self, rng: &mut R, geometry: BoardGeometry) -> Level {
        let level = self.state.current_level;
        let size = level_size(level);
        // the generator re-clamps the session mine count against this grid
        let grid = Grid::generate(size, self.num_mines, rng);
        Level::new(level, grid, self.state.coins, self.settings, geometry)
    }

    /// Record a finished level; Some once the campaign is over
    pub fn finish_level(&mut self, report: LevelReport) -> Option<CampaignOutcome> {
        self.state.coins = report.coins;
        if let LevelEnd::Lost(reason) = report.end {
            info!(level = report.level, ?reason, coins = self.state.coins, "campaign lost");
            return Some(CampaignOutcome::Defeat {
                level: report.level,
                reason,
                coins: self.state.coins,
            });
        }
        if self.state.current_level >= self.state.max_levels {
            info!(coins = self.state.coins, "campaign won");
            return Some(CampaignOutcome::Victory {
                coins: self.state.coins,
            });
        }
        self.state.current_level += 1;
        None
    }
}
