// Per-level state machine
// Owns the grid, revealed set and timer for one level and turns input events into reveals

use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::mh_grid::{Grid, Pos, RevealOutcome, Revealed, reveal};
use crate::mh_timer::{LevelTimer, TIME_LIMIT};

/// Logical key actions, independent of the physical key map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Reveal,  // Reveal the cell under the cursor
    Confirm, // Start from the selector, or reveal while playing
    Pause,
    Resume,
    Quit,    // Only honored from the pause and replay screens
    Menu,    // Back to the mine selector after a campaign
}

/// Input delivered by the frontend, in arrival order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,                     // Global quit (window close / Ctrl+C)
    Key(Action),
    Click { x: u16, y: u16 }, // Screen coordinates
}

/// Whether the session keeps running after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossReason {
    Mine,
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelState {
    Playing,
    Paused,
    Won,
    Lost(LossReason),
}

impl LevelState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost(_))
    }
}

/// What the rendering side should draw for a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Hidden,
    Empty,
    Mine,
}

/// How a level ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEnd {
    Won,
    Lost(LossReason),
}

/// Final result of a level, handed back to the campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelReport {
    pub level: u32,
    pub coins: u64,
    pub end: LevelEnd,
}

impl LevelReport {
    pub fn is_won(&self) -> bool {
        self.end == LevelEnd::Won
    }
}

/// Timer behavior shared by every level of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSettings {
    pub time_limit: Duration,
    pub pause_freezes_timer: bool,
}

impl Default for LevelSettings {
    fn default() -> Self {
        LevelSettings {
            time_limit: TIME_LIMIT,
            pause_freezes_timer: true,
        }
    }
}

/// Screen layout used to map pointer positions to cells
/// Each cell occupies a leading gap followed by its box, below a header band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    pub left: u16,   // Offset of the first column
    pub header: u16, // Height of the band above the board; clicks there are ignored
    pub box_w: u16,
    pub box_h: u16,
    pub gap_x: u16,
    pub gap_y: u16,
}

impl BoardGeometry {
    /// Character cells: " X " boxes separated by one column, one row each
    pub const TERMINAL: BoardGeometry = BoardGeometry {
        left: 1,
        header: 4,
        box_w: 3,
        box_h: 1,
        gap_x: 1,
        gap_y: 0,
    };

    /// Pixel layout of a windowed frontend: 50px boxes, 5px margins, 60px header
    pub const PIXELS: BoardGeometry = BoardGeometry {
        left: 0,
        header: 60,
        box_w: 50,
        box_h: 50,
        gap_x: 5,
        gap_y: 5,
    };

    fn stride(&self) -> (u16, u16) {
        ((self.box_w + self.gap_x).max(1), (self.box_h + self.gap_y).max(1))
    }

    /// Map a screen position to a cell; None inside the header band or left of the board
    /// The result may lie outside the grid, which the resolver ignores
    pub fn cell_at(&self, x: u16, y: u16) -> Option<Pos> {
        let y = y.checked_sub(self.header)?;
        let x = x.checked_sub(self.left)?;
        let (sx, sy) = self.stride();
        Some(((y / sy) as usize, (x / sx) as usize))
    }

    /// Top-left corner of a cell's box
    pub fn cell_origin(&self, (row, col): Pos) -> (u16, u16) {
        let (sx, sy) = self.stride();
        (
            self.left + col as u16 * sx + self.gap_x,
            self.header + row as u16 * sy + self.gap_y,
        )
    }

    /// Width and height covered by a size x size board, trailing gap included
    pub fn board_extent(&self, size: usize) -> (u16, u16) {
        let (sx, sy) = self.stride();
        (
            size as u16 * sx + self.gap_x,
            size as u16 * sy + self.gap_y,
        )
    }
}

/// One level in play
#[derive(Debug, Clone)]
pub struct Level {
    number: u32,
    grid: Grid,
    revealed: Revealed,
    timer: LevelTimer,
    coins: u64,
    state: LevelState,
    cursor: Pos,
    geometry: BoardGeometry,
}

impl Level {
    pub fn new(
        number: u32,
        grid: Grid,
        coins: u64,
        settings: LevelSettings,
        geometry: BoardGeometry,
    ) -> Self {
        info!(level = number, size = grid.size(), mines = grid.mine_count(), "level started");
        Level {
            number,
            grid,
            revealed: Revealed::new(),
            timer: LevelTimer::new(settings.time_limit, settings.pause_freezes_timer),
            coins,
            state: LevelState::Playing,
            cursor: (0, 0),
            geometry,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn revealed(&self) -> &Revealed {
        &self.revealed
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    pub fn state(&self) -> LevelState {
        self.state
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn geometry(&self) -> BoardGeometry {
        self.geometry
    }

    pub fn timer(&self) -> &LevelTimer {
        &self.timer
    }

    pub fn time_left(&self, now: Instant) -> u64 {
        self.timer.remaining_secs(now)
    }

    pub fn cell_view(&self, pos: Pos) -> CellView {
        if !self.revealed.contains(pos) {
            CellView::Hidden
        } else if self.grid.is_mine(pos) {
            CellView::Mine
        } else {
            CellView::Empty
        }
    }

    /// Apply one input event
    pub fn handle(&mut self, event: InputEvent, now: Instant) -> Control {
        use LevelState::*;

        if event == InputEvent::Quit {
            return Control::Exit;
        }
        match (self.state, event) {
            (Playing, InputEvent::Key(action)) => match action {
                Action::Pause => {
                    self.timer.pause(now);
                    self.state = Paused;
                    debug!(level = self.number, "paused");
                }
                Action::Up => self.step_cursor(-1, 0),
                Action::Down => self.step_cursor(1, 0),
                Action::Left => self.step_cursor(0, -1),
                Action::Right => self.step_cursor(0, 1),
                Action::Reveal | Action::Confirm => {
                    self.reveal_at(self.cursor, now);
                }
                Action::Resume | Action::Quit | Action::Menu => {}
            },
            (Playing, InputEvent::Click { x, y }) => {
                if let Some(pos) = self.geometry.cell_at(x, y) {
                    if self.grid.contains(pos) {
                        self.cursor = pos;
                    }
                    self.reveal_at(pos, now);
                }
            }
            (Paused, InputEvent::Key(Action::Resume)) => {
                self.timer.resume(now);
                self.state = Playing;
                debug!(level = self.number, "resumed");
            }
            (Paused, InputEvent::Key(Action::Quit)) => return Control::Exit,
            _ => {}
        }
        Control::Continue
    }

    /// Reveal a cell while playing; None when the level is not accepting moves
    pub fn reveal_at(&mut self, pos: Pos, now: Instant) -> Option<RevealOutcome> {
        if self.state != LevelState::Playing {
            return None;
        }
        let outcome = reveal(&self.grid, &mut self.revealed, pos);
        if outcome.is_safe_reveal() {
            self.timer.start(now);
        }
        match outcome {
            RevealOutcome::HitMine => self.state = LevelState::Lost(LossReason::Mine),
            RevealOutcome::LevelComplete => self.state = LevelState::Won,
            _ => {}
        }
        debug!(level = self.number, ?pos, ?outcome, "reveal");
        Some(outcome)
    }

    /// Timer check, once per loop iteration; paused levels are not checked
    pub fn tick(&mut self, now: Instant) -> LevelState {
        if self.state == LevelState::Playing && self.timer.is_expired(now) {
            self.state = LevelState::Lost(LossReason::Timeout);
        }
        self.state
    }

    pub fn report(&self) -> Option<LevelReport> {
        let end = match self.state {
            LevelState::Won => LevelEnd::Won,
            LevelState::Lost(reason) => LevelEnd::Lost(reason),
            LevelState::Playing | LevelState::Paused => return None,
        };
        Some(LevelReport {
            level: self.number,
            coins: self.coins,
            end,
        })
    }

    fn step_cursor(&mut self, dr: isize, dc: isize) {
        let max = (self.grid.size() - 1) as isize;
        let row = (self.cursor.0 as isize + dr).clamp(0, max) as usize;
        let col = (self.cursor.1 as isize + dc).clamp(0, max) as usize;
        self.cursor = (row, col);
    }
}
