// Minefield generation and single-cell reveal resolution
// A cell is either a mine or safe; there are no adjacency counts and no flood fill

use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Grid position as (row, col)
pub type Pos = (usize, usize);

/// Clamp a requested mine count so at least one safe cell remains
pub fn clamp_mines(size: usize, num_mines: usize) -> usize {
    num_mines.min((size * size).saturating_sub(1))
}

/// A single cell of the minefield
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub is_mine: bool,
}

/// Square minefield, immutable once generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,       // Side length
    cells: Vec<Cell>,  // Row-major cells
    mine_count: usize, // Number of mines placed
}

impl Grid {
    /// Generate a size x size grid with `num_mines` mines at distinct random positions
    /// The mine count is clamped to leave at least one safe cell
    pub fn generate<R: Rng + ?Sized>(size: usize, num_mines: usize, rng: &mut R) -> Self {
        let size = size.max(1);
        let mines = clamp_mines(size, num_mines);
        if mines < num_mines {
            warn!(
                size,
                requested = num_mines,
                placed = mines,
                "mine count clamped to grid capacity"
            );
        }

        // rejection sampling: duplicates are simply drawn again
        let mut positions: HashSet<Pos> = HashSet::with_capacity(mines);
        while positions.len() < mines {
            let row = rng.gen_range(0..size);
            let col = rng.gen_range(0..size);
            positions.insert((row, col));
        }

        let mut grid = Grid {
            size,
            cells: vec![Cell::default(); size * size],
            mine_count: 0,
        };
        for pos in positions {
            grid.place_mine(pos);
        }
        debug!(size, mines = grid.mine_count, "grid generated");
        grid
    }

    /// Build a grid from explicit mine positions
    /// Returns None if a position is out of bounds or no safe cell would remain
    pub fn from_mines(size: usize, mines: &[Pos]) -> Option<Self> {
        let mut grid = Grid {
            size,
            cells: vec![Cell::default(); size * size],
            mine_count: 0,
        };
        for &pos in mines {
            if !grid.contains(pos) {
                return None;
            }
            grid.place_mine(pos);
        }
        (grid.safe_cell_count() > 0).then_some(grid)
    }

    fn place_mine(&mut self, pos: Pos) {
        let idx = self.index(pos);
        if !self.cells[idx].is_mine {
            self.cells[idx].is_mine = true;
            self.mine_count += 1;
        }
    }

    fn index(&self, (row, col): Pos) -> usize {
        row * self.size + col
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> usize {
        self.cells.len() - self.mine_count
    }

    pub fn contains(&self, (row, col): Pos) -> bool {
        row < self.size && col < self.size
    }

    pub fn cell(&self, pos: Pos) -> Option<Cell> {
        self.contains(pos).then(|| self.cells[self.index(pos)])
    }

    /// Out-of-bounds positions are never mines
    pub fn is_mine(&self, pos: Pos) -> bool {
        self.cell(pos).is_some_and(|c| c.is_mine)
    }

    /// Iterate mine positions in row-major order
    pub fn mine_positions(&self) -> impl Iterator<Item = Pos> + '_ {
        self.positions().filter(|&pos| self.is_mine(pos))
    }

    /// Iterate safe positions in row-major order
    pub fn safe_positions(&self) -> impl Iterator<Item = Pos> + '_ {
        self.positions().filter(|&pos| !self.is_mine(pos))
    }

    fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| (row, col)))
    }
}

/// Positions uncovered so far within one level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revealed {
    cells: HashSet<Pos>,
}

impl Revealed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.contains(&pos)
    }
}

/// Result of revealing a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    OutOfBounds,
    AlreadyRevealed,
    HitMine,
    LevelComplete,
    Continue,
}

impl RevealOutcome {
    /// True when a safe cell was uncovered by this reveal
    pub const fn is_safe_reveal(self) -> bool {
        matches!(self, Self::LevelComplete | Self::Continue)
    }
}

/// Reveal `pos` on `grid`, recording it in `revealed`
/// Exactly one cell is uncovered per call
pub fn reveal(grid: &Grid, revealed: &mut Revealed, pos: Pos) -> RevealOutcome {
    if !grid.contains(pos) {
        return RevealOutcome::OutOfBounds;
    }
    if !revealed.cells.insert(pos) {
        return RevealOutcome::AlreadyRevealed;
    }
    if grid.is_mine(pos) {
        return RevealOutcome::HitMine;
    }
    if revealed.len() == grid.safe_cell_count() {
        RevealOutcome::LevelComplete
    } else {
        RevealOutcome::Continue
    }
}
