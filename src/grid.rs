pub mod cell;

use crate::Difficulty;
use cell::{Cell, CellContent, CellState};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::cmp;
use std::fmt::{Debug, Formatter};

/// One puzzle instance: the board, the mine layout and the bookkeeping derived from them.
///
/// The grid is created empty. Mines are placed lazily by the first [`Grid::reveal`] call so that
/// the first-revealed cell and its neighbors can be excepted from the placement ("safe zone") —
/// the player's opening move never hits a mine and never opens onto a bare number wall.
///
/// All coordinates are `(row, column)` pairs. The session keeps its cursor in range by wraparound
/// arithmetic, so the grid indexes directly and performs no bounds checks of its own.
pub struct Grid {
    /// The board, rows of cells. Row and column counts are fixed per difficulty at creation.
    cells: Vec<Vec<Cell>>,
    rows: u8,
    cols: u8,
    total_mines: u16,
    /// Whether the lazy mine placement has run yet.
    mines_placed: bool,
    revealed_count: u16,
    flags_placed: u16,
    game_over: bool,
    won: bool,
    /// The entropy source for mine placement. Owned by the grid so that a seeded grid replays the
    /// exact same layout for the same first reveal.
    rng: StdRng,
}

impl Grid {
    /// Creates a new grid for the given difficulty preset, seeding the mine placement from OS
    /// entropy.
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_rng(difficulty, StdRng::from_entropy())
    }

    /// Creates a new grid with a caller-supplied seed. Two grids with the same seed and the same
    /// first reveal produce identical mine layouts, which is what the tests lean on.
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_rng(difficulty, StdRng::seed_from_u64(seed))
    }

    fn with_rng(difficulty: Difficulty, rng: StdRng) -> Self {
        let (rows, cols, total_mines) = difficulty.board();

        Grid {
            cells: vec![vec![Cell::new(); cols as usize]; rows as usize],
            rows,
            cols,
            total_mines,
            mines_placed: false,
            revealed_count: 0,
            flags_placed: 0,
            game_over: false,
            won: false,
            rng,
        }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn total_mines(&self) -> u16 {
        self.total_mines
    }

    /// The number of cells that must be revealed to win.
    pub fn total_safe_cells(&self) -> u16 {
        self.rows as u16 * self.cols as u16 - self.total_mines
    }

    pub fn revealed_count(&self) -> u16 {
        self.revealed_count
    }

    pub fn flags_placed(&self) -> u16 {
        self.flags_placed
    }

    /// The status-bar counter: total mines minus placed flags. Deliberately unclamped — the
    /// counter going negative is the device's feedback for over-flagging.
    pub fn mine_counter(&self) -> i32 {
        self.total_mines as i32 - self.flags_placed as i32
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    /// A read-only cell reference. The caller is expected to pass in-range coordinates.
    pub fn cell(&self, row: u8, col: u8) -> &Cell {
        &self.cells[row as usize][col as usize]
    }

    /// Whether the cell at the given position is mined. Always `false` before the first reveal.
    pub fn is_mine(&self, row: u8, col: u8) -> bool {
        self.cell(row, col).is_mine()
    }

    /// Finalizes the game as a loss without revealing anything. Used when the session timer
    /// saturates.
    pub fn forfeit(&mut self) {
        self.game_over = true;
        self.won = false;
    }

    /// The in-range neighbors of a cell, up to 8 of them.
    fn neighbors(&self, row: u8, col: u8) -> Vec<(u8, u8)> {
        let mut positions = Vec::with_capacity(8);

        for dr in -1i16..=1 {
            for dc in -1i16..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }

                let nr = row as i16 + dr;
                let nc = col as i16 + dc;

                if (0..self.rows as i16).contains(&nr) && (0..self.cols as i16).contains(&nc) {
                    positions.push((nr as u8, nc as u8));
                }
            }
        }

        positions
    }

    /// Distributes the mines, excepting the safe zone around the first-revealed cell, and computes
    /// the neighbor counts for every clear cell.
    fn place_mines(&mut self, safe_row: u8, safe_col: u8) {
        let mut safe = vec![vec![false; self.cols as usize]; self.rows as usize];
        safe[safe_row as usize][safe_col as usize] = true;
        for (nr, nc) in self.neighbors(safe_row, safe_col) {
            safe[nr as usize][nc as usize] = true;
        }

        let mut candidates = Vec::with_capacity(self.rows as usize * self.cols as usize);
        for row in 0..self.rows {
            for col in 0..self.cols {
                if !safe[row as usize][col as usize] {
                    candidates.push((row, col));
                }
            }
        }

        // An unbiased Fisher-Yates permutation; the first `total_mines` candidates get the mines.
        candidates.shuffle(&mut self.rng);
        let mines_amount = cmp::min(self.total_mines as usize, candidates.len());
        for &(row, col) in &candidates[..mines_amount] {
            self.cells[row as usize][col as usize].mine();
        }

        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.cells[row as usize][col as usize].is_mine() {
                    continue;
                }

                let around = self
                    .neighbors(row, col)
                    .into_iter()
                    .filter(|&(nr, nc)| self.cell(nr, nc).is_mine())
                    .count() as u8;
                self.cells[row as usize][col as usize].set_adjacent_mines(around);
            }
        }

        self.mines_placed = true;
    }

    /// Reveals a cell and returns everything that became visible as `(row, column, content)`
    /// triples. An empty result means no action was taken and there is nothing to redraw.
    ///
    /// The first call places the mines (see the type-level docs). Revealing a mine finalizes the
    /// game as a loss and returns the clicked cell first, followed by every other mine, so a front
    /// end can display the whole layout at once. Revealing a clear cell flood-fills from it: the
    /// connected region of zero-value cells opens in one call together with the numbered cells
    /// bordering it. The fill is iterative over an explicit work stack — the board is small, but
    /// the original target had no stack to spare and the traversal order stays deterministic this
    /// way.
    pub fn reveal(&mut self, row: u8, col: u8) -> Vec<(u8, u8, CellContent)> {
        if self.game_over || self.cell(row, col).state() != CellState::Unrevealed {
            return Vec::new();
        }

        if !self.mines_placed {
            self.place_mines(row, col);
        }

        if self.cell(row, col).is_mine() {
            self.game_over = true;
            self.won = false;
            self.cells[row as usize][col as usize].set_state(CellState::Revealed);

            let mut result = vec![(row, col, CellContent::Mine)];
            for mr in 0..self.rows {
                for mc in 0..self.cols {
                    if self.cell(mr, mc).is_mine() && (mr, mc) != (row, col) {
                        result.push((mr, mc, CellContent::Mine));
                    }
                }
            }
            return result;
        }

        let mut revealed = Vec::new();
        let mut stack = vec![(row, col)];

        while let Some((cr, cc)) = stack.pop() {
            let cell = *self.cell(cr, cc);
            if cell.state() != CellState::Unrevealed || cell.is_mine() {
                continue;
            }

            self.cells[cr as usize][cc as usize].set_state(CellState::Revealed);
            self.revealed_count += 1;
            revealed.push((cr, cc, cell.content()));

            if cell.adjacent_mines() == Some(0) {
                for (nr, nc) in self.neighbors(cr, cc) {
                    if self.cell(nr, nc).state() == CellState::Unrevealed {
                        stack.push((nr, nc));
                    }
                }
            }
        }

        if self.revealed_count == self.total_safe_cells() {
            self.game_over = true;
            self.won = true;
        }

        revealed
    }

    /// Flips a cell between unrevealed and flagged, keeping the flag count in step. Returns the
    /// new state, or `None` if the game is over or the cell is already revealed (no action).
    pub fn toggle_flag(&mut self, row: u8, col: u8) -> Option<CellState> {
        if self.game_over {
            return None;
        }

        let new_state = match self.cell(row, col).state() {
            CellState::Revealed => return None,
            CellState::Unrevealed => {
                self.flags_placed += 1;
                CellState::Flagged
            }
            CellState::Flagged => {
                self.flags_placed -= 1;
                CellState::Unrevealed
            }
        };

        self.cells[row as usize][col as usize].set_state(new_state);
        Some(new_state)
    }
}

impl Debug for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.iter() {
            for cell in row {
                write!(f, "{:?} ", cell)?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}
