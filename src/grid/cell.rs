use std::fmt::{Debug, Formatter};

/// What a cell holds once the mines have been placed.
///
/// A cell either contains a mine or a count of the mines among its (up to 8) neighbors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CellContent {
    /// A mined cell.
    Mine,
    /// An empty cell. The value is the number of mines around it, `0..=8`.
    Clear(u8),
}

/// The player-visible state of a cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CellState {
    /// The cell has not been touched yet.
    Unrevealed,
    /// The cell has been opened.
    Revealed,
    /// The cell carries a flag. A flagged cell cannot be revealed until unflagged.
    Flagged,
}

/// A single cell of the grid: its content plus its player-visible state.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Cell {
    content: CellContent,
    state: CellState,
}

impl Cell {
    /// Creates a new unrevealed cell with no mine and a zero neighbor count.
    pub(crate) fn new() -> Self {
        Cell {
            content: CellContent::Clear(0),
            state: CellState::Unrevealed,
        }
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: CellState) {
        self.state = state;
    }

    pub fn content(&self) -> CellContent {
        self.content
    }

    /// Checks whether the cell contains a mine.
    pub fn is_mine(&self) -> bool {
        self.content == CellContent::Mine
    }

    /// Puts a mine into the cell.
    pub(crate) fn mine(&mut self) {
        self.content = CellContent::Mine;
    }

    /// The number of mines around the cell, or `None` if the cell itself is mined.
    pub fn adjacent_mines(&self) -> Option<u8> {
        match self.content {
            CellContent::Clear(amount) => Some(amount),
            CellContent::Mine => None,
        }
    }

    /// Overwrites the neighbor count. Has no effect on a mined cell.
    pub(crate) fn set_adjacent_mines(&mut self, amount: u8) {
        if let CellContent::Clear(_) = self.content {
            self.content = CellContent::Clear(amount);
        }
    }
}

/// The `Debug` implementation shows the content regardless of the state, which is handy when
/// printing whole grids from tests.
impl Debug for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let symbol = match (self.state, self.content) {
            (CellState::Flagged, _) => 'F',
            (_, CellContent::Mine) => '*',
            (_, CellContent::Clear(n)) => (b'0' + n) as char,
        };

        let marker = match self.state {
            CellState::Revealed => ' ',
            _ => '.',
        };

        write!(f, "{}{}", symbol, marker)
    }
}

#[cfg(test)]
mod test {
    use super::{Cell, CellContent, CellState};

    #[test]
    fn a_new_cell_is_unrevealed_and_clear() {
        let cell = Cell::new();

        assert_eq!(cell.state(), CellState::Unrevealed);
        assert_eq!(cell.content(), CellContent::Clear(0));
        assert!(!cell.is_mine());
    }

    #[test]
    fn mining_a_cell_hides_its_neighbor_count() {
        let mut cell = Cell::new();
        cell.mine();

        assert!(cell.is_mine());
        assert_eq!(cell.adjacent_mines(), None);
    }

    #[test]
    fn the_neighbor_count_does_not_overwrite_a_mine() {
        let mut cell = Cell::new();
        cell.mine();
        cell.set_adjacent_mines(3);

        assert!(cell.is_mine());
    }
}
