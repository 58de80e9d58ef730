//! The 19×19 Pente board as mirrored from the server.
//!
//! The server is authoritative: the client never places stones locally, it
//! only installs the flat 361-character snapshots carried by
//! `alert_start_game`, `move_response` and `new_board_state`.

use std::fmt;

use thiserror::Error;

/// Number of columns on the board.
pub const BOARD_COLS: usize = 19;
/// Number of rows on the board.
pub const BOARD_ROWS: usize = 19;
/// Total number of cells.
pub const BOARD_SIZE: usize = BOARD_COLS * BOARD_ROWS;

/// Wire character for an empty intersection.
pub const EMPTY_CHAR: char = '-';
/// Wire character for a stone of the game host.
pub const HOST_CHAR: char = 'x';
/// Wire character for a stone of the joining player.
pub const OPPONENT_CHAR: char = 'o';

/// Errors produced when parsing a board snapshot off the wire.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// The snapshot does not contain exactly [`BOARD_SIZE`] cells.
    #[error("board snapshot has {0} cells, expected {BOARD_SIZE}")]
    WrongLength(usize),

    /// The snapshot contains a character outside `-`, `x`, `o`.
    #[error("invalid board cell {0:?}")]
    InvalidCell(char),
}

/// One intersection of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Host,
    Opponent,
}

impl Cell {
    fn from_wire(c: char) -> Result<Self, BoardError> {
        match c {
            EMPTY_CHAR => Ok(Cell::Empty),
            HOST_CHAR => Ok(Cell::Host),
            OPPONENT_CHAR => Ok(Cell::Opponent),
            other => Err(BoardError::InvalidCell(other)),
        }
    }

    fn to_wire(self) -> char {
        match self {
            Cell::Empty => EMPTY_CHAR,
            Cell::Host => HOST_CHAR,
            Cell::Opponent => OPPONENT_CHAR,
        }
    }
}

/// A full board snapshot, always exactly [`BOARD_SIZE`] cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Vec<Cell>,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    /// An all-empty board.
    pub fn empty() -> Self {
        Self {
            cells: vec![Cell::Empty; BOARD_SIZE],
        }
    }

    /// Parse a flat wire snapshot (row-major, 361 characters).
    pub fn parse(wire: &str) -> Result<Self, BoardError> {
        let mut cells = Vec::with_capacity(BOARD_SIZE);
        for c in wire.chars() {
            cells.push(Cell::from_wire(c)?);
        }
        if cells.len() != BOARD_SIZE {
            return Err(BoardError::WrongLength(cells.len()));
        }
        Ok(Self { cells })
    }

    /// Cell at 0-indexed (col, row). Returns `None` outside the grid.
    pub fn cell(&self, col: usize, row: usize) -> Option<Cell> {
        if col >= BOARD_COLS || row >= BOARD_ROWS {
            return None;
        }
        Some(self.cells[row * BOARD_COLS + col])
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of stones of the given kind on the board.
    pub fn count(&self, kind: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            write!(f, "{}", cell.to_wire())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_has_exactly_361_empty_cells() {
        let board = Board::empty();
        assert_eq!(board.cells().len(), BOARD_SIZE);
        assert_eq!(board.count(Cell::Empty), BOARD_SIZE);
    }

    #[test]
    fn parse_round_trips_wire_snapshot() {
        let mut wire = "-".repeat(BOARD_SIZE);
        wire.replace_range(0..1, "x");
        // (9, 9) is the centre intersection.
        let centre = 9 * BOARD_COLS + 9;
        wire.replace_range(centre..centre + 1, "o");

        let board = Board::parse(&wire).unwrap();
        assert_eq!(board.cell(0, 0), Some(Cell::Host));
        assert_eq!(board.cell(9, 9), Some(Cell::Opponent));
        assert_eq!(board.cell(18, 18), Some(Cell::Empty));
        assert_eq!(board.count(Cell::Host), 1);
        assert_eq!(board.count(Cell::Opponent), 1);
        assert_eq!(board.to_string(), wire);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert_eq!(
            Board::parse(&"-".repeat(BOARD_SIZE - 1)),
            Err(BoardError::WrongLength(BOARD_SIZE - 1))
        );
        assert_eq!(
            Board::parse(&"-".repeat(BOARD_SIZE + 1)),
            Err(BoardError::WrongLength(BOARD_SIZE + 1))
        );
    }

    #[test]
    fn parse_rejects_foreign_characters() {
        let mut wire = "-".repeat(BOARD_SIZE);
        wire.replace_range(5..6, "X");
        assert_eq!(Board::parse(&wire), Err(BoardError::InvalidCell('X')));
    }

    #[test]
    fn out_of_range_lookups_return_none() {
        let board = Board::empty();
        assert_eq!(board.cell(19, 0), None);
        assert_eq!(board.cell(0, 19), None);
    }
}
