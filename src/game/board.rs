use std::ops::{Deref, DerefMut};

use crate::error::BoardError;

use super::Player;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    One,
    Two,
}

impl Cell {
    /// Wire code: 0 empty, 1 player one, 2 player two
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::One => 1,
            Cell::Two => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::One),
            2 => Some(Cell::Two),
            _ => None,
        }
    }

    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::One => Some(Player::One),
            Cell::Two => Some(Player::Two),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Build a board from wire codes, rejecting unknown codes and pieces
    /// resting on an empty cell.
    pub fn from_codes(codes: &[[u8; COLS]; ROWS]) -> Result<Self, BoardError> {
        let mut board = Board::new();
        for (row, line) in codes.iter().enumerate() {
            for (col, &code) in line.iter().enumerate() {
                board.cells[row][col] =
                    Cell::from_code(code).ok_or(BoardError::UnknownCell { row, col, code })?;
            }
        }

        for row in 0..ROWS - 1 {
            for col in 0..COLS {
                if board.cells[row][col] != Cell::Empty && board.cells[row + 1][col] == Cell::Empty {
                    return Err(BoardError::FloatingPiece { row, col });
                }
            }
        }

        Ok(board)
    }

    /// Wire codes of every cell, row 0 first
    pub fn codes(&self) -> [[u8; COLS]; ROWS] {
        self.cells.map(|line| line.map(Cell::code))
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row 5 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Check if a piece can be dropped in a column
    pub fn is_legal(&self, col: usize) -> bool {
        col < COLS && self.cells[0][col] == Cell::Empty
    }

    /// Legal columns in ascending order
    pub fn legal_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..COLS).filter(move |&col| self.is_legal(col))
    }

    /// Number of pieces stacked in a column
    pub fn column_height(&self, col: usize) -> usize {
        (0..ROWS)
            .filter(|&row| self.cells[row][col] != Cell::Empty)
            .count()
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, player: Player) -> Result<usize, BoardError> {
        if col >= COLS {
            return Err(BoardError::InvalidColumn(col));
        }

        // Find the lowest empty row in this column
        for row in (0..ROWS).rev() {
            if self.cells[row][col] == Cell::Empty {
                self.cells[row][col] = player.to_cell();
                return Ok(row);
            }
        }

        Err(BoardError::ColumnFull(col))
    }

    /// Remove the topmost piece of a column, returns the row it was cleared from
    pub fn undo(&mut self, col: usize) -> Result<usize, BoardError> {
        if col >= COLS {
            return Err(BoardError::InvalidColumn(col));
        }

        for row in 0..ROWS {
            if self.cells[row][col] != Cell::Empty {
                self.cells[row][col] = Cell::Empty;
                return Ok(row);
            }
        }

        Err(BoardError::ColumnEmpty(col))
    }

    /// Drop a piece that is taken back when the returned guard goes out of scope.
    pub fn place(&mut self, col: usize, player: Player) -> Result<Placement<'_>, BoardError> {
        let row = self.drop_piece(col, player)?;
        Ok(Placement {
            board: self,
            row,
            col,
        })
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| !self.is_legal(col))
    }

    pub fn is_empty(&self) -> bool {
        self.cells[ROWS - 1].iter().all(|&cell| cell == Cell::Empty)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// A trial piece on a borrowed board. Dropping it restores the board.
pub struct Placement<'a> {
    board: &'a mut Board,
    row: usize,
    col: usize,
}

impl Placement<'_> {
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }
}

impl Deref for Placement<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for Placement<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for Placement<'_> {
    fn drop(&mut self) {
        let undone = self.board.undo(self.col);
        debug_assert_eq!(
            undone,
            Ok(self.row),
            "placements must be released in reverse order"
        );
    }
}
