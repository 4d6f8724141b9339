//! Four-in-a-row detection for the piece that was just placed, plus the
//! window geometry shared with the evaluator.

use super::{Board, Cell, Player, COLS, ROWS};

/// A (row, col) board coordinate.
pub type Coord = (usize, usize);

/// The four line orientations, in the order lines are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
    /// Row index increases with column index.
    Ascending,
    /// Row index decreases with column index.
    Descending,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Horizontal,
        Orientation::Vertical,
        Orientation::Ascending,
        Orientation::Descending,
    ];

    /// (row step, col step) of one cell along the line
    pub fn step(self) -> (isize, isize) {
        match self {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
            Orientation::Ascending => (1, 1),
            Orientation::Descending => (-1, 1),
        }
    }
}

/// Four winning coordinates and the orientation they lie on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WinLine {
    pub orientation: Orientation,
    pub cells: [Coord; 4],
}

impl WinLine {
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.cells.contains(&(row, col))
    }
}

fn offset(row: usize, col: usize, (dr, dc): (isize, isize), k: isize) -> Option<Coord> {
    let r = row as isize + dr * k;
    let c = col as isize + dc * k;
    if r < 0 || c < 0 || r >= ROWS as isize || c >= COLS as isize {
        None
    } else {
        Some((r as usize, c as usize))
    }
}

/// Number of consecutive `cell` pieces walking away from (row, col), not
/// counting (row, col) itself.
fn count_direction(board: &Board, row: usize, col: usize, step: (isize, isize), cell: Cell) -> usize {
    let mut count = 0;
    while let Some((r, c)) = offset(row, col, step, count as isize + 1) {
        if board.get(r, c) != cell {
            break;
        }
        count += 1;
    }
    count
}

/// Length of the contiguous run through (row, col) along `orientation`,
/// counting the piece at (row, col). Zero for an empty cell.
pub fn run_length(board: &Board, row: usize, col: usize, orientation: Orientation) -> usize {
    let cell = board.get(row, col);
    if cell == Cell::Empty {
        return 0;
    }
    let (dr, dc) = orientation.step();
    count_direction(board, row, col, (-dr, -dc), cell) + 1 + count_direction(board, row, col, (dr, dc), cell)
}

/// Longest run through (row, col) over all four orientations.
pub fn longest_run(board: &Board, row: usize, col: usize) -> usize {
    Orientation::ALL
        .iter()
        .map(|&orientation| run_length(board, row, col, orientation))
        .max()
        .unwrap_or(0)
}

/// Returns the line completed by the piece at (row, col), if any.
///
/// Each orientation is scanned for the full contiguous run containing the
/// cell, so a piece dropped into the middle of a line is found as well as
/// one at its end. For runs longer than four the reported window is the
/// earliest one that still contains (row, col).
pub fn completes_line(board: &Board, row: usize, col: usize) -> Option<WinLine> {
    let cell = board.get(row, col);
    if cell == Cell::Empty {
        return None;
    }

    for orientation in Orientation::ALL {
        let step = orientation.step();
        let back = count_direction(board, row, col, (-step.0, -step.1), cell);
        let forward = count_direction(board, row, col, step, cell);
        if back + 1 + forward < 4 {
            continue;
        }

        let start = -(back.min(3) as isize);
        let mut cells = [(row, col); 4];
        for (k, slot) in cells.iter_mut().enumerate() {
            *slot = offset(row, col, step, start + k as isize)?;
        }
        return Some(WinLine { orientation, cells });
    }

    None
}

/// Every four-cell window on the board, all orientations.
pub fn windows() -> impl Iterator<Item = [Coord; 4]> {
    Orientation::ALL.into_iter().flat_map(|orientation| {
        let step = orientation.step();
        (0..ROWS).flat_map(move |row| {
            (0..COLS).filter_map(move |col| {
                offset(row, col, step, 3)?;
                let mut cells = [(row, col); 4];
                for (k, slot) in cells.iter_mut().enumerate() {
                    *slot = offset(row, col, step, k as isize)?;
                }
                Some(cells)
            })
        })
    })
}

/// Whether `player` owns any completed four-in-a-row on the board.
pub fn has_line(board: &Board, player: Player) -> bool {
    let cell = player.to_cell();
    windows().any(|window| window.iter().all(|&(r, c)| board.get(r, c) == cell))
}
