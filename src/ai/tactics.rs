//! Short-circuit decision tiers that run before any search: immediate win,
//! immediate block, diagonal threat detection and the run-length heuristic.

use crate::game::win::{completes_line, longest_run};
use crate::game::{Board, Cell, Player, COLS, ROWS};

/// Bonus for playing the center column in the run-length heuristic.
const CENTER_BONUS: i32 = 2;
/// Bonus for taking a cell where the opponent would reach a run of three.
const DENY_BONUS: i32 = 5;

/// First column (ascending) where `player` would complete a line.
pub fn winning_drop(board: &mut Board, player: Player) -> Option<usize> {
    (0..COLS).find(|&col| match board.place(col, player) {
        Ok(placed) => completes_line(&placed, placed.row(), col).is_some(),
        Err(_) => false,
    })
}

/// Finds a three-cell diagonal segment holding two of `player`'s pieces and
/// one empty cell, and returns the column of that empty cell if a piece
/// dropped there would land on it.
pub fn diagonal_threat(board: &Board, player: Player) -> Option<usize> {
    let own = player.to_cell();

    for row in 0..ROWS {
        for col in 0..COLS {
            // Row increasing with column
            if row <= 2 && col <= 3 {
                let segment = [(row, col), (row + 1, col + 1), (row + 2, col + 2)];
                if let Some(target) = open_cell(board, &segment, own) {
                    return Some(target);
                }
            }

            // Row decreasing with column
            if row >= 3 && col <= 3 {
                let segment = [(row, col), (row - 1, col + 1), (row - 2, col + 2)];
                if let Some(target) = open_cell(board, &segment, own) {
                    return Some(target);
                }
            }
        }
    }

    None
}

fn open_cell(board: &Board, segment: &[(usize, usize); 3], own: Cell) -> Option<usize> {
    let mut count = 0;
    for &(row, col) in segment {
        match board.get(row, col) {
            Cell::Empty => {}
            c if c == own => count += 1,
            _ => return None,
        }
    }
    if count != 2 {
        return None;
    }

    segment
        .iter()
        .find(|&&(row, col)| {
            board.get(row, col) == Cell::Empty
                && (row == ROWS - 1 || board.get(row + 1, col) != Cell::Empty)
        })
        .map(|&(_, col)| col)
}

/// Scores every legal column by the longest run the AI's piece would join,
/// plus the center bonus, plus a bonus when the opponent would reach a run
/// of three on the same cell. Returns the first column with the best score.
pub fn best_run_column(board: &mut Board, ai: Player) -> Option<(usize, i32)> {
    let mut best: Option<(usize, i32)> = None;

    for col in 0..COLS {
        let Ok(placed) = board.place(col, ai) else {
            continue;
        };
        let row = placed.row();
        let mut score = longest_run(&placed, row, col) as i32;
        drop(placed);

        if col == COLS / 2 {
            score += CENTER_BONUS;
        }

        if let Ok(denied) = board.place(col, ai.other()) {
            if longest_run(&denied, row, col) >= 3 {
                score += DENY_BONUS;
            }
        }

        if best.map_or(true, |(_, top)| score > top) {
            best = Some((col, score));
        }
    }

    best
}
