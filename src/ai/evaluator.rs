use crate::game::win::{has_line, windows};
use crate::game::{Board, Cell, Player};

/// Score of a completed line; dominates any sum of open windows.
pub const WIN_SCORE: i32 = 100_000;

/// Trait for evaluating a board position from a player's perspective.
pub trait Heuristic: Send {
    fn evaluate(&self, board: &Board, player: Player) -> i32;
}

/// Default evaluator: sums a fixed contribution for every four-cell window
/// on the board, by piece composition only.
pub struct WindowEvaluator;

impl WindowEvaluator {
    fn score_window(own: usize, opp: usize, empty: usize) -> i32 {
        match (own, opp, empty) {
            (4, 0, 0) => WIN_SCORE,
            (0, 4, 0) => -WIN_SCORE,
            (3, 0, 1) => 1000,
            (0, 3, 1) => -1000,
            (2, 0, 2) => 100,
            (0, 2, 2) => -100,
            _ => 0,
        }
    }
}

impl Heuristic for WindowEvaluator {
    fn evaluate(&self, board: &Board, player: Player) -> i32 {
        // Completed lines short-circuit the window sum
        if has_line(board, player) {
            return WIN_SCORE;
        }
        if has_line(board, player.other()) {
            return -WIN_SCORE;
        }

        let own_cell = player.to_cell();
        let mut score = 0;

        for window in windows() {
            let mut own = 0;
            let mut opp = 0;
            let mut empty = 0;
            for (row, col) in window {
                match board.get(row, col) {
                    Cell::Empty => empty += 1,
                    c if c == own_cell => own += 1,
                    _ => opp += 1,
                }
            }
            score += Self::score_window(own, opp, empty);
        }

        score
    }
}
