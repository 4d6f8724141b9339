use crate::game::{completes_line, Board, Player, COLS};

use super::evaluator::Heuristic;

/// Depth-bounded minimax with alpha-beta pruning.
///
/// The board is searched in place: every trial move is a [`Placement`] that
/// is taken back when it goes out of scope, so the board is restored on
/// every return path. Moves are tried in ascending column order.
///
/// [`Placement`]: crate::game::Placement
pub struct Minimax<'h> {
    ai: Player,
    heuristic: &'h dyn Heuristic,
    nodes: u64,
}

impl<'h> Minimax<'h> {
    pub fn new(ai: Player, heuristic: &'h dyn Heuristic) -> Self {
        Minimax {
            ai,
            heuristic,
            nodes: 0,
        }
    }

    /// Positions visited by the last search, for diagnostics.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Best column for the AI and its backed-up score. The root move counts
    /// as the first of `depth` plies. Ties go to the lowest column.
    pub fn best_column(&mut self, board: &mut Board, depth: usize) -> Option<(usize, i32)> {
        self.nodes = 0;
        let mut best: Option<(usize, i32)> = None;
        let mut alpha = i32::MIN;

        for col in 0..COLS {
            let Ok(mut placed) = board.place(col, self.ai) else {
                continue;
            };
            let row = placed.row();
            let score = self.minimax(
                &mut placed,
                depth.saturating_sub(1),
                alpha,
                i32::MAX,
                (row, col),
            );

            if best.map_or(true, |(_, top)| score > top) {
                best = Some((col, score));
            }
            alpha = alpha.max(score);
        }

        best
    }

    fn minimax(
        &mut self,
        board: &mut Board,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
        last: (usize, usize),
    ) -> i32 {
        self.nodes += 1;

        let (row, col) = last;
        if depth == 0 || board.is_full() || completes_line(board, row, col).is_some() {
            return self.heuristic.evaluate(board, self.ai);
        }

        let Some(mover) = board.get(row, col).owner() else {
            return self.heuristic.evaluate(board, self.ai);
        };
        let to_move = mover.other();
        let maximizing = to_move == self.ai;
        let mut value = if maximizing { i32::MIN } else { i32::MAX };

        for next_col in 0..COLS {
            let Ok(mut placed) = board.place(next_col, to_move) else {
                continue;
            };
            let next = (placed.row(), next_col);
            let score = self.minimax(&mut placed, depth - 1, alpha, beta, next);

            if maximizing {
                value = value.max(score);
                alpha = alpha.max(value);
            } else {
                value = value.min(score);
                beta = beta.min(value);
            }
            if alpha >= beta {
                break;
            }
        }

        value
    }
}
