use tracing::{debug, info};

use crate::error::{BoardError, MoveError};

use super::win::{completes_line, WinLine};
use super::{Board, Player, COLS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Won { player: Player, line: WinLine },
    Draw,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Won { player, .. } => Some(*player),
            _ => None,
        }
    }
}

/// One game: the board, the side to move and the result so far.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    board: Board,
    current_player: Player,
    outcome: Outcome,
    history: Vec<usize>,
}

impl GameSession {
    /// Create initial game state
    pub fn new() -> Self {
        GameSession {
            board: Board::new(),
            current_player: Player::One, // Player one starts
            outcome: Outcome::InProgress,
            history: Vec::new(),
        }
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Get list of legal columns (not full)
    pub fn legal_columns(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.legal_columns().collect()
    }

    /// Columns played so far, oldest first
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    pub fn last_move(&self) -> Option<usize> {
        self.history.last().copied()
    }

    /// Drop the side to move's piece in `column` and recompute the outcome.
    pub fn apply_move(&mut self, column: usize) -> Result<Outcome, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if column >= COLS {
            return Err(MoveError::InvalidColumn);
        }

        let player = self.current_player;
        let row = self.board.drop_piece(column, player).map_err(|e| match e {
            BoardError::ColumnFull(_) => MoveError::ColumnFull,
            _ => MoveError::InvalidColumn,
        })?;
        self.history.push(column);
        debug!(player = player.code(), column, row, "piece dropped");

        // Check for win
        if let Some(line) = completes_line(&self.board, row, column) {
            self.outcome = Outcome::Won { player, line };
            info!(winner = player.code(), moves = self.history.len(), "game won");
        } else if self.board.is_full() {
            self.outcome = Outcome::Draw;
            info!(moves = self.history.len(), "game drawn");
        } else {
            self.current_player = player.other();
        }

        Ok(self.outcome)
    }

    /// Start over: empty board, player one to move.
    pub fn reset(&mut self) {
        *self = GameSession::new();
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
