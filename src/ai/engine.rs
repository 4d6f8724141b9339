use std::fmt;
use std::str::FromStr;

use rand::Rng;
use tracing::debug;

use crate::error::{EngineError, ModeParseError};
use crate::game::{Board, Player};

use super::evaluator::{Heuristic, WindowEvaluator};
use super::random::random_column;
use super::search::Minimax;
use super::tactics::{best_run_column, diagonal_threat, winning_drop};

/// Plies searched by the minimax tier unless configured otherwise.
pub const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Named tier sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    /// Uniform random among legal columns.
    Random,
    /// Win, block, run-length heuristic.
    Tactical,
    /// Win, block, diagonal threats, run-length heuristic.
    Strategic,
    /// Win, block, alpha-beta search.
    Minimax,
}

impl EngineMode {
    pub const ALL: [EngineMode; 4] = [
        EngineMode::Random,
        EngineMode::Tactical,
        EngineMode::Strategic,
        EngineMode::Minimax,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EngineMode::Random => "random",
            EngineMode::Tactical => "tactical",
            EngineMode::Strategic => "strategic",
            EngineMode::Minimax => "minimax",
        }
    }

    pub fn tiers(self, search_depth: usize) -> Tiers {
        match self {
            EngineMode::Random => Tiers::NONE,
            EngineMode::Tactical => Tiers {
                immediate_win: true,
                immediate_block: true,
                heuristic: true,
                ..Tiers::NONE
            },
            EngineMode::Strategic => Tiers {
                immediate_win: true,
                immediate_block: true,
                diagonal_threats: true,
                heuristic: true,
                ..Tiers::NONE
            },
            EngineMode::Minimax => Tiers {
                immediate_win: true,
                immediate_block: true,
                search_depth: Some(search_depth),
                ..Tiers::NONE
            },
        }
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EngineMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EngineMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModeParseError(s.to_string()))
    }
}

/// Which decision tiers are enabled. The random fallback is always last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tiers {
    pub immediate_win: bool,
    pub immediate_block: bool,
    pub diagonal_threats: bool,
    pub heuristic: bool,
    pub search_depth: Option<usize>,
}

impl Tiers {
    pub const NONE: Tiers = Tiers {
        immediate_win: false,
        immediate_block: false,
        diagonal_threats: false,
        heuristic: false,
        search_depth: None,
    };
}

/// The tier that produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    ImmediateWin,
    ImmediateBlock,
    DiagonalBlock,
    DiagonalOpportunity,
    Heuristic,
    Search,
    Random,
}

impl Tier {
    pub fn name(self) -> &'static str {
        match self {
            Tier::ImmediateWin => "immediate win",
            Tier::ImmediateBlock => "immediate block",
            Tier::DiagonalBlock => "diagonal block",
            Tier::DiagonalOpportunity => "diagonal opportunity",
            Tier::Heuristic => "run heuristic",
            Tier::Search => "minimax search",
            Tier::Random => "random",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub column: usize,
    pub tier: Tier,
    /// Tier-specific score, for the heuristic and search tiers.
    pub score: Option<i32>,
}

impl Decision {
    fn new(column: usize, tier: Tier) -> Self {
        Decision {
            column,
            tier,
            score: None,
        }
    }
}

/// Tiered move selection. Holds no board state between calls.
pub struct DecisionEngine {
    tiers: Tiers,
    heuristic: Box<dyn Heuristic>,
}

impl DecisionEngine {
    pub fn new(mode: EngineMode) -> Self {
        Self::with_depth(mode, DEFAULT_SEARCH_DEPTH)
    }

    pub fn with_depth(mode: EngineMode, search_depth: usize) -> Self {
        Self::from_tiers(mode.tiers(search_depth))
    }

    pub fn from_tiers(tiers: Tiers) -> Self {
        DecisionEngine {
            tiers,
            heuristic: Box::new(WindowEvaluator),
        }
    }

    /// Replace the evaluator used by the search tier.
    pub fn with_heuristic(mut self, heuristic: Box<dyn Heuristic>) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn tiers(&self) -> Tiers {
        self.tiers
    }

    /// Choose a column for `ai`. Tiers run in fixed priority order and the
    /// first one that yields a column decides. The caller's board is never
    /// modified; trial moves are made on a private copy.
    pub fn choose_move<R: Rng + ?Sized>(
        &self,
        board: &Board,
        ai: Player,
        rng: &mut R,
    ) -> Result<Decision, EngineError> {
        if board.is_full() {
            return Err(EngineError::NoLegalMove);
        }

        let mut scratch = *board;
        let decision = self.decide(&mut scratch, ai, rng)?;
        debug_assert_eq!(&scratch, board, "trial moves must be taken back");

        debug!(
            column = decision.column,
            tier = %decision.tier,
            score = decision.score,
            "engine decision"
        );
        Ok(decision)
    }

    fn decide<R: Rng + ?Sized>(
        &self,
        board: &mut Board,
        ai: Player,
        rng: &mut R,
    ) -> Result<Decision, EngineError> {
        let opponent = ai.other();
        let tiers = self.tiers;

        if tiers.immediate_win {
            if let Some(col) = winning_drop(board, ai) {
                return Ok(Decision::new(col, Tier::ImmediateWin));
            }
        }

        if tiers.immediate_block {
            if let Some(col) = winning_drop(board, opponent) {
                return Ok(Decision::new(col, Tier::ImmediateBlock));
            }
        }

        if tiers.diagonal_threats {
            if let Some(col) = diagonal_threat(board, opponent) {
                return Ok(Decision::new(col, Tier::DiagonalBlock));
            }
            if let Some(col) = diagonal_threat(board, ai) {
                return Ok(Decision::new(col, Tier::DiagonalOpportunity));
            }
        }

        if tiers.heuristic {
            if let Some((col, score)) = best_run_column(board, ai) {
                return Ok(Decision {
                    column: col,
                    tier: Tier::Heuristic,
                    score: Some(score),
                });
            }
        }

        if let Some(depth) = tiers.search_depth {
            let mut search = Minimax::new(ai, self.heuristic.as_ref());
            if let Some((col, score)) = search.best_column(board, depth) {
                debug!(depth, nodes = search.nodes(), score, "search finished");
                return Ok(Decision {
                    column: col,
                    tier: Tier::Search,
                    score: Some(score),
                });
            }
        }

        random_column(board, rng)
            .map(|col| Decision::new(col, Tier::Random))
            .ok_or(EngineError::NoLegalMove)
    }
}
