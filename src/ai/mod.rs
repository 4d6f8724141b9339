//! Move selection: the tiered decision engine, its building blocks, and the
//! opponent that puts an optional suggester in front of it.

mod engine;
pub mod evaluator;
mod opponent;
pub mod random;
pub mod search;
pub mod suggest;
pub mod tactics;

pub use engine::{Decision, DecisionEngine, EngineMode, Tier, Tiers, DEFAULT_SEARCH_DEPTH};
pub use evaluator::{Heuristic, WindowEvaluator, WIN_SCORE};
pub use opponent::{Choice, MoveSource, Opponent};
pub use suggest::{parse_suggestion, CommandSuggester, MoveSuggester, SuggestionRequest};
