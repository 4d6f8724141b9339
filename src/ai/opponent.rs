use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::error::{EngineError, MoveError};
use crate::game::{Board, GameSession, Player};

use super::engine::{DecisionEngine, Tier};
use super::suggest::{suggested_column, MoveSuggester, SuggestionRequest};

/// Where a move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    Suggester,
    Engine(Tier),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub column: usize,
    pub source: MoveSource,
}

/// The artificial player: an optional suggester in front of the engine.
///
/// A suggester that fails once is skipped until [`Opponent::reset`].
pub struct Opponent {
    engine: DecisionEngine,
    suggester: Option<Box<dyn MoveSuggester>>,
    suggester_live: bool,
    rng: StdRng,
}

impl Opponent {
    pub fn new(engine: DecisionEngine, rng: StdRng) -> Self {
        Opponent {
            engine,
            suggester: None,
            suggester_live: false,
            rng,
        }
    }

    pub fn with_suggester(mut self, suggester: Box<dyn MoveSuggester>) -> Self {
        self.suggester = Some(suggester);
        self.suggester_live = true;
        self
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn suggester_active(&self) -> bool {
        self.suggester_live && self.suggester.is_some()
    }

    pub fn choose(&mut self, board: &Board, player: Player) -> Result<Choice, EngineError> {
        if board.is_full() {
            return Err(EngineError::NoLegalMove);
        }

        if let Some(column) = self.ask_suggester(board, player) {
            return Ok(Choice {
                column,
                source: MoveSource::Suggester,
            });
        }

        let decision = self.engine.choose_move(board, player, &mut self.rng)?;
        Ok(Choice {
            column: decision.column,
            source: MoveSource::Engine(decision.tier),
        })
    }

    fn ask_suggester(&mut self, board: &Board, player: Player) -> Option<usize> {
        if !self.suggester_live {
            return None;
        }
        let suggester = self.suggester.as_mut()?;

        let request = SuggestionRequest::new(board, player);
        let result = suggester
            .suggest(&request)
            .and_then(|raw| suggested_column(&raw, board));
        match result {
            Ok(col) => Some(col),
            Err(err) => {
                warn!(suggester = suggester.name(), error = %err, "suggester failed, using engine");
                self.suggester_live = false;
                None
            }
        }
    }

    /// Play the side to move's reply on `session`. `Ok(None)` when there is
    /// nothing left to play.
    pub fn respond(&mut self, session: &mut GameSession) -> Result<Option<Choice>, MoveError> {
        if session.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let player = session.current_player();
        let choice = match self.choose(session.board(), player) {
            Ok(choice) => choice,
            Err(EngineError::NoLegalMove) => return Ok(None),
        };
        session.apply_move(choice.column)?;
        info!(player = player.code(), column = choice.column, source = ?choice.source, "opponent moved");
        Ok(Some(choice))
    }

    /// Ready for a new game; a disabled suggester is tried again.
    pub fn reset(&mut self) {
        self.suggester_live = self.suggester.is_some();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::EngineMode;
    use crate::error::SuggestError;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Replies with a fixed text and counts calls.
    struct Fixed {
        reply: Result<String, SuggestError>,
        calls: Arc<AtomicUsize>,
    }

    impl Fixed {
        fn new(reply: Result<&str, SuggestError>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let fixed = Fixed {
                reply: reply.map(str::to_owned),
                calls: Arc::clone(&calls),
            };
            (fixed, calls)
        }
    }

    impl MoveSuggester for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn suggest(&mut self, _request: &SuggestionRequest) -> Result<String, SuggestError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn opponent(mode: EngineMode) -> Opponent {
        Opponent::new(DecisionEngine::new(mode), StdRng::seed_from_u64(9))
    }

    #[test]
    fn engine_decides_without_suggester() {
        let mut opp = opponent(EngineMode::Tactical);
        assert!(!opp.suggester_active());
        let choice = opp.choose(&Board::new(), Player::Two).unwrap();
        assert_eq!(choice.column, 3);
        assert_eq!(choice.source, MoveSource::Engine(Tier::Heuristic));
    }

    #[test]
    fn suggester_is_consulted_first() {
        let (fixed, calls) = Fixed::new(Ok("5"));
        let mut opp = opponent(EngineMode::Minimax).with_suggester(Box::new(fixed));

        let choice = opp.choose(&Board::new(), Player::Two).unwrap();
        assert_eq!(
            choice,
            Choice {
                column: 5,
                source: MoveSource::Suggester
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(opp.suggester_active());
    }

    #[test]
    fn failures_fall_back_and_disable_until_reset() {
        let failures = [
            Err(SuggestError::Transport("timeout".into())),
            Ok("nine"),
            Ok("8"),
        ];
        for reply in failures {
            let (fixed, calls) = Fixed::new(reply);
            let mut opp = opponent(EngineMode::Tactical).with_suggester(Box::new(fixed));

            let choice = opp.choose(&Board::new(), Player::Two).unwrap();
            assert_eq!(choice.source, MoveSource::Engine(Tier::Heuristic));
            assert!(!opp.suggester_active());

            opp.choose(&Board::new(), Player::Two).unwrap();
            assert_eq!(calls.load(Ordering::SeqCst), 1);

            opp.reset();
            assert!(opp.suggester_active());
            opp.choose(&Board::new(), Player::Two).unwrap();
            assert_eq!(calls.load(Ordering::SeqCst), 2);
        }
    }

    #[test]
    fn missing_suggester_program_falls_back() {
        let missing = crate::ai::CommandSuggester::new("definitely-not-a-real-program", Vec::new());
        let mut opp = opponent(EngineMode::Tactical).with_suggester(Box::new(missing));

        let choice = opp.choose(&Board::new(), Player::Two).unwrap();
        assert_eq!(choice.source, MoveSource::Engine(Tier::Heuristic));
        assert!(!opp.suggester_active());
    }

    #[test]
    fn illegal_suggestion_falls_back() {
        let (fixed, _) = Fixed::new(Ok("0"));
        let mut opp = opponent(EngineMode::Tactical).with_suggester(Box::new(fixed));
        let mut board = Board::new();
        for player in [Player::One, Player::Two].repeat(3) {
            board.drop_piece(0, player).unwrap();
        }

        let choice = opp.choose(&board, Player::Two).unwrap();
        assert_ne!(choice.column, 0);
        assert!(matches!(choice.source, MoveSource::Engine(_)));
    }

    #[test]
    fn respond_applies_move_for_side_to_move() {
        let mut session = GameSession::new();
        session.apply_move(0).unwrap();
        let mut opp = opponent(EngineMode::Tactical);

        let choice = opp.respond(&mut session).unwrap().unwrap();
        assert_eq!(session.history(), &[0, choice.column]);
        assert_eq!(session.current_player(), Player::One);
    }

    #[test]
    fn respond_rejects_finished_game() {
        let mut session = GameSession::new();
        for _ in 0..3 {
            session.apply_move(0).unwrap();
            session.apply_move(1).unwrap();
        }
        session.apply_move(0).unwrap();

        let mut opp = opponent(EngineMode::Random);
        assert_eq!(opp.respond(&mut session), Err(MoveError::GameOver));
    }

    #[test]
    fn full_board_skips_suggester() {
        let (fixed, calls) = Fixed::new(Ok("3"));
        let mut opp = opponent(EngineMode::Minimax).with_suggester(Box::new(fixed));
        let mut board = Board::new();
        for col in 0..crate::game::COLS {
            for _ in 0..crate::game::ROWS {
                board.drop_piece(col, Player::One).unwrap();
            }
        }
        assert_eq!(opp.choose(&board, Player::Two), Err(EngineError::NoLegalMove));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
