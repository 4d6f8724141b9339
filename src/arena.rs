//! Headless engine-versus-engine matches.

use std::fmt;

use rand::Rng;
use tracing::{debug, info};

use crate::ai::{DecisionEngine, EngineMode};
use crate::error::MoveError;
use crate::game::{GameSession, Outcome, Player};

/// Result of a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub winner: Option<Player>,
    pub game_length: usize,
}

/// Play one game, `one` moving first.
pub fn play_game<R: Rng + ?Sized>(
    one: &DecisionEngine,
    two: &DecisionEngine,
    rng: &mut R,
) -> Result<GameResult, MoveError> {
    let mut session = GameSession::new();

    while !session.is_terminal() {
        let player = session.current_player();
        let engine = match player {
            Player::One => one,
            Player::Two => two,
        };
        let Ok(decision) = engine.choose_move(session.board(), player, rng) else {
            break;
        };
        session.apply_move(decision.column)?;
    }

    let winner = match session.outcome() {
        Outcome::Won { player, .. } => Some(player),
        Outcome::InProgress | Outcome::Draw => None,
    };
    Ok(GameResult {
        winner,
        game_length: session.history().len(),
    })
}

/// Tally of a match between two modes, from the first mode's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReport {
    pub first: EngineMode,
    pub second: EngineMode,
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
    pub total_moves: usize,
}

impl MatchReport {
    pub fn games(&self) -> usize {
        self.first_wins + self.second_wins + self.draws
    }

    pub fn first_win_rate(&self) -> f32 {
        match self.games() {
            0 => 0.0,
            n => self.first_wins as f32 / n as f32,
        }
    }

    pub fn average_game_length(&self) -> f32 {
        match self.games() {
            0 => 0.0,
            n => self.total_moves as f32 / n as f32,
        }
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} vs {} over {} games", self.first, self.second, self.games())?;
        writeln!(f, "  {:<10} {} wins", self.first.name(), self.first_wins)?;
        writeln!(f, "  {:<10} {} wins", self.second.name(), self.second_wins)?;
        writeln!(f, "  draws      {}", self.draws)?;
        write!(f, "  avg length {:.1} moves", self.average_game_length())
    }
}

/// Play `games` games, alternating which mode moves first.
pub fn run_match<R: Rng + ?Sized>(
    first: EngineMode,
    second: EngineMode,
    games: usize,
    search_depth: usize,
    rng: &mut R,
) -> Result<MatchReport, MoveError> {
    let a = DecisionEngine::with_depth(first, search_depth);
    let b = DecisionEngine::with_depth(second, search_depth);
    let mut report = MatchReport {
        first,
        second,
        first_wins: 0,
        second_wins: 0,
        draws: 0,
        total_moves: 0,
    };

    for game_idx in 0..games {
        let first_moves_first = game_idx % 2 == 0;
        let result = if first_moves_first {
            play_game(&a, &b, rng)?
        } else {
            play_game(&b, &a, rng)?
        };

        let first_side = if first_moves_first { Player::One } else { Player::Two };
        match result.winner {
            Some(p) if p == first_side => report.first_wins += 1,
            Some(_) => report.second_wins += 1,
            None => report.draws += 1,
        }
        report.total_moves += result.game_length;
        debug!(game = game_idx, winner = ?result.winner, moves = result.game_length, "arena game");
    }

    info!(
        first = %first,
        second = %second,
        first_wins = report.first_wins,
        second_wins = report.second_wins,
        draws = report.draws,
        "match finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_games_finish_consistently() {
        let engine = DecisionEngine::new(EngineMode::Random);
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..20 {
            let result = play_game(&engine, &engine, &mut rng).unwrap();
            assert!((7..=42).contains(&result.game_length));
            if result.game_length < 42 {
                assert!(result.winner.is_some());
            }
            // Player one moves on odd plies
            if let Some(winner) = result.winner {
                let expected = if result.game_length % 2 == 1 {
                    Player::One
                } else {
                    Player::Two
                };
                assert_eq!(winner, expected);
            }
        }
    }

    #[test]
    fn match_counts_every_game() {
        let mut rng = StdRng::seed_from_u64(4);
        let report = run_match(EngineMode::Random, EngineMode::Tactical, 6, 4, &mut rng).unwrap();
        assert_eq!(report.games(), 6);
        assert!(report.average_game_length() >= 7.0);
    }

    #[test]
    fn minimax_beats_random() {
        let mut rng = StdRng::seed_from_u64(8);
        let report = run_match(EngineMode::Minimax, EngineMode::Random, 10, 4, &mut rng).unwrap();
        assert_eq!(report.games(), 10);
        assert!(
            report.first_wins > report.second_wins + report.draws,
            "{report}"
        );
        assert!(report.first_win_rate() > 0.5);
    }

    #[test]
    fn report_display_lists_both_modes() {
        let report = MatchReport {
            first: EngineMode::Strategic,
            second: EngineMode::Random,
            first_wins: 3,
            second_wins: 1,
            draws: 0,
            total_moves: 60,
        };
        let text = report.to_string();
        assert!(text.starts_with("strategic vs random over 4 games"));
        assert!(text.contains("avg length 15.0 moves"));
    }
}
