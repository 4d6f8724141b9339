use crate::ai::{Choice, MoveSource, Opponent};
use crate::error::MoveError;
use crate::game::{GameSession, Outcome, Player, COLS};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::io;

pub struct App {
    session: GameSession,
    opponent: Opponent,
    ai_player: Player,
    mode_label: String,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
    last_ai_move: Option<Choice>,
}

impl App {
    pub fn new(opponent: Opponent, ai_player: Player, mode_label: impl Into<String>) -> Self {
        let mut app = App {
            session: GameSession::new(),
            opponent,
            ai_player,
            mode_label: mode_label.into(),
            selected_column: 3, // Start in middle
            should_quit: false,
            message: None,
            last_ai_move: None,
        };
        app.ai_turn();
        app
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        loop {
            terminal.draw(|f| self.render(f)).map_err(Into::<io::Error>::into)?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press
        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column + 1 < COLS {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char('r') => {
                self.session.reset();
                self.opponent.reset();
                self.selected_column = 3;
                self.last_ai_move = None;
                self.message = Some("New game started!".to_string());
                self.ai_turn();
            }
            _ => {}
        }
    }

    /// Drop the human's piece in the selected column, then let the AI reply.
    fn drop_piece(&mut self) {
        if self.session.current_player() == self.ai_player && !self.session.is_terminal() {
            self.ai_turn();
            return;
        }

        match self.session.apply_move(self.selected_column) {
            Ok(Outcome::InProgress) => self.ai_turn(),
            Ok(outcome) => self.announce(outcome),
            Err(MoveError::ColumnFull) => {
                self.message = Some("Column is full!".to_string());
            }
            Err(MoveError::InvalidColumn) => {
                self.message = Some("Invalid column!".to_string());
            }
            Err(MoveError::GameOver) => {
                self.message = Some("Game over! Press 'r' to restart.".to_string());
            }
        }
    }

    fn ai_turn(&mut self) {
        if self.session.is_terminal() || self.session.current_player() != self.ai_player {
            return;
        }
        match self.opponent.respond(&mut self.session) {
            Ok(Some(choice)) => {
                self.last_ai_move = Some(choice);
                let outcome = self.session.outcome();
                if outcome.is_terminal() {
                    self.announce(outcome);
                }
            }
            Ok(None) => {}
            Err(err) => {
                self.message = Some(format!("AI could not move: {err}"));
            }
        }
    }

    fn announce(&mut self, outcome: Outcome) {
        self.message = match outcome {
            Outcome::Won { player, .. } if player == self.ai_player => {
                Some(format!("{} (AI) wins!", player.name()))
            }
            Outcome::Won { player, .. } => Some(format!("{} wins!", player.name())),
            Outcome::Draw => Some("It's a draw!".to_string()),
            Outcome::InProgress => None,
        };
    }

    fn last_ai_label(&self) -> Option<String> {
        self.last_ai_move.map(|choice| {
            let source = match choice.source {
                MoveSource::Suggester => "suggester".to_string(),
                MoveSource::Engine(tier) => tier.to_string(),
            };
            format!("AI played column {} ({source})", choice.column + 1)
        })
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(
            frame,
            &self.session,
            self.selected_column,
            &self.message,
            &self.mode_label,
            self.last_ai_label().as_deref(),
        );
    }
}
