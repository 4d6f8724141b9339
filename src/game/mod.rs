//! Core Connect Four game logic: board representation, player types,
//! four-in-a-row detection and the game session state machine.

mod board;
mod player;
mod session;
pub mod win;

pub use board::{Board, Cell, Placement, COLS, ROWS};
pub use player::Player;
pub use session::{GameSession, Outcome};
pub use win::{completes_line, Coord, Orientation, WinLine};
