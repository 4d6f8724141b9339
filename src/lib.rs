//! # Connect Four
//!
//! A Connect Four game with a tiered decision engine as the opponent.
//! Includes a terminal UI built with Ratatui and a headless arena for
//! playing engine modes against each other.
//!
//! ## Modules
//!
//! - [`game`]: Board, players, win detection and the game session
//! - [`ai`]: Evaluator, tactics, minimax search, decision engine, suggesters
//! - [`wire`]: Snapshot text format and column request parsing
//! - [`arena`]: Engine-versus-engine matches
//! - [`ui`]: Terminal UI
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod arena;
pub mod config;
pub mod error;
pub mod game;
pub mod ui;
pub mod wire;
