use std::path::PathBuf;

/// Errors raised by raw board manipulation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("column {0} is out of range (expected 0-6)")]
    InvalidColumn(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("column {0} has no pieces to undo")]
    ColumnEmpty(usize),

    #[error("unknown cell code {code} at row {row}, column {col}")]
    UnknownCell { row: usize, col: usize, code: u8 },

    #[error("piece at row {row}, column {col} is floating above an empty cell")]
    FloatingPiece { row: usize, col: usize },
}

/// Errors reported at the game-session boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("invalid column")]
    InvalidColumn,

    #[error("column is full")]
    ColumnFull,

    #[error("game is over")]
    GameOver,
}

/// Errors raised by the decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("no legal move: the board is full")]
    NoLegalMove,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown engine mode {0:?} (expected random, tactical, strategic or minimax)")]
pub struct ModeParseError(pub String);

/// Errors raised while consulting a move-suggestion collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SuggestError {
    #[error("suggester is unavailable")]
    Unavailable,

    #[error("suggester call failed: {0}")]
    Transport(String),

    #[error("could not parse a column from response: {0:?}")]
    Parse(String),

    #[error("suggested column {0} is out of range (expected 0-6)")]
    OutOfRange(i64),

    #[error("suggested column {0} is not playable")]
    IllegalColumn(usize),
}

/// Errors raised while decoding wire text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("expected {expected} sections separated by '|', found {found}")]
    Sections { expected: usize, found: usize },

    #[error("expected {expected} cells, found {found}")]
    CellCount { expected: usize, found: usize },

    #[error("invalid number {0:?}")]
    Number(String),

    #[error("invalid status section {0:?}")]
    Status(String),

    #[error("invalid winning line {0:?}")]
    Line(String),

    #[error("invalid column request {0:?}")]
    Column(String),

    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
