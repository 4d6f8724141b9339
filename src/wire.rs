//! Text encoding shared with the transport layer.
//!
//! A snapshot is every cell in row-major order, each followed by `,`, then
//! `|`, then `<over>,<winner>|`, then either the winning line as four
//! `row,col,` pairs, the literal `draw`, or nothing while the game is in
//! progress. Cell codes are 0 empty, 1 player one, 2 player two.

use std::fmt::Write as _;

use crate::error::WireError;
use crate::game::{Board, Coord, GameSession, Outcome, Player, COLS, ROWS};

const DRAW_MARKER: &str = "draw";

/// Decoded view of a session, as a client sees it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub cells: [[u8; COLS]; ROWS],
    pub game_over: bool,
    /// 0 while in progress or drawn, else the winner's code
    pub winner: u8,
    pub winning_line: Option<[Coord; 4]>,
}

impl Snapshot {
    pub fn from_session(session: &GameSession) -> Self {
        let (game_over, winner, winning_line) = match session.outcome() {
            Outcome::InProgress => (false, 0, None),
            Outcome::Won { player, line } => (true, player.code(), Some(line.cells)),
            Outcome::Draw => (true, 0, None),
        };
        Snapshot {
            cells: session.board().codes(),
            game_over,
            winner,
            winning_line,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.game_over && self.winner == 0
    }

    pub fn winner(&self) -> Option<Player> {
        Player::from_code(self.winner)
    }

    pub fn board(&self) -> Result<Board, WireError> {
        Ok(Board::from_codes(&self.cells)?)
    }

    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(ROWS * COLS * 2 + 24);
        push_cells(&mut out, &self.cells);
        out.push('|');
        let _ = write!(out, "{},{}|", u8::from(self.game_over), self.winner);

        if let Some(line) = &self.winning_line {
            for (row, col) in line {
                let _ = write!(out, "{row},{col},");
            }
        } else if self.is_draw() {
            out.push_str(DRAW_MARKER);
        }
        out
    }

    pub fn decode(text: &str) -> Result<Self, WireError> {
        let sections: Vec<&str> = text.trim().split('|').collect();
        if sections.len() != 3 {
            return Err(WireError::Sections {
                expected: 3,
                found: sections.len(),
            });
        }

        let codes = parse_numbers(sections[0])?;
        if codes.len() != ROWS * COLS {
            return Err(WireError::CellCount {
                expected: ROWS * COLS,
                found: codes.len(),
            });
        }
        let mut cells = [[0u8; COLS]; ROWS];
        for (i, &code) in codes.iter().enumerate() {
            cells[i / COLS][i % COLS] =
                u8::try_from(code).map_err(|_| WireError::Number(code.to_string()))?;
        }
        Board::from_codes(&cells)?;

        let status = parse_numbers(sections[1])?;
        let (game_over, winner) = match status.as_slice() {
            [0, 0] => (false, 0),
            [1, w @ 0..=2] => (true, *w as u8),
            _ => return Err(WireError::Status(sections[1].to_string())),
        };

        let tail = sections[2];
        let winning_line = match (game_over, winner) {
            (false, _) if tail.is_empty() => None,
            (true, 0) if tail == DRAW_MARKER => None,
            (true, 1..=2) => Some(parse_line(tail)?),
            _ => return Err(WireError::Status(format!("{}|{}", sections[1], tail))),
        };

        Ok(Snapshot {
            cells,
            game_over,
            winner,
            winning_line,
        })
    }
}

/// Board cells in the snapshot cell format, e.g. for a suggestion prompt.
pub fn encode_cells(board: &Board) -> String {
    let mut out = String::with_capacity(ROWS * COLS * 2);
    push_cells(&mut out, &board.codes());
    out
}

fn push_cells(out: &mut String, cells: &[[u8; COLS]; ROWS]) {
    for row in cells {
        for code in row {
            let _ = write!(out, "{code},");
        }
    }
}

fn parse_numbers(section: &str) -> Result<Vec<usize>, WireError> {
    section
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse().map_err(|_| WireError::Number(part.to_string())))
        .collect()
}

fn parse_line(tail: &str) -> Result<[Coord; 4], WireError> {
    let numbers = parse_numbers(tail)?;
    if numbers.len() != 8 {
        return Err(WireError::Line(tail.to_string()));
    }
    let mut line = [(0, 0); 4];
    for (slot, pair) in line.iter_mut().zip(numbers.chunks(2)) {
        let (row, col) = (pair[0], pair[1]);
        if row >= ROWS || col >= COLS {
            return Err(WireError::Line(tail.to_string()));
        }
        *slot = (row, col);
    }
    Ok(line)
}

/// Parse a column request: a bare integer or a `column=<n>` form body.
pub fn parse_column(text: &str) -> Result<usize, WireError> {
    let text = text.trim();
    let value = match text.split_once('=') {
        Some((key, value)) if key.trim() == "column" => value.trim(),
        Some(_) => return Err(WireError::Column(text.to_string())),
        None => text,
    };
    match value.parse::<usize>() {
        Ok(col) if col < COLS => Ok(col),
        _ => Err(WireError::Column(text.to_string())),
    }
}
