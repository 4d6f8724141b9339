use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::SuggestError;
use crate::game::{Board, Player, COLS};
use crate::wire::encode_cells;

/// What a suggester is asked about one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    /// Cells in the wire cell format
    pub board_state: String,
    pub prompt: String,
    pub player: Player,
}

impl SuggestionRequest {
    pub fn new(board: &Board, player: Player) -> Self {
        let board_state = encode_cells(board);
        let prompt = format!(
            "You are playing Connect 4. The current board state is: {board_state}\n\
             Analyze the board and return only the column number (0-6) where you would place your piece.\n\
             Consider winning moves, blocking opponent's winning moves, and creating opportunities.\n\
             Return only the number, nothing else."
        );
        SuggestionRequest {
            board_state,
            prompt,
            player,
        }
    }
}

/// An outside source of move suggestions, consulted before the engine.
///
/// Implementations return the raw response text; [`parse_suggestion`] turns
/// it into a column.
pub trait MoveSuggester: Send {
    fn name(&self) -> &str;

    fn suggest(&mut self, request: &SuggestionRequest) -> Result<String, SuggestError>;
}

/// Extract a column from a response: either bare text such as `"3"` or a
/// chat-completion document whose `choices[0].message.content` holds it.
pub fn parse_suggestion(raw: &str) -> Result<usize, SuggestError> {
    let raw = raw.trim();
    let content = if raw.starts_with('{') {
        let doc: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| SuggestError::Parse(e.to_string()))?;
        doc.pointer("/choices/0/message/content")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| SuggestError::Parse(raw.to_string()))?
    } else {
        raw.to_string()
    };

    let content = content.trim();
    let value: i64 = content
        .parse()
        .map_err(|_| SuggestError::Parse(content.to_string()))?;
    if !(0..COLS as i64).contains(&value) {
        return Err(SuggestError::OutOfRange(value));
    }
    Ok(value as usize)
}

/// Parse a response and check the column can be played on `board`.
pub fn suggested_column(raw: &str, board: &Board) -> Result<usize, SuggestError> {
    let col = parse_suggestion(raw)?;
    if !board.is_legal(col) {
        return Err(SuggestError::IllegalColumn(col));
    }
    Ok(col)
}

pub const DEFAULT_SUGGEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs an external program per request: the prompt goes to its stdin and
/// its stdout is the response.
///
/// A program still running after the timeout is killed and the request
/// fails, so the engine gets to move.
#[derive(Debug, Clone)]
pub struct CommandSuggester {
    program: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
    timeout: Duration,
}

impl CommandSuggester {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        CommandSuggester {
            program: program.into(),
            args,
            env: Vec::new(),
            timeout: DEFAULT_SUGGEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set an environment variable for the child, e.g. the API key.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

impl MoveSuggester for CommandSuggester {
    fn name(&self) -> &str {
        &self.program
    }

    fn suggest(&mut self, request: &SuggestionRequest) -> Result<String, SuggestError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => SuggestError::Unavailable,
                _ => SuggestError::Transport(format!("failed to start {}: {e}", self.program)),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(request.prompt.as_bytes()) {
                let _ = child.kill();
                let _ = child.wait();
                return Err(SuggestError::Transport(format!("failed to send prompt: {e}")));
            }
        }

        // Read stdout on a worker so the wait can give up
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| SuggestError::Transport("child stdout not captured".into()))?;
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = tx.send(stdout.read_to_end(&mut buf).map(|_| buf));
        });

        let read = match rx.recv_timeout(self.timeout) {
            Ok(read) => read,
            Err(_) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(SuggestError::Transport(format!(
                    "{} timed out after {:?}",
                    self.program, self.timeout
                )));
            }
        };
        let stdout = read.map_err(|e| SuggestError::Transport(e.to_string()))?;

        let status = child
            .wait()
            .map_err(|e| SuggestError::Transport(e.to_string()))?;
        if !status.success() {
            return Err(SuggestError::Transport(format!(
                "{} exited with {status}",
                self.program
            )));
        }
        String::from_utf8(stdout).map_err(|e| SuggestError::Transport(e.to_string()))
    }
}
