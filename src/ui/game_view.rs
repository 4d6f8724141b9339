use crate::game::{Board, Cell, GameSession, Outcome, Player, WinLine, COLS, ROWS};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(
    frame: &mut Frame,
    session: &GameSession,
    selected_column: usize,
    message: &Option<String>,
    mode_label: &str,
    last_ai_move: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(15),   // Board
            Constraint::Length(4), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    let winning_line = match session.outcome() {
        Outcome::Won { line, .. } => Some(line),
        _ => None,
    };

    render_header(frame, session, mode_label, chunks[0]);
    render_board(frame, session.board(), selected_column, winning_line, chunks[1]);
    render_message(frame, message, last_ai_move, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn player_color(player: Player) -> Color {
    match player {
        Player::One => Color::Red,
        Player::Two => Color::Yellow,
    }
}

fn render_header(
    frame: &mut Frame,
    session: &GameSession,
    mode_label: &str,
    area: ratatui::layout::Rect,
) {
    let current_player = session.current_player();

    let status = match session.outcome() {
        Outcome::InProgress => {
            format!("Current Player: {}  |  {}", current_player.name(), mode_label)
        }
        Outcome::Won { player, .. } => format!("{} wins  |  {}", player.name(), mode_label),
        Outcome::Draw => format!("Draw  |  {}", mode_label),
    };

    let header = Paragraph::new(status)
        .style(
            Style::default()
                .fg(player_color(current_player))
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Connect Four"),
        );

    frame.render_widget(header, area);
}

fn render_board(
    frame: &mut Frame,
    board: &Board,
    selected_column: usize,
    winning_line: Option<WinLine>,
    area: ratatui::layout::Rect,
) {
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")]; // Padding (3 chars to match "  ║")
    for col in 0..COLS {
        if col == selected_column {
            col_line.push(Span::styled(
                format!(" {} ", col + 1),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(format!(" {} ", col + 1)));
        }
    }
    col_line.push(Span::raw("  ")); // Suffix padding to match " ║"
    lines.push(Line::from(col_line));

    lines.push(Line::from("  ╔══════════════════════╗"));

    for row in 0..ROWS {
        let mut row_spans = vec![Span::raw("  ║")];

        for col in 0..COLS {
            let on_line = winning_line.is_some_and(|line| line.contains(row, col));
            let (symbol, mut style) = match board.get(row, col) {
                Cell::Empty => (" . ", Style::default().fg(Color::DarkGray)),
                Cell::One => (" ● ", Style::default().fg(player_color(Player::One))),
                Cell::Two => (" ● ", Style::default().fg(player_color(Player::Two))),
            };
            if on_line {
                style = style.bg(Color::Green).add_modifier(Modifier::BOLD);
            }
            row_spans.push(Span::styled(symbol, style));
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from("  ╚══════════════════════╝"));

    // Selection indicator
    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..COLS {
        if col == selected_column {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(
    frame: &mut Frame,
    message: &Option<String>,
    last_ai_move: Option<&str>,
    area: ratatui::layout::Rect,
) {
    let lines = vec![
        Line::from(Span::styled(
            message.as_deref().unwrap_or(""),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            last_ai_move.unwrap_or(""),
            Style::default().fg(Color::Gray),
        )),
    ];
    let msg_widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: ratatui::layout::Rect) {
    let controls = Paragraph::new("←/→: Move  |  Enter: Drop  |  R: Restart  |  Q: Quit")
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Controls"),
        );

    frame.render_widget(controls, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(session: &GameSession, last_ai_move: Option<&str>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal
            .draw(|f| render(f, session, 3, &None, "minimax", last_ai_move))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn header_shows_side_to_move_and_mode() {
        let text = draw(&GameSession::new(), None);
        assert!(text.contains("Current Player: Player One  |  minimax"));
    }

    #[test]
    fn finished_game_shows_winner_and_ai_move() {
        let mut session = GameSession::new();
        for col in [0, 0, 1, 1, 2, 2, 3] {
            session.apply_move(col).unwrap();
        }
        let text = draw(&session, Some("AI played column 3 (run heuristic)"));
        assert!(text.contains("Player One wins  |  minimax"));
        assert!(text.contains("AI played column 3 (run heuristic)"));
    }
}
