use crate::game::{CellPos, GameDriver, Token};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn token_color(token: Token) -> Color {
    match token {
        Token::Red => Color::Red,
        Token::Yellow => Color::Yellow,
        Token::Green => Color::Green,
        Token::Blue => Color::Blue,
    }
}

/// Render the committed grid as text (no physics) into the given area.
pub fn render_board_compact(frame: &mut Frame, driver: &GameDriver, area: Rect) {
    let board = driver.board();
    let winning = board.winning_positions();
    let mut lines = Vec::new();

    for row in 0..board.num_rows() {
        let mut spans = Vec::new();
        for col in 0..board.num_cols() {
            let cell = CellPos::new(col, row);
            let span = match board.get(cell) {
                None => Span::styled(" . ", Style::default().fg(Color::DarkGray)),
                Some(occupant) => {
                    let color = driver
                        .player_info(occupant.owner)
                        .map(|info| token_color(info.token))
                        .unwrap_or(Color::Gray);
                    let mut style = Style::default().fg(color);
                    if winning.contains(&cell) {
                        style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
                    }
                    Span::styled(" \u{25cf} ", style)
                }
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    let widget = Paragraph::new(lines);
    frame.render_widget(widget, area);
}
