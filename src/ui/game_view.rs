use glam::Vec2;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Context, Line as CanvasLine},
        Block, Borders, Paragraph,
    },
    Frame,
};

use super::app::App;
use super::board_widget::{render_board_compact, token_color};
use crate::game::{GameDriver, Phase};
use crate::physics::Segment;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(15),   // Board
            Constraint::Length(3), // Message
            Constraint::Length(4), // Controls
        ])
        .split(frame.area());

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(28)])
        .split(chunks[1]);

    render_header(frame, app, chunks[0]);
    render_arena(frame, app, middle[0]);
    render_side_panel(frame, app.driver(), middle[1]);
    render_message(frame, app.message(), chunks[2]);
    render_controls(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let driver = app.driver();
    let color = if driver.is_over() {
        Color::White
    } else {
        token_color(driver.current_player().token)
    };

    let header = Paragraph::new(app.status())
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Drop Four"));

    frame.render_widget(header, area);
}

/// World y grows downward; the canvas y axis grows upward.
fn flip(p: Vec2) -> (f64, f64) {
    (p.x as f64, -p.y as f64)
}

fn draw_segment(ctx: &mut Context<'_>, segment: &Segment, color: Color) {
    let (x1, y1) = flip(segment.a);
    let (x2, y2) = flip(segment.b);
    ctx.draw(&CanvasLine {
        x1,
        y1,
        x2,
        y2,
        color,
    });
}

fn render_arena(frame: &mut Frame, app: &App, area: Rect) {
    let driver = app.driver();
    let layout = driver.layout();
    let arena = layout.arena();
    let pool = driver.pool();
    let winning = driver.board().winning_positions();
    let cursor = app.cursor();
    let show_cursor = driver.awaiting_input() && !app.is_holding();

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL))
        .marker(Marker::Braille)
        .x_bounds([arena.min.x as f64, arena.max.x as f64])
        .y_bounds([-arena.max.y as f64, -arena.min.y as f64])
        .paint(move |ctx| {
            for segment in layout.arena_segments().iter() {
                draw_segment(ctx, segment, Color::DarkGray);
            }
            for segment in layout.channel_segments().iter() {
                draw_segment(ctx, segment, Color::Blue);
            }
            for peg in layout.bouncers() {
                let (x, y) = flip(peg);
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: layout.bouncer_radius() as f64,
                    color: Color::Magenta,
                });
            }
            ctx.layer();

            for piece in pool.committed().chain(pool.active()) {
                let color = piece
                    .owner()
                    .and_then(|owner| driver.player_info(owner))
                    .map(|info| token_color(info.token))
                    .unwrap_or(Color::Gray);
                let (x, y) = flip(piece.position());
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: piece.body().radius as f64,
                    color,
                });
            }

            for cell in &winning {
                let (x, y) = flip(layout.cell_center(*cell));
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: layout.cell_size() as f64 * 0.2,
                    color: Color::White,
                });
            }

            if show_cursor {
                let (x, y) = flip(cursor);
                ctx.print(x, y, Span::styled("▼", Style::default().fg(Color::Cyan)));
            }
        });

    frame.render_widget(canvas, area);
}

fn render_side_panel(frame: &mut Frame, driver: &GameDriver, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Board");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = driver.board().num_rows() as u16;
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(rows), Constraint::Min(0)])
        .split(inner);

    render_board_compact(frame, driver, parts[0]);

    let session = driver.session();
    let stats = session.stats();
    let phase = match driver.phase() {
        Phase::AwaitingPlacement => "waiting for move".to_string(),
        Phase::AwaitingSettlement => match driver.settle_time_remaining() {
            Some(left) => format!("settling ({left:.0}s)"),
            None => "settling".to_string(),
        },
        Phase::Evaluating => "evaluating".to_string(),
        Phase::GameOver => "game over".to_string(),
    };
    let mut lines = vec![
        Line::from(""),
        Line::from(format!("Phase:    {phase}")),
        Line::from(format!("Games:    {}", session.games_played())),
        Line::from(format!("Accepted: {}", stats.accepted)),
        Line::from(format!("Rejected: {}", stats.rejected)),
        Line::from(format!("Missed:   {}", stats.missed)),
        Line::from(""),
    ];
    for info in driver.players() {
        lines.push(Line::from(Span::styled(
            format!("● {}", info.name),
            Style::default().fg(token_color(info.token)),
        )));
    }

    frame.render_widget(Paragraph::new(lines), parts[1]);
}

fn render_message(frame: &mut Frame, message: Option<&str>, area: Rect) {
    let text = message.unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let line1 = Line::from("←/→: Move  |  Space/Enter: Grab / Drop  |  R: Restart  |  Q: Quit");
    let line2 = Line::from("Move quickly while holding a piece to throw it");

    let controls = Paragraph::new(vec![line1, line2])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}
