use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use glam::Vec2;
use ratatui::{backend::Backend, Terminal};

use crate::error::GameError;
use crate::game::{GameDriver, GameEvent, Outcome, PlayerId};
use crate::players::PointerEvent;

/// Simulation tick.
pub const TICK: Duration = Duration::from_micros(16_667);

pub struct App {
    driver: GameDriver,
    events: mpsc::Receiver<GameEvent>,
    /// Horizontal pointer position in world units.
    cursor_x: f32,
    holding: bool,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    pub fn new(mut driver: GameDriver) -> Self {
        let (tx, rx) = mpsc::channel();
        driver.set_event_sender(tx);
        let middle = driver.layout().num_cols() / 2;
        let cursor_x = driver.layout().column_center_x(middle);
        App {
            driver,
            events: rx,
            cursor_x,
            holding: false,
            should_quit: false,
            message: None,
        }
    }

    pub fn driver(&self) -> &GameDriver {
        &self.driver
    }

    /// World position of the pointer.
    pub fn cursor(&self) -> Vec2 {
        Vec2::new(self.cursor_x, self.driver.layout().column_spawn_point(0).y)
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        let mut last_tick = Instant::now();
        loop {
            terminal
                .draw(|f| self.render(f))
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

            if self.should_quit {
                break;
            }

            let timeout = TICK.saturating_sub(last_tick.elapsed());
            self.handle_events(timeout)?;

            if last_tick.elapsed() >= TICK {
                let dt = last_tick.elapsed().as_secs_f32().min(0.1);
                last_tick = Instant::now();
                if let Err(err) = self.tick(dt) {
                    self.message = Some(format!("Error: {err}"));
                }
            }
        }
        Ok(())
    }

    /// Advance the game and pick up its notifications.
    pub fn tick(&mut self, dt: f32) -> Result<(), GameError> {
        let result = self.driver.advance(dt);
        if !self.driver.awaiting_input() {
            self.holding = false;
        }
        self.drain_events();
        result
    }

    /// Handle keyboard events
    fn handle_events(&mut self, timeout: Duration) -> io::Result<()> {
        if event::poll(timeout)? {
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
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => self.move_cursor(-1.0),
            KeyCode::Right => self.move_cursor(1.0),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_hold(),
            KeyCode::Char('r') => {
                self.driver.new_session();
                self.holding = false;
                self.message = Some("New game started!".to_string());
                self.drain_events();
            }
            _ => {}
        }
    }

    /// Nudge the pointer by a quarter cell. Dragging a held piece quickly
    /// gives it momentum when released.
    fn move_cursor(&mut self, direction: f32) {
        let layout = self.driver.layout();
        let step = layout.pitch() * 0.25;
        let arena = layout.arena();
        self.cursor_x = (self.cursor_x + direction * step).clamp(arena.min.x, arena.max.x);
        if self.holding {
            self.driver.handle_input(PointerEvent::Move(self.cursor()));
        }
    }

    fn toggle_hold(&mut self) {
        if self.driver.is_over() {
            self.message = Some("Game over! Press 'r' to restart.".to_string());
            return;
        }
        if !self.driver.awaiting_input() {
            return;
        }
        if self.holding {
            self.driver.handle_input(PointerEvent::Release);
            self.holding = false;
        } else {
            self.driver.handle_input(PointerEvent::Press(self.cursor()));
            self.holding = true;
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            if let Some(text) = self.describe(&event) {
                self.message = Some(text);
            }
        }
    }

    fn name(&self, id: PlayerId) -> String {
        self.driver
            .player_info(id)
            .map(|info| info.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn describe(&self, event: &GameEvent) -> Option<String> {
        Some(match event {
            GameEvent::TurnStarted { .. } => return None,
            GameEvent::PiecePlaced { player, cell, .. } => {
                format!("{} placed in column {}", self.name(*player), cell.col + 1)
            }
            GameEvent::PlacementRejected { player, kind } => {
                format!("{}'s piece {}, try again", self.name(*player), kind.name())
            }
            GameEvent::PieceMissed { player, kind } => {
                format!("{}'s piece {}, turn lost", self.name(*player), kind.name())
            }
            GameEvent::GameWon { winners, .. } => {
                let names: Vec<String> = winners.iter().map(|&w| self.name(w)).collect();
                format!("{} wins!", names.join(" and "))
            }
            GameEvent::GameTied => "It's a draw!".to_string(),
        })
    }

    /// Status line text for the header.
    pub fn status(&self) -> String {
        match self.driver.outcome() {
            Some(Outcome::Win(winners)) => {
                let names: Vec<String> = winners.iter().map(|&w| self.name(w)).collect();
                format!("Game Over  |  {} won", names.join(", "))
            }
            Some(Outcome::Tie) => "Game Over  |  Draw".to_string(),
            None => format!("Current Player: {}", self.driver.current_player().name),
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(frame, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crossterm::event::KeyModifiers;

    fn app(num_agents: usize) -> App {
        let mut config = AppConfig::default();
        config.players.num_agents = num_agents;
        config.players.random_starting_player = false;
        config.players.seed = Some(11);
        App::new(GameDriver::from_config(config).unwrap())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_quit_key() {
        let mut app = app(0);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_space_grabs_and_drops() {
        let mut app = app(0);
        app.tick(1.0 / 60.0).unwrap();
        press(&mut app, KeyCode::Char(' '));
        assert!(app.is_holding());
        assert_eq!(app.driver().pool().active_count(), 1);

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.is_holding());
        app.tick(1.0 / 60.0).unwrap();
        assert_eq!(app.driver().phase(), crate::game::Phase::AwaitingSettlement);
    }

    #[test]
    fn test_cursor_stays_in_arena() {
        let mut app = app(0);
        for _ in 0..200 {
            press(&mut app, KeyCode::Left);
        }
        assert!(app.cursor().x >= app.driver().layout().arena().min.x);
    }

    #[test]
    fn test_restart_resets_board() {
        let mut app = app(2);
        for _ in 0..600 {
            app.tick(1.0 / 60.0).unwrap();
        }
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.driver().board().occupied_count(), 0);
        assert_eq!(app.message(), Some("New game started!"));
    }

    #[test]
    fn test_status_names_current_player() {
        let app = app(0);
        assert_eq!(app.status(), "Current Player: Player 1");
    }
}
