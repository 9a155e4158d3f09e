use super::{Board, PlayerId};
use crate::config::BoardConfig;

/// How a finished game ended.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// One or more players completed a run in the same placement.
    Win(Vec<PlayerId>),
    Tie,
}

/// Placement counters for the current game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SessionStats {
    pub accepted: usize,
    pub rejected: usize,
    pub missed: usize,
    pub cancelled: usize,
}

/// Per-match state. Replaced wholesale by `GameDriver::new_session`.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    num_players: usize,
    current: usize,
    starting: usize,
    games_played: usize,
    outcome: Option<Outcome>,
    stats: SessionStats,
}

impl GameSession {
    pub fn new(config: &BoardConfig, num_players: usize, starting: usize, games_played: usize) -> Self {
        GameSession {
            board: Board::new(config.num_cols, config.num_rows, config.num_connect),
            num_players,
            current: starting % num_players.max(1),
            starting: starting % num_players.max(1),
            games_played,
            outcome: None,
            stats: SessionStats::default(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_player(&self) -> PlayerId {
        PlayerId::new(self.current)
    }

    pub fn starting_player(&self) -> PlayerId {
        PlayerId::new(self.starting)
    }

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    /// Games finished before this one.
    pub fn games_played(&self) -> usize {
        self.games_played
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut SessionStats {
        &mut self.stats
    }

    /// Hand the turn to the next seat.
    pub(crate) fn advance_turn(&mut self) -> PlayerId {
        self.current = (self.current + 1) % self.num_players;
        self.current_player()
    }

    pub(crate) fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }
}
