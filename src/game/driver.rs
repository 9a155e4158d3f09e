use std::sync::mpsc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    Board, CellPos, GameEvent, GameSession, Occupant, Outcome, PlacementKind, PlacementResult,
    PlayerId, PlayerInfo, SettlementDetector,
};
use crate::config::AppConfig;
use crate::error::{ConfigError, GameError};
use crate::physics::{BoardLayout, World};
use crate::pieces::{PieceId, PiecePool};
use crate::players::{build_roster, PlacementContext, Player, PointerEvent};

/// Where the driver is in the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingPlacement,
    AwaitingSettlement,
    Evaluating,
    GameOver,
}

#[derive(Debug)]
enum TurnState {
    AwaitingPlacement,
    AwaitingSettlement(SettlementDetector),
    Evaluating(PlacementResult),
    GameOver,
}

/// Runs matches: owns the session, the pieces and the physics, and moves the
/// turn state machine forward one tick at a time.
pub struct GameDriver {
    config: AppConfig,
    layout: BoardLayout,
    world: World,
    pool: PiecePool,
    players: Vec<Box<dyn Player>>,
    session: GameSession,
    state: TurnState,
    turn_announced: bool,
    rng: StdRng,
    events: Option<mpsc::Sender<GameEvent>>,
    clock: f32,
    last_result: Option<PlacementResult>,
}

impl GameDriver {
    /// Build a driver with an explicit roster, one player per seat.
    pub fn new(config: AppConfig, players: Vec<Box<dyn Player>>) -> Result<Self, GameError> {
        config.validate()?;
        if players.len() != config.players.num_players {
            return Err(ConfigError::Validation(format!(
                "expected {} players, got {}",
                config.players.num_players,
                players.len()
            ))
            .into());
        }
        if let Some((seat, _)) = players
            .iter()
            .enumerate()
            .find(|(seat, p)| p.info().id != PlayerId::new(*seat))
        {
            return Err(ConfigError::Validation(format!("player in seat {seat} has a mismatched id")).into());
        }

        let layout = BoardLayout::from_config(&config.board, &config.physics);
        let world = World::new(&layout, config.physics.clone());
        let pool = PiecePool::new(config.placement.pool_prewarm, config.piece_radius());
        let mut rng = match config.players.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let start = pick_starting_player(&config, &mut rng, 0);
        let session = GameSession::new(&config.board, config.players.num_players, start, 0);

        tracing::info!(
            cols = config.board.num_cols,
            rows = config.board.num_rows,
            connect = config.board.num_connect,
            players = config.players.num_players,
            accept = %config.settle.accept,
            "game driver ready"
        );

        Ok(GameDriver {
            config,
            layout,
            world,
            pool,
            players,
            session,
            state: TurnState::AwaitingPlacement,
            turn_announced: false,
            rng,
            events: None,
            clock: 0.0,
            last_result: None,
        })
    }

    /// Build a driver with the roster described by the configuration.
    pub fn from_config(config: AppConfig) -> Result<Self, GameError> {
        config.validate()?;
        let players = build_roster(&config.players);
        Self::new(config, players)
    }

    /// Send game events to `tx`. Send failures are ignored.
    pub fn set_event_sender(&mut self, tx: mpsc::Sender<GameEvent>) {
        self.events = Some(tx);
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn pool(&self) -> &PiecePool {
        &self.pool
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn board(&self) -> &Board {
        self.session.board()
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerInfo> {
        self.players.iter().map(|p| p.info())
    }

    pub fn player_info(&self, id: PlayerId) -> Option<&PlayerInfo> {
        self.players.get(id.index()).map(|p| p.info())
    }

    pub fn current_player(&self) -> &PlayerInfo {
        self.players[self.session.current_index()].info()
    }

    /// Whether the player to move waits on pointer input.
    pub fn awaiting_input(&self) -> bool {
        self.phase() == Phase::AwaitingPlacement
            && self.players[self.session.current_index()].is_interactive()
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            TurnState::AwaitingPlacement => Phase::AwaitingPlacement,
            TurnState::AwaitingSettlement(_) => Phase::AwaitingSettlement,
            TurnState::Evaluating(_) => Phase::Evaluating,
            TurnState::GameOver => Phase::GameOver,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, TurnState::GameOver)
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.session.outcome()
    }

    /// Seconds of simulated time since the driver was created.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn last_result(&self) -> Option<PlacementResult> {
        self.last_result
    }

    /// Seconds before the falling piece is despawned, while one is settling.
    pub fn settle_time_remaining(&self) -> Option<f32> {
        match &self.state {
            TurnState::AwaitingSettlement(detector) => Some(detector.despawn_remaining()),
            _ => None,
        }
    }

    /// Run one tick: step the physics, then move the turn forward. Ticks
    /// that are not a positive, finite duration do nothing.
    pub fn advance(&mut self, dt: f32) -> Result<(), GameError> {
        if self.is_over() || !dt.is_finite() || dt <= 0.0 {
            return Ok(());
        }
        self.clock += dt;
        self.step_physics(dt);

        match std::mem::replace(&mut self.state, TurnState::AwaitingPlacement) {
            TurnState::AwaitingPlacement => self.poll_current_player(),
            TurnState::AwaitingSettlement(mut detector) => {
                match detector.advance(dt, &mut self.pool, &self.layout, self.session.board()) {
                    Some(result) => {
                        self.state = TurnState::Evaluating(result);
                        self.evaluate(result)?;
                    }
                    None => self.state = TurnState::AwaitingSettlement(detector),
                }
            }
            TurnState::Evaluating(result) => self.evaluate(result)?,
            TurnState::GameOver => self.state = TurnState::GameOver,
        }
        Ok(())
    }

    /// Route pointer input to the player whose turn it is. Ignored unless the
    /// driver is waiting for a placement.
    pub fn handle_input(&mut self, event: PointerEvent) {
        if !matches!(self.state, TurnState::AwaitingPlacement) {
            return;
        }
        let player = &mut self.players[self.session.current_index()];
        let mut ctx = PlacementContext {
            pool: &mut self.pool,
            board: self.session.board(),
            layout: &self.layout,
            config: &self.config.placement,
            clock: self.clock,
        };
        player.handle_input(event, &mut ctx);
    }

    /// Return a piece to the pool, cancelling its settlement if it is falling.
    pub fn recycle_piece(&mut self, id: PieceId) -> bool {
        self.pool.recycle(id)
    }

    /// Tear down the current match and start the next one.
    pub fn new_session(&mut self) {
        for player in &mut self.players {
            player.reset(&mut self.pool);
        }
        self.pool.recycle_all();

        let games_played = self.session.games_played() + usize::from(self.session.is_over());
        let start = pick_starting_player(&self.config, &mut self.rng, games_played);
        self.session = GameSession::new(
            &self.config.board,
            self.config.players.num_players,
            start,
            games_played,
        );
        self.state = TurnState::AwaitingPlacement;
        self.last_result = None;
        self.turn_announced = false;

        tracing::info!(games_played, start, "new session");
        self.announce_turn();
    }

    fn step_physics(&mut self, dt: f32) {
        let escaped = {
            let mut bodies = self.pool.simulated_bodies_mut();
            self.world.step(dt, &mut bodies)
        };
        for id in escaped {
            if self.pool.recycle(id) {
                tracing::debug!(piece = %id, "piece left the arena");
            }
        }
    }

    fn poll_current_player(&mut self) {
        self.announce_turn();
        let player = &mut self.players[self.session.current_index()];
        let mut ctx = PlacementContext {
            pool: &mut self.pool,
            board: self.session.board(),
            layout: &self.layout,
            config: &self.config.placement,
            clock: self.clock,
        };
        if let Some(piece) = player.poll_placement(&mut ctx) {
            tracing::debug!(player = %self.session.current_player(), %piece, "placement started");
            let detector = SettlementDetector::new(piece, &self.pool, &self.config.settle);
            self.state = TurnState::AwaitingSettlement(detector);
        }
    }

    fn evaluate(&mut self, result: PlacementResult) -> Result<(), GameError> {
        let player = self.session.current_player();
        self.last_result = Some(result);

        if result.is_cancelled() {
            self.session.stats_mut().cancelled += 1;
            tracing::debug!(%player, piece = %result.piece(), "placement cancelled, retrying");
            self.state = TurnState::AwaitingPlacement;
            return Ok(());
        }

        let kind = result.kind();
        if !self.config.settle.accept.contains(kind) {
            self.pool.recycle(result.piece());
            self.session.stats_mut().rejected += 1;
            tracing::warn!(%player, kind = kind.name(), "placement rejected, same player retries");
            self.emit(GameEvent::PlacementRejected { player, kind });
            self.state = TurnState::AwaitingPlacement;
            return Ok(());
        }

        if kind == PlacementKind::Success {
            if let Err(err) = self.commit(player, result) {
                tracing::error!(%player, piece = %result.piece(), error = %err, "failed to commit placement");
                self.pool.recycle(result.piece());
                self.state = TurnState::AwaitingPlacement;
                return Err(err);
            }
        } else {
            self.pool.recycle(result.piece());
            self.session.stats_mut().missed += 1;
            tracing::info!(%player, kind = kind.name(), "placement missed, turn consumed");
            self.emit(GameEvent::PieceMissed { player, kind });
        }
        self.session.stats_mut().accepted += 1;

        self.finish_turn();
        Ok(())
    }

    fn commit(&mut self, player: PlayerId, result: PlacementResult) -> Result<(), GameError> {
        let piece = result.piece();
        let cell: CellPos = result.cell().ok_or(GameError::MissingCell(piece))?;
        self.session
            .board_mut()
            .commit(cell, Occupant { owner: player, piece })?;
        self.pool.commit(piece, self.layout.cell_center(cell));
        tracing::info!(%player, col = cell.col, row = cell.row, "piece placed");
        self.emit(GameEvent::PiecePlaced { player, piece, cell });
        Ok(())
    }

    fn finish_turn(&mut self) {
        let board = self.session.board();
        let winners = board.evaluate_winners();
        if !winners.is_empty() {
            let cells = board.winning_positions();
            tracing::info!(?winners, "game won");
            self.session.finish(Outcome::Win(winners.clone()));
            self.state = TurnState::GameOver;
            self.emit(GameEvent::GameWon { winners, cells });
        } else if board.is_full() {
            tracing::info!("board full, game tied");
            self.session.finish(Outcome::Tie);
            self.state = TurnState::GameOver;
            self.emit(GameEvent::GameTied);
        } else {
            self.session.advance_turn();
            self.state = TurnState::AwaitingPlacement;
            self.turn_announced = false;
            self.announce_turn();
        }
    }

    fn announce_turn(&mut self) {
        if self.turn_announced {
            return;
        }
        self.turn_announced = true;
        let player = self.session.current_player();
        tracing::info!(%player, name = %self.current_player().name, "turn started");
        self.emit(GameEvent::TurnStarted { player });
    }

    fn emit(&self, event: GameEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}

/// First seat of a game: uniform when configured, otherwise rotating with the
/// number of games played.
fn pick_starting_player(config: &AppConfig, rng: &mut StdRng, games_played: usize) -> usize {
    let n = config.players.num_players;
    if config.players.random_starting_player {
        rng.random_range(0..n)
    } else {
        (config.players.starting_player + games_played) % n
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use glam::Vec2;

    use super::*;
    use crate::game::{PlacementMask, SessionStats};
    use crate::players::HumanPlayer;

    const DT: f32 = 1.0 / 60.0;

    #[derive(Debug, Clone, Copy)]
    enum Throw {
        Column(usize),
        At(Vec2),
    }

    /// Drops pieces from a fixed script, one per poll.
    struct ScriptedPlayer {
        info: PlayerInfo,
        script: VecDeque<Throw>,
    }

    impl ScriptedPlayer {
        fn boxed(seat: usize, script: impl IntoIterator<Item = Throw>) -> Box<dyn Player> {
            Box::new(ScriptedPlayer {
                info: PlayerInfo::new(PlayerId::new(seat), format!("Script {seat}")),
                script: script.into_iter().collect(),
            })
        }

        fn columns(seat: usize, cols: &[usize]) -> Box<dyn Player> {
            Self::boxed(seat, cols.iter().map(|&c| Throw::Column(c)))
        }
    }

    impl Player for ScriptedPlayer {
        fn info(&self) -> &PlayerInfo {
            &self.info
        }

        fn poll_placement(&mut self, ctx: &mut PlacementContext<'_>) -> Option<PieceId> {
            let position = match self.script.pop_front()? {
                Throw::Column(col) => ctx.layout.column_spawn_point(col),
                Throw::At(point) => point,
            };
            let id = ctx.pool.spawn(self.info.id, position);
            ctx.pool.release(id, Vec2::ZERO, 0.0);
            Some(id)
        }
    }

    fn config(num_players: usize) -> AppConfig {
        let mut config = AppConfig::default();
        config.players.num_players = num_players;
        config.players.num_agents = 0;
        config.players.random_starting_player = false;
        config.players.starting_player = 0;
        config.players.seed = Some(7);
        config
    }

    fn driver(config: AppConfig, players: Vec<Box<dyn Player>>) -> (GameDriver, mpsc::Receiver<GameEvent>) {
        let mut driver = GameDriver::new(config, players).unwrap();
        let (tx, rx) = mpsc::channel();
        driver.set_event_sender(tx);
        (driver, rx)
    }

    /// Tick until `done` holds; panics if it never does.
    fn run_until(driver: &mut GameDriver, max_ticks: usize, done: impl Fn(&GameDriver) -> bool) {
        for _ in 0..max_ticks {
            if done(driver) {
                return;
            }
            driver.advance(DT).unwrap();
        }
        assert!(done(driver), "condition not reached in {max_ticks} ticks");
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = config(2);
        config.board.num_cols = 1;
        let players = vec![ScriptedPlayer::columns(0, &[]), ScriptedPlayer::columns(1, &[])];
        assert!(matches!(
            GameDriver::new(config, players),
            Err(GameError::Config(_))
        ));
    }

    #[test]
    fn test_new_rejects_wrong_roster_size() {
        let players = vec![ScriptedPlayer::columns(0, &[])];
        assert!(GameDriver::new(config(2), players).is_err());
    }

    #[test]
    fn test_from_config_builds_roster() {
        let mut config = config(3);
        config.players.num_agents = 2;
        let driver = GameDriver::from_config(config).unwrap();
        assert_eq!(driver.players().count(), 3);
        assert_eq!(driver.phase(), Phase::AwaitingPlacement);
        assert!(!driver.awaiting_input());
    }

    #[test]
    fn test_column_three_win() {
        let players = vec![
            ScriptedPlayer::columns(0, &[3, 3, 3, 3]),
            ScriptedPlayer::columns(1, &[0, 0, 0]),
        ];
        let (mut driver, rx) = driver(config(2), players);

        run_until(&mut driver, 3000, GameDriver::is_over);

        assert_eq!(driver.outcome(), Some(&Outcome::Win(vec![PlayerId::new(0)])));
        for row in 2..6 {
            assert_eq!(driver.board().owner(CellPos::new(3, row)), Some(PlayerId::new(0)));
        }
        assert_eq!(driver.session().stats().accepted, 7);

        let events: Vec<GameEvent> = rx.try_iter().collect();
        assert!(matches!(events.first(), Some(GameEvent::TurnStarted { player }) if *player == PlayerId::new(0)));
        assert!(matches!(
            events.last(),
            Some(GameEvent::GameWon { winners, cells }) if winners == &vec![PlayerId::new(0)] && cells.len() == 4
        ));
        let placed = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PiecePlaced { .. }))
            .count();
        assert_eq!(placed, 7);
    }

    #[test]
    fn test_game_over_ignores_input_and_ticks() {
        let players = vec![
            ScriptedPlayer::columns(0, &[3, 3, 3, 3]),
            ScriptedPlayer::columns(1, &[0, 0, 0]),
        ];
        let (mut driver, _rx) = driver(config(2), players);
        run_until(&mut driver, 3000, GameDriver::is_over);

        let clock = driver.clock();
        driver.handle_input(PointerEvent::Press(Vec2::new(1.0, -1.0)));
        driver.advance(DT).unwrap();
        assert_eq!(driver.pool().active_count(), 0);
        assert_eq!(driver.clock(), clock);
        assert_eq!(driver.phase(), Phase::GameOver);
    }

    #[test]
    fn test_full_board_tie() {
        let mut config = config(2);
        config.board.num_cols = 3;
        config.board.num_rows = 3;
        config.board.num_connect = 3;
        // Bottom row O X X, middle X O O, top X O X.
        let players = vec![
            ScriptedPlayer::columns(0, &[1, 2, 0, 0, 2]),
            ScriptedPlayer::columns(1, &[0, 1, 2, 1]),
        ];
        let (mut driver, rx) = driver(config, players);

        run_until(&mut driver, 4000, GameDriver::is_over);

        assert!(driver.board().is_full());
        assert!(driver.board().evaluate_winners().is_empty());
        assert_eq!(driver.outcome(), Some(&Outcome::Tie));
        assert!(rx.try_iter().any(|e| e == GameEvent::GameTied));
    }

    #[test]
    fn test_turn_index_follows_accepted_placements() {
        let mut config = config(3);
        config.players.starting_player = 1;
        let players = vec![
            ScriptedPlayer::columns(0, &[0, 0]),
            ScriptedPlayer::columns(1, &[2, 2]),
            ScriptedPlayer::columns(2, &[5, 5]),
        ];
        let (mut driver, _rx) = driver(config, players);
        assert_eq!(driver.session().current_index(), 1);

        for n in 1..=5 {
            run_until(&mut driver, 1000, |d| d.session().stats().accepted == n);
            assert_eq!(driver.session().current_index(), (1 + n) % 3);
        }
    }

    #[test]
    fn test_rejected_placement_keeps_turn() {
        let players = vec![
            ScriptedPlayer::boxed(0, [Throw::At(Vec2::new(-1.0, -1.0)), Throw::Column(2)]),
            ScriptedPlayer::columns(1, &[4]),
        ];
        let (mut driver, rx) = driver(config(2), players);

        run_until(&mut driver, 2000, |d| d.session().stats().rejected == 1);
        assert_eq!(driver.session().current_player(), PlayerId::new(0));
        assert_eq!(driver.board().occupied_count(), 0);
        assert_eq!(driver.pool().active_count(), 0);
        assert!(rx.try_iter().any(|e| e
            == GameEvent::PlacementRejected {
                player: PlayerId::new(0),
                kind: PlacementKind::GotStuck,
            }));

        run_until(&mut driver, 1000, |d| d.session().stats().accepted == 1);
        assert_eq!(driver.board().owner(CellPos::new(2, 5)), Some(PlayerId::new(0)));
        assert_eq!(driver.session().current_player(), PlayerId::new(1));
    }

    #[test]
    fn test_accepted_miss_consumes_turn() {
        let mut config = config(2);
        config.settle.accept = PlacementMask::MISS_OR_SUCCESS;
        config.settle.timeout_secs = 0.3;
        let players = vec![
            ScriptedPlayer::columns(0, &[3]),
            ScriptedPlayer::columns(1, &[]),
        ];
        let (mut driver, rx) = driver(config, players);

        run_until(&mut driver, 200, |d| d.session().stats().accepted == 1);
        assert_eq!(
            driver.session().stats(),
            SessionStats {
                accepted: 1,
                missed: 1,
                ..SessionStats::default()
            }
        );
        assert_eq!(driver.board().occupied_count(), 0);
        assert_eq!(driver.session().current_player(), PlayerId::new(1));
        assert!(rx.try_iter().any(|e| e
            == GameEvent::PieceMissed {
                player: PlayerId::new(0),
                kind: PlacementKind::TimerDespawned,
            }));
    }

    #[test]
    fn test_timeout_rejected_under_default_mask() {
        let mut config = config(2);
        config.settle.timeout_secs = 0.3;
        let players = vec![
            ScriptedPlayer::columns(0, &[3]),
            ScriptedPlayer::columns(1, &[]),
        ];
        let (mut driver, _rx) = driver(config, players);

        run_until(&mut driver, 200, |d| d.session().stats().rejected == 1);
        assert_eq!(driver.session().current_player(), PlayerId::new(0));
        assert_eq!(driver.session().stats().accepted, 0);
    }

    #[test]
    fn test_non_positive_ticks_are_ignored() {
        let mut config = config(2);
        config.settle.timeout_secs = 0.3;
        let players = vec![
            ScriptedPlayer::columns(0, &[3]),
            ScriptedPlayer::columns(1, &[]),
        ];
        let (mut driver, _rx) = driver(config, players);

        driver.advance(DT).unwrap();
        driver.advance(DT).unwrap();
        let remaining = driver.settle_time_remaining().unwrap();
        let clock = driver.clock();

        for dt in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            driver.advance(dt).unwrap();
        }
        assert_eq!(driver.settle_time_remaining(), Some(remaining));
        assert_eq!(driver.clock(), clock);

        run_until(&mut driver, 200, |d| d.session().stats().rejected == 1);
    }

    /// Alternate two players down one column until it is full.
    fn fill_column(cell_spacing: f32) -> GameDriver {
        let mut config = config(2);
        config.board.cell_spacing = cell_spacing;
        let players = vec![
            ScriptedPlayer::columns(0, &[3, 3, 3]),
            ScriptedPlayer::columns(1, &[3, 3, 3]),
        ];
        let (mut driver, _rx) = driver(config, players);
        run_until(&mut driver, 5000, |d| d.session().stats().accepted == 6);
        driver
    }

    #[test]
    fn test_column_fills_to_the_top() {
        for spacing in [0.1, 0.45] {
            let driver = fill_column(spacing);
            assert_eq!(driver.session().stats().rejected, 0, "spacing {spacing}");
            for row in 0..6 {
                assert!(driver.board().is_occupied(CellPos::new(3, row)), "spacing {spacing}");
            }
            assert!(!driver.board().column_has_room(3));
            assert!(!driver.is_over());
        }
    }

    #[test]
    fn test_recycled_piece_cancels_settlement() {
        let players = vec![
            ScriptedPlayer::columns(0, &[3, 3]),
            ScriptedPlayer::columns(1, &[]),
        ];
        let (mut driver, _rx) = driver(config(2), players);

        driver.advance(DT).unwrap();
        assert_eq!(driver.phase(), Phase::AwaitingSettlement);
        let piece = driver.pool().active().next().unwrap().id();

        assert!(driver.recycle_piece(piece));
        driver.advance(DT).unwrap();

        let result = driver.last_result().unwrap();
        assert!(result.is_cancelled());
        assert_eq!(driver.session().stats().cancelled, 1);
        assert_eq!(driver.session().current_player(), PlayerId::new(0));
        assert_eq!(driver.phase(), Phase::AwaitingPlacement);
        assert_eq!(driver.board().occupied_count(), 0);
    }

    #[test]
    fn test_input_disabled_during_settlement() {
        let players: Vec<Box<dyn Player>> = vec![
            Box::new(HumanPlayer::new(PlayerInfo::new(PlayerId::new(0), "Human"))),
            ScriptedPlayer::columns(1, &[]),
        ];
        let (mut driver, _rx) = driver(config(2), players);
        assert!(driver.awaiting_input());

        let above = driver.layout().column_spawn_point(1);
        driver.handle_input(PointerEvent::Press(above));
        driver.handle_input(PointerEvent::Release);
        driver.advance(DT).unwrap();
        assert_eq!(driver.phase(), Phase::AwaitingSettlement);
        assert!(!driver.awaiting_input());

        driver.handle_input(PointerEvent::Press(above));
        assert_eq!(driver.pool().active_count(), 1);

        run_until(&mut driver, 1000, |d| d.session().stats().accepted == 1);
        assert_eq!(driver.board().owner(CellPos::new(1, 5)), Some(PlayerId::new(0)));
    }

    #[test]
    fn test_new_session_rotates_starting_player() {
        let players = vec![
            ScriptedPlayer::columns(0, &[3, 3, 3, 3]),
            ScriptedPlayer::columns(1, &[0, 0, 0]),
        ];
        let (mut driver, rx) = driver(config(2), players);

        // Abandoning an unfinished game does not count it.
        driver.new_session();
        assert_eq!(driver.session().games_played(), 0);
        assert_eq!(driver.session().current_player(), PlayerId::new(0));

        run_until(&mut driver, 3000, GameDriver::is_over);
        driver.new_session();
        assert_eq!(driver.session().games_played(), 1);
        assert_eq!(driver.session().current_player(), PlayerId::new(1));
        assert_eq!(driver.phase(), Phase::AwaitingPlacement);
        assert_eq!(driver.board().occupied_count(), 0);
        assert_eq!(driver.pool().committed().count(), 0);
        assert!(matches!(
            rx.try_iter().last(),
            Some(GameEvent::TurnStarted { player }) if player == PlayerId::new(1)
        ));
    }

    #[test]
    fn test_random_starting_player_in_range() {
        let mut config = config(4);
        config.players.random_starting_player = true;
        let players = (0..4).map(|seat| ScriptedPlayer::columns(seat, &[])).collect();
        let mut driver = GameDriver::new(config, players).unwrap();
        for _ in 0..20 {
            driver.new_session();
            assert!(driver.session().current_index() < 4);
        }
    }
}
