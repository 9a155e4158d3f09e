use std::path::Path;

use crate::error::ConfigError;
use crate::game::PlacementMask;

pub const MIN_BOARD_DIM: usize = 3;
pub const MAX_BOARD_DIM: usize = 12;
pub const MAX_PLAYERS: usize = 4;

/// Grid dimensions and cell geometry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub num_cols: usize,
    pub num_rows: usize,
    pub num_connect: usize,
    pub cell_size: f32,
    pub cell_spacing: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            num_cols: 7,
            num_rows: 6,
            num_connect: 4,
            cell_size: 1.0,
            cell_spacing: 0.1,
        }
    }
}

/// When a falling piece counts as settled, and which outcomes consume a turn.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SettleConfig {
    pub timeout_secs: f32,
    pub low_velocity_threshold: f32,
    pub low_velocity_duration: f32,
    pub accept: PlacementMask,
}

impl Default for SettleConfig {
    fn default() -> Self {
        SettleConfig {
            timeout_secs: 30.0,
            low_velocity_threshold: 0.1,
            low_velocity_duration: 0.2,
            accept: PlacementMask::SUCCESS,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub gravity_scale: f32,
    pub restitution: f32,
    pub friction: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Impacts slower than this do not bounce.
    pub resting_speed: f32,
    pub max_substep: f32,
    /// Gap between a piece and its channel walls.
    pub piece_margin: f32,
    /// Solid arena walls. When false, pieces leaving the arena are destroyed.
    pub bouncy_walls: bool,
    /// Free space left and right of the board, in cells.
    pub arena_margin: f32,
    /// Rows of bouncer pegs above the board that kick pieces away.
    pub plinko: bool,
    /// Speed a bouncer adds to a piece that hits it.
    pub bouncer_force: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: 9.81,
            gravity_scale: 3.0,
            restitution: 0.3,
            friction: 0.4,
            linear_damping: 0.1,
            angular_damping: 0.5,
            resting_speed: 0.5,
            max_substep: 1.0 / 120.0,
            piece_margin: 0.02,
            bouncy_walls: true,
            arena_margin: 2.0,
            plinko: false,
            bouncer_force: 4.0,
        }
    }
}

/// Roster: the first `num_agents` seats are random agents, the rest humans.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub num_players: usize,
    pub num_agents: usize,
    pub starting_player: usize,
    pub random_starting_player: bool,
    pub seed: Option<u64>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            num_players: 2,
            num_agents: 1,
            starting_player: 0,
            random_starting_player: true,
            seed: None,
        }
    }
}

/// How interactive players position and throw pieces.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub use_momentum: bool,
    pub momentum_multiplier: f32,
    pub max_momentum: f32,
    /// Throws pass the pointer's swept angle on as spin.
    pub use_spinning: bool,
    pub torque_multiplier: f32,
    pub max_torque: f32,
    /// Allow held pieces anywhere in the arena, not only above the board.
    pub place_anywhere: bool,
    pub pool_prewarm: usize,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        PlacementConfig {
            use_momentum: true,
            momentum_multiplier: 1.0,
            max_momentum: 3.0,
            use_spinning: false,
            torque_multiplier: 0.5,
            max_torque: 10.0,
            place_anywhere: false,
            pool_prewarm: crate::pieces::DEFAULT_PREWARM,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub settle: SettleConfig,
    pub physics: PhysicsConfig,
    pub players: PlayerConfig,
    pub placement: PlacementConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Radius of a piece body for this board.
    pub fn piece_radius(&self) -> f32 {
        (self.board.cell_size - self.physics.piece_margin) * 0.5
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let board = &self.board;
        let dims = MIN_BOARD_DIM..=MAX_BOARD_DIM;
        if !dims.contains(&board.num_cols) {
            return Err(ConfigError::Validation(format!(
                "board.num_cols must be in {MIN_BOARD_DIM}..={MAX_BOARD_DIM}"
            )));
        }
        if !dims.contains(&board.num_rows) {
            return Err(ConfigError::Validation(format!(
                "board.num_rows must be in {MIN_BOARD_DIM}..={MAX_BOARD_DIM}"
            )));
        }
        if board.num_connect < 2 || board.num_connect > board.num_cols.max(board.num_rows) {
            return Err(ConfigError::Validation(
                "board.num_connect must be in 2..=max(num_cols, num_rows)".into(),
            ));
        }
        if !positive(board.cell_size) {
            return Err(ConfigError::Validation(
                "board.cell_size must be > 0".into(),
            ));
        }
        if !non_negative(board.cell_spacing) || board.cell_spacing >= board.cell_size {
            return Err(ConfigError::Validation(
                "board.cell_spacing must be in [0, cell_size)".into(),
            ));
        }

        let settle = &self.settle;
        if !positive(settle.timeout_secs) {
            return Err(ConfigError::Validation(
                "settle.timeout_secs must be > 0".into(),
            ));
        }
        if !positive(settle.low_velocity_threshold) {
            return Err(ConfigError::Validation(
                "settle.low_velocity_threshold must be > 0".into(),
            ));
        }
        if !positive(settle.low_velocity_duration) {
            return Err(ConfigError::Validation(
                "settle.low_velocity_duration must be > 0".into(),
            ));
        }
        if !settle.accept.contains(crate::game::PlacementKind::Success) {
            return Err(ConfigError::Validation(
                "settle.accept must include \"success\"".into(),
            ));
        }

        let physics = &self.physics;
        if !non_negative(physics.gravity) {
            return Err(ConfigError::Validation(
                "physics.gravity must be >= 0".into(),
            ));
        }
        if !non_negative(physics.gravity_scale) {
            return Err(ConfigError::Validation(
                "physics.gravity_scale must be >= 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&physics.restitution) {
            return Err(ConfigError::Validation(
                "physics.restitution must be in [0, 1]".into(),
            ));
        }
        if !non_negative(physics.friction) {
            return Err(ConfigError::Validation(
                "physics.friction must be >= 0".into(),
            ));
        }
        if !non_negative(physics.linear_damping) || !non_negative(physics.angular_damping) {
            return Err(ConfigError::Validation(
                "physics damping must be >= 0".into(),
            ));
        }
        if !non_negative(physics.resting_speed) {
            return Err(ConfigError::Validation(
                "physics.resting_speed must be >= 0".into(),
            ));
        }
        if !positive(physics.max_substep) {
            return Err(ConfigError::Validation(
                "physics.max_substep must be > 0".into(),
            ));
        }
        if !non_negative(physics.piece_margin) || physics.piece_margin >= board.cell_size * 0.5 {
            return Err(ConfigError::Validation(
                "physics.piece_margin must be in [0, cell_size / 2)".into(),
            ));
        }
        // Committed pieces sit at their cell centre, so a piece resting on
        // one lands `cell_size / 2 + spacing + margin` into the row above.
        if board.cell_spacing + physics.piece_margin >= board.cell_size * 0.5 {
            return Err(ConfigError::Validation(
                "board.cell_spacing + physics.piece_margin must be < cell_size / 2".into(),
            ));
        }
        if !non_negative(physics.arena_margin) {
            return Err(ConfigError::Validation(
                "physics.arena_margin must be >= 0".into(),
            ));
        }
        if !non_negative(physics.bouncer_force) {
            return Err(ConfigError::Validation(
                "physics.bouncer_force must be >= 0".into(),
            ));
        }

        let players = &self.players;
        if players.num_players == 0 || players.num_players > MAX_PLAYERS {
            return Err(ConfigError::Validation(format!(
                "players.num_players must be in 1..={MAX_PLAYERS}"
            )));
        }
        if players.num_agents > players.num_players {
            return Err(ConfigError::Validation(
                "players.num_agents must be <= players.num_players".into(),
            ));
        }
        if players.starting_player >= players.num_players {
            return Err(ConfigError::Validation(
                "players.starting_player must be < players.num_players".into(),
            ));
        }

        let placement = &self.placement;
        if !non_negative(placement.momentum_multiplier)
            || !non_negative(placement.torque_multiplier)
        {
            return Err(ConfigError::Validation(
                "placement multipliers must be >= 0".into(),
            ));
        }
        if !non_negative(placement.max_momentum) || !non_negative(placement.max_torque) {
            return Err(ConfigError::Validation(
                "placement.max_momentum and placement.max_torque must be >= 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&AppConfig::default())?)
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}
