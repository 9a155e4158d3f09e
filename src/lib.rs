//! # Drop Four
//!
//! A drop-piece game (Connect Four variant) where pieces fall under a small
//! 2-D physics simulation, come to rest, snap into grid cells and trigger win
//! evaluation. Ships a terminal UI built with Ratatui and a headless match
//! simulator.
//!
//! ## Modules
//!
//! - [`physics`]: Vectors, rigid bodies, board geometry and the stepping world
//! - [`pieces`]: Piece objects, the recycling pool, cancellation tokens
//! - [`game`]: Board and win evaluation, settlement detection, turn driver
//! - [`players`]: Player trait, interactive humans, random agents
//! - [`ui`]: Terminal UI: arena canvas, grid panel, controls
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod physics;
pub mod pieces;
pub mod players;
pub mod ui;
