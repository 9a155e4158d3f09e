use glam::Vec2;

use crate::config::PlacementConfig;
use crate::game::{Board, PlayerInfo};
use crate::physics::BoardLayout;
use crate::pieces::{PieceId, PiecePool};

/// Pointer input in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press(Vec2),
    Move(Vec2),
    Release,
}

/// What a player may touch while producing a placement.
pub struct PlacementContext<'a> {
    pub pool: &'a mut PiecePool,
    pub board: &'a Board,
    pub layout: &'a BoardLayout,
    pub config: &'a PlacementConfig,
    /// Seconds since the driver was created.
    pub clock: f32,
}

/// A participant that produces one released piece per turn.
pub trait Player {
    fn info(&self) -> &PlayerInfo;

    /// Called every tick while this player is to move. Returns the piece once
    /// it has been released and is falling.
    fn poll_placement(&mut self, ctx: &mut PlacementContext<'_>) -> Option<PieceId>;

    /// Pointer input routed to the player whose turn it is.
    fn handle_input(&mut self, _event: PointerEvent, _ctx: &mut PlacementContext<'_>) {}

    /// Whether this player waits on pointer input.
    fn is_interactive(&self) -> bool {
        false
    }

    /// Drop any half-made placement. Called when a session is torn down.
    fn reset(&mut self, _pool: &mut PiecePool) {}
}
