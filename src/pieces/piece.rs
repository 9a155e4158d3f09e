use std::fmt;

use glam::Vec2;

use super::CancelToken;
use crate::game::PlayerId;
use crate::physics::Body;

/// Handle to a pooled piece. The generation changes every time the piece is
/// recycled, so stale handles stop resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId {
    index: u32,
    generation: u32,
}

impl PieceId {
    pub const fn new(index: u32, generation: u32) -> Self {
        PieceId { index, generation }
    }

    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// Lifecycle of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceState {
    /// Parked in the pool's free list.
    Pooled,
    /// Spawned and being positioned by a player; physics frozen.
    Held,
    /// Dropped and moving.
    Falling,
    /// Dropped and slow enough that the settle timer is running.
    Settling,
    /// Snapped into a board cell for the rest of the session.
    Committed,
}

impl PieceState {
    pub fn is_active(self) -> bool {
        matches!(
            self,
            PieceState::Held | PieceState::Falling | PieceState::Settling
        )
    }

    /// Whether the physics step should see this piece.
    pub fn is_simulated(self) -> bool {
        matches!(
            self,
            PieceState::Falling | PieceState::Settling | PieceState::Committed
        )
    }
}

#[derive(Debug, Clone)]
pub struct Piece {
    id: PieceId,
    pub(super) body: Body,
    pub(super) owner: Option<PlayerId>,
    pub(super) state: PieceState,
    pub(super) cancel: CancelToken,
}

impl Piece {
    pub(super) fn new(id: PieceId, radius: f32) -> Self {
        Piece {
            id,
            body: Body::new(Vec2::ZERO, radius),
            owner: None,
            state: PieceState::Pooled,
            cancel: CancelToken::cancelled(),
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub(super) fn set_id(&mut self, id: PieceId) {
        self.id = id;
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub(crate) fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    pub fn state(&self) -> PieceState {
        self.state
    }

    /// Token observed by the settlement run of the current fall.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_states() {
        assert!(!PieceState::Pooled.is_active());
        assert!(PieceState::Held.is_active());
        assert!(PieceState::Falling.is_active());
        assert!(PieceState::Settling.is_active());
        assert!(!PieceState::Committed.is_active());
    }

    #[test]
    fn test_held_pieces_are_not_simulated() {
        assert!(!PieceState::Held.is_simulated());
        assert!(!PieceState::Pooled.is_simulated());
        assert!(PieceState::Committed.is_simulated());
    }

    #[test]
    fn test_piece_id_display() {
        assert_eq!(PieceId::new(3, 7).to_string(), "#3.7");
    }
}
