use std::collections::VecDeque;

use glam::Vec2;

use super::{CancelToken, Piece, PieceId, PieceState};
use crate::game::PlayerId;
use crate::physics::Body;

/// Baseline number of pieces created up front.
pub const DEFAULT_PREWARM: usize = 16;

/// Recycles piece objects and tracks which ones are in play.
///
/// Pieces live in a slab; `PieceId` carries a generation so a handle to a
/// recycled piece never reaches the next spawn that reuses the slot.
#[derive(Debug, Clone)]
pub struct PiecePool {
    pieces: Vec<Piece>,
    free: VecDeque<usize>,
    active: Vec<PieceId>,
    committed: Vec<PieceId>,
    radius: f32,
}

impl PiecePool {
    pub fn new(prewarm: usize, radius: f32) -> Self {
        let mut pool = PiecePool {
            pieces: Vec::with_capacity(prewarm),
            free: VecDeque::with_capacity(prewarm),
            active: Vec::new(),
            committed: Vec::new(),
            radius,
        };
        for _ in 0..prewarm {
            let index = pool.create_piece();
            pool.free.push_back(index);
        }
        pool
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Take a piece for `owner` and hold it at `position`.
    pub fn spawn(&mut self, owner: PlayerId, position: Vec2) -> PieceId {
        let index = match self.free.pop_front() {
            Some(index) => index,
            None => self.create_piece(),
        };
        let piece = &mut self.pieces[index];
        debug_assert_eq!(piece.state, PieceState::Pooled);

        piece.body = Body::new(position, self.radius);
        piece.owner = Some(owner);
        piece.state = PieceState::Held;
        piece.cancel = CancelToken::new();

        let id = piece.id();
        self.active.push(id);
        tracing::trace!(piece = %id, player = owner.index(), "spawned piece");
        id
    }

    /// Let a held piece fall with the given impulses. Any settlement run
    /// still watching an earlier fall of this piece is cancelled.
    pub fn release(&mut self, id: PieceId, velocity: Vec2, torque: f32) -> bool {
        let Some(piece) = self.get_mut(id) else {
            return false;
        };
        if piece.state != PieceState::Held {
            return false;
        }
        piece.cancel.cancel();
        piece.cancel = CancelToken::new();
        piece.body.apply_impulse(velocity, torque);
        piece.state = PieceState::Falling;
        true
    }

    /// Move a held piece.
    pub fn move_held(&mut self, id: PieceId, position: Vec2) -> bool {
        match self.get_mut(id) {
            Some(piece) if piece.state == PieceState::Held => {
                piece.body.teleport(position, piece.body.rotation);
                true
            }
            _ => false,
        }
    }

    pub fn set_state(&mut self, id: PieceId, state: PieceState) {
        if let Some(piece) = self.get_mut(id) {
            if piece.state.is_active() && state.is_active() {
                piece.state = state;
            }
        }
    }

    /// Stop the piece's physics where it is.
    pub fn freeze(&mut self, id: PieceId) {
        if let Some(piece) = self.get_mut(id) {
            piece.body.freeze();
        }
    }

    /// Hand an active piece over to the board, snapped to `position`.
    pub fn commit(&mut self, id: PieceId, position: Vec2) -> bool {
        let Some(piece) = self.get_mut(id) else {
            return false;
        };
        if !piece.state.is_active() {
            return false;
        }
        piece.body.freeze();
        piece.body.teleport(position, 0.0);
        piece.state = PieceState::Committed;
        self.active.retain(|&a| a != id);
        self.committed.push(id);
        true
    }

    /// Return an active piece to the free list. No-op for pieces that are not
    /// active, so calling it twice is harmless.
    pub fn recycle(&mut self, id: PieceId) -> bool {
        match self.get(id) {
            Some(piece) if piece.state.is_active() => {}
            _ => return false,
        }
        self.active.retain(|&a| a != id);
        self.park(id.index());
        tracing::trace!(piece = %id, "recycled piece");
        true
    }

    /// Return every active and committed piece. Used on session teardown.
    pub fn recycle_all(&mut self) {
        let ids: Vec<PieceId> = self.active.drain(..).chain(self.committed.drain(..)).collect();
        for id in ids {
            self.park(id.index());
        }
    }

    fn park(&mut self, index: usize) {
        let piece = &mut self.pieces[index];
        piece.cancel.cancel();
        piece.body.freeze();
        piece.owner = None;
        piece.state = PieceState::Pooled;
        piece.set_id(PieceId::new(index as u32, piece.id().generation().wrapping_add(1)));
        self.free.push_back(index);
    }

    fn create_piece(&mut self) -> usize {
        let index = self.pieces.len();
        self.pieces
            .push(Piece::new(PieceId::new(index as u32, 0), self.radius));
        index
    }

    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index()).filter(|piece| piece.id() == id)
    }

    pub fn get_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(id.index()).filter(|piece| piece.id() == id)
    }

    pub fn is_active(&self, id: PieceId) -> bool {
        self.get(id).is_some_and(|piece| piece.state.is_active())
    }

    pub fn active(&self) -> impl Iterator<Item = &Piece> {
        self.active.iter().filter_map(|&id| self.get(id))
    }

    pub fn committed(&self) -> impl Iterator<Item = &Piece> {
        self.committed.iter().filter_map(|&id| self.get(id))
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Total pieces ever created.
    pub fn capacity(&self) -> usize {
        self.pieces.len()
    }

    /// Bodies the physics step should see.
    pub fn simulated_bodies_mut(&mut self) -> Vec<(PieceId, &mut Body)> {
        self.pieces
            .iter_mut()
            .filter(|piece| piece.state.is_simulated())
            .map(|piece| (piece.id(), &mut piece.body))
            .collect()
    }
}

impl Default for PiecePool {
    fn default() -> Self {
        PiecePool::new(DEFAULT_PREWARM, 0.49)
    }
}
