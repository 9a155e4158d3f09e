use super::{Board, PlacementResult};
use crate::config::SettleConfig;
use crate::physics::BoardLayout;
use crate::pieces::{CancelToken, PieceId, PiecePool, PieceState};

/// Watches one falling piece until it comes to rest, times out, or is
/// cancelled. Produces exactly one result.
#[derive(Debug, Clone)]
pub struct SettlementDetector {
    piece: PieceId,
    cancel: CancelToken,
    despawn_remaining: f32,
    dwell: f32,
    threshold: f32,
    duration: f32,
    finished: bool,
}

impl SettlementDetector {
    /// Attach to a piece that has just been released. The piece's current
    /// cancellation token is captured; a later recycle or re-release of the
    /// piece cancels this run.
    pub fn new(piece: PieceId, pool: &PiecePool, config: &SettleConfig) -> Self {
        let cancel = pool
            .get(piece)
            .map(|p| p.cancel_token())
            .unwrap_or_else(CancelToken::cancelled);
        SettlementDetector {
            piece,
            cancel,
            despawn_remaining: config.timeout_secs,
            dwell: 0.0,
            threshold: config.low_velocity_threshold,
            duration: config.low_velocity_duration,
            finished: false,
        }
    }

    pub fn piece(&self) -> PieceId {
        self.piece
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Seconds left before the piece is despawned.
    pub fn despawn_remaining(&self) -> f32 {
        self.despawn_remaining
    }

    /// Sample the piece once. Returns the result on the tick it resolves and
    /// `None` on every other tick.
    pub fn advance(
        &mut self,
        dt: f32,
        pool: &mut PiecePool,
        layout: &BoardLayout,
        board: &Board,
    ) -> Option<PlacementResult> {
        if self.finished {
            return None;
        }

        let speed = match pool.get(self.piece) {
            Some(piece) if !self.cancel.is_cancelled() => piece.body().speed(),
            _ => return Some(self.finish(PlacementResult::cancelled(self.piece))),
        };

        self.despawn_remaining -= dt;

        if speed < self.threshold {
            self.dwell += dt;
            pool.set_state(self.piece, PieceState::Settling);
        } else {
            self.dwell = 0.0;
            pool.set_state(self.piece, PieceState::Falling);
        }

        if self.dwell >= self.duration {
            let position = pool.get(self.piece).map(|p| p.position());
            let cell = position
                .and_then(|p| layout.cell_at(p))
                .filter(|&cell| !board.is_occupied(cell));
            return Some(match cell {
                Some(cell) => {
                    pool.freeze(self.piece);
                    tracing::debug!(piece = %self.piece, col = cell.col, row = cell.row, "piece settled");
                    self.finish(PlacementResult::success(self.piece, cell))
                }
                None => {
                    tracing::debug!(piece = %self.piece, ?position, "piece stuck outside a free cell");
                    pool.recycle(self.piece);
                    self.finish(PlacementResult::got_stuck(self.piece))
                }
            });
        }

        if self.despawn_remaining <= 0.0 {
            tracing::debug!(piece = %self.piece, "piece never settled, despawning");
            pool.recycle(self.piece);
            return Some(self.finish(PlacementResult::timer_despawned(self.piece)));
        }

        None
    }

    fn finish(&mut self, result: PlacementResult) -> PlacementResult {
        self.finished = true;
        result
    }
}
