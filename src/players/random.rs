use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{PlacementContext, Player};
use crate::game::PlayerInfo;
use crate::pieces::PieceId;

/// An agent that drops into a uniformly random column with room.
pub struct RandomAgent {
    info: PlayerInfo,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(info: PlayerInfo) -> Self {
        RandomAgent {
            info,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(info: PlayerInfo, seed: u64) -> Self {
        RandomAgent {
            info,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick a column that still has a free cell.
    pub fn choose_column(&mut self, open: &[usize]) -> Option<usize> {
        if open.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..open.len());
        Some(open[idx])
    }
}

impl Player for RandomAgent {
    fn info(&self) -> &PlayerInfo {
        &self.info
    }

    fn poll_placement(&mut self, ctx: &mut PlacementContext<'_>) -> Option<PieceId> {
        let col = self.choose_column(&ctx.board.open_columns())?;
        let id = ctx
            .pool
            .spawn(self.info.id, ctx.layout.column_spawn_point(col));
        ctx.pool.release(id, Vec2::ZERO, 0.0);
        tracing::debug!(player = %self.info.id, col, piece = %id, "agent dropped piece");
        Some(id)
    }
}
