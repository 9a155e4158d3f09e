use glam::Vec2;

use super::{MomentumSampler, PlacementContext, Player, PointerEvent};
use crate::game::PlayerInfo;
use crate::pieces::{PieceId, PiecePool};

/// A player driven by pointer input: press to grab a piece, drag, release to
/// drop it.
pub struct HumanPlayer {
    info: PlayerInfo,
    held: Option<PieceId>,
    released: Option<PieceId>,
    sampler: MomentumSampler,
}

impl HumanPlayer {
    pub fn new(info: PlayerInfo) -> Self {
        HumanPlayer {
            info,
            held: None,
            released: None,
            sampler: MomentumSampler::new(),
        }
    }

    /// Piece currently being positioned, if any.
    pub fn held_piece(&self) -> Option<PieceId> {
        self.held
    }

    fn target(point: Vec2, ctx: &PlacementContext<'_>) -> Vec2 {
        if ctx.config.place_anywhere {
            point
        } else {
            ctx.layout.clamp_to_spawn_zone(point)
        }
    }

    fn release(&mut self, ctx: &mut PlacementContext<'_>) {
        let Some(id) = self.held.take() else {
            return;
        };
        let (velocity, torque) = if ctx.config.use_momentum {
            let pivot = ctx.pool.get(id).map(|p| p.position()).unwrap_or(Vec2::ZERO);
            let velocity = (self.sampler.velocity() * ctx.config.momentum_multiplier)
                .clamp_length_max(ctx.config.max_momentum);
            let torque = if ctx.config.use_spinning {
                (self.sampler.angular_velocity(pivot) * ctx.config.torque_multiplier)
                    .clamp(-ctx.config.max_torque, ctx.config.max_torque)
            } else {
                0.0
            };
            (velocity, torque)
        } else {
            (Vec2::ZERO, 0.0)
        };

        if ctx.pool.release(id, velocity, torque) {
            tracing::debug!(player = %self.info.id, piece = %id, ?velocity, torque, "piece released");
            self.released = Some(id);
        }
        self.sampler.reset();
    }
}

impl Player for HumanPlayer {
    fn info(&self) -> &PlayerInfo {
        &self.info
    }

    fn poll_placement(&mut self, ctx: &mut PlacementContext<'_>) -> Option<PieceId> {
        if let Some(id) = self.held {
            if !ctx.pool.is_active(id) {
                self.held = None;
            }
        }
        self.released.take()
    }

    fn handle_input(&mut self, event: PointerEvent, ctx: &mut PlacementContext<'_>) {
        match event {
            PointerEvent::Press(point) => {
                if self.held.is_some() || self.released.is_some() {
                    return;
                }
                let position = Self::target(point, ctx);
                let id = ctx.pool.spawn(self.info.id, position);
                self.sampler.reset();
                self.sampler.add(point, ctx.clock);
                self.held = Some(id);
            }
            PointerEvent::Move(point) => {
                if let Some(id) = self.held {
                    let position = Self::target(point, ctx);
                    ctx.pool.move_held(id, position);
                    self.sampler.add(point, ctx.clock);
                }
            }
            PointerEvent::Release => self.release(ctx),
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn reset(&mut self, pool: &mut PiecePool) {
        if let Some(id) = self.held.take() {
            pool.recycle(id);
        }
        self.released = None;
        self.sampler.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlacementConfig;
    use crate::game::{Board, PlayerId};
    use crate::physics::BoardLayout;
    use crate::pieces::PieceState;

    struct Fixture {
        pool: PiecePool,
        board: Board,
        layout: BoardLayout,
        config: PlacementConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                pool: PiecePool::new(2, 0.49),
                board: Board::default(),
                layout: BoardLayout::new(7, 6, 1.0, 0.1, 2.0),
                config: PlacementConfig::default(),
            }
        }

        fn ctx(&mut self, clock: f32) -> PlacementContext<'_> {
            PlacementContext {
                pool: &mut self.pool,
                board: &self.board,
                layout: &self.layout,
                config: &self.config,
                clock,
            }
        }
    }

    fn human() -> HumanPlayer {
        HumanPlayer::new(PlayerInfo::new(PlayerId::new(1), "Human"))
    }

    #[test]
    fn test_nothing_until_release() {
        let mut fx = Fixture::new();
        let mut player = human();
        assert_eq!(player.poll_placement(&mut fx.ctx(0.0)), None);

        player.handle_input(PointerEvent::Press(Vec2::new(2.0, -1.0)), &mut fx.ctx(0.0));
        let held = player.held_piece().unwrap();
        assert_eq!(fx.pool.get(held).unwrap().state(), PieceState::Held);
        assert_eq!(player.poll_placement(&mut fx.ctx(0.1)), None);

        player.handle_input(PointerEvent::Release, &mut fx.ctx(0.2));
        assert_eq!(player.poll_placement(&mut fx.ctx(0.2)), Some(held));
        assert_eq!(fx.pool.get(held).unwrap().state(), PieceState::Falling);
        // Handed over exactly once.
        assert_eq!(player.poll_placement(&mut fx.ctx(0.3)), None);
    }

    #[test]
    fn test_press_is_clamped_above_board() {
        let mut fx = Fixture::new();
        let mut player = human();
        player.handle_input(PointerEvent::Press(Vec2::new(3.0, 4.0)), &mut fx.ctx(0.0));
        let piece = fx.pool.get(player.held_piece().unwrap()).unwrap();
        assert!(piece.position().y <= fx.layout.spawn_line());
        assert_eq!(piece.owner(), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_place_anywhere_skips_clamp() {
        let mut fx = Fixture::new();
        fx.config.place_anywhere = true;
        let mut player = human();
        player.handle_input(PointerEvent::Press(Vec2::new(3.0, 4.0)), &mut fx.ctx(0.0));
        let piece = fx.pool.get(player.held_piece().unwrap()).unwrap();
        assert_eq!(piece.position(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_drag_moves_held_piece() {
        let mut fx = Fixture::new();
        let mut player = human();
        player.handle_input(PointerEvent::Press(Vec2::new(1.0, -1.0)), &mut fx.ctx(0.0));
        player.handle_input(PointerEvent::Move(Vec2::new(4.0, -2.0)), &mut fx.ctx(0.1));
        let piece = fx.pool.get(player.held_piece().unwrap()).unwrap();
        assert_eq!(piece.position(), Vec2::new(4.0, -2.0));
    }

    #[test]
    fn test_throw_velocity_is_clamped() {
        let mut fx = Fixture::new();
        let mut player = human();
        player.handle_input(PointerEvent::Press(Vec2::new(0.0, -1.0)), &mut fx.ctx(0.0));
        player.handle_input(PointerEvent::Move(Vec2::new(6.0, -1.0)), &mut fx.ctx(0.1));
        player.handle_input(PointerEvent::Release, &mut fx.ctx(0.1));
        let id = player.poll_placement(&mut fx.ctx(0.1)).unwrap();
        let speed = fx.pool.get(id).unwrap().body().speed();
        assert!((speed - fx.config.max_momentum).abs() < 1e-4);
    }

    #[test]
    fn test_no_momentum_drops_straight() {
        let mut fx = Fixture::new();
        fx.config.use_momentum = false;
        let mut player = human();
        player.handle_input(PointerEvent::Press(Vec2::new(0.0, -1.0)), &mut fx.ctx(0.0));
        player.handle_input(PointerEvent::Move(Vec2::new(6.0, -1.0)), &mut fx.ctx(0.1));
        player.handle_input(PointerEvent::Release, &mut fx.ctx(0.1));
        let id = player.poll_placement(&mut fx.ctx(0.1)).unwrap();
        assert_eq!(fx.pool.get(id).unwrap().body().speed(), 0.0);
    }

    fn swept_throw(fx: &mut Fixture) -> f32 {
        let mut player = human();
        // Below the spawn line, so the piece trails the pointer and the
        // pointer sweeps around it.
        player.handle_input(PointerEvent::Press(Vec2::new(1.0, 2.0)), &mut fx.ctx(0.0));
        player.handle_input(PointerEvent::Move(Vec2::new(3.0, 2.0)), &mut fx.ctx(0.1));
        player.handle_input(PointerEvent::Release, &mut fx.ctx(0.1));
        let id = player.poll_placement(&mut fx.ctx(0.1)).unwrap();
        fx.pool.get(id).unwrap().body().angular_velocity
    }

    #[test]
    fn test_spin_only_with_spinning_enabled() {
        let mut fx = Fixture::new();
        assert_eq!(swept_throw(&mut fx), 0.0);

        let mut fx = Fixture::new();
        fx.config.use_spinning = true;
        let spin = swept_throw(&mut fx);
        assert!((spin + fx.config.max_torque).abs() < 1e-4, "spin {spin}");
    }

    #[test]
    fn test_second_press_is_ignored_while_holding() {
        let mut fx = Fixture::new();
        let mut player = human();
        player.handle_input(PointerEvent::Press(Vec2::new(1.0, -1.0)), &mut fx.ctx(0.0));
        player.handle_input(PointerEvent::Press(Vec2::new(2.0, -1.0)), &mut fx.ctx(0.0));
        assert_eq!(fx.pool.active_count(), 1);
    }

    #[test]
    fn test_reset_recycles_held_piece() {
        let mut fx = Fixture::new();
        let mut player = human();
        player.handle_input(PointerEvent::Press(Vec2::new(1.0, -1.0)), &mut fx.ctx(0.0));
        player.reset(&mut fx.pool);
        assert_eq!(fx.pool.active_count(), 0);
        assert_eq!(player.held_piece(), None);
    }
}
