//! Player abstraction: interactive humans and random agents, both producing
//! real pieces that fall through the same settlement pipeline.

mod human;
mod player;
mod random;
mod sampler;

pub use human::HumanPlayer;
pub use player::{PlacementContext, Player, PointerEvent};
pub use random::RandomAgent;
pub use sampler::{MomentumSampler, NUM_SAMPLES};

use crate::config::PlayerConfig;
use crate::game::{PlayerId, PlayerInfo};

/// Build the roster: the first `num_agents` seats are agents, the rest human.
/// A configured seed gives each agent its own deterministic stream.
pub fn build_roster(config: &PlayerConfig) -> Vec<Box<dyn Player>> {
    (0..config.num_players)
        .map(|seat| {
            let id = PlayerId::new(seat);
            if seat < config.num_agents {
                let info = PlayerInfo::new(id, format!("Agent {}", seat + 1));
                let agent = match config.seed {
                    Some(seed) => RandomAgent::with_seed(info, seed.wrapping_add(seat as u64 + 1)),
                    None => RandomAgent::new(info),
                };
                Box::new(agent) as Box<dyn Player>
            } else {
                let info = PlayerInfo::new(id, format!("Player {}", seat + 1));
                Box::new(HumanPlayer::new(info))
            }
        })
        .collect()
}
