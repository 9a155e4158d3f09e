//! Turn and board logic: the grid and its win evaluation, the settlement
//! detector that turns a falling body into a placement result, and the driver
//! that runs the turn state machine.

mod board;
mod driver;
mod events;
mod placement;
mod player;
mod session;
mod settle;

pub use board::{Board, CellPos, Occupant, DEFAULT_COLS, DEFAULT_CONNECT, DEFAULT_ROWS};
pub use driver::{GameDriver, Phase};
pub use events::GameEvent;
pub use placement::{PlacementKind, PlacementMask, PlacementResult};
pub use player::{PlayerId, PlayerInfo, Token};
pub use session::{GameSession, Outcome, SessionStats};
pub use settle::SettlementDetector;
