//! Minimal 2-D rigid-body simulation for falling pieces: circles under
//! gravity colliding with the board's column channels, the arena walls and
//! each other.

mod body;
mod layout;
mod world;

pub use body::{Body, BodyKind};
pub use layout::{BoardLayout, Rect, Segment};
pub use world::World;
