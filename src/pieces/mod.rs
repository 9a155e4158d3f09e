//! Piece objects and the pool that recycles them.

mod cancel;
mod piece;
mod pool;

pub use cancel::CancelToken;
pub use piece::{Piece, PieceId, PieceState};
pub use pool::{PiecePool, DEFAULT_PREWARM};
