use super::{CellPos, PlacementKind, PlayerId};
use crate::pieces::PieceId;

/// Notifications sent from the driver to effects, audio and front ends.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    TurnStarted {
        player: PlayerId,
    },
    PiecePlaced {
        player: PlayerId,
        piece: PieceId,
        cell: CellPos,
    },
    /// The piece was discarded and the same player goes again.
    PlacementRejected {
        player: PlayerId,
        kind: PlacementKind,
    },
    /// The placement counted as a move but landed nowhere.
    PieceMissed {
        player: PlayerId,
        kind: PlacementKind,
    },
    GameWon {
        winners: Vec<PlayerId>,
        cells: Vec<CellPos>,
    },
    GameTied,
}
