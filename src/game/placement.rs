use std::fmt;
use std::ops::BitOr;

use super::CellPos;
use crate::pieces::PieceId;

/// How a fall ended. Values are single bits so policies can be masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PlacementKind {
    /// The fall was cancelled before it resolved.
    None = 0,
    /// Came to rest somewhere that is not a free cell.
    GotStuck = 1,
    /// Never came to rest before the settle timeout.
    TimerDespawned = 2,
    /// Came to rest inside a free cell.
    Success = 4,
}

impl PlacementKind {
    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            PlacementKind::None => "none",
            PlacementKind::GotStuck => "got stuck",
            PlacementKind::TimerDespawned => "timed out",
            PlacementKind::Success => "success",
        }
    }
}

/// Set of placement kinds that count as a turn-consuming move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<PlacementKind>", into = "Vec<PlacementKind>")]
pub struct PlacementMask(u8);

impl PlacementMask {
    pub const EMPTY: PlacementMask = PlacementMask(0);
    pub const GOT_STUCK: PlacementMask = PlacementMask(PlacementKind::GotStuck as u8);
    pub const TIMER_DESPAWNED: PlacementMask = PlacementMask(PlacementKind::TimerDespawned as u8);
    pub const SUCCESS: PlacementMask = PlacementMask(PlacementKind::Success as u8);
    pub const MISS_OR_SUCCESS: PlacementMask =
        PlacementMask(PlacementKind::TimerDespawned as u8 | PlacementKind::Success as u8);
    pub const ANY: PlacementMask = PlacementMask(
        PlacementKind::GotStuck as u8
            | PlacementKind::TimerDespawned as u8
            | PlacementKind::Success as u8,
    );

    pub fn bits(self) -> u8 {
        self.0
    }

    /// `None` is never contained: a cancelled fall is not a move.
    pub fn contains(self, kind: PlacementKind) -> bool {
        self.0 & kind.bits() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn kinds(self) -> Vec<PlacementKind> {
        [
            PlacementKind::GotStuck,
            PlacementKind::TimerDespawned,
            PlacementKind::Success,
        ]
        .into_iter()
        .filter(|&kind| self.contains(kind))
        .collect()
    }
}

impl Default for PlacementMask {
    fn default() -> Self {
        PlacementMask::SUCCESS
    }
}

impl BitOr for PlacementMask {
    type Output = PlacementMask;
    fn bitor(self, rhs: PlacementMask) -> PlacementMask {
        PlacementMask(self.0 | rhs.0)
    }
}

impl From<PlacementKind> for PlacementMask {
    fn from(kind: PlacementKind) -> Self {
        PlacementMask(kind.bits())
    }
}

impl FromIterator<PlacementKind> for PlacementMask {
    fn from_iter<I: IntoIterator<Item = PlacementKind>>(iter: I) -> Self {
        PlacementMask(iter.into_iter().fold(0, |bits, kind| bits | kind.bits()))
    }
}

impl TryFrom<Vec<PlacementKind>> for PlacementMask {
    type Error = String;

    fn try_from(kinds: Vec<PlacementKind>) -> Result<Self, Self::Error> {
        if kinds.contains(&PlacementKind::None) {
            return Err("\"none\" cannot be part of an acceptance mask".to_string());
        }
        Ok(kinds.into_iter().collect())
    }
}

impl From<PlacementMask> for Vec<PlacementKind> {
    fn from(mask: PlacementMask) -> Self {
        mask.kinds()
    }
}

impl fmt::Display for PlacementMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.kinds().into_iter().map(PlacementKind::name).collect();
        if names.is_empty() {
            write!(f, "(nothing)")
        } else {
            write!(f, "{}", names.join(" | "))
        }
    }
}

/// Outcome of one fall. `cell` is present exactly when `kind` is `Success`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementResult {
    kind: PlacementKind,
    piece: PieceId,
    cell: Option<CellPos>,
}

impl PlacementResult {
    pub fn success(piece: PieceId, cell: CellPos) -> Self {
        PlacementResult {
            kind: PlacementKind::Success,
            piece,
            cell: Some(cell),
        }
    }

    pub fn got_stuck(piece: PieceId) -> Self {
        Self::without_cell(PlacementKind::GotStuck, piece)
    }

    pub fn timer_despawned(piece: PieceId) -> Self {
        Self::without_cell(PlacementKind::TimerDespawned, piece)
    }

    pub fn cancelled(piece: PieceId) -> Self {
        Self::without_cell(PlacementKind::None, piece)
    }

    fn without_cell(kind: PlacementKind, piece: PieceId) -> Self {
        PlacementResult {
            kind,
            piece,
            cell: None,
        }
    }

    pub fn kind(&self) -> PlacementKind {
        self.kind
    }

    pub fn piece(&self) -> PieceId {
        self.piece
    }

    pub fn cell(&self) -> Option<CellPos> {
        self.cell
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == PlacementKind::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_present_iff_success() {
        let piece = PieceId::new(0, 0);
        assert_eq!(
            PlacementResult::success(piece, CellPos::new(1, 2)).cell(),
            Some(CellPos::new(1, 2))
        );
        assert_eq!(PlacementResult::got_stuck(piece).cell(), None);
        assert_eq!(PlacementResult::timer_despawned(piece).cell(), None);
        assert_eq!(PlacementResult::cancelled(piece).cell(), None);
        assert!(PlacementResult::cancelled(piece).is_cancelled());
    }

    #[test]
    fn test_mask_contains() {
        let mask = PlacementMask::MISS_OR_SUCCESS;
        assert!(mask.contains(PlacementKind::Success));
        assert!(mask.contains(PlacementKind::TimerDespawned));
        assert!(!mask.contains(PlacementKind::GotStuck));
        assert!(!mask.contains(PlacementKind::None));
        assert!(!PlacementMask::ANY.contains(PlacementKind::None));
    }

    #[test]
    fn test_mask_bits_match_flag_values() {
        assert_eq!(PlacementMask::MISS_OR_SUCCESS.bits(), 6);
        assert_eq!(PlacementMask::ANY.bits(), 7);
        assert_eq!(
            PlacementMask::SUCCESS | PlacementMask::GOT_STUCK,
            [PlacementKind::Success, PlacementKind::GotStuck]
                .into_iter()
                .collect()
        );
    }

    #[test]
    fn test_mask_rejects_none() {
        assert!(PlacementMask::try_from(vec![PlacementKind::None]).is_err());
        assert_eq!(
            PlacementMask::try_from(vec![PlacementKind::Success]),
            Ok(PlacementMask::SUCCESS)
        );
    }

    #[test]
    fn test_mask_display() {
        assert_eq!(PlacementMask::SUCCESS.to_string(), "success");
        assert_eq!(
            PlacementMask::MISS_OR_SUCCESS.to_string(),
            "timed out | success"
        );
        assert_eq!(PlacementMask::EMPTY.to_string(), "(nothing)");
    }
}
