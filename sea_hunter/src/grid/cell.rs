use serde::{Deserialize, Serialize};

/// Seat index of a player in the session's fixed player list.
pub type PlayerId = usize;

/// Index of a fish in the session's fish arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FishId(pub usize);

/// What a single grid cell holds.
///
/// The grid only stores handles; the vessel and fish data live in the
/// session's arenas.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellContent {
    #[default]
    Empty,
    Vessel(PlayerId),
    Fish(FishId),
}

impl CellContent {
    pub fn is_empty(self) -> bool {
        self == CellContent::Empty
    }

    pub fn vessel(self) -> Option<PlayerId> {
        match self {
            CellContent::Vessel(id) => Some(id),
            _ => None,
        }
    }

    pub fn fish(self) -> Option<FishId> {
        match self {
            CellContent::Fish(id) => Some(id),
            _ => None,
        }
    }
}
