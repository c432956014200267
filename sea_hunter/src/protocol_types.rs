use serde::{Deserialize, Serialize};

use crate::{Coord, MovementCard, Phase, PlayerColor, PlayerId};

/// A decision submitted on behalf of one player.
///
/// Human adapters and the AI advisor produce the same actions, and the
/// session validates them the same way.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Put the vessel on an empty cell. Only during placement.
    PlaceVessel { x: i32, y: i32 },
    /// Play the card at this position of the hand, face-down.
    PlayCard { card_index: usize },
    /// Sail to a cell returned by the valid-move query.
    MoveVessel { x: i32, y: i32 },
    /// Stay put this round.
    SkipMove,
}

/// A fish claimed during resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub player: PlayerId,
    /// Where the fish was when it was caught.
    pub position: Coord,
}

/// What happened when a round was resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    /// The face-down cards, revealed, in player order.
    pub revealed: Vec<(PlayerId, MovementCard)>,
    pub resultant: MovementCard,
    /// Fish pushed off the board; each is replaced next round.
    pub fish_lost: usize,
    pub collections: Vec<Collection>,
}

/// How a finished game ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Winner(PlayerId),
    /// Several players crossed the threshold in the same resolution, listed
    /// in player order.
    Tie(Vec<PlayerId>),
}

impl GameResult {
    pub fn winners(&self) -> Vec<PlayerId> {
        match self {
            GameResult::Winner(id) => vec![*id],
            GameResult::Tie(ids) => ids.clone(),
        }
    }
}

/// The public view of one player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub color: PlayerColor,
    pub is_ai: bool,
    pub position: Option<Coord>,
    pub hand: Vec<MovementCard>,
    pub has_played_card: bool,
    pub has_moved: bool,
    pub fish_collected: u32,
    pub moves_remaining: u32,
    pub turns_played: u32,
}

/// A rendering-agnostic picture of the whole session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub round: u32,
    pub board_size: i32,
    /// The player expected to act next, if any.
    pub current_player: Option<PlayerId>,
    pub start_player: PlayerId,
    pub players: Vec<PlayerView>,
    /// Live fish in spawn order.
    pub fish_positions: Vec<Coord>,
    pub last_round: Option<RoundSummary>,
    pub result: Option<GameResult>,
}

impl Snapshot {
    pub fn winners(&self) -> Vec<PlayerId> {
        self.result
            .as_ref()
            .map(GameResult::winners)
            .unwrap_or_default()
    }
}
