use serde::{Deserialize, Serialize};

use crate::{full_deck_size, SetupError, MAX_BOARD_SIZE};

/// Rules of a match. Every field has a default, so a partial JSON object is
/// a valid configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// The grid is `board_size` x `board_size`.
    pub board_size: u32,
    /// Base movement budget per round, before subtracting caught fish.
    pub movement_limit: u32,
    /// Radius within which a vessel claims a fish during resolution.
    pub collection_distance: u32,
    pub winning_fish_count: u32,
    pub hand_size: usize,
    /// Fish spawned per seated player in the first round.
    pub initial_fish_per_player: usize,
    pub min_players: usize,
    pub max_players: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 20,
            movement_limit: 7,
            collection_distance: 2,
            winning_fish_count: 3,
            hand_size: 3,
            initial_fish_per_player: 1,
            min_players: 2,
            max_players: 4,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.board_size < 2 {
            return Err(SetupError::InvalidConfig("board_size must be at least 2"));
        }
        if self.board_size > MAX_BOARD_SIZE {
            return Err(SetupError::InvalidConfig("board_size must be at most 1024"));
        }
        if self.movement_limit > 2 * self.board_size {
            return Err(SetupError::InvalidConfig(
                "movement_limit must not exceed twice the board_size",
            ));
        }
        if self.winning_fish_count == 0 {
            return Err(SetupError::InvalidConfig("winning_fish_count must be positive"));
        }
        if self.hand_size == 0 || self.hand_size > full_deck_size() {
            return Err(SetupError::InvalidConfig(
                "hand_size must be between 1 and the deck size",
            ));
        }
        if self.min_players > self.max_players {
            return Err(SetupError::InvalidConfig(
                "min_players must not exceed max_players",
            ));
        }
        Ok(())
    }
}

/// How an AI player behaves.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiProfile {
    /// Seconds of accumulated ticks before the AI acts.
    pub think_time: f64,
    /// Probability of acting at random instead of scoring options.
    pub random_factor: f64,
    /// Carried along with the preset; the heuristics do not read it.
    pub strategy_weight: f64,
}

impl AiProfile {
    pub fn new(think_time: f64, random_factor: f64, strategy_weight: f64) -> Self {
        Self {
            think_time: think_time.max(0.0),
            random_factor: random_factor.clamp(0.0, 1.0),
            strategy_weight,
        }
    }
}

/// The three stock AI presets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn profile(self) -> AiProfile {
        match self {
            Difficulty::Easy => AiProfile::new(0.5, 0.7, 0.3),
            Difficulty::Medium => AiProfile::new(1.0, 0.4, 0.6),
            Difficulty::Hard => AiProfile::new(1.5, 0.1, 0.9),
        }
    }
}

impl From<Difficulty> for AiProfile {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.profile()
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// The error type for the [`FromStr`](std::str::FromStr) instance of [`Difficulty`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownDifficulty(pub String);

impl std::error::Error for UnknownDifficulty {}

impl std::fmt::Display for UnknownDifficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown difficulty '{}', expected easy, medium or hard",
            self.0
        )
    }
}

impl std::str::FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownDifficulty(String::from(s))),
        }
    }
}
