use serde::{Deserialize, Serialize};

/// The turn-phase state machine.
///
/// After placement the phases cycle
/// `Preparation → PlayCards → Movement → Resolution → Preparation → …`
/// until a resolution produces a winner. Preparation and Resolution need no
/// player input and are passed through immediately.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Placement,
    Preparation,
    PlayCards,
    Movement,
    Resolution,
    GameOver,
}

impl Phase {
    /// Whether some player is expected to submit an action.
    pub fn awaits_player(self) -> bool {
        matches!(self, Phase::Placement | Phase::PlayCards | Phase::Movement)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Placement => "placement",
            Phase::Preparation => "preparation",
            Phase::PlayCards => "play cards",
            Phase::Movement => "movement",
            Phase::Resolution => "resolution",
            Phase::GameOver => "game over",
        };
        write!(f, "{}", name)
    }
}
