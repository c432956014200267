use serde::{Deserialize, Serialize};

use crate::{Phase, PlayerId};

/// The error type for a single action submitted to a [`GameSession`](crate::GameSession).
///
/// Every variant is recoverable: the session stays in its current state and
/// the caller may submit another action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionRejected {
    InvalidPosition { x: i32, y: i32 },
    CellOccupied { x: i32, y: i32 },
    NotPlayersTurn { expected: PlayerId },
    WrongPhase { phase: Phase },
    CardNotInHand { index: usize, hand_len: usize },
    NoMovesRemaining,
    MoveTooFar { distance: i32, budget: u32 },
    UnknownPlayer(PlayerId),
    AlreadyPlaced,
}

impl std::error::Error for ActionRejected {}

impl std::fmt::Display for ActionRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionRejected::InvalidPosition { x, y } => {
                write!(f, "Position ({}, {}) is outside the grid", x, y)
            }
            ActionRejected::CellOccupied { x, y } => {
                write!(f, "Cell ({}, {}) is already occupied", x, y)
            }
            ActionRejected::NotPlayersTurn { expected } => {
                write!(f, "It is player {}'s turn", expected + 1)
            }
            ActionRejected::WrongPhase { phase } => {
                write!(f, "This action is not allowed during the {} phase", phase)
            }
            ActionRejected::CardNotInHand { index, hand_len } => write!(
                f,
                "Card index {} is not in a hand of {} cards",
                index, hand_len
            ),
            ActionRejected::NoMovesRemaining => {
                write!(f, "The vessel has no moves remaining this round")
            }
            ActionRejected::MoveTooFar { distance, budget } => write!(
                f,
                "Target is {} cells away but only {} moves remain",
                distance, budget
            ),
            ActionRejected::UnknownPlayer(id) => write!(f, "There is no player with id {}", id),
            ActionRejected::AlreadyPlaced => write!(f, "The vessel has already been placed"),
        }
    }
}

/// The error type for setting up a [`GameSession`](crate::GameSession).
#[derive(Clone, Debug, PartialEq)]
pub enum SetupError {
    TooFewPlayers { min: usize, got: usize },
    TooManyPlayers { max: usize, got: usize },
    InvalidConfig(&'static str),
}

impl std::error::Error for SetupError {}

impl std::fmt::Display for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupError::TooFewPlayers { min, got } => {
                write!(f, "At least {} players are required, got {}", min, got)
            }
            SetupError::TooManyPlayers { max, got } => {
                write!(f, "At most {} players are allowed, got {}", max, got)
            }
            SetupError::InvalidConfig(reason) => write!(f, "Invalid game configuration: {}", reason),
        }
    }
}
