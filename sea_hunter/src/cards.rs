use serde::{Deserialize, Serialize};

use crate::Coord;

/// A movement card: the current it adds to this round's resultant vector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MovementCard {
    pub dx: i32,
    pub dy: i32,
}

impl std::fmt::Display for MovementCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.dx, self.dy)
    }
}

impl MovementCard {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// `|dx| + |dy|`
    pub fn magnitude(self) -> i32 {
        self.dx.abs() + self.dy.abs()
    }

    /// How many copies of this vector a full deck holds.
    ///
    /// Weaker currents are more common: 4 still-water cards, 6 of each unit
    /// step, 4 of each diagonal or strong step and 2 of each knight step.
    pub fn copies_in_deck(self) -> usize {
        match self.magnitude() {
            0 => 4,
            1 => 6,
            2 => 4,
            _ => 2,
        }
    }

    /// Where `pos` ends up when pushed by this card.
    pub fn apply(self, pos: Coord) -> Coord {
        pos.offset(self.dx, self.dy)
    }
}

impl std::ops::Add for MovementCard {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            dx: self.dx + rhs.dx,
            dy: self.dy + rhs.dy,
        }
    }
}

impl std::iter::Sum for MovementCard {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(MovementCard::new(0, 0), |acc, card| acc + card)
    }
}

impl<'a> std::iter::Sum<&'a MovementCard> for MovementCard {
    fn sum<I: Iterator<Item = &'a MovementCard>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Every distinct vector that exists as a card.
pub static CARD_CATALOG: [MovementCard; 17] = [
    MovementCard::new(0, 0),
    MovementCard::new(1, 0),
    MovementCard::new(-1, 0),
    MovementCard::new(0, 1),
    MovementCard::new(0, -1),
    MovementCard::new(1, 1),
    MovementCard::new(-1, -1),
    MovementCard::new(1, -1),
    MovementCard::new(-1, 1),
    MovementCard::new(2, 0),
    MovementCard::new(-2, 0),
    MovementCard::new(0, 2),
    MovementCard::new(0, -2),
    MovementCard::new(2, 1),
    MovementCard::new(-2, -1),
    MovementCard::new(1, 2),
    MovementCard::new(-1, -2),
];

/// Number of cards in a freshly built deck.
pub fn full_deck_size() -> usize {
    CARD_CATALOG.iter().map(|card| card.copies_in_deck()).sum()
}
