use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{ActionRejected, AiProfile, Coord, Deck, MovementCard, PlayerId, Vessel};

/// Seat colors, assigned in seating order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Red,
    Blue,
    Green,
    Yellow,
}

impl PlayerColor {
    pub fn for_seat(seat: PlayerId) -> Self {
        [
            PlayerColor::Red,
            PlayerColor::Blue,
            PlayerColor::Green,
            PlayerColor::Yellow,
        ][seat % 4]
    }
}

/// Who makes this player's decisions.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlayerKind {
    /// Decisions come from outside, through the session's action methods.
    Human,
    /// Decisions are made by the advisor while the session is ticked.
    Ai(AiProfile),
}

/// What a caller provides to seat a player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSetup {
    pub name: String,
    pub kind: PlayerKind,
}

impl PlayerSetup {
    pub fn human(name: &str) -> Self {
        Self {
            name: String::from(name),
            kind: PlayerKind::Human,
        }
    }

    pub fn ai(name: &str, profile: impl Into<AiProfile>) -> Self {
        Self {
            name: String::from(name),
            kind: PlayerKind::Ai(profile.into()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub fish_collected: u32,
    pub turns_played: u32,
    pub total_distance_moved: u32,
    pub average_distance: f64,
}

/// A seated player and their per-round bookkeeping.
#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: PlayerColor,
    pub kind: PlayerKind,
    pub hand: Vec<MovementCard>,
    /// `None` until placed.
    pub vessel: Option<Vessel>,
    pub has_played_card: bool,
    pub has_moved: bool,
    /// Mirrors the vessel's counter.
    pub fish_collected: u32,
    pub turns_played: u32,
    pub total_distance_moved: u32,
}

impl Player {
    pub fn new(id: PlayerId, setup: PlayerSetup) -> Self {
        Self {
            id,
            name: setup.name,
            color: PlayerColor::for_seat(id),
            kind: setup.kind,
            hand: Vec::new(),
            vessel: None,
            has_played_card: false,
            has_moved: false,
            fish_collected: 0,
            turns_played: 0,
            total_distance_moved: 0,
        }
    }

    pub fn is_ai(&self) -> bool {
        matches!(self.kind, PlayerKind::Ai(_))
    }

    pub fn position(&self) -> Option<Coord> {
        self.vessel.as_ref().map(|v| v.position)
    }

    pub fn moves_remaining(&self) -> u32 {
        self.vessel.as_ref().map_or(0, |v| v.moves_remaining)
    }

    /// Draws until the hand holds `hand_size` cards.
    pub fn refill_hand<R: Rng + ?Sized>(&mut self, deck: &mut Deck, rng: &mut R, hand_size: usize) {
        while self.hand.len() < hand_size {
            self.hand.push(deck.draw(rng));
        }
    }

    /// Takes the card at `index` out of the hand, face-down.
    pub fn play_card(&mut self, index: usize) -> Result<MovementCard, ActionRejected> {
        if index >= self.hand.len() {
            return Err(ActionRejected::CardNotInHand {
                index,
                hand_len: self.hand.len(),
            });
        }
        self.has_played_card = true;
        Ok(self.hand.remove(index))
    }

    pub fn collect_fish(&mut self) {
        self.fish_collected += 1;
        if let Some(vessel) = self.vessel.as_mut() {
            vessel.collect_fish();
        }
    }

    /// Clears the per-round flags after a resolved round.
    pub fn end_round(&mut self) {
        self.turns_played += 1;
        self.has_played_card = false;
        self.has_moved = false;
    }

    pub fn is_winner(&self, winning_fish_count: u32) -> bool {
        self.fish_collected >= winning_fish_count
    }

    pub fn stats(&self) -> PlayerStats {
        PlayerStats {
            fish_collected: self.fish_collected,
            turns_played: self.turns_played,
            total_distance_moved: self.total_distance_moved,
            average_distance: self.total_distance_moved as f64 / self.turns_played.max(1) as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::Difficulty;

    #[test]
    fn play_card_keeps_hand_order() {
        let mut player = Player::new(1, PlayerSetup::ai("CPU 1", Difficulty::Easy));
        assert!(player.is_ai());
        assert_eq!(player.color, PlayerColor::Blue);
        player.hand = vec![
            MovementCard::new(1, 0),
            MovementCard::new(0, 1),
            MovementCard::new(2, 1),
        ];
        assert_eq!(
            player.play_card(3),
            Err(ActionRejected::CardNotInHand {
                index: 3,
                hand_len: 3
            })
        );
        assert!(!player.has_played_card);
        assert_eq!(player.play_card(1), Ok(MovementCard::new(0, 1)));
        assert_eq!(
            player.hand,
            vec![MovementCard::new(1, 0), MovementCard::new(2, 1)]
        );
        assert!(player.has_played_card);
    }

    #[test]
    fn refill_and_stats() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut deck = Deck::new(&mut rng);
        let mut player = Player::new(0, PlayerSetup::human("Ana"));
        player.refill_hand(&mut deck, &mut rng, 3);
        assert_eq!(player.hand.len(), 3);
        player.play_card(0).unwrap();
        player.refill_hand(&mut deck, &mut rng, 3);
        assert_eq!(player.hand.len(), 3);

        player.total_distance_moved = 9;
        player.end_round();
        player.end_round();
        let stats = player.stats();
        assert_eq!(stats.turns_played, 2);
        assert_eq!(stats.average_distance, 4.5);
        assert!(!player.has_played_card);
    }
}
