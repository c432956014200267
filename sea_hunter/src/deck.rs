use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::{MovementCard, CARD_CATALOG};

/// The shared bag of movement cards.
///
/// Drawing never fails: an empty deck is refilled with a fresh catalog.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<MovementCard>,
}

impl Deck {
    /// A full, shuffled deck.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self { cards: Vec::new() };
        deck.refill(rng);
        deck
    }

    /// A deck holding exactly `cards`, in that order.
    pub fn from_cards(cards: Vec<MovementCard>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Removes a uniformly chosen card.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> MovementCard {
        if self.cards.is_empty() {
            debug!("Deck exhausted, reshuffling a fresh catalog");
            self.refill(rng);
        }
        let idx = rng.gen_range(0..self.cards.len());
        self.cards.swap_remove(idx)
    }

    /// Puts a played card back into the bag.
    pub fn return_card(&mut self, card: MovementCard) {
        self.cards.push(card);
    }

    /// How many copies of each vector the deck currently holds.
    pub fn composition(&self) -> BTreeMap<MovementCard, usize> {
        let mut counts = BTreeMap::new();
        for &card in &self.cards {
            *counts.entry(card).or_insert(0) += 1;
        }
        counts
    }

    fn refill<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for &card in CARD_CATALOG.iter() {
            for _ in 0..card.copies_in_deck() {
                self.cards.push(card);
            }
        }
        self.cards.shuffle(rng);
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::full_deck_size;

    quickcheck! {
        fn draw_then_return_preserves_composition(seed: u64, draws: u8) -> bool {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut deck = Deck::new(&mut rng);
            let before = deck.composition();
            let drawn: Vec<MovementCard> = (0..draws % 40).map(|_| deck.draw(&mut rng)).collect();
            for card in drawn {
                deck.return_card(card);
            }
            deck.composition() == before
        }
    }

    #[test]
    fn new_deck_matches_catalog_weights() {
        let mut rng = StdRng::seed_from_u64(1);
        let deck = Deck::new(&mut rng);
        assert_eq!(deck.len(), full_deck_size());
        for (card, count) in deck.composition() {
            assert_eq!(count, card.copies_in_deck(), "copies of {}", card);
        }
    }

    #[test]
    fn empty_deck_replenishes() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut deck = Deck::from_cards(vec![MovementCard::new(1, 0)]);
        assert_eq!(deck.draw(&mut rng), MovementCard::new(1, 0));
        assert!(deck.is_empty());
        let _ = deck.draw(&mut rng);
        assert_eq!(deck.len(), full_deck_size() - 1);
    }
}
