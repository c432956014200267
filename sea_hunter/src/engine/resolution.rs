use tracing::{debug, info, trace, warn};

use super::{GameSession, Phase};
use crate::{CellContent, Collection, Coord, FishId, GameResult, MovementCard, RoundSummary};

impl GameSession {
    /// Reveals the cards, pushes the fish, hands out catches and either ends
    /// the game or starts the next round.
    pub(super) fn resolve_round(&mut self) {
        self.enter_phase(Phase::Resolution);

        let revealed: Vec<_> = self
            .cards_played
            .iter()
            .map(|(&player, &card)| (player, card))
            .collect();
        let resultant: MovementCard = revealed.iter().map(|(_, card)| *card).sum();
        debug!(round = self.round, %resultant, "Cards revealed");

        let fish_lost = self.displace_fish(resultant);
        self.fish_to_add += fish_lost;
        let collections = self.collect_fish();

        self.last_round = Some(RoundSummary {
            round: self.round,
            revealed,
            resultant,
            fish_lost,
            collections,
        });

        if let Some(result) = self.check_victory() {
            info!(round = self.round, ?result, "Game over");
            self.result = Some(result);
            self.enter_phase(Phase::GameOver);
            return;
        }
        self.end_round();
    }

    /// Moves every fish by `resultant`. Returns how many left the board.
    ///
    /// All fish are lifted off the grid first, so the translation never sees
    /// a fish in its own way. A fish that lands on a vessel stays off the grid
    /// until the collection pass claims it.
    fn displace_fish(&mut self, resultant: MovementCard) -> usize {
        let mut lost = 0;
        let ids = self.fish.ids();
        for &id in &ids {
            let Some(fish) = self.fish.get(id).copied() else {
                continue;
            };
            if self.grid.get(fish.position.x, fish.position.y) == Some(CellContent::Fish(id)) {
                self.grid.remove(fish.position.x, fish.position.y);
            }
            let to = resultant.apply(fish.position);
            if !self.grid.is_valid_position(to.x, to.y) {
                self.fish.remove(id);
                lost += 1;
                debug!(from = %fish.position, "Fish swept off the board");
                continue;
            }
            if let Some(fish) = self.fish.get_mut(id) {
                fish.position = to;
            }
        }

        for id in ids {
            let Some(fish) = self.fish.get(id).copied() else {
                continue;
            };
            let Coord { x, y } = fish.position;
            match self.grid.get(x, y) {
                Some(CellContent::Empty) => {
                    // The cell is known to be empty and on the board.
                    let _ = self.grid.place(x, y, CellContent::Fish(id));
                }
                Some(CellContent::Vessel(owner)) => {
                    trace!(owner, pos = %fish.position, "Fish drifted under a vessel");
                }
                other => warn!(pos = %fish.position, ?other, "Fish landed on an occupied cell"),
            }
        }
        lost
    }

    /// Gives each fish, in spawn order, to the nearest vessel within reach.
    /// The earlier seat wins a tie.
    fn collect_fish(&mut self) -> Vec<Collection> {
        let reach = self.config.collection_distance as i32;
        let mut collections = Vec::new();
        for id in self.fish.ids() {
            let Some(fish) = self.fish.get(id).copied() else {
                continue;
            };
            let mut best: Option<(usize, i32)> = None;
            for player in &self.players {
                let Some(pos) = player.position() else {
                    continue;
                };
                let distance = pos.manhattan(fish.position);
                if distance <= reach && best.map_or(true, |(_, d)| distance < d) {
                    best = Some((player.id, distance));
                }
            }
            let Some((winner, distance)) = best else {
                continue;
            };
            self.remove_fish(id);
            self.players[winner].collect_fish();
            info!(player = winner, pos = %fish.position, distance, "Fish collected");
            collections.push(Collection {
                player: winner,
                position: fish.position,
            });
        }
        collections
    }

    fn remove_fish(&mut self, id: FishId) {
        if let Some(fish) = self.fish.remove(id) {
            if self.grid.get(fish.position.x, fish.position.y) == Some(CellContent::Fish(id)) {
                self.grid.remove(fish.position.x, fish.position.y);
            }
        }
    }

    fn check_victory(&self) -> Option<GameResult> {
        let winners: Vec<_> = self
            .players
            .iter()
            .filter(|p| p.is_winner(self.config.winning_fish_count))
            .map(|p| p.id)
            .collect();
        match winners.as_slice() {
            [] => None,
            [single] => Some(GameResult::Winner(*single)),
            _ => Some(GameResult::Tie(winners)),
        }
    }

    fn end_round(&mut self) {
        for player in self.players.iter_mut() {
            player.end_round();
        }
        for card in std::mem::take(&mut self.cards_played).into_values() {
            self.deck.return_card(card);
        }
        self.start_player = (self.start_player + 1) % self.players.len();
        self.round += 1;
        debug!(
            round = self.round,
            start_player = self.start_player,
            fish_to_add = self.fish_to_add,
            "Round finished"
        );
        self.begin_round();
    }
}
