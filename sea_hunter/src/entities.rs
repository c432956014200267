use serde::{Deserialize, Serialize};

use crate::{Coord, FishId, PlayerId};

/// A player's boat on the grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vessel {
    pub owner: PlayerId,
    pub position: Coord,
    /// Manhattan budget for this round's move.
    pub moves_remaining: u32,
    /// Lifetime counter; never decreases.
    pub fish_collected: u32,
}

impl Vessel {
    pub fn new(owner: PlayerId, position: Coord, movement_limit: u32) -> Self {
        Self {
            owner,
            position,
            moves_remaining: movement_limit,
            fish_collected: 0,
        }
    }

    pub fn can_move(&self) -> bool {
        self.moves_remaining > 0
    }

    /// Every fish in the hold costs one cell of mobility per round.
    pub fn reset_moves(&mut self, movement_limit: u32) {
        self.moves_remaining = movement_limit.saturating_sub(self.fish_collected);
    }

    pub fn collect_fish(&mut self) {
        self.fish_collected += 1;
        self.moves_remaining = self.moves_remaining.saturating_sub(1);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FishToken {
    pub id: FishId,
    pub position: Coord,
}

/// Owning storage for fish, indexed by [`FishId`].
///
/// Ids are never reused within a session, so iteration follows spawn order.
#[derive(Clone, Debug, Default)]
pub struct FishArena {
    slots: Vec<Option<FishToken>>,
}

impl FishArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, position: Coord) -> FishId {
        let id = FishId(self.slots.len());
        self.slots.push(Some(FishToken { id, position }));
        id
    }

    pub fn get(&self, id: FishId) -> Option<&FishToken> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: FishId) -> Option<&mut FishToken> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Destroys a fish.
    pub fn remove(&mut self, id: FishId) -> Option<FishToken> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    /// Live fish in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &FishToken> {
        self.slots.iter().flatten()
    }

    pub fn ids(&self) -> Vec<FishId> {
        self.iter().map(|fish| fish.id).collect()
    }

    pub fn positions(&self) -> Vec<Coord> {
        self.iter().map(|fish| fish.position).collect()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobility_shrinks_with_catch() {
        let mut vessel = Vessel::new(0, Coord::new(3, 3), 7);
        vessel.collect_fish();
        vessel.collect_fish();
        assert_eq!(vessel.moves_remaining, 5);
        vessel.reset_moves(7);
        assert_eq!(vessel.moves_remaining, 5);

        vessel.fish_collected = 9;
        vessel.reset_moves(7);
        assert_eq!(vessel.moves_remaining, 0);
        vessel.collect_fish();
        assert_eq!(vessel.moves_remaining, 0);
        assert!(!vessel.can_move());
    }

    #[test]
    fn arena_keeps_spawn_order() {
        let mut arena = FishArena::new();
        let a = arena.spawn(Coord::new(1, 1));
        let b = arena.spawn(Coord::new(2, 2));
        let c = arena.spawn(Coord::new(3, 3));
        assert!(arena.remove(b).is_some());
        assert!(arena.remove(b).is_none());
        assert_eq!(arena.ids(), vec![a, c]);
        assert_eq!(arena.len(), 2);
        let d = arena.spawn(Coord::new(4, 4));
        assert_eq!(d, FishId(3));
    }
}
