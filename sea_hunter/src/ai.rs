use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::{Action, AiProfile, Coord, MovementCard, Phase};

/// Everything an AI player may look at when deciding.
///
/// Built by [`GameSession::advisor_view()`](crate::GameSession::advisor_view),
/// so the advisor never holds a reference into the session.
#[derive(Clone, Debug, PartialEq)]
pub struct AdvisorView {
    pub phase: Phase,
    pub board_size: i32,
    pub collection_distance: i32,
    /// `None` before placement.
    pub position: Option<Coord>,
    pub hand: Vec<MovementCard>,
    pub moves_remaining: u32,
    /// Live fish in spawn order.
    pub fish: Vec<Coord>,
    /// Where the fish will be after this round's cards, once any are down.
    pub predicted_fish: Option<Vec<Coord>>,
    pub opponents: Vec<Coord>,
    /// Reachable cells, during movement only.
    pub valid_moves: Vec<Coord>,
    /// Unoccupied cells, during placement only.
    pub free_cells: Vec<Coord>,
}

impl AdvisorView {
    fn on_board(&self, pos: Coord) -> bool {
        (0..self.board_size).contains(&pos.x) && (0..self.board_size).contains(&pos.y)
    }

    fn center(&self) -> Coord {
        Coord::new(self.board_size / 2, self.board_size / 2)
    }
}

/// Heuristic decision-maker for a non-human player.
///
/// Stateless between calls; the session owns the think timer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AiAdvisor {
    profile: AiProfile,
}

impl AiAdvisor {
    pub fn new(profile: AiProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> AiProfile {
        self.profile
    }

    /// Picks an action for the phase in `view`, or `None` if there is nothing
    /// sensible to do (for example an empty hand).
    ///
    /// An empty list of valid moves during movement yields
    /// [`Action::SkipMove`].
    pub fn decide<R: Rng + ?Sized>(&self, view: &AdvisorView, rng: &mut R) -> Option<Action> {
        match view.phase {
            Phase::Placement => view
                .free_cells
                .choose(rng)
                .map(|&Coord { x, y }| Action::PlaceVessel { x, y }),
            Phase::PlayCards => self
                .choose_card(view, rng)
                .map(|card_index| Action::PlayCard { card_index }),
            Phase::Movement => Some(match self.choose_move(view, rng) {
                Some(Coord { x, y }) => Action::MoveVessel { x, y },
                None => Action::SkipMove,
            }),
            Phase::Preparation | Phase::Resolution | Phase::GameOver => None,
        }
    }

    /// Returns an index into the hand.
    pub fn choose_card<R: Rng + ?Sized>(&self, view: &AdvisorView, rng: &mut R) -> Option<usize> {
        if view.hand.is_empty() {
            return None;
        }
        let random_index = |rng: &mut R| rng.gen_range(0..view.hand.len());
        if rng.gen::<f64>() < self.profile.random_factor {
            return Some(random_index(rng));
        }
        let Some(position) = view.position else {
            return Some(random_index(rng));
        };
        if view.fish.is_empty() {
            return Some(random_index(rng));
        }

        let mut best: Option<(usize, i32)> = None;
        for (index, &card) in view.hand.iter().enumerate() {
            let score = score_card(view, position, card);
            trace!(%card, score, "Card scored");
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((index, score));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Returns a target cell, or `None` to skip.
    pub fn choose_move<R: Rng + ?Sized>(&self, view: &AdvisorView, rng: &mut R) -> Option<Coord> {
        if view.valid_moves.is_empty() {
            return None;
        }
        if rng.gen::<f64>() < self.profile.random_factor {
            return view.valid_moves.choose(rng).copied();
        }

        let fish = view.predicted_fish.as_deref().unwrap_or(&view.fish);
        let mut scored: Vec<(f64, Coord)> = view
            .valid_moves
            .iter()
            .map(|&cell| (score_move(view, fish, cell), cell))
            .collect();
        // Stable, so equal scores keep the valid-move order.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        trace!(top = ?&scored[..scored.len().min(3)], "Moves scored");

        let top: Vec<Coord> = scored
            .iter()
            .take(3)
            .filter(|(score, _)| *score > 0.0)
            .map(|(_, cell)| *cell)
            .collect();
        top.choose(rng)
            .copied()
            .or_else(|| scored.first().map(|(_, cell)| *cell))
    }
}

/// How much playing `card` is expected to help the vessel at `position`.
pub fn score_card(view: &AdvisorView, position: Coord, card: MovementCard) -> i32 {
    let mut score = 0;

    let closest = view
        .fish
        .iter()
        .copied()
        .min_by_key(|fish| position.manhattan(*fish));
    if let Some(fish) = closest {
        let distance = position.manhattan(fish);
        let moved = card.apply(fish);
        let new_distance = position.manhattan(moved);
        if new_distance < distance {
            score += (distance - new_distance) * 10;
        }
        if new_distance <= view.collection_distance {
            score += 50;
        }
        if !view.on_board(moved) {
            score -= 30;
        }
    }

    for &opponent in &view.opponents {
        if position.manhattan(opponent) >= 5 {
            continue;
        }
        for &fish in &view.fish {
            let distance = opponent.manhattan(fish);
            if distance < 3 && opponent.manhattan(card.apply(fish)) < distance {
                score -= 20;
            }
        }
    }
    score
}

/// How attractive ending this round's move on `cell` is, given where the fish
/// will be.
pub fn score_move(view: &AdvisorView, fish: &[Coord], cell: Coord) -> f64 {
    let mut score = 0.0;
    for &fish in fish {
        let distance = cell.manhattan(fish);
        if distance <= view.collection_distance {
            score += 100.0;
        } else if distance <= 3 {
            score += f64::from(50 - distance * 10);
        } else if distance <= 5 {
            score += f64::from(20 - distance * 2);
        }
    }

    score -= 0.5 * f64::from(cell.manhattan(view.center()));

    for &opponent in &view.opponents {
        let distance = cell.manhattan(opponent);
        if distance < 3 {
            score -= f64::from((3 - distance) * 10);
        }
    }

    if (view.moves_remaining as i64 - 1) < 2 && score < 50.0 {
        score += 10.0;
    }
    score
}
