mod phase;
mod resolution;

pub use phase::*;

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, warn};

use crate::{
    Action, ActionRejected, AdvisorView, AiAdvisor, CellContent, Coord, Deck, FishArena, FishId,
    GameConfig, GameResult, Grid, MovementCard, Player, PlayerId, PlayerKind, PlayerSetup,
    PlayerView, RoundSummary, SetupError, Snapshot, Vessel,
};

/// One match: the grid, the deck, the players and the round state.
///
/// All mutation goes through the action methods, which validate the request
/// against the current phase and turn order and either apply it completely or
/// reject it without touching anything.
pub struct GameSession {
    config: GameConfig,
    grid: Grid,
    deck: Deck,
    players: Vec<Player>,
    fish: FishArena,
    rng: StdRng,
    phase: Phase,
    round: u32,
    start_player: PlayerId,
    /// How many players have acted in the current interactive phase.
    acted: usize,
    /// Face-down cards of this round.
    cards_played: BTreeMap<PlayerId, MovementCard>,
    fish_to_add: usize,
    first_round: bool,
    last_round: Option<RoundSummary>,
    result: Option<GameResult>,
    advisors: Vec<Option<AiAdvisor>>,
    think_timers: Vec<f64>,
}

impl GameSession {
    pub fn new(
        config: GameConfig,
        players: Vec<PlayerSetup>,
        seed: u64,
    ) -> Result<Self, SetupError> {
        Self::with_rng(config, players, StdRng::seed_from_u64(seed))
    }

    /// Like [`Self::new()`], with an explicit random source for deck shuffles,
    /// fish spawns and AI choices.
    pub fn with_rng(
        config: GameConfig,
        players: Vec<PlayerSetup>,
        mut rng: StdRng,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        if players.len() < config.min_players {
            return Err(SetupError::TooFewPlayers {
                min: config.min_players,
                got: players.len(),
            });
        }
        if players.len() > config.max_players {
            return Err(SetupError::TooManyPlayers {
                max: config.max_players,
                got: players.len(),
            });
        }

        let players: Vec<Player> = players
            .into_iter()
            .enumerate()
            .map(|(id, setup)| Player::new(id, setup))
            .collect();
        let advisors = players
            .iter()
            .map(|p| match p.kind {
                PlayerKind::Ai(profile) => Some(AiAdvisor::new(profile)),
                PlayerKind::Human => None,
            })
            .collect();
        let think_timers = vec![0.0; players.len()];

        Ok(Self {
            grid: Grid::new(config.board_size),
            deck: Deck::new(&mut rng),
            players,
            fish: FishArena::new(),
            rng,
            phase: Phase::Placement,
            round: 1,
            start_player: 0,
            acted: 0,
            cards_played: BTreeMap::new(),
            fish_to_add: 0,
            first_round: true,
            last_round: None,
            result: None,
            advisors,
            think_timers,
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Starts at 1 and increments after every resolved round.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn fish(&self) -> &FishArena {
        &self.fish
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn start_player(&self) -> PlayerId {
        self.start_player
    }

    /// Replacement fish owed to the next preparation, not counting the
    /// steady one-fish inflow.
    pub fn fish_to_add(&self) -> usize {
        self.fish_to_add
    }

    pub fn last_round(&self) -> Option<&RoundSummary> {
        self.last_round.as_ref()
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// The player whose action the session is waiting for.
    ///
    /// Placement goes in seat order; cards and movement go round-robin from
    /// the start player.
    pub fn current_player(&self) -> Option<PlayerId> {
        match self.phase {
            Phase::Placement => Some(self.acted),
            Phase::PlayCards | Phase::Movement => {
                Some((self.start_player + self.acted) % self.players.len())
            }
            _ => None,
        }
    }

    /// Submits an action for `player`.
    pub fn apply(&mut self, player: PlayerId, action: Action) -> Result<(), ActionRejected> {
        match action {
            Action::PlaceVessel { x, y } => self.place_vessel(player, x, y),
            Action::PlayCard { card_index } => self.play_card(player, card_index),
            Action::MoveVessel { x, y } => self.move_vessel(player, x, y),
            Action::SkipMove => self.skip_move(player),
        }
    }

    pub fn place_vessel(&mut self, player: PlayerId, x: i32, y: i32) -> Result<(), ActionRejected> {
        self.check_turn(player, Phase::Placement)?;
        if self.players[player].vessel.is_some() {
            return Err(ActionRejected::AlreadyPlaced);
        }
        self.grid.place(x, y, CellContent::Vessel(player))?;
        self.players[player].vessel = Some(Vessel::new(
            player,
            Coord::new(x, y),
            self.config.movement_limit,
        ));
        debug!(player, x, y, "Vessel placed");

        self.acted += 1;
        if self.acted == self.players.len() {
            self.begin_round();
        }
        Ok(())
    }

    pub fn play_card(&mut self, player: PlayerId, card_index: usize) -> Result<(), ActionRejected> {
        self.check_turn(player, Phase::PlayCards)?;
        let card = self.players[player].play_card(card_index)?;
        self.cards_played.insert(player, card);
        debug!(player, round = self.round, "Card played face-down");

        self.acted += 1;
        if self.acted == self.players.len() {
            self.enter_phase(Phase::Movement);
        }
        Ok(())
    }

    pub fn move_vessel(&mut self, player: PlayerId, x: i32, y: i32) -> Result<(), ActionRejected> {
        self.check_turn(player, Phase::Movement)?;
        let Some(vessel) = self.players[player].vessel.as_ref() else {
            return Err(ActionRejected::NoMovesRemaining);
        };
        if !vessel.can_move() {
            return Err(ActionRejected::NoMovesRemaining);
        }
        let from = vessel.position;
        let budget = vessel.moves_remaining;
        if !self.grid.is_valid_position(x, y) {
            return Err(ActionRejected::InvalidPosition { x, y });
        }
        if self.grid.is_occupied(x, y) {
            return Err(ActionRejected::CellOccupied { x, y });
        }
        let to = Coord::new(x, y);
        let distance = from.manhattan(to);
        if distance > budget as i32 {
            return Err(ActionRejected::MoveTooFar { distance, budget });
        }
        if !self.grid.move_occupant(from.x, from.y, x, y) {
            // Unreachable after the checks above, unless the grid and the
            // vessel disagree about where the vessel is.
            error!(player, %from, %to, "Vessel missing from its grid cell");
            return Err(ActionRejected::CellOccupied { x, y });
        }

        let p = &mut self.players[player];
        if let Some(vessel) = p.vessel.as_mut() {
            vessel.position = to;
        }
        p.total_distance_moved += distance as u32;
        p.has_moved = true;
        debug!(player, %from, %to, "Vessel moved");
        self.finish_movement_turn();
        Ok(())
    }

    pub fn skip_move(&mut self, player: PlayerId) -> Result<(), ActionRejected> {
        self.check_turn(player, Phase::Movement)?;
        self.players[player].has_moved = true;
        debug!(player, "Movement skipped");
        self.finish_movement_turn();
        Ok(())
    }

    /// Cells `player` could sail to right now, for highlighting.
    ///
    /// Empty when the player has no vessel.
    pub fn valid_moves(&self, player: PlayerId) -> Vec<Coord> {
        self.players
            .get(player)
            .and_then(|p| p.vessel.as_ref())
            .map(|v| {
                self.grid
                    .valid_moves(v.position.x, v.position.y, v.moves_remaining)
            })
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            round: self.round,
            board_size: self.grid.size(),
            current_player: self.current_player(),
            start_player: self.start_player,
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    id: p.id,
                    name: p.name.clone(),
                    color: p.color,
                    is_ai: p.is_ai(),
                    position: p.position(),
                    hand: p.hand.clone(),
                    has_played_card: p.has_played_card,
                    has_moved: p.has_moved,
                    fish_collected: p.fish_collected,
                    moves_remaining: p.moves_remaining(),
                    turns_played: p.turns_played,
                })
                .collect(),
            fish_positions: self.fish.positions(),
            last_round: self.last_round.clone(),
            result: self.result.clone(),
        }
    }

    /// The read-only picture an AI decides from.
    pub fn advisor_view(&self, player: PlayerId) -> Option<AdvisorView> {
        let me = self.players.get(player)?;
        let fish = self.fish.positions();
        let predicted_fish = (!self.cards_played.is_empty()).then(|| {
            let resultant: MovementCard = self.cards_played.values().sum();
            fish.iter()
                .map(|&pos| resultant.apply(pos))
                .filter(|pos| self.grid.is_valid_position(pos.x, pos.y))
                .collect()
        });
        Some(AdvisorView {
            phase: self.phase,
            board_size: self.grid.size(),
            collection_distance: self.config.collection_distance as i32,
            position: me.position(),
            hand: me.hand.clone(),
            moves_remaining: me.moves_remaining(),
            fish,
            predicted_fish,
            opponents: self
                .players
                .iter()
                .filter(|p| p.id != player)
                .filter_map(Player::position)
                .collect(),
            valid_moves: if self.phase == Phase::Movement {
                self.valid_moves(player)
            } else {
                Vec::new()
            },
            free_cells: if self.phase == Phase::Placement {
                self.grid.unoccupied_positions()
            } else {
                Vec::new()
            },
        })
    }

    /// Feeds elapsed time to the AI whose turn it is.
    ///
    /// Once the AI has thought for its profile's think time it decides and the
    /// decision is applied exactly as a human submission would be. At most one
    /// decision is made per tick; the applied action is returned.
    pub fn advance_tick(&mut self, dt: f64) -> Option<(PlayerId, Action)> {
        if !self.phase.awaits_player() {
            return None;
        }
        let player = self.current_player()?;
        let advisor = self.advisors[player]?;

        self.think_timers[player] += dt;
        if self.think_timers[player] < advisor.profile().think_time {
            return None;
        }
        self.think_timers[player] = 0.0;

        let decision = self
            .advisor_view(player)
            .and_then(|view| advisor.decide(&view, &mut self.rng));
        if let Some(action) = decision {
            match self.apply(player, action) {
                Ok(()) => return Some((player, action)),
                Err(err) => warn!(player, ?action, %err, "AI decision rejected, falling back"),
            }
        }

        let fallback = self.fallback_action(player)?;
        match self.apply(player, fallback) {
            Ok(()) => Some((player, fallback)),
            Err(err) => {
                error!(player, ?fallback, %err, "AI fallback rejected");
                None
            }
        }
    }

    /// A legal action for `player` that needs no judgement.
    fn fallback_action(&mut self, player: PlayerId) -> Option<Action> {
        match self.phase {
            Phase::Placement => self
                .grid
                .random_unoccupied(&mut self.rng)
                .map(|Coord { x, y }| Action::PlaceVessel { x, y }),
            Phase::PlayCards => (!self.players[player].hand.is_empty())
                .then_some(Action::PlayCard { card_index: 0 }),
            Phase::Movement => Some(Action::SkipMove),
            _ => None,
        }
    }

    fn check_turn(&self, player: PlayerId, phase: Phase) -> Result<(), ActionRejected> {
        if player >= self.players.len() {
            return Err(ActionRejected::UnknownPlayer(player));
        }
        if self.phase != phase {
            return Err(ActionRejected::WrongPhase { phase: self.phase });
        }
        match self.current_player() {
            Some(expected) if expected != player => {
                Err(ActionRejected::NotPlayersTurn { expected })
            }
            _ => Ok(()),
        }
    }

    fn enter_phase(&mut self, phase: Phase) {
        debug!(round = self.round, %phase, "Entering phase");
        self.phase = phase;
        self.acted = 0;
    }

    fn finish_movement_turn(&mut self) {
        self.acted += 1;
        if self.acted == self.players.len() {
            self.resolve_round();
        }
    }

    /// Spawns fish, refills hands and resets movement budgets, then opens the
    /// card phase.
    fn begin_round(&mut self) {
        self.enter_phase(Phase::Preparation);

        let to_spawn = if self.first_round {
            self.players.len() * self.config.initial_fish_per_player
        } else {
            self.fish_to_add + 1
        };
        self.first_round = false;
        self.fish_to_add = 0;
        for _ in 0..to_spawn {
            if self.spawn_random_fish().is_none() {
                debug!(round = self.round, "No free cell left for a new fish");
                break;
            }
        }

        for player in self.players.iter_mut() {
            if let Some(vessel) = player.vessel.as_mut() {
                vessel.reset_moves(self.config.movement_limit);
            }
            player.refill_hand(&mut self.deck, &mut self.rng, self.config.hand_size);
        }
        self.cards_played.clear();
        self.enter_phase(Phase::PlayCards);
    }

    fn spawn_random_fish(&mut self) -> Option<FishId> {
        let pos = self.grid.random_unoccupied(&mut self.rng)?;
        self.spawn_fish_at(pos).ok()
    }

    /// Puts a new fish on an empty cell.
    pub fn spawn_fish_at(&mut self, pos: Coord) -> Result<FishId, ActionRejected> {
        if !self.grid.is_valid_position(pos.x, pos.y) {
            return Err(ActionRejected::InvalidPosition { x: pos.x, y: pos.y });
        }
        if self.grid.is_occupied(pos.x, pos.y) {
            return Err(ActionRejected::CellOccupied { x: pos.x, y: pos.y });
        }
        let id = self.fish.spawn(pos);
        self.grid.place(pos.x, pos.y, CellContent::Fish(id))?;
        debug!(%pos, "Fish spawned");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::Difficulty;

    pub(super) fn two_humans() -> GameSession {
        GameSession::new(
            GameConfig::default(),
            vec![PlayerSetup::human("Ana"), PlayerSetup::human("Bia")],
            42,
        )
        .unwrap()
    }

    /// Places both vessels, then removes every fish so tests start from a
    /// known board.
    pub(super) fn placed(at: [(i32, i32); 2]) -> GameSession {
        let mut session = two_humans();
        for (id, (x, y)) in at.into_iter().enumerate() {
            session.place_vessel(id, x, y).unwrap();
        }
        session.clear_fish();
        session
    }

    impl GameSession {
        pub(super) fn clear_fish(&mut self) {
            for id in self.fish.ids() {
                if let Some(fish) = self.fish.remove(id) {
                    self.grid.remove(fish.position.x, fish.position.y);
                }
            }
        }

        pub(super) fn set_hand(&mut self, player: PlayerId, hand: Vec<MovementCard>) {
            self.players[player].hand = hand;
        }
    }

    #[test]
    fn setup_checks_player_count() {
        let one = GameSession::new(GameConfig::default(), vec![PlayerSetup::human("solo")], 0);
        assert!(matches!(one, Err(SetupError::TooFewPlayers { min: 2, got: 1 })));
        let five = (0..5).map(|_| PlayerSetup::human("x")).collect();
        let five = GameSession::new(GameConfig::default(), five, 0);
        assert!(matches!(five, Err(SetupError::TooManyPlayers { max: 4, got: 5 })));
    }

    #[test]
    fn placement_goes_in_seat_order() {
        let mut session = two_humans();
        assert_eq!(session.phase(), Phase::Placement);
        assert_eq!(
            session.place_vessel(1, 3, 3),
            Err(ActionRejected::NotPlayersTurn { expected: 0 })
        );
        assert_eq!(
            session.place_vessel(0, 20, 3),
            Err(ActionRejected::InvalidPosition { x: 20, y: 3 })
        );
        session.place_vessel(0, 3, 3).unwrap();
        assert_eq!(
            session.place_vessel(1, 3, 3),
            Err(ActionRejected::CellOccupied { x: 3, y: 3 })
        );
        assert_eq!(session.phase(), Phase::Placement);
        session.place_vessel(1, 4, 4).unwrap();

        // Preparation ran straight through.
        assert_eq!(session.phase(), Phase::PlayCards);
        assert_eq!(session.fish().len(), 2);
        assert!(session.players().iter().all(|p| p.hand.len() == 3));
        assert_eq!(
            session.play_card(5, 0),
            Err(ActionRejected::UnknownPlayer(5))
        );
        assert_eq!(
            session.place_vessel(0, 5, 5),
            Err(ActionRejected::WrongPhase {
                phase: Phase::PlayCards
            })
        );
    }

    #[test]
    fn card_and_movement_rejections_leave_state_alone() {
        let mut session = placed([(0, 0), (19, 19)]);
        let before = session.snapshot();
        assert_eq!(
            session.play_card(1, 0),
            Err(ActionRejected::NotPlayersTurn { expected: 0 })
        );
        assert_eq!(
            session.play_card(0, 3),
            Err(ActionRejected::CardNotInHand {
                index: 3,
                hand_len: 3
            })
        );
        assert_eq!(
            session.skip_move(0),
            Err(ActionRejected::WrongPhase {
                phase: Phase::PlayCards
            })
        );
        assert_eq!(session.snapshot(), before);

        session.play_card(0, 0).unwrap();
        session.play_card(1, 2).unwrap();
        assert_eq!(session.phase(), Phase::Movement);
        assert_eq!(session.player(0).unwrap().hand.len(), 2);

        assert_eq!(
            session.move_vessel(0, 8, 0),
            Err(ActionRejected::MoveTooFar {
                distance: 8,
                budget: 7
            })
        );
        assert_eq!(
            session.move_vessel(0, 0, 0),
            Err(ActionRejected::CellOccupied { x: 0, y: 0 })
        );
        assert_eq!(
            session.move_vessel(0, -1, 0),
            Err(ActionRejected::InvalidPosition { x: -1, y: 0 })
        );
        session.move_vessel(0, 3, 4).unwrap();
        assert_eq!(session.player(0).unwrap().position(), Some(Coord::new(3, 4)));
        assert_eq!(session.grid().get(3, 4), Some(CellContent::Vessel(0)));
        assert_eq!(session.grid().get(0, 0), Some(CellContent::Empty));
        assert_eq!(session.player(0).unwrap().total_distance_moved, 7);
        assert_eq!(
            session.move_vessel(0, 3, 5),
            Err(ActionRejected::NotPlayersTurn { expected: 1 })
        );
    }

    #[test]
    fn immobile_vessel_must_skip() {
        let mut session = placed([(0, 0), (19, 19)]);
        session.play_card(0, 0).unwrap();
        session.play_card(1, 0).unwrap();
        if let Some(vessel) = session.players[0].vessel.as_mut() {
            vessel.moves_remaining = 0;
        }
        assert!(session.valid_moves(0).is_empty());
        assert_eq!(
            session.move_vessel(0, 1, 0),
            Err(ActionRejected::NoMovesRemaining)
        );
        session.skip_move(0).unwrap();
        assert!(session.player(0).unwrap().has_moved);
    }

    #[test]
    fn start_player_rotates_each_round() {
        let mut session = placed([(0, 0), (19, 19)]);
        assert_eq!(session.current_player(), Some(0));
        session.play_card(0, 0).unwrap();
        session.play_card(1, 0).unwrap();
        assert_eq!(session.current_player(), Some(0));
        session.skip_move(0).unwrap();
        session.skip_move(1).unwrap();

        assert_eq!(session.round(), 2);
        assert_eq!(session.start_player(), 1);
        assert_eq!(session.current_player(), Some(1));
        assert_eq!(
            session.play_card(0, 0),
            Err(ActionRejected::NotPlayersTurn { expected: 1 })
        );
        session.play_card(1, 0).unwrap();
        session.play_card(0, 0).unwrap();
        assert_eq!(session.current_player(), Some(1));
        assert!(session.players().iter().all(|p| p.turns_played == 1));
    }

    #[test]
    fn ai_plays_a_whole_game_through_ticks() {
        let mut session = GameSession::new(
            GameConfig::default(),
            vec![
                PlayerSetup::ai("CPU 1", Difficulty::Easy),
                PlayerSetup::ai("CPU 2", Difficulty::Hard),
                PlayerSetup::ai("CPU 3", Difficulty::Medium),
            ],
            2024,
        )
        .unwrap();
        let mut ticks = 0;
        while !session.is_over() && session.round() <= 300 {
            session.advance_tick(0.5);
            ticks += 1;
            assert!(ticks < 1_000_000);
        }
        assert!(session.players().iter().all(|p| p.vessel.is_some()));
        if let Some(result) = session.result() {
            for id in result.winners() {
                assert!(session.player(id).unwrap().fish_collected >= 3);
            }
        }
    }

    #[test]
    fn think_time_gates_ai_decisions() {
        let mut session = GameSession::new(
            GameConfig::default(),
            vec![
                PlayerSetup::ai("CPU", Difficulty::Hard),
                PlayerSetup::human("Ana"),
            ],
            5,
        )
        .unwrap();
        assert_eq!(session.advance_tick(1.0), None);
        let (player, action) = session.advance_tick(0.5).unwrap();
        assert_eq!(player, 0);
        assert!(matches!(action, Action::PlaceVessel { .. }));
        // Humans never act on their own.
        assert_eq!(session.advance_tick(10.0), None);
        assert_eq!(session.current_player(), Some(1));
    }

    quickcheck! {
        fn snapshot_is_idempotent(seed: u64, ticks: u8) -> bool {
            let mut session = GameSession::new(
                GameConfig::default(),
                vec![
                    PlayerSetup::ai("a", Difficulty::Easy),
                    PlayerSetup::ai("b", Difficulty::Medium),
                ],
                seed,
            )
            .unwrap();
            for _ in 0..ticks {
                session.advance_tick(0.5);
            }
            session.snapshot() == session.snapshot()
        }

        fn budget_matches_catch_after_preparation(seed: u64, ticks: u16) -> bool {
            let mut session = GameSession::new(
                GameConfig::default(),
                vec![
                    PlayerSetup::ai("a", Difficulty::Hard),
                    PlayerSetup::ai("b", Difficulty::Hard),
                ],
                seed,
            )
            .unwrap();
            for _ in 0..ticks % 400 {
                session.advance_tick(1.5);
            }
            if session.phase() != Phase::PlayCards {
                return true;
            }
            let limit = session.config().movement_limit;
            session.players().iter().all(|p| {
                p.moves_remaining() == limit.saturating_sub(p.fish_collected)
            })
        }
    }
}
