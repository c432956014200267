use rand::rngs::StdRng;
use rand::SeedableRng;
use sea_hunter::{
    visualize_snapshot, Difficulty, GameResult, GameSession, Phase, PlayerSetup, PlayerStats,
};
use tracing::{debug, trace};

use crate::recording::Recorder;
use crate::Config;

pub enum GameOutcome {
    Finished(GameResult),
    /// Nobody reached the winning catch within the round limit.
    Abandoned,
}

pub struct GameReport {
    pub outcome: GameOutcome,
    /// Rounds that were resolved.
    pub rounds: u32,
    /// In seat order.
    pub stats: Vec<PlayerStats>,
}

/// Plays one game between AI seats by ticking the session until it ends.
///
/// Returns an error only on invalid setup or when the recording cannot be
/// written.
pub fn play_game(
    config: &Config,
    seats: &[Difficulty],
    seed: u64,
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<GameReport> {
    anyhow::ensure!(config.tick > 0.0, "Tick must be positive, got {}", config.tick);

    let setups = seats
        .iter()
        .enumerate()
        .map(|(seat, &difficulty)| {
            PlayerSetup::ai(&format!("{} {}", difficulty, seat + 1), difficulty)
        })
        .collect();
    let mut session =
        GameSession::with_rng(config.game.clone(), setups, StdRng::seed_from_u64(seed))?;
    if let Some(rec) = recorder.as_mut() {
        rec.start_game(seed, seats);
    }

    let mut last_recorded = None;
    let outcome = loop {
        if let Some(result) = session.result() {
            break GameOutcome::Finished(result.clone());
        }
        if session.round() > config.max_rounds {
            debug!(max_rounds = config.max_rounds, "Game abandoned");
            break GameOutcome::Abandoned;
        }
        if let Some((player, action)) = session.advance_tick(config.tick) {
            trace!(player, ?action, round = session.round(), "Action applied");
        }

        // One snapshot per round, taken when the next card phase opens.
        let at_round_start = session.phase() == Phase::PlayCards
            && session.current_player() == Some(session.start_player());
        let fresh = at_round_start && last_recorded != Some(session.round());
        if let Some(rec) = recorder.as_mut().filter(|_| fresh || session.is_over()) {
            rec.store_snapshot(session.snapshot());
            last_recorded = Some(session.round());
        }
    };

    debug!("Final board:\n{}", visualize_snapshot(&session.snapshot()));

    if let Some(rec) = recorder {
        let path = rec.write_game_recording()?;
        debug!(path = %path.display(), "Recording written");
    }

    let rounds = match outcome {
        GameOutcome::Finished(_) => session.round(),
        GameOutcome::Abandoned => session.round() - 1,
    };
    Ok(GameReport {
        outcome,
        rounds,
        stats: session.players().iter().map(|p| p.stats()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameRecording;

    #[test]
    fn hard_bots_finish_a_game() {
        let config = Config {
            max_rounds: 1000,
            ..Config::default()
        };
        let seats = [Difficulty::Hard, Difficulty::Hard];
        let report = play_game(&config, &seats, 17, &mut None).unwrap();
        assert_eq!(report.stats.len(), 2);
        match report.outcome {
            GameOutcome::Finished(result) => {
                for winner in result.winners() {
                    assert!(report.stats[winner].fish_collected >= 3);
                }
            }
            GameOutcome::Abandoned => assert_eq!(report.rounds, 1000),
        }
    }

    #[test]
    fn zero_round_limit_abandons_at_once() {
        let config = Config {
            max_rounds: 0,
            ..Config::default()
        };
        let seats = [Difficulty::Easy, Difficulty::Medium];
        let report = play_game(&config, &seats, 3, &mut None).unwrap();
        assert!(matches!(report.outcome, GameOutcome::Abandoned));
        assert_eq!(report.rounds, 0);
    }

    #[test]
    fn setup_errors_are_reported() {
        let config = Config::default();
        assert!(play_game(&config, &[Difficulty::Easy], 0, &mut None).is_err());
        let no_tick = Config {
            tick: 0.0,
            ..Config::default()
        };
        assert!(play_game(&no_tick, &[Difficulty::Easy; 2], 0, &mut None).is_err());
    }

    #[test]
    fn recording_holds_one_snapshot_per_round() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Some(Recorder::new(dir.path().to_path_buf()).unwrap());
        let config = Config {
            max_rounds: 5,
            ..Config::default()
        };
        let seats = [Difficulty::Easy, Difficulty::Hard, Difficulty::Medium];
        let report = play_game(&config, &seats, 99, &mut recorder).unwrap();

        let file = std::fs::File::open(dir.path().join("game_000001.json")).unwrap();
        let recording: GameRecording = serde_json::from_reader(file).unwrap();
        assert_eq!(recording.seed, 99);
        assert_eq!(recording.seats, seats);
        let rounds: Vec<u32> = recording.snapshots.iter().map(|s| s.round).collect();
        assert_eq!(rounds[0], 1);
        assert!(rounds.windows(2).all(|w| w[0] <= w[1]));
        assert!(rounds.len() as u32 >= report.rounds);

        assert!(Recorder::new(dir.path().join("missing")).is_err());
    }
}
