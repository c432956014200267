use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;
use judge::{play_game, Config, GameOutcome, Recorder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sea_hunter::{Difficulty, GameConfig, GameResult};
use tracing::{debug, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// AI difficulty of each seat: "easy", "medium" or "hard"
    #[clap(num_args(2..=4), value_delimiter = ' ', required = true)]
    difficulties: Vec<Difficulty>,

    /// How many games to play
    #[arg(short, long, default_value_t = 100)]
    num_games: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a JSON file overriding the game rules
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulated seconds per tick
    #[arg(short, long, default_value_t = 0.25)]
    tick: f64,

    /// Abandon games that last longer than this many rounds
    #[arg(short, long, default_value_t = 200)]
    max_rounds: u32,

    /// Record every game's snapshots as JSON files into this directory
    #[arg(short, long)]
    record_games_to_directory: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

struct MatchScore {
    wins: Vec<usize>,
    fish: Vec<u32>,
    ties: usize,
    abandoned: usize,
    rounds: u64,
}

impl MatchScore {
    fn new(num_seats: usize) -> Self {
        Self {
            wins: vec![0; num_seats],
            fish: vec![0; num_seats],
            ties: 0,
            abandoned: 0,
            rounds: 0,
        }
    }
}

fn load_game_config(path: Option<&PathBuf>) -> anyhow::Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let file = std::fs::File::open(path)?;
    let config: GameConfig = serde_json::from_reader(std::io::BufReader::new(file))?;
    config.validate()?;
    Ok(config)
}

fn play_matchup(
    config: &Config,
    seats: &[Difficulty],
    num_games: usize,
    rng: &mut StdRng,
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<MatchScore> {
    let mut match_score = MatchScore::new(seats.len());

    for game_idx in 0..num_games {
        let seed: u64 = rng.gen();
        let report = play_game(config, seats, seed, recorder)?;
        match report.outcome {
            GameOutcome::Finished(GameResult::Winner(seat)) => {
                debug!(winner = seat, game_idx, rounds = report.rounds);
                match_score.wins[seat] += 1;
            }
            GameOutcome::Finished(GameResult::Tie(winners)) => {
                debug!(?winners, game_idx, "Tie");
                match_score.ties += 1;
            }
            GameOutcome::Abandoned => {
                info!(game_idx, seed, "Game abandoned");
                match_score.abandoned += 1;
            }
        }
        for (total, stats) in match_score.fish.iter_mut().zip(&report.stats) {
            *total += stats.fish_collected;
        }
        match_score.rounds += u64::from(report.rounds);
    }

    Ok(match_score)
}

fn print_match_results(seats: &[Difficulty], score: &MatchScore, num_games: usize) {
    eprintln!("End result of {}:", seats.iter().join(" vs "));
    for (seat, difficulty) in seats.iter().enumerate() {
        eprintln!(
            "- {} wins by seat {} ({}), {} fish caught",
            score.wins[seat],
            seat + 1,
            difficulty,
            score.fish[seat]
        );
    }
    eprintln!("- {} ties", score.ties);
    eprintln!("- {} abandoned", score.abandoned);
    if num_games > 0 {
        eprintln!(
            "- {:.1} rounds per game",
            score.rounds as f64 / num_games as f64
        );
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut recorder = if let Some(dir_path) = args.record_games_to_directory {
        Some(Recorder::new(dir_path)?)
    } else {
        None
    };

    let config = Config {
        game: load_game_config(args.config.as_ref())?,
        tick: args.tick,
        max_rounds: args.max_rounds,
    };

    let match_score = play_matchup(
        &config,
        &args.difficulties,
        args.num_games,
        &mut rng,
        &mut recorder,
    )?;
    print_match_results(&args.difficulties, &match_score, args.num_games);

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
