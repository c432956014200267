mod game;
mod recording;
pub use game::*;
pub use recording::*;

use sea_hunter::GameConfig;

/// Settings shared by every game of a run.
#[derive(Clone, Debug)]
pub struct Config {
    pub game: GameConfig,
    /// Simulated seconds fed to the session per tick.
    pub tick: f64,
    /// Games still running after this many rounds are abandoned.
    pub max_rounds: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            tick: 0.25,
            max_rounds: 200,
        }
    }
}
