use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use sea_hunter::{Difficulty, Snapshot};
use serde::{Deserialize, Serialize};

/// Writes one JSON file per game into a directory.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
    recording: GameRecording,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: 1,
            directory,
            recording: GameRecording::default(),
        })
    }

    /// Starts collecting snapshots for a new game.
    pub fn start_game(&mut self, seed: u64, seats: &[Difficulty]) {
        self.recording = GameRecording {
            seed,
            seats: seats.to_vec(),
            snapshots: Vec::new(),
        };
    }

    pub fn store_snapshot(&mut self, snapshot: Snapshot) {
        self.recording.snapshots.push(snapshot);
    }

    /// Writes `game_000001.json`, `game_000002.json`, … in turn.
    pub fn write_game_recording(&mut self) -> anyhow::Result<PathBuf> {
        let filepath = self.directory.join(format!("game_{:0>6}.json", self.num));
        let mut writer = BufWriter::new(File::create(&filepath)?);
        serde_json::to_writer_pretty(&mut writer, &std::mem::take(&mut self.recording))?;
        writeln!(writer)?;
        writer.flush()?;
        self.num += 1;
        Ok(filepath)
    }
}

#[derive(Default, Serialize, Deserialize)]
pub struct GameRecording {
    pub seed: u64,
    pub seats: Vec<Difficulty>,
    /// The board after placement and after every resolved round.
    pub snapshots: Vec<Snapshot>,
}
