use std::{
    cmp::Reverse,
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write as _},
    path::Path,
};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use drilltris_engine::Difficulty;
use serde::{Deserialize, Serialize};

/// Number of entries kept on the leaderboard.
pub const MAX_ENTRIES: usize = 3;

/// A finished game on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: usize,
    pub player_name: String,
    pub difficulty: Difficulty,
    /// When the game ended (ISO 8601 in the file)
    pub date: DateTime<Utc>,
}

/// Best scores across sessions, highest first.
///
/// Stored as a JSON array of [`ScoreEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    /// Reads the leaderboard, starting empty if the file does not exist yet.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to open {}", path.display()));
            }
        };
        let entries: Vec<ScoreEntry> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Self::from_entries(entries))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }

        let file = File::create(path)
            .with_context(|| format!("failed to create file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("failed to write JSON to {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("failed to flush output to {}", path.display()))?;
        Ok(())
    }

    fn from_entries(mut entries: Vec<ScoreEntry>) -> Self {
        entries.sort_by_key(|e| Reverse(e.score));
        entries.truncate(MAX_ENTRIES);
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Inserts a finished game and returns whether it made the board.
    ///
    /// On equal scores the older entry ranks first.
    pub fn add_score(&mut self, entry: ScoreEntry) -> bool {
        let rank = self.entries.partition_point(|e| e.score >= entry.score);
        if rank >= MAX_ENTRIES {
            return false;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(MAX_ENTRIES);
        true
    }
}
