use serde::{Deserialize, Serialize};

/// Score values for line clears.
///
/// Index corresponds to number of lines cleared by a single lock:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Points needed to advance one level.
pub const POINTS_PER_LEVEL: usize = 1000;

/// Game statistics tracking score, level, lines cleared, and piece count.
///
/// - **Score**: Points earned from line clears, scored once per lock using
///   the total number of rows that lock removed
/// - **Level**: `score / 1000 + 1`, never decreasing within a game
/// - **Completed pieces**: Total number of pieces locked
/// - **Line clear distribution**: Count of locks by rows cleared
///
/// # Example
///
/// ```
/// use drilltris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// assert_eq!(stats.record_lock(4), None);
/// assert_eq!(stats.record_lock(3), Some(2));
///
/// assert_eq!(stats.score(), 1300);
/// assert_eq!(stats.level(), 2);
/// assert_eq!(stats.total_cleared_lines(), 7);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: usize,
    level: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a tracker with all counters at zero and the level at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by rows cleared.
    ///
    /// `[0]` counts locks that cleared nothing, `[4]` counts four-row clears.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece locks.
    ///
    /// Returns the new level when this lock raised it.
    pub fn record_lock(&mut self, cleared_lines: usize) -> Option<usize> {
        self.completed_pieces += 1;
        if let Some(count) = self.line_cleared_counter.get_mut(cleared_lines) {
            *count += 1;
        }
        if cleared_lines == 0 {
            return None;
        }

        self.total_cleared_lines += cleared_lines;
        self.score += SCORE_TABLE.get(cleared_lines).copied().unwrap_or(0);

        let level = self.score / POINTS_PER_LEVEL + 1;
        (level > self.level).then(|| {
            self.level = level;
            level
        })
    }
}
