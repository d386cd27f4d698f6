use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Gravity timing for one difficulty, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GravityProfile {
    /// Interval at level 1.
    pub base: u64,
    /// Amount subtracted per level above 1.
    pub step: u64,
    /// Lower bound of the interval.
    pub floor: u64,
}

impl GravityProfile {
    /// Interval between gravity steps at `level` (1-based).
    #[must_use]
    pub fn interval(&self, level: usize) -> Duration {
        let levels_above_first = u64::try_from(level.saturating_sub(1)).unwrap_or(u64::MAX);
        let millis = self
            .base
            .saturating_sub(levels_above_first.saturating_mul(self.step))
            .max(self.floor);
        Duration::from_millis(millis)
    }
}

/// Selectable difficulty tier, controlling how fast gravity gets with level.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use drilltris_engine::Difficulty;
///
/// let difficulty: Difficulty = "hard".parse().unwrap();
/// assert_eq!(difficulty.gravity_interval(1), Duration::from_millis(300));
/// assert_eq!(difficulty.gravity_interval(3), Duration::from_millis(220));
/// assert_eq!(difficulty.gravity_interval(50), Duration::from_millis(80));
/// ```
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    #[must_use]
    pub const fn gravity_profile(self) -> GravityProfile {
        let (base, step, floor) = match self {
            Difficulty::Easy => (800, 30, 200),
            Difficulty::Medium => (500, 50, 100),
            Difficulty::Hard => (300, 40, 80),
            Difficulty::Expert => (150, 20, 50),
        };
        GravityProfile { base, step, floor }
    }

    #[must_use]
    pub fn gravity_interval(self, level: usize) -> Duration {
        self.gravity_profile().interval(level)
    }

    /// Next harder tier, wrapping around to [`Difficulty::Easy`].
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Expert,
            Difficulty::Expert => Difficulty::Easy,
        }
    }

    /// Next easier tier, wrapping around to [`Difficulty::Expert`].
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Expert,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
            Difficulty::Expert => Difficulty::Hard,
        }
    }
}
