use std::{fmt, fmt::Write as _, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::piece::{Piece, PieceKind};

/// Produces the pieces of a game.
///
/// Every draw is an independent uniform choice among the eight kinds: there
/// is no bag and no history, so the same kind may come up any number of
/// times in a row.
///
/// The random source is a [`Pcg32`] seeded from a [`PieceSeed`], so a game
/// can be replayed piece for piece by reusing its seed. Tests and fixtures can
/// use [`Self::from_sequence`] to script the exact kinds instead.
///
/// # Example
///
/// ```
/// use drilltris_engine::{PieceFactory, PieceKind};
///
/// let mut factory = PieceFactory::from_sequence([PieceKind::P, PieceKind::I]);
/// assert_eq!(factory.create_random().kind(), PieceKind::P);
/// assert_eq!(factory.create_random().kind(), PieceKind::I);
/// assert_eq!(factory.create_random().kind(), PieceKind::P);
/// ```
#[derive(Debug, Clone)]
pub struct PieceFactory {
    source: Source,
}

#[derive(Debug, Clone)]
enum Source {
    Random(Pcg32),
    Sequence { kinds: Vec<PieceKind>, index: usize },
}

impl Default for PieceFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceFactory {
    /// Creates a factory with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            source: Source::Random(Pcg32::from_seed(seed.0)),
        }
    }

    /// Creates a factory that cycles through `kinds` in order.
    ///
    /// # Panics
    ///
    /// Panics if `kinds` is empty.
    #[must_use]
    pub fn from_sequence(kinds: impl IntoIterator<Item = PieceKind>) -> Self {
        let kinds: Vec<_> = kinds.into_iter().collect();
        assert!(!kinds.is_empty(), "piece sequence must not be empty");
        Self {
            source: Source::Sequence { kinds, index: 0 },
        }
    }

    /// Returns a new piece at the origin in its first rotation state.
    pub fn create_random(&mut self) -> Piece {
        let kind = match &mut self.source {
            Source::Random(rng) => rng.random::<PieceKind>(),
            Source::Sequence { kinds, index } => {
                let kind = kinds[*index % kinds.len()];
                *index += 1;
                kind
            }
        };
        Piece::new(kind)
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the factory's random number generator. Serialized and
/// parsed as a 32 character hex string.
///
/// # Example
///
/// ```
/// use drilltris_engine::{Board, PieceSeed};
///
/// let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// let board1 = Board::with_seed(seed);
/// let board2 = Board::with_seed(seed);
/// assert_eq!(board1.falling_piece(), board2.falling_piece());
/// assert_eq!(board1.next_piece(), board2.next_piece());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed {input:?}: {reason}")]
pub struct ParseSeedError {
    input: String,
    reason: &'static str,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParseSeedError {
            input: s.to_owned(),
            reason,
        };
        if s.len() != 32 {
            return Err(err("expected 32 hex characters"));
        }
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err("not a hex number"));
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err("not a hex number"))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{self}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}
