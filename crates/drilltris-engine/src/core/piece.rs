use std::{fmt, str::FromStr};

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Largest mask edge of any piece (the I piece uses a 4×4 box).
pub const MAX_SHAPE_SIZE: usize = 4;

/// A falling piece: kind, rotation state, and top-left board position.
///
/// Collision awareness lives in the [`Board`](crate::Board); a `Piece` only
/// knows how to step its rotation state and translate itself.
///
/// # Example
///
/// ```
/// use drilltris_engine::{Piece, PieceKind};
///
/// let mut piece = Piece::new(PieceKind::T);
/// piece.move_by(3, 0);
/// piece.rotate();
/// assert_eq!(piece.rotation(), 1);
/// assert_eq!(piece.position().x(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: usize,
    position: PiecePosition,
}

impl Piece {
    #[must_use]
    pub const fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: 0,
            position: PiecePosition::ORIGIN,
        }
    }

    /// Returns the same piece moved to `(x, y)`.
    #[must_use]
    pub const fn at(self, x: i32, y: i32) -> Self {
        Self {
            position: PiecePosition::new(x, y),
            ..self
        }
    }

    /// Returns the same piece in rotation state `rotation`.
    #[must_use]
    pub fn with_rotation(mut self, rotation: usize) -> Self {
        self.set_rotation(rotation);
        self
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn rotation(&self) -> usize {
        self.rotation
    }

    #[must_use]
    pub const fn rotation_count(&self) -> usize {
        self.kind.rotation_states().len()
    }

    #[must_use]
    pub const fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub const fn mask(&self) -> ShapeMask {
        self.kind.rotation_states()[self.rotation]
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.mask().width()
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.mask().height()
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.kind.color()
    }

    /// Advances to the next rotation state, wrapping after the last one.
    pub fn rotate(&mut self) {
        self.rotation = (self.rotation + 1) % self.rotation_count();
    }

    /// Jumps straight to rotation state `rotation`.
    ///
    /// # Panics
    ///
    /// Panics if `rotation` is not a valid state index for this kind.
    pub fn set_rotation(&mut self, rotation: usize) {
        assert!(
            rotation < self.rotation_count(),
            "rotation {rotation} out of range for {} piece",
            self.kind.as_char()
        );
        self.rotation = rotation;
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.position = self.position.offset(dx, dy);
    }

    /// Absolute board coordinates `(x, y)` of every occupied mask cell.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let PiecePosition { x, y } = self.position;
        self.mask()
            .occupied_cells()
            .map(move |(dx, dy)| (x + dx as i32, y + dy as i32))
    }
}

/// Compact text form `K#r@x,y` (e.g. `T#1@4,18`).
impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation,
            self.position.x,
            self.position.y
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece notation '{input}': {reason}")]
pub struct ParsePieceError {
    input: String,
    reason: &'static str,
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParsePieceError {
            input: s.to_owned(),
            reason,
        };

        let (kind, rest) = s.split_once('#').ok_or_else(|| err("missing '#'"))?;
        let (rotation, position) = rest.split_once('@').ok_or_else(|| err("missing '@'"))?;
        let (x, y) = position
            .split_once(',')
            .ok_or_else(|| err("missing ','"))?;

        let mut chars = kind.chars();
        let kind = match (chars.next(), chars.next()) {
            (Some(c), None) => PieceKind::from_char(c).ok_or_else(|| err("unknown piece kind"))?,
            _ => return Err(err("piece kind must be a single character")),
        };
        let rotation = rotation
            .parse::<usize>()
            .map_err(|_| err("invalid rotation"))?;
        if rotation >= kind.rotation_states().len() {
            return Err(err("rotation out of range"));
        }
        let x = x.parse::<i32>().map_err(|_| err("invalid x coordinate"))?;
        let y = y.parse::<i32>().map_err(|_| err("invalid y coordinate"))?;

        Ok(Piece::new(kind).with_rotation(rotation).at(x, y))
    }
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Top-left corner of a piece's mask on the board.
///
/// Coordinates are signed: a wall kick may try a column left of the board
/// before the collision test rejects it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    pub const ORIGIN: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Display color of a piece, as an RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    /// Builds a color from a `0xRRGGBB` literal.
    #[must_use]
    pub const fn from_rgb(rgb: u32) -> Self {
        let [_, r, g, b] = rgb.to_be_bytes();
        Self { r, g, b }
    }

    #[must_use]
    pub const fn r(self) -> u8 {
        self.r
    }

    #[must_use]
    pub const fn g(self) -> u8 {
        self.g
    }

    #[must_use]
    pub const fn b(self) -> u8 {
        self.b
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// The eight piece variants.
///
/// Seven are the classic tetrominoes; [`PieceKind::P`] is a single cell that
/// drills through the stack (see [`Board::move_by`](crate::Board::move_by)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// L-piece.
    L = 3,
    /// J-piece.
    J = 4,
    /// S-piece.
    S = 5,
    /// Z-piece.
    Z = 6,
    /// Penetrating single-cell piece.
    P = 7,
}

/// Uniform draw over all eight kinds.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..PieceKind::LEN) {
            1 => PieceKind::O,
            2 => PieceKind::T,
            3 => PieceKind::L,
            4 => PieceKind::J,
            5 => PieceKind::S,
            6 => PieceKind::Z,
            7 => PieceKind::P,
            _ => PieceKind::I,
        }
    }
}

impl PieceKind {
    /// Number of piece kinds (8).
    pub const LEN: usize = 8;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::P,
    ];

    /// Ordered, cyclic list of shape masks for this kind.
    #[must_use]
    pub const fn rotation_states(self) -> &'static [ShapeMask] {
        match self {
            PieceKind::I => I_STATES,
            PieceKind::O => O_STATES,
            PieceKind::T => T_STATES,
            PieceKind::L => L_STATES,
            PieceKind::J => J_STATES,
            PieceKind::S => S_STATES,
            PieceKind::Z => Z_STATES,
            PieceKind::P => P_STATES,
        }
    }

    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            PieceKind::I => Color::from_rgb(0x5C_BD_BD),
            PieceKind::O => Color::from_rgb(0xE6_D5_5A),
            PieceKind::T => Color::from_rgb(0x99_66_CC),
            PieceKind::L => Color::from_rgb(0xE6_A8_5C),
            PieceKind::J => Color::from_rgb(0x5A_7B_C7),
            PieceKind::S => Color::from_rgb(0x6B_C5_6B),
            PieceKind::Z => Color::from_rgb(0xD8_56_56),
            PieceKind::P => Color::from_rgb(0xCC_66_CC),
        }
    }

    /// Whether this kind drills through the stack when falling.
    #[must_use]
    pub const fn is_penetrating(self) -> bool {
        matches!(self, PieceKind::P)
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use drilltris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::P.as_char(), 'P');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::P => 'P',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use drilltris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('P'), Some(PieceKind::P));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'P' => Some(PieceKind::P),
            _ => None,
        }
    }
}

/// Rectangular occupancy mask of one rotation state.
///
/// Row `y` is stored as a bit set where bit `x` marks an occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMask {
    width: usize,
    height: usize,
    rows: [u8; MAX_SHAPE_SIZE],
}

impl ShapeMask {
    /// Parses `|`-separated rows of `#` (occupied) and `.` (empty).
    ///
    /// Evaluated at compile time for the built-in tables, so malformed art
    /// fails the build.
    const fn parse(art: &str) -> Self {
        let bytes = art.as_bytes();
        let mut rows = [0; MAX_SHAPE_SIZE];
        let mut width = 0;
        let mut height = 0;
        let mut x = 0;
        let mut i = 0;
        while i <= bytes.len() {
            if i == bytes.len() || bytes[i] == b'|' {
                if height == 0 {
                    width = x;
                }
                assert!(x == width, "mask rows must have equal width");
                height += 1;
                x = 0;
            } else {
                assert!(x < MAX_SHAPE_SIZE, "mask row too wide");
                assert!(height < MAX_SHAPE_SIZE, "mask too tall");
                match bytes[i] {
                    b'#' => rows[height] |= 1 << x,
                    b'.' => {}
                    _ => panic!("mask cells must be '#' or '.'"),
                }
                x += 1;
            }
            i += 1;
        }
        Self {
            width,
            height,
            rows,
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub const fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height() && self.rows[y] & (1 << x) != 0
    }

    /// Mask-relative `(x, y)` of occupied cells, row-major.
    pub fn occupied_cells(self) -> impl Iterator<Item = (usize, usize)> {
        (0..self.height())
            .flat_map(move |y| (0..self.width()).map(move |x| (x, y)))
            .filter(move |&(x, y)| self.is_occupied(x, y))
    }
}

const I_STATES: &[ShapeMask] = &[
    ShapeMask::parse("....|####|....|...."),
    ShapeMask::parse("..#.|..#.|..#.|..#."),
];
const O_STATES: &[ShapeMask] = &[ShapeMask::parse("##|##")];
const T_STATES: &[ShapeMask] = &[
    ShapeMask::parse(".#.|###|..."),
    ShapeMask::parse(".#.|.##|.#."),
    ShapeMask::parse("...|###|.#."),
    ShapeMask::parse(".#.|##.|.#."),
];
const L_STATES: &[ShapeMask] = &[
    ShapeMask::parse("...|###|#.."),
    ShapeMask::parse("##.|.#.|.#."),
    ShapeMask::parse("..#|###|..."),
    ShapeMask::parse(".#.|.#.|.##"),
];
const J_STATES: &[ShapeMask] = &[
    ShapeMask::parse("...|###|..#"),
    ShapeMask::parse(".#.|.#.|##."),
    ShapeMask::parse("#..|###|..."),
    ShapeMask::parse(".##|.#.|.#."),
];
const S_STATES: &[ShapeMask] = &[
    ShapeMask::parse("...|.##|##."),
    ShapeMask::parse(".#.|.##|..#"),
];
const Z_STATES: &[ShapeMask] = &[
    ShapeMask::parse("...|##.|.##"),
    ShapeMask::parse("..#|.##|.#."),
];
const P_STATES: &[ShapeMask] = &[ShapeMask::parse("#")];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_counts() {
        let counts: Vec<_> = PieceKind::ALL
            .iter()
            .map(|kind| kind.rotation_states().len())
            .collect();
        assert_eq!(counts, [2, 1, 4, 4, 4, 2, 2, 1]);
    }

    #[test]
    fn test_mask_dimensions() {
        assert_eq!((Piece::new(PieceKind::I).width(), Piece::new(PieceKind::I).height()), (4, 4));
        assert_eq!((Piece::new(PieceKind::O).width(), Piece::new(PieceKind::O).height()), (2, 2));
        assert_eq!((Piece::new(PieceKind::P).width(), Piece::new(PieceKind::P).height()), (1, 1));
        for kind in [PieceKind::T, PieceKind::L, PieceKind::J, PieceKind::S, PieceKind::Z] {
            let piece = Piece::new(kind);
            assert_eq!((piece.width(), piece.height()), (3, 3), "{kind:?}");
        }
    }

    #[test]
    fn test_every_state_has_cells() {
        for kind in PieceKind::ALL {
            let expected = if kind.is_penetrating() { 1 } else { 4 };
            for mask in kind.rotation_states() {
                assert_eq!(mask.occupied_cells().count(), expected, "{kind:?}");
            }
        }
    }

    #[test]
    fn test_mask_parse() {
        let mask = ShapeMask::parse(".#.|###|...");
        assert!(mask.is_occupied(1, 0));
        assert!(!mask.is_occupied(0, 0));
        assert!(mask.is_occupied(2, 1));
        assert!(!mask.is_occupied(1, 2));
        assert!(!mask.is_occupied(3, 0), "outside the mask is never occupied");
        assert_eq!(
            mask.occupied_cells().collect::<Vec<_>>(),
            [(1, 0), (0, 1), (1, 1), (2, 1)]
        );
    }

    #[test]
    fn test_rotate_cycles() {
        let mut piece = Piece::new(PieceKind::T);
        let states: Vec<_> = (0..5)
            .map(|_| {
                let rotation = piece.rotation();
                piece.rotate();
                rotation
            })
            .collect();
        assert_eq!(states, [0, 1, 2, 3, 0]);
        assert_eq!(piece.mask(), PieceKind::T.rotation_states()[1]);
    }

    #[test]
    fn test_single_state_rotate_is_noop() {
        for kind in [PieceKind::O, PieceKind::P] {
            let mut piece = Piece::new(kind);
            let before = piece.mask();
            piece.rotate();
            assert_eq!(piece.rotation(), 0);
            assert_eq!(piece.mask(), before);
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_set_rotation_out_of_range() {
        Piece::new(PieceKind::S).set_rotation(2);
    }

    #[test]
    fn test_move_and_occupied_positions() {
        let mut piece = Piece::new(PieceKind::O);
        piece.move_by(3, 5);
        piece.move_by(-1, 1);
        assert_eq!(piece.position(), PiecePosition::new(2, 6));
        assert_eq!(
            piece.occupied_positions().collect::<Vec<_>>(),
            [(2, 6), (3, 6), (2, 7), (3, 7)]
        );
    }

    #[test]
    fn test_colors() {
        assert_eq!(PieceKind::I.color().to_string(), "#5CBDBD");
        assert_eq!(PieceKind::P.color().to_string(), "#CC66CC");
        let color = PieceKind::Z.color();
        assert_eq!((color.r(), color.g(), color.b()), (0xD8, 0x56, 0x56));
    }

    #[test]
    fn test_uniform_sample_covers_all_kinds() {
        use rand::SeedableRng as _;

        let mut rng = rand_pcg::Pcg32::seed_from_u64(7);
        let mut seen = [0usize; PieceKind::LEN];
        for _ in 0..8000 {
            let kind: PieceKind = rng.random();
            seen[kind as usize] += 1;
        }
        for (i, count) in seen.iter().enumerate() {
            assert!(
                (800..1200).contains(count),
                "{:?} drawn {count} times",
                PieceKind::ALL[i]
            );
        }
    }

    #[test]
    fn test_piece_notation() {
        let piece = Piece::new(PieceKind::S).with_rotation(1).at(4, 18);
        assert_eq!(piece.to_string(), "S#1@4,18");
        assert_eq!("S#1@4,18".parse::<Piece>().unwrap(), piece);
        assert_eq!(
            "I#0@-1,3".parse::<Piece>().unwrap().position(),
            PiecePosition::new(-1, 3)
        );
    }

    #[test]
    fn test_piece_serialization() {
        let piece = Piece::new(PieceKind::P).at(7, 2);
        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(serialized, "\"P#0@7,2\"");
        let deserialized: Piece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, piece);
    }

    #[test]
    fn test_piece_notation_errors() {
        assert!("S1@4,18".parse::<Piece>().is_err());
        assert!("S#1#4,18".parse::<Piece>().is_err());
        assert!("S#1@4".parse::<Piece>().is_err());
        assert!("X#0@4,18".parse::<Piece>().is_err());
        assert!("SS#0@4,18".parse::<Piece>().is_err());
        assert!("O#1@4,18".parse::<Piece>().is_err());
        assert!("S#1@abc,18".parse::<Piece>().is_err());
        let err = "P#0@1".parse::<Piece>().unwrap_err();
        assert!(err.to_string().contains("missing ','"));
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('x'), None);
    }
}
