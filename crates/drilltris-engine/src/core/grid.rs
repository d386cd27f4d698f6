use std::fmt;

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    piece::{Color, Piece, PieceKind},
};

/// A single settled cell of the grid.
///
/// Filled cells remember which kind of piece left them, so the color is only
/// ever present for occupied cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell locked by a piece of the given kind.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    #[must_use]
    pub fn color(self) -> Option<Color> {
        match self {
            Block::Empty => None,
            Block::Piece(kind) => Some(kind.color()),
        }
    }
}

type Row = [Block; BOARD_WIDTH];

const EMPTY_ROW: Row = [Block::Empty; BOARD_WIDTH];

fn is_row_filled(row: &Row) -> bool {
    row.iter().all(|block| !block.is_empty())
}

/// The 10×20 field of settled blocks. Row 0 is the top.
///
/// # Example
///
/// ```
/// use drilltris_engine::{Grid, Piece, PieceKind};
///
/// let mut grid = Grid::EMPTY;
/// let piece = Piece::new(PieceKind::O).at(0, 18);
/// assert!(!grid.is_colliding(piece));
/// grid.fill_piece(piece);
/// assert!(grid.is_occupied(1, 19));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: [Row; BOARD_HEIGHT],
}

impl Default for Grid {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Grid {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; BOARD_HEIGHT],
    };

    /// Returns the block at `(x, y)`, or `None` outside the field.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<Block> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// Whether `(x, y)` holds a settled block. Out-of-range cells are not occupied.
    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(|block| !block.is_empty())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Block; BOARD_WIDTH]> {
        self.rows.iter()
    }

    /// Checks the piece's occupied mask cells against the walls, the floor and
    /// settled blocks. Empty mask cells never collide.
    #[must_use]
    pub fn is_colliding(&self, piece: Piece) -> bool {
        piece
            .occupied_positions()
            .any(|(x, y)| !matches!(self.get(x, y), Some(Block::Empty)))
    }

    /// Writes the piece's occupied cells into the grid.
    ///
    /// Cells outside the field are skipped.
    pub fn fill_piece(&mut self, piece: Piece) {
        let block = Block::Piece(piece.kind());
        for (x, y) in piece.occupied_positions() {
            self.set(x, y, block);
        }
    }

    /// Writes a single cell; coordinates outside the field are ignored.
    pub fn set(&mut self, x: i32, y: i32, block: Block) {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = block;
        }
    }

    /// Removes every completely filled row and returns how many were removed.
    ///
    /// Rows above a removed row move down to take its place and empty rows
    /// appear at the top, so non-adjacent filled rows are handled in the same
    /// pass.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..BOARD_HEIGHT).rev() {
            if is_row_filled(&self.rows[y]) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(EMPTY_ROW);
        count
    }

    /// Whether column `x` has an empty cell anywhere strictly below row `y`.
    #[must_use]
    pub fn has_empty_below(&self, x: i32, y: i32) -> bool {
        let Ok(col) = usize::try_from(x) else {
            return false;
        };
        let start = usize::try_from(y + 1).unwrap_or(0);
        self.rows
            .iter()
            .skip(start)
            .any(|row| row.get(col).is_some_and(|block| block.is_empty()))
    }

    /// Lowest empty row of column `x` at or below row `from`, scanning from the floor up.
    #[must_use]
    pub fn lowest_empty_in_column(&self, x: i32, from: i32) -> Option<i32> {
        let col = usize::try_from(x).ok()?;
        let from = usize::try_from(from).unwrap_or(0);
        let y = (from..Self::HEIGHT)
            .rev()
            .find(|&y| self.rows[y].get(col).is_some_and(|block| block.is_empty()))?;
        i32::try_from(y).ok()
    }

    /// Occupancy view: `true` where a block is settled.
    #[must_use]
    pub fn occupancy(&self) -> [[bool; BOARD_WIDTH]; BOARD_HEIGHT] {
        self.rows.map(|row| row.map(|block| !block.is_empty()))
    }

    /// Color view: `Some` exactly where a block is settled.
    #[must_use]
    pub fn colors(&self) -> [[Option<Color>; BOARD_WIDTH]; BOARD_HEIGHT] {
        self.rows.map(|row| row.map(Block::color))
    }

    /// Builds a grid from ASCII art, for fixtures and tests.
    ///
    /// `.` is an empty cell and a piece letter (`I O T L J S Z P`) is a block
    /// of that kind. Rows are listed top to bottom and aligned to the bottom
    /// of the field, so only the interesting rows need to be written.
    ///
    /// # Panics
    ///
    /// Panics on a row that is not exactly 10 cells wide, on an unknown
    /// character, or on more than 20 rows.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        assert!(
            lines.len() <= Self::HEIGHT,
            "at most {} rows allowed, got {}",
            Self::HEIGHT,
            lines.len()
        );

        let mut grid = Self::EMPTY;
        let top = Self::HEIGHT - lines.len();
        for (dy, line) in lines.iter().enumerate() {
            let cells: Vec<Block> = line
                .chars()
                .map(|c| match c {
                    '.' => Block::Empty,
                    c => Block::Piece(
                        PieceKind::from_char(c)
                            .unwrap_or_else(|| panic!("unknown cell '{c}' at row {dy}")),
                    ),
                })
                .collect();
            grid.rows[top + dy] = cells.try_into().unwrap_or_else(|cells: Vec<Block>| {
                panic!(
                    "each row must have exactly {} cells, got {} at row {dy}",
                    Self::WIDTH,
                    cells.len()
                )
            });
        }
        grid
    }
}

/// Renders the grid in the same notation [`Grid::from_ascii`] reads.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for block in row {
                let c = match block {
                    Block::Empty => '.',
                    Block::Piece(kind) => kind.as_char(),
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
