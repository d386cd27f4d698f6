//! Board geometry and piece shapes.

pub use self::{grid::*, piece::*};

pub(crate) mod grid;
pub(crate) mod piece;

/// Number of columns on the board.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows on the board.
pub const BOARD_HEIGHT: usize = 20;
