use drilltris_engine::{Block, PieceKind};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
};

use super::style;

/// One board cell, drawn two terminal columns wide so cells look square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const WIDTH: u16 = 2;
    pub const HEIGHT: u16 = 1;

    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub const fn empty(show_dots: bool) -> Self {
        if show_dots {
            Self::new(style::EMPTY_DOT, " .")
        } else {
            Self::new(style::EMPTY, "  ")
        }
    }

    pub const fn piece(kind: PieceKind) -> Self {
        Self::new(style::piece(kind), "  ")
    }

    /// Outline of where the falling piece would land.
    pub const fn ghost(kind: PieceKind) -> Self {
        Self::new(style::ghost(kind), "[]")
    }

    pub const fn from_block(block: Block, show_dots: bool) -> Self {
        match block {
            Block::Empty => Self::empty(show_dots),
            Block::Piece(kind) => Self::piece(kind),
        }
    }

    /// Draws the block with its top-left corner at `(x, y)`, clipped to `area`.
    pub fn draw_at(&self, area: Rect, x: u16, y: u16, buf: &mut Buffer) {
        for (dx, ch) in (0..Self::WIDTH).zip(self.symbol.chars()) {
            let pos = Position::new(x + dx, y);
            if !area.contains(pos) {
                continue;
            }
            if let Some(cell) = buf.cell_mut(pos) {
                cell.set_style(self.style);
                cell.set_char(ch);
            }
        }
    }
}
