use drilltris_engine::Piece;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::BlockDisplay;

/// Preview of a single piece, trimmed to the cells its shape occupies.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    /// Largest preview in cells; every spawn orientation fits.
    const CELLS: (u16, u16) = (4, 2);

    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: Piece) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        Self::CELLS.0 * BlockDisplay::WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        Self::CELLS.1 * BlockDisplay::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Occupied cells shifted so the shape starts at `(0, 0)`, plus its size.
fn trimmed_cells(piece: Piece) -> (Vec<(u16, u16)>, (u16, u16)) {
    let cells: Vec<(u16, u16)> = piece
        .mask()
        .occupied_cells()
        .filter_map(|(x, y)| Some((u16::try_from(x).ok()?, u16::try_from(y).ok()?)))
        .collect();
    let min_x = cells.iter().map(|&(x, _)| x).min().unwrap_or(0);
    let min_y = cells.iter().map(|&(_, y)| y).min().unwrap_or(0);
    let max_x = cells.iter().map(|&(x, _)| x).max().unwrap_or(0);
    let max_y = cells.iter().map(|&(_, y)| y).max().unwrap_or(0);
    let shifted = cells.iter().map(|&(x, y)| (x - min_x, y - min_y)).collect();
    (shifted, (max_x - min_x + 1, max_y - min_y + 1))
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        for y in area.top()..area.bottom() {
            for x in (area.left()..area.right()).step_by(BlockDisplay::WIDTH.into()) {
                BlockDisplay::empty(false).draw_at(area, x, y, buf);
            }
        }

        let Some(piece) = self.piece else {
            return;
        };
        let (cells, (w, h)) = trimmed_cells(piece);
        let piece_area = area.centered(
            Constraint::Length(w * BlockDisplay::WIDTH),
            Constraint::Length(h * BlockDisplay::HEIGHT),
        );
        let display = BlockDisplay::piece(piece.kind());
        for (x, y) in cells {
            display.draw_at(
                piece_area,
                piece_area.x + x * BlockDisplay::WIDTH,
                piece_area.y + y * BlockDisplay::HEIGHT,
                buf,
            );
        }
    }
}
