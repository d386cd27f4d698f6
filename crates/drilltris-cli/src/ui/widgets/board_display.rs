use drilltris_engine::{BOARD_HEIGHT, BOARD_WIDTH, Grid, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::BlockDisplay;

/// The playfield: settled blocks, the landing ghost, then the falling piece on top.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    grid: &'a Grid,
    ghost: Option<Piece>,
    falling_piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            ghost: None,
            falling_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Option<Piece>) -> Self {
        Self {
            ghost: piece,
            ..self
        }
    }

    pub fn falling_piece(self, piece: Piece) -> Self {
        Self {
            falling_piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        BOARD_WIDTH as u16 * BlockDisplay::WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        BOARD_HEIGHT as u16 * BlockDisplay::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }

    fn cells(&self) -> Vec<[BlockDisplay; BOARD_WIDTH]> {
        let mut cells: Vec<_> = self
            .grid
            .rows()
            .map(|row| row.map(|block| BlockDisplay::from_block(block, true)))
            .collect();

        let mut overlay = |piece: Piece, display: BlockDisplay, only_empty: bool| {
            for (x, y) in piece.occupied_positions() {
                let (Ok(col), Ok(row)) = (usize::try_from(x), usize::try_from(y)) else {
                    continue;
                };
                if only_empty && self.grid.is_occupied(x, y) {
                    continue;
                }
                if let Some(cell) = cells.get_mut(row).and_then(|r| r.get_mut(col)) {
                    *cell = display;
                }
            }
        };
        if let Some(ghost) = self.ghost {
            overlay(ghost, BlockDisplay::ghost(ghost.kind()), true);
        }
        if let Some(piece) = self.falling_piece {
            overlay(piece, BlockDisplay::piece(piece.kind()), false);
        }
        cells
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        let grid_area = area.centered_horizontally(Constraint::Length(
            self.width() - super::block_horizontal_margin(self.block.as_ref()),
        ));

        for (y, row) in (grid_area.y..).zip(self.cells()) {
            for (x, cell) in (grid_area.x..).step_by(BlockDisplay::WIDTH.into()).zip(row) {
                cell.draw_at(grid_area, x, y, buf);
            }
        }
    }
}
