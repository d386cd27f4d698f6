use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Row, Table, Widget},
};

use super::style;
use crate::model::{MAX_ENTRIES, ScoreEntry};

/// Top scores as a ranked table.
#[derive(Debug)]
pub struct LeaderboardDisplay<'a> {
    entries: &'a [ScoreEntry],
    block: Option<BlockWidget<'a>>,
}

impl<'a> LeaderboardDisplay<'a> {
    const WIDTHS: [u16; 5] = [2, 12, 7, 6, 10];

    pub fn new(entries: &'a [ScoreEntry]) -> Self {
        Self {
            entries,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        let columns: u16 = Self::WIDTHS.iter().sum();
        #[expect(clippy::cast_possible_truncation)]
        let spacing = Self::WIDTHS.len() as u16 - 1;
        columns + spacing + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        1 + MAX_ENTRIES as u16 + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for LeaderboardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        if self.entries.is_empty() {
            Line::styled("No scores yet", style::DIM)
                .centered()
                .render(area, buf);
            return;
        }

        let header = Row::new(["#", "NAME", "SCORE", "MODE", "DATE"]).style(style::TITLE);
        let rows = self.entries.iter().enumerate().map(|(i, entry)| {
            Row::new([
                (i + 1).to_string(),
                entry.player_name.clone(),
                format!("{:>7}", entry.score),
                entry.difficulty.to_string(),
                entry.date.format("%Y-%m-%d").to_string(),
            ])
        });
        Table::new(rows, Self::WIDTHS.map(Constraint::Length))
            .header(header)
            .style(style::DEFAULT)
            .render(area, buf);
    }
}
