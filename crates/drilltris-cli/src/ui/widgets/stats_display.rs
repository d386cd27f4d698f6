use std::iter;

use drilltris_engine::{Difficulty, GameStats};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::style;

/// Score, level and line-clear breakdown of the running game.
pub struct StatsDisplay<'a> {
    stats: &'a GameStats,
    difficulty: Difficulty,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(stats: &'a GameStats, difficulty: Difficulty) -> Self {
        Self {
            stats,
            difficulty,
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
        18 + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        ROWS.len() as u16 + super::block_vertical_margin(self.block.as_ref())
    }
}

type Value = &'static dyn Fn(&GameStats, Difficulty) -> String;

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(Value),
    LabelValue(&'static str, Value),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|stats, _| stats.score().to_string()),
    Row::Empty,
    Row::LabelValue("MODE:", &|_, difficulty| difficulty.to_string()),
    Row::LabelValue("LEVEL:", &|stats, _| stats.level().to_string()),
    Row::LabelValue("LINES:", &|stats, _| stats.total_cleared_lines().to_string()),
    Row::LabelValue("PIECES:", &|stats, _| stats.completed_pieces().to_string()),
    Row::Empty,
    Row::LabelValue("SINGLES:", &|stats, _| stats.line_cleared_counter()[1].to_string()),
    Row::LabelValue("DOUBLES:", &|stats, _| stats.line_cleared_counter()[2].to_string()),
    Row::LabelValue("TRIPLES:", &|stats, _| stats.line_cleared_counter()[3].to_string()),
    Row::LabelValue("QUADS:", &|stats, _| stats.line_cleared_counter()[4].to_string()),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;
        let row_areas = Layout::vertical(ROWS.iter().map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), row_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.stats, self.difficulty), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.stats, self.difficulty), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered_lines(display: StatsDisplay<'_>) -> Vec<String> {
        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn test_renders_counters() {
        let mut stats = GameStats::new();
        stats.record_lock(2);
        stats.record_lock(0);

        let lines = rendered_lines(StatsDisplay::new(&stats, Difficulty::Hard));
        assert_eq!(lines.len(), ROWS.len());
        assert_eq!(lines[0].trim(), "SCORE:");
        assert_eq!(lines[1].trim(), "300");
        assert!(lines[3].starts_with("MODE:") && lines[3].ends_with("Hard"));
        assert!(lines[5].ends_with(" 2"));
        assert!(lines[6].ends_with(" 2"));
        assert!(lines[9].ends_with(" 1"));
    }
}
