use drilltris_engine::{Board, BoardState, Difficulty};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use super::{
    BoardDisplay, KeyBinding, KeyBindingDisplay, PieceDisplay, StatsDisplay, color, style,
};

const KEY_BINDINGS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↓"], "Soft drop"),
    (&["↑"], "Rotate"),
    (&["Space"], "Drop"),
    (&["p", "Enter"], "Pause"),
    (&["q"], "Quit"),
];

/// Full in-game view: next piece and stats, the board, and the controls.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    board: &'a Board,
    difficulty: Difficulty,
}

impl<'a> GameDisplay<'a> {
    pub fn new(board: &'a Board, difficulty: Difficulty) -> Self {
        Self { board, difficulty }
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let padding = Padding::horizontal(1);
        let border_color = match self.board.state() {
            BoardState::Active => color::WHITE,
            BoardState::Paused => color::YELLOW,
            BoardState::GameOver => color::RED,
        };
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(padding)
                .border_style(border_color)
                .style(style::DEFAULT)
        };

        let game_board = {
            let widget = BoardDisplay::new(self.board.grid())
                .block(Block::bordered().border_style(border_color).style(style::DEFAULT));
            if self.board.is_game_over() {
                widget
            } else {
                widget
                    .ghost(self.board.landing_preview())
                    .falling_piece(self.board.falling_piece())
            }
        };
        let next_panel = PieceDisplay::new()
            .piece(self.board.next_piece())
            .block(panel("NEXT"));
        let stats = StatsDisplay::new(self.board.stats(), self.difficulty).block(panel("STATS"));
        let keys = KeyBindingDisplay::new(KEY_BINDINGS).block(panel("KEYS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(next_panel.width(), stats.width())),
            Constraint::Length(game_board.width()),
            Constraint::Length(keys.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [next_area, stats_area] = Layout::vertical([
            Constraint::Length(next_panel.height()),
            Constraint::Length(stats.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let next_area = next_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(next_panel.width())]).flex(Flex::End),
        )[0];
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [keys_area] = Layout::vertical([Constraint::Length(keys.height())]).areas(right_column);

        let board_width = game_board.width();
        next_panel.render(next_area, buf);
        stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        keys.render(keys_area, buf);

        let popup = match self.board.state() {
            BoardState::Active => None,
            BoardState::Paused => Some((
                Text::from("PAUSED"),
                Style::new().fg(color::BLACK).bg(color::YELLOW),
            )),
            BoardState::GameOver => Some((
                Text::from(vec![
                    Line::from("GAME OVER"),
                    Line::from(format!("SCORE {}", self.board.score())),
                    Line::from("Enter: menu"),
                ]),
                Style::new().fg(color::WHITE).bg(color::RED),
            )),
        };

        if let Some((text, style)) = popup {
            #[expect(clippy::cast_possible_truncation)]
            let text_height = text.lines.len() as u16;
            let block = Block::new().style(style);
            let area = board_area.centered(
                Constraint::Length(board_width),
                Constraint::Length(text_height + 2),
            );
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.style(style)
                .centered()
                .render(inner.centered_vertically(Constraint::Length(text_height)), buf);
        }
    }
}
