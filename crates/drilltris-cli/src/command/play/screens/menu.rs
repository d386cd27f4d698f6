use crossterm::event::{Event, KeyCode};
use drilltris_engine::Difficulty;
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    text::{Line, Span},
    widgets::Block,
};

use super::GameScreen;
use crate::{
    command::play::PlayContext,
    tui::{Runtime, Screen, ScreenTransition},
    ui::widgets::{KeyBinding, KeyBindingDisplay, LeaderboardDisplay, style},
};

const KEY_BINDINGS: &[KeyBinding] = &[
    (&["←", "→", "1-4"], "Difficulty"),
    (&["Enter"], "Start"),
    (&["q"], "Quit"),
];

/// Title screen: pick a difficulty and see the best scores.
#[derive(Debug)]
pub(crate) struct MenuScreen {
    ctx: PlayContext,
    difficulty: Difficulty,
}

impl MenuScreen {
    pub(crate) fn new(ctx: PlayContext, difficulty: Difficulty) -> Self {
        Self { ctx, difficulty }
    }

    fn start_game(&self) -> ScreenTransition {
        let mut ctx = self.ctx.clone();
        ctx.status = None;
        ScreenTransition::Replace(Box::new(GameScreen::new(ctx, self.difficulty)))
    }
}

impl Screen for MenuScreen {
    fn on_active(&mut self, runtime: &mut Runtime) {
        runtime.set_gravity_interval(None);
    }

    fn on_close(&mut self, _runtime: &mut Runtime) {}

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        let Some(key) = event.as_key_press_event() else {
            return ScreenTransition::Stay;
        };
        match key.code {
            KeyCode::Left => self.difficulty = self.difficulty.prev(),
            KeyCode::Right => self.difficulty = self.difficulty.next(),
            KeyCode::Enter => return self.start_game(),
            KeyCode::Char('q') | KeyCode::Esc => return ScreenTransition::Exit,
            KeyCode::Char(c) => {
                if let Some(index) = "1234".find(c) {
                    self.difficulty = Difficulty::ALL[index];
                }
            }
            _ => {}
        }
        ScreenTransition::Stay
    }

    fn gravity(&mut self, _runtime: &mut Runtime) {}

    fn draw(&self, frame: &mut Frame) {
        let selector: Vec<Span> = Difficulty::ALL
            .iter()
            .enumerate()
            .flat_map(|(i, &difficulty)| {
                let style = if difficulty == self.difficulty {
                    style::SELECTED
                } else {
                    style::DIM
                };
                [
                    Span::raw(" "),
                    Span::styled(format!(" {} {difficulty} ", i + 1), style),
                ]
            })
            .collect();

        let leaderboard = LeaderboardDisplay::new(self.ctx.leaderboard.entries())
            .block(Block::bordered().title(Line::from("TOP SCORES").centered()));
        let keys = KeyBindingDisplay::new(KEY_BINDINGS)
            .block(Block::bordered().title(Line::from("KEYS").centered()));

        let [title_area, selector_area, leaderboard_area, keys_area, status_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(leaderboard.height()),
                Constraint::Length(keys.height()),
                Constraint::Length(1),
            ])
            .flex(Flex::Center)
            .spacing(1)
            .areas(frame.area());

        frame.render_widget(
            Line::styled("D R I L L T R I S", style::TITLE).centered(),
            title_area,
        );
        frame.render_widget(Line::from(selector).centered(), selector_area);
        let leaderboard_width = leaderboard.width();
        frame.render_widget(
            leaderboard,
            leaderboard_area.centered_horizontally(Constraint::Length(leaderboard_width)),
        );
        let keys_width = keys.width();
        frame.render_widget(
            keys,
            keys_area.centered_horizontally(Constraint::Length(keys_width)),
        );
        if let Some(status) = &self.ctx.status {
            frame.render_widget(Line::styled(status.as_str(), style::DIM).centered(), status_area);
        }
    }
}
