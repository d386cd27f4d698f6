use chrono::Utc;
use crossterm::event::{Event, KeyCode};
use drilltris_engine::{Board, BoardEvent, Difficulty};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    text::Line,
};

use super::MenuScreen;
use crate::{
    command::play::PlayContext,
    model::{ScoreEntry, SoundCue},
    tui::{Runtime, Screen, ScreenTransition},
    ui::widgets::{GameDisplay, style},
};

/// A single game from first spawn to game over.
#[derive(Debug)]
pub(crate) struct GameScreen {
    ctx: PlayContext,
    difficulty: Difficulty,
    board: Board,
}

impl GameScreen {
    pub(crate) fn new(ctx: PlayContext, difficulty: Difficulty) -> Self {
        let board = match ctx.seed {
            Some(seed) => Board::with_seed(seed),
            None => Board::new(),
        };
        Self::with_board(ctx, difficulty, board)
    }

    pub(crate) fn with_board(ctx: PlayContext, difficulty: Difficulty, board: Board) -> Self {
        Self {
            ctx,
            difficulty,
            board,
        }
    }

    fn play(&self, cue: SoundCue) {
        self.ctx.sound.play(cue);
    }

    /// Reacts to what the board reported since the last call.
    fn process_events(&mut self, runtime: &mut Runtime) {
        for event in self.board.take_events() {
            match event {
                BoardEvent::StateChanged => {}
                BoardEvent::LinesCleared(_) => self.play(SoundCue::LineClear),
                BoardEvent::LevelChanged(level) => {
                    runtime.set_gravity_interval(Some(self.difficulty.gravity_interval(level)));
                }
                BoardEvent::GameOver => {
                    runtime.set_gravity_interval(None);
                    self.play(SoundCue::GameOver);
                }
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> ScreenTransition {
        if code == KeyCode::Char('q') {
            return ScreenTransition::Exit;
        }
        if self.board.is_game_over() {
            return match code {
                KeyCode::Enter => self.finish(),
                _ => ScreenTransition::Stay,
            };
        }

        let cue = match code {
            KeyCode::Left => self.board.move_by(-1, 0).then_some(SoundCue::Move),
            KeyCode::Right => self.board.move_by(1, 0).then_some(SoundCue::Move),
            KeyCode::Down => {
                self.board.move_by(0, 1);
                None
            }
            KeyCode::Up => self.board.rotate().then_some(SoundCue::Rotate),
            KeyCode::Char(' ') => self.board.drop().then_some(SoundCue::Drop),
            KeyCode::Char('p') | KeyCode::Enter => {
                self.board.toggle_pause();
                None
            }
            _ => None,
        };
        if let Some(cue) = cue {
            self.play(cue);
        }
        ScreenTransition::Stay
    }

    /// Records the final score and goes back to the menu.
    fn finish(&self) -> ScreenTransition {
        let mut ctx = self.ctx.clone();
        let score = self.board.score();
        let entry = ScoreEntry {
            score,
            player_name: ctx.player_name.clone(),
            difficulty: self.difficulty,
            date: Utc::now(),
        };
        ctx.status = if score == 0 {
            Some(format!("Score: {score}"))
        } else if ctx.leaderboard.add_score(entry) {
            match ctx.leaderboard.save(&ctx.leaderboard_path) {
                Ok(()) => Some(format!("New top score: {score}")),
                Err(e) => Some(format!("Could not save leaderboard: {e:#}")),
            }
        } else {
            Some(format!("Score: {score}"))
        };
        ScreenTransition::Replace(Box::new(MenuScreen::new(ctx, self.difficulty)))
    }
}

impl Screen for GameScreen {
    fn on_active(&mut self, runtime: &mut Runtime) {
        runtime.set_gravity_interval(Some(self.difficulty.gravity_interval(self.board.level())));
        self.process_events(runtime);
    }

    fn on_close(&mut self, runtime: &mut Runtime) {
        runtime.set_gravity_interval(None);
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        let Some(key) = event.as_key_press_event() else {
            return ScreenTransition::Stay;
        };
        let transition = self.handle_key(key.code);
        self.process_events(runtime);
        transition
    }

    fn gravity(&mut self, runtime: &mut Runtime) {
        self.board.move_by(0, 1);
        self.process_events(runtime);
    }

    fn draw(&self, frame: &mut Frame) {
        let [main_area, status_area] =
            Layout::vertical([Constraint::Length(22), Constraint::Length(1)])
                .flex(Flex::Center)
                .areas(frame.area());

        frame.render_widget(GameDisplay::new(&self.board, self.difficulty), main_area);
        if let Some(status) = &self.ctx.status {
            frame.render_widget(Line::styled(status.as_str(), style::DIM).centered(), status_area);
        }
    }
}
