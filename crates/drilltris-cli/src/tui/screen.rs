use std::fmt;

use crossterm::event::Event;
use ratatui::Frame;

use super::{App, Runtime};

/// One screen of the application (menu, game, ...).
///
/// Only one screen is shown at a time. A screen hands control to another by
/// returning [`ScreenTransition::Replace`] from [`Screen::handle_event`].
///
/// ```text
/// Create -> on_active() -> (handles events, gravity, draws) -> on_close() -> Drop
/// ```
///
/// Screens configure the [`Runtime`] (gravity interval) in [`Screen::on_active`]
/// and may change it while active.
pub trait Screen: fmt::Debug {
    /// Called when this screen is shown.
    fn on_active(&mut self, runtime: &mut Runtime);

    /// Called when this screen is replaced or the application exits.
    fn on_close(&mut self, runtime: &mut Runtime);

    /// Handles terminal events and returns the transition to apply.
    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> ScreenTransition;

    /// Called on each gravity step.
    fn gravity(&mut self, runtime: &mut Runtime);

    fn draw(&self, frame: &mut Frame);
}

/// Result of handling an event.
#[derive(Debug, derive_more::IsVariant)]
pub enum ScreenTransition {
    Stay,
    /// Close the current screen and show this one instead.
    Replace(Box<dyn Screen>),
    Exit,
}

/// Holds the current screen and implements [`App`] on its behalf.
#[derive(Debug)]
pub struct ScreenHost {
    screen: Box<dyn Screen>,
    should_exit: bool,
}

impl ScreenHost {
    #[must_use]
    pub fn new(initial: Box<dyn Screen>) -> Self {
        Self {
            screen: initial,
            should_exit: false,
        }
    }

    fn apply_transition(&mut self, runtime: &mut Runtime, transition: ScreenTransition) {
        match transition {
            ScreenTransition::Stay => {}
            ScreenTransition::Replace(mut new_screen) => {
                self.screen.on_close(runtime);
                new_screen.on_active(runtime);
                self.screen = new_screen;
            }
            ScreenTransition::Exit => {
                self.screen.on_close(runtime);
                self.should_exit = true;
            }
        }
    }
}

impl App for ScreenHost {
    fn init(&mut self, runtime: &mut Runtime) {
        self.screen.on_active(runtime);
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        if self.should_exit {
            return;
        }
        let transition = self.screen.handle_event(runtime, &event);
        self.apply_transition(runtime, transition);
    }

    fn draw(&self, frame: &mut Frame) {
        self.screen.draw(frame);
    }

    fn gravity(&mut self, runtime: &mut Runtime) {
        if !self.should_exit {
            self.screen.gravity(runtime);
        }
    }
}
