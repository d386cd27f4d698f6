use std::{io, time::Duration};

use super::{App, event::TuiEvent, event_loop::EventLoop};

/// Runs an [`App`] in the terminal.
///
/// Owns the event loop, so screens adjust the gravity timer through it.
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how often gravity fires; `None` stops it.
    ///
    /// The next gravity event is a full interval away from now.
    pub fn set_gravity_interval(&mut self, interval: Option<Duration>) {
        self.events.set_gravity_interval(interval);
    }

    #[cfg(test)]
    pub fn gravity_interval(&self) -> Option<Duration> {
        self.events.gravity_interval()
    }

    /// Runs the application until `app.should_exit()` returns true.
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Gravity => app.gravity(&mut self),
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(&mut self, event),
                }
            }
            Ok(())
        })
    }
}
