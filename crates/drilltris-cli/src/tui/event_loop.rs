use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use super::event::TuiEvent;

/// Decides whether gravity or a redraw is due, and otherwise waits for
/// terminal input.
///
/// Frames are drawn only after something happened (a gravity step or an
/// input event), so an idle game costs nothing.
#[derive(Debug)]
pub(super) struct EventLoop {
    gravity_interval: Option<Duration>,
    last_gravity: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates an event loop with gravity stopped and a first frame pending.
    pub fn new() -> Self {
        Self {
            gravity_interval: None,
            last_gravity: Instant::now(),
            dirty: true,
        }
    }

    pub(super) fn set_gravity_interval(&mut self, interval: Option<Duration>) {
        self.set_gravity_interval_at(interval, Instant::now());
    }

    fn set_gravity_interval_at(&mut self, interval: Option<Duration>, now: Instant) {
        self.gravity_interval = interval;
        self.last_gravity = now;
    }

    #[cfg(test)]
    pub(super) fn gravity_interval(&self) -> Option<Duration> {
        self.gravity_interval
    }

    /// Blocks until gravity or a redraw is due, or a terminal event arrives.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.due_event(now) {
                return Ok(event);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn due_event(&mut self, now: Instant) -> Option<TuiEvent> {
        if let Some(interval) = self.gravity_interval
            && now.duration_since(self.last_gravity) >= interval
        {
            self.last_gravity = now;
            self.dirty = true;
            return Some(TuiEvent::Gravity);
        }
        if self.dirty {
            self.dirty = false;
            return Some(TuiEvent::Render);
        }
        None
    }

    /// Time left until the next gravity step; `None` waits for input only.
    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_gravity_at = self.last_gravity + self.gravity_interval?;
        Some(next_gravity_at.saturating_duration_since(now))
    }
}
