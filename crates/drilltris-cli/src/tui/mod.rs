//! Terminal runtime: event loop, gravity timer and screen switching.

pub use self::{
    app::App,
    runtime::Runtime,
    screen::{Screen, ScreenHost, ScreenTransition},
};

mod app;
mod event;
mod event_loop;
mod runtime;
mod screen;
