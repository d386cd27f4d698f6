use crossterm::event::Event as CrosstermEvent;

/// Events produced by the event loop.
#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// The gravity interval elapsed.
    Gravity,
    /// Something changed since the last frame.
    Render,
    /// Terminal events such as key input and resize.
    Crossterm(CrosstermEvent),
}
