/// Notification raised by a [`Board`](super::Board) operation.
///
/// Events are queued while an operation runs and drained by the driver with
/// [`Board::take_events`](super::Board::take_events) once it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum BoardEvent {
    /// Something visible changed; the view should repaint.
    StateChanged,
    /// A lock removed this many rows.
    LinesCleared(usize),
    /// The level went up to this value.
    LevelChanged(usize),
    /// A newly spawned piece collided. Raised once per game.
    GameOver,
}
