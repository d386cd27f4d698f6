//! Game rules and state management.
//!
//! - [`Board`] - A game in progress: grid, falling and next piece, score
//! - [`BoardEvent`] - Notifications raised by board operations
//! - [`GameStats`] - Score, level and line clear counters
//! - [`PieceFactory`] - Uniform random piece generation
//! - [`PieceSeed`] - Seed for deterministic piece generation
//! - [`Difficulty`] - Gravity speed tiers
//!
//! # Game Flow
//!
//! 1. Create a [`Board`]; the first piece is spawned immediately
//! 2. The driver moves, rotates and drops the falling piece, and calls
//!    `move_by(0, 1)` on every gravity tick
//! 3. A piece that cannot move down locks, full rows are cleared and scored,
//!    and the next piece spawns
//! 4. The game ends when a newly spawned piece collides
//!
//! After each call the driver drains [`Board::take_events`] to repaint, play
//! sounds and adjust the gravity interval on [`BoardEvent::LevelChanged`].

pub use self::{board::*, event::*, game_stats::*, piece_factory::*, speed::*};

mod board;
mod event;
mod game_stats;
mod piece_factory;
mod speed;
