pub use self::{leaderboard::*, sound::*};

mod leaderboard;
mod sound;
