use clap::{Parser, Subcommand};

use self::{leaderboard::LeaderboardArg, play::PlayArg};

mod leaderboard;
mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in (defaults to `play`)
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Print the saved top scores
    Leaderboard(#[clap(flatten)] LeaderboardArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or_else(|| Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Leaderboard(arg) => leaderboard::run(&arg)?,
    }
    Ok(())
}
