use std::{
    io::{self, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;

use crate::model::Leaderboard;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct LeaderboardArg {
    /// Leaderboard file to read
    #[clap(long, default_value = "./leaderboard.json")]
    leaderboard: PathBuf,
    /// Print the entries as JSON instead of a table
    #[clap(long)]
    json: bool,
}

pub(crate) fn run(arg: &LeaderboardArg) -> anyhow::Result<()> {
    let LeaderboardArg { leaderboard, json } = arg;

    let board = Leaderboard::load(leaderboard)?;
    let mut stdout = io::stdout().lock();
    if *json {
        serde_json::to_writer_pretty(&mut stdout, &board)
            .context("failed to write leaderboard as JSON")?;
        writeln!(stdout)?;
    } else {
        write_table(&mut stdout, &board)?;
    }
    stdout.flush()?;
    Ok(())
}

fn write_table<W>(out: &mut W, board: &Leaderboard) -> io::Result<()>
where
    W: io::Write,
{
    if board.entries().is_empty() {
        return writeln!(out, "No scores yet");
    }
    writeln!(out, "#  NAME               SCORE MODE   DATE")?;
    for (rank, entry) in (1..).zip(board.entries()) {
        writeln!(
            out,
            "{rank:<2} {:<16} {:>7} {:<6} {}",
            entry.player_name,
            entry.score,
            entry.difficulty.to_string(),
            entry.date.format("%Y-%m-%d %H:%M"),
        )?;
    }
    Ok(())
}
