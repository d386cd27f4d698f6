use std::{path::PathBuf, rc::Rc};

use drilltris_engine::{Difficulty, PieceSeed};

use self::screens::MenuScreen;
use crate::{
    model::{Bell, Leaderboard, Mute, SoundSink},
    tui::{Runtime, ScreenHost},
};

mod screens;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Difficulty preselected in the menu
    #[clap(long)]
    difficulty: Option<Difficulty>,
    /// Seed for the piece sequence (32 hex digits); random when omitted
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Leaderboard file
    #[clap(long, default_value = "./leaderboard.json")]
    leaderboard: PathBuf,
    /// Name recorded with your scores
    #[clap(long, default_value = "Player")]
    name: String,
    /// Ring the terminal bell on line clears and game over
    #[clap(long)]
    bell: bool,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            difficulty: None,
            seed: None,
            leaderboard: PathBuf::from("./leaderboard.json"),
            name: "Player".to_owned(),
            bell: false,
        }
    }
}

/// State carried from screen to screen for the whole run.
#[derive(Debug, Clone)]
pub(crate) struct PlayContext {
    pub player_name: String,
    /// Seed for every game of this run; `None` draws a fresh one per game.
    pub seed: Option<PieceSeed>,
    pub leaderboard_path: PathBuf,
    pub leaderboard: Leaderboard,
    pub sound: Rc<dyn SoundSink>,
    /// Last notice for the player (save failures, new records).
    pub status: Option<String>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        difficulty,
        seed,
        leaderboard,
        name,
        bell,
    } = arg;

    let (board, status) = match Leaderboard::load(leaderboard) {
        Ok(board) => (board, None),
        Err(e) => {
            eprintln!("warning: {e:#}; starting with an empty leaderboard");
            (
                Leaderboard::default(),
                Some(format!("Leaderboard unavailable: {e}")),
            )
        }
    };
    let sound: Rc<dyn SoundSink> = if *bell { Rc::new(Bell) } else { Rc::new(Mute) };
    let ctx = PlayContext {
        player_name: name.clone(),
        seed: *seed,
        leaderboard_path: leaderboard.clone(),
        leaderboard: board,
        sound,
        status,
    };

    let menu = MenuScreen::new(ctx, difficulty.unwrap_or_default());
    Runtime::new().run(&mut ScreenHost::new(Box::new(menu)))?;
    Ok(())
}
