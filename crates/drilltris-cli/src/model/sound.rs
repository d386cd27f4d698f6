use std::{
    fmt,
    io::{self, Write as _},
};

/// Something audible happened in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SoundCue {
    Move,
    Rotate,
    Drop,
    LineClear,
    GameOver,
}

/// Plays sound cues.
///
/// Output failures are ignored; they never affect the game.
pub trait SoundSink: fmt::Debug {
    fn play(&self, cue: SoundCue);
}

/// Plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mute;

impl SoundSink for Mute {
    fn play(&self, _cue: SoundCue) {}
}

/// Rings the terminal bell on line clears and game over.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bell;

impl Bell {
    /// Number of bells rung for a cue.
    fn rings(cue: SoundCue) -> usize {
        match cue {
            SoundCue::Move | SoundCue::Rotate | SoundCue::Drop => 0,
            SoundCue::LineClear => 1,
            SoundCue::GameOver => 2,
        }
    }
}

impl SoundSink for Bell {
    fn play(&self, cue: SoundCue) {
        let rings = Self::rings(cue);
        if rings == 0 {
            return;
        }
        let mut stdout = io::stdout().lock();
        _ = stdout
            .write_all(&b"\x07".repeat(rings))
            .and_then(|()| stdout.flush());
    }
}
