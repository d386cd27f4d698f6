pub(crate) use self::{game::GameScreen, menu::MenuScreen};

mod game;
mod menu;

#[cfg(test)]
pub(super) mod testing {
    use std::{cell::RefCell, env, path::PathBuf, process, rc::Rc};

    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};

    use crate::{
        command::play::PlayContext,
        model::{Leaderboard, SoundCue, SoundSink},
        tui::Screen,
    };

    #[derive(Debug, Default)]
    pub struct RecordingSink {
        cues: RefCell<Vec<SoundCue>>,
    }

    impl RecordingSink {
        pub fn take(&self) -> Vec<SoundCue> {
            self.cues.take()
        }
    }

    impl SoundSink for RecordingSink {
        fn play(&self, cue: SoundCue) {
            self.cues.borrow_mut().push(cue);
        }
    }

    pub fn leaderboard_path(name: &str) -> PathBuf {
        env::temp_dir()
            .join(format!("drilltris-screens-{}", process::id()))
            .join(name)
    }

    pub fn context(leaderboard_file: &str) -> (PlayContext, Rc<RecordingSink>) {
        let sink = Rc::new(RecordingSink::default());
        let ctx = PlayContext {
            player_name: "tester".to_owned(),
            seed: None,
            leaderboard_path: leaderboard_path(leaderboard_file),
            leaderboard: Leaderboard::default(),
            sound: sink.clone(),
            status: None,
        };
        (ctx, sink)
    }

    pub fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    /// Draws `screen` on an 80x30 terminal and returns its text row by row.
    pub fn render(screen: &dyn Screen) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| screen.draw(frame)).unwrap();
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }
}
