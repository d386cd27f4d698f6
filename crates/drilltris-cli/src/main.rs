mod command;
mod model;
mod tui;
mod ui;

fn main() -> anyhow::Result<()> {
    command::run()
}
