use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    block_display::*, board_display::*, game_display::*, key_binding_display::*,
    leaderboard_display::*, piece_display::*, stats_display::*,
};

mod block_display;
mod board_display;
mod game_display;
mod key_binding_display;
mod leaderboard_display;
mod piece_display;
mod stats_display;

pub mod color {
    use drilltris_engine::PieceKind;
    use ratatui::style::Color;

    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const DARK_GRAY: Color = Color::Rgb(64, 64, 64);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    pub const fn piece(kind: PieceKind) -> Color {
        let color = kind.color();
        Color::Rgb(color.r(), color.g(), color.b())
    }
}

pub mod style {
    use drilltris_engine::PieceKind;
    use ratatui::style::{Color, Modifier, Style};

    use super::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const DIM: Style = fg_bg(color::GRAY, color::BLACK);
    pub const EMPTY: Style = bg_only(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::DARK_GRAY, color::BLACK);
    pub const SELECTED: Style = fg_bg(color::BLACK, color::CYAN).add_modifier(Modifier::BOLD);
    pub const TITLE: Style = fg_bg(color::CYAN, color::BLACK).add_modifier(Modifier::BOLD);

    pub const fn ghost(kind: PieceKind) -> Style {
        fg_bg(color::piece(kind), color::BLACK)
    }

    pub const fn piece(kind: PieceKind) -> Style {
        bg_only(color::piece(kind))
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
