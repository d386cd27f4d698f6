use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

/// Keys (alternatives) and what they do.
pub type KeyBinding<'a> = (&'a [&'a str], &'a str);

/// Help panel listing one key binding per line.
#[derive(Debug)]
pub struct KeyBindingDisplay<'a> {
    bindings: &'a [KeyBinding<'a>],
    block: Option<BlockWidget<'a>>,
}

const KEY_STYLE: Style = Style::new().fg(Color::Cyan);
const KEY_SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);
const DESCRIPTION_STYLE: Style = Style::new().fg(Color::White);
const KEY_COLUMN: usize = 8;

impl<'a> KeyBindingDisplay<'a> {
    pub fn new(bindings: &'a [KeyBinding<'a>]) -> Self {
        Self {
            bindings,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        let longest = self
            .bindings
            .iter()
            .map(|(_, desc)| KEY_COLUMN + desc.chars().count())
            .max()
            .unwrap_or(0);
        u16::try_from(longest).unwrap_or(u16::MAX) + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.bindings.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }

    fn line(keys: &[&'a str], desc: &'a str) -> Line<'a> {
        let mut spans = vec![];
        let mut used = 0;
        for (i, key) in keys.iter().copied().enumerate() {
            if i > 0 {
                spans.push(Span::styled("/", KEY_SEPARATOR_STYLE));
                used += 1;
            }
            spans.push(Span::styled(key, KEY_STYLE));
            used += key.chars().count();
        }
        spans.push(Span::raw(" ".repeat(KEY_COLUMN.saturating_sub(used).max(1))));
        spans.push(Span::styled(desc, DESCRIPTION_STYLE));
        Line::from(spans)
    }
}

impl Widget for KeyBindingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let text: Text = self
            .bindings
            .iter()
            .map(|&(keys, desc)| Self::line(keys, desc))
            .collect();
        text.render(area, buf);
    }
}
