//! `?` overlay listing the keybindings, centred over the screen.

use crate::event::Keymap;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

const WIDTH: u16 = 64;
const KEY_COLUMN: usize = 20;

pub struct HelpPopup<'a> {
    keymap: &'a Keymap,
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(keymap: &'a Keymap, theme: &'a Theme) -> Self {
        Self { keymap, theme }
    }

    fn rows(&self) -> [(String, &'static str); 9] {
        let k = self.keymap;
        [
            ("q, Ctrl+c".into(), "Quit"),
            (k.clear.to_string(), "Clear the log"),
            (k.toggle_panel.to_string(), "Show / hide the log panel"),
            (format!("{}, Home", k.scroll_to_top), "Jump to newest entry"),
            ("k j, Up Down".into(), "Move between entries"),
            ("PageUp, Ctrl+u".into(), "Page towards newer entries"),
            ("PageDown, Ctrl+d".into(), "Page towards older entries"),
            (":".into(), "Command line (clear, log, ts, top, theme, q)"),
            ("?, Esc".into(), "Close this help"),
        ]
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [column] = Layout::horizontal([Constraint::Max(width)]).flex(Flex::Center).areas(area);
    let [cell] = Layout::vertical([Constraint::Max(height)]).flex(Flex::Center).areas(column);
    cell
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = self.rows();
        // borders take two rows
        let popup = centered(area, WIDTH, rows.len() as u16 + 2);
        Clear.render(popup, buf);

        let lines: Vec<Line> = rows
            .into_iter()
            .map(|(key, what)| {
                Line::from(vec![
                    Span::styled(format!(" {key:<KEY_COLUMN$}"), self.theme.toolbar_title),
                    Span::raw(what),
                ])
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .title(" logpanel keybindings ")
                    .border_style(self.theme.border_focused),
            )
            .render(popup, buf);
    }
}
