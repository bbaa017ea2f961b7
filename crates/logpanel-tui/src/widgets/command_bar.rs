//! The `:` prompt drawn over the bottom row.
//!
//! `Enter` and `Escape` belong to the app shell; this module only edits the
//! line and draws it. Accepted commands live in [`crate::commands`].

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Clear, Widget},
};

/// Text being typed after the `:` and the last command error.
#[derive(Debug, Default)]
pub struct CommandBarState {
    pub input: String,
    /// Byte offset into `input`, always on a char boundary.
    pub cursor: usize,
    /// Shown instead of the prompt until the next key.
    pub error: Option<String>,
}

impl CommandBarState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Apply one editing key. Anything that is not an edit is ignored.
    pub fn handle(&mut self, event: &AppEvent) {
        self.error = None;
        match *event {
            AppEvent::Char(c) => {
                self.input.insert(self.cursor, c);
                self.cursor += c.len_utf8();
            }
            AppEvent::Backspace => {
                let before = self.char_before();
                if let Some(at) = before {
                    self.input.remove(at);
                }
                self.cursor = before.unwrap_or(self.cursor);
            }
            AppEvent::Nav(Direction::Left) => self.cursor = self.char_before().unwrap_or(0),
            AppEvent::Nav(Direction::Right) => self.cursor = self.char_after(),
            _ => {}
        }
    }

    fn char_before(&self) -> Option<usize> {
        self.input[..self.cursor].char_indices().next_back().map(|(at, _)| at)
    }

    fn char_after(&self) -> usize {
        self.input[self.cursor..]
            .chars()
            .next()
            .map_or(self.cursor, |c| self.cursor + c.len_utf8())
    }

    /// Terminal column for the text cursor, kept inside `area`.
    pub fn cursor_col(&self, area: Rect) -> u16 {
        let typed = self.input[..self.cursor].chars().count();
        let col = u16::try_from(typed + 1).unwrap_or(u16::MAX);
        area.x.saturating_add(col).min(area.right().saturating_sub(1))
    }
}

pub struct CommandBar<'a> {
    state: &'a CommandBarState,
    theme: &'a Theme,
}

impl<'a> CommandBar<'a> {
    pub fn new(state: &'a CommandBarState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    fn line(&self) -> Line<'a> {
        match &self.state.error {
            Some(err) => Span::styled(format!("E  {err}"), self.theme.command_error).into(),
            None => Line::from(vec![
                Span::styled(":", self.theme.command_prompt),
                Span::raw(self.state.input.as_str()),
            ]),
        }
    }
}

impl Widget for CommandBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let line = self.line();
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::style::Color;

    fn typed(text: &str) -> CommandBarState {
        let mut s = CommandBarState::default();
        text.chars().for_each(|c| s.handle(&AppEvent::Char(c)));
        s
    }

    #[test]
    fn char_insert_and_backspace() {
        let mut s = typed("foo");
        assert_eq!((s.input.as_str(), s.cursor), ("foo", 3));
        s.handle(&AppEvent::Backspace);
        assert_eq!((s.input.as_str(), s.cursor), ("fo", 2));
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut s = typed("ab");
        s.handle(&AppEvent::Nav(Direction::Left));
        s.handle(&AppEvent::Nav(Direction::Left));
        s.handle(&AppEvent::Nav(Direction::Left));
        assert_eq!(s.cursor, 0);
        s.handle(&AppEvent::Backspace);
        assert_eq!(s.input, "ab");
    }

    #[test]
    fn cursor_moves_over_multibyte_chars() {
        let mut s = typed("aé");
        s.handle(&AppEvent::Nav(Direction::Left));
        assert_eq!(s.cursor, 1);
        s.handle(&AppEvent::Char('x'));
        assert_eq!(s.input, "axé");
        s.handle(&AppEvent::Nav(Direction::Right));
        assert_eq!(s.cursor, s.input.len());
        assert_eq!(s.cursor_col(Rect::new(0, 0, 80, 1)), 4);
    }

    #[test]
    fn error_cleared_on_next_key() {
        let mut s = CommandBarState { error: Some("oops".into()), ..Default::default() };
        s.handle(&AppEvent::Char('x'));
        assert!(s.error.is_none());
    }

    #[test]
    fn error_uses_theme_style() {
        let theme = Theme::load_default();
        let state = CommandBarState { error: Some("bad".into()), ..Default::default() };
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        CommandBar::new(&state, &theme).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "E");
        assert_eq!(buf[(0, 0)].fg, Color::Red);
    }
}
