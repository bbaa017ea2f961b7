//! Toolbar widget: the 1-line strip above the panel.
//!
//! Left: the Clear button and the panel title. Right: the feed status marker
//! and keybinding hints.

use crate::event::Keymap;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

/// Label of the clear button, as drawn.
pub const CLEAR_BUTTON: &str = " ✕ Clear ";

pub struct Toolbar<'a> {
    title: &'a str,
    feed_live: bool,
    keymap: &'a Keymap,
    theme: &'a Theme,
}

impl<'a> Toolbar<'a> {
    pub fn new(title: &'a str, feed_live: bool, keymap: &'a Keymap, theme: &'a Theme) -> Self {
        Self { title, feed_live, keymap, theme }
    }

    fn hint(&self) -> String {
        format!(
            " {}:clear  {}:panel  ::cmd  ?:help  q:quit ",
            self.keymap.clear, self.keymap.toggle_panel
        )
    }
}

impl Widget for Toolbar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let left = Line::from(vec![
            Span::styled(CLEAR_BUTTON, self.theme.toolbar_button),
            Span::raw(" "),
            Span::styled(self.title, self.theme.toolbar_title),
        ]);
        buf.set_line(area.x, area.y, &left, area.width);

        let (marker, marker_style) = if self.feed_live {
            ("● live", self.theme.toolbar_live)
        } else {
            ("○ feed ended", self.theme.toolbar_ended)
        };
        let marker = Span::styled(marker, marker_style);
        let hint = Span::styled(self.hint(), self.theme.toolbar_hint);
        let room = area.width.saturating_sub(left.width() as u16 + 1);

        // Hints give way first, then the status marker
        let full = Line::from(vec![marker.clone(), hint]);
        let right = if full.width() as u16 <= room {
            full
        } else if marker.width() as u16 + 1 <= room {
            Line::from(vec![marker, Span::raw(" ")])
        } else {
            return;
        };
        let width = right.width() as u16;
        buf.set_line(area.right() - width, area.y, &right, width);
    }
}
