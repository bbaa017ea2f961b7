//! Log panel widget: the "Console Log Output" pane.
//!
//! # Navigation
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k` | Move cursor to a newer entry |
//! | `↓` / `j` | Move cursor to an older entry |
//! | `PageUp` / `Ctrl+u` | Page towards newer entries |
//! | `PageDown` / `Ctrl+d` | Page towards older entries |
//! | `g` / `Home` | Jump back to the newest entry |
//!
//! # Scroll semantics
//!
//! Entries are listed newest-first, so the live edge is the top row.
//! `scroll_offset` = number of entries hidden above the top row (0 = live).
//! `cursor` = index into the view's entries (0 = newest). While the panel is
//! away from the live edge, arriving entries shift both values so the rows on
//! screen stay put, and are counted in `unseen`.

use std::cell::Cell;

use crate::event::{AppEvent, Direction};
use crate::markup;
use crate::theme::Theme;
use logpanel_core::config::UiConfig;
use logpanel_core::{LogEntry, LogView};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};

const PAGE_STEP: usize = 10;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

pub struct LogPanelState {
    view: LogView,
    pub title: String,
    /// Number of entries hidden above the top row (0 = live edge).
    pub scroll_offset: usize,
    /// Index into the entries (0 = newest) of the highlighted row.
    pub cursor: usize,
    /// Entries that arrived while away from the live edge.
    pub unseen: usize,
    pub show_timestamps: bool,
    pub timestamp_format: String,
    pub strip_markup: bool,
    /// Entry count at the last [`sync`](Self::sync).
    seen_len: usize,
    /// Cached from the last render so `handle()` can do cursor-aware scrolling.
    last_height: Cell<usize>,
}

impl LogPanelState {
    pub fn new(view: LogView, ui: &UiConfig) -> Self {
        Self {
            view,
            title: ui.panel_title.clone(),
            scroll_offset: 0,
            cursor: 0,
            unseen: 0,
            show_timestamps: ui.show_timestamps,
            timestamp_format: ui.timestamp_format.clone(),
            strip_markup: ui.strip_markup,
            seen_len: 0,
            last_height: Cell::new(20),
        }
    }

    pub fn view(&self) -> &LogView {
        &self.view
    }

    fn height(&self) -> usize {
        self.last_height.get().max(1)
    }

    /// True when the top row shows the newest entry and the cursor is on it.
    pub fn is_live(&self) -> bool {
        self.scroll_offset == 0 && self.cursor == 0
    }

    /// Account for entries the view received since the last call.
    pub fn sync(&mut self) {
        let len = self.view.len();
        if len < self.seen_len {
            self.reset();
        } else if len > self.seen_len {
            let added = len - self.seen_len;
            if !self.is_live() {
                self.scroll_offset += added;
                self.cursor += added;
                self.unseen += added;
            }
        }
        self.seen_len = len;
    }

    /// Clear the underlying view and return to the live edge.
    pub fn clear(&mut self) {
        self.view.clear();
        self.reset();
        self.seen_len = 0;
    }

    fn reset(&mut self) {
        self.scroll_offset = 0;
        self.cursor = 0;
        self.unseen = 0;
    }

    /// Handle a navigation event from the app shell.
    pub fn handle(&mut self, event: &AppEvent) {
        let total = self.view.len();
        if total == 0 {
            return;
        }

        match event {
            AppEvent::Nav(Direction::Up) => {
                self.cursor = self.cursor.saturating_sub(1);
                if self.cursor < self.scroll_offset {
                    self.scroll_offset = self.cursor;
                }
                if self.is_live() {
                    self.unseen = 0;
                }
                tracing::debug!(cursor = self.cursor, scroll_offset = self.scroll_offset, "panel: cursor up");
            }
            AppEvent::Nav(Direction::Down) => {
                if self.cursor + 1 < total {
                    self.cursor += 1;
                }
                let height = self.height();
                if self.cursor >= self.scroll_offset + height {
                    self.scroll_offset = self.cursor + 1 - height;
                }
                tracing::debug!(cursor = self.cursor, scroll_offset = self.scroll_offset, "panel: cursor down");
            }
            AppEvent::ScrollUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(PAGE_STEP);
                self.cursor = self.scroll_offset;
                if self.is_live() {
                    self.unseen = 0;
                }
                tracing::debug!(scroll_offset = self.scroll_offset, "panel: page up");
            }
            AppEvent::ScrollDown => {
                self.scroll_offset = (self.scroll_offset + PAGE_STEP).min(total - 1);
                self.cursor = self.scroll_offset;
                tracing::debug!(scroll_offset = self.scroll_offset, "panel: page down");
            }
            AppEvent::ScrollToTop => {
                self.reset();
                tracing::debug!("panel: jumped to newest");
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct LogPanel<'a> {
    state: &'a LogPanelState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> LogPanel<'a> {
    pub fn new(state: &'a LogPanelState, focused: bool, theme: &'a Theme) -> Self {
        Self { state, focused, theme }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let state = self.state;
        let total = state.view.len();
        let block = Block::bordered()
            .title(format!(" {} ({total}) ", state.title))
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        let height = inner.height as usize;
        // Cache for handle(); draw always runs before the next key is handled.
        state.last_height.set(height);

        if total == 0 {
            Paragraph::new(Line::from(Span::styled(
                "No output yet.",
                Style::default().add_modifier(Modifier::DIM),
            )))
            .render(inner, buf);
            return;
        }

        let start = state.scroll_offset.min(total);
        let end = (start + height).min(total);

        let mut lines: Vec<Line<'static>> = state.view.with_entries(|entries| {
            entries
                .range(start..end)
                .enumerate()
                .map(|(row, entry)| {
                    let line = render_entry(entry, state, self.theme);
                    if self.focused && start + row == state.cursor && !state.is_live() {
                        line.patch_style(Style::default().add_modifier(Modifier::REVERSED))
                    } else {
                        line
                    }
                })
                .collect()
        });

        // Banner replaces the top visible line
        if state.unseen > 0 {
            let noun = if state.unseen == 1 { "entry" } else { "entries" };
            let banner = Line::from(Span::styled(
                format!(" ▲ {} new {noun} (g to jump to newest) ", state.unseen),
                self.theme.banner,
            ));
            if lines.is_empty() {
                lines.push(banner);
            } else {
                lines[0] = banner;
            }
        }

        let text_area = Rect { width: inner.width.saturating_sub(1), ..inner };
        let sb_area = Rect { x: inner.right().saturating_sub(1), width: 1, ..inner };

        Paragraph::new(lines).render(text_area, buf);

        let mut sb_state = ScrollbarState::new(total)
            .position(start)
            .viewport_content_length(height);
        StatefulWidget::render(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None),
            sb_area,
            buf,
            &mut sb_state,
        );
    }
}

// ---------------------------------------------------------------------------
// Entry rendering
// ---------------------------------------------------------------------------

fn render_entry(entry: &LogEntry, state: &LogPanelState, theme: &Theme) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::with_capacity(3);

    spans.push(Span::styled(format!("{:>4}) ", entry.seq), theme.entry_seq));

    if state.show_timestamps {
        spans.push(Span::styled(
            format!("{} ", entry.time_of_day(&state.timestamp_format)),
            theme.entry_time,
        ));
    }

    spans.push(Span::styled(
        markup::display_text(&entry.content, state.strip_markup),
        theme.entry_content,
    ));

    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
