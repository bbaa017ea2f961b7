//! Translation of crossterm input into [`AppEvent`]s, so widgets never see
//! crossterm types.
//!
//! The clear, toggle and jump-to-newest keys come from `[keybindings]` (see
//! [`Keymap`]). Everything else is fixed:
//!
//! | Key(s)                     | Event                  |
//! |----------------------------|------------------------|
//! | `q`, `Ctrl+c`              | `Quit`                 |
//! | `Home`                     | `ScrollToTop`          |
//! | `PageUp` / `Ctrl+u`        | `ScrollUp`             |
//! | `PageDown` / `Ctrl+d`      | `ScrollDown`           |
//! | arrows, `k` / `j`          | `Nav(..)`              |
//!
//! In [`InputMode::Insert`] (the command bar) letters are always `Char`;
//! only `Ctrl+c` and the editing keys keep a meaning of their own.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use logpanel_core::config::KeybindingsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    /// Same as pressing the toolbar's Clear button.
    Clear,
    TogglePanel,
    /// Page towards newer entries.
    ScrollUp,
    /// Page towards older entries.
    ScrollDown,
    ScrollToTop,
    Nav(Direction),
    Char(char),
    Backspace,
    Enter,
    Escape,
    Resize(u16, u16),
}

/// Whether letters are shortcuts or text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Insert,
}

/// The configurable single-key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keymap {
    pub clear: char,
    pub toggle_panel: char,
    pub scroll_to_top: char,
}

impl Default for Keymap {
    fn default() -> Self {
        Self { clear: 'c', toggle_panel: 'l', scroll_to_top: 'g' }
    }
}

impl Keymap {
    /// A binding that is not exactly one character, or that names one of the
    /// [`RESERVED_KEYS`], keeps its default.
    pub fn from_config(cfg: &KeybindingsConfig) -> Self {
        let fallback = Self::default();
        Self {
            clear: one_key("clear", &cfg.clear).unwrap_or(fallback.clear),
            toggle_panel: one_key("toggle_panel", &cfg.toggle_panel)
                .unwrap_or(fallback.toggle_panel),
            scroll_to_top: one_key("scroll_to_top", &cfg.scroll_to_top)
                .unwrap_or(fallback.scroll_to_top),
        }
    }

    /// Map one terminal event. Key releases, mouse input and unbound keys
    /// give `None`.
    pub fn translate(&self, event: Event, mode: InputMode) -> Option<AppEvent> {
        match event {
            Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                editing_key(key).or_else(|| match mode {
                    InputMode::Normal => self.shortcut(key),
                    InputMode::Insert => insert_key(key),
                })
            }
            _ => None,
        }
    }

    fn shortcut(&self, key: KeyEvent) -> Option<AppEvent> {
        let ctrl = key.modifiers == KeyModifiers::CONTROL;
        let bare = key.modifiers == KeyModifiers::NONE;
        let typed = bare || key.modifiers == KeyModifiers::SHIFT;

        let event = match key.code {
            KeyCode::Char('q') if bare => AppEvent::Quit,
            KeyCode::Char('u') if ctrl => AppEvent::ScrollUp,
            KeyCode::Char('d') if ctrl => AppEvent::ScrollDown,
            KeyCode::Char(c) if typed && c == self.clear => AppEvent::Clear,
            KeyCode::Char(c) if typed && c == self.toggle_panel => AppEvent::TogglePanel,
            KeyCode::Char(c) if typed && c == self.scroll_to_top => AppEvent::ScrollToTop,
            KeyCode::Char('k') if bare => AppEvent::Nav(Direction::Up),
            KeyCode::Char('j') if bare => AppEvent::Nav(Direction::Down),
            KeyCode::Char(c) if typed => AppEvent::Char(c),
            KeyCode::Home => AppEvent::ScrollToTop,
            KeyCode::PageUp => AppEvent::ScrollUp,
            KeyCode::PageDown => AppEvent::ScrollDown,
            KeyCode::Up => AppEvent::Nav(Direction::Up),
            KeyCode::Down => AppEvent::Nav(Direction::Down),
            _ => return None,
        };
        Some(event)
    }
}

/// Keys with a fixed meaning that a configured binding may not take over.
pub const RESERVED_KEYS: [char; 5] = ['q', 'j', 'k', ':', '?'];

fn one_key(name: &str, value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if RESERVED_KEYS.contains(&c) => {
            tracing::warn!(binding = name, value, "key is reserved; using default");
            None
        }
        (Some(c), None) => Some(c),
        _ => {
            tracing::warn!(binding = name, value, "keybinding must be a single key; using default");
            None
        }
    }
}

/// Keys that mean the same thing in both modes.
fn editing_key(key: KeyEvent) -> Option<AppEvent> {
    let bare = key.modifiers == KeyModifiers::NONE;
    match key.code {
        KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => Some(AppEvent::Quit),
        KeyCode::Esc => Some(AppEvent::Escape),
        KeyCode::Enter if bare => Some(AppEvent::Enter),
        KeyCode::Backspace if bare => Some(AppEvent::Backspace),
        KeyCode::Left => Some(AppEvent::Nav(Direction::Left)),
        KeyCode::Right => Some(AppEvent::Nav(Direction::Right)),
        _ => None,
    }
}

fn insert_key(key: KeyEvent) -> Option<AppEvent> {
    match key.code {
        KeyCode::Char(c) if matches!(key.modifiers, KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            Some(AppEvent::Char(c))
        }
        KeyCode::Up => Some(AppEvent::Nav(Direction::Up)),
        KeyCode::Down => Some(AppEvent::Nav(Direction::Down)),
        _ => None,
    }
}
