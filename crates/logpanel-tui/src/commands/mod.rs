//! Commands typed into the `:` command bar.

use std::str::FromStr;

use crate::{app::AppState, event::AppEvent, theme::Theme};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Toggle the keybinding popup.
    Help,
    /// Same as the toolbar's Clear button.
    Clear,
    TogglePanel,
    /// Show or hide the time-of-day column.
    Timestamps,
    /// Jump back to the newest entry.
    Top,
    /// Switch to a built-in theme by name.
    Theme(String),
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let verb = words.next().unwrap_or_default();

        if verb == "theme" {
            let name = words.collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                return Err("usage: theme <default|gruvbox>".into());
            }
            return Ok(Command::Theme(name));
        }

        Ok(match verb {
            "q" | "quit" | "q!" | "quit!" => Command::Quit,
            "help" => Command::Help,
            "clear" | "cl" => Command::Clear,
            "log" | "panel" => Command::TogglePanel,
            "ts" | "timestamps" => Command::Timestamps,
            "top" => Command::Top,
            other => return Err(format!("unknown command: {other}")),
        })
    }
}

impl Command {
    /// Parse the text after the `:`. Blank input yields `Ok(None)`, which
    /// closes the bar without doing anything.
    pub fn parse(input: &str) -> Result<Option<Command>, String> {
        match input.trim() {
            "" => Ok(None),
            text => text.parse().map(Some),
        }
    }

    pub fn apply(self, s: &mut AppState) {
        match self {
            Command::Quit => s.quit = true,
            Command::Help => s.show_help = !s.show_help,
            Command::Clear => s.clear_log(),
            Command::TogglePanel => s.toggle_panel(),
            Command::Timestamps => s.panel.show_timestamps = !s.panel.show_timestamps,
            Command::Top => s.panel.handle(&AppEvent::ScrollToTop),
            Command::Theme(name) => s.theme = Theme::by_name(&name),
        }
    }
}
