//! Ratatui widgets for the logpanel TUI.

pub mod command_bar;
pub mod help;
pub mod log_panel;
pub mod toolbar;
