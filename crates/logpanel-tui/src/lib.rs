//! logpanel TUI: ratatui application shell around the console log panel.

pub mod app;
pub mod commands;
pub mod event;
pub mod markup;
pub mod theme;
pub mod widgets;

pub use app::App;

use std::time::Instant;

use logpanel_core::{config::Config, Extension, Message, Services};
use tokio::sync::mpsc::UnboundedReceiver;

/// Activate the extension, run the TUI until the user quits, then deactivate.
///
/// `rx` is the receiving end of the feed channel; the TUI publishes whatever
/// arrives on it to the activated sink.
pub fn run(rx: UnboundedReceiver<Message>, config: Config) -> anyhow::Result<()> {
    let theme = theme::Theme::load_default();
    let mut services = Services::new();
    let sink = Extension::activate(&mut services);

    let result = App::new(sink, rx, config, theme, Instant::now()).run();

    Extension::deactivate(&services);
    result
}
