//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic. Messages from the feed
//! arrive on a channel and are published to the [`LogSink`] from the UI
//! thread in [`App::tick`], so every handler runs on one thread.

use crate::{
    commands::Command,
    event::{AppEvent, InputMode, Keymap},
    theme::Theme,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        help::HelpPopup,
        log_panel::{LogPanel, LogPanelState},
        toolbar::Toolbar,
    },
};
use crossterm::{
    event as ct_event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use logpanel_core::{config::Config, Deferred, LogSink, LogView, Message};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame, Terminal,
};
use std::{
    io,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver};

/// Upper bound on messages published per tick so a flooding feed cannot
/// starve input handling.
pub const MAX_PUBLISH_PER_TICK: usize = 1_000;

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Panel,
    /// Vim-style `:` command line is active.
    Command,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub panel: LogPanelState,
    pub panel_visible: bool,
    /// Pending automatic reveal of the panel, if enabled in the config.
    pub auto_show: Option<Deferred>,
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub theme: Theme,
    pub config: Config,
    pub keymap: Keymap,
    pub show_help: bool,
    pub command_bar: CommandBarState,
    /// False once the feed has closed its end of the channel.
    pub feed_live: bool,
    pub quit: bool,
}

impl AppState {
    /// The toolbar's Clear action.
    pub fn clear_log(&mut self) {
        tracing::debug!(entries = self.panel.view().len(), "clearing log panel");
        self.panel.clear();
    }

    /// Show or hide the panel. An explicit toggle supersedes a pending
    /// auto-show.
    pub fn toggle_panel(&mut self) {
        if let Some(deferred) = self.auto_show.as_mut() {
            if deferred.cancel() {
                tracing::debug!("auto-show cancelled by toggle");
            }
        }
        self.panel_visible = !self.panel_visible;
        tracing::debug!(visible = self.panel_visible, "panel toggled");
    }

    fn poll_auto_show(&mut self, now: Instant) {
        let fired = self.auto_show.as_mut().is_some_and(|d| d.poll(now));
        if fired {
            tracing::debug!("auto-show fired");
            self.panel_visible = true;
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
    sink: Arc<LogSink>,
    rx: UnboundedReceiver<Message>,
}

impl App {
    /// Build the shell around `sink`. The panel's view attaches immediately;
    /// the panel itself starts hidden and, when `ui.auto_show` is set, is
    /// revealed once `ui.auto_show_delay_ms` has passed since `now`.
    pub fn new(
        sink: Arc<LogSink>,
        rx: UnboundedReceiver<Message>,
        config: Config,
        theme: Theme,
        now: Instant,
    ) -> Self {
        let view = LogView::attach(&sink);
        let panel = LogPanelState::new(view, &config.ui);
        let auto_show = config
            .ui
            .auto_show
            .then(|| Deferred::new(config.ui.auto_show_delay(), now));
        let keymap = Keymap::from_config(&config.keybindings);

        let state = AppState {
            panel,
            panel_visible: false,
            auto_show,
            focus: Focus::Panel,
            prev_focus: Focus::Panel,
            theme,
            config,
            keymap,
            show_help: false,
            command_bar: CommandBarState::default(),
            feed_live: true,
            quit: false,
        };

        App { state, sink, rx }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn sink(&self) -> &Arc<LogSink> {
        &self.sink
    }

    /// Publish pending feed messages, fire the auto-show when due and bring
    /// the panel's scroll position up to date.
    pub fn tick(&mut self, now: Instant) {
        let mut published = 0;
        while published < MAX_PUBLISH_PER_TICK {
            match self.rx.try_recv() {
                Ok(message) => {
                    self.sink.publish(message);
                    published += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.state.feed_live {
                        tracing::info!("feed ended");
                        self.state.feed_live = false;
                    }
                    break;
                }
            }
        }
        if published > 0 {
            tracing::trace!(published, "published feed messages");
        }

        self.state.poll_auto_show(now);
        self.state.panel.sync();
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.tick(Instant::now());
            terminal.draw(|frame| self.draw(frame))?;

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                let mode = match self.state.focus {
                    Focus::Command => InputMode::Insert,
                    Focus::Panel => InputMode::Normal,
                };
                if let Some(ev) = self.state.keymap.translate(ct_event::read()?, mode) {
                    tracing::debug!(focus = ?self.state.focus, event = ?ev, "input");
                    self.handle(ev);
                }
            }
        }
        Ok(())
    }

    pub fn handle(&mut self, event: AppEvent) {
        let s = &mut self.state;

        // Help popup intercepts all events; only close keys pass through.
        if s.show_help {
            match event {
                AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit => {
                    tracing::debug!("help popup closed");
                    s.show_help = false;
                }
                _ => {}
            }
            return;
        }

        // Command mode intercepts all events.
        if s.focus == Focus::Command {
            match event {
                AppEvent::Quit => s.quit = true,
                AppEvent::Escape => {
                    tracing::debug!("command bar cancelled");
                    s.command_bar.clear();
                    s.focus = s.prev_focus;
                }
                AppEvent::Enter => {
                    let input = s.command_bar.input.clone();
                    match Command::parse(&input) {
                        Ok(cmd) => {
                            s.command_bar.clear();
                            s.focus = s.prev_focus;
                            if let Some(cmd) = cmd {
                                tracing::debug!(command = ?cmd, "executing command");
                                cmd.apply(s);
                            }
                        }
                        // Bar stays open showing the error.
                        Err(msg) => s.command_bar.error = Some(msg),
                    }
                }
                other => s.command_bar.handle(&other),
            }
            return;
        }

        match event {
            AppEvent::Char('?') => {
                tracing::debug!("help popup opened");
                s.show_help = true;
            }
            AppEvent::Char(':') => {
                tracing::debug!(prev_focus = ?s.focus, "entering command mode");
                s.prev_focus = s.focus;
                s.command_bar.clear();
                s.focus = Focus::Command;
            }
            AppEvent::Quit => {
                tracing::debug!("quit");
                s.quit = true;
            }
            AppEvent::Clear => s.clear_log(),
            AppEvent::TogglePanel => s.toggle_panel(),

            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) => {}

            other if s.panel_visible => s.panel.handle(&other),
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn draw(&self, frame: &mut Frame) {
        let state = &self.state;
        let area = frame.area();

        let [toolbar, body] = Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);

        frame.render_widget(
            Toolbar::new(&state.panel.title, state.feed_live, &state.keymap, &state.theme),
            toolbar,
        );
        if state.panel_visible {
            let focused = state.focus == Focus::Panel;
            frame.render_widget(LogPanel::new(&state.panel, focused, &state.theme), body);
        } else {
            frame.render_widget(hidden_placeholder(state), body);
        }

        if state.show_help {
            frame.render_widget(HelpPopup::new(&state.keymap, &state.theme), area);
        }

        // The command bar covers the last screen row.
        if state.focus == Focus::Command {
            let [_, prompt] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
            frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), prompt);
            frame.set_cursor_position((state.command_bar.cursor_col(prompt), prompt.y));
        }
    }
}

fn hidden_placeholder(state: &AppState) -> Paragraph<'static> {
    let text = format!(
        "{} is hidden ({} entries). Press {} to show.",
        state.panel.title,
        state.panel.view().len(),
        state.keymap.toggle_panel
    );
    Paragraph::new(Line::from(Span::styled(text, Style::default().add_modifier(Modifier::DIM))))
        .block(Block::bordered().border_style(state.theme.border_unfocused))
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
