use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use logpanel_core::config::Config;
use logpanel_feeds::{Feed, FileFeed, StdinFeed};

#[derive(Parser)]
#[command(name = "logpanel", about = "Console log output panel for JSON-lines message feeds")]
struct Cli {
    /// Read messages from this JSON-lines file instead of stdin.
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Keep reading as the file grows.
    #[arg(long, requires = "file")]
    follow: bool,

    /// Write debug logs to /tmp/logpanel-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/logpanel-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("logpanel debug log started; tail -f /tmp/logpanel-debug.log");
    }

    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "could not load config; using defaults");
        Config::defaults()
    });

    let (tx, rx) = logpanel_feeds::channel();

    // The handle is held for the life of the TUI; dropping it stops the feed.
    let _feed = match cli.file {
        Some(path) => Some(FileFeed::new(path).follow(cli.follow).spawn(tx)?),
        None if !std::io::stdin().is_terminal() => Some(StdinFeed::new().spawn(tx)?),
        None => {
            tracing::info!("no feed: stdin is a terminal and no --file given");
            drop(tx);
            None
        }
    };

    logpanel_tui::run(rx, config)
}
