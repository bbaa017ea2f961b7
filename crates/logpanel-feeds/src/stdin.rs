//! Stdin feed: reads JSON-lines messages piped into the process.

use std::io::BufReader;

use crate::{pump_lines, Feed, FeedError, FeedHandle, MessageSender};

#[derive(Debug, Default)]
pub struct StdinFeed;

impl StdinFeed {
    pub fn new() -> Self {
        Self
    }
}

impl Feed for StdinFeed {
    fn name(&self) -> String {
        "stdin".to_string()
    }

    fn spawn(self, tx: MessageSender) -> Result<FeedHandle, FeedError> {
        FeedHandle::spawn_thread(self.name(), move |stop| {
            let reader = BufReader::new(std::io::stdin());
            let sent = pump_lines(reader, &tx, &stop);
            tracing::debug!(sent, "stdin feed reached EOF");
        })
    }
}
