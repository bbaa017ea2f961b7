//! File feed: reads a JSON-lines file, optionally following appends.
//!
//! Without `follow` the feed reads the file once and exits. With `follow` it
//! keeps the file open after EOF and reads newly appended lines whenever the
//! watcher reports a change (or every [`POLL_INTERVAL`], for filesystems that
//! do not deliver events). A file that shrinks is assumed to have been
//! truncated and is re-read from the start.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use crate::{decode_line, Feed, FeedError, FeedHandle, MessageSender};

pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
    follow: bool,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), follow: false }
    }

    pub fn follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }
}

impl Feed for FileFeed {
    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn spawn(self, tx: MessageSender) -> Result<FeedHandle, FeedError> {
        let file = File::open(&self.path)
            .map_err(|source| FeedError::Open { path: self.path.clone(), source })?;
        let watch = if self.follow { Some(FileWatch::new(&self.path)?) } else { None };

        FeedHandle::spawn_thread(self.name(), move |stop| {
            let mut tail = Tail::new(file);
            if tail.drain(&tx).is_err() {
                return;
            }
            match watch {
                Some(watch) => follow(&mut tail, &watch, &tx, &stop),
                None => {
                    let _ = tail.finish(&tx);
                }
            }
            tracing::debug!(sent = tail.sent, "file feed finished");
        })
    }
}

// ---------------------------------------------------------------------------
// Watching
// ---------------------------------------------------------------------------

struct FileWatch {
    // Kept alive for as long as events are wanted.
    _watcher: RecommendedWatcher,
    events: Receiver<notify::Result<notify::Event>>,
}

impl FileWatch {
    fn new(path: &Path) -> Result<Self, FeedError> {
        let watch_err = |source| FeedError::Watch { path: path.to_path_buf(), source };
        let (tx, events) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx).map_err(watch_err)?;
        watcher.watch(path, RecursiveMode::NonRecursive).map_err(watch_err)?;
        Ok(Self { _watcher: watcher, events })
    }
}

fn follow(tail: &mut Tail, watch: &FileWatch, tx: &MessageSender, stop: &AtomicBool) {
    loop {
        if stop.load(Ordering::Acquire) || tx.is_closed() {
            break;
        }
        match watch.events.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(_)) | Err(RecvTimeoutError::Timeout) => {}
            Ok(Err(err)) => tracing::warn!(error = %err, "file feed: watch error"),
            Err(RecvTimeoutError::Disconnected) => break,
        }
        if tail.drain(tx).is_err() {
            break;
        }
    }
}

// ---------------------------------------------------------------------------
// Tail reader
// ---------------------------------------------------------------------------

/// Receiver went away.
#[derive(Debug)]
struct Closed;

struct Tail {
    reader: BufReader<File>,
    /// Bytes consumed so far, used to detect truncation.
    offset: u64,
    /// Bytes of a line whose newline has not been written yet.
    pending: Vec<u8>,
    sent: usize,
}

impl Tail {
    fn new(file: File) -> Self {
        Self { reader: BufReader::new(file), offset: 0, pending: Vec::new(), sent: 0 }
    }

    /// Forward every complete line currently available.
    fn drain(&mut self, tx: &MessageSender) -> Result<(), Closed> {
        self.rewind_if_truncated();
        loop {
            match self.reader.read_until(b'\n', &mut self.pending) {
                Ok(0) => return Ok(()),
                Ok(n) => {
                    self.offset += n as u64;
                    if self.pending.ends_with(b"\n") {
                        let line = std::mem::take(&mut self.pending);
                        self.send(&line, tx)?;
                    }
                }
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                Err(err) => {
                    tracing::warn!(error = %err, "file feed: read failed");
                    return Ok(());
                }
            }
        }
    }

    /// Forward a trailing line that has no newline.
    fn finish(&mut self, tx: &MessageSender) -> Result<(), Closed> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let line = std::mem::take(&mut self.pending);
        self.send(&line, tx)
    }

    fn send(&mut self, line: &[u8], tx: &MessageSender) -> Result<(), Closed> {
        let Some(message) = decode_line(&String::from_utf8_lossy(line)) else {
            return Ok(());
        };
        tx.send(message).map_err(|_| Closed)?;
        self.sent += 1;
        Ok(())
    }

    fn rewind_if_truncated(&mut self) {
        let Ok(meta) = self.reader.get_ref().metadata() else {
            return;
        };
        if meta.len() >= self.offset {
            return;
        }
        tracing::debug!(len = meta.len(), offset = self.offset, "file feed: truncated, rewinding");
        if self.reader.seek(SeekFrom::Start(0)).is_ok() {
            self.offset = 0;
            self.pending.clear();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
