//! Timed acquisition of a single answer.
//!
//! Lines come from a detached reader thread through an unbounded channel. Each
//! collection spawns one task that waits for the next line and hands it back
//! through a oneshot slot, racing a deadline timer. The losing task is aborted;
//! a line that arrives after an abandoned collection is discarded before the
//! next prompt instead of answering the wrong question.

use std::future;
use std::io::{self, BufRead, BufReader};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::debug;

use crate::models::option_label;

/// How a single collection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collected {
    /// A valid 0-based choice.
    Answer(usize),
    /// Input arrived but was not a valid choice.
    Rejected(String),
    /// The deadline passed first.
    TimedOut,
    /// The input source reached end-of-input.
    Closed,
    /// Ctrl-C arrived while waiting.
    Interrupted,
}

impl Collected {
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Answer(index) => Some(*index),
            _ => None,
        }
    }
}

/// Parse a 1-based numeral or a case-insensitive letter label.
///
/// Anything outside `[0, num_options)` is `None`.
pub fn parse_choice(input: &str, num_options: usize) -> Option<usize> {
    let choice = input.trim().to_uppercase();
    if choice.is_empty() {
        return None;
    }

    if choice.chars().all(|c| c.is_ascii_digit()) {
        let index = choice.parse::<usize>().ok()?.checked_sub(1)?;
        return (index < num_options).then_some(index);
    }

    let mut chars = choice.chars();
    let (Some(letter), None) = (chars.next(), chars.next()) else {
        return None;
    };
    (0..num_options.min(26)).find(|&index| option_label(index) == letter)
}

/// Sending half used to feed lines to a collector without a reader thread.
#[derive(Debug, Clone)]
pub struct AnswerFeed {
    tx: mpsc::UnboundedSender<String>,
}

impl AnswerFeed {
    /// Returns false once the collector is gone.
    pub fn send(&self, line: impl Into<String>) -> bool {
        self.tx.send(line.into()).is_ok()
    }
}

/// Collects answers from a line-oriented input source.
pub struct AnswerCollector {
    lines: Arc<Mutex<mpsc::UnboundedReceiver<String>>>,
    /// Set when the previous wait was abandoned; buffered lines are then stale.
    abandoned: bool,
    interrupt_on_ctrl_c: bool,
}

impl AnswerCollector {
    fn with_receiver(rx: mpsc::UnboundedReceiver<String>) -> Self {
        Self {
            lines: Arc::new(Mutex::new(rx)),
            abandoned: false,
            interrupt_on_ctrl_c: false,
        }
    }

    /// Collector fed through an [`AnswerFeed`]. Dropping every feed closes input.
    pub fn channel() -> (AnswerFeed, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (AnswerFeed { tx }, Self::with_receiver(rx))
    }

    /// Read lines from `reader` on a detached thread.
    ///
    /// The thread is never joined: a blocked read cannot hold up shutdown.
    pub fn from_reader<R: BufRead + Send + 'static>(reader: R) -> io::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        thread::Builder::new()
            .name("answer-input".to_string())
            .spawn(move || {
                for line in reader.lines() {
                    match line {
                        Ok(line) => {
                            if tx.send(line).is_err() {
                                break;
                            }
                        }
                        Err(err) => {
                            debug!(error = %err, "Input stream failed");
                            break;
                        }
                    }
                }
            })?;
        Ok(Self::with_receiver(rx))
    }

    /// Collector reading standard input, treating Ctrl-C as "no answer".
    pub fn stdin() -> io::Result<Self> {
        Ok(Self::from_reader(BufReader::new(io::stdin()))?.interrupt_on_ctrl_c(true))
    }

    pub fn interrupt_on_ctrl_c(mut self, enabled: bool) -> Self {
        self.interrupt_on_ctrl_c = enabled;
        self
    }

    /// Wait up to `timeout` for an answer among `num_options`.
    pub async fn collect(&mut self, num_options: usize, timeout: Duration) -> Option<usize> {
        self.collect_detailed(num_options, timeout).await.index()
    }

    /// Like [`collect`](Self::collect), but reports why no answer was taken.
    pub async fn collect_detailed(&mut self, num_options: usize, timeout: Duration) -> Collected {
        self.discard_stale().await;

        let (slot, result) = oneshot::channel();
        let lines = Arc::clone(&self.lines);
        let reader = tokio::spawn(async move {
            let mut lines = lines.lock_owned().await;
            let line = lines.recv().await;
            // Fails only when the deadline already won; the line is dropped.
            let _ = slot.send(line);
        });

        let collected = tokio::select! {
            biased;
            _ = tokio::time::sleep(timeout) => Collected::TimedOut,
            _ = interrupted(self.interrupt_on_ctrl_c) => Collected::Interrupted,
            line = result => match line {
                Ok(Some(line)) => match parse_choice(&line, num_options) {
                    Some(index) => Collected::Answer(index),
                    None => Collected::Rejected(line),
                },
                Ok(None) | Err(_) => Collected::Closed,
            },
        };

        reader.abort();
        if matches!(collected, Collected::TimedOut | Collected::Interrupted) {
            self.abandoned = true;
        }
        debug!(?collected, "Answer collection finished");
        collected
    }

    /// Next raw line without a deadline, for menus and prompts.
    ///
    /// `None` on end-of-input or Ctrl-C.
    pub async fn read_line(&mut self) -> Option<String> {
        self.discard_stale().await;

        let mut lines = self.lines.lock().await;
        tokio::select! {
            line = lines.recv() => line,
            _ = interrupted(self.interrupt_on_ctrl_c) => None,
        }
    }

    async fn discard_stale(&mut self) {
        if !std::mem::take(&mut self.abandoned) {
            return;
        }

        // Waits for the aborted reader task to release the receiver.
        let mut lines = self.lines.lock().await;
        while let Ok(line) = lines.try_recv() {
            debug!(line = %line, "Discarding input that arrived after the deadline");
        }
    }
}

async fn interrupted(enabled: bool) {
    if enabled && tokio::signal::ctrl_c().await.is_ok() {
        return;
    }
    future::pending::<()>().await
}
