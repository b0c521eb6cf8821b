//! Stdin-based record source for piped input.
//!
//! A background thread reads lines and forwards them over a channel, so the
//! TUI event loop can poll without blocking. Both streaming input
//! (`tail -f nodes.jsonl | vgrid`) and complete input (`cat users.json | vgrid`)
//! are supported.

use crate::model::error::InputError;
use crate::model::ParsedRecord;
use crate::parser::RecordStream;
use std::io::{BufRead, BufReader, IsTerminal, Read};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::debug;

enum StdinMessage {
    Line(String),
    Eof,
    Error(std::io::Error),
}

/// Stdin source for piped input.
pub struct StdinSource {
    rx: Receiver<StdinMessage>,
    stream: RecordStream,
    complete: bool,
}

impl StdinSource {
    /// Create a new StdinSource reading the process's stdin.
    ///
    /// # Errors
    ///
    /// Returns `InputError::NoInput` if stdin is a TTY (interactive terminal),
    /// so the TUI never blocks waiting for the user to type records.
    pub fn new() -> Result<Self, InputError> {
        if std::io::stdin().is_terminal() {
            return Err(InputError::NoInput);
        }
        Ok(Self::from_reader(std::io::stdin()))
    }

    /// Create a StdinSource over any reader.
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let reader = BufReader::new(reader);
            for line in reader.lines() {
                let message = match line {
                    Ok(line) => StdinMessage::Line(line),
                    Err(e) => {
                        let _ = tx.send(StdinMessage::Error(e));
                        return;
                    }
                };
                if tx.send(message).is_err() {
                    // Receiver dropped; nobody is listening.
                    return;
                }
            }
            let _ = tx.send(StdinMessage::Eof);
        });

        Self {
            rx,
            stream: RecordStream::new(),
            complete: false,
        }
    }

    /// Parse everything that has arrived since the last poll.
    ///
    /// Non-blocking: returns immediately with the records available.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if the reader thread hit an I/O error.
    pub fn poll_records(&mut self) -> Result<Vec<ParsedRecord>, InputError> {
        let mut records = Vec::new();
        while !self.complete {
            match self.rx.try_recv() {
                Ok(StdinMessage::Line(line)) => records.extend(self.stream.push_line(&line)),
                Ok(StdinMessage::Eof) | Err(TryRecvError::Disconnected) => {
                    self.complete = true;
                    records.extend(self.stream.finish());
                    debug!(lines = self.stream.lines_seen(), "stdin closed");
                }
                Ok(StdinMessage::Error(e)) => {
                    self.complete = true;
                    return Err(InputError::Io(e));
                }
                Err(TryRecvError::Empty) => break,
            }
        }
        Ok(records)
    }

    /// Check if EOF has been reached (no more data will arrive).
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

impl std::fmt::Debug for StdinSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdinSource")
            .field("lines", &self.stream.lines_seen())
            .field("complete", &self.complete)
            .finish()
    }
}
