//! Line sources for the command loop.

use std::io::{self, BufRead};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::warn;

/// Yields one command line at a time. `None` means the input is exhausted.
#[async_trait]
pub trait InputSource: Send {
    async fn next_line(&mut self) -> Option<String>;
}

/// Reads stdin on a dedicated thread so the command loop can stop on a
/// shutdown signal while a read is still pending.
pub struct StdinInput {
    lines: mpsc::Receiver<String>,
}

impl StdinInput {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel(16);
        std::thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read from stdin");
                        break;
                    }
                }
            }
        });
        Self { lines: rx }
    }
}

#[async_trait]
impl InputSource for StdinInput {
    async fn next_line(&mut self) -> Option<String> {
        self.lines.recv().await
    }
}

/// Fixed list of lines, for tests.
#[cfg(test)]
pub struct ScriptedInput {
    lines: std::collections::VecDeque<String>,
}

#[cfg(test)]
impl ScriptedInput {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl InputSource for ScriptedInput {
    async fn next_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }
}
