//! Interactive command loop.
//!
//! Reads commands from an [`InputSource`] until `exit`, end of input, or the
//! shutdown signal, which also cuts short a command still in flight. Fleet
//! and validation failures are printed and the loop carries on; only
//! terminal I/O errors end it early.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use fleet_client::FleetDispatcher;
use fleet_core::{Priority, RoverId, TaskKind};
use fleet_scheduler::TaskScheduler;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::command::Command;
use crate::input::InputSource;
use crate::terminal::Terminal;

/// Why the command loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The user typed `exit`.
    Command,
    EndOfInput,
    /// The shutdown signal fired (Ctrl-C).
    Interrupted,
}

enum Flow {
    Continue,
    Exit,
}

pub struct Repl<W: Write> {
    dispatcher: FleetDispatcher,
    scheduler: Arc<TaskScheduler>,
    terminal: Terminal<W>,
    default_priority: Priority,
    drain_on_exit: bool,
}

impl<W: Write> Repl<W> {
    pub fn new(
        dispatcher: FleetDispatcher,
        scheduler: Arc<TaskScheduler>,
        terminal: Terminal<W>,
    ) -> Self {
        Self {
            dispatcher,
            scheduler,
            terminal,
            default_priority: 5,
            drain_on_exit: true,
        }
    }

    /// Priority given to `queue` lines that leave it out.
    pub fn with_default_priority(mut self, priority: Priority) -> Self {
        self.default_priority = priority;
        self
    }

    pub fn with_drain_on_exit(mut self, drain_on_exit: bool) -> Self {
        self.drain_on_exit = drain_on_exit;
        self
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<W> {
        &mut self.terminal
    }

    #[cfg(test)]
    pub fn into_terminal(self) -> Terminal<W> {
        self.terminal
    }

    /// Run until the user exits, input ends, or `shutdown` becomes `true`.
    pub async fn run<I>(
        &mut self,
        input: &mut I,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<ExitReason>
    where
        I: InputSource + ?Sized,
    {
        let reason = loop {
            self.terminal.prompt()?;

            let line = tokio::select! {
                line = input.next_line() => line,
                _ = shutdown_requested(&mut shutdown) => break ExitReason::Interrupted,
            };
            let Some(line) = line else {
                break ExitReason::EndOfInput;
            };

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    self.terminal.print_error(&e.to_string())?;
                    continue;
                }
            };
            debug!(?command, "Command received");

            let flow = tokio::select! {
                flow = self.execute(command) => flow?,
                _ = shutdown_requested(&mut shutdown) => break ExitReason::Interrupted,
            };
            if let Flow::Exit = flow {
                break ExitReason::Command;
            }
        };

        self.finish(reason).await?;
        Ok(reason)
    }

    async fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Empty => {}
            Command::Task { rover, task } => {
                match self.dispatcher.assign_raw(&rover, &task).await {
                    Ok(assignment) => self.terminal.print_assigned(&assignment)?,
                    Err(e) => self
                        .terminal
                        .print_error(&format!("Assigning task to {}: {}", rover, e))?,
                }
            }
            Command::Queue {
                priority,
                rover,
                task,
            } => {
                let priority = priority.unwrap_or(self.default_priority);
                self.queue(priority, &rover, &task)?
            }
            Command::Dispatch => self.dispatch().await?,
            Command::Pending => {
                let pending = self.scheduler.pending();
                self.terminal.print_pending(&pending)?;
            }
            Command::Status => match self.dispatcher.fleet_status().await {
                Ok(status) => self.terminal.print_status(&status)?,
                Err(e) => self
                    .terminal
                    .print_error(&format!("Fetching fleet status: {}", e))?,
            },
            Command::Help => self.terminal.print_menu()?,
            Command::Exit => {
                self.terminal.print_info("Shutting down system...")?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    /// Validate locally and submit to the scheduler.
    fn queue(&mut self, priority: Priority, rover: &str, task: &str) -> Result<()> {
        let parsed = RoverId::new(rover).and_then(|rover| {
            let kind: TaskKind = task.parse()?;
            Ok((rover, kind))
        });
        let (rover, kind) = match parsed {
            Ok(valid) => valid,
            Err(e) => return self.terminal.print_error(&e.to_string()),
        };

        let id = self.scheduler.submit(rover, kind, priority);
        let pending = self.scheduler.pending();
        if let Some(record) = pending.iter().find(|r| r.id() == id) {
            self.terminal.print_queued(record, pending.len())?;
        }
        Ok(())
    }

    async fn dispatch(&mut self) -> Result<()> {
        if self.scheduler.is_empty() {
            return self.terminal.print_info("No queued tasks.");
        }
        let report = self.scheduler.drain_with(&self.dispatcher).await;
        self.terminal.print_report(&report)
    }

    async fn finish(&mut self, reason: ExitReason) -> Result<()> {
        let pending = self.scheduler.len();
        if pending == 0 {
            return Ok(());
        }
        if reason != ExitReason::Interrupted && self.drain_on_exit {
            info!(pending, "Dispatching queued tasks before exit");
            self.terminal
                .print_info(&format!("Dispatching {} queued tasks before exit...", pending))?;
            return self.dispatch().await;
        }
        info!(pending, ?reason, "Discarding queued tasks");
        self.terminal
            .print_info(&format!("Discarded {} queued tasks.", pending))
    }
}

/// Resolves once `true` is sent. A dropped sender means no shutdown will
/// ever be requested, so the future then stays pending.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}
