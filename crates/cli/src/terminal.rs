use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{self, Stdout, Write};

use fleet_client::{Assignment, Session};
use fleet_scheduler::{DrainReport, TaskRecord};
use serde_json::Value;

use crate::command::MENU;

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const PROMPT: Color = Color::Green;
    const TASK: Color = Color::Cyan;
    const QUEUED: Color = Color::Yellow;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
}

/// Writes user-facing output for the command loop.
pub struct Terminal<W: Write = Stdout> {
    out: W,
}

impl Terminal<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print the startup banner.
    pub fn print_banner(&mut self, base_url: &str) -> Result<()> {
        execute!(
            self.out,
            Print("\n"),
            SetForegroundColor(Colors::HEADER),
            Print("=== Agricultural Fleet Management System ===\n"),
            SetForegroundColor(Colors::DIM),
            Print(format!("Service: {}\n", base_url)),
            ResetColor,
        )?;
        Ok(())
    }

    pub fn print_session(&mut self, session: &Session) -> Result<()> {
        let message = if session.message.is_empty() {
            "Session started"
        } else {
            session.message.as_str()
        };
        execute!(
            self.out,
            SetForegroundColor(Colors::DIM),
            Print(format!("[Session] {} ({})\n", message, session.id)),
            ResetColor,
        )?;
        Ok(())
    }

    pub fn print_menu(&mut self) -> Result<()> {
        execute!(
            self.out,
            Print("\n"),
            SetForegroundColor(Colors::HEADER),
            Print("Command Menu:\n"),
            ResetColor,
        )?;
        for (usage, description) in MENU {
            execute!(self.out, Print(format!("  {:<34} {}\n", usage, description)))?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn prompt(&mut self) -> Result<()> {
        execute!(
            self.out,
            Print("\n"),
            SetForegroundColor(Colors::PROMPT),
            Print("> "),
            ResetColor,
        )?;
        self.out.flush()?;
        Ok(())
    }

    pub fn print_assigned(&mut self, assignment: &Assignment) -> Result<()> {
        execute!(
            self.out,
            SetForegroundColor(Colors::TASK),
            Print(format!(
                "[Task] {} assigned to {}\n",
                assignment.kind, assignment.rover
            )),
            ResetColor,
        )?;
        Ok(())
    }

    pub fn print_queued(&mut self, record: &TaskRecord, pending: usize) -> Result<()> {
        execute!(
            self.out,
            SetForegroundColor(Colors::QUEUED),
            Print(format!(
                "[Task] {} added for {} with priority {} ({} pending)\n",
                record.kind(),
                record.target(),
                record.priority(),
                pending
            )),
            ResetColor,
        )?;
        Ok(())
    }

    /// List queued records in dispatch order.
    pub fn print_pending(&mut self, records: &[TaskRecord]) -> Result<()> {
        if records.is_empty() {
            return self.print_info("No queued tasks.");
        }

        execute!(
            self.out,
            SetForegroundColor(Colors::HEADER),
            Print("Queued Tasks:\n"),
            SetForegroundColor(Colors::DIM),
            Print(format!("{:<4} {:<10} {:<20} {:<16}\n", "#", "PRIORITY", "ROVER", "TASK")),
            Print(format!("{}\n", "-".repeat(54))),
            ResetColor,
        )?;
        for (i, r) in records.iter().enumerate() {
            execute!(
                self.out,
                Print(format!(
                    "{:<4} {:<10} {:<20} {:<16}\n",
                    i + 1,
                    r.priority(),
                    r.target(),
                    r.kind()
                )),
            )?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn print_report(&mut self, report: &DrainReport) -> Result<()> {
        for failure in &report.failures {
            self.print_error(&format!(
                "Assigning {} to {}: {}",
                failure.kind, failure.target, failure.error
            ))?;
        }
        self.print_info(&format!(
            "Dispatched {} of {} queued tasks ({} failed)",
            report.dispatched,
            report.total(),
            report.failures.len()
        ))
    }

    /// Pretty-print the fleet status payload as returned by the service.
    pub fn print_status(&mut self, status: &Value) -> Result<()> {
        let rendered = serde_json::to_string_pretty(status)?;
        execute!(
            self.out,
            SetForegroundColor(Colors::HEADER),
            Print("Fleet Status:\n"),
            ResetColor,
            Print(format!("{}\n", rendered)),
        )?;
        Ok(())
    }

    /// Print an error message.
    pub fn print_error(&mut self, msg: &str) -> Result<()> {
        execute!(
            self.out,
            SetForegroundColor(Colors::ERROR),
            Print(format!("[Error] {}\n", msg)),
            ResetColor,
        )?;
        Ok(())
    }

    /// Print an info message.
    pub fn print_info(&mut self, msg: &str) -> Result<()> {
        execute!(
            self.out,
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n", msg)),
            ResetColor,
        )?;
        Ok(())
    }
}
