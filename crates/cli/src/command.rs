//! Parsing of interactive command lines.

use fleet_core::Priority;
use thiserror::Error;

pub const MENU: &[(&str, &str)] = &[
    ("task <rover> <task>", "Assign a task to a rover now"),
    ("queue [priority] <rover> <task>", "Queue a task; lower priority runs first"),
    ("dispatch", "Send queued tasks in priority order"),
    ("pending", "List queued tasks"),
    ("status", "Show fleet status"),
    ("help", "Show this menu"),
    ("exit", "Quit program"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Task {
        rover: String,
        task: String,
    },
    /// `priority` is `None` when the line leaves it out.
    Queue {
        priority: Option<Priority>,
        rover: String,
        task: String,
    },
    Dispatch,
    Pending,
    Status,
    Help,
    Exit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("Invalid command '{0}'. Type 'help' for commands or 'exit' to quit.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Arguments(&'static str),
}

impl Command {
    /// Parse one input line. Matching is case-insensitive; rover ids and
    /// task names are passed on lower-cased.
    pub fn parse(line: &str) -> Result<Self, UsageError> {
        let normalized = line.trim().to_lowercase();
        let parts: Vec<&str> = normalized.split_whitespace().collect();

        let Some((&head, args)) = parts.split_first() else {
            return Ok(Command::Empty);
        };

        match (head, args.len()) {
            ("exit" | "quit", 0) => Ok(Command::Exit),
            ("status", 0) => Ok(Command::Status),
            ("dispatch", 0) => Ok(Command::Dispatch),
            ("pending", 0) => Ok(Command::Pending),
            ("help", 0) => Ok(Command::Help),
            ("task", n) if n >= 2 => Ok(Command::Task {
                rover: args[0].to_string(),
                task: args[1..].join(" "),
            }),
            ("task", _) => Err(UsageError::Arguments("task <rover> <task>")),
            ("queue", n) if n >= 2 => {
                // A leading integer is the priority only if a rover and task follow it.
                let priority = args[0].parse::<Priority>().ok().filter(|_| n >= 3);
                let rest = if priority.is_some() { &args[1..] } else { args };
                Ok(Command::Queue {
                    priority,
                    rover: rest[0].to_string(),
                    task: rest[1..].join(" "),
                })
            }
            ("queue", _) => Err(UsageError::Arguments("queue [priority] <rover> <task>")),
            _ => Err(UsageError::Unknown(line.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_is_empty() {
        assert_eq!(Command::parse("").unwrap(), Command::Empty);
        assert_eq!(Command::parse("   \t ").unwrap(), Command::Empty);
    }

    #[test]
    fn test_simple_commands_any_case() {
        assert_eq!(Command::parse("EXIT").unwrap(), Command::Exit);
        assert_eq!(Command::parse(" quit ").unwrap(), Command::Exit);
        assert_eq!(Command::parse("Status").unwrap(), Command::Status);
        assert_eq!(Command::parse("dispatch").unwrap(), Command::Dispatch);
        assert_eq!(Command::parse("pending").unwrap(), Command::Pending);
        assert_eq!(Command::parse("help").unwrap(), Command::Help);
    }

    #[test]
    fn test_task_joins_multi_word_names() {
        assert_eq!(
            Command::parse("task Rover-1 Soil   Analysis").unwrap(),
            Command::Task {
                rover: "rover-1".to_string(),
                task: "soil analysis".to_string(),
            }
        );
    }

    #[test]
    fn test_task_needs_rover_and_task() {
        assert_eq!(
            Command::parse("task rover-1").unwrap_err(),
            UsageError::Arguments("task <rover> <task>")
        );
        assert!(Command::parse("task").is_err());
    }

    #[test]
    fn test_queue_parses_priority() {
        assert_eq!(
            Command::parse("queue -2 r7 crop monitoring").unwrap(),
            Command::Queue {
                priority: Some(-2),
                rover: "r7".to_string(),
                task: "crop monitoring".to_string(),
            }
        );
    }

    #[test]
    fn test_queue_priority_is_optional() {
        assert_eq!(
            Command::parse("queue r7 soil analysis").unwrap(),
            Command::Queue {
                priority: None,
                rover: "r7".to_string(),
                task: "soil analysis".to_string(),
            }
        );
        // Too short to carry a priority, so the number is the rover id.
        assert_eq!(
            Command::parse("queue 1 weeding").unwrap(),
            Command::Queue {
                priority: None,
                rover: "1".to_string(),
                task: "weeding".to_string(),
            }
        );
    }

    #[test]
    fn test_queue_needs_rover_and_task() {
        assert_eq!(
            Command::parse("queue r7").unwrap_err(),
            UsageError::Arguments("queue [priority] <rover> <task>")
        );
        assert!(matches!(
            Command::parse("queue").unwrap_err(),
            UsageError::Arguments(_)
        ));
    }

    #[test]
    fn test_unknown_and_extra_args() {
        assert!(matches!(
            Command::parse("launch rockets").unwrap_err(),
            UsageError::Unknown(_)
        ));
        assert!(matches!(
            Command::parse("exit now").unwrap_err(),
            UsageError::Unknown(_)
        ));
    }
}
