pub mod error;
pub mod rover;
pub mod task;

pub use error::*;
pub use rover::RoverId;
pub use task::{Priority, TaskKind};
