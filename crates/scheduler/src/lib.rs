//! Priority task scheduler for rover work.
//!
//! Tasks are released lowest priority value first; equal priorities leave
//! in submission order.

pub mod handler;
pub mod record;
pub mod report;
pub mod scheduler;

pub use handler::TaskHandler;
pub use record::TaskRecord;
pub use report::{DrainFailure, DrainReport};
pub use scheduler::TaskScheduler;
