//! Client side of the remote fleet service.
//!
//! [`FleetClient`] speaks the HTTP API; [`FleetDispatcher`] forwards drained
//! scheduler records to it.

pub mod api;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod session;

pub use api::FleetApi;
pub use dispatch::{Assignment, FleetDispatcher};
pub use error::{ClientError, FailureKind};
pub use http::{FleetClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use session::Session;
