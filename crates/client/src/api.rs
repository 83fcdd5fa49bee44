use async_trait::async_trait;
use fleet_core::{RoverId, TaskKind};
use serde_json::Value;

use crate::error::ClientError;
use crate::session::Session;

/// Operations offered by the remote fleet service.
///
/// Every call returns an explicit result; none of them retries.
#[async_trait]
pub trait FleetApi: Send + Sync {
    /// Open a session. Nothing else can be called without one.
    async fn start_session(&self) -> Result<Session, ClientError>;

    /// Current state of the whole fleet. The payload is passed through as-is.
    async fn fleet_status(&self, session: &Session) -> Result<Value, ClientError>;

    /// Ask `rover` to perform `kind`. Returns the service's confirmation.
    async fn assign_task(
        &self,
        session: &Session,
        rover: &RoverId,
        kind: TaskKind,
    ) -> Result<Value, ClientError>;
}
