//! Forwards drained task records to the fleet service.
//!
//! A failed assignment is reported back to the scheduler as an error for
//! that one record. It is never retried or requeued.

use std::sync::Arc;

use async_trait::async_trait;
use fleet_core::{RoverId, TaskKind};
use fleet_scheduler::{TaskHandler, TaskRecord};
use serde_json::Value;

use crate::api::FleetApi;
use crate::error::ClientError;
use crate::session::Session;

/// A task the fleet service accepted.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub rover: RoverId,
    pub kind: TaskKind,
    /// Confirmation payload, passed through unchanged.
    pub confirmation: Value,
}

/// Sends tasks to the fleet service under one session.
#[derive(Clone)]
pub struct FleetDispatcher {
    api: Arc<dyn FleetApi>,
    session: Session,
}

impl FleetDispatcher {
    pub fn new(api: Arc<dyn FleetApi>, session: Session) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Validate free-form rover and task input, then assign it right away.
    ///
    /// Unknown task names and blank rover ids fail with
    /// [`ClientError::Validation`] without touching the network.
    pub async fn assign_raw(&self, rover: &str, task: &str) -> Result<Assignment, ClientError> {
        let rover = RoverId::new(rover)?;
        let kind: TaskKind = task.parse()?;
        let confirmation = self.assign(&rover, kind).await?;
        Ok(Assignment {
            rover,
            kind,
            confirmation,
        })
    }

    pub async fn assign(&self, rover: &RoverId, kind: TaskKind) -> Result<Value, ClientError> {
        self.api.assign_task(&self.session, rover, kind).await
    }

    pub async fn fleet_status(&self) -> Result<Value, ClientError> {
        self.api.fleet_status(&self.session).await
    }
}

#[async_trait]
impl TaskHandler for FleetDispatcher {
    async fn handle(&self, record: TaskRecord) -> anyhow::Result<()> {
        self.assign(record.target(), record.kind()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use fleet_core::FleetError;
    use fleet_scheduler::TaskScheduler;

    /// Records every assignment; rovers listed in `offline` fail.
    #[derive(Default)]
    struct FakeFleet {
        assigned: Mutex<Vec<(String, TaskKind)>>,
        offline: Vec<&'static str>,
    }

    #[async_trait]
    impl FleetApi for FakeFleet {
        async fn start_session(&self) -> Result<Session, ClientError> {
            Ok(Session::new("s-1", "welcome"))
        }

        async fn fleet_status(&self, _session: &Session) -> Result<Value, ClientError> {
            Ok(serde_json::json!({ "rovers": [] }))
        }

        async fn assign_task(
            &self,
            _session: &Session,
            rover: &RoverId,
            kind: TaskKind,
        ) -> Result<Value, ClientError> {
            if self.offline.iter().any(|r| *r == rover.as_str()) {
                return Err(ClientError::Protocol {
                    status: 404,
                    body: format!("rover {rover} not found"),
                });
            }
            self.assigned
                .lock()
                .unwrap()
                .push((rover.to_string(), kind));
            Ok(serde_json::json!({ "status": "ok" }))
        }
    }

    fn dispatcher(fleet: Arc<FakeFleet>) -> FleetDispatcher {
        FleetDispatcher::new(fleet, Session::new("s-1", "welcome"))
    }

    #[tokio::test]
    async fn test_assign_raw_normalizes_task_name() {
        let fleet = Arc::new(FakeFleet::default());
        let d = dispatcher(fleet.clone());
        let assignment = d.assign_raw("rover-1", "soil analysis").await.unwrap();
        assert_eq!(assignment.kind, TaskKind::SoilAnalysis);
        assert_eq!(assignment.confirmation["status"], "ok");
        assert_eq!(
            *fleet.assigned.lock().unwrap(),
            vec![("rover-1".to_string(), TaskKind::SoilAnalysis)]
        );
    }

    #[tokio::test]
    async fn test_assign_raw_rejects_unknown_task_locally() {
        let fleet = Arc::new(FakeFleet::default());
        let d = dispatcher(fleet.clone());
        let err = d.assign_raw("rover-1", "harvest").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(FleetError::UnknownTaskKind { .. })
        ));
        assert!(fleet.assigned.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_assign_raw_rejects_blank_rover() {
        let fleet = Arc::new(FakeFleet::default());
        let err = dispatcher(fleet).assign_raw("  ", "weeding").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(FleetError::EmptyRoverId)));
    }

    #[tokio::test]
    async fn test_drain_through_dispatcher_skips_failed_rover() {
        let fleet = Arc::new(FakeFleet {
            offline: vec!["R2"],
            ..Default::default()
        });
        let d = dispatcher(fleet.clone());
        let scheduler = TaskScheduler::new();
        scheduler.submit(RoverId::new("R1").unwrap(), TaskKind::Weeding, 10);
        scheduler.submit(RoverId::new("R2").unwrap(), TaskKind::Irrigation, 1);
        scheduler.submit(RoverId::new("R3").unwrap(), TaskKind::SoilAnalysis, 5);

        let report = scheduler.drain_with(&d).await;

        assert_eq!(report.dispatched, 2);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].error.contains("404"));
        assert_eq!(
            *fleet.assigned.lock().unwrap(),
            vec![
                ("R3".to_string(), TaskKind::SoilAnalysis),
                ("R1".to_string(), TaskKind::Weeding),
            ]
        );
    }
}
