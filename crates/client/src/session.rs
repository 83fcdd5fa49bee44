use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Handle for an authenticated interaction with the fleet service.
///
/// Obtained from [`FleetApi::start_session`](crate::FleetApi::start_session)
/// and passed explicitly to every later call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    /// Greeting returned by the service when the session was opened.
    pub message: String,
    pub opened_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            opened_at: Utc::now(),
        }
    }
}

/// Body of `POST /session/start`.
#[derive(Debug, Deserialize)]
pub(crate) struct SessionStartResponse {
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
